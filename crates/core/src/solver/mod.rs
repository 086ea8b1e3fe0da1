//! The numerical solver: diffusion operator, spatial aggregation,
//! reaction kinetics, the lymph-node ODE system and the time-stepping
//! driver that advances them in lockstep.
//!
//! Phase order per iteration is strict: aggregate -> lymph-node step ->
//! reaction sweep -> buffer commit. The sweep itself is data-parallel
//! (each cell reads only the current buffers) and runs on Rayon.

pub mod aggregate;
pub mod diffusion;
pub mod driver;
pub mod kinetics;
pub mod lymph;

pub use aggregate::{tissue_mean, TissueAggregates};
pub use diffusion::laplacian;
pub use driver::{NullSink, RunSummary, Simulation, Snapshot, SnapshotSink};
pub use kinetics::{FieldView, StepContext};
pub use lymph::LymphState;
