//! Immune-response simulation core.
//!
//! Numerically integrates a coupled reaction-diffusion / compartmental
//! model of the innate and acquired immune response to a bacterial
//! infection: four scalar fields (bacteria, resting and activated
//! macrophages, antibodies) diffuse and react on a fixed 10x10x10 tissue
//! lattice, coupled through vessel-contact aggregates to a lumped
//! lymph-node compartment holding the systemic populations (T-helper and
//! B-lymphocytes, plasma cells, lymph-node macrophage and antibody
//! pools). Based on the works of Pigozzo (2011) and Marchuk (1997).
//!
//! Integration is explicit Euler on a fixed step, deterministic and
//! single-pass; four simulation modes select which equation subsets and
//! coupling paths are active. See [`solver::Simulation`] for the driver.

pub mod config;
pub mod error;
pub mod grid;
pub mod params;
pub mod solver;
pub mod vessels;

pub use config::{ContactPolicy, NanPolicy, RunConfig, SimulationMode};
pub use error::SimError;
pub use grid::{Field, FieldKind, TissueFields, NX, NY, NZ, VOLUME};
pub use params::Parameters;
pub use solver::{
    LymphState, NullSink, RunSummary, Simulation, Snapshot, SnapshotSink, TissueAggregates,
};
pub use vessels::{in_contact, is_blood_vessel, is_lymph_vessel, VesselKind};
