//! Time-stepping driver: orchestrates aggregates, the lymph-node ODE
//! step, the reaction sweep and the buffer commit, in that strict order,
//! once per iteration until termination.

use tracing::{debug, info};

use crate::config::RunConfig;
use crate::error::SimError;
use crate::grid::{Field, TissueFields, NX, NY, NZ};
use crate::params::Parameters;
use crate::solver::aggregate::TissueAggregates;
use crate::solver::kinetics::{self, StepContext};
use crate::solver::lymph::LymphState;

/// One snapshot of the simulation state, emitted at the configured
/// iteration cadence.
pub struct Snapshot<'a> {
    /// Iteration the snapshot was taken at.
    pub iteration: u64,
    /// Tissue aggregates as of this iteration.
    pub aggregates: TissueAggregates,
    /// Lymph-node state as of this iteration.
    pub lymph: LymphState,
    /// Full field state.
    pub fields: &'a TissueFields,
}

/// Consumer of driver-produced snapshots.
pub trait SnapshotSink {
    /// Handle one snapshot. An error is fatal to the run.
    ///
    /// # Errors
    ///
    /// Implementations return an error when the snapshot cannot be
    /// persisted; the driver aborts the run with it.
    fn on_snapshot(&mut self, snapshot: &Snapshot<'_>) -> std::io::Result<()>;
}

/// Sink that discards every snapshot.
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn on_snapshot(&mut self, _snapshot: &Snapshot<'_>) -> std::io::Result<()> {
        Ok(())
    }
}

/// How a finished run ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Iterations actually executed.
    pub iterations: u64,
    /// Configured run length in days.
    pub days: u32,
    /// Tissue bacteria aggregate at termination.
    pub final_bacteria: f64,
}

/// The simulation context: fields, scalars, parameters and configuration,
/// advanced in lockstep by [`Simulation::run`].
pub struct Simulation {
    config: RunConfig,
    params: Parameters,
    fields: TissueFields,
    aggregates: TissueAggregates,
    lymph: LymphState,
    iteration: u64,
}

/// True where the initial bacteria load is seeded: strictly inside the
/// (0.2, 0.7) band of the axis, indices 3..=6 on the 10-cell lattice.
fn in_seed_band(i: usize, n: usize) -> bool {
    let i = i as f64;
    let n = n as f64;
    i > 0.2 * n && i < 0.7 * n
}

impl Simulation {
    /// Build a simulation with seeded initial conditions.
    ///
    /// Bacteria start at `a0` inside the central sub-box (everywhere on
    /// the single-cell domain), resting macrophages at their steady state,
    /// activated macrophages at zero and antibodies at `f0`.
    #[must_use]
    pub fn new(config: RunConfig, params: Parameters) -> Self {
        let bacteria = if config.mode.single_cell() {
            Field::with_value(params.a0)
        } else {
            Field::from_fn(|x, y, z| {
                if in_seed_band(x, NX) && in_seed_band(y, NY) && in_seed_band(z, NZ) {
                    params.a0
                } else {
                    0.0
                }
            })
        };

        let fields = TissueFields {
            bacteria,
            resting: Field::with_value(params.m_star),
            active: Field::with_value(params.m0),
            antibody: Field::with_value(params.f0),
        };
        let aggregates = TissueAggregates::initial(&params);
        let lymph = LymphState::initial(&params);

        Self {
            config,
            params,
            fields,
            aggregates,
            lymph,
            iteration: 0,
        }
    }

    /// Run configuration.
    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Model parameters.
    #[must_use]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Field state.
    #[must_use]
    pub fn fields(&self) -> &TissueFields {
        &self.fields
    }

    /// Tissue aggregates as of the last executed iteration.
    #[must_use]
    pub fn aggregates(&self) -> TissueAggregates {
        self.aggregates
    }

    /// Lymph-node state.
    #[must_use]
    pub fn lymph(&self) -> LymphState {
        self.lymph
    }

    /// Iterations executed so far.
    #[must_use]
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Advance one iteration: recompute aggregates (diffusion modes, after
    /// t = 0), step the lymph-node system (coupled modes), sweep the
    /// reaction equations and commit the mutated fields.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NumericalAnomaly`] under the strict NaN policy.
    pub fn step(&mut self) -> Result<(), SimError> {
        if self.iteration > 0 && self.config.mode.diffusion_enabled() {
            self.aggregates = TissueAggregates::compute(
                &self.fields,
                self.config.blood_contact,
                self.config.lymph_contact,
            );
        }
        if self.config.mode.lymph_coupled() {
            self.lymph.step(&self.params, &self.aggregates);
        }

        let ctx = StepContext {
            params: &self.params,
            mode: self.config.mode,
            blood_contact: self.config.blood_contact,
            lymph_contact: self.config.lymph_contact,
            nan_policy: self.config.nan_policy,
            iteration: self.iteration,
            aggregates: self.aggregates,
            lymph: self.lymph,
        };
        kinetics::advance_fields(&ctx, &mut self.fields)?;

        self.fields.bacteria.commit();
        if self.config.mode.innate_enabled() {
            self.fields.resting.commit();
            self.fields.active.commit();
        }
        if self.config.mode.opsonization_enabled() {
            self.fields.antibody.commit();
        }

        self.iteration += 1;
        Ok(())
    }

    /// Run to termination, emitting snapshots into `sink` at the
    /// configured cadence (iteration 0 included).
    ///
    /// The loop is post-condition checked and always executes at least one
    /// iteration; it stops once the iteration cap is reached or the tissue
    /// bacteria aggregate falls to the clearance tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] when the sink fails and
    /// [`SimError::NumericalAnomaly`] under the strict NaN policy.
    pub fn run(&mut self, sink: &mut dyn SnapshotSink) -> Result<RunSummary, SimError> {
        let total = self.params.total_iterations(self.config.days);
        let cadence = (total / u64::from(self.config.snapshot_points.max(1))).max(1);
        info!(
            "starting run: mode {}, {} days, {} iterations, snapshot every {}",
            self.config.mode.code(),
            self.config.days,
            total,
            cadence
        );

        loop {
            if self.iteration % cadence == 0 {
                debug!("saving snapshot at iteration {}", self.iteration);
                sink.on_snapshot(&Snapshot {
                    iteration: self.iteration,
                    aggregates: self.aggregates,
                    lymph: self.lymph,
                    fields: &self.fields,
                })?;
            }

            self.step()?;

            if self.iteration >= total || self.aggregates.bacteria <= self.params.tol {
                break;
            }
        }

        info!(
            "run finished after {} iterations, final bacteria load {:.3e}",
            self.iteration, self.aggregates.bacteria
        );
        Ok(RunSummary {
            iterations: self.iteration,
            days: self.config.days,
            final_bacteria: self.aggregates.bacteria,
        })
    }
}
