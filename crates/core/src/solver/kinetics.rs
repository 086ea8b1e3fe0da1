//! Per-cell reaction kinetics, parameterized by simulation mode.
//!
//! All four modes share one equation set; mode feature flags switch the
//! diffusion, innate, opsonization and lymph-migration terms on and off
//! instead of duplicating near-identical formulas per mode. Every cell
//! update is an explicit Euler step `next = current + dt * rate` reading
//! only the current buffers, so the sweep over the lattice is
//! order-independent and runs on a Rayon parallel iterator without
//! changing results.

use rayon::prelude::*;
use tracing::warn;

use crate::config::{ContactPolicy, NanPolicy, SimulationMode};
use crate::error::SimError;
use crate::grid::{coords, idx, FieldKind, TissueFields};
use crate::params::Parameters;
use crate::solver::aggregate::TissueAggregates;
use crate::solver::diffusion::laplacian;
use crate::solver::lymph::LymphState;
use crate::vessels::{in_contact, VesselKind};

/// Everything one reaction sweep reads besides the field buffers.
pub struct StepContext<'a> {
    /// Model parameters.
    pub params: &'a Parameters,
    /// Active equation subset.
    pub mode: SimulationMode,
    /// Blood-vessel contact policy.
    pub blood_contact: ContactPolicy,
    /// Lymph-vessel contact policy.
    pub lymph_contact: ContactPolicy,
    /// Strictness towards NaN cell values.
    pub nan_policy: NanPolicy,
    /// Iteration number, for anomaly reports.
    pub iteration: u64,
    /// Tissue aggregates from the prior iteration.
    pub aggregates: TissueAggregates,
    /// Lymph-node state as of this iteration's ODE step.
    pub lymph: LymphState,
}

/// Read-only view of the four current field buffers.
#[derive(Clone, Copy)]
pub struct FieldView<'a> {
    /// Bacteria (A).
    pub bacteria: &'a [f64],
    /// Resting macrophages (MR).
    pub resting: &'a [f64],
    /// Activated macrophages (MA).
    pub active: &'a [f64],
    /// Antibodies (F).
    pub antibody: &'a [f64],
}

impl<'a> FieldView<'a> {
    /// View over the current buffers of `fields`.
    #[must_use]
    pub fn of(fields: &'a TissueFields) -> Self {
        Self {
            bacteria: fields.bacteria.current(),
            resting: fields.resting.current(),
            active: fields.active.current(),
            antibody: fields.antibody.current(),
        }
    }
}

/// Recruitment and migration terms apply where the contact policy selects
/// the cell; the single-cell domain applies them unconditionally.
fn gated(ctx: &StepContext<'_>, kind: VesselKind, x: usize, y: usize, z: usize) -> bool {
    let policy = match kind {
        VesselKind::Blood => ctx.blood_contact,
        VesselKind::Lymph => ctx.lymph_contact,
    };
    ctx.mode.single_cell() || in_contact(policy, kind, x, y, z)
}

/// Next bacteria value at (x, y, z): logistic growth, phagocytosis by both
/// macrophage populations, opsonized phagocytosis, natural decay and
/// diffusion, with the active terms selected by the mode. In the coupled
/// modes any result below the clearance tolerance is floored to 0.0.
#[must_use]
pub fn bacteria_next(ctx: &StepContext<'_>, v: FieldView<'_>, x: usize, y: usize, z: usize) -> f64 {
    let p = ctx.params;
    let i = idx(x, y, z);
    let a = v.bacteria[i];

    let mut rate = p.beta_a * a * (1.0 - a / p.k_a);
    if ctx.mode.innate_enabled() {
        rate -= p.lambda_mr * v.resting[i] * a;
        rate -= p.lambda_ma * v.active[i] * a;
    }
    if ctx.mode.opsonization_enabled() {
        rate -= p.lambda_afma * v.antibody[i] * a * v.active[i];
        rate -= p.lambda_afmr * v.antibody[i] * a * v.resting[i];
    }
    rate -= p.m_a * a;
    if ctx.mode.diffusion_enabled() {
        rate += p.d_a * laplacian(v.bacteria, x, y, z, p);
    }

    let next = a + p.delta_t * rate;
    if ctx.mode.opsonization_enabled() && next < p.tol {
        0.0
    } else {
        next
    }
}

/// Next resting-macrophage value at (x, y, z): natural decay, activation
/// loss, diffusion and the blood-vessel-gated recruitment source.
#[must_use]
pub fn resting_next(ctx: &StepContext<'_>, v: FieldView<'_>, x: usize, y: usize, z: usize) -> f64 {
    let p = ctx.params;
    let i = idx(x, y, z);
    let mr = v.resting[i];

    let mut rate = -p.m_mr * mr - p.gamma_ma * mr * v.bacteria[i];
    if ctx.mode.diffusion_enabled() {
        rate += p.d_mr * laplacian(v.resting, x, y, z, p);
    }
    if gated(ctx, VesselKind::Blood, x, y, z) {
        rate += p.alpha_mr * (p.m_star - mr);
    }
    mr + p.delta_t * rate
}

/// Next activated-macrophage value at (x, y, z): natural decay, activation
/// gain, diffusion and, in the coupled modes, the lymph-vessel-gated
/// migration sink towards the lymph node.
#[must_use]
pub fn active_next(ctx: &StepContext<'_>, v: FieldView<'_>, x: usize, y: usize, z: usize) -> f64 {
    let p = ctx.params;
    let i = idx(x, y, z);
    let ma = v.active[i];

    let mut rate = -p.m_ma * ma + p.gamma_ma * v.resting[i] * v.bacteria[i];
    if ctx.mode.diffusion_enabled() {
        rate += p.d_ma * laplacian(v.active, x, y, z, p);
    }
    if ctx.mode.lymph_coupled() && gated(ctx, VesselKind::Lymph, x, y, z) {
        rate -= p.alpha_ma * (ctx.aggregates.active_macrophage - ctx.lymph.active_macrophage);
    }
    ma + p.delta_t * rate
}

/// Next antibody value at (x, y, z): opsonization consumption, the
/// blood-vessel-gated exchange with the lymph-node pool and diffusion.
#[must_use]
pub fn antibody_next(ctx: &StepContext<'_>, v: FieldView<'_>, x: usize, y: usize, z: usize) -> f64 {
    let p = ctx.params;
    let i = idx(x, y, z);
    let f = v.antibody[i];
    let a = v.bacteria[i];

    let mut rate = -p.lambda_afma * f * a * v.active[i] - p.lambda_afmr * f * a * v.resting[i];
    if gated(ctx, VesselKind::Blood, x, y, z) {
        rate -= p.alpha_f * (ctx.aggregates.antibody - ctx.lymph.antibody);
    }
    if ctx.mode.diffusion_enabled() {
        rate += p.d_f * laplacian(v.antibody, x, y, z, p);
    }
    f + p.delta_t * rate
}

/// NaN gate: log the anomaly and either propagate the value (permissive
/// default) or fail the run (strict policy).
fn admit(
    ctx: &StepContext<'_>,
    kind: FieldKind,
    x: usize,
    y: usize,
    z: usize,
    value: f64,
) -> Result<f64, SimError> {
    if value.is_nan() {
        warn!(
            "NaN in field {} at iteration {}, cell ({}, {}, {})",
            kind, ctx.iteration, x, y, z
        );
        if ctx.nan_policy == NanPolicy::Fail {
            return Err(SimError::NumericalAnomaly {
                iteration: ctx.iteration,
                field: kind,
                coordinate: (x, y, z),
            });
        }
    }
    Ok(value)
}

/// Parallel sweep of one field's next buffer.
fn sweep_into<F>(
    ctx: &StepContext<'_>,
    kind: FieldKind,
    next: &mut [f64],
    eval: F,
) -> Result<(), SimError>
where
    F: Fn(usize, usize, usize) -> f64 + Sync,
{
    next.par_iter_mut().enumerate().try_for_each(|(i, out)| {
        let (x, y, z) = coords(i);
        *out = admit(ctx, kind, x, y, z, eval(x, y, z))?;
        Ok(())
    })
}

/// Evaluate the mode's reaction equations over its spatial domain, writing
/// the next buffers of every field the mode mutates. Does not commit.
///
/// # Errors
///
/// Returns [`SimError::NumericalAnomaly`] when a cell update produces NaN
/// and the context's NaN policy is strict.
pub fn advance_fields(ctx: &StepContext<'_>, fields: &mut TissueFields) -> Result<(), SimError> {
    if ctx.mode.single_cell() {
        let view = FieldView::of(fields);
        let a = bacteria_next(ctx, view, 0, 0, 0);
        let mr = resting_next(ctx, view, 0, 0, 0);
        let ma = active_next(ctx, view, 0, 0, 0);
        let f = antibody_next(ctx, view, 0, 0, 0);

        let a = admit(ctx, FieldKind::Bacteria, 0, 0, 0, a)?;
        let mr = admit(ctx, FieldKind::RestingMacrophage, 0, 0, 0, mr)?;
        let ma = admit(ctx, FieldKind::ActiveMacrophage, 0, 0, 0, ma)?;
        let f = admit(ctx, FieldKind::Antibody, 0, 0, 0, f)?;

        fields.bacteria.set_next(0, 0, 0, a);
        fields.resting.set_next(0, 0, 0, mr);
        fields.active.set_next(0, 0, 0, ma);
        fields.antibody.set_next(0, 0, 0, f);
        return Ok(());
    }

    {
        let (a_curr, a_next) = fields.bacteria.split_mut();
        let view = FieldView {
            bacteria: a_curr,
            resting: fields.resting.current(),
            active: fields.active.current(),
            antibody: fields.antibody.current(),
        };
        sweep_into(ctx, FieldKind::Bacteria, a_next, |x, y, z| {
            bacteria_next(ctx, view, x, y, z)
        })?;
    }

    if ctx.mode.innate_enabled() {
        {
            let (mr_curr, mr_next) = fields.resting.split_mut();
            let view = FieldView {
                bacteria: fields.bacteria.current(),
                resting: mr_curr,
                active: fields.active.current(),
                antibody: fields.antibody.current(),
            };
            sweep_into(ctx, FieldKind::RestingMacrophage, mr_next, |x, y, z| {
                resting_next(ctx, view, x, y, z)
            })?;
        }
        {
            let (ma_curr, ma_next) = fields.active.split_mut();
            let view = FieldView {
                bacteria: fields.bacteria.current(),
                resting: fields.resting.current(),
                active: ma_curr,
                antibody: fields.antibody.current(),
            };
            sweep_into(ctx, FieldKind::ActiveMacrophage, ma_next, |x, y, z| {
                active_next(ctx, view, x, y, z)
            })?;
        }
    }

    if ctx.mode.opsonization_enabled() {
        let (f_curr, f_next) = fields.antibody.split_mut();
        let view = FieldView {
            bacteria: fields.bacteria.current(),
            resting: fields.resting.current(),
            active: fields.active.current(),
            antibody: f_curr,
        };
        sweep_into(ctx, FieldKind::Antibody, f_next, |x, y, z| {
            antibody_next(ctx, view, x, y, z)
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Field;
    use approx::assert_abs_diff_eq;

    fn context(p: &Parameters, mode: SimulationMode) -> StepContext<'_> {
        StepContext {
            params: p,
            mode,
            blood_contact: ContactPolicy::VesselMap,
            lymph_contact: ContactPolicy::VesselMap,
            nan_policy: NanPolicy::Warn,
            iteration: 0,
            aggregates: TissueAggregates::initial(p),
            lymph: LymphState::initial(p),
        }
    }

    fn uniform_fields(a: f64, mr: f64, ma: f64, f: f64) -> TissueFields {
        TissueFields {
            bacteria: Field::with_value(a),
            resting: Field::with_value(mr),
            active: Field::with_value(ma),
            antibody: Field::with_value(f),
        }
    }

    #[test]
    fn single_cell_bacteria_step_matches_hand_computation() {
        // A0=2, MR0=4, MA0=0, F0=0, dt=0.001:
        // rate = 2*2*(1 - 2/50) - 0.00598*4*2 - 0.1*2 = 3.59216
        let p = Parameters::default();
        let ctx = context(&p, SimulationMode::NoDiffusionCoupled);
        let fields = uniform_fields(2.0, 4.0, 0.0, 0.0);
        let a1 = bacteria_next(&ctx, FieldView::of(&fields), 0, 0, 0);
        assert_abs_diff_eq!(a1, 2.00359216, epsilon = 1e-9);
    }

    #[test]
    fn bacteria_floor_clamps_to_exact_zero_in_coupled_modes() {
        let p = Parameters::default();
        let fields = uniform_fields(1e-7, 4.0, 0.0, 0.0);

        let coupled = context(&p, SimulationMode::Coupled);
        assert_eq!(bacteria_next(&coupled, FieldView::of(&fields), 5, 5, 5), 0.0);

        // The innate-only mode keeps sub-tolerance values as-is
        let innate = context(&p, SimulationMode::InnateOnly);
        let v = bacteria_next(&innate, FieldView::of(&fields), 5, 5, 5);
        assert!(v > 0.0 && v < p.tol);
    }

    #[test]
    fn diffusion_only_mode_ignores_macrophages() {
        let p = Parameters::default();
        let ctx = context(&p, SimulationMode::DiffusionOnly);
        // Uniform bacteria: laplacian is zero, so only logistic and decay act
        let fields = uniform_fields(2.0, 100.0, 100.0, 100.0);
        let a1 = bacteria_next(&ctx, FieldView::of(&fields), 4, 4, 4);
        let expected = 2.0 + p.delta_t * (p.beta_a * 2.0 * (1.0 - 2.0 / p.k_a) - p.m_a * 2.0);
        assert_abs_diff_eq!(a1, expected, epsilon = 1e-12);
    }

    #[test]
    fn recruitment_source_is_vessel_gated() {
        let p = Parameters::default();
        let ctx = context(&p, SimulationMode::Coupled);
        let fields = uniform_fields(0.0, 1.0, 0.0, 0.0);
        let view = FieldView::of(&fields);

        // (0,0,0) touches a blood vessel, (5,5,5) does not
        let on_vessel = resting_next(&ctx, view, 0, 0, 0);
        let off_vessel = resting_next(&ctx, view, 5, 5, 5);
        let base = 1.0 + p.delta_t * (-p.m_mr * 1.0);
        assert_abs_diff_eq!(off_vessel, base, epsilon = 1e-12);
        assert_abs_diff_eq!(
            on_vessel,
            base + p.delta_t * p.alpha_mr * (p.m_star - 1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn single_cell_domain_applies_exchange_terms_ungated() {
        // The origin is not lymph-vessel adjacent, but the single-cell
        // domain applies the migration sink there regardless.
        let p = Parameters::default();
        let mut ctx = context(&p, SimulationMode::NoDiffusionCoupled);
        ctx.aggregates.active_macrophage = 3.0;
        let fields = uniform_fields(0.0, 0.0, 1.0, 0.0);
        let ma1 = active_next(&ctx, FieldView::of(&fields), 0, 0, 0);
        let expected = 1.0 + p.delta_t * (-p.m_ma * 1.0 - p.alpha_ma * 3.0);
        assert_abs_diff_eq!(ma1, expected, epsilon = 1e-12);
    }

    #[test]
    fn antibody_exchange_follows_blood_policy() {
        let p = Parameters::default();
        let mut ctx = context(&p, SimulationMode::Coupled);
        ctx.aggregates.antibody = 2.0;
        ctx.lymph.antibody = 0.5;
        let fields = uniform_fields(0.0, 0.0, 0.0, 1.0);
        let view = FieldView::of(&fields);

        // Uniform antibody field: laplacian vanishes
        let on_vessel = antibody_next(&ctx, view, 0, 0, 0);
        let off_vessel = antibody_next(&ctx, view, 5, 5, 5);
        assert_abs_diff_eq!(off_vessel, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            on_vessel,
            1.0 - p.delta_t * p.alpha_f * (2.0 - 0.5),
            epsilon = 1e-12
        );
    }

    #[test]
    fn strict_nan_policy_reports_field_and_cell() {
        let p = Parameters {
            beta_a: f64::NAN,
            ..Parameters::default()
        };
        let mut ctx = context(&p, SimulationMode::Coupled);
        ctx.nan_policy = NanPolicy::Fail;
        ctx.iteration = 7;
        let mut fields = uniform_fields(1.0, 0.0, 0.0, 0.0);

        match advance_fields(&ctx, &mut fields) {
            Err(SimError::NumericalAnomaly {
                iteration, field, ..
            }) => {
                assert_eq!(iteration, 7);
                assert_eq!(field, FieldKind::Bacteria);
            }
            other => panic!("expected a numerical anomaly, got {other:?}"),
        }
    }

    #[test]
    fn permissive_nan_policy_propagates() {
        let p = Parameters {
            beta_a: f64::NAN,
            ..Parameters::default()
        };
        let ctx = context(&p, SimulationMode::DiffusionOnly);
        let mut fields = uniform_fields(1.0, 0.0, 0.0, 0.0);
        advance_fields(&ctx, &mut fields).unwrap();
        fields.bacteria.commit();
        assert!(fields.bacteria.get(0, 0, 0).is_nan());
    }
}
