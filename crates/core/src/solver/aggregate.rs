//! Tissue aggregates: masked means of the fields over the lattice.
//!
//! An aggregate sums the strictly positive values of a field over the
//! mask-selected cells and divides by the total grid volume -- always the
//! full 1000 cells, never the count of masked cells. Vessel-restricted
//! aggregates are therefore diluted by construction; the lymph-node
//! coupling is calibrated against exactly this convention, so the
//! denominator must not be "fixed".

use serde::{Deserialize, Serialize};

use crate::config::ContactPolicy;
use crate::grid::{coords, Field, TissueFields, VOLUME};
use crate::params::Parameters;
use crate::vessels::{in_contact, VesselKind};

/// Mean of the positive values of `field` over cells selected by `mask`,
/// with the total grid volume as denominator. Returns 0.0 when the sum is
/// not positive.
#[must_use]
pub fn tissue_mean<M>(field: &Field, mask: M) -> f64
where
    M: Fn(usize, usize, usize) -> bool,
{
    let mut sum = 0.0;
    for (i, &v) in field.current().iter().enumerate() {
        let (x, y, z) = coords(i);
        if mask(x, y, z) && v > 0.0 {
            sum += v;
        }
    }
    if sum > 0.0 {
        sum / VOLUME as f64
    } else {
        0.0
    }
}

/// The four tissue-level scalars coupling the grid to the lymph node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TissueAggregates {
    /// Bacteria mean over the whole grid; also the termination criterion.
    pub bacteria: f64,
    /// Resting-macrophage mean over the whole grid.
    pub resting_macrophage: f64,
    /// Activated-macrophage mean restricted to lymph-vessel contact.
    pub active_macrophage: f64,
    /// Antibody mean restricted to blood-vessel contact.
    pub antibody: f64,
}

impl TissueAggregates {
    /// Aggregate values before the first iteration, matching the seeded
    /// scalar state rather than a grid reduction.
    #[must_use]
    pub fn initial(p: &Parameters) -> Self {
        Self {
            bacteria: p.a0,
            resting_macrophage: p.m_star,
            active_macrophage: 0.0,
            antibody: p.f0,
        }
    }

    /// Recompute every aggregate from the current field buffers.
    #[must_use]
    pub fn compute(
        fields: &TissueFields,
        blood_contact: ContactPolicy,
        lymph_contact: ContactPolicy,
    ) -> Self {
        Self {
            bacteria: tissue_mean(&fields.bacteria, |_, _, _| true),
            resting_macrophage: tissue_mean(&fields.resting, |_, _, _| true),
            active_macrophage: tissue_mean(&fields.active, |x, y, z| {
                in_contact(lymph_contact, VesselKind::Lymph, x, y, z)
            }),
            antibody: tissue_mean(&fields.antibody, |x, y, z| {
                in_contact(blood_contact, VesselKind::Blood, x, y, z)
            }),
        }
    }
}
