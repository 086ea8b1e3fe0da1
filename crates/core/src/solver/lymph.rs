//! Lymph-node compartment: the lumped ODE system coupled to the tissue.
//!
//! Five scalar variables advance once per iteration by explicit Euler in a
//! fixed order, each later equation seeing the earlier ones already
//! updated (a single Gauss-Seidel pass, not Jacobi). A variable that would
//! go negative is reset to its floor: zero for the lymph-node macrophage
//! pool, the configured steady state for the other four. The nonzero
//! floors are part of the model as published and are kept literally.

use serde::{Deserialize, Serialize};

use crate::params::Parameters;
use crate::solver::aggregate::TissueAggregates;

/// The five lymph-node state variables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LymphState {
    /// Activated macrophages in the lymph node (`MA_L`).
    pub active_macrophage: f64,
    /// T-helper lymphocytes (`Th`).
    pub t_helper: f64,
    /// B-lymphocytes (`B`).
    pub b_lymphocyte: f64,
    /// Plasma cells (`P`).
    pub plasma_cell: f64,
    /// Lymph-node antibodies (`F_L`).
    pub antibody: f64,
}

impl LymphState {
    /// Seeded state at t = 0.
    #[must_use]
    pub fn initial(p: &Parameters) -> Self {
        Self {
            active_macrophage: 0.0,
            t_helper: p.th0,
            b_lymphocyte: p.b0,
            plasma_cell: p.p0,
            antibody: p.f0,
        }
    }

    /// Advance the system one Euler step against the tissue aggregates.
    pub fn step(&mut self, p: &Parameters, agg: &TissueAggregates) {
        let dt = p.delta_t;

        self.active_macrophage += dt * p.alpha_ma * (agg.active_macrophage - self.active_macrophage);
        if self.active_macrophage < 0.0 {
            self.active_macrophage = 0.0;
        }
        let mal = self.active_macrophage;

        self.t_helper += dt
            * (p.b_th * (p.rho_t * self.t_helper * mal - self.t_helper * mal)
                - p.b_p * mal * self.t_helper * self.b_lymphocyte
                + p.alpha_t * (p.t_star - self.t_helper));
        if self.t_helper < 0.0 {
            self.t_helper = p.t_star;
        }

        self.b_lymphocyte += dt
            * (p.b_pb
                * (p.rho_b * self.t_helper * mal - self.t_helper * mal * self.b_lymphocyte)
                + p.alpha_b * (p.b_star - self.b_lymphocyte));
        if self.b_lymphocyte < 0.0 {
            self.b_lymphocyte = p.b_star;
        }

        self.plasma_cell += dt
            * (p.b_pp * p.rho_p * self.t_helper * mal * self.b_lymphocyte
                + p.alpha_p * (p.p_star - self.plasma_cell));
        if self.plasma_cell < 0.0 {
            self.plasma_cell = p.p_star;
        }

        self.antibody += dt * (p.rho_f * self.plasma_cell + p.alpha_f * (agg.antibody - self.antibody));
        if self.antibody < 0.0 {
            self.antibody = p.f_star;
        }
    }
}
