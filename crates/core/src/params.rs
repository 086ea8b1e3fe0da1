//! Model parameters: rates, diffusion coefficients and initial values.
//!
//! Defaults reproduce the published parameter tables of the coupled
//! tissue / lymph-node model (Pigozzo 2011, Marchuk 1997 lineage). All
//! values are fixed at initialization and immutable for the run.

use serde::{Deserialize, Serialize};

/// Full parameter set of the model.
///
/// Field names follow the symbols used in the model literature:
/// `A` bacteria, `MR` resting macrophages, `MA` activated macrophages,
/// `F` antibodies; starred quantities are steady-state levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameters {
    /// Time step in days.
    pub delta_t: f64,
    /// Iterations per simulated day.
    pub iter_per_day: f64,
    /// Grid spacing along x, in mm.
    pub delta_x: f64,
    /// Grid spacing along y, in mm.
    pub delta_y: f64,
    /// Grid spacing along z, in mm.
    pub delta_z: f64,
    /// Bacteria tolerance: concentrations at or below this count as cleared.
    pub tol: f64,

    // Initial values
    /// Initial bacteria load in the seeded region.
    pub a0: f64,
    /// Initial activated-macrophage concentration.
    pub m0: f64,
    /// Initial antibody concentration (tissue and lymph node).
    pub f0: f64,
    /// Initial T-helper concentration.
    pub th0: f64,
    /// Initial B-lymphocyte concentration.
    pub b0: f64,
    /// Initial plasma-cell concentration.
    pub p0: f64,
    /// T-helper steady state (also the reset floor).
    pub t_star: f64,
    /// B-lymphocyte steady state (also the reset floor).
    pub b_star: f64,
    /// Plasma-cell steady state (also the reset floor).
    pub p_star: f64,
    /// Lymph-node antibody steady state (also the reset floor).
    pub f_star: f64,
    /// Resting-macrophage steady state, used both as the initial
    /// condition and as the recruitment target.
    pub m_star: f64,

    // Diffusion coefficients
    /// Bacteria diffusion (Haessler).
    pub d_a: f64,
    /// Resting-macrophage diffusion (estimated).
    pub d_mr: f64,
    /// Activated-macrophage diffusion (estimated).
    pub d_ma: f64,
    /// Antibody diffusion (estimated).
    pub d_f: f64,

    // Replication, decay, activation and phagocytosis rates
    /// Bacteria replication rate.
    pub beta_a: f64,
    /// Bacteria carrying capacity.
    pub k_a: f64,
    /// Bacteria natural decay.
    pub m_a: f64,
    /// Resting-macrophage natural decay.
    pub m_mr: f64,
    /// Activated-macrophage natural decay.
    pub m_ma: f64,
    /// Macrophage activation rate.
    pub gamma_ma: f64,
    /// Resting-macrophage phagocytosis rate.
    pub lambda_mr: f64,
    /// Activated-macrophage phagocytosis rate.
    pub lambda_ma: f64,
    /// Resting-macrophage phagocytosis rate for opsonized bacteria.
    pub lambda_afmr: f64,
    /// Activated-macrophage phagocytosis rate for opsonized bacteria.
    pub lambda_afma: f64,

    // Coupling coefficients of the lymph-node system
    /// Activated-macrophage migration to the lymph node.
    pub alpha_ma: f64,
    /// T-helper natural decay.
    pub alpha_t: f64,
    /// B-lymphocyte natural decay.
    pub alpha_b: f64,
    /// Plasma-cell decay.
    pub alpha_p: f64,
    /// Antibody migration between compartments.
    pub alpha_f: f64,
    /// Resting-macrophage recruitment coefficient.
    pub alpha_mr: f64,
    /// T-helper stimulus coefficient.
    pub b_th: f64,
    /// T-helper expenditure while stimulating B-lymphocytes.
    pub b_p: f64,
    /// B-lymphocyte stimulus coefficient.
    pub b_pb: f64,
    /// B-lymphocyte stimulus in the plasma-cell equation.
    pub b_pp: f64,
    /// T-helper descendants per division.
    pub rho_t: f64,
    /// B-lymphocyte descendants per division.
    pub rho_b: f64,
    /// Plasma-cell descendants per division.
    pub rho_p: f64,
    /// Antibody release rate per plasma cell.
    pub rho_f: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            delta_t: 0.001,
            iter_per_day: 10_000.0,
            delta_x: 0.1,
            delta_y: 0.1,
            delta_z: 0.1,
            tol: 1e-6,

            a0: 2.0,
            m0: 0.0,
            f0: 0.0,
            th0: 0.0,
            b0: 0.0,
            p0: 0.0,
            t_star: 8.4e-3,
            b_star: 8.4e-4,
            p_star: 8.4e-6,
            f_star: 0.0,
            m_star: 4.0,

            d_a: 0.00037,
            d_mr: 0.0432,
            d_ma: 0.3,
            d_f: 0.016,

            beta_a: 2.0,
            k_a: 50.0,
            m_a: 0.1,
            m_mr: 0.033,
            m_ma: 0.07,
            gamma_ma: 8.30e-2,
            lambda_mr: 5.98e-3,
            lambda_ma: 5.98e-2,
            lambda_afmr: 1.66e-3,
            lambda_afma: 7.14e-2,

            alpha_ma: 0.001,
            alpha_t: 0.01,
            alpha_b: 1.0,
            alpha_p: 5.0,
            alpha_f: 0.43,
            alpha_mr: 4.0,
            b_th: 1.7e-2,
            b_p: 1e5,
            b_pb: 6.02e3,
            b_pp: 2.3e6,
            rho_t: 2.0,
            rho_b: 16.0,
            rho_p: 3.0,
            rho_f: 5.1e4,
        }
    }
}

impl Parameters {
    /// Total number of iterations for a run of `days` days.
    #[must_use]
    pub fn total_iterations(&self, days: u32) -> u64 {
        (self.iter_per_day * f64::from(days)) as u64
    }
}
