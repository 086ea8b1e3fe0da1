//! Single-cell reference scenario: one Euler step of the coupled model
//! without diffusion, checked against the hand-computed value.

use approx::assert_abs_diff_eq;
use immune_sim_core::{Parameters, RunConfig, Simulation, SimulationMode};

#[test]
fn one_euler_step_matches_reference_value() {
    let config = RunConfig {
        mode: SimulationMode::NoDiffusionCoupled,
        ..RunConfig::default()
    };
    let mut sim = Simulation::new(config, Parameters::default());
    sim.step().unwrap();

    // A1 = A0 + dt * (beta*A0*(1 - A0/k) - lambda_mr*MR0*A0 - m_A*A0)
    //    = 2.0 + 0.001 * (3.84 - 0.04784 - 0.2)
    assert_abs_diff_eq!(
        sim.fields().bacteria.get(0, 0, 0),
        2.00359216,
        epsilon = 1e-9
    );
}

#[test]
fn macrophages_activate_as_bacteria_are_consumed() {
    let config = RunConfig {
        mode: SimulationMode::NoDiffusionCoupled,
        ..RunConfig::default()
    };
    let mut sim = Simulation::new(config, Parameters::default());
    for _ in 0..1000 {
        sim.step().unwrap();
    }
    let fields = sim.fields();
    // Activation converts resting into active macrophages at the origin
    assert!(fields.active.get(0, 0, 0) > 0.0);
    assert!(fields.resting.get(0, 0, 0) < sim.params().m_star);
    // Off-domain cells are untouched in single-cell mode
    assert_eq!(fields.active.get(1, 0, 0), 0.0);
    assert_eq!(fields.resting.get(1, 0, 0), sim.params().m_star);
}
