//! NaN anomaly handling at the driver level: the permissive policy logs
//! the offending cells and keeps integrating, the strict policy aborts
//! the run on the first one.

use immune_sim_core::{
    FieldKind, NanPolicy, NullSink, Parameters, RunConfig, SimError, Simulation, SimulationMode,
};

/// A NaN growth rate poisons every bacteria cell on the first sweep.
fn poisoned_params() -> Parameters {
    Parameters {
        beta_a: f64::NAN,
        iter_per_day: 10.0,
        ..Parameters::default()
    }
}

fn short_config(nan_policy: NanPolicy) -> RunConfig {
    RunConfig {
        mode: SimulationMode::DiffusionOnly,
        days: 1,
        snapshot_points: 1,
        nan_policy,
        ..RunConfig::default()
    }
}

/// Route anomaly warnings through a real subscriber so the logging path
/// the permissive policy relies on is exercised, not just compiled.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("immune_sim_core=warn"))
        .with_test_writer()
        .try_init();
}

#[test]
fn permissive_policy_logs_and_keeps_integrating() {
    init_logging();
    let mut sim = Simulation::new(short_config(NanPolicy::Warn), poisoned_params());
    let summary = sim.run(&mut NullSink).unwrap();
    // The poisoned sweep completes; the recomputed aggregate skips the
    // non-positive (NaN) cells, reads as cleared and ends the run
    assert_eq!(summary.iterations, 2);
    assert_eq!(summary.final_bacteria, 0.0);
    assert!(sim.fields().bacteria.get(5, 5, 5).is_nan());
}

#[test]
fn strict_policy_aborts_on_the_first_anomaly() {
    init_logging();
    let mut sim = Simulation::new(short_config(NanPolicy::Fail), poisoned_params());
    match sim.run(&mut NullSink) {
        Err(SimError::NumericalAnomaly {
            iteration, field, ..
        }) => {
            assert_eq!(iteration, 0);
            assert_eq!(field, FieldKind::Bacteria);
        }
        other => panic!("expected a numerical anomaly, got {other:?}"),
    }
}
