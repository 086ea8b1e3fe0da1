use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use immune_sim_core::{
    ContactPolicy, NanPolicy, Parameters, RunConfig, Simulation, SimulationMode,
};

mod output;

/// Immune-response simulation: bacteria, macrophages and antibodies on a
/// 3D tissue lattice coupled to a lymph-node compartment
#[derive(Parser, Debug)]
#[command(name = "immune-sim")]
#[command(about = "Coupled tissue / lymph-node immune response simulation", long_about = None)]
struct Args {
    /// Simulation mode: 0 coupled, 1 diffusion only, 2 innate only,
    /// 3 coupled without diffusion
    #[arg(short, long, default_value_t = 0)]
    mode: u8,

    /// Also write per-field grid snapshot files
    #[arg(short, long)]
    save_all: bool,

    /// Simulated length in days
    #[arg(short, long, default_value_t = 30)]
    days: u32,

    /// Number of snapshot points over the run
    #[arg(short, long, default_value_t = 720)]
    points: u32,

    /// Lymph-vessel contact policy: 0 border only, 1 homogeneous, 2 vessel map
    #[arg(long, default_value_t = 2)]
    lymph_contact: u8,

    /// Blood-vessel contact policy: 0 border only, 1 homogeneous, 2 vessel map
    #[arg(long, default_value_t = 2)]
    blood_contact: u8,

    /// Abort on the first NaN cell value instead of logging and continuing
    #[arg(long)]
    strict_nan: bool,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    output: PathBuf,
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mode = SimulationMode::from_code(args.mode)
        .ok_or_else(|| format!("unknown simulation mode {}", args.mode))?;
    let lymph_contact = ContactPolicy::from_code(args.lymph_contact)
        .ok_or_else(|| format!("unknown lymph contact policy {}", args.lymph_contact))?;
    let blood_contact = ContactPolicy::from_code(args.blood_contact)
        .ok_or_else(|| format!("unknown blood contact policy {}", args.blood_contact))?;

    let config = RunConfig {
        mode,
        save_all_fields: args.save_all,
        days: args.days,
        snapshot_points: args.points,
        lymph_contact,
        blood_contact,
        nan_policy: if args.strict_nan {
            NanPolicy::Fail
        } else {
            NanPolicy::Warn
        },
    };

    // Opening the output files must succeed before any stepping occurs
    let mut sink = output::FileSink::create(&args.output, config.save_all_fields)?;

    let mut sim = Simulation::new(config, Parameters::default());
    println!("{}", output::header(sim.params().a0));
    println!("Calculating...");

    let summary = sim.run(&mut sink)?;
    sink.finish()?;

    println!("{}", output::footer(&summary));
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
