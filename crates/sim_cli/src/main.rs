//! Scenario runner CLI: run a scenario file and print the monitor report,
//! or generate a random scenario in the record format.

use std::fs;
use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand};
use serde::Serialize;

use sim_core::monitor::{Monitor, MonitorReport};
use sim_core::runner::{run_until_empty_with_hook, simulation_schedule};
use sim_core::scenario::{
    build_world, generate_scenario, parse_scenario, seed_scenario, ScenarioError, ScenarioParams,
    SimulationEndTime,
};

#[derive(Parser)]
#[command(
    name = "sim_cli",
    about = "Discrete-event ride-matching simulation runner"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file and print the report as JSON
    Run {
        /// Scenario file path
        file: PathBuf,
        /// Safety bound on the number of processed events
        #[arg(long, default_value_t = 1_000_000)]
        max_steps: usize,
        /// Stop before processing events at or after this tick
        #[arg(long)]
        end_time: Option<u64>,
        /// Trace each processed event to stderr
        #[arg(long)]
        verbose: bool,
    },
    /// Generate a random scenario in the record format
    Generate {
        #[arg(long, default_value_t = 100)]
        riders: usize,
        #[arg(long, default_value_t = 20)]
        drivers: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 100)]
        grid_rows: i64,
        #[arg(long, default_value_t = 100)]
        grid_cols: i64,
        /// Request window in ticks
        #[arg(long, default_value_t = 1_000)]
        window: u64,
        /// Output file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// What a finished run looked like, printed as JSON.
#[derive(Debug, Serialize)]
struct RunSummary {
    steps: usize,
    simulation_time: u64,
    report: MonitorReport,
}

fn run_scenario(
    input: &str,
    max_steps: usize,
    end_time: Option<u64>,
    verbose: bool,
) -> Result<RunSummary, ScenarioError> {
    let events = parse_scenario(input)?;
    let mut world = build_world();
    if let Some(end) = end_time {
        world.insert_resource(SimulationEndTime(end));
    }
    seed_scenario(&mut world, &events);

    let mut schedule = simulation_schedule();
    let steps = run_until_empty_with_hook(&mut world, &mut schedule, max_steps, |_, event| {
        if verbose {
            eprintln!("t={} {:?}", event.timestamp, event.kind);
        }
    });

    let simulation_time = world
        .resource::<sim_core::clock::SimulationClock>()
        .now();
    let report = world.resource::<Monitor>().report();
    Ok(RunSummary {
        steps,
        simulation_time,
        report,
    })
}

fn format_records(params: &ScenarioParams) -> String {
    let mut out = String::new();
    for event in generate_scenario(params) {
        out.push_str(&event.to_string());
        out.push('\n');
    }
    out
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            file,
            max_steps,
            end_time,
            verbose,
        } => {
            let input = match fs::read_to_string(&file) {
                Ok(input) => input,
                Err(err) => {
                    eprintln!("error: cannot read {}: {err}", file.display());
                    exit(1);
                }
            };
            match run_scenario(&input, max_steps, end_time, verbose) {
                Ok(summary) => {
                    let json =
                        serde_json::to_string_pretty(&summary).expect("summary serializes");
                    println!("{json}");
                }
                Err(err) => {
                    eprintln!("error: {err}");
                    exit(1);
                }
            }
        }
        Commands::Generate {
            riders,
            drivers,
            seed,
            grid_rows,
            grid_cols,
            window,
            output,
        } => {
            let params = ScenarioParams {
                num_riders: riders,
                num_drivers: drivers,
                ..Default::default()
            }
            .with_seed(seed)
            .with_grid(grid_rows, grid_cols)
            .with_request_window(window);
            let records = format_records(&params);
            match output {
                Some(path) => {
                    if let Err(err) = fs::write(&path, records) {
                        eprintln!("error: cannot write {}: {err}", path.display());
                        exit(1);
                    }
                }
                None => print!("{records}"),
            }
        }
    }
}
