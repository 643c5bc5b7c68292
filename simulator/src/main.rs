use anyhow::Context;
use clap::Parser;
use generator::profile::build_track_batch;
use gui_bridge::bridge::GuiBridge;
use gui_bridge::model::VisualizationModel;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::ScenarioConfig;
use workflow::data::load_records;
use workflow::report::write_report;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Rust-facing threat-evaluation workflow driver")]
struct Args {
    /// Run a single offline batch and emit the threat report
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a scenario config from YAML
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Load track records from a whitespace-delimited data file
    #[arg(long)]
    data: Option<PathBuf>,
    /// Synthetic records to generate when no data file is given
    #[arg(long, default_value_t = 16)]
    records: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Where to write the threat report
    #[arg(long, default_value = "tools/data/threat_report.txt")]
    report: PathBuf,
    /// Keep the GUI bridge alive for incoming real-time batches
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let scenario = if let Some(path) = args.scenario {
        ScenarioConfig::load(path)?
    } else {
        ScenarioConfig::builtin()
    };

    let runner = Runner::new(scenario.clone());
    let gui_bridge = GuiBridge::new(Arc::new(runner.clone()));

    let records = if let Some(path) = args.data.as_ref() {
        load_records(path, scenario.variables.len())?
    } else {
        build_track_batch(&scenario, args.records, args.seed)
    };

    if args.offline {
        let result = runner.execute(&records)?;

        println!(
            "Offline run -> records {}, average threat {:.6}",
            result.report.scores.len(),
            result.report.average
        );

        let model = VisualizationModel::from_report(&result.report, result.notes.clone());
        gui_bridge.publish(&model)?;
        gui_bridge.publish_status("Offline threat report ready.");

        write_report(&args.report, &result.report)?;
    }
    if args.serve {
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
