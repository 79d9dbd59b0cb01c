mod fetch;
mod predict;
mod tracker;
mod web;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::fetch::{ElementSource, DEFAULT_BASE_URL};
use crate::predict::{GeodeticProjector, Sgp4Propagator};
use crate::tracker::{
    shared_registry, LogSink, PositionPipeline, SimulatedClock, Ticker, TrackingController,
};
use crate::web::config::SourceConfig;
use crate::web::Config;

#[derive(Parser)]
#[command(name = "satwatch")]
#[command(about = "Live satellite position tracking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the ticker and the HTTP API
    Serve {
        #[arg(short, long)]
        config: String,
    },
    /// Track satellites from the terminal for a number of ticks
    Track {
        /// Satellite identifiers (NORAD catalog numbers)
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long, default_value_t = 10)]
        ticks: u64,
        /// Simulated time per tick
        #[arg(long, default_value = "3s", value_parser = humantime::parse_duration)]
        step: Duration,
        /// Wall-clock time between ticks
        #[arg(long, default_value = "1s", value_parser = humantime::parse_duration)]
        interval: Duration,
        /// Read elements from a folder of TLE files instead of the network
        #[arg(long)]
        tle_folder: Option<PathBuf>,
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Validate a config file
    Validate {
        #[arg(short, long)]
        config: String,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(&config),
        Commands::Track {
            ids,
            ticks,
            step,
            interval,
            tle_folder,
            base_url,
        } => {
            let source = match tle_folder {
                Some(path) => SourceConfig::TleFolder { path },
                None => SourceConfig::Keeptrack {
                    base_url,
                    timeout: Duration::from_secs(30),
                },
            };
            track(ids, ticks, step, interval, source)
        }
        Commands::Validate { config } => validate(&config),
    }
}

fn runtime() -> Option<tokio::runtime::Runtime> {
    match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => Some(rt),
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            None
        }
    }
}

fn validate(path: &str) -> ExitCode {
    match Config::from_file(path) {
        Ok(config) => {
            println!("Config is valid");
            println!("  bind: {}", config.web.bind);
            println!(
                "  clock: step {} every {}",
                humantime::format_duration(config.clock.step),
                humantime::format_duration(config.clock.tick_interval)
            );
            println!("  initial: {}", config.initial.join(", "));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Config error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn serve(path: &str) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let Some(rt) = runtime() else {
        return ExitCode::FAILURE;
    };

    match rt.block_on(web::run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Server failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn track(
    ids: Vec<String>,
    ticks: u64,
    step: Duration,
    interval: Duration,
    source: SourceConfig,
) -> ExitCode {
    if interval.is_zero() {
        eprintln!("Interval must be positive");
        return ExitCode::FAILURE;
    }
    let Some(rt) = runtime() else {
        return ExitCode::FAILURE;
    };

    rt.block_on(async move {
        let source = match ElementSource::from_config(&source) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Element source error: {}", e);
                return ExitCode::FAILURE;
            }
        };
        let clock = match chrono::Duration::from_std(step)
            .map_err(|e| e.to_string())
            .and_then(|step| SimulatedClock::starting_now(step).map_err(|e| e.to_string()))
        {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Invalid step: {}", e);
                return ExitCode::FAILURE;
            }
        };

        let registry = shared_registry();
        let controller = TrackingController::new(registry.clone(), source);
        for id in &ids {
            match controller.request_add(id).await {
                Ok(summary) => println!("Tracking {} ({})", summary.name, summary.id),
                Err(e) => eprintln!("{}: {}", id, e),
            }
        }
        if controller.tracked().is_empty() {
            eprintln!("Nothing to track");
            return ExitCode::FAILURE;
        }

        let pipeline = PositionPipeline::new(Sgp4Propagator, GeodeticProjector::default());
        let ticker = Ticker::new(clock, pipeline, registry).with_sink(LogSink);
        let (_stop_tx, stop_rx) = tokio::sync::oneshot::channel();
        ticker.run(interval, Some(ticks), stop_rx).await;

        ExitCode::SUCCESS
    })
}
