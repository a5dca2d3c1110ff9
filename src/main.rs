mod bloom;
mod config;
mod error;
mod help;
mod icon;
mod motion;
mod particle;
mod scheduler;
mod settings;
mod spawner;
mod stage;
mod terminal;

use clap::{Parser, Subcommand};
use config::BloomConfig;
use settings::Settings;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "termbloom")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.1.0")]
#[command(about = "Terminal particle effect: floating hearts and flowers", long_about = None)]
struct Cli {
    /// Write diagnostics to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Diagnostic level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Float hearts and flowers across the terminal
    Run {
        /// Animation speed (seconds per frame, 0.001-1.0)
        #[arg(short, long, default_value = "0.03", value_parser = parse_frame_time)]
        time: f32,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Milliseconds between spawn ticks (overrides config)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Behave as if REDUCE_MOTION were set
        #[arg(long)]
        reduced_motion: bool,

        /// Don't publish the full-screen layer
        #[arg(long)]
        no_global: bool,

        /// Don't publish the centered panel
        #[arg(long)]
        no_panel: bool,
    },

    /// Show the config file location and the resolved settings
    Config,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), cli.log_level)?;

    let settings = Settings::load();

    match cli.command {
        Commands::Run {
            time,
            seed,
            interval,
            reduced_motion,
            no_global,
            no_panel,
        } => {
            let mut spawner = settings.spawner;
            if let Some(ms) = interval {
                spawner.spawn_interval_ms = ms;
            }
            spawner
                .validate()
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

            let mut layout = settings.layout;
            layout.global_layer &= !no_global;
            layout.panel &= !no_panel;

            let config = BloomConfig {
                spawner,
                mount: settings.mount,
                layout,
                time_step: time,
                seed,
                reduced_motion: motion::prefers_reduced_motion(reduced_motion),
            };
            bloom::run(config)?;
        }
        Commands::Config => {
            println!("# {}", Settings::config_path().display());
            let rendered = toml::to_string_pretty(&settings)
                .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
            print!("{}", rendered);
        }
    }

    Ok(())
}

const FRAME_TIME_RANGE: std::ops::RangeInclusive<f32> = 0.001..=1.0;

/// Seconds per frame; anything that can't become a sleep is refused
fn parse_frame_time(s: &str) -> Result<f32, String> {
    let secs: f32 = s.trim().parse().map_err(|_| format!("'{s}' is not a number"))?;
    if !secs.is_finite() {
        return Err(format!("'{s}' is not a finite number of seconds"));
    }
    if !FRAME_TIME_RANGE.contains(&secs) {
        return Err(format!(
            "{secs} is outside {}..={} seconds",
            FRAME_TIME_RANGE.start(),
            FRAME_TIME_RANGE.end()
        ));
    }
    Ok(secs)
}

/// Log to stderr, or to a file so the alternate screen stays clean
fn init_logging(path: Option<&Path>, level: LevelFilter) -> io::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            // Anything chattier than warn would scribble over the animation
            tracing_subscriber::fmt()
                .with_max_level(level.min(LevelFilter::WARN))
                .with_target(false)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_time_accepts_normal_values() {
        assert_eq!(parse_frame_time("0.03"), Ok(0.03));
        assert_eq!(parse_frame_time("1"), Ok(1.0));
        assert_eq!(parse_frame_time("0.001"), Ok(0.001));
    }

    #[test]
    fn frame_time_rejects_non_finite() {
        for input in ["inf", "-inf", "NaN", "infinity"] {
            assert!(parse_frame_time(input).is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn frame_time_rejects_out_of_range() {
        assert!(parse_frame_time("0").is_err());
        assert!(parse_frame_time("-0.5").is_err());
        assert!(parse_frame_time("5").is_err());
        assert!(parse_frame_time("fast").is_err());
    }

    #[test]
    fn cli_refuses_infinite_frame_time() {
        let result = Cli::try_parse_from(["termbloom", "run", "--time", "inf"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_accepts_frame_time() {
        let cli = Cli::try_parse_from(["termbloom", "run", "--time", "0.05"]).unwrap();
        match cli.command {
            Commands::Run { time, .. } => assert_eq!(time, 0.05),
            Commands::Config => panic!("expected run"),
        }
    }
}
