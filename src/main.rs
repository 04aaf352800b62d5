//! Roomcalc - room area and volume calculator with TUI

mod config;
mod logging;
#[cfg(feature = "tui")]
mod tui;

use anyhow::{Context, Result, bail};
use roomcalc_core::Project;
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

use logging::LogTarget;

fn print_usage() {
    eprintln!("Usage: roomcalc [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Project to open (.json, .rcalc, .csv, .txt)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <FILE>       Export to .md or .csv (non-interactive)");
    eprintln!("  --config <FILE>           Read settings from this TOML file");
    eprintln!("  --log <FILE>              Write logs to this file");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    file_path: Option<PathBuf>,
    output_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    log_file: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
enum Invocation {
    Run(CliArgs),
    Help,
}

fn parse_args(args: &[String]) -> std::result::Result<Invocation, String> {
    let mut cli = CliArgs::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(Invocation::Help),
            "-o" | "--output" => {
                i += 1;
                let path = args.get(i).ok_or("--output requires a file path")?;
                cli.output_file = Some(PathBuf::from(path));
            }
            "--config" => {
                i += 1;
                let path = args.get(i).ok_or("--config requires a file path")?;
                cli.config_file = Some(PathBuf::from(path));
            }
            "--log" => {
                i += 1;
                let path = args.get(i).ok_or("--log requires a file path")?;
                cli.log_file = Some(PathBuf::from(path));
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            arg => {
                if cli.file_path.is_some() {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                cli.file_path = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }
    Ok(Invocation::Run(cli))
}

fn run(cli: CliArgs) -> Result<()> {
    let target = match (&cli.log_file, &cli.output_file) {
        (Some(path), _) => LogTarget::File(path),
        (None, Some(_)) => LogTarget::Stderr,
        (None, None) => LogTarget::Disabled,
    };
    logging::init(target)?;

    let (config, warnings) = config::load_config(cli.config_file.as_deref());
    for warning in &warnings {
        warn!("{}", warning);
        eprintln!("Warning: {}", warning);
    }

    if let Some(output_path) = cli.output_file {
        let Some(input) = cli.file_path else {
            bail!("--output requires an input file");
        };
        if !input.exists() {
            bail!("File not found: {}", input.display());
        }
        let project = Project::with_file(Some(input.clone()), config.project_settings())
            .with_context(|| format!("Failed to load {}", input.display()))?;
        project
            .export(&output_path)
            .with_context(|| format!("Failed to export {}", output_path.display()))?;
        info!(output = %output_path.display(), "export finished");
        println!("Exported to {}", output_path.display());
        return Ok(());
    }

    run_interactive(cli, config)
}

#[cfg(feature = "tui")]
fn run_interactive(cli: CliArgs, config: config::Config) -> Result<()> {
    let project = Project::with_file(cli.file_path, config.project_settings())?;
    let mut app = tui::App::new(project, config.display.column_width);
    tui::run(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_interactive(_cli: CliArgs, _config: config::Config) -> Result<()> {
    bail!("built without the terminal UI; use --output to export")
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let cli = match parse_args(&args) {
        Ok(Invocation::Run(cli)) => cli,
        Ok(Invocation::Help) => {
            print_usage();
            return;
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
