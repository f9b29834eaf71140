use anyhow::Context;
use clap::{ArgAction, Parser};
use initgen::{generate, read_config, read_sources, write_atomic, EncoderConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compile kernel init component definitions into the boot-time init table
#[derive(Parser)]
#[command(name = "initgen", author, version, about)]
struct Cli {
    /// Generated C++ source
    #[arg(short = 'o', long = "output", value_parser = output_path, required_unless_present = "check")]
    output: Option<PathBuf>,

    /// Component definition files, merged in the given order
    #[arg(required = true)]
    definitions: Vec<PathBuf>,

    /// Validate only; write nothing
    #[arg(long)]
    check: bool,

    /// Encoder configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// The output's directory must already exist
fn output_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(format!("directory `{}` does not exist", parent.display()))
        }
        _ => Ok(path),
    }
}

fn setup_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => read_config(path).context("failed to load encoder configuration")?,
        None => EncoderConfig::default(),
    };
    let sources = read_sources(&cli.definitions).context("failed to read component definitions")?;
    let text = generate(&sources, &config).context("component registry rejected")?;

    match (&cli.output, cli.check) {
        (Some(output), false) => {
            write_atomic(output, &text).context("failed to write init table")?;
            info!(path = %output.display(), "init table written");
        }
        _ => info!("component registry is valid"),
    }
    Ok(())
}
