use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scorefill_cli::commands::{self, GenerateRequest};
use scorefill_cli::config::{self, ScorefillConfig};
use scorefill_core::models::template::TemplateGender;
use scorefill_instruments::manual::ManualEntry;

#[derive(Parser, Debug)]
#[command(name = "scorefill", version, about = "Fill psychoeducational report templates from score reports")]
struct Cli {
    /// Config file (default: <config dir>/scorefill/config.json).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract scores and write the combined report.
    Generate {
        /// Score report to extract, as <instrument>=<path>. Repeatable.
        #[arg(long = "source", value_name = "INSTRUMENT=PATH", value_parser = commands::parse_source)]
        sources: Vec<(String, PathBuf)>,

        /// Manual score, as instrument:Name=percentile. Repeatable.
        #[arg(long = "score", value_name = "ENTRY")]
        scores: Vec<ManualEntry>,

        /// JSON array of manual entries.
        #[arg(long, value_name = "FILE")]
        scores_file: Option<PathBuf>,

        #[arg(long, default_value_t = TemplateGender::Male)]
        gender: TemplateGender,

        #[arg(long, short, default_value = "report.docx")]
        output: PathBuf,
    },

    /// Show the tables an instrument's extractor reads and what it derives.
    Inspect {
        #[arg(long)]
        instrument: String,

        path: PathBuf,
    },

    /// List registered instruments.
    Instruments,
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<PathBuf>) -> eyre::Result<ScorefillConfig> {
    let explicit = path.is_some();
    let path = match path {
        Some(p) => p,
        None => config::default_config_path()?,
    };
    if !explicit && !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return config::parse_config("{}");
    }
    config::load_config(&path)
}

fn print_json<T: serde::Serialize>(value: &T) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.json);

    match cli.command {
        Command::Generate {
            sources,
            scores,
            scores_file,
            gender,
            output,
        } => {
            let config = load_config(cli.config)?;
            let summary = commands::run_generate(
                &config,
                GenerateRequest {
                    sources,
                    scores,
                    scores_file,
                    gender,
                    output,
                },
            )?;
            print_json(&summary)?;
        }
        Command::Inspect { instrument, path } => {
            let config = load_config(cli.config)?;
            print_json(&commands::inspect(&config, &instrument, &path)?)?;
        }
        Command::Instruments => {
            print_json(&commands::list_instruments())?;
        }
    }

    Ok(())
}
