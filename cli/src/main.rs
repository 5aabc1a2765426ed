use actuators::{ModelConfig, signal::SignalSpec};
use clap::{Parser, Subcommand, ValueEnum};
use cli::{CliErrors, replay::replay, scenario::Scenario};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
    process::ExitCode,
};
use tracing::{Level, error, info};

#[derive(Debug, Parser)]
#[command(name = "torquer", version, about, long_about = None)]
struct Cli {
    /// Maximum level of log events written to stderr
    #[arg(long, default_value = "info")]
    log_level: Level,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a scenario file and write the outputs of every tick as CSV
    Run {
        scenario: PathBuf,
        /// Output file, stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the parameters, inputs and outputs of a model
    Schema {
        #[arg(value_enum)]
        model: ModelType,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModelType {
    Magnetorquer,
    Torquer,
    MagnetorquerPayload,
}

impl From<ModelType> for ModelConfig {
    fn from(model: ModelType) -> Self {
        match model {
            ModelType::Magnetorquer => ModelConfig::Magnetorquer(Default::default()),
            ModelType::Torquer => ModelConfig::Torquer,
            ModelType::MagnetorquerPayload => ModelConfig::MagnetorquerPayload(Default::default()),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), CliErrors> {
    match command {
        Commands::Run { scenario, output } => {
            let scenario = Scenario::from_file(&scenario)?;
            let sink: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(File::create(path)?)),
                None => Box::new(io::stdout().lock()),
            };
            let (summary, _) = replay(&scenario, sink)?;
            if let Some(path) = output {
                info!(path = %path.display(), ticks = summary.ticks, "results written");
            }
        }
        Commands::Schema { model } => {
            print_schema(&ModelConfig::from(model).schema());
        }
    }
    Ok(())
}

fn print_schema(specs: &[SignalSpec]) {
    println!(
        "{:<12} {:<10} {:<8} {:<16} {}",
        "NAME", "KIND", "TYPE", "DEFAULT", "DESCRIPTION"
    );
    for spec in specs {
        println!(
            "{:<12} {:<10} {:<8} {:<16} {}",
            spec.name,
            spec.kind.to_string(),
            spec.signal_type.to_string(),
            spec.default.to_string(),
            spec.description
        );
    }
}
