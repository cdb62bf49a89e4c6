mod aggregate;
mod calibrate;
mod config_cmd;
mod evaluate;
mod render;
mod simulate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, OutputFormat};

pub use aggregate::AggregateCommand;
pub use calibrate::CalibrateCommand;
pub use evaluate::EvaluateCommand;
pub use simulate::SimulateCommand;

#[derive(Parser)]
#[command(name = "fitscore")]
#[command(about = "Score standardized fitness tests from sensor and vision data", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "FITSCORE_CONFIG")]
    config: Option<PathBuf>,

    /// Output format, overriding the configuration file
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a pixels-per-cm scale from a reference object
    Calibrate(CalibrateCommand),

    /// Evaluate one test from a JSON inputs file
    Evaluate(EvaluateCommand),

    /// Produce a labelled simulated estimate for an upload-only test
    Simulate(SimulateCommand),

    /// Normalize and combine a set of results into an overall score
    Aggregate(AggregateCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Print the configuration file location
    Path,
}

/// Settings every subcommand renders with
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::info!("Verbose mode enabled");
        }
        let config_path = self.config.as_deref();

        match &self.command {
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(config_path),
                ConfigSubcommands::Init { force } => config_cmd::init_config(config_path, *force),
                ConfigSubcommands::Path => config_cmd::config_path(config_path),
            },
            Commands::Completions { shell } => {
                generate_completions(*shell);
                Ok(())
            }
            Commands::Calibrate(cmd) => cmd.execute(&self.context()?),
            Commands::Evaluate(cmd) => cmd.execute(&self.context()?),
            Commands::Simulate(cmd) => cmd.execute(&self.context()?),
            Commands::Aggregate(cmd) => cmd.execute(&self.context()?),
        }
    }

    fn context(&self) -> Result<Context> {
        let config = Config::load(self.config.as_deref())?;
        let format = self.format.unwrap_or(config.output.format);
        if self.no_color || !config.output.color {
            colored::control::set_override(false);
        }
        Ok(Context { config, format })
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
