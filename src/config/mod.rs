pub mod settings;
pub mod toml_config;

use crate::utils::logger::LogFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use settings::Settings;
pub use toml_config::TomlConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "car-price-api")]
#[command(about = "Serve a pre-trained car price regression model over HTTP")]
pub struct CliConfig {
    #[arg(long, short, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "CAR_PRICE_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    #[arg(long, env = "MODEL_PATH", help = "Path to the JSON model bundle")]
    pub model_path: Option<String>,

    #[arg(long, env = "LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Run one prediction and print the raw price
    Predict {
        /// JSON object, or @path to a file containing one
        #[arg(long)]
        input: String,
    },
}
