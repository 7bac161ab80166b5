pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "myflix")]
#[command(about = "myFlix CLI - catalog seeding and token issuance against the configured store")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Import movies from a YAML or JSON fixture file")]
    Seed {
        #[arg(help = "Fixture file (.yaml, .yml or .json)")]
        file: PathBuf,
    },

    #[command(about = "Issue a bearer token for an existing user")]
    Token {
        #[arg(help = "User Name")]
        name: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Seed { file } => commands::seed::handle(&file, output_format).await,
        Commands::Token { name } => commands::token::handle(&name, output_format).await,
    }
}
