//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了CLI命令行接口。

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "oxsound")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(name = "sync", about = "Synchronize the sound list against a JSON fixture")]
    Sync(SyncArgs),

    #[command(name = "check-config", about = "Validate a configuration file")]
    CheckConfig(CheckConfigArgs),
}

#[derive(Parser, Debug)]
pub struct SyncArgs {
    #[arg(short, long, help = "JSON fixture describing the server's sound list")]
    pub fixture: PathBuf,

    #[arg(short, long, help = "Directory holding media files named by file id")]
    pub media_dir: Option<PathBuf>,

    #[arg(short, long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Keep syncing in the background until Ctrl-C")]
    pub watch: bool,

    #[arg(long, help = "Print sync statistics")]
    pub stats: bool,
}

#[derive(Parser, Debug)]
pub struct CheckConfigArgs {
    #[arg(help = "TOML configuration file")]
    pub path: PathBuf,
}

mod check_config;
pub mod fixture;
mod sync;

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Sync(args) => sync::execute(args).await,
        Commands::CheckConfig(args) => check_config::execute(args),
    }
}
