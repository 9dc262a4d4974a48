//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块是同步代理命令行的入口点。

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    oxsound::telemetry::init_tracing("oxsound", oxsound::telemetry::DEFAULT_LOG_FILTER);
    oxsound::cli::run().await
}
