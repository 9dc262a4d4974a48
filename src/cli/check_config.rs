use crate::cli::CheckConfigArgs;
use crate::config::Config;
use anyhow::{Context, Result};

pub fn execute(args: &CheckConfigArgs) -> Result<()> {
    let config = Config::from_file(&args.path)
        .with_context(|| format!("Invalid configuration '{}'", args.path.display()))?;

    println!("Configuration OK: {}", args.path.display());
    println!("  poll interval:   {}s", config.sync.poll_interval_secs);
    println!("  suspend check:   {}s", config.sync.suspend_check_secs);
    println!("  retry delay:     {}s", config.sync.retry_delay_secs);
    println!("  cache capacity:  {}", config.cache.max_capacity);
    println!("  cache compress:  {}", config.cache.compress);
    println!("  upload part:     {} bytes", config.upload.part_size);
    Ok(())
}
