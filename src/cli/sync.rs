use crate::cli::fixture::FixtureRemote;
use crate::cli::SyncArgs;
use crate::config::Config;
use crate::media::MemoryMediaBox;
use crate::model::SoundList;
use crate::session::SoundSession;
use crate::sync::PollOutcome;
use anyhow::{Context, Result};
use std::sync::Arc;

pub async fn execute(args: &SyncArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Invalid configuration '{}'", path.display()))?,
        None => Config::default(),
    };

    let remote = Arc::new(FixtureRemote::new(&args.fixture, args.media_dir.clone()));
    let media = Arc::new(MemoryMediaBox::new(remote.clone()));
    let session = SoundSession::new(config, remote, media)?;

    let report = session.poll_once().await?;
    match &report.outcome {
        PollOutcome::Updated {
            version, dropped, ..
        } => println!("Fetched version {} ({} items dropped)", version, dropped),
        PollOutcome::NotModified => println!("Sound list not modified"),
        PollOutcome::Unreachable => println!(
            "⚠️ Fixture '{}' unreachable, cache unchanged",
            args.fixture.display()
        ),
        PollOutcome::Cancelled => println!("Sync cancelled"),
    }
    println!(
        "Media: {} fetched, {} failed",
        report.fetch.fetched, report.fetch.failed
    );

    match session.cached_list().await? {
        Some(list) => print_sound_list(&list),
        None => println!("No sound list cached."),
    }

    if args.watch {
        session.start().await;
        println!("\nWatching for changes, press Ctrl-C to stop...");
        tokio::signal::ctrl_c().await?;
        session.shutdown().await?;
        if let Some(list) = session.cached_list().await? {
            print_sound_list(&list);
        }
    }

    if args.stats {
        println!();
        print!("{}", session.stats().render());
    }

    Ok(())
}

fn print_sound_list(list: &SoundList) {
    println!("=== Sound list (version {}) ===", list.version());
    if list.is_empty() {
        println!("(empty)");
        return;
    }
    for (index, sound) in list.sounds().iter().enumerate() {
        let file = sound.file();
        println!(
            "{:>3}. {:<32} {:<16} {:>8} bytes  {}",
            index + 1,
            file.title().unwrap_or("<untitled>"),
            sound.resource_id(),
            file.size.unwrap_or(0),
            file.mime_type
        );
    }
}
