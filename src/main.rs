use std::sync::Arc;

use hardhat::config::Config;
use hardhat::credentials::KeyringCredentials;
use hardhat::list::{RefreshStatus, TaskList};
use hardhat::message::Message;
use hardhat::runtime::{self, Runtime};

enum LaunchMode {
    Normal,
    /// Skip the network chain and show the cached rows only.
    Offline,
}

#[tokio::main]
async fn main() {
    let config = Config::load();

    // Set up logging to the systemd user journal (`journalctl --user -t hardhat -f`).
    // Wrapper filters: hardhat crate at info/debug (per config), everything else at warn.
    {
        struct FilteredJournal {
            inner: systemd_journal_logger::JournalLog,
        }

        impl log::Log for FilteredJournal {
            fn enabled(&self, metadata: &log::Metadata) -> bool {
                if metadata.target().starts_with("hardhat") {
                    let max = if hardhat::debug_logging() {
                        log::LevelFilter::Debug
                    } else {
                        log::LevelFilter::Info
                    };
                    metadata.level() <= max
                } else {
                    metadata.level() <= log::LevelFilter::Warn
                }
            }
            fn log(&self, record: &log::Record) {
                if self.enabled(record.metadata()) {
                    self.inner.log(record);
                }
            }
            fn flush(&self) {
                self.inner.flush();
            }
        }

        let journal = systemd_journal_logger::JournalLog::new()
            .unwrap()
            .with_syslog_identifier("hardhat".to_string());

        hardhat::set_debug_logging(config.debug_logging);

        log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).unwrap();
        // Global max must be Debug so hardhat debug logs can pass through when toggled
        log::set_max_level(log::LevelFilter::Debug);
    }

    // Parse CLI flags
    let args: Vec<String> = std::env::args().collect();
    let mode = if args.iter().any(|a| a == "--offline") {
        LaunchMode::Offline
    } else {
        LaunchMode::Normal
    };
    let search = args
        .iter()
        .position(|a| a == "--search")
        .and_then(|i| args.get(i + 1).cloned());

    if let Err(e) = config.ensure_dirs() {
        log::error!("Failed to create data directory: {}", e);
    }

    let (tx, mut rx) = runtime::channel();
    let runtime = match Runtime::new(&config, Arc::new(KeyringCredentials), tx) {
        Ok(r) => r,
        Err(e) => {
            log::error!("Failed to start: {}", e);
            println!("Failed to start: {}", e);
            return;
        }
    };

    let mut list = TaskList::new();
    if let Some(query) = search {
        list.update(Message::SearchChanged(query));
    }
    for effect in list.update(Message::Start) {
        runtime.perform(effect);
    }

    while let Some(message) = rx.recv().await {
        let cache_settled =
            matches!(mode, LaunchMode::Offline) && matches!(message, Message::CacheLoaded(_));
        let effects = list.update(message);

        if cache_settled {
            break;
        }
        for effect in effects {
            runtime.perform(effect);
        }
        if matches!(
            list.status(),
            RefreshStatus::Refreshed(_) | RefreshStatus::Error(_)
        ) {
            break;
        }
    }

    print_list(&list);
}

fn print_list(list: &TaskList) {
    let origin = if list.showing_cached() { "cached" } else { "fresh" };
    match list.status() {
        RefreshStatus::Error(e) => println!("Refresh failed: {}", e),
        RefreshStatus::Refreshed(at) => println!("Refreshed at {}", at),
        _ => {}
    }

    if list.query().is_empty() {
        println!("{} tasks ({})", list.visible().len(), origin);
    } else {
        println!(
            "{} of {} tasks match {:?} ({})",
            list.visible().len(),
            list.snapshot().len(),
            list.query(),
            origin
        );
    }

    for task in list.visible() {
        println!("  [{}] {}", task.task, task.title);
        if !task.description.is_empty() {
            println!("      {}", task.description);
        }
    }
}
