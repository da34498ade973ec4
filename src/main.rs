use std::fs::File;
use std::io::BufRead;

use clap::{Parser, Subcommand};
use herald::core::config::{self, CliOverrides, HeraldConfig, ResolvedConfig};
use herald::core::presenter::LogPresenter;
use herald::core::{CommonError, FilterSession, NotificationQueue, NoticeKind, SemanticVersion};
use herald::store::{AppStoreClient, check_for_update};
use log::warn;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "herald", about = "Notice queue, fuzzy list filter and app update check")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank items against a search term (items from args, or stdin one per line)
    Filter {
        term: String,
        items: Vec<String>,
    },
    /// Look up the App Store listing and announce a newer version
    CheckUpdate {
        #[arg(long)]
        bundle_id: Option<String>,
        #[arg(long)]
        current_version: Option<String>,
    },
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to herald.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("herald.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("Ignoring config file: {}", e);
        HeraldConfig::default()
    });

    match args.command {
        Command::Filter { term, items } => {
            let resolved = config::resolve(&file_config, &CliOverrides::default());
            run_filter(&resolved, &term, items)
        }
        Command::CheckUpdate {
            bundle_id,
            current_version,
        } => {
            let cli = CliOverrides {
                bundle_id: bundle_id.as_deref(),
                current_version: current_version.as_deref(),
            };
            let resolved = config::resolve(&file_config, &cli);
            run_check_update(&resolved).await;
            Ok(())
        }
    }
}

fn run_filter(config: &ResolvedConfig, term: &str, items: Vec<String>) -> std::io::Result<()> {
    let items = if items.is_empty() {
        std::io::stdin().lock().lines().collect::<Result<Vec<_>, _>>()?
    } else {
        items
    };

    let mut session = FilterSession::new(config.search_threshold);
    session.update_search_term(Some(term));
    for item in session.results(&items) {
        println!("{item}");
    }
    Ok(())
}

async fn run_check_update(config: &ResolvedConfig) {
    let mut queue = NotificationQueue::new(Box::new(LogPresenter))
        .with_transient_seconds(config.transient_seconds);

    if let Err(e) = check_update(config, &mut queue).await {
        queue.enqueue_error(&e, NoticeKind::Error);
    }
}

async fn check_update(
    config: &ResolvedConfig,
    queue: &mut NotificationQueue,
) -> Result<(), CommonError> {
    let bundle_id = config
        .bundle_id
        .as_deref()
        .ok_or_else(|| CommonError::custom("No bundle id configured"))?;
    let current: SemanticVersion = config
        .current_version
        .as_deref()
        .ok_or_else(|| CommonError::custom("No current version configured"))?
        .parse()
        .map_err(|e| CommonError::custom(format!("{e}")))?;

    let client = AppStoreClient::new(Some(config.lookup_url.clone()), config.cache_ttl);
    match check_for_update(&client, bundle_id, &current).await? {
        Some(lookup) => {
            queue.enqueue(lookup.notification_notice(|url| println!("Open {url}")));
        }
        None => println!("{bundle_id} {current} is up to date"),
    }
    Ok(())
}
