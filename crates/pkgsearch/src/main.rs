use pkgsearch::{ResultEntry, SearchConfig, SearchService, help_entries, no_results_entry, present};
use pkgsearch_core::{ParsedQuery, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Environment variable naming an optional JSON configuration file.
const CONFIG_ENV: &str = "PKGSEARCH_CONFIG";

const CLEAR_COMMAND: &str = ":clear";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => SearchConfig::load(Path::new(&path))?,
        None => SearchConfig::default(),
    };
    let service = Arc::new(SearchService::new(&config)?);
    tracing::info!(registries = ?service.registries(), "pkgsearch ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: Option<(CancellationToken, JoinHandle<()>)> = None;

    while let Some(line) = lines.next_line().await? {
        // A new line supersedes whatever is still running.
        if let Some((cancel, _)) = in_flight.take() {
            cancel.cancel();
        }

        let input = line.trim();
        if input.eq_ignore_ascii_case(CLEAR_COMMAND) {
            service.clear_cache();
            println!("cache cleared");
            continue;
        }

        let query = ParsedQuery::parse(input);
        if query.is_empty() {
            print_entries(&help_entries(&query));
            continue;
        }

        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_query(Arc::clone(&service), query, cancel.clone()));
        in_flight = Some((cancel, task));
    }

    // Let the last query finish once input is exhausted.
    if let Some((_, task)) = in_flight
        && let Err(e) = task.await
    {
        tracing::error!(error = %e, "search task failed");
    }

    Ok(())
}

async fn run_query(service: Arc<SearchService>, query: ParsedQuery, cancel: CancellationToken) {
    let results = service.search(&query, &cancel).await;
    if cancel.is_cancelled() {
        return;
    }

    if results.is_empty() {
        print_entries(&[no_results_entry(&query)]);
    } else {
        print_entries(&present(&results));
    }
}

fn print_entries(entries: &[ResultEntry]) {
    for entry in entries {
        println!("{}", entry);
    }
    println!();
}
