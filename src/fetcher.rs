use std::future::Future;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};

/// Upper bound on in-flight fetches, whatever the caller asks for.
pub const MAX_CONCURRENCY: usize = 1024;

/// Clamp a requested concurrency into `1..=MAX_CONCURRENCY`.
pub fn clamp_concurrency(requested: usize) -> usize {
    requested.clamp(1, MAX_CONCURRENCY)
}

/// Run `fetch` over every url with at most `concurrency` in flight and
/// return the results in input order.
///
/// Each task reports `(slot, value)` and the collector writes into a vector
/// pre-sized to the input, so completion order never leaks into the output.
/// Returns once every task has reported or exited; a task that dies without
/// reporting leaves `T::default()` in its slot.
pub async fn fetch_all<T, F, Fut>(urls: Vec<String>, concurrency: usize, fetch: F) -> Vec<T>
where
    T: Default + Send + 'static,
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    let total = urls.len();
    let concurrency = clamp_concurrency(concurrency);
    let fetch = Arc::new(fetch);
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let pb = progress_bar(total);

    // Channel: workers send results, collector drops them into their slot
    let (tx, mut rx) = mpsc::channel::<(usize, T)>(concurrency * 2);

    for (slot, url) in urls.into_iter().enumerate() {
        let fetch = Arc::clone(&fetch);
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            let Ok(_permit) = sem.acquire_owned().await else {
                return;
            };
            let value = fetch(url).await;
            let _ = tx.send((slot, value)).await;
        });
    }

    // Drop our copy of tx so rx closes when all spawned tasks finish
    drop(tx);

    let mut results: Vec<Option<T>> = std::iter::repeat_with(|| None).take(total).collect();
    while let Some((slot, value)) = rx.recv().await {
        results[slot] = Some(value);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let mut missing = 0usize;
    let results: Vec<T> = results
        .into_iter()
        .enumerate()
        .map(|(slot, value)| {
            value.unwrap_or_else(|| {
                missing += 1;
                warn!(slot, "worker exited without a result");
                T::default()
            })
        })
        .collect();

    info!("Fetched {} pages ({} lost workers)", total, missing);
    results
}

fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}
