//! Concurrent fetch-and-aggregate pipeline.
//!
//! Fans out one metadata fetch per package through a bounded worker
//! pool, ticks the progress bar once per settled fetch regardless of
//! outcome, then filters out absent results and sorts what's left.

use crate::models::PackageSizeInfo;
use crate::registry::RegistryClient;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

/// Fetch size info for every package and return the kept results,
/// sorted largest-first.
///
/// `limit` caps the number of in-flight requests; `None` launches all
/// fetches in one burst. Individual failures never abort the batch —
/// they are already absorbed into `None` by the client.
pub async fn collect_package_sizes(
    client: &RegistryClient,
    packages: &[String],
    limit: Option<usize>,
    progress: &ProgressBar,
) -> Vec<PackageSizeInfo> {
    let limit = limit.unwrap_or_else(|| packages.len()).max(1);
    debug!(
        "Fetching {} packages ({} concurrent)",
        packages.len(),
        limit
    );

    let mut sizes: Vec<PackageSizeInfo> = stream::iter(packages)
        .map(|name| async move {
            let result = client.get_package_size(name).await;
            // Exactly one tick per completed attempt, success or failure
            progress.inc(1);
            result
        })
        .buffer_unordered(limit)
        .filter_map(|result| async move { result })
        .collect()
        .await;

    sort_by_size_desc(&mut sizes);
    sizes
}

/// Sort descending by raw byte size; ties break ascending by name so
/// the report order is reproducible.
pub fn sort_by_size_desc(sizes: &mut [PackageSizeInfo]) {
    sizes.sort_by(|a, b| {
        b.raw_size
            .cmp(&a.raw_size)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Build the progress bar shown during the fetch phase.
///
/// Hidden in quiet mode; the tick-per-completion contract holds either
/// way.
pub fn fetch_progress_bar(total: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn info(name: &str, raw_size: u64) -> PackageSizeInfo {
        PackageSizeInfo::new(name, raw_size)
    }

    #[test]
    fn test_sort_by_size_desc() {
        let mut sizes = vec![info("small", 10), info("big", 4096), info("mid", 100)];

        sort_by_size_desc(&mut sizes);

        let names: Vec<_> = sizes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["big", "mid", "small"]);
    }

    #[test]
    fn test_sort_ties_break_by_name() {
        let mut sizes = vec![info("zeta", 100), info("alpha", 100), info("mu", 100)];

        sort_by_size_desc(&mut sizes);

        let names: Vec<_> = sizes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mu", "zeta"]);
    }

    #[test]
    fn test_progress_bar_hidden_in_quiet_mode() {
        let pb = fetch_progress_bar(10, false);
        assert!(pb.is_hidden());
    }

    fn mock_package(server: &MockServer, name: &str, unpacked_size: u64) {
        let path = format!("/{}", name);
        let body = json!({
            "dist-tags": { "latest": "1.0.0" },
            "versions": {
                "1.0.0": { "dist": { "unpackedSize": unpacked_size } }
            }
        });
        server.mock(move |when, then| {
            when.method(GET).path(path.clone());
            then.status(200).json_body(body.clone());
        });
    }

    #[tokio::test]
    async fn test_collect_filters_and_sorts() {
        let server = MockServer::start();
        mock_package(&server, "a", 2048);
        server.mock(|when, then| {
            when.method(GET).path("/b");
            then.status(404).json_body(json!({ "error": "Not found" }));
        });
        mock_package(&server, "c", 0);

        let client = RegistryClient::new(&server.url(""), "test-token").unwrap();
        let packages: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let progress = ProgressBar::hidden();

        let sizes = collect_package_sizes(&client, &packages, Some(2), &progress).await;

        // b is dropped; a (2048) sorts before c (0)
        assert_eq!(sizes.len(), 2);
        assert_eq!(sizes[0].name, "a");
        assert_eq!(sizes[0].size, "2.00 KB");
        assert_eq!(sizes[1].name, "c");
        assert_eq!(sizes[1].size, "0 Byte");

        // One tick per submitted package, including the failed one
        assert_eq!(progress.position(), 3);
    }

    #[tokio::test]
    async fn test_collect_ticks_once_per_package_when_all_fail() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(500);
        });

        let client = RegistryClient::new(&server.url(""), "test-token").unwrap();
        let packages: Vec<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
        let progress = ProgressBar::hidden();

        let sizes = collect_package_sizes(&client, &packages, None, &progress).await;

        assert!(sizes.is_empty());
        assert_eq!(progress.position(), 2);
    }

    #[tokio::test]
    async fn test_collect_empty_package_list() {
        let server = MockServer::start();
        let client = RegistryClient::new(&server.url(""), "test-token").unwrap();
        let progress = ProgressBar::hidden();

        let sizes = collect_package_sizes(&client, &[], None, &progress).await;

        assert!(sizes.is_empty());
        assert_eq!(progress.position(), 0);
    }
}
