//! End-to-end tests for line-driven search sessions.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dtk_cli::session::run_session;
use dtk_core::{FetchError, Fetcher, Query, RecordingSink, SearchConfig, SearchController};
use dtk_panels::{PanelItem, TriggerMode};

#[derive(Debug, Clone)]
struct Title(String);

impl PanelItem for Title {
    fn headers() -> &'static [&'static str] {
        &["Title"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.0.clone()]
    }
}

/// Answers every query after `latency` with two titles, or nothing for "none".
struct ShelfFetcher {
    latency: Duration,
}

impl Fetcher for ShelfFetcher {
    type Item = Title;

    fn search(&self, query: &Query) -> impl Future<Output = Result<Vec<Title>, FetchError>> + Send {
        let latency = self.latency;
        let query = query.to_string();
        async move {
            tokio::time::sleep(latency).await;
            if query == "none" {
                return Ok(Vec::new());
            }
            Ok(vec![
                Title(format!("{query} volume 1")),
                Title(format!("{query} volume 2")),
            ])
        }
    }
}

fn shelf(config: &SearchConfig) -> (SearchController<ShelfFetcher>, RecordingSink) {
    let sink = RecordingSink::new();
    let fetcher = ShelfFetcher {
        latency: Duration::from_millis(100),
    };
    let controller = SearchController::new(
        "books",
        Arc::new(fetcher),
        Arc::new(sink.clone()),
        config,
    );
    (controller, sink)
}

async fn session(
    lines: &str,
    trigger: TriggerMode,
    config: &SearchConfig,
) -> (dtk_core::ControllerStats, String, RecordingSink) {
    let (controller, sink) = shelf(config);
    let mut out = Vec::new();
    let stats = run_session(controller, trigger, lines.as_bytes(), &mut out)
        .await
        .unwrap();
    (stats, String::from_utf8(out).unwrap(), sink)
}

#[tokio::test(start_paused = true)]
async fn test_typed_lines_collapse_into_one_search() {
    let (stats, out, sink) = session(
        "d\ndu\ndun\ndune\n",
        TriggerMode::Debounced,
        &SearchConfig::default(),
    )
    .await;

    assert_eq!(stats.inputs, 4);
    assert_eq!(stats.dispatched, 1);
    assert_eq!(stats.applied, 1);
    assert_eq!(sink.len(), 1);
    assert!(out.contains("[success] 2 books for \"dune\""));
    assert!(out.contains("dune volume 2"));
}

#[tokio::test(start_paused = true)]
async fn test_submitted_lines_each_search_and_latest_wins() {
    let (stats, out, sink) = session("dune\nemma\n", TriggerMode::Immediate, &SearchConfig::immediate()).await;

    assert_eq!(stats.dispatched, 2);
    assert_eq!(stats.applied, 1);
    assert_eq!(stats.stale_discarded, 1);
    assert_eq!(sink.len(), 1);
    assert!(out.contains("emma volume 1"));
    assert!(!out.contains("dune volume 1"));
}

#[tokio::test(start_paused = true)]
async fn test_empty_answer_renders_empty_line() {
    let (stats, out, sink) = session("none\n", TriggerMode::Debounced, &SearchConfig::default()).await;

    assert_eq!(stats.applied, 1);
    assert!(out.trim_end().ends_with("[empty] no books for \"none\""));
    assert_eq!(
        sink.notifications()[0].message,
        "No books found for \"none\""
    );
}

#[tokio::test(start_paused = true)]
async fn test_clear_line_returns_to_idle() {
    let (stats, out, sink) = session("dune\n:clear\n", TriggerMode::Debounced, &SearchConfig::default()).await;

    assert_eq!(stats.dispatched, 0);
    assert!(sink.is_empty());
    assert!(out.trim_end().ends_with("[idle] type to search books"));
}

#[tokio::test(start_paused = true)]
async fn test_refresh_line_searches_again() {
    let (stats, _, sink) = session("dune\n:refresh\n", TriggerMode::Immediate, &SearchConfig::immediate()).await;

    assert_eq!(stats.dispatched, 2);
    assert_eq!(stats.applied, 1);
    assert_eq!(sink.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_quit_line_stops_without_waiting() {
    let (stats, out, sink) = session(
        "dune\n:quit\nignored\n",
        TriggerMode::Debounced,
        &SearchConfig::default(),
    )
    .await;

    assert_eq!(stats.inputs, 1);
    assert_eq!(stats.dispatched, 0);
    assert!(sink.is_empty());
    assert!(!out.contains("[success]"));
}
