//! Acceptance tests for the review feed.
//!
//! Each scenario drives the public engine API the way a list screen would:
//! initial load, scroll-settle prefetch, pull-to-refresh and "show more".

mod common;

use common::MockBackend;
use review_feed::model::ListItem;
use review_feed::source::FilePageFetcher;
use review_feed::state::{EngineConfig, PaginationEngine, RequestPhase, ScrollMetrics};
use review_feed::view_state::{BindGuard, MonospaceMeasurer, Width};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

const VIEWPORT: f64 = 800.0;

fn width() -> Width {
    Width::new(375)
}

fn config_with_page_size(page_size: usize) -> EngineConfig {
    EngineConfig {
        page_size: NonZeroUsize::new(page_size).unwrap(),
        ..EngineConfig::default()
    }
}

/// Settle the viewport at the bottom of the measured content.
fn scroll_to_bottom(engine: &mut PaginationEngine, measurer: &MonospaceMeasurer) -> bool {
    let content = engine.content_height(width(), measurer).get();
    let metrics = ScrollMetrics::new(VIEWPORT, content, (content - VIEWPORT).max(0.0));
    engine.on_scroll_settled(&metrics)
}

// ===== Scenario: scroll to the end =====

#[tokio::test]
async fn scrolling_to_the_end_loads_every_page_once() {
    let backend = MockBackend::with_reviews(45);
    let mut engine = PaginationEngine::new(backend.clone().into_fetcher(), EngineConfig::default());
    let measurer = MonospaceMeasurer::default();

    assert!(engine.start());
    while engine.phase() != RequestPhase::Exhausted {
        engine.process_next().await;
        if engine.phase() == RequestPhase::Idle {
            assert!(scroll_to_bottom(&mut engine, &measurer));
        }
    }

    let snapshot = engine.snapshot();
    assert_eq!(backend.offsets(), vec![0, 20, 40]);
    assert_eq!(snapshot.len(), 46);
    assert_eq!(snapshot.total_count, Some(45));
    assert!(matches!(snapshot.items().last(), Some(ListItem::Summary(_))));
    assert_eq!(snapshot.items().iter().filter(|i| i.is_summary()).count(), 1);

    assert!(!scroll_to_bottom(&mut engine, &measurer), "no fetch after exhaustion");
    assert_eq!(backend.offsets().len(), 3);
}

#[tokio::test]
async fn scrolling_far_from_the_bottom_does_not_prefetch() {
    let backend = MockBackend::with_reviews(100);
    let mut engine = PaginationEngine::new(backend.clone().into_fetcher(), EngineConfig::default());
    engine.start();
    engine.process_next().await;

    let fired = engine.on_scroll_settled(&ScrollMetrics::new(VIEWPORT, 10_000.0, 0.0));

    assert!(!fired);
    assert_eq!(backend.offsets(), vec![0]);
}

// ===== Scenario: transient outage =====

#[tokio::test]
async fn outage_keeps_loaded_reviews_and_resumes_at_same_offset() {
    let backend = MockBackend::with_reviews(30);
    let mut engine =
        PaginationEngine::new(backend.clone().into_fetcher(), config_with_page_size(10));
    let measurer = MonospaceMeasurer::default();

    engine.start();
    engine.process_next().await;
    backend.fail_next(2);

    for _ in 0..2 {
        assert!(scroll_to_bottom(&mut engine, &measurer));
        engine.process_next().await;
        assert_eq!(engine.phase(), RequestPhase::Errored);
        assert_eq!(engine.state().len(), 10);
    }

    assert!(scroll_to_bottom(&mut engine, &measurer));
    engine.process_next().await;

    assert_eq!(backend.offsets(), vec![0, 10, 10, 10]);
    assert_eq!(engine.state().len(), 20);
    assert_eq!(engine.phase(), RequestPhase::Idle);
}

// ===== Scenario: pull to refresh =====

#[tokio::test]
async fn refresh_restarts_from_first_page() {
    let backend = MockBackend::with_reviews(45);
    let mut engine = PaginationEngine::new(backend.clone().into_fetcher(), EngineConfig::default());
    let measurer = MonospaceMeasurer::default();

    engine.start();
    engine.process_next().await;
    engine.request_next_page();
    engine.process_next().await;
    engine.content_height(width(), &measurer);
    let before: Vec<_> = engine.snapshot().items().iter().map(ListItem::id).collect();

    engine.handle().refresh();
    engine.process_next().await;
    assert!(engine.height_cache().is_empty());
    engine.process_next().await;

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.len(), 20);
    assert_eq!(snapshot.offset, 20);
    assert_eq!(snapshot.generation.get(), 1);
    assert!(
        snapshot.items().iter().all(|item| !before.contains(&item.id())),
        "refreshed items get fresh identities"
    );
    assert_eq!(backend.offsets(), vec![0, 20, 0]);
}

// ===== Scenario: show more =====

#[tokio::test]
async fn show_more_from_another_task_grows_the_row() {
    let backend = MockBackend::with_reviews(5);
    let mut engine = PaginationEngine::new(backend.into_fetcher(), EngineConfig::default());
    let measurer = MonospaceMeasurer::default();
    engine.start();
    engine.process_next().await;

    let id = engine.state().items()[1].id();
    let collapsed = engine.measure_height(id, width(), &measurer).unwrap();

    let handle = engine.handle();
    tokio::spawn(async move {
        handle.expand_item(id);
    })
    .await
    .unwrap();
    engine.process_next().await;

    assert_eq!(engine.height_for(id, width()), None);
    let expanded = engine.measure_height(id, width(), &measurer).unwrap();
    assert!(
        expanded.get() > collapsed.get(),
        "expanded {} should exceed collapsed {}",
        expanded.get(),
        collapsed.get()
    );
}

#[tokio::test]
async fn bind_guard_rebinds_only_the_expanded_row() {
    let backend = MockBackend::with_reviews(3);
    let mut engine = PaginationEngine::new(backend.into_fetcher(), EngineConfig::default());
    engine.start();
    engine.process_next().await;
    let mut guard = BindGuard::new();

    for (slot, item) in engine.snapshot().items().iter().enumerate() {
        assert!(guard.needs_bind(slot, item));
    }
    for (slot, item) in engine.snapshot().items().iter().enumerate() {
        assert!(!guard.needs_bind(slot, item), "unchanged rows skip rebinding");
    }

    let id = engine.state().items()[0].id();
    engine.expand_item(id).unwrap();

    let snapshot = engine.snapshot();
    let rebinds: Vec<bool> = snapshot
        .items()
        .iter()
        .enumerate()
        .map(|(slot, item)| guard.needs_bind(slot, item))
        .collect();
    assert_eq!(rebinds, vec![true, false, false, false]);
}

// ===== Scenario: bundled dataset =====

#[tokio::test]
async fn demo_dataset_pages_through_file_source() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/reviews.json");
    let fetcher = FilePageFetcher::open(&path).expect("demo dataset should load");
    let total = fetcher.len();
    let mut engine = PaginationEngine::new(Arc::new(fetcher), config_with_page_size(10));

    engine.start();
    while engine.phase() != RequestPhase::Exhausted {
        engine.process_next().await;
        engine.request_next_page();
    }

    assert_eq!(total, 23);
    assert_eq!(engine.state().len(), total + 1);
}
