//! Test doubles for driving the engine deterministically.
//!
//! [`ScriptedFetcher`] replays queued responses in call order and records
//! every call. Gated responses stay pending until the test releases them,
//! which lets tests choose the arrival order of concurrent fetches.

use crate::model::{FetchError, Page, RawReview};
use crate::source::PageFetcher;
use crate::view_state::{FontSpec, TextMeasurer};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

type FetchResult = Result<Page, FetchError>;

enum Scripted {
    Ready(FetchResult),
    Gated(oneshot::Receiver<FetchResult>),
    Panic,
}

#[derive(Default)]
struct Script {
    responses: VecDeque<Scripted>,
    calls: Vec<(usize, usize)>,
}

/// Page fetcher replaying scripted responses.
#[derive(Clone, Default)]
pub struct ScriptedFetcher {
    script: Arc<Mutex<Script>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, page: Page) {
        self.push(Scripted::Ready(Ok(page)));
    }

    pub fn push_error(&self, error: FetchError) {
        self.push(Scripted::Ready(Err(error)));
    }

    /// Queue a fetch that panics instead of answering.
    pub fn push_panic(&self) {
        self.push(Scripted::Panic);
    }

    /// Queue a response that completes when the returned sender fires.
    pub fn push_gated(&self) -> oneshot::Sender<FetchResult> {
        let (tx, rx) = oneshot::channel();
        self.push(Scripted::Gated(rx));
        tx
    }

    /// `(offset, limit)` of every fetch so far.
    pub fn calls(&self) -> Vec<(usize, usize)> {
        self.script.lock().unwrap().calls.clone()
    }

    /// Yield until at least `count` fetches have started.
    pub async fn wait_for_calls(&self, count: usize) {
        while self.calls().len() < count {
            tokio::task::yield_now().await;
        }
    }

    fn push(&self, response: Scripted) {
        self.script.lock().unwrap().responses.push_back(response);
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, offset: usize, limit: usize) -> Result<Page, FetchError> {
        let next = {
            let mut script = self.script.lock().unwrap();
            script.calls.push((offset, limit));
            script.responses.pop_front()
        };

        match next {
            Some(Scripted::Ready(result)) => result,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::Transport("gate dropped".to_string()))),
            Some(Scripted::Panic) => panic!("scripted fetcher panic at offset {offset}"),
            None => Err(FetchError::Transport("no scripted response".to_string())),
        }
    }
}

/// A review whose last name is its dataset index.
pub fn raw_review(index: usize) -> RawReview {
    RawReview {
        first_name: "Reviewer".to_string(),
        last_name: index.to_string(),
        rating: (index % 5 + 1) as i64,
        text: format!("Review number {index}\nsecond paragraph\nthird\nfourth\nfifth\nsixth"),
        created_at: format!("day {index}"),
        photo_urls: Vec::new(),
    }
}

/// Page of reviews `start..start + count` out of `total`.
pub fn review_page(start: usize, count: usize, total: usize) -> Page {
    Page::new((start..start + count).map(raw_review).collect(), total)
}

/// Measurer reporting one line per paragraph and counting its calls.
#[derive(Default)]
pub struct CountingMeasurer {
    calls: AtomicUsize,
}

impl CountingMeasurer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextMeasurer for CountingMeasurer {
    fn measure(&self, text: &str, font: &FontSpec, _max_width: f64, max_lines: usize) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.is_empty() {
            return 0.0;
        }
        let lines = text.split('\n').count();
        let lines = if max_lines == 0 { lines } else { lines.min(max_lines) };
        lines as f64 * font.line_height
    }
}
