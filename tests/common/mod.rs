//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use review_feed::model::{FetchError, Page, RawReview};
use review_feed::source::PageFetcher;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockState {
    offsets: Vec<usize>,
    failures_left: usize,
}

/// In-memory review backend with injectable failures.
#[derive(Clone)]
pub struct MockBackend {
    reviews: Arc<Vec<RawReview>>,
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn with_reviews(count: usize) -> Self {
        Self {
            reviews: Arc::new((0..count).map(review).collect()),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Fail the next `count` fetches with a transport error.
    pub fn fail_next(&self, count: usize) {
        self.state.lock().unwrap().failures_left = count;
    }

    /// Offsets of every fetch so far, in call order.
    pub fn offsets(&self) -> Vec<usize> {
        self.state.lock().unwrap().offsets.clone()
    }

    pub fn into_fetcher(self) -> Arc<dyn PageFetcher> {
        Arc::new(self)
    }
}

#[async_trait]
impl PageFetcher for MockBackend {
    async fn fetch(&self, offset: usize, limit: usize) -> Result<Page, FetchError> {
        {
            let mut state = self.state.lock().unwrap();
            state.offsets.push(offset);
            if state.failures_left > 0 {
                state.failures_left -= 1;
                return Err(FetchError::Transport("simulated outage".to_string()));
            }
        }

        let start = offset.min(self.reviews.len());
        let end = offset.saturating_add(limit).min(self.reviews.len());
        Ok(Page::new(self.reviews[start..end].to_vec(), self.reviews.len()))
    }
}

pub fn review(index: usize) -> RawReview {
    RawReview {
        first_name: "Guest".to_string(),
        last_name: format!("#{index}"),
        rating: (index % 5 + 1) as i64,
        text: format!(
            "Stayed here in week {index}. Friendly staff and a quiet room.\n\
             Breakfast was fine.\nThe lift was slow.\nWould book again.\nThanks!"
        ),
        created_at: format!("{} March", index % 28 + 1),
        photo_urls: if index % 3 == 0 {
            vec![Some(format!("https://example.com/{index}.jpg"))]
        } else {
            Vec::new()
        },
    }
}
