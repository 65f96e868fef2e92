use super::Feed;
use crate::error::FetchError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Barrier;

enum MockResponse {
    Body(String),
    Status(u16),
}

/// Canned feed, optionally waiting on a barrier before answering
pub struct MockFeed {
    name: &'static str,
    response: MockResponse,
    barrier: Option<Arc<Barrier>>,
    calls: AtomicUsize,
}

impl MockFeed {
    pub fn body(name: &'static str, body: &str) -> Self {
        Self::new(name, MockResponse::Body(body.to_owned()))
    }

    pub fn status(name: &'static str, status: u16) -> Self {
        Self::new(name, MockResponse::Status(status))
    }

    fn new(name: &'static str, response: MockResponse) -> Self {
        MockFeed {
            name,
            response,
            barrier: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Feed for MockFeed {
    fn name(&self) -> &str {
        self.name
    }

    async fn fetch(&self) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        match &self.response {
            MockResponse::Body(body) => Ok(body.clone()),
            MockResponse::Status(status) => Err(FetchError::Status {
                feed: self.name.to_owned(),
                status: *status,
            }),
        }
    }
}
