//! Mock LLM provider for testing
//!
//! Returns scripted output or errors without making network calls and
//! records every request it receives.

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{LlmProvider, TextRequest, TextStream};
use crate::types::{ErrorCategory, LlmError, OverloadError, Result};

type Handler = Box<dyn Fn(&TextRequest) -> Result<Vec<Result<String>>> + Send + Sync>;

pub struct MockProvider {
    name: String,
    handler: Handler,
    calls: AtomicUsize,
    requests: Mutex<Vec<TextRequest>>,
}

impl MockProvider {
    /// Build a mock from a function producing the streamed fragments
    pub fn from_fn<F>(name: &str, handler: F) -> Self
    where
        F: Fn(&TextRequest) -> Result<Vec<Result<String>>> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            handler: Box::new(handler),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always stream `text` as a single fragment
    pub fn responding(name: &str, text: &str) -> Self {
        let text = text.to_string();
        Self::from_fn(name, move |_| Ok(vec![Ok(text.clone())]))
    }

    /// Stream `fragments` one by one
    pub fn chunked(name: &str, fragments: &[&str]) -> Self {
        let fragments: Vec<String> = fragments.iter().map(|f| f.to_string()).collect();
        Self::from_fn(name, move |_| Ok(fragments.iter().cloned().map(Ok).collect()))
    }

    /// Reject every request up front
    pub fn failing(name: &str, category: ErrorCategory) -> Self {
        let provider = name.to_string();
        Self::from_fn(name, move |_| {
            Err(LlmError::with_provider(category, "scripted failure", &provider).into())
        })
    }

    /// Stream `partial`, then fail
    pub fn failing_mid_stream(name: &str, partial: &str, category: ErrorCategory) -> Self {
        let provider = name.to_string();
        let partial = partial.to_string();
        Self::from_fn(name, move |_| {
            let err: OverloadError =
                LlmError::with_provider(category, "scripted failure", &provider).into();
            Ok(vec![Ok(partial.clone()), Err(err)])
        })
    }

    /// Upper-cases the document, so outputs are distinguishable from inputs
    pub fn shouting(name: &str) -> Self {
        Self::from_fn(name, |request| Ok(vec![Ok(request.prompt.to_uppercase())]))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<TextRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn stream(&self, request: &TextRequest) -> Result<TextStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        let fragments = (self.handler)(request)?;
        Ok(futures::stream::iter(fragments).boxed())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
