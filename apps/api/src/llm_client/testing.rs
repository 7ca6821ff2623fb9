//! Scripted text-generation backend for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{ChatMessage, LlmError, TextGeneration};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Default)]
struct StubInner {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<RecordedCall>>,
    override_llm: Mutex<Option<StubGeneration>>,
}

/// Replays queued responses in order; an exhausted queue yields `EmptyContent`.
/// Clones share the same queue and call log.
#[derive(Clone, Default)]
pub struct StubGeneration {
    inner: Arc<StubInner>,
}

impl StubGeneration {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        let stub = Self::default();
        stub.inner.responses.lock().unwrap().extend(responses);
        stub
    }

    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    /// Generator handed out by `with_api_key`.
    pub fn with_override(self, session: StubGeneration) -> Self {
        *self.inner.override_llm.lock().unwrap() = Some(session);
        self
    }

    pub fn call_count(&self) -> usize {
        self.inner.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGeneration for StubGeneration {
    async fn complete(&self, system: &str, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.inner.calls.lock().unwrap().push(RecordedCall {
            system: system.to_string(),
            messages: messages.to_vec(),
        });
        self.inner
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }

    fn with_api_key(&self, _api_key: &str) -> Option<Arc<dyn TextGeneration>> {
        self.inner
            .override_llm
            .lock()
            .unwrap()
            .clone()
            .map(|stub| Arc::new(stub) as Arc<dyn TextGeneration>)
    }
}
