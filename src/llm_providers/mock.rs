use std::pin::Pin;
use std::sync::{Arc, Mutex};

use super::traits::{LLMError, LLMProvider};

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Empty,
    Unavailable,
}

/// Canned provider that records what it was asked.
#[derive(Debug, Clone)]
pub struct MockLLMProvider {
    reply: MockReply,
    pub calls: Arc<Mutex<usize>>,
    pub last_input: Arc<Mutex<Option<String>>>,
}

impl MockLLMProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Text(reply.into()))
    }

    pub fn empty() -> Self {
        Self::with_reply(MockReply::Empty)
    }

    pub fn unavailable() -> Self {
        Self::with_reply(MockReply::Unavailable)
    }

    fn with_reply(reply: MockReply) -> Self {
        Self {
            reply,
            calls: Arc::new(Mutex::new(0)),
            last_input: Arc::new(Mutex::new(None)),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    pub fn last_input(&self) -> Option<String> {
        self.last_input.lock().unwrap().clone()
    }
}

impl LLMProvider for MockLLMProvider {
    fn query<'a>(
        &'a self,
        input: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, LLMError>> + Send + 'a>> {
        Box::pin(async move {
            *self.calls.lock().unwrap() += 1;
            *self.last_input.lock().unwrap() = Some(input.to_string());
            match &self.reply {
                MockReply::Text(text) => Ok(text.clone()),
                MockReply::Empty => Err(LLMError::EmptyResponse),
                MockReply::Unavailable => Err(LLMError::Network("connection refused".into())),
            }
        })
    }
}
