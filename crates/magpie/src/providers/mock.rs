use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;

use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::providers::base::{Provider, Usage};

/// A mock provider that returns pre-configured responses for testing
pub struct MockProvider {
    responses: Arc<Mutex<Vec<Message>>>,
    fail_when_exhausted: bool,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of responses
    pub fn new(responses: Vec<Message>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            fail_when_exhausted: false,
        }
    }

    /// A mock provider that errors once the scripted responses run out,
    /// for exercising backend-failure handling mid-turn
    pub fn fail_when_exhausted(responses: Vec<Message>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            fail_when_exhausted: true,
        }
    }

    /// A mock provider whose every call fails
    pub fn failing() -> Self {
        Self::fail_when_exhausted(Vec::new())
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, _messages: &[Message], _tools: &[Tool]) -> Result<(Message, Usage)> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            if self.fail_when_exhausted {
                Err(anyhow!("mock provider: no response available"))
            } else {
                // Return empty response if no more pre-configured responses
                Ok((Message::assistant().with_text(""), Usage::default()))
            }
        } else {
            Ok((responses.remove(0), Usage::default()))
        }
    }
}
