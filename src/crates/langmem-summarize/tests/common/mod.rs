//! Common test utilities and setup

#![allow(dead_code)]

use async_trait::async_trait;
use langmem_core::{ChatModel, ChatRequest, ChatResponse, CoreError, Message};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Chat model that replays canned summaries and records every request.
///
/// Responses are handed out in order and wrap around once exhausted.
pub struct FakeChatModel {
    responses: Vec<String>,
    calls: Mutex<Vec<ChatRequest>>,
}

impl FakeChatModel {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut responses: Vec<String> = responses.into_iter().map(Into::into).collect();
        if responses.is_empty() {
            responses.push("This is a mock summary.".to_string());
        }
        Self {
            responses,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far
    pub fn calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Text content of the messages sent in call `index`
    pub fn prompt_texts(&self, index: usize) -> Vec<String> {
        self.calls.lock()[index]
            .messages
            .iter()
            .map(|m| m.text_content())
            .collect()
    }
}

#[async_trait]
impl ChatModel for FakeChatModel {
    fn chat(&self, request: ChatRequest) -> langmem_core::Result<ChatResponse> {
        let mut calls = self.calls.lock();
        let text = self.responses[calls.len() % self.responses.len()].clone();
        calls.push(request);
        Ok(ChatResponse::new(Message::ai(text)))
    }
}

/// Chat model that fails a fixed number of times, then succeeds.
pub struct FlakyChatModel {
    failures_left: AtomicUsize,
    attempts: AtomicUsize,
}

impl FlakyChatModel {
    pub fn new(failures: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(failures),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for FlakyChatModel {
    fn chat(&self, _request: ChatRequest) -> langmem_core::Result<ChatResponse> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures_left.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_left.store(remaining - 1, Ordering::SeqCst);
            return Err(CoreError::Model("service unavailable".to_string()));
        }
        Ok(ChatResponse::new(Message::ai("Recovered summary.")))
    }
}

/// Alternating human/ai messages with ids "1".."n"
pub fn numbered_messages(n: usize) -> Vec<Message> {
    (1..=n)
        .map(|i| {
            let turn = (i + 1) / 2;
            let msg = if i % 2 == 1 {
                Message::human(format!("Message {}", turn))
            } else {
                Message::ai(format!("Response {}", turn))
            };
            msg.with_id(i.to_string())
        })
        .collect()
}

/// The nine-message conversation used by most scenarios
pub fn nine_messages() -> Vec<Message> {
    vec![
        Message::human("Message 1").with_id("1"),
        Message::ai("Response 1").with_id("2"),
        Message::human("Message 2").with_id("3"),
        Message::ai("Response 2").with_id("4"),
        Message::human("Message 3").with_id("5"),
        Message::ai("Response 3").with_id("6"),
        Message::human("Message 4").with_id("7"),
        Message::ai("Response 4").with_id("8"),
        Message::human("Latest message").with_id("9"),
    ]
}

/// First batch of the two-round conversation
pub fn first_batch() -> Vec<Message> {
    vec![
        Message::human("Message 1").with_id("1"),
        Message::ai("Response 1").with_id("2"),
        Message::human("Message 2").with_id("3"),
        Message::ai("Response 2").with_id("4"),
        Message::human("Message 3").with_id("5"),
        Message::ai("Response 3").with_id("6"),
        Message::human("Latest message 1").with_id("7"),
    ]
}

/// Second batch of the two-round conversation
pub fn second_batch() -> Vec<Message> {
    vec![
        Message::ai("Response to latest 1").with_id("8"),
        Message::human("Message 4").with_id("9"),
        Message::ai("Response 4").with_id("10"),
        Message::human("Message 5").with_id("11"),
        Message::ai("Response 5").with_id("12"),
        Message::human("Message 6").with_id("13"),
        Message::ai("Response 6").with_id("14"),
        Message::human("Latest message 2").with_id("15"),
    ]
}

pub fn ids(messages: &[Message]) -> Vec<String> {
    messages.iter().filter_map(|m| m.id.clone()).collect()
}
