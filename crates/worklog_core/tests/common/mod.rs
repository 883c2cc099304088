#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Mutex;
use worklog_core::{Summarizer, SummarizerError, SummaryResult, WorkItem};

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

/// Scripted summarizer that records the item texts it was asked about.
pub struct FakeSummarizer {
    reply: Option<String>,
    reachable: bool,
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl FakeSummarizer {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            reachable: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn silent() -> Self {
        Self {
            reply: None,
            reachable: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reply: None,
            reachable: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn test_connection(&self) -> SummaryResult<()> {
        if self.reachable {
            Ok(())
        } else {
            Err(SummarizerError::Status {
                stage: "health_check",
                status: 503,
                body: "down".to_string(),
            })
        }
    }

    async fn summarize(&self, items: &[WorkItem]) -> SummaryResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push(items.iter().map(|item| item.text.clone()).collect());
        self.reply.clone().ok_or(SummarizerError::NoResponse)
    }
}
