//! In-process stand-ins for the AWS-backed sinks and the coach model

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kinethos::core::error::{AppError, AppResult};
use kinethos::llm::TextGenerator;
use kinethos::storage::{ProfileStore, UpdateRecord, UpdateStore, UpdateStream, UserProfile};

/// Stream sink that keeps every appended record
#[derive(Default)]
pub struct RecordingStream {
    pub records: Mutex<Vec<Vec<u8>>>,
}

#[async_trait]
impl UpdateStream for RecordingStream {
    async fn append(&self, data: Vec<u8>) -> AppResult<()> {
        self.records.lock().unwrap().push(data);
        Ok(())
    }
}

/// Table sink that keeps every written record
#[derive(Default)]
pub struct RecordingStore {
    pub records: Mutex<Vec<UpdateRecord>>,
}

#[async_trait]
impl UpdateStore for RecordingStore {
    async fn put_update(&self, record: &UpdateRecord) -> AppResult<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Sink that counts attempts and always fails
#[derive(Default)]
pub struct FailingSink {
    pub attempts: AtomicUsize,
}

impl FailingSink {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpdateStream for FailingSink {
    async fn append(&self, _data: Vec<u8>) -> AppResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AppError::Validation("stream unavailable".into()))
    }
}

#[async_trait]
impl UpdateStore for FailingSink {
    async fn put_update(&self, _record: &UpdateRecord) -> AppResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AppError::Validation("table unavailable".into()))
    }
}

/// Profile store that keeps every written profile
#[derive(Default)]
pub struct RecordingProfiles {
    pub profiles: Mutex<Vec<UserProfile>>,
}

impl RecordingProfiles {
    pub fn written(&self) -> Vec<UserProfile> {
        self.profiles.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileStore for RecordingProfiles {
    async fn put_profile(&self, profile: &UserProfile) -> AppResult<()> {
        self.profiles.lock().unwrap().push(profile.clone());
        Ok(())
    }
}

/// Coach model with a scripted answer
pub struct FakeGenerator {
    answer: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn answering(answer: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(answer.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
            .clone()
            .ok_or_else(|| AppError::Validation("model throttled".into()))
    }
}
