#![allow(dead_code)]

use async_trait::async_trait;
use entity_shortener::prelude::*;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const DOMAIN: &str = "yourdomain.co";

pub fn settings() -> ShortenerSettings {
    ShortenerSettings::new(DOMAIN)
}

pub fn memory_shortener(settings: ShortenerSettings) -> EntityShortener<InMemoryStorage> {
    EntityShortener::new(Arc::new(InMemoryStorage::new()), settings)
}

/// Existence check answering from a script, counting every call.
///
/// Once the script is used up every further slug is reported free.
#[derive(Default)]
pub struct ScriptedExistenceCheck {
    answers: Mutex<VecDeque<Result<bool, AppError>>>,
    calls: AtomicUsize,
}

impl ScriptedExistenceCheck {
    pub fn new(answers: impl IntoIterator<Item = Result<bool, AppError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always_taken(times: usize) -> Self {
        Self::new((0..times).map(|_| Ok(true)))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExistenceCheck for ScriptedExistenceCheck {
    async fn check_exists(&self, _entity_type: &str, _slug: &str) -> Result<bool, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(false))
    }
}

/// Existence check whose backend is always down.
#[derive(Default)]
pub struct UnavailableExistenceCheck {
    calls: AtomicUsize,
    checked: Mutex<Vec<String>>,
}

impl UnavailableExistenceCheck {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Slugs passed to the check, in call order.
    pub fn checked(&self) -> Vec<String> {
        self.checked.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExistenceCheck for UnavailableExistenceCheck {
    async fn check_exists(&self, _entity_type: &str, slug: &str) -> Result<bool, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.checked.lock().unwrap().push(slug.to_string());
        Err(AppError::unavailable(
            "connection refused",
            json!({ "backend": "test" }),
        ))
    }
}
