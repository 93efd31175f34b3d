//! Scripted runtime observer for tests.

use crate::error::{RuntimeResult, RuntimeUnavailableError};
use crate::observer::RuntimeObserver;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use warden_types::RuntimeSnapshot;

#[derive(Debug, Default)]
pub struct StaticObserver {
    running: Mutex<Vec<String>>,
    unavailable: Mutex<bool>,
    calls: AtomicUsize,
}

impl StaticObserver {
    pub fn new<I, S>(running: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            running: Mutex::new(running.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn set_running<I, S>(&self, running: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.running.lock().unwrap() = running.into_iter().map(Into::into).collect();
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RuntimeObserver for StaticObserver {
    async fn list_running_instances(&self) -> RuntimeResult<RuntimeSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.unavailable.lock().unwrap() {
            return Err(RuntimeUnavailableError::Unreachable(
                "docker daemon is not running".to_string(),
            ));
        }
        Ok(self.running.lock().unwrap().iter().cloned().collect())
    }

    fn backend(&self) -> &'static str {
        "static"
    }
}
