//! Shared test utilities.

#![allow(dead_code, unused_imports)]

pub mod fake_service;
pub mod mock_backend;

use std::sync::Arc;

use imagetales_client::notify::{MemorySink, NotificationSink};

pub fn sink() -> (Arc<MemorySink>, Arc<dyn NotificationSink>) {
    let memory = Arc::new(MemorySink::new());
    let shared: Arc<dyn NotificationSink> = memory.clone();
    (memory, shared)
}
