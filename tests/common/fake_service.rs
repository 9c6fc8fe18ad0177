//! In-memory service that records every call.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use imagetales_client::error::{AppError, AppResult};
use imagetales_client::models::{GalleryItem, GalleryScope, SaveRequest, UserProfile};
use imagetales_client::remote::{ImagePayload, RemoteImageService};
use reqwest::{StatusCode, Url};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Generate { prompt: String },
    Modify { original_prompt: String, modification_prompt: String },
    Story { story_prompt: String, num_images: u32 },
    Save(SaveRequest),
    List(GalleryScope),
    Like(String),
    Profile,
    Fetch(String),
}

pub struct FakeService {
    base_url: Url,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<VecDeque<AppError>>,
    story_bodies: Mutex<VecDeque<Value>>,
    gallery: Mutex<Vec<GalleryItem>>,
    delay: Option<Duration>,
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            base_url: Url::parse("http://localhost:5000").unwrap(),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(VecDeque::new()),
            story_bodies: Mutex::new(VecDeque::new()),
            gallery: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_gallery(self, items: Vec<GalleryItem>) -> Self {
        *self.gallery.lock().unwrap() = items;
        self
    }

    /// The next call fails with `error` instead of answering.
    pub fn fail_next(&self, error: AppError) {
        self.failures.lock().unwrap().push_back(error);
    }

    pub fn fail_next_remote(&self, status: u16, message: Option<&str>) {
        self.fail_next(AppError::Remote {
            status: StatusCode::from_u16(status).unwrap(),
            message: message.map(str::to_string),
        });
    }

    pub fn push_story(&self, body: Value) {
        self.story_bodies.lock().unwrap().push_back(body);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn record(&self, call: Call) -> AppResult<()> {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.failures.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Server-side rewrite so tests can tell local and returned prompts apart.
pub fn normalized(prompt: &str) -> String {
    format!("{prompt}, highly detailed")
}

pub fn story_body(scenes: usize) -> Value {
    let scenes: Vec<Value> = (1..=scenes)
        .map(|n| {
            json!({
                "text": format!("Scene {n}"),
                "image": format!("/static/story/scene_{n}.png"),
                "prompt": format!("scene prompt {n}"),
                "timestamp": format!("20260101_00000{n}")
            })
        })
        .collect();
    json!({ "introduction": "Once upon a time", "scenes": scenes })
}

impl RemoteImageService for FakeService {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn generate(&self, prompt: &str) -> AppResult<ImagePayload> {
        self.record(Call::Generate {
            prompt: prompt.to_string(),
        })
        .await?;
        let n = self.call_count();
        Ok(ImagePayload {
            image: format!("/static/generated/image_{n}.png"),
            prompt: normalized(prompt),
        })
    }

    async fn modify(
        &self,
        original_prompt: &str,
        modification_prompt: &str,
    ) -> AppResult<ImagePayload> {
        self.record(Call::Modify {
            original_prompt: original_prompt.to_string(),
            modification_prompt: modification_prompt.to_string(),
        })
        .await?;
        let n = self.call_count();
        Ok(ImagePayload {
            image: format!("/static/generated/image_{n}.png"),
            prompt: format!("{original_prompt} + {modification_prompt}"),
        })
    }

    async fn story(&self, story_prompt: &str, num_images: u32) -> AppResult<Value> {
        self.record(Call::Story {
            story_prompt: story_prompt.to_string(),
            num_images,
        })
        .await?;
        Ok(self
            .story_bodies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| story_body(num_images as usize)))
    }

    async fn save(&self, request: &SaveRequest) -> AppResult<()> {
        self.record(Call::Save(request.clone())).await
    }

    async fn list_gallery(&self, scope: GalleryScope) -> AppResult<Vec<GalleryItem>> {
        self.record(Call::List(scope)).await?;
        Ok(self.gallery.lock().unwrap().clone())
    }

    async fn toggle_like(&self, id: &str) -> AppResult<()> {
        self.record(Call::Like(id.to_string())).await
    }

    async fn profile(&self) -> AppResult<UserProfile> {
        self.record(Call::Profile).await?;
        Ok(UserProfile {
            id: "u1".to_string(),
            email: "ana@example.com".to_string(),
            username: "ana".to_string(),
            credits: Some(12),
            plan: None,
        })
    }

    async fn fetch_bytes(&self, url: &str) -> AppResult<Vec<u8>> {
        self.record(Call::Fetch(url.to_string())).await?;
        Ok(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10])
    }
}
