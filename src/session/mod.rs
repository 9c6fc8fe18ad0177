mod state;

use std::{
    cell::{Cell, RefCell},
    sync::Arc,
};

pub use state::SessionState;
use state::InFlight;

use crate::{
    chain::ModificationChain,
    error::{AppError, AppResult},
    models::{GenerationMode, GenerationResult, SelectedResult, StoryResult},
    notify::{failure_notification, Notification, NotificationSink},
    prompt,
    remote::{resolve_asset_url, ImagePayload, RemoteImageService},
    story::assemble_story,
};

const GENERATE_FAILED: &str = "Failed to generate image";
const MODIFY_FAILED: &str = "Failed to modify image";
const STORY_FAILED: &str = "Failed to generate story";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Image(GenerationResult),
    Story(StoryResult),
}

#[derive(Debug, Default)]
struct SessionData {
    result: Option<GenerationResult>,
    story: Option<StoryResult>,
    chain: ModificationChain,
}

/// Drives create, modify and story requests, one at a time.
///
/// The session is single-threaded: it is meant to live on the task that owns
/// the view, and concurrent calls interleave only at network awaits.
pub struct GenerationSession<S> {
    service: Arc<S>,
    notifier: Arc<dyn NotificationSink>,
    mode: Cell<GenerationMode>,
    state: RefCell<SessionState>,
    data: RefCell<SessionData>,
}

impl<S: RemoteImageService> GenerationSession<S> {
    pub fn new(service: Arc<S>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            service,
            notifier,
            mode: Cell::new(GenerationMode::default()),
            state: RefCell::new(SessionState::Idle),
            data: RefCell::new(SessionData::default()),
        }
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode.get()
    }

    pub fn select_mode(&self, mode: GenerationMode) -> AppResult<()> {
        if self.is_generating() {
            return Err(AppError::state(
                "mode locked while requesting",
                "Please wait for the current request to finish",
            ));
        }
        self.mode.set(mode);
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_generating(&self) -> bool {
        self.state.borrow().is_requesting()
    }

    pub fn current_result(&self) -> Option<GenerationResult> {
        self.data.borrow().result.clone()
    }

    pub fn current_story(&self) -> Option<StoryResult> {
        self.data.borrow().story.clone()
    }

    pub fn chain_head(&self) -> Option<String> {
        self.data.borrow().chain.head().map(str::to_string)
    }

    pub fn chain_history(&self) -> Vec<String> {
        self.data.borrow().chain.history().to_vec()
    }

    pub fn selection_for_result(&self) -> Option<SelectedResult> {
        self.data.borrow().result.as_ref().map(SelectedResult::from)
    }

    pub fn selection_for_scene(&self, index: usize) -> Option<SelectedResult> {
        self.data
            .borrow()
            .story
            .as_ref()
            .and_then(|story| story.scenes.get(index))
            .map(SelectedResult::from)
    }

    /// Runs the request for the selected mode. `scene_count` is only read in
    /// story mode.
    pub async fn submit(&self, text: &str, scene_count: u32) -> AppResult<SessionOutcome> {
        match self.mode() {
            GenerationMode::Create => self.generate(text).await.map(SessionOutcome::Image),
            GenerationMode::Modify => self.modify(text).await.map(SessionOutcome::Image),
            GenerationMode::Story => self
                .generate_story(text, scene_count)
                .await
                .map(SessionOutcome::Story),
        }
    }

    pub async fn generate(&self, prompt: &str) -> AppResult<GenerationResult> {
        self.ensure_idle(GenerationMode::Create)?;
        let prompt = self.precondition(prompt::build_create_prompt(prompt), GENERATE_FAILED)?;

        let flight = self.begin(GenerationMode::Create)?;
        tracing::info!(%prompt, "generating image");

        let outcome = match self.service.generate(&prompt).await {
            Ok(payload) => self.image_result(payload),
            Err(error) => Err(error),
        };

        self.finish_image(
            flight,
            outcome,
            Notification::success("Image created!", "Your image has been successfully generated"),
            GENERATE_FAILED,
        )
    }

    /// Applies `modification_prompt` to the latest server-confirmed prompt.
    pub async fn modify(&self, modification_prompt: &str) -> AppResult<GenerationResult> {
        self.ensure_idle(GenerationMode::Modify)?;
        let original_prompt = self.precondition(
            self.chain_head().ok_or_else(|| {
                AppError::state(
                    "no prior generation",
                    "Please generate an image first before modifying",
                )
            }),
            MODIFY_FAILED,
        )?;
        let modification_prompt = self.precondition(
            prompt::build_modification_prompt(modification_prompt),
            MODIFY_FAILED,
        )?;

        let flight = self.begin(GenerationMode::Modify)?;
        tracing::info!(%original_prompt, %modification_prompt, "modifying image");

        let outcome = match self
            .service
            .modify(&original_prompt, &modification_prompt)
            .await
        {
            Ok(payload) => self.image_result(payload),
            Err(error) => Err(error),
        };

        self.finish_image(
            flight,
            outcome,
            Notification::success("Image modified!", "Your image has been successfully modified"),
            MODIFY_FAILED,
        )
    }

    pub async fn generate_story(
        &self,
        story_prompt: &str,
        scene_count: u32,
    ) -> AppResult<StoryResult> {
        self.ensure_idle(GenerationMode::Story)?;
        let story_prompt = self.precondition(
            prompt::build_story_prompt(story_prompt, scene_count),
            STORY_FAILED,
        )?;

        let flight = self.begin(GenerationMode::Story)?;
        tracing::info!(%story_prompt, scene_count, "generating story");

        let outcome = match self.service.story(&story_prompt, scene_count).await {
            Ok(raw) => assemble_story(&raw, self.service.base_url()),
            Err(error) => Err(error),
        };

        match outcome {
            Ok(story) => {
                {
                    let mut data = self.data.borrow_mut();
                    data.story = Some(story.clone());
                    data.result = None;
                    data.chain.clear();
                }
                flight.succeed();
                tracing::info!(scenes = story.scenes.len(), "story ready");
                self.notifier.notify(Notification::success(
                    "Story created!",
                    "Your story with images has been generated",
                ));
                Ok(story)
            }
            Err(error) => Err(self.fail(flight, error, STORY_FAILED)),
        }
    }

    fn image_result(&self, payload: ImagePayload) -> AppResult<GenerationResult> {
        Ok(GenerationResult {
            image_url: resolve_asset_url(self.service.base_url(), &payload.image)?,
            prompt: payload.prompt,
        })
    }

    fn finish_image(
        &self,
        flight: InFlight<'_>,
        outcome: AppResult<GenerationResult>,
        success: Notification,
        fallback: &str,
    ) -> AppResult<GenerationResult> {
        match outcome {
            Ok(result) => {
                {
                    let mut data = self.data.borrow_mut();
                    data.chain.set_head(result.prompt.clone());
                    data.result = Some(result.clone());
                    data.story = None;
                }
                tracing::info!(mode = %flight.mode(), image_url = %result.image_url, "image ready");
                flight.succeed();
                self.notifier.notify(success);
                Ok(result)
            }
            Err(error) => Err(self.fail(flight, error, fallback)),
        }
    }

    fn fail(&self, flight: InFlight<'_>, error: AppError, fallback: &str) -> AppError {
        tracing::warn!(mode = %flight.mode(), %error, "request failed");
        flight.fail(error.to_string());
        self.notifier.notify(failure_notification(&error, fallback));
        error
    }

    /// Busy rejections mirror a disabled submit control: no notification.
    fn ensure_idle(&self, requested: GenerationMode) -> AppResult<()> {
        if let SessionState::Requesting(active) = *self.state.borrow() {
            tracing::debug!(%active, %requested, "rejected while a request is outstanding");
            return Err(busy());
        }
        Ok(())
    }

    fn begin(&self, mode: GenerationMode) -> AppResult<InFlight<'_>> {
        InFlight::begin(&self.state, mode).ok_or_else(busy)
    }

    fn precondition<T>(&self, checked: AppResult<T>, fallback: &str) -> AppResult<T> {
        checked.inspect_err(|error| {
            tracing::debug!(%error, "precondition failed");
            self.notifier.notify(failure_notification(error, fallback));
        })
    }
}

fn busy() -> AppError {
    AppError::state(
        "generation already in progress",
        "Please wait for the current request to finish",
    )
}
