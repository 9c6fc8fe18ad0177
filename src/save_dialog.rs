use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Category, SaveRequest, SelectedResult},
    notify::{failure_notification, Notification, NotificationSink},
    prompt,
    remote::RemoteImageService,
};

const SAVE_FAILED: &str = "Failed to save image";

pub struct SaveDialogController<S> {
    service: Arc<S>,
    notifier: Arc<dyn NotificationSink>,
    selection: Option<SelectedResult>,
    title: String,
    category: Category,
    open: bool,
}

impl<S: RemoteImageService> SaveDialogController<S> {
    pub fn new(service: Arc<S>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            service,
            notifier,
            selection: None,
            title: String::new(),
            category: Category::default(),
            open: false,
        }
    }

    pub fn open(&mut self, selection: SelectedResult) {
        self.selection = Some(selection);
        self.title.clear();
        self.category = Category::default();
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selection(&self) -> Option<&SelectedResult> {
        self.selection.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn set_title<T: Into<String>>(&mut self, title: T) {
        self.title = title.into();
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    /// Saves the selection. The dialog stays open with its inputs intact on
    /// any failure so the user can retry.
    pub async fn confirm(&mut self) -> AppResult<()> {
        let request = match self.build_request() {
            Ok(request) => request,
            Err(error) => {
                self.notifier.notify(failure_notification(&error, SAVE_FAILED));
                return Err(error);
            }
        };

        if let Err(error) = self.service.save(&request).await {
            tracing::warn!(%error, title = %request.title, "save failed");
            self.notifier.notify(failure_notification(&error, SAVE_FAILED));
            return Err(error);
        }

        tracing::info!(title = %request.title, category = %request.category, "image saved");
        self.close();
        self.notifier.notify(Notification::success(
            "Image saved!",
            "Your image has been added to your gallery",
        ));
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.close();
    }

    fn build_request(&self) -> AppResult<SaveRequest> {
        let title = prompt::build_title(&self.title)?;
        let selection = self.selection.as_ref().ok_or_else(|| {
            AppError::validation("no selection", "Please generate or modify an image first")
        })?;

        Ok(SaveRequest {
            title,
            category: self.category,
            url: selection.image_url.clone(),
            prompt: selection.prompt.clone(),
        })
    }

    fn close(&mut self) {
        self.selection = None;
        self.title.clear();
        self.category = Category::default();
        self.open = false;
    }
}
