pub mod chain;
pub mod config;
pub mod download;
pub mod error;
pub mod gallery;
pub mod models;
pub mod notify;
pub mod profile;
pub mod prompt;
pub mod remote;
pub mod save_dialog;
pub mod session;
pub mod story;

use std::sync::Arc;

use config::ServiceConfig;
use error::AppResult;
use gallery::GalleryInteractionStore;
use notify::NotificationSink;
use remote::{HttpImageService, RemoteImageService};
use save_dialog::SaveDialogController;
use session::GenerationSession;

pub use config::load_env_files;
pub use error::AppError;

pub struct AppState<S> {
    pub service: Arc<S>,
    pub notifier: Arc<dyn NotificationSink>,
    pub session: GenerationSession<S>,
    pub gallery: GalleryInteractionStore<S>,
    pub save_dialog: SaveDialogController<S>,
}

impl<S: RemoteImageService> AppState<S> {
    pub fn new(service: Arc<S>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            session: GenerationSession::new(service.clone(), notifier.clone()),
            gallery: GalleryInteractionStore::new(service.clone(), notifier.clone()),
            save_dialog: SaveDialogController::new(service.clone(), notifier.clone()),
            service,
            notifier,
        }
    }
}

impl AppState<HttpImageService> {
    pub fn from_config(
        config: ServiceConfig,
        notifier: Arc<dyn NotificationSink>,
    ) -> AppResult<Self> {
        Ok(Self::new(Arc::new(HttpImageService::new(config)?), notifier))
    }
}
