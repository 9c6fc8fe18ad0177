use std::{cell::RefCell, collections::HashSet, sync::Arc};

use crate::{
    error::AppResult,
    models::{CategoryFilter, GalleryItem, GalleryScope},
    notify::{failure_notification, Notification, NotificationSink},
    remote::RemoteImageService,
};

/// Local like-count projection applied after the server acknowledges a toggle.
///
/// Mirrors the service's own rule: a zero count becomes one, any other count
/// drops by one. Repeated toggles therefore oscillate instead of tracking the
/// liked state.
pub fn next_like_count(current: u32) -> u32 {
    if current == 0 {
        1
    } else {
        current - 1
    }
}

pub fn filter_by_category(items: &[GalleryItem], filter: CategoryFilter) -> Vec<GalleryItem> {
    match filter {
        CategoryFilter::All => items.to_vec(),
        CategoryFilter::Only(category) => items
            .iter()
            .filter(|item| item.category == category)
            .cloned()
            .collect(),
    }
}

/// Gallery collection plus the liked markers of this session.
///
/// Toggles on different ids may be in flight together; no borrow is held
/// across a network await, so the response that lands last wins.
pub struct GalleryInteractionStore<S> {
    service: Arc<S>,
    notifier: Arc<dyn NotificationSink>,
    items: RefCell<Vec<GalleryItem>>,
    liked: RefCell<HashSet<String>>,
}

impl<S: RemoteImageService> GalleryInteractionStore<S> {
    pub fn new(service: Arc<S>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            service,
            notifier,
            items: RefCell::new(Vec::new()),
            liked: RefCell::new(HashSet::new()),
        }
    }

    /// On failure the previous collection stays in place.
    pub async fn load(&self) -> AppResult<Vec<GalleryItem>> {
        self.load_scope(GalleryScope::All).await
    }

    pub async fn load_user(&self) -> AppResult<Vec<GalleryItem>> {
        self.load_scope(GalleryScope::User).await
    }

    async fn load_scope(&self, scope: GalleryScope) -> AppResult<Vec<GalleryItem>> {
        match self.service.list_gallery(scope).await {
            Ok(items) => {
                tracing::info!(count = items.len(), path = scope.path(), "gallery loaded");
                *self.items.borrow_mut() = items.clone();
                Ok(items)
            }
            Err(error) => {
                tracing::error!(%error, path = scope.path(), "failed to fetch gallery");
                self.notifier.notify(failure_notification(&error, "Failed to load gallery"));
                Err(error)
            }
        }
    }

    pub fn items(&self) -> Vec<GalleryItem> {
        self.items.borrow().clone()
    }

    pub fn item(&self, id: &str) -> Option<GalleryItem> {
        self.items.borrow().iter().find(|item| item.id == id).cloned()
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.liked.borrow().contains(id)
    }

    pub fn filter_by_category(&self, filter: CategoryFilter) -> Vec<GalleryItem> {
        filter_by_category(&self.items.borrow(), filter)
    }

    /// Nothing changes locally when the server rejects the toggle.
    pub async fn toggle_like(&self, id: &str) -> AppResult<()> {
        if let Err(error) = self.service.toggle_like(id).await {
            tracing::warn!(%error, id, "like toggle failed");
            self.notifier.notify(failure_notification(&error, "Failed to toggle like"));
            return Err(error);
        }

        if let Some(item) = self.items.borrow_mut().iter_mut().find(|item| item.id == id) {
            item.like_count = next_like_count(item.like_count);
            tracing::debug!(id, like_count = item.like_count, "like count projected");
        }

        let now_liked = {
            let mut liked = self.liked.borrow_mut();
            if liked.remove(id) {
                false
            } else {
                liked.insert(id.to_string());
                true
            }
        };
        let notification = if now_liked {
            Notification::success("Image liked!", "This image has been added to your favorites.")
        } else {
            Notification::success(
                "Image removed from favorites",
                "This image has been removed from your favorites.",
            )
        };
        self.notifier.notify(notification);

        Ok(())
    }
}
