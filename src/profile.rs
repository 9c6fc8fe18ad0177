use crate::{
    error::{AppError, AppResult},
    models::{GalleryItem, GalleryScope, UserProfile},
    remote::RemoteImageService,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub user: UserProfile,
    pub images: Vec<GalleryItem>,
}

impl ProfileView {
    /// Fetches the profile, then the user's gallery. Either failure aborts the
    /// whole view; callers usually send the user back to sign-in.
    pub async fn load<S: RemoteImageService>(service: &S) -> AppResult<Self> {
        let loaded = async {
            let user = service.profile().await?;
            let images = service.list_gallery(GalleryScope::User).await?;
            Ok::<_, AppError>(Self { user, images })
        }
        .await;

        if let Err(error) = &loaded {
            tracing::error!(%error, "failed to fetch profile");
        }
        loaded
    }

    pub fn total_likes(&self) -> u64 {
        self.images.iter().map(|image| u64::from(image.like_count)).sum()
    }
}
