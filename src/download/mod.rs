use std::{
    fs,
    path::{Path, PathBuf},
};

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use image::ImageFormat;

use crate::{
    error::{AppError, AppResult},
    notify::{Notification, NotificationSink},
    remote::RemoteImageService,
};

const FILE_PREFIX: &str = "story_image";

/// Emits exactly one notification, success or failure.
pub async fn download<S: RemoteImageService>(
    service: &S,
    notifier: &dyn NotificationSink,
    image_url: &str,
    dir: &Path,
) -> AppResult<PathBuf> {
    let outcome = async {
        let bytes = if image_url.starts_with("data:") {
            decode_image_data_url(image_url)?
        } else {
            service.fetch_bytes(image_url).await?
        };
        write_download(dir, &bytes)
    }
    .await;

    match outcome {
        Ok(path) => {
            tracing::info!(path = %path.display(), "image downloaded");
            notifier.notify(Notification::success(
                "Download started",
                "Your image is being downloaded",
            ));
            Ok(path)
        }
        Err(error) => {
            tracing::warn!(%error, image_url, "download failed");
            notifier.notify(Notification::failure(
                "Download failed",
                "Could not download the image",
            ));
            Err(error)
        }
    }
}

/// Decodes an inline `data:image/*;base64,` image. The subtype is not
/// checked; the written extension comes from the bytes themselves.
pub fn decode_image_data_url(image_url: &str) -> AppResult<Vec<u8>> {
    let (header, payload) = image_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| AppError::msg("inline image is not a data URL"))?;

    let mut params = header.split(';');
    let media_type = params.next().unwrap_or_default().trim();
    if !media_type.to_ascii_lowercase().starts_with("image/") {
        return Err(AppError::msg(format!("inline data is not an image: {media_type}")));
    }
    if !params.any(|param| param.trim().eq_ignore_ascii_case("base64")) {
        return Err(AppError::msg("inline image is not base64 encoded"));
    }

    Ok(STANDARD.decode(payload.trim())?)
}

pub fn write_download(dir: &Path, bytes: &[u8]) -> AppResult<PathBuf> {
    if bytes.is_empty() {
        return Err(AppError::msg("downloaded image is empty"));
    }

    fs::create_dir_all(dir)?;

    let stem = format!("{FILE_PREFIX}_{}", Utc::now().timestamp_millis());
    let extension = sniff_extension(bytes);
    let mut path = dir.join(format!("{stem}.{extension}"));
    let mut attempt = 1;
    while path.exists() {
        path = dir.join(format!("{stem}-{attempt}.{extension}"));
        attempt += 1;
    }

    fs::write(&path, bytes)?;
    Ok(path)
}

fn sniff_extension(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "png",
        Ok(ImageFormat::WebP) => "webp",
        Ok(ImageFormat::Gif) => "gif",
        _ => "jpeg",
    }
}
