use reqwest::Url;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{Scene, StoryResult},
    remote::resolve_asset_url,
};

/// Builds a renderable story from the raw `/image/story` body.
///
/// Scene order is taken verbatim from the response and image paths are
/// resolved against `base`.
pub fn assemble_story(raw: &Value, base: &Url) -> AppResult<StoryResult> {
    let scenes = raw
        .get("scenes")
        .ok_or_else(|| AppError::malformed("story response has no scenes"))?
        .as_array()
        .ok_or_else(|| AppError::malformed("story scenes is not a list"))?;

    let introduction = raw
        .get("introduction")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let scenes = scenes
        .iter()
        .enumerate()
        .map(|(index, scene)| assemble_scene(index, scene, base))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(StoryResult {
        introduction,
        scenes,
    })
}

fn assemble_scene(index: usize, scene: &Value, base: &Url) -> AppResult<Scene> {
    let image = scene
        .get("image")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::malformed(format!("scene {} has no image", index + 1)))?;

    Ok(Scene {
        text: string_field(scene, "text"),
        image_url: resolve_asset_url(base, image)?,
        prompt: string_field(scene, "prompt"),
        timestamp: string_field(scene, "timestamp"),
    })
}

fn string_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
