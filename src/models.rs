use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Create,
    Modify,
    Story,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Modify => "modify",
            Self::Story => "story",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub image_url: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub text: String,
    pub image_url: String,
    pub prompt: String,
    pub timestamp: String,
}

/// Multi-scene story. Scene order is narrative order and is never re-sorted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoryResult {
    pub introduction: String,
    pub scenes: Vec<Scene>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SelectedResult {
    pub image_url: String,
    pub prompt: String,
}

impl From<&GenerationResult> for SelectedResult {
    fn from(result: &GenerationResult) -> Self {
        Self {
            image_url: result.image_url.clone(),
            prompt: result.prompt.clone(),
        }
    }
}

impl From<&Scene> for SelectedResult {
    fn from(scene: &Scene) -> Self {
        Self {
            image_url: scene.image_url.clone(),
            prompt: scene.prompt.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Nature,
    Urban,
    Art,
    Abstract,
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Nature,
        Self::Urban,
        Self::Art,
        Self::Abstract,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nature => "nature",
            Self::Urban => "urban",
            Self::Art => "art",
            Self::Abstract => "abstract",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value.trim())
            .ok_or_else(|| AppError::msg(format!("unknown category: {value}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl FromStr for CategoryFilter {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim() == "all" {
            return Ok(Self::All);
        }
        value.parse().map(Self::Only)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GalleryItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: Category,
    pub url: String,
    #[serde(rename = "likes", default)]
    pub like_count: u32,
    /// Only present on some listings; kept as the server's string form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveRequest {
    pub title: String,
    pub category: Category,
    pub url: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryScope {
    All,
    User,
}

impl GalleryScope {
    pub fn path(&self) -> &'static str {
        match self {
            Self::All => "/gallery/all",
            Self::User => "/gallery/user",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub credits: Option<u32>,
    #[serde(default)]
    pub plan: Option<String>,
}

impl UserProfile {
    pub fn plan_label(&self) -> &str {
        self.plan
            .as_deref()
            .filter(|plan| !plan.trim().is_empty())
            .unwrap_or("Free")
    }

    pub fn credits_or_zero(&self) -> u32 {
        self.credits.unwrap_or(0)
    }
}
