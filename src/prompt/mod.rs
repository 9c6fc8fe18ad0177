use crate::error::{AppError, AppResult};

pub const MIN_STORY_SCENES: u32 = 1;
pub const MAX_STORY_SCENES: u32 = 10;
pub const DEFAULT_STORY_SCENES: u32 = 3;

pub fn build_create_prompt(prompt: &str) -> AppResult<String> {
    non_empty(prompt).ok_or_else(|| {
        AppError::validation(
            "missing prompt",
            "Please enter a text prompt to generate an image",
        )
    })
}

pub fn build_modification_prompt(modification_prompt: &str) -> AppResult<String> {
    non_empty(modification_prompt).ok_or_else(|| {
        AppError::validation(
            "missing modification prompt",
            "Please enter a description of how to modify the image",
        )
    })
}

pub fn build_story_prompt(story_prompt: &str, scene_count: u32) -> AppResult<String> {
    let story_prompt = non_empty(story_prompt).ok_or_else(|| {
        AppError::validation("missing story prompt", "Please enter a story description")
    })?;

    if !(MIN_STORY_SCENES..=MAX_STORY_SCENES).contains(&scene_count) {
        return Err(AppError::validation(
            "invalid scene count",
            "Please select between 1 and 10 scenes",
        ));
    }

    Ok(story_prompt)
}

pub fn build_title(title: &str) -> AppResult<String> {
    non_empty(title).ok_or_else(|| {
        AppError::validation("title required", "Please provide a title for your image")
    })
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_prompts_are_rejected() {
        for blank in ["", "   ", "\n\t"] {
            assert_eq!(build_create_prompt(blank).unwrap_err().reason(), Some("missing prompt"));
            assert!(build_modification_prompt(blank).is_err());
            assert!(build_story_prompt(blank, 3).is_err());
            assert_eq!(build_title(blank).unwrap_err().reason(), Some("title required"));
        }
    }

    #[test]
    fn prompts_are_trimmed() {
        assert_eq!(build_create_prompt("  a red fox \n").unwrap(), "a red fox");
    }

    #[test]
    fn scene_count_must_be_within_bounds() {
        assert!(build_story_prompt("goat", 0).is_err());
        assert!(build_story_prompt("goat", 11).is_err());
        assert_eq!(
            build_story_prompt("goat", 11).unwrap_err().reason(),
            Some("invalid scene count")
        );
        assert!(build_story_prompt("goat", 1).is_ok());
        assert!(build_story_prompt("goat", 10).is_ok());
    }
}
