use reqwest::{RequestBuilder, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::ServiceConfig,
    error::{AppError, AppResult},
    models::{GalleryItem, GalleryScope, SaveRequest, UserProfile},
};

/// Body of a successful generate or modify call. `image` is usually a path
/// relative to the service origin.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ImagePayload {
    pub image: String,
    pub prompt: String,
}

#[allow(async_fn_in_trait)]
pub trait RemoteImageService {
    /// Origin that relative image paths are resolved against.
    fn base_url(&self) -> &Url;

    async fn generate(&self, prompt: &str) -> AppResult<ImagePayload>;

    async fn modify(
        &self,
        original_prompt: &str,
        modification_prompt: &str,
    ) -> AppResult<ImagePayload>;

    /// Returns the raw story body; shape checks happen in the story assembler.
    async fn story(&self, story_prompt: &str, num_images: u32) -> AppResult<Value>;

    async fn save(&self, request: &SaveRequest) -> AppResult<()>;

    async fn list_gallery(&self, scope: GalleryScope) -> AppResult<Vec<GalleryItem>>;

    async fn toggle_like(&self, id: &str) -> AppResult<()>;

    async fn profile(&self) -> AppResult<UserProfile>;

    async fn fetch_bytes(&self, url: &str) -> AppResult<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct HttpImageService {
    http_client: reqwest::Client,
    config: ServiceConfig,
}

#[derive(Debug, Serialize)]
struct GeneratePayload<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
struct ModifyPayload<'a> {
    original_prompt: &'a str,
    modification_prompt: &'a str,
}

#[derive(Debug, Serialize)]
struct StoryPayload<'a> {
    story_prompt: &'a str,
    num_images: u32,
}

impl HttpImageService {
    pub fn new(config: ServiceConfig) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.config
            .base_url
            .join(path)
            .map_err(|error| AppError::msg(format!("invalid endpoint {path}: {error}")))
    }

    fn like_endpoint(&self, id: &str) -> AppResult<Url> {
        if matches!(id.trim(), "" | "." | "..") {
            return Err(AppError::validation(
                "invalid image id",
                "Pick an image from the gallery.",
            ));
        }

        let mut url = self.endpoint("/gallery/like/")?;
        let url_text = url.to_string();
        url.path_segments_mut()
            .map_err(|()| AppError::msg(format!("service base url cannot hold a path: {url_text}")))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    async fn execute(&self, request: RequestBuilder) -> AppResult<String> {
        let request = match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(parse_http_error(status, &body));
        }

        Ok(body)
    }

    async fn post_json<B: Serialize>(&self, path: &str, payload: &B) -> AppResult<String> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "POST");
        self.execute(self.http_client.post(url).json(payload)).await
    }

    async fn get(&self, path: &str) -> AppResult<String> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "GET");
        self.execute(self.http_client.get(url)).await
    }
}

impl RemoteImageService for HttpImageService {
    fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    async fn generate(&self, prompt: &str) -> AppResult<ImagePayload> {
        let body = self
            .post_json("/image/generate", &GeneratePayload { prompt })
            .await?;
        decode_body(&body, "image/generate")
    }

    async fn modify(
        &self,
        original_prompt: &str,
        modification_prompt: &str,
    ) -> AppResult<ImagePayload> {
        let body = self
            .post_json(
                "/image/modify",
                &ModifyPayload {
                    original_prompt,
                    modification_prompt,
                },
            )
            .await?;
        decode_body(&body, "image/modify")
    }

    async fn story(&self, story_prompt: &str, num_images: u32) -> AppResult<Value> {
        let body = self
            .post_json(
                "/image/story",
                &StoryPayload {
                    story_prompt,
                    num_images,
                },
            )
            .await?;
        decode_body(&body, "image/story")
    }

    async fn save(&self, request: &SaveRequest) -> AppResult<()> {
        self.post_json("/image/save", request).await?;
        Ok(())
    }

    async fn list_gallery(&self, scope: GalleryScope) -> AppResult<Vec<GalleryItem>> {
        let body = self.get(scope.path()).await?;
        decode_body(&body, scope.path())
    }

    async fn toggle_like(&self, id: &str) -> AppResult<()> {
        let url = self.like_endpoint(id)?;
        tracing::debug!(%url, "POST");
        self.execute(self.http_client.post(url)).await?;
        Ok(())
    }

    async fn profile(&self) -> AppResult<UserProfile> {
        let body = self.get("/auth/profile").await?;
        decode_body(&body, "auth/profile")
    }

    async fn fetch_bytes(&self, url: &str) -> AppResult<Vec<u8>> {
        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_http_error(status, &body));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Resolves an image reference returned by the service into a fetchable URL.
/// Absolute `http(s)` and `data:` references pass through unchanged.
pub fn resolve_asset_url(base: &Url, reference: &str) -> AppResult<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(AppError::malformed("empty image reference"));
    }

    if reference.starts_with("data:")
        || reference.starts_with("http://")
        || reference.starts_with("https://")
    {
        return Ok(reference.to_string());
    }

    base.join(reference)
        .map(String::from)
        .map_err(|error| AppError::malformed(format!("invalid image path {reference}: {error}")))
}

fn decode_body<T: DeserializeOwned>(body: &str, endpoint: &str) -> AppResult<T> {
    serde_json::from_str::<T>(body)
        .map_err(|error| AppError::malformed(format!("{endpoint}: {error}")))
}

fn parse_http_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .filter(|message| !message.trim().is_empty());

    AppError::Remote { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:5000").unwrap()
    }

    #[test]
    fn relative_paths_join_the_service_origin() {
        assert_eq!(
            resolve_asset_url(&base(), "/static/generated/fox.png").unwrap(),
            "http://localhost:5000/static/generated/fox.png"
        );
    }

    #[test]
    fn absolute_references_pass_through() {
        let data = "data:image/png;base64,AAAA";
        assert_eq!(resolve_asset_url(&base(), data).unwrap(), data);
        assert_eq!(
            resolve_asset_url(&base(), "https://cdn.example.com/a.png").unwrap(),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn empty_reference_is_malformed() {
        assert!(matches!(
            resolve_asset_url(&base(), "  "),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn http_error_uses_error_field_verbatim() {
        let error = parse_http_error(StatusCode::BAD_REQUEST, r#"{"error":"Prompt is required"}"#);
        match error {
            AppError::Remote { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message.as_deref(), Some("Prompt is required"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn http_error_without_error_field_has_no_message() {
        for body in ["<html>oops</html>", r#"{"message":"nope"}"#, r#"{"error":42}"#] {
            match parse_http_error(StatusCode::INTERNAL_SERVER_ERROR, body) {
                AppError::Remote { message, .. } => assert!(message.is_none(), "{body}"),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }
}
