use serde_json::json;

use crate::error::ApiError;
use crate::models::Video;
use crate::session::Session;
use crate::transport::ApiRequest;

/// Listing paths for use with [`crate::PagedCollection`].
pub const VIDEOS_PATH: &str = "/videos";
pub const TRENDING_PATH: &str = "/videos/trending";
pub const SEARCH_PATH: &str = "/videos/search";

/// Listing path for the videos a single user uploaded.
pub fn user_videos_path(user_id: &str) -> String {
    format!("/videos/user/{}", user_id)
}

impl Session {
    /// Fetch a single video by id.
    pub async fn video(&self, video_id: &str) -> Result<Video, ApiError> {
        self.send(ApiRequest::get(&format!("/videos/{}", video_id)))
            .await
    }

    /// Update a video's metadata; unset fields are left unchanged.
    pub async fn update_video(
        &self,
        video_id: &str,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Video, ApiError> {
        let mut body = serde_json::Map::new();
        if let Some(title) = title {
            body.insert("title".to_string(), json!(title));
        }
        if let Some(description) = description {
            body.insert("description".to_string(), json!(description));
        }
        self.send(
            ApiRequest::patch(&format!("/videos/{}", video_id))
                .with_json(serde_json::Value::Object(body)),
        )
        .await
    }

    pub async fn delete_video(&self, video_id: &str) -> Result<(), ApiError> {
        self.send_ok(ApiRequest::delete(&format!("/videos/{}", video_id)))
            .await
    }

    /// Flip a video between published and unpublished.
    pub async fn toggle_publish(&self, video_id: &str) -> Result<Video, ApiError> {
        self.send(ApiRequest::patch(&format!(
            "/videos/toggle/publish/{}",
            video_id
        )))
        .await
    }
}
