use serde_json::json;

use crate::error::ApiError;
use crate::session::Session;
use crate::transport::ApiRequest;

/// Listing paths for the per-user library views, for use with
/// [`crate::PagedCollection`].
pub const WATCH_LATER_PATH: &str = "/users/watchlater";
pub const HISTORY_PATH: &str = "/users/history";

impl Session {
    /// Save a video for later. The backend answers 400 when the video is
    /// already saved, surfaced as [`ApiError::Validation`].
    pub async fn add_to_watch_later(&self, video_id: &str) -> Result<(), ApiError> {
        self.send_ok(ApiRequest::post(WATCH_LATER_PATH).with_json(json!({ "videoId": video_id })))
            .await
    }

    pub async fn remove_from_watch_later(&self, video_id: &str) -> Result<(), ApiError> {
        self.send_ok(ApiRequest::delete(&format!(
            "{}/{}",
            WATCH_LATER_PATH, video_id
        )))
        .await
    }

    /// Record a watch in the viewing history.
    pub async fn record_watch(&self, video_id: &str) -> Result<(), ApiError> {
        self.send_ok(ApiRequest::post(HISTORY_PATH).with_json(json!({ "videoId": video_id })))
            .await
    }

    pub async fn remove_from_history(&self, video_id: &str) -> Result<(), ApiError> {
        self.send_ok(ApiRequest::delete(&format!("{}/{}", HISTORY_PATH, video_id)))
            .await
    }

    /// Wipe the entire viewing history.
    pub async fn clear_history(&self) -> Result<(), ApiError> {
        self.send_ok(ApiRequest::delete(HISTORY_PATH)).await
    }
}
