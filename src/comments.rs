use serde_json::json;

use crate::error::ApiError;
use crate::models::Comment;
use crate::session::Session;
use crate::transport::ApiRequest;

/// Listing path for a video's comment thread, for use with
/// [`crate::PagedCollection`].
pub fn comments_path(video_id: &str) -> String {
    format!("/comments/{}", video_id)
}

impl Session {
    pub async fn post_comment(&self, video_id: &str, content: &str) -> Result<Comment, ApiError> {
        self.send(
            ApiRequest::post(&format!("/comments/{}", video_id))
                .with_json(json!({ "content": content })),
        )
        .await
    }

    pub async fn update_comment(
        &self,
        comment_id: &str,
        content: &str,
    ) -> Result<Comment, ApiError> {
        self.send(
            ApiRequest::patch(&format!("/comments/c/{}", comment_id))
                .with_json(json!({ "content": content })),
        )
        .await
    }

    pub async fn delete_comment(&self, comment_id: &str) -> Result<(), ApiError> {
        self.send_ok(ApiRequest::delete(&format!("/comments/c/{}", comment_id)))
            .await
    }
}
