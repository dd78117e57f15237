use crate::error::ApiError;
use crate::models::{ChannelProfile, LikeToggle, SubscriptionToggle};
use crate::session::Session;
use crate::transport::ApiRequest;

/// Listing path for the videos the current user liked.
pub const LIKED_VIDEOS_PATH: &str = "/likes/videos";

/// Listing path for a channel's subscribers.
pub fn subscribers_path(channel_id: &str) -> String {
    format!("/subscriptions/u/{}", channel_id)
}

/// Listing path for the channels a user subscribes to.
pub fn subscriptions_path(user_id: &str) -> String {
    format!("/subscriptions/subscribed/{}", user_id)
}

impl Session {
    /// Fetch a channel's public profile by handle.
    pub async fn channel_profile(&self, username: &str) -> Result<ChannelProfile, ApiError> {
        self.send(ApiRequest::get(&format!("/users/c/{}", username)))
            .await
    }

    /// Subscribe or unsubscribe; the acknowledgment carries the new state.
    pub async fn toggle_subscription(
        &self,
        channel_id: &str,
    ) -> Result<SubscriptionToggle, ApiError> {
        self.send(ApiRequest::post(&format!("/subscriptions/c/{}", channel_id)))
            .await
    }

    pub async fn check_subscription(&self, channel_id: &str) -> Result<bool, ApiError> {
        let status: SubscriptionToggle = self
            .send(ApiRequest::get(&format!(
                "/subscriptions/check/{}",
                channel_id
            )))
            .await?;
        Ok(status.is_subscribed)
    }

    pub async fn toggle_video_like(&self, video_id: &str) -> Result<LikeToggle, ApiError> {
        self.send(ApiRequest::post(&format!("/likes/toggle/v/{}", video_id)))
            .await
    }

    pub async fn toggle_comment_like(&self, comment_id: &str) -> Result<LikeToggle, ApiError> {
        self.send(ApiRequest::post(&format!("/likes/toggle/c/{}", comment_id)))
            .await
    }
}
