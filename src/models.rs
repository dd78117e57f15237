use serde::{Deserialize, Serialize};

/// Items held in a [`crate::PagedCollection`] expose their server-assigned
/// identity. Keys drive append deduplication and idempotent removal; position
/// in the sequence never does.
pub trait PageItem {
    fn key(&self) -> &str;
}

// Standard response envelope wrapped around every backend payload
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "statusCode", default)]
    pub status_code: Option<u16>,
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

/// One page of a listing endpoint (mongoose-paginate shape, shared by every
/// list view: videos, comments, search, library).
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub docs: Vec<T>,
    #[serde(rename = "hasNextPage", default)]
    pub has_next_page: bool,
    #[serde(rename = "totalDocs", default)]
    pub total_docs: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
}

// Authenticated user snapshot
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(rename = "fullName", default)]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(rename = "coverImage", default)]
    pub cover_image: Option<String>,
}

impl PageItem for User {
    fn key(&self) -> &str {
        &self.id
    }
}

/// The access/refresh token pair. The refresh token lives only client-side
/// and is used solely against the refresh endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthTokens {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

// Payload of /users/login and /users/register
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

// Payload of /users/refresh-token; the backend may or may not rotate the
// refresh token, so its absence means "keep the current one".
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshPayload {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken", default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
}

impl LoginRequest {
    pub fn with_username(username: &str, password: &str) -> Self {
        Self {
            username: Some(username.to_string()),
            email: None,
            password: password.to_string(),
        }
    }

    pub fn with_email(email: &str, password: &str) -> Self {
        Self {
            username: None,
            email: Some(email.to_string()),
            password: password.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub password: String,
}

// Compact owner reference embedded in videos and comments
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Owner {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(rename = "fullName", default)]
    pub full_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

// Video resource
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Video {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(rename = "videoFile", default)]
    pub video_file: Option<String>,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub views: u64,
    #[serde(rename = "isPublished", default)]
    pub is_published: bool,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "likesCount", default)]
    pub likes_count: u64,
    #[serde(rename = "isLiked", default)]
    pub is_liked: bool,
}

impl PageItem for Video {
    fn key(&self) -> &str {
        &self.id
    }
}

// Comment on a video
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "likesCount", default)]
    pub likes_count: u64,
    #[serde(rename = "isLiked", default)]
    pub is_liked: bool,
}

impl PageItem for Comment {
    fn key(&self) -> &str {
        &self.id
    }
}

// Channel profile as returned by /users/c/{username}
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(rename = "fullName", default)]
    pub full_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(rename = "coverImage", default)]
    pub cover_image: Option<String>,
    #[serde(rename = "subscribersCount", default)]
    pub subscribers_count: u64,
    #[serde(rename = "isSubscribed", default)]
    pub is_subscribed: bool,
}

impl PageItem for ChannelProfile {
    fn key(&self) -> &str {
        &self.id
    }
}

// Acknowledgment of a like toggle
#[derive(Debug, Clone, Deserialize)]
pub struct LikeToggle {
    #[serde(rename = "isLiked", default)]
    pub is_liked: bool,
}

// Acknowledgment of a subscription toggle
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionToggle {
    #[serde(rename = "isSubscribed", default)]
    pub is_subscribed: bool,
}
