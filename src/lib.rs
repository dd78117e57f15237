//! Client library for the Vidora video-sharing REST API.
//!
//! Two mechanisms carry the weight here and everything else is a thin typed
//! wrapper around them:
//!
//! - [`Session`] owns the access/refresh token pair, attaches credentials to
//!   outbound requests, and transparently refreshes on authorization
//!   failures. The refresh is single-flight: concurrent 401s collapse into
//!   one backend call and every queued request retries with the same new
//!   token.
//! - [`PagedCollection`] drives any list view (videos, comments, search
//!   results, library entries) against a listing endpoint: reset, append
//!   with identity-based deduplication, idempotent removal, and optimistic
//!   mutations with explicit confirm/revert.
//!
//! ```no_run
//! use vidora_client::{ListQuery, LoginRequest, PagedCollection, Session, Video};
//! use vidora_client::videos::VIDEOS_PATH;
//!
//! # async fn demo() -> Result<(), vidora_client::ApiError> {
//! let session = Session::with_base_url("https://api.example.com/api");
//! session
//!     .login(&LoginRequest::with_username("alice", "hunter2"))
//!     .await?;
//!
//! let feed: PagedCollection<Video> = PagedCollection::new(VIDEOS_PATH);
//! feed.load(&session, ListQuery::new().sort("createdAt", "desc")).await?;
//! feed.load_more(&session).await?;
//! # Ok(())
//! # }
//! ```

mod collection;
pub use collection::{ListQuery, PagedCollection, PendingMutation};
mod error;
pub use error::ApiError;
mod models;
pub use models::{
    AuthPayload, AuthTokens, ChannelProfile, Comment, Envelope, LikeToggle, LoginRequest, Owner,
    Page, PageItem, RefreshPayload, RegisterRequest, SubscriptionToggle, User, Video,
};
mod session;
pub use session::{CredentialsCallback, Session, StoredCredentials};
mod settings;
pub use settings::{Settings, SETTINGS};
mod transport;
pub use transport::{ApiRequest, HttpTransport, RawResponse, Transport};

pub mod channel;
pub mod comments;
pub mod library;
pub mod videos;
