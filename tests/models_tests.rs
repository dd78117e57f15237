use serde_json::json;
use vidora_client::{
    AuthPayload, Comment, Envelope, LoginRequest, Page, PageItem, RefreshPayload, User, Video,
};

// Test model serialization and deserialization
#[test]
fn test_models() {
    // Enveloped user payload as the backend sends it
    let user_json = json!({
        "statusCode": 200,
        "data": {
            "_id": "u1",
            "username": "alice",
            "fullName": "Alice Example",
            "email": "alice@example.com",
            "avatar": "https://cdn.example.com/a.png"
        },
        "message": "ok",
        "success": true
    });
    let envelope: Envelope<User> = serde_json::from_value(user_json).unwrap();
    assert_eq!(envelope.status_code, Some(200));
    assert_eq!(envelope.data.id, "u1");
    assert_eq!(envelope.data.username, "alice");
    assert_eq!(envelope.data.full_name, "Alice Example");
    assert_eq!(envelope.data.key(), "u1");

    // Video with an embedded owner
    let video_json = json!({
        "_id": "v1",
        "title": "First upload",
        "description": "hello",
        "thumbnail": "https://cdn.example.com/t.jpg",
        "duration": 93.4,
        "views": 1200,
        "isPublished": true,
        "owner": { "_id": "u1", "username": "alice", "fullName": "Alice Example" },
        "createdAt": "2024-05-01T10:00:00.000Z",
        "likesCount": 17,
        "isLiked": true
    });
    let video: Video = serde_json::from_value(video_json).unwrap();
    assert_eq!(video.key(), "v1");
    assert_eq!(video.duration, 93.4);
    assert_eq!(video.views, 1200);
    assert!(video.is_liked);
    assert_eq!(video.owner.as_ref().unwrap().username, "alice");

    // Sparse video: everything beyond identity and title defaults
    let sparse: Video = serde_json::from_value(json!({ "_id": "v2", "title": "bare" })).unwrap();
    assert_eq!(sparse.views, 0);
    assert!(!sparse.is_published);
    assert_eq!(sparse.owner, None);

    // Comment
    let comment: Comment = serde_json::from_value(json!({
        "_id": "c1",
        "content": "nice one",
        "likesCount": 2
    }))
    .unwrap();
    assert_eq!(comment.key(), "c1");
    assert_eq!(comment.likes_count, 2);
}

#[test]
fn test_page_shape() {
    let page_json = json!({
        "docs": [
            { "_id": "v1", "title": "one" },
            { "_id": "v2", "title": "two" }
        ],
        "hasNextPage": true,
        "totalDocs": 40,
        "page": 1
    });
    let page: Page<Video> = serde_json::from_value(page_json).unwrap();
    assert_eq!(page.docs.len(), 2);
    assert!(page.has_next_page);
    assert_eq!(page.total_docs, Some(40));

    // Endpoints that omit the optional fields still parse
    let minimal: Page<Video> = serde_json::from_value(json!({ "docs": [] })).unwrap();
    assert!(minimal.docs.is_empty());
    assert!(!minimal.has_next_page);
    assert_eq!(minimal.total_docs, None);
}

#[test]
fn test_auth_payloads() {
    let auth: AuthPayload = serde_json::from_value(json!({
        "user": { "_id": "u1", "username": "alice", "fullName": "Alice Example" },
        "accessToken": "A1",
        "refreshToken": "R1"
    }))
    .unwrap();
    assert_eq!(auth.access_token, "A1");
    assert_eq!(auth.refresh_token, "R1");

    // Refresh response without a rotated refresh token means "keep yours"
    let refresh: RefreshPayload =
        serde_json::from_value(json!({ "accessToken": "A2" })).unwrap();
    assert_eq!(refresh.access_token, "A2");
    assert_eq!(refresh.refresh_token, None);

    let rotated: RefreshPayload =
        serde_json::from_value(json!({ "accessToken": "A2", "refreshToken": "R2" })).unwrap();
    assert_eq!(rotated.refresh_token, Some("R2".to_string()));
}

#[test]
fn test_login_request_serialization() {
    let by_name = serde_json::to_value(LoginRequest::with_username("alice", "hunter2")).unwrap();
    assert_eq!(by_name, json!({ "username": "alice", "password": "hunter2" }));

    let by_email =
        serde_json::to_value(LoginRequest::with_email("alice@example.com", "hunter2")).unwrap();
    assert_eq!(
        by_email,
        json!({ "email": "alice@example.com", "password": "hunter2" })
    );
}
