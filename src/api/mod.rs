//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All resource endpoints are mounted under `/api`; the health check and
//! the WebSocket upgrade live at the root.

pub mod dto;
pub mod handlers;

use axum::Router;
use axum::routing::get;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::ws::ws_handler;

/// OpenAPI document covering every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "verse-gateway",
        description = "Emotion-indexed verse delivery with admin curation and realtime change broadcast."
    ),
    paths(
        handlers::public::list_emotions,
        handlers::public::list_verses,
        handlers::public::verses_by_emotion,
        handlers::public::random_verse,
        handlers::public::record_interaction,
        handlers::admin::login,
        handlers::admin::logout,
        handlers::admin::register,
        handlers::admin::me,
        handlers::admin::dashboard,
        handlers::admin::interactions,
        handlers::admin::emotion_stats,
        handlers::verses::list_verses,
        handlers::verses::get_verse,
        handlers::verses::create_verse,
        handlers::verses::update_verse,
        handlers::verses::delete_verse,
        handlers::emotions::list_emotions,
        handlers::emotions::get_emotion,
        handlers::emotions::create_emotion,
        handlers::emotions::update_emotion,
        handlers::emotions::delete_emotion,
        handlers::system::health_handler,
    ),
    components(schemas(
        crate::domain::Verse,
        crate::domain::NewVerse,
        crate::domain::VerseUpdate,
        crate::domain::Emotion,
        crate::domain::NewEmotion,
        crate::domain::EmotionUpdate,
        crate::domain::NewAdmin,
        crate::domain::AdminProfile,
        crate::domain::VerseInteraction,
        crate::domain::NewInteraction,
        crate::domain::EmotionCount,
        crate::domain::DashboardStats,
        crate::domain::EmotionStat,
        dto::LoginRequest,
        dto::AdminResponse,
        dto::MessageResponse,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    ))
)]
pub struct ApiDoc;

/// Builds the complete application router: REST endpoints, health check,
/// and the WebSocket upgrade.
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .nest("/api", handlers::routes(state.clone()))
        .merge(handlers::system::routes())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/docs")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router.with_state(state)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::build_router;
    use crate::app_state::AppState;
    use crate::auth::SessionStore;
    use crate::config::GatewayConfig;
    use crate::storage::memory::MemoryStorage;
    use crate::storage::seed::ensure_seed_data;
    use crate::ws::{Audience, ChangeBroadcaster};

    fn test_config() -> GatewayConfig {
        GatewayConfig {
            listen_addr: "127.0.0.1:0".parse().unwrap_or_else(|_| panic!()),
            database_url: None,
            database_max_connections: 1,
            database_connect_timeout_secs: 1,
            session_ttl_hours: 24,
            broadcast_capacity: 64,
            seed_on_startup: true,
            seed_admin_username: "admin".to_string(),
            seed_admin_email: "admin@example.com".to_string(),
            seed_admin_password: "admin123".to_string(),
        }
    }

    /// Seeded app backed by in-memory storage, plus its state for
    /// broadcaster assertions.
    async fn make_app() -> (Router, AppState) {
        let config = test_config();
        let storage = Arc::new(MemoryStorage::new());
        ensure_seed_data(storage.as_ref(), &config)
            .await
            .unwrap_or_else(|_| panic!("seeding failed"));

        let state = AppState {
            storage,
            broadcaster: ChangeBroadcaster::new(config.broadcast_capacity),
            sessions: SessionStore::new(config.session_ttl_hours),
        };
        (build_router(state.clone()), state)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap_or_else(|_| panic!("bad request"))
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap_or_else(|_| panic!("bad request"))
    }

    fn with_cookie(mut request: Request<Body>, cookie: &str) -> Request<Body> {
        if let Ok(value) = cookie.parse() {
            request.headers_mut().insert(header::COOKIE, value);
        }
        request
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    }

    /// Logs in the seeded admin and returns the session cookie pair.
    async fn login(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/admin/login",
                &json!({"username": "admin", "password": "admin123"}),
            ))
            .await
            .unwrap_or_else(|_| panic!("login request failed"));
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        set_cookie
            .split(';')
            .next()
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (app, _state) = make_app().await;
        let response = app
            .oneshot(get_request("/health"))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.get("status").and_then(Value::as_str), Some("healthy"));
    }

    #[tokio::test]
    async fn admin_routes_require_a_session() {
        let (app, _state) = make_app().await;

        let response = app
            .clone()
            .oneshot(get_request("/api/admin/me"))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(get_request("/api/admin/verses"))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_me_logout_cycle() {
        let (app, _state) = make_app().await;
        let cookie = login(&app).await;

        let response = app
            .clone()
            .oneshot(with_cookie(get_request("/api/admin/me"), &cookie))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.get("username").and_then(Value::as_str), Some("admin"));

        let response = app
            .clone()
            .oneshot(with_cookie(
                json_request("POST", "/api/admin/logout", &Value::Null),
                &cookie,
            ))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::OK);

        // The destroyed session no longer opens the gate.
        let response = app
            .oneshot(with_cookie(get_request("/api/admin/me"), &cookie))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let (app, _state) = make_app().await;
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/admin/login",
                &json!({"username": "admin", "password": "wrong"}),
            ))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(
            body.pointer("/error/code").and_then(Value::as_u64),
            Some(1101)
        );
    }

    #[tokio::test]
    async fn unknown_emotion_is_rejected_with_code() {
        let (app, _state) = make_app().await;
        let response = app
            .oneshot(get_request("/api/verses/serenity"))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body.pointer("/error/code").and_then(Value::as_u64),
            Some(1002)
        );
    }

    #[tokio::test]
    async fn empty_emotion_random_draw_is_not_found() {
        // "lonely" is a seeded emotion with no seeded verses.
        let (app, _state) = make_app().await;
        let response = app
            .oneshot(get_request("/api/verses/lonely/random"))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(
            body.pointer("/error/code").and_then(Value::as_u64),
            Some(2004)
        );
    }

    #[tokio::test]
    async fn random_draw_records_an_interaction() {
        let (app, _state) = make_app().await;
        let cookie = login(&app).await;

        let response = app
            .clone()
            .oneshot(get_request("/api/verses/happy/random"))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::OK);
        let verse = body_json(response).await;
        let verse_id = verse
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        assert!(!verse_id.is_empty());

        let response = app
            .oneshot(with_cookie(get_request("/api/admin/dashboard"), &cookie))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::OK);
        let stats = body_json(response).await;
        assert_eq!(
            stats.get("totalInteractions").and_then(Value::as_u64),
            Some(1)
        );
        let recent_ids: Vec<&str> = stats
            .get("recentInteractions")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|i| i.get("verseId").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();
        assert_eq!(recent_ids, vec![verse_id.as_str()]);
    }

    #[tokio::test]
    async fn verse_create_reaches_both_audiences_once() {
        let (app, state) = make_app().await;
        let cookie = login(&app).await;

        let mut admin_rx = state.broadcaster.subscribe(Audience::Admin);
        let mut public_rx = state.broadcaster.subscribe(Audience::Public);

        let response = app
            .oneshot(with_cookie(
                json_request(
                    "POST",
                    "/api/admin/verses",
                    &json!({
                        "emotion": "peace",
                        "sanskrit": "स",
                        "hindi": "ह",
                        "english": "Stillness",
                        "explanation": "Seek stillness within",
                        "chapter": "Bhagavad Gita 6.27"
                    }),
                ),
                &cookie,
            ))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let created_id = created.get("id").and_then(Value::as_str).map(String::from);

        for rx in [&mut admin_rx, &mut public_rx] {
            let event = rx.try_recv().unwrap_or_else(|_| panic!("missing event"));
            assert_eq!(event.event_type_str(), "verse_created");
            let frame = serde_json::to_value(&event).unwrap_or_default();
            assert_eq!(
                frame.pointer("/data/id").and_then(Value::as_str).map(String::from),
                created_id
            );
            // Exactly one event per subscriber.
            assert!(rx.try_recv().is_err());
        }
    }

    #[tokio::test]
    async fn duplicate_emotion_conflicts_until_soft_deleted() {
        let (app, _state) = make_app().await;
        let cookie = login(&app).await;
        let payload = json!({
            "name": "happy",
            "displayName": "Happy Again",
            "description": "d",
            "color": "#FFF",
            "icon": "i",
            "emoji": "🙂"
        });

        let response = app
            .clone()
            .oneshot(with_cookie(
                json_request("POST", "/api/admin/emotions", &payload),
                &cookie,
            ))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // Find the seeded "happy" emotion and soft-delete it.
        let response = app
            .clone()
            .oneshot(with_cookie(get_request("/api/admin/emotions"), &cookie))
            .await
            .unwrap_or_else(|_| panic!());
        let emotions = body_json(response).await;
        let happy_id = emotions
            .as_array()
            .and_then(|items| {
                items
                    .iter()
                    .find(|e| e.get("name").and_then(Value::as_str) == Some("happy"))
            })
            .and_then(|e| e.get("id"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let response = app
            .clone()
            .oneshot(with_cookie(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/admin/emotions/{happy_id}"))
                    .body(Body::empty())
                    .unwrap_or_else(|_| panic!()),
                &cookie,
            ))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::OK);

        // The name is free again.
        let response = app
            .oneshot(with_cookie(
                json_request("POST", "/api/admin/emotions", &payload),
                &cookie,
            ))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn soft_deleted_verse_hidden_publicly_but_listed_for_admin() {
        let (app, _state) = make_app().await;
        let cookie = login(&app).await;

        let response = app
            .clone()
            .oneshot(get_request("/api/verses"))
            .await
            .unwrap_or_else(|_| panic!());
        let public_before = body_json(response)
            .await
            .as_array()
            .map(Vec::len)
            .unwrap_or_default();
        assert_eq!(public_before, 4);

        // Soft-delete the first public verse.
        let response = app
            .clone()
            .oneshot(get_request("/api/verses"))
            .await
            .unwrap_or_else(|_| panic!());
        let verses = body_json(response).await;
        let target_id = verses
            .as_array()
            .and_then(|items| items.first())
            .and_then(|v| v.get("id"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let response = app
            .clone()
            .oneshot(with_cookie(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/admin/verses/{target_id}"))
                    .body(Body::empty())
                    .unwrap_or_else(|_| panic!()),
                &cookie,
            ))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(get_request("/api/verses"))
            .await
            .unwrap_or_else(|_| panic!());
        let public_after = body_json(response)
            .await
            .as_array()
            .map(Vec::len)
            .unwrap_or_default();
        assert_eq!(public_after, 3);

        let response = app
            .oneshot(with_cookie(get_request("/api/admin/verses"), &cookie))
            .await
            .unwrap_or_else(|_| panic!());
        let admin_view = body_json(response).await;
        let admin_len = admin_view.as_array().map(Vec::len).unwrap_or_default();
        assert_eq!(admin_len, 4);
        let deleted_still_listed = admin_view
            .as_array()
            .map(|items| {
                items.iter().any(|v| {
                    v.get("id").and_then(Value::as_str) == Some(target_id.as_str())
                        && v.get("isActive").and_then(Value::as_bool) == Some(false)
                })
            })
            .unwrap_or(false);
        assert!(deleted_still_listed);
    }

    #[tokio::test]
    async fn verse_update_revives_a_soft_deleted_verse() {
        let (app, _state) = make_app().await;
        let cookie = login(&app).await;

        let response = app
            .clone()
            .oneshot(get_request("/api/verses"))
            .await
            .unwrap_or_else(|_| panic!());
        let verses = body_json(response).await;
        let target_id = verses
            .as_array()
            .and_then(|items| items.first())
            .and_then(|v| v.get("id"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let response = app
            .clone()
            .oneshot(with_cookie(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/admin/verses/{target_id}"))
                    .body(Body::empty())
                    .unwrap_or_else(|_| panic!()),
                &cookie,
            ))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(with_cookie(
                json_request(
                    "PUT",
                    &format!("/api/admin/verses/{target_id}"),
                    &json!({"english": "revised"}),
                ),
                &cookie,
            ))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated.get("isActive").and_then(Value::as_bool), Some(true));
        assert_eq!(
            updated.get("english").and_then(Value::as_str),
            Some("revised")
        );
    }

    #[tokio::test]
    async fn interaction_post_fills_headers_and_notifies_admins() {
        let (app, state) = make_app().await;
        let mut admin_rx = state.broadcaster.subscribe(Audience::Admin);
        let mut public_rx = state.broadcaster.subscribe(Audience::Public);

        let response = app
            .clone()
            .oneshot(get_request("/api/verses"))
            .await
            .unwrap_or_else(|_| panic!());
        let verses = body_json(response).await;
        let verse_id = verses
            .as_array()
            .and_then(|items| items.first())
            .and_then(|v| v.get("id"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let mut request = json_request(
            "POST",
            "/api/interactions",
            &json!({"verseId": verse_id, "emotion": "happy", "action": "shared"}),
        );
        if let Ok(value) = "test-agent/1.0".parse() {
            request.headers_mut().insert(header::USER_AGENT, value);
        }
        let response = app
            .oneshot(request)
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::CREATED);
        let interaction = body_json(response).await;
        assert_eq!(
            interaction.get("userAgent").and_then(Value::as_str),
            Some("test-agent/1.0")
        );

        // new_interaction then stats_update, admin audience only.
        let first = admin_rx.try_recv().unwrap_or_else(|_| panic!("missing event"));
        assert_eq!(first.event_type_str(), "new_interaction");
        let second = admin_rx.try_recv().unwrap_or_else(|_| panic!("missing event"));
        assert_eq!(second.event_type_str(), "stats_update");
        assert!(public_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn register_then_login_with_new_account() {
        let (app, _state) = make_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/admin/register",
                &json!({
                    "username": "curator",
                    "email": "curator@example.com",
                    "password": "s3cret-pass"
                }),
            ))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::CREATED);

        // Same username again conflicts.
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/admin/register",
                &json!({
                    "username": "curator",
                    "email": "other@example.com",
                    "password": "s3cret-pass"
                }),
            ))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/admin/login",
                &json!({"username": "curator", "password": "s3cret-pass"}),
            ))
            .await
            .unwrap_or_else(|_| panic!());
        assert_eq!(response.status(), StatusCode::OK);
    }
}
