// Player Stats - Web Server
// Serves the per-player stats page plus a small JSON API

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use player_stats::{
    init_tracing, list_players, load_player, setup_database, wrap_document, AppConfig,
    PlayerPage, StatValue, StatsPage,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Connection>>,
    page: Arc<StatsPage>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ShowPlayerParams {
    #[serde(rename = "playerName")]
    player_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum PageError {
    #[error("player {0:?} not found")]
    PlayerNotFound(String),

    #[error("database lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PageError {
    fn status(&self) -> StatusCode {
        match self {
            PageError::PlayerNotFound(_) => StatusCode::NOT_FOUND,
            PageError::LockPoisoned | PageError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ApiResponse::err(self.to_string()))).into_response()
    }
}

impl AppState {
    fn with_db<T>(&self, f: impl FnOnce(&Connection) -> anyhow::Result<T>) -> Result<T, PageError> {
        let conn = self.db.lock().map_err(|_| PageError::LockPoisoned)?;
        Ok(f(&*conn)?)
    }
}

// ============================================================================
// Page Handlers
// ============================================================================

/// GET /showplayer?playerName=... - Player stats page
async fn show_player(
    State(state): State<AppState>,
    Query(params): Query<ShowPlayerParams>,
) -> Response {
    let Some(player_name) = params.player_name.filter(|name| !name.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Html(wrap_document("Player Stats", "<p>Missing playerName parameter.</p>")),
        )
            .into_response();
    };

    match state.with_db(|conn| state.page.render_player(conn, &player_name)) {
        Ok(PlayerPage::Found(body)) => {
            Html(wrap_document(&player_name, &body)).into_response()
        }
        Ok(PlayerPage::NotFound(body)) => {
            (StatusCode::NOT_FOUND, Html(wrap_document(&player_name, &body))).into_response()
        }
        Err(e) => {
            tracing::error!(player = %player_name, error = %e, "failed to render player page");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(wrap_document("Player Stats", "<p>Failed to render stats.</p>")),
            )
                .into_response()
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/players - Names of all players with stats
async fn get_players(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<String>>>, PageError> {
    let players = state.with_db(list_players)?;
    Ok(Json(ApiResponse::ok(players)))
}

/// GET /api/players/:name/stats - Every recorded stat for one player
async fn get_player_stats(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<Vec<StatValue>>>, PageError> {
    // `Path` has already percent-decoded the segment
    match state.with_db(|conn| load_player(conn, &name))? {
        Some(player) => Ok(Json(ApiResponse::ok(player.stat_values()))),
        None => Err(PageError::PlayerNotFound(name)),
    }
}

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/players", get(get_players))
        .route("/players/:name/stats", get(get_player_stats));

    Router::new()
        .route("/showplayer", get(show_player))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("player_stats=info,tower_http=info");

    let config = AppConfig::from_env();
    tracing::info!(?config, "starting player stats server");

    let conn = Connection::open(config.db_path())?;
    setup_database(&conn)?;

    let page = StatsPage::load(&config, &conn)?;

    // Create shared state
    let state = AppState {
        db: Arc::new(Mutex::new(conn)),
        page: Arc::new(page),
    };

    let app = build_router(state);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("server running on http://{}", addr);
    tracing::info!("page: http://{}/showplayer?playerName=<name>", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use player_stats::{insert_records, Layout, StatLookup, StatRecord};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        let records: Vec<StatRecord> = ["Notch", "Notch%41"]
            .into_iter()
            .map(|player| StatRecord {
                player: player.to_string(),
                domain: "default".to_string(),
                world: "world".to_string(),
                category: "stats".to_string(),
                statistic: "deaths".to_string(),
                value: 3,
            })
            .collect();
        insert_records(&conn, &records).unwrap();

        let layout = Layout::from_json(
            r#"[{ "tabName": "General", "headings": [{ "headingName": "Misc", "display": [
                { "domain": "default", "world": "world", "cat": "stats", "stat": "deaths" }
            ] }] }]"#,
        )
        .unwrap();

        AppState {
            db: Arc::new(Mutex::new(conn)),
            page: Arc::new(StatsPage::new(layout, StatLookup::new())),
        }
    }

    async fn get_status(uri: &str) -> StatusCode {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn test_show_player() {
        assert_eq!(get_status("/showplayer?playerName=Notch").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_show_unknown_player() {
        assert_eq!(get_status("/showplayer?playerName=Herobrine").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_show_player_without_name() {
        assert_eq!(get_status("/showplayer").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_api_routes() {
        assert_eq!(get_status("/api/health").await, StatusCode::OK);
        assert_eq!(get_status("/api/players").await, StatusCode::OK);
        assert_eq!(get_status("/api/players/Notch/stats").await, StatusCode::OK);
        assert_eq!(get_status("/api/players/Nobody/stats").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_player_name_is_decoded_once() {
        assert_eq!(get_status("/api/players/Notch%2541/stats").await, StatusCode::OK);
        // A second decode would turn "Notch%41" into "NotchA"
        assert_eq!(get_status("/api/players/NotchA/stats").await, StatusCode::NOT_FOUND);
    }
}
