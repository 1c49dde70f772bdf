use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use mandi_core::analytics::{self, AnalyticsSummary, AnalyticsWindow};
use mandi_core::config::Settings;
use mandi_core::domain::contract::RecommendationQuery;
use mandi_core::domain::recommendation::Recommendation;
use mandi_core::recommend::{market, profile::ProfileTable, Recommender};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let recommender = build_recommender(&settings).map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %format!("{e:#}"), "failed to load crop profiles");
        e
    })?;

    let state = AppState {
        recommender: Arc::new(recommender),
    };
    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[derive(Debug, Clone)]
struct AppState {
    recommender: Arc<Recommender>,
}

fn build_recommender(settings: &Settings) -> anyhow::Result<Recommender> {
    let mut profiles = ProfileTable::builtin();
    if let Some(path) = settings.crop_profiles_path.as_deref() {
        let loaded = profiles.extend_from_file(path)?;
        tracing::info!(path, loaded, "loaded crop profiles");
    }
    Ok(Recommender::new(profiles, market::registry()))
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    // Wrong method on a known path answers like an unknown path.
    Router::new()
        .route("/healthz", get(healthz).fallback(not_found))
        .route(
            "/recommendation",
            post(post_recommendation).fallback(not_found),
        )
        .route("/analytics", get(get_analytics).fallback(not_found))
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "Not found".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: &self.message,
        });
        (self.status, body).into_response()
    }
}

async fn not_found() -> ApiError {
    ApiError::not_found()
}

async fn post_recommendation(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Recommendation>, ApiError> {
    let query = RecommendationQuery::from_json_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "rejecting recommendation request");
        ApiError::bad_request("Invalid JSON")
    })?;

    let query_id = Uuid::new_v4();
    let recommendation = recommend_today(&state.recommender, &query);

    tracing::info!(
        %query_id,
        state = %query.state,
        crop = %query.crop,
        location = %query.location,
        quantity = ?query.quantity,
        profile = %recommendation.profile,
        action = %recommendation.action,
        "served recommendation"
    );
    if recommendation.is_generic() && !query.crop.is_empty() {
        tracing::debug!(%query_id, crop = %query.crop, "unrecognized crop; used generic profile");
    }

    Ok(Json(recommendation))
}

fn recommend_today(recommender: &Recommender, query: &RecommendationQuery) -> Recommendation {
    let today = Utc::now().date_naive();
    recommender.recommend(query, today, &mut rand::thread_rng())
}

#[derive(Debug, Default, Deserialize)]
struct AnalyticsParams {
    state: Option<String>,
    start: Option<String>,
    end: Option<String>,
}

async fn get_analytics(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<AnalyticsSummary>, ApiError> {
    let window = AnalyticsWindow::resolve(
        params.state.as_deref(),
        params.start.as_deref(),
        params.end.as_deref(),
        Utc::now().date_naive(),
    )
    .map_err(|e| ApiError::bad_request(format!("{e:#}")))?;

    Ok(Json(analytics::summary(
        window,
        state.recommender.markets(),
    )))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
