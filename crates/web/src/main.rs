use std::sync::Arc;

use anyhow::Context;
use storage::Database;
use storage::services::recompute::RecomputeQueue;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod catalog;
mod config;
mod error;
mod features;
mod middleware;
mod routes;
mod state;

use catalog::HttpCourseCatalog;
use config::Config;
use middleware::auth::Argon2CredentialService;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::users::handlers::create_user,
        features::login::handlers::login,
        features::courses::handlers::search_courses,
        features::courses::handlers::list_markers,
        features::rounds::handlers::create_round,
        features::rounds::handlers::list_rounds,
        features::rounds::handlers::list_round_holes,
        features::rounds::handlers::get_round_summary,
        features::rounds::handlers::recompute_round,
        features::hole_stats::handlers::get_hole_stat,
        features::hole_stats::handlers::submit_hole_stat,
        features::charts::handlers::line_chart,
        features::charts::handlers::pie_chart,
    ),
    components(
        schemas(
            storage::dto::user::CreateUserRequest,
            storage::dto::user::UserResponse,
            storage::dto::user::TokenResponse,
            storage::dto::catalog::CatalogCourse,
            storage::dto::catalog::CatalogMarker,
            storage::dto::catalog::CatalogHole,
            storage::dto::round::CreateRoundRequest,
            storage::dto::round::RoundResponse,
            storage::dto::round::HoleResponse,
            storage::dto::round::RoundSummaryResponse,
            storage::dto::hole_stat::HoleStatRequest,
            storage::dto::hole_stat::HoleStatResponse,
            storage::dto::chart::StatKind,
            storage::dto::chart::ChartPoint,
            storage::dto::chart::PieSlice,
            storage::models::HitOutcome,
            storage::models::BreakdownKind,
            storage::models::HoleStatValues,
            storage::models::RoundSummary,
            storage::models::SummaryValues,
            storage::models::CategoricalBreakdown,
        )
    ),
    tags(
        (name = "users", description = "Player accounts"),
        (name = "courses", description = "Course catalog lookups for new rounds"),
        (name = "rounds", description = "Rounds and their materialized statistics"),
        (name = "hole_stats", description = "Per-hole stat recording"),
        (name = "charts", description = "Statistics across a player's rounds"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Basic)
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting Rounder API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let store = Arc::new(db);
    let state = AppState {
        store: store.clone(),
        recompute: RecomputeQueue::spawn(store, config.recompute.clone()),
        catalog: Arc::new(HttpCourseCatalog::new(&config.golf_data_host)),
        credentials: Arc::new(Argon2CredentialService),
    };

    let app = routes::router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive());

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}
