use axum::routing::get;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use herb_origin_report::app_state::AppState;
use herb_origin_report::config::AppConfig;
use herb_origin_report::routes;
use herb_origin_report::services::workers_ai::WorkersAiClient;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");
    let settings = config
        .report_settings()
        .expect("Invalid report display configuration");

    tracing::info!("Initializing herb-origin-report server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    // Register application metrics
    metrics::describe_counter!(
        "report_submissions_total",
        "Total herb batch submissions received"
    );
    metrics::describe_counter!(
        "report_validation_failures_total",
        "Submissions rejected before any model call"
    );
    metrics::describe_counter!("reports_generated_total", "Origin reports generated");
    metrics::describe_counter!(
        "report_generation_failures_total",
        "Model invocations that failed or returned no text"
    );
    metrics::describe_histogram!(
        "report_generation_seconds",
        "Time spent waiting on the report model"
    );

    // Initialize Workers AI client
    tracing::info!(model = %config.cf_model, "Initializing Cloudflare Workers AI client");
    let report_model = WorkersAiClient::new(&config.cf_account_id, &config.cf_api_token)
        .with_api_base(&config.cf_api_base)
        .with_model(&config.cf_model)
        .with_max_tokens(config.max_report_tokens);

    if settings.include_photo_in_shareable_link {
        tracing::warn!("Report links will embed the full batch photo");
    }

    // Create shared application state
    let state = AppState::new(report_model, settings);

    let app = routes::router(state, config.max_body_bytes)
        // Prometheus metrics endpoint (separate state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
        );

    tracing::info!("Starting herb-origin-report on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
