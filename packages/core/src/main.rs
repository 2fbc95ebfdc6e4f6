use std::future::{self, Future};
use std::io;
use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;

use interaction_risk::api::{self, assessments::{AssessmentRecorder, BackendRecorder}, AppState};
use interaction_risk::cli::Cli;
use interaction_risk::config::Config;
use interaction_risk::error::AppError;
use interaction_risk::interactions::{
    render_documentation, InteractionDatabase, InteractionRiskScorer, ScoringConfig, SelectedDrugs,
};
use interaction_risk::logging::init_logging;
use interaction_risk::metrics::AppMetrics;
use interaction_risk::services::backend::BackendClient;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();
    let cli = Cli::parse();

    let mut config = Config::from_env()
        .map_err(AppError::Config)
        .unwrap_or_else(|err| {
            tracing::error!("{}", err);
            std::process::exit(1);
        });
    config.apply_cli(&cli);

    tracing::info!("Service starting with config: {:?}", config);

    if let Err(err) = run(&cli, config).await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli, config: Config) -> Result<(), AppError> {
    let database = InteractionDatabase::load(config.interactions_file.as_deref())?;
    tracing::info!("Loaded {} interaction records", database.len());

    let scoring = ScoringConfig::default().with_evidence_weighting(config.evidence_weighting);
    let scorer = Arc::new(InteractionRiskScorer::new(Arc::new(database), scoring)?);

    if !cli.check.is_empty() {
        return check(&scorer, cli);
    }

    serve(scorer, config).await
}

/// One-shot mode: print the documentation block for `--check` drugs.
fn check(scorer: &InteractionRiskScorer, cli: &Cli) -> Result<(), AppError> {
    let selected = SelectedDrugs::new(&cli.check)?;
    let factors = cli.patient_factors();
    let report = scorer.evaluate(&selected, factors.as_ref());
    print!("{}", render_documentation(&report));
    Ok(())
}

async fn serve(scorer: Arc<InteractionRiskScorer>, config: Config) -> Result<(), AppError> {
    let metrics = Arc::new(
        AppMetrics::new().map_err(|err| AppError::Config(format!("metrics registry: {}", err)))?,
    );
    metrics.interactions_loaded.set(scorer.database().len() as f64);

    let recorder = config.backend.as_ref().map(|backend| {
        tracing::info!(
            "Recording assessments to {} (collection '{}')",
            backend.url,
            backend.collection
        );
        let recorder = BackendRecorder::new(BackendClient::from_config(backend), backend.collection.clone());
        Arc::new(recorder) as Arc<dyn AssessmentRecorder + Send + Sync>
    });
    if recorder.is_none() {
        tracing::warn!("BACKEND_URL not set; /assessments will answer 503");
    }

    let app = api::create_router(AppState {
        scorer,
        metrics,
        recorder,
    });

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|err| AppError::Network(format!("failed to bind {}: {}", config.bind_addr, err)))?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Network(err.to_string()))?;

    tracing::info!("Server stopped cleanly");
    Ok(())
}

async fn shutdown_signal() {
    wait_for_shutdown(signal::ctrl_c()).await;
}

/// Resolve once `signal` fires. A signal that cannot be installed never
/// resolves, so the server keeps running.
async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(err) = signal.await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received. Stopping server.");
}
