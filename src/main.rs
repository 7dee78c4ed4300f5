use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use materna::config::AppConfig;
use materna::error::AppError;
use materna::guidance::{
    guidance_router, GuidanceReportView, GuidanceService, PatientSnapshot, VitalsCsvImporter,
};
use materna::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    service: Arc<GuidanceService>,
}

#[derive(Parser, Debug)]
#[command(
    name = "Maternal Guidance Service",
    about = "Run the maternal health guidance engine from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Classify a patient message against the built-in triage catalog
    Triage(TriageArgs),
    /// Evaluate a vitals snapshot against the built-in clinical catalog
    Assess(AssessArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// Override the clinical rule catalog with a JSON file
    #[arg(long)]
    clinical_rules: Option<PathBuf>,
    /// Override the triage rule catalog with a JSON file
    #[arg(long)]
    triage_rules: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TriageArgs {
    /// Patient message to classify
    #[arg(long)]
    message: String,
    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Default)]
struct AssessArgs {
    /// Optional vitals CSV export to prefill the snapshot
    #[arg(long)]
    vitals_csv: Option<PathBuf>,
    /// Gestational age in completed weeks
    #[arg(long)]
    gestational_week: Option<f64>,
    /// Systolic blood pressure in mmHg
    #[arg(long)]
    systolic_bp: Option<f64>,
    /// Diastolic blood pressure in mmHg
    #[arg(long)]
    diastolic_bp: Option<f64>,
    /// Hemoglobin in g/dL
    #[arg(long)]
    hemoglobin: Option<f64>,
    /// Blood glucose in mg/dL
    #[arg(long)]
    blood_glucose: Option<f64>,
    /// Body temperature in Celsius
    #[arg(long)]
    temperature: Option<f64>,
    /// Fetal movements counted in the counting window
    #[arg(long)]
    fetal_movements: Option<f64>,
    /// Mark urine protein as positive
    #[arg(long)]
    proteinuria: bool,
    /// Reported symptom (repeatable)
    #[arg(long = "symptom")]
    symptoms: Vec<String>,
    /// Known complication (repeatable)
    #[arg(long = "complication")]
    complications: Vec<String>,
    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Deserialize)]
struct VitalsImportRequest {
    vitals_csv: String,
}

#[derive(Debug, Serialize)]
struct VitalsImportResponse {
    snapshot: PatientSnapshot,
    report: GuidanceReportView,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Triage(args) => run_triage(args),
        Command::Assess(args) => run_assess(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.clinical_rules.take() {
        config.rules.clinical_catalog = Some(path);
    }
    if let Some(path) = args.triage_rules.take() {
        config.rules.triage_catalog = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let service = Arc::new(GuidanceService::from_sources(
        config.rules.clinical_catalog.as_deref(),
        config.rules.triage_catalog.as_deref(),
    )?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        service: service.clone(),
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/guidance/assessment/import",
            post(vitals_import_endpoint),
        )
        .with_state(state)
        .merge(guidance_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "maternal guidance service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_triage(args: TriageArgs) -> Result<(), AppError> {
    let service = GuidanceService::from_sources(None, None)?;
    let report = service.triage(&args.message, Utc::now());
    emit_guidance_report("Triage guidance", &report, args.json)
}

fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let service = GuidanceService::from_sources(None, None)?;

    let mut snapshot = match &args.vitals_csv {
        Some(path) => VitalsCsvImporter::from_path(path)?,
        None => PatientSnapshot::default(),
    };
    apply_overrides(&mut snapshot, &args);

    let report = service.assess(&snapshot, Utc::now())?;
    emit_guidance_report("Clinical assessment", &report, args.json)
}

fn emit_guidance_report(
    title: &str,
    report: &GuidanceReportView,
    as_json: bool,
) -> Result<(), AppError> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        render_guidance_report(title, report);
    }
    Ok(())
}

/// Command-line vitals take precedence over imported CSV values.
fn apply_overrides(snapshot: &mut PatientSnapshot, args: &AssessArgs) {
    let overrides = [
        (&mut snapshot.gestational_week, args.gestational_week),
        (&mut snapshot.systolic_bp, args.systolic_bp),
        (&mut snapshot.diastolic_bp, args.diastolic_bp),
        (&mut snapshot.hemoglobin_g_dl, args.hemoglobin),
        (&mut snapshot.blood_glucose_mg_dl, args.blood_glucose),
        (&mut snapshot.temperature_c, args.temperature),
        (&mut snapshot.fetal_movement_count, args.fetal_movements),
    ];
    for (slot, value) in overrides {
        if let Some(value) = value {
            *slot = Some(Value::from(value));
        }
    }

    if args.proteinuria {
        snapshot.proteinuria = Some(true);
    }
    if !args.symptoms.is_empty() {
        snapshot.active_symptoms = args.symptoms.clone();
    }
    if !args.complications.is_empty() {
        snapshot.complications = args.complications.clone();
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn vitals_import_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<VitalsImportRequest>,
) -> Result<Json<VitalsImportResponse>, AppError> {
    let reader = Cursor::new(payload.vitals_csv.into_bytes());
    let snapshot = VitalsCsvImporter::from_reader(reader)?;
    let report = state.service.assess(&snapshot, Utc::now())?;

    Ok(Json(VitalsImportResponse { snapshot, report }))
}

fn render_guidance_report(title: &str, report: &GuidanceReportView) {
    println!("{title}");
    println!("Evaluated at: {}", report.evaluated_at);
    println!(
        "Immediate attention required: {}",
        if report.requires_immediate_attention {
            "yes"
        } else {
            "no"
        }
    );

    if report.results.is_empty() {
        println!("\nGuidance: no rules matched");
        return;
    }

    println!("\nGuidance");
    for result in &report.results {
        println!(
            "- [{}] {}: {}",
            result.severity_label, result.category_label, result.recommendation
        );
        if !result.medications.is_empty() {
            println!("    Medications: {}", result.medications.join(", "));
        }
        if !result.tests.is_empty() {
            println!("    Suggested tests: {}", result.tests.join(", "));
        }
        if let Some(referral) = &result.referral {
            println!("    Referral: {referral}");
        }
        if let Some(citation) = &result.citation {
            println!("    Source: {citation}");
        }
    }
}
