use clap::{Args, Parser, Subcommand};
use globalpath::config::AppConfig;
use globalpath::error::AppError;
use globalpath::matching::{report, MatchEngine};
use globalpath::recommendations::RecommendationRecorder;
use globalpath::routes::{self, AppState};
use globalpath::store::{RecordStore, StudentProfile};
use globalpath::telemetry;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "GlobalPath Scholarship Core",
    about = "Run the scholarship matching and application tracking service from the command line",
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
    /// Score a student profile against the catalog and print the shortlist
    Match(MatchArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct MatchArgs {
    /// Target degree level (Bachelors, Masters, PhD)
    #[arg(long)]
    degree: String,
    /// Field of study
    #[arg(long)]
    field: String,
    /// Preferred countries, or "Any"
    #[arg(long, default_value = "Any")]
    countries: String,
    /// CGPA on the catalog's scale
    #[arg(long, default_value_t = 0.0)]
    cgpa: f32,
    /// IELTS band, 0 when not taken
    #[arg(long, default_value_t = 0.0)]
    ielts: f32,
    /// Override the configured data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Persist the shortlist to the recommendation log under this profile id
    #[arg(long)]
    record_for: Option<String>,
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
        Command::Match(args) => run_match(args),
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = telemetry::metrics();
    let store = Arc::new(RecordStore::load(&config.storage.data_dir));
    let state = AppState::new(store, prometheus_handle);
    let readiness_flag = state.readiness.clone();

    let app = routes::router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "scholarship advisor core ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let data_dir = args.data_dir.unwrap_or(config.storage.data_dir);

    let store = Arc::new(RecordStore::load(&data_dir));
    let profile = StudentProfile {
        target_degree: args.degree,
        field_of_study: args.field,
        preferred_countries: args.countries,
        cgpa: args.cgpa,
        ielts_band: args.ielts,
    };

    let catalog = store.scholarships();
    let outcome = MatchEngine::default().score(&profile, &catalog);

    print!("{}", report::render(&profile, &outcome, catalog.len()));

    if let Some(profile_id) = args.record_for.as_deref() {
        RecommendationRecorder::new(store.clone()).record(profile_id, &outcome.matches)?;
        println!("\nShortlist recorded for {profile_id}");
    }

    Ok(())
}
