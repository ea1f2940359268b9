use anyhow::Context;
use generator_service::{config::EnvVars, db::QuestionStore};
use paper_utils::generation::{generate_paper, validate_paper};
use schema::GenerationConfig;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().pretty())
        .with(sentry::integrations::tracing::layer())
        .with(EnvFilter::from_default_env())
        .init();
    tracing::info!("Starting paper generator service...");
    dotenvy::dotenv().ok();

    let env_vars = EnvVars::new();

    let _guard = if let Some(sentry_dsn) = env_vars.sentry_dsn.clone() {
        tracing::info!("initializing Sentry");
        // NOTE: Events are only emitted, once the guard goes out of scope.
        Some(sentry::init((
            sentry_dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                traces_sample_rate: 1.0,
                ..Default::default()
            },
        )))
    } else {
        None
    };

    if let Err(e) = run(&env_vars).await {
        tracing::error!("Error generating paper: {:?}", e);
        std::process::exit(1);
    }
}

/// Loads the generation config, fetches the question pool for its
/// mode, assembles the paper, and prints it as JSON.
#[tracing::instrument(skip_all, err(Debug))]
async fn run(env_vars: &EnvVars) -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .context("usage: generator-service <config.json>")?;
    let config_file = std::fs::read_to_string(&config_path)
        .with_context(|| format!("unable to read {config_path}"))?;
    let config: GenerationConfig =
        serde_json::from_str(&config_file).context("unable to parse generation config")?;

    let store = QuestionStore::new(env_vars);
    let pool = store
        .fetch_questions(
            config.mode,
            &config.selected_chapters,
            config.selected_year.as_deref(),
        )
        .await?;
    tracing::info!(pool = pool.len(), "fetched question pool");

    let paper = generate_paper(&config, &pool)?;
    validate_paper(&paper)?;

    for section in &paper.sections {
        if section.total_pool_count < section.required_count {
            tracing::warn!(
                section = %section.name,
                placed = section.total_pool_count,
                required = section.required_count,
                "section under-filled"
            );
        }
    }
    tracing::info!(
        paper = %paper.id,
        sections = paper.sections.len(),
        total_marks = paper.total_marks,
        "paper generated"
    );

    println!("{}", serde_json::to_string_pretty(&paper)?);

    Ok(())
}
