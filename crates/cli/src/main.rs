use clap::{Parser, Subcommand};
use mandi_core::client::{HttpRecommendationClient, RecommendationApi};
use mandi_core::domain::contract::RecommendationQuery;
use std::io::Write;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod prompt;
mod render;

#[derive(Debug, Parser)]
#[command(name = "mandi_cli", about = "Crop selling advice from the mandi recommendation service")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Pick a state and crop, enter location and quantity, then view the advice.
    Wizard,

    /// Ask for one recommendation without the interactive screens.
    Query {
        #[arg(long)]
        state: String,

        #[arg(long)]
        crop: String,

        /// District or town, e.g. Akola.
        #[arg(long)]
        location: String,

        /// Quantity in quintals.
        #[arg(long)]
        quantity: f64,

        /// Print the raw JSON record instead of the formatted card.
        #[arg(long)]
        json: bool,
    },

    /// Show the usage summary.
    Analytics {
        #[arg(long)]
        state: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = mandi_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let client = HttpRecommendationClient::from_settings(&settings)?;

    let res = run(args.command, &client).await;
    if let Err(err) = &res {
        sentry_anyhow::capture_anyhow(err);
    }
    res
}

async fn run(command: Command, api: &dyn RecommendationApi) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Wizard => {
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            prompt::run(api, &mut input, &mut out).await?;
        }
        Command::Query {
            state,
            crop,
            location,
            quantity,
            json,
        } => {
            let query = RecommendationQuery {
                state,
                crop,
                location,
                quantity: Some(quantity),
            };
            let recommendation = api.recommend(&query).await?;
            tracing::debug!(profile = %recommendation.profile, "received recommendation");
            if json {
                serde_json::to_writer_pretty(&mut out, &recommendation)?;
                writeln!(out)?;
            } else {
                render::recommendation(&mut out, &recommendation)?;
            }
        }
        Command::Analytics { state, json } => {
            let summary = api.analytics(state.as_deref()).await?;
            if json {
                serde_json::to_writer_pretty(&mut out, &summary)?;
                writeln!(out)?;
            } else {
                render::analytics(&mut out, &summary)?;
            }
        }
    }

    Ok(())
}

fn init_sentry(settings: &mandi_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
