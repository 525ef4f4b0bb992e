mod completion;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use hearth_core::{
    Engine, ScoredTurn, Utterance, build_completion_messages, calculate_wellness_score,
    engagement_score, predict_user_needs,
};
use hearth_store::config::API_KEY_ENV;
use hearth_store::{EngineConfig, Store, default_data_dir};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use uuid::Uuid;

use crate::completion::CompletionClient;

/// Prior utterances loaded as context for a turn.
const HISTORY_WINDOW: usize = 9;
/// Mood entries consulted for persistent-mood detection.
const MOOD_WINDOW: usize = 3;
/// Signals consulted for the wellness score.
const WELLNESS_MOODS: usize = 10;
const WELLNESS_TURNS: usize = 50;

#[derive(Parser)]
#[command(name = "hearth", about = "Conversational sentiment and risk engine")]
struct Cli {
    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    /// Seed for reply selection (random when omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Config file (defaults to hearth.toml in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a text and print the analysis as JSON
    Analyze {
        /// Text to score
        text: String,
    },

    /// Send a message and print the reply
    Chat {
        /// Message text
        text: String,

        /// Session to continue (latest open session, or a new one, if omitted)
        #[arg(long)]
        session: Option<Uuid>,

        /// Print the full turn outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a self-reported mood
    Mood {
        /// Mood name, e.g. happy, sad, anxious
        mood: String,

        /// Intensity from 1 to 10
        #[arg(long, default_value_t = 5)]
        intensity: u8,
    },

    /// Summarize and close a session
    Close {
        /// Session to close (latest open session if omitted)
        #[arg(long)]
        session: Option<Uuid>,
    },

    /// Show storage and wellness statistics
    Stats,
}

fn data_dir() -> PathBuf {
    std::env::var("HEARTH_DATA_DIR")
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(default_data_dir)
}

fn open_store(dir: &Path) -> Result<Store> {
    Store::open_dir(dir).context("failed to open store")
}

fn load_config(cli: &Cli, dir: &Path) -> Result<EngineConfig> {
    let config = EngineConfig::resolve(cli.config.as_deref(), dir)
        .context("failed to load config")?
        .with_api_key(std::env::var(API_KEY_ENV).ok());
    Ok(config)
}

fn rng(cli: &Cli) -> SmallRng {
    match cli.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Analyze { text } => cmd_analyze(&cli, text),
        Commands::Chat {
            text,
            session,
            json,
        } => cmd_chat(&cli, text, *session, *json).await,
        Commands::Mood { mood, intensity } => cmd_mood(mood, *intensity),
        Commands::Close { session } => cmd_close(&cli, *session),
        Commands::Stats => cmd_stats(&cli),
    }
}

fn cmd_analyze(cli: &Cli, text: &str) -> Result<()> {
    let config = load_config(cli, &data_dir())?;
    let engine = Engine::new(config.lexicon);

    let analysis = engine.analyze(text);
    let json = serde_json::to_string_pretty(&analysis).context("failed to serialize analysis")?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
struct ChatOutput<'a> {
    session: Uuid,
    #[serde(flatten)]
    outcome: &'a hearth_core::TurnOutcome,
}

async fn cmd_chat(cli: &Cli, text: &str, session: Option<Uuid>, json: bool) -> Result<()> {
    if text.trim().is_empty() {
        bail!("message text is empty");
    }

    let dir = data_dir();
    let config = load_config(cli, &dir)?;
    let store = open_store(&dir)?;
    let session = resolve_session(&store, session)?;

    let prior = store
        .load_history(session, HISTORY_WINDOW)
        .context("failed to load history")?;
    let moods = store
        .recent_moods(MOOD_WINDOW)
        .context("failed to load moods")?;

    let client = CompletionClient::new(config.completion);
    let engine = Engine::new(config.lexicon);
    let turn = engine.score_turn(text);

    let remote = match &client {
        Some(client) => client.complete(completion_messages(&turn, &prior)).await,
        None => None,
    };

    let outcome = engine.complete_turn(&turn, &prior, &moods, remote.as_deref(), rng(cli));
    tracing::info!(
        "turn scored: sentiment={:.3} risk={} priority={} effective={} source={}",
        outcome.sentiment_score,
        outcome.risk_level,
        outcome.priority,
        outcome.effective_priority,
        outcome.source.as_str()
    );

    store
        .append_utterance(session, &turn.utterance())
        .context("failed to save message")?;
    store
        .append_utterance(session, &Utterance::assistant(outcome.reply_text.clone()))
        .context("failed to save reply")?;

    if json {
        let out = ChatOutput {
            session,
            outcome: &outcome,
        };
        let json = serde_json::to_string_pretty(&out).context("failed to serialize outcome")?;
        println!("{json}");
    } else {
        println!("{}", outcome.reply_text);
        if cli.verbose {
            eprintln!(
                "--- session={session} risk={} priority={} source={} ---",
                outcome.risk_level,
                outcome.effective_priority,
                outcome.source.as_str()
            );
        }
    }
    Ok(())
}

fn completion_messages(turn: &ScoredTurn, prior: &[Utterance]) -> Vec<hearth_core::ChatMessage> {
    build_completion_messages(
        &turn.text,
        prior,
        turn.analysis.sentiment_label,
        turn.analysis.risk_level,
    )
}

fn resolve_session(store: &Store, requested: Option<Uuid>) -> Result<Uuid> {
    if let Some(id) = requested {
        if !store.session_exists(id)? {
            bail!("unknown session {id}");
        }
        if !store.is_session_open(id)? {
            bail!("session {id} is closed");
        }
        return Ok(id);
    }
    if let Some(id) = store
        .latest_open_session()
        .context("failed to look up session")?
    {
        return Ok(id);
    }
    store.create_session().context("failed to create session")
}

fn cmd_mood(mood: &str, intensity: u8) -> Result<()> {
    let store = open_store(&data_dir())?;
    let session = store
        .latest_open_session()
        .context("failed to look up session")?;
    store
        .add_mood_entry(session, mood, intensity)
        .context("failed to record mood")?;
    println!("recorded mood {} ({intensity}/10)", mood.trim());
    Ok(())
}

fn cmd_close(cli: &Cli, session: Option<Uuid>) -> Result<()> {
    let dir = data_dir();
    let config = load_config(cli, &dir)?;
    let store = open_store(&dir)?;

    let session = match session {
        Some(id) => id,
        None => match store.latest_open_session()? {
            Some(id) => id,
            None => bail!("no open session"),
        },
    };

    let history = store
        .session_history(session)
        .context("failed to load history")?;
    let summary = Engine::new(config.lexicon).summarize(&history);
    store
        .close_session(session, &summary)
        .context("failed to close session")?;

    println!("{summary}");
    Ok(())
}

fn cmd_stats(cli: &Cli) -> Result<()> {
    let dir = data_dir();
    let config = load_config(cli, &dir)?;
    let store = open_store(&dir)?;

    let stats = store.stats().context("failed to read stats")?;
    let moods = store.recent_moods(WELLNESS_MOODS)?;
    let turns = store.recent_user_utterances(WELLNESS_TURNS)?;

    let scores: Vec<f64> = turns.iter().filter_map(|u| u.sentiment_score).collect();
    let risks: Vec<u8> = turns.iter().map(|u| u.risk_level).collect();
    let engagement = engagement_score(stats.sessions as usize, stats.user_utterances as usize);
    let wellness = calculate_wellness_score(&moods, &scores, &risks, engagement, &config.lexicon);
    let needs: Vec<&str> = predict_user_needs(&turns, wellness)
        .into_iter()
        .map(|n| n.as_str())
        .collect();

    println!("sessions:   {} ({} open)", stats.sessions, stats.open_sessions);
    println!("messages:   {}", stats.utterances);
    println!("moods:      {}", stats.mood_entries);
    println!("wellness:   {wellness:.1}");
    println!(
        "needs:      {}",
        if needs.is_empty() {
            "-".to_string()
        } else {
            needs.join(", ")
        }
    );
    Ok(())
}
