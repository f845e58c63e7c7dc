use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use risk_profiler::config::Config;
use risk_profiler::{catalog, is_portfolio_more_risky, ProfileStore, Session};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "risk_profiler", about = "Investor risk profiling and portfolio recommendation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the questionnaire
    Questions,
    /// Record an answer in the answers cache
    Answer { question: String, option: String },
    /// Print the profile snapshot for the cached (or given) answers
    Profile {
        #[arg(long)]
        answers: Option<PathBuf>,
    },
    /// Warn when the selected portfolio is riskier than the recommended one
    Compare { selected: String, recommended: String },
    /// Compute the profile and save it to the profile store
    Submit {
        #[arg(long)]
        user: String,
        #[arg(long)]
        answers: Option<PathBuf>,
    },
    /// Fetch a user's saved profile from the profile store
    Fetch {
        #[arg(long)]
        user: String,
    },
}

fn profile_store(config: &Config) -> Result<ProfileStore> {
    let Some(url) = &config.store_url else {
        bail!("PROFILE_STORE_URL is not set");
    };
    Ok(ProfileStore::new(
        url,
        config.store_api_key.as_deref(),
        config.store_timeout,
    )?)
}

/// An explicit `--answers` file must exist; the default cache may be missing.
fn open_answers(answers: Option<&Path>, config: &Config) -> Result<Session> {
    let session = match answers {
        Some(path) => Session::open(path),
        None => Session::open_or_new(&config.answers_cache),
    };
    Ok(session?)
}

fn print_questions() {
    for q in catalog() {
        println!("{}: {}", q.id, q.prompt);
        for o in &q.options {
            println!("  [{}] {}", o.id, o.text);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Questions => print_questions(),
        Command::Answer { question, option } => {
            let mut session = Session::open_or_new(&config.answers_cache)?;
            session.answer(&question, &option)?;
            session.save()?;
            let missing = session.missing_questions();
            if missing.is_empty() {
                println!("Questionnaire complete, score {}", session.partial_score());
            } else {
                println!("{} question(s) left: {}", missing.len(), missing.join(", "));
            }
        }
        Command::Profile { answers } => {
            let session = open_answers(answers.as_deref(), &config)?;
            let snapshot = session.snapshot()?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Command::Compare { selected, recommended } => {
            if is_portfolio_more_risky(&selected, &recommended) {
                println!("Warning: '{}' is riskier than the recommended '{}'", selected, recommended);
            } else {
                println!("'{}' is not riskier than '{}'", selected, recommended);
            }
        }
        Command::Submit { user, answers } => {
            let session = open_answers(answers.as_deref(), &config)?;
            let snapshot = session.snapshot()?;
            profile_store(&config)?
                .save_profile(&user, &snapshot)
                .await
                .with_context(|| format!("saving profile for {}", user))?;
            println!(
                "Saved profile for {}: score {}, portfolio {}",
                user, snapshot.score, snapshot.recommended_portfolio
            );
        }
        Command::Fetch { user } => {
            match profile_store(&config)?.fetch_profile(&user).await? {
                Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                None => println!("No profile stored for {}", user),
            }
        }
    }

    Ok(())
}
