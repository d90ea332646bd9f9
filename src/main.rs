//! Roster console client
//!
//! Interactive terminal front end for a remote team member collection.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use roster_client::api::HttpRosterService;
use roster_client::config::{Config, LogFormat};
use roster_client::console::{self, Command, Flow};
use roster_client::session::{Outcome, RosterSession, SessionSettings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging on stderr so it does not interleave with the screen
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    tracing::info!("Starting roster client");
    tracing::info!("Collection URL: {}", config.collection_url());
    if config.api_key.is_none() {
        tracing::warn!("No API key configured (ROSTER_API_KEY); requests are unauthenticated");
    }

    let service = Arc::new(HttpRosterService::new(&config)?);
    let mut session = RosterSession::start(service, SessionSettings::from(&config));

    println!("{}", console::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match Command::parse(&line) {
                    Ok(command) => command,
                    Err(err) => {
                        println!("{}", err.message());
                        continue;
                    }
                };
                if command == Command::Help {
                    println!("{}", console::HELP);
                    continue;
                }
                match console::apply(&mut session, command) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => print!("{}", console::render(&session.view())),
                    Err(err) => println!("{}", err.message()),
                }
            }
            outcome = session.step() => {
                match outcome {
                    // Redraw when something visible changed.
                    Some(Outcome::FetchApplied(_))
                    | Some(Outcome::FetchFailed(_))
                    | Some(Outcome::MutationSucceeded { .. })
                    | Some(Outcome::MutationFailed { .. })
                    | Some(Outcome::ToastExpired) => {
                        print!("{}", console::render(&session.view()));
                    }
                    Some(_) => {}
                    None => break,
                }
            }
        }
    }

    session.shutdown();
    tracing::info!("Roster client stopped");
    Ok(())
}
