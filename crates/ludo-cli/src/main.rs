//! Terminal Ludo.

use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod command;
mod session;
mod settings;
mod terminal;

use session::Session;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't interleave with the board output
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = settings::from_env(|key| std::env::var(key).ok())?;
    info!(players = ?config.players, seed = ?config.seed, "starting Ludo");

    let session = Session::new(config, std::io::stdout())?;
    session.run(BufReader::new(tokio::io::stdin())).await
}
