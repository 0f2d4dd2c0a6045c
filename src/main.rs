//! telegram-bridge binary.
//!
//! `start` runs the adapter as a supervised child: directives arrive as JSON
//! lines on stdin, bus messages leave as JSON lines on stdout, logs go to
//! stderr. `check` validates the configuration without connecting.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use teloxide::Bot;
use tokio::sync::oneshot;
use tracing::{info, warn};

use telegram_bridge::bus::stdio::{serve_directives, JsonLinesBus};
use telegram_bridge::bus::MessageBus;
use telegram_bridge::config::{self, Config};
use telegram_bridge::l10n::LocaleRegistry;
use telegram_bridge::logging;
use telegram_bridge::telegram::gateway::{ChatGateway, TeloxideGateway};
use telegram_bridge::telegram::inbound::InboundNormalizer;
use telegram_bridge::telegram::outbound::OutboundDispatcher;
use telegram_bridge::telegram::TelegramAdapter;

/// How long to wait for the update receiver after asking it to stop.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Parser)]
#[command(name = "telegram-bridge", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the adapter, speaking JSON lines over stdio.
    Start {
        /// Config file (default: ~/.telegram-bridge/config.toml).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate the config file and bot token variable.
    Check {
        /// Config file (default: ~/.telegram-bridge/config.toml).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    match cli.command {
        Command::Start { config } => start(config).await,
        Command::Check { config } => check(config),
    }
}

fn load(path: Option<PathBuf>) -> Result<(PathBuf, Config)> {
    let path = match path {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    let config = config::load_config(&path)?;
    Ok((path, config))
}

fn check(path: Option<PathBuf>) -> Result<()> {
    let (path, config) = load(path)?;
    config::resolve_bot_token(&config.telegram)?;
    println!("config: {}", path.display());
    println!("channel: {}", config.telegram.channel);
    println!(
        "locale: {:?} ({})",
        config.locale.strategy, config.locale.default_locale
    );
    println!("temp dir: {}", config.files.temp_dir.display());
    println!("bot token: read from {}", config.telegram.bot_token_env);
    Ok(())
}

enum Exit {
    Adapter,
    InputClosed,
    Signal,
}

async fn start(path: Option<PathBuf>) -> Result<()> {
    let (path, config) = load(path)?;
    let _log_guard = logging::init(&config.logging)?;
    info!(config = %path.display(), channel = %config.telegram.channel, "telegram-bridge starting");

    let token = config::resolve_bot_token(&config.telegram)?;
    let channel = config.telegram.channel.clone();
    let bot = Bot::new(token);

    let gateway: Arc<dyn ChatGateway> = Arc::new(TeloxideGateway::new(bot.clone()));
    let bus: Arc<dyn MessageBus> = Arc::new(JsonLinesBus::stdout());
    let locales = Arc::new(LocaleRegistry::with_builtin(config.locale.resolver()));

    let dispatcher = Arc::new(OutboundDispatcher::new(
        channel.clone(),
        Arc::clone(&gateway),
        Arc::clone(&bus),
        locales,
        config.files.temp_dir.clone(),
    ));
    let normalizer = Arc::new(InboundNormalizer::new(channel, gateway, Arc::clone(&bus)));
    let adapter = Arc::new(TelegramAdapter::new(bot, normalizer));

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let (stop_directives, directives_stopped) = oneshot::channel::<()>();
    let mut directives = tokio::spawn(serve_directives(stdin, dispatcher, bus, async move {
        let _ = directives_stopped.await;
    }));
    let mut receiver = {
        let adapter = Arc::clone(&adapter);
        tokio::spawn(async move { adapter.launch().await })
    };

    let mut result = Ok(());
    let exit = tokio::select! {
        joined = &mut receiver => {
            result = joined
                .context("telegram adapter task panicked")
                .and_then(|r| r);
            Exit::Adapter
        }
        joined = &mut directives => {
            info!("parent closed stdin, shutting down");
            log_directive_exit(joined);
            Exit::InputClosed
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received shutdown signal");
            Exit::Signal
        }
    };

    adapter.stop().await;
    if !matches!(exit, Exit::Adapter) {
        match tokio::time::timeout(SHUTDOWN_GRACE, &mut receiver).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => warn!(error = %e, "telegram adapter stopped with an error"),
            Ok(Err(e)) => warn!(error = %e, "telegram adapter task failed during shutdown"),
            Err(_) => {
                warn!("telegram adapter did not stop in time, aborting");
                receiver.abort();
            }
        }
    }
    if !matches!(exit, Exit::InputClosed) {
        // Stops reading only; dispatches already started finish first.
        let _ = stop_directives.send(());
        log_directive_exit(directives.await);
    }

    info!("telegram-bridge stopped");
    result
}

fn log_directive_exit(joined: Result<std::io::Result<()>, tokio::task::JoinError>) {
    match joined {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "directive reader failed"),
        Err(e) => warn!(error = %e, "directive reader task failed"),
    }
}
