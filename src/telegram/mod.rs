//! Telegram adapter: gateway, inbound normalization, outbound dispatch, and
//! the bot lifecycle.
//!
//! [`TelegramAdapter`] owns the teloxide dispatcher that receives updates.
//! Outbound directives do not pass through it; they go straight to an
//! [`outbound::OutboundDispatcher`] sharing the same [`gateway::ChatGateway`].

use std::sync::Arc;

use anyhow::Context;
use teloxide::dispatching::{ShutdownToken, UpdateFilterExt};
use teloxide::prelude::*;
use tokio::sync::Mutex;
use tracing::{debug, info};

use self::inbound::{CallbackEvent, InboundNormalizer, TextEvent};

pub mod files;
pub mod gateway;
pub mod inbound;
pub mod outbound;
pub mod ui;

/// Receives updates from Telegram and feeds them to the normalizer.
pub struct TelegramAdapter {
    bot: Bot,
    normalizer: Arc<InboundNormalizer>,
    shutdown: Mutex<Option<ShutdownToken>>,
}

impl std::fmt::Debug for TelegramAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramAdapter")
            .field("normalizer", &self.normalizer)
            .finish_non_exhaustive()
    }
}

impl TelegramAdapter {
    /// Adapter on an existing bot handle.
    pub fn new(bot: Bot, normalizer: Arc<InboundNormalizer>) -> Self {
        Self {
            bot,
            normalizer,
            shutdown: Mutex::new(None),
        }
    }

    /// Adapter binding a new bot with `token`.
    pub fn with_token(token: &str, normalizer: Arc<InboundNormalizer>) -> Self {
        Self::new(Bot::new(token), normalizer)
    }

    /// The bound bot handle.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Whether [`launch`](Self::launch) is currently receiving updates.
    pub async fn is_running(&self) -> bool {
        self.shutdown.lock().await.is_some()
    }

    /// Register handlers and receive updates until [`stop`](Self::stop) is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the bot token is rejected by Telegram.
    pub async fn launch(&self) -> anyhow::Result<()> {
        let me = self
            .bot
            .get_me()
            .await
            .context("telegram rejected the bot token")?;
        info!(username = ?me.username, "telegram bot authenticated");

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(handle_message))
            .branch(Update::filter_callback_query().endpoint(handle_callback));

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![Arc::clone(&self.normalizer)])
            .default_handler(|update| async move {
                debug!(update_id = update.id.0, "ignoring unsupported update");
            })
            .build();

        *self.shutdown.lock().await = Some(dispatcher.shutdown_token());

        info!("telegram dispatcher starting");
        dispatcher.dispatch().await;
        info!("telegram dispatcher stopped");

        self.shutdown.lock().await.take();
        Ok(())
    }

    /// Ask the dispatcher to stop. A no-op if it was never launched.
    pub async fn stop(&self) {
        let token = self.shutdown.lock().await.take();
        let Some(token) = token else {
            debug!("stop requested but telegram dispatcher is not running");
            return;
        };
        let requested = token.shutdown();
        match requested {
            Ok(stopped) => {
                stopped.await;
                info!("telegram dispatcher shut down");
            }
            Err(_) => debug!("telegram dispatcher already idle"),
        };
    }
}

async fn handle_message(msg: Message, normalizer: Arc<InboundNormalizer>) -> ResponseResult<()> {
    match TextEvent::from_message(&msg) {
        Some(event) => normalizer.handle_text(event).await,
        None => debug!(chat_id = msg.chat.id.0, "ignoring message without usable sender or text"),
    }
    Ok(())
}

async fn handle_callback(query: CallbackQuery, normalizer: Arc<InboundNormalizer>) -> ResponseResult<()> {
    if let Some(event) = CallbackEvent::from_query(&query) {
        normalizer.handle_callback(event).await;
    }
    Ok(())
}
