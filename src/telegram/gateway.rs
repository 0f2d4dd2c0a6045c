//! Chat Gateway: the Telegram calls the adapter makes.
//!
//! [`ChatGateway`] is the seam between dispatch logic and the transport.
//! [`TeloxideGateway`] implements it on a teloxide [`Bot`]; tests substitute
//! recording fakes.

use std::path::PathBuf;

use async_trait::async_trait;
use teloxide::payloads::{
    EditMessageTextSetters, SendDocumentSetters, SendMessageSetters, SendVideoSetters,
};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, InputFile, LinkPreviewOptions, MessageId, ParseMode};
use thiserror::Error;
use url::Url;

/// Errors from the chat transport.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The Telegram request failed (network, API error, rate limit).
    #[error("telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),
    /// The request was refused before reaching Telegram.
    #[error("telegram request rejected: {0}")]
    Rejected(String),
}

/// Options for sending a text message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendOptions {
    /// Inline keyboard under the message.
    pub markup: Option<InlineKeyboardMarkup>,
    /// Suppress link previews.
    pub disable_link_preview: bool,
    /// Deliver without a notification sound.
    pub silent: bool,
}

/// Options for editing a message's text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditOptions {
    /// Replacement inline keyboard.
    pub markup: Option<InlineKeyboardMarkup>,
    /// Suppress link previews.
    pub disable_link_preview: bool,
}

/// Options for documents and videos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaOptions {
    /// Deliver without a notification sound.
    pub silent: bool,
}

/// Where an uploaded file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// A local file, uploaded under a display name.
    Path {
        /// File on disk.
        path: PathBuf,
        /// Name shown to the recipient.
        filename: String,
    },
    /// A remote file fetched by Telegram.
    Url {
        /// http(s) URL.
        url: Url,
        /// Name shown to the recipient.
        filename: String,
    },
}

impl FileSource {
    /// Interpret `source` as a URL when it parses as http(s), otherwise as a path.
    pub fn parse(source: &str, filename: &str) -> Self {
        match Url::parse(source) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url {
                url,
                filename: filename.to_owned(),
            },
            _ => Self::Path {
                path: PathBuf::from(source),
                filename: filename.to_owned(),
            },
        }
    }

    fn into_input_file(self) -> InputFile {
        match self {
            Self::Path { path, filename } => InputFile::file(path).file_name(filename),
            Self::Url { url, filename } => InputFile::url(url).file_name(filename),
        }
    }
}

/// Telegram actions used by the adapter.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send a Markdown message; returns the new message ID.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        opts: SendOptions,
    ) -> Result<i32, GatewayError>;

    /// Replace the text (and keyboard) of an existing message.
    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
        opts: EditOptions,
    ) -> Result<(), GatewayError>;

    /// Delete a message.
    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), GatewayError>;

    /// Upload a document.
    async fn send_document(
        &self,
        chat_id: i64,
        file: FileSource,
        opts: MediaOptions,
    ) -> Result<(), GatewayError>;

    /// Upload a video.
    async fn send_video(
        &self,
        chat_id: i64,
        file: FileSource,
        opts: MediaOptions,
    ) -> Result<(), GatewayError>;

    /// Stop the loading spinner on a pressed inline button.
    async fn answer_callback(&self, callback_id: &str) -> Result<(), GatewayError>;
}

// ---------------------------------------------------------------------------
// teloxide implementation
// ---------------------------------------------------------------------------

/// [`ChatGateway`] backed by a teloxide [`Bot`].
#[derive(Debug, Clone)]
pub struct TeloxideGateway {
    bot: Bot,
}

impl TeloxideGateway {
    /// Wrap a bot handle. Cloning a [`Bot`] shares its HTTP client.
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn link_preview(disabled: bool) -> Option<LinkPreviewOptions> {
    disabled.then_some(LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    })
}

// Scenes are authored in legacy Markdown, not MarkdownV2.
#[allow(deprecated)]
const PARSE_MODE: ParseMode = ParseMode::Markdown;

#[async_trait]
impl ChatGateway for TeloxideGateway {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        opts: SendOptions,
    ) -> Result<i32, GatewayError> {
        let mut req = self
            .bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(PARSE_MODE)
            .disable_notification(opts.silent);
        if let Some(preview) = link_preview(opts.disable_link_preview) {
            req = req.link_preview_options(preview);
        }
        if let Some(markup) = opts.markup {
            req = req.reply_markup(markup);
        }
        let message = req.await?;
        Ok(message.id.0)
    }

    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
        opts: EditOptions,
    ) -> Result<(), GatewayError> {
        let mut req = self
            .bot
            .edit_message_text(ChatId(chat_id), MessageId(message_id), text)
            .parse_mode(PARSE_MODE);
        if let Some(preview) = link_preview(opts.disable_link_preview) {
            req = req.link_preview_options(preview);
        }
        if let Some(markup) = opts.markup {
            req = req.reply_markup(markup);
        }
        req.await?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), GatewayError> {
        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id))
            .await?;
        Ok(())
    }

    async fn send_document(
        &self,
        chat_id: i64,
        file: FileSource,
        opts: MediaOptions,
    ) -> Result<(), GatewayError> {
        self.bot
            .send_document(ChatId(chat_id), file.into_input_file())
            .disable_notification(opts.silent)
            .await?;
        Ok(())
    }

    async fn send_video(
        &self,
        chat_id: i64,
        file: FileSource,
        opts: MediaOptions,
    ) -> Result<(), GatewayError> {
        self.bot
            .send_video(ChatId(chat_id), file.into_input_file())
            .disable_notification(opts.silent)
            .await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), GatewayError> {
        self.bot.answer_callback_query(callback_id.to_owned()).await?;
        Ok(())
    }
}
