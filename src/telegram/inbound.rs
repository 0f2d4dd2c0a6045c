//! Inbound normalization: Telegram events into [`InboundMessage`]s.
//!
//! Raw teloxide types are first reduced to [`TextEvent`] / [`CallbackEvent`]
//! so the normalization itself can be exercised without a live bot.

use std::sync::Arc;

use teloxide::types::{CallbackQuery, Message, User};
use tracing::{debug, warn};

use super::gateway::ChatGateway;
use crate::bus::{BusMessage, MessageBus};
use crate::types::{Channel, ChatUser, InboundMessage, InputPayload};

/// A text message from a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEvent {
    /// Sender.
    pub from: ChatUser,
    /// Message ID.
    pub message_id: i32,
    /// Message text.
    pub text: String,
}

impl TextEvent {
    /// Extract a text event. `None` for messages without sender or text, or
    /// whose sender ID does not fit the envelope.
    pub fn from_message(msg: &Message) -> Option<Self> {
        let from = msg.from.as_ref()?;
        let text = msg.text()?;
        Some(Self {
            from: chat_user(from)?,
            message_id: msg.id.0,
            text: text.to_owned(),
        })
    }
}

/// An inline keyboard button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackEvent {
    /// Callback query ID, used to acknowledge the press.
    pub id: String,
    /// Who pressed.
    pub from: ChatUser,
    /// Callback data, if any.
    pub data: Option<String>,
    /// ID of the message carrying the keyboard, if still accessible.
    pub message_id: Option<i32>,
}

impl CallbackEvent {
    /// Extract a callback event. `None` if the sender ID does not fit the
    /// envelope.
    pub fn from_query(query: &CallbackQuery) -> Option<Self> {
        Some(Self {
            id: query.id.clone(),
            from: chat_user(&query.from)?,
            data: query.data.clone(),
            message_id: query.message.as_ref().map(|m| m.id().0),
        })
    }
}

/// Snapshot a teloxide user.
///
/// teloxide carries user IDs as `u64` and the envelope as `i64`. An ID past
/// `i64::MAX` cannot be represented, so the event is dropped with a warning.
pub fn chat_user(user: &User) -> Option<ChatUser> {
    let Ok(user_id) = i64::try_from(user.id.0) else {
        warn!(user_id = user.id.0, "dropping event from user with out-of-range ID");
        return None;
    };
    Some(ChatUser {
        user_id,
        username: user.username.clone(),
        first_name: Some(user.first_name.clone()),
        last_name: user.last_name.clone(),
        language_code: user.language_code.clone(),
        ..ChatUser::default()
    })
}

/// Build the envelope for a text event.
pub fn normalize_text(channel: &Channel, event: TextEvent) -> InboundMessage {
    InboundMessage {
        channel: channel.clone(),
        chat_user: event.from,
        input_payload: InputPayload::TextInput {
            text: event.text,
            message_id: event.message_id,
        },
    }
}

/// Build the envelope for a callback event.
pub fn normalize_callback(channel: &Channel, event: CallbackEvent) -> InboundMessage {
    InboundMessage {
        channel: channel.clone(),
        chat_user: event.from,
        input_payload: InputPayload::CallbackInput {
            data: event.data.unwrap_or_default(),
            message_id: event.message_id.unwrap_or(0),
        },
    }
}

/// Forwards inbound events to the coordinator.
///
/// Handlers never fail: acknowledgment and forwarding errors are logged and
/// dropped, one attempt per event.
pub struct InboundNormalizer {
    channel: Channel,
    gateway: Arc<dyn ChatGateway>,
    bus: Arc<dyn MessageBus>,
}

impl std::fmt::Debug for InboundNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboundNormalizer")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

impl InboundNormalizer {
    /// Normalizer stamping events with `channel`.
    pub fn new(channel: Channel, gateway: Arc<dyn ChatGateway>, bus: Arc<dyn MessageBus>) -> Self {
        Self {
            channel,
            gateway,
            bus,
        }
    }

    /// Forward a text message.
    pub async fn handle_text(&self, event: TextEvent) {
        debug!(user_id = event.from.user_id, message_id = event.message_id, "text received");
        let msg = normalize_text(&self.channel, event);
        self.forward(msg).await;
    }

    /// Acknowledge a button press, then forward it.
    pub async fn handle_callback(&self, event: CallbackEvent) {
        debug!(user_id = event.from.user_id, "callback received");
        if let Err(e) = self.gateway.answer_callback(&event.id).await {
            warn!(error = %e, "failed to answer callback query");
        }
        let msg = normalize_callback(&self.channel, event);
        self.forward(msg).await;
    }

    async fn forward(&self, msg: InboundMessage) {
        let user_id = msg.chat_user.user_id;
        if let Err(e) = self.bus.send(BusMessage::Inbound(msg)).await {
            warn!(user_id, error = %e, "failed to forward inbound message");
        }
    }
}
