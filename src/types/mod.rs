//! Envelope types exchanged with the coordinator.
//!
//! Wire format: variant tags live in a `tpe` field and all field names are
//! camelCase, matching the envelopes the coordinator already produces.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod scene;

pub use scene::{Scene, SceneKind, VideoRef};

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Routing tag partitioning which bot credential set a message belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Channel(pub String);

impl Channel {
    /// Create a channel tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Borrow the raw tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Snapshot of the Telegram user captured when an event arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatUser {
    /// Telegram user ID.
    #[serde(rename = "telegramUserId")]
    pub user_id: i64,
    /// `@username`, without the at-sign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// First name as set in the Telegram profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name as set in the Telegram profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// IETF language tag reported by the client (e.g. `en`, `ru-RU`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    /// Coordinator fields not modeled here; echoed back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatUser {
    /// User with only an ID set.
    pub fn with_id(user_id: i64) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// A normalized inbound chat event, forwarded once to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    /// Channel of the adapter that received the event.
    pub channel: Channel,
    /// Sender snapshot.
    #[serde(rename = "telegramUser")]
    pub chat_user: ChatUser,
    /// What the user did.
    pub input_payload: InputPayload,
}

/// Inbound payload kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tpe", rename_all_fields = "camelCase")]
pub enum InputPayload {
    /// A plain text message.
    TextInput {
        /// Message text.
        text: String,
        /// ID of the user's message.
        message_id: i32,
    },
    /// An inline keyboard button press.
    CallbackInput {
        /// Callback data attached to the button; empty if absent.
        data: String,
        /// ID of the message carrying the keyboard; `0` if unknown.
        message_id: i32,
    },
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// A rendering directive from the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    /// Channel the directive is addressed to.
    pub channel: Channel,
    /// Target chat.
    pub chat_id: i64,
    /// User the chat belongs to; drives locale selection.
    pub user_data: ChatUser,
    /// What to render.
    pub output_payload: OutputPayload,
    /// Coordinator fields not modeled here; echoed back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Outbound payload kinds. One tag, one arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tpe", rename_all_fields = "camelCase")]
pub enum OutputPayload {
    /// Render a scene as a new message.
    SendOutput {
        /// Scene to render.
        scene: Scene,
    },
    /// Delete a previously sent message.
    DeleteMessageOutput {
        /// Message to delete.
        message_id: i32,
    },
    /// Re-render a scene into the message it was delivered as.
    EditOutput {
        /// Scene to render; `messageId` must be set.
        scene: Scene,
    },
    /// Send raw Markdown text.
    TextOutput {
        /// Text to send.
        text: String,
    },
    /// Deliver files attached to a scene (config documents or instruction videos).
    SendFile {
        /// Scene carrying the file payloads.
        scene: Scene,
    },
    /// Administrative notice to a user, delivered with notification.
    #[serde(alias = "SendAdminMassage")]
    SendAdminMessage {
        /// Scene to render; only `SendMassageToUser` is acted on.
        scene: Scene,
    },
}

impl OutputPayload {
    /// Tag name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SendOutput { .. } => "SendOutput",
            Self::DeleteMessageOutput { .. } => "DeleteMessageOutput",
            Self::EditOutput { .. } => "EditOutput",
            Self::TextOutput { .. } => "TextOutput",
            Self::SendFile { .. } => "SendFile",
            Self::SendAdminMessage { .. } => "SendAdminMessage",
        }
    }
}

/// Back-reference to a message produced by a `SendOutput` dispatch.
///
/// The coordinator owns the scene and applies this with
/// [`Scene::record_delivery`] before issuing later edits or deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveredMessage {
    /// Chat the message was sent to.
    pub chat_id: i64,
    /// Platform message ID.
    pub message_id: i32,
}

/// Delivery receipt reported to a parent process over the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
    /// Channel of the adapter that delivered the message.
    pub channel: Channel,
    /// Chat the message was sent to.
    pub chat_id: i64,
    /// Platform message ID.
    pub message_id: i32,
}

impl DeliveryReceipt {
    /// Build a receipt for a delivered message on `channel`.
    pub fn new(channel: Channel, delivered: DeliveredMessage) -> Self {
        Self {
            channel,
            chat_id: delivered.chat_id,
            message_id: delivered.message_id,
        }
    }
}
