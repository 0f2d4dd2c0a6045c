//! Coordinator-owned presentation state.
//!
//! The adapter only understands the [`SceneKind`] fields it renders. The
//! coordinator may attach more; those are kept in [`Scene::extra`] and
//! written back out so a resent directive carries the scene unchanged.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::DeliveredMessage;

const MESSAGE_ID: &str = "messageId";
const TAG: &str = "tpe";

/// What is being shown to a user, plus the message it was delivered as.
///
/// On the wire a scene is one flat object: `messageId`, the `tpe` tag, the
/// kind's own fields, and anything else the coordinator put there.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Message this scene was delivered as, once known.
    pub message_id: Option<i32>,
    /// Scene kind and its kind-specific fields.
    pub kind: SceneKind,
    /// Fields outside the modeled kind. For [`SceneKind::Unknown`] this
    /// includes the original `tpe`.
    pub extra: Map<String, Value>,
}

impl Scene {
    /// A scene that has not been delivered yet.
    pub fn new(kind: SceneKind) -> Self {
        Self {
            message_id: None,
            kind,
            extra: Map::new(),
        }
    }

    /// Apply a delivery back-reference.
    pub fn record_delivery(&mut self, delivered: &DeliveredMessage) {
        self.message_id = Some(delivered.message_id);
    }

    /// Tag name used in logs.
    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }
}

fn kind_fields(kind: &SceneKind) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(kind)? {
        Value::Object(fields) => Ok(fields),
        other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
            "scene kind encoded as {other}, expected an object"
        ))),
    }
}

impl Serialize for Scene {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields = self.extra.clone();
        if self.kind != SceneKind::Unknown || !fields.contains_key(TAG) {
            fields.extend(kind_fields(&self.kind).map_err(<S::Error as serde::ser::Error>::custom)?);
        }
        if let Some(id) = self.message_id {
            fields.insert(MESSAGE_ID.to_owned(), Value::from(id));
        }
        fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Scene {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = Map::<String, Value>::deserialize(deserializer)?;
        let message_id = match extra.remove(MESSAGE_ID) {
            None | Some(Value::Null) => None,
            Some(id) => Some(i32::deserialize(id).map_err(<D::Error as serde::de::Error>::custom)?),
        };
        let kind = SceneKind::deserialize(Value::Object(extra.clone()))
            .map_err(<D::Error as serde::de::Error>::custom)?;
        if kind != SceneKind::Unknown {
            for key in kind_fields(&kind).map_err(<D::Error as serde::de::Error>::custom)?.keys() {
                extra.remove(key);
            }
        }
        Ok(Self {
            message_id,
            kind,
            extra,
        })
    }
}

/// Closed set of scene kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tpe", rename_all_fields = "camelCase")]
pub enum SceneKind {
    /// Greeting shown after `/start`.
    Start,
    /// Main menu.
    MainMenu,
    /// Device picker for setup instructions.
    SelectPlatform,
    /// VPN configuration files for mobile and desktop clients.
    GetConfigs {
        /// `.ovpn` profile for mobile clients.
        mobile_config_data: String,
        /// `.ovpn` profile for desktop clients.
        pc_config_data: String,
    },
    /// iPhone setup video.
    IphoneInstruction(VideoRef),
    /// macOS setup video.
    MacInstruction(VideoRef),
    /// Android setup video.
    AndroidInstruction(VideoRef),
    /// Windows setup video.
    WindowsInstruction(VideoRef),
    /// Free-form notice from an administrator.
    SendMassageToUser {
        /// Notice body (Markdown).
        text: String,
    },
    /// Any scene this adapter does not know how to render.
    #[serde(other)]
    Unknown,
}

impl SceneKind {
    /// Tag name used in logs.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::MainMenu => "MainMenu",
            Self::SelectPlatform => "SelectPlatform",
            Self::GetConfigs { .. } => "GetConfigs",
            Self::IphoneInstruction(_) => "IphoneInstruction",
            Self::MacInstruction(_) => "MacInstruction",
            Self::AndroidInstruction(_) => "AndroidInstruction",
            Self::WindowsInstruction(_) => "WindowsInstruction",
            Self::SendMassageToUser { .. } => "SendMassageToUser",
            Self::Unknown => "Unknown",
        }
    }

    /// The instruction video, if this is an instruction scene.
    pub fn instruction_video(&self) -> Option<&VideoRef> {
        match self {
            Self::IphoneInstruction(video)
            | Self::MacInstruction(video)
            | Self::AndroidInstruction(video)
            | Self::WindowsInstruction(video) => Some(video),
            _ => None,
        }
    }
}

/// A video to upload: display name plus a local path or http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRef {
    /// File name shown to the user.
    pub filename: String,
    /// Local path or http(s) URL.
    pub source: String,
}
