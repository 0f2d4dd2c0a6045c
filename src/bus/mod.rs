//! Message Bus: how the adapter talks to its parent coordinator.
//!
//! Every message carries a target name and a payload. The adapter emits
//! [`BusMessage`]s and receives [`ParentDirective`]s.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::types::{DeliveryReceipt, InboundMessage, OutboundMessage};

pub mod stdio;

/// Bus target for normalized inbound events.
pub const PROCESS_INBOUND: &str = "processInboundTelegramMessage";
/// Bus target asking the coordinator to resend or confirm a delivery.
pub const PROCESS_RESEND: &str = "processResendOutboundMessage";
/// Bus target reporting the message produced by a send.
pub const PROCESS_DELIVERED: &str = "processDeliveredOutboundMessage";
/// Handler name for outbound directives addressed to the adapter.
pub const PROCESS_OUTBOUND: &str = "processOutboundTelegramMessage";

/// Messages sent from the adapter to its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", content = "payload")]
pub enum BusMessage {
    /// A normalized inbound chat event.
    #[serde(rename = "processInboundTelegramMessage")]
    Inbound(InboundMessage),
    /// Files for this directive were delivered; the coordinator may continue.
    #[serde(rename = "processResendOutboundMessage")]
    Resend(OutboundMessage),
    /// A scene was delivered as a new message.
    #[serde(rename = "processDeliveredOutboundMessage")]
    Delivered(DeliveryReceipt),
}

impl BusMessage {
    /// Target name of this message.
    pub fn target(&self) -> &'static str {
        match self {
            Self::Inbound(_) => PROCESS_INBOUND,
            Self::Resend(_) => PROCESS_RESEND,
            Self::Delivered(_) => PROCESS_DELIVERED,
        }
    }
}

/// Messages the parent sends to the adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", content = "payload")]
pub enum ParentDirective {
    /// Render an outbound directive.
    #[serde(rename = "processOutboundTelegramMessage")]
    Outbound(OutboundMessage),
}

/// Bus failures.
#[derive(Debug, Error)]
pub enum BusError {
    /// The receiving side has gone away.
    #[error("bus closed")]
    Closed,
    /// Writing to the parent failed.
    #[error("bus I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The message could not be encoded.
    #[error("bus encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Sends messages to the parent coordinator.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Deliver one message to the parent.
    async fn send(&self, message: BusMessage) -> Result<(), BusError>;
}

/// In-process bus backed by an mpsc channel.
#[derive(Debug, Clone)]
pub struct ChannelBus {
    tx: mpsc::Sender<BusMessage>,
}

impl ChannelBus {
    /// Bus writing into `tx`.
    pub fn new(tx: mpsc::Sender<BusMessage>) -> Self {
        Self { tx }
    }

    /// Bus plus the receiving end, with the given buffer size.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<BusMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl MessageBus for ChannelBus {
    async fn send(&self, message: BusMessage) -> Result<(), BusError> {
        self.tx.send(message).await.map_err(|_| BusError::Closed)
    }
}
