//! Outbound directive dispatch.
//!
//! Each [`OutboundMessage`] is rendered as one or two Telegram actions. A
//! dispatch never fails from the caller's point of view: every step's result
//! is recorded in a [`DispatchReport`], the first failing step aborts the
//! rest, and the report says where it stopped. Temp file cleanup is the only
//! step whose failure does not abort.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use super::files::{self, TempFiles, MOBILE_CONFIG_NAME, PC_CONFIG_NAME};
use super::gateway::{ChatGateway, EditOptions, FileSource, GatewayError, MediaOptions, SendOptions};
use super::ui;
use crate::bus::{BusError, BusMessage, MessageBus};
use crate::l10n::LocaleRegistry;
use crate::types::{
    Channel, DeliveredMessage, OutboundMessage, OutputPayload, Scene, SceneKind, VideoRef,
};

const SILENT_MEDIA: MediaOptions = MediaOptions { silent: true };

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// One externally visible action within a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// `sendMessage`.
    SendMessage,
    /// `editMessageText`.
    EditMessage,
    /// `deleteMessage`.
    DeleteMessage,
    /// Writing a temp config file.
    WriteFile,
    /// `sendDocument`.
    SendDocument,
    /// Removing a temp config file.
    RemoveFile,
    /// `sendVideo`.
    SendVideo,
    /// Bus notification to `processResendOutboundMessage`.
    NotifyResend,
}

impl Step {
    /// Name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SendMessage => "send_message",
            Self::EditMessage => "edit_message",
            Self::DeleteMessage => "delete_message",
            Self::WriteFile => "write_file",
            Self::SendDocument => "send_document",
            Self::RemoveFile => "remove_file",
            Self::SendVideo => "send_video",
            Self::NotifyResend => "notify_resend",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a step failed.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The chat transport failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    /// The parent could not be notified.
    #[error(transparent)]
    Bus(#[from] BusError),
    /// A temp file could not be written or removed.
    #[error("{}: {source}", path.display())]
    File {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// An edit was requested for a scene that was never delivered.
    #[error("scene has no messageId to edit")]
    MissingMessageId,
}

impl DispatchError {
    fn file(path: &Path, source: std::io::Error) -> Self {
        Self::File {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// The step.
    pub step: Step,
    /// Rendered error, if it failed.
    pub error: Option<String>,
}

impl StepRecord {
    /// Whether the step succeeded.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Why a directive was deliberately not acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Addressed to another adapter's channel.
    ChannelMismatch,
    /// The scene is not one this payload kind handles.
    UnmatchedScene,
}

/// How a dispatch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Every step succeeded (cleanup failures aside).
    Completed,
    /// Nothing was done.
    Ignored(IgnoreReason),
    /// A step failed and the remaining steps were skipped.
    Aborted {
        /// Failing step.
        step: Step,
        /// Rendered error.
        error: String,
    },
}

/// Everything a dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Payload kind of the directive.
    pub kind: &'static str,
    /// How it ended.
    pub outcome: DispatchOutcome,
    /// Steps attempted, in order.
    pub steps: Vec<StepRecord>,
    /// Message produced by a successful `SendOutput`.
    pub delivered: Option<DeliveredMessage>,
}

impl DispatchReport {
    fn ignored(kind: &'static str, reason: IgnoreReason) -> Self {
        Self {
            kind,
            outcome: DispatchOutcome::Ignored(reason),
            steps: Vec::new(),
            delivered: None,
        }
    }

    /// Whether the dispatch ran to completion.
    pub fn is_completed(&self) -> bool {
        self.outcome == DispatchOutcome::Completed
    }

    /// Failed steps, including ignored cleanup failures.
    pub fn failed_steps(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|s| !s.succeeded())
    }
}

// ---------------------------------------------------------------------------
// Step bookkeeping
// ---------------------------------------------------------------------------

struct StepFailure {
    step: Step,
    error: DispatchError,
}

enum Flow {
    Done(Option<DeliveredMessage>),
    Ignored(IgnoreReason),
}

#[derive(Default)]
struct Trace {
    steps: Vec<StepRecord>,
}

impl Trace {
    /// Record a step that aborts the dispatch on failure.
    fn check<T, E>(&mut self, step: Step, result: Result<T, E>) -> Result<T, StepFailure>
    where
        E: Into<DispatchError>,
    {
        match result {
            Ok(value) => {
                self.steps.push(StepRecord { step, error: None });
                Ok(value)
            }
            Err(e) => {
                let error = e.into();
                self.steps.push(StepRecord {
                    step,
                    error: Some(error.to_string()),
                });
                Err(StepFailure { step, error })
            }
        }
    }

    /// Record a step that failed before any call was made.
    fn fail(&mut self, step: Step, error: DispatchError) -> StepFailure {
        self.steps.push(StepRecord {
            step,
            error: Some(error.to_string()),
        });
        StepFailure { step, error }
    }

    /// Record a step whose failure is tolerated.
    fn note(&mut self, step: Step, error: Option<&DispatchError>) {
        self.steps.push(StepRecord {
            step,
            error: error.map(ToString::to_string),
        });
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Renders outbound directives for one channel.
///
/// Holds only shared read-only state, so one instance serves concurrent
/// dispatches for different chats.
pub struct OutboundDispatcher {
    channel: Channel,
    gateway: Arc<dyn ChatGateway>,
    bus: Arc<dyn MessageBus>,
    locales: Arc<LocaleRegistry>,
    temp_dir: PathBuf,
}

impl fmt::Debug for OutboundDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundDispatcher")
            .field("channel", &self.channel)
            .field("locales", &self.locales)
            .field("temp_dir", &self.temp_dir)
            .finish_non_exhaustive()
    }
}

impl OutboundDispatcher {
    /// Dispatcher acting on `channel`, writing temp files into `temp_dir`.
    pub fn new(
        channel: Channel,
        gateway: Arc<dyn ChatGateway>,
        bus: Arc<dyn MessageBus>,
        locales: Arc<LocaleRegistry>,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            channel,
            gateway,
            bus,
            locales,
            temp_dir,
        }
    }

    /// Channel this dispatcher acts on.
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Render one directive. Never fails; see the returned report.
    pub async fn dispatch(&self, msg: OutboundMessage) -> DispatchReport {
        let kind = msg.output_payload.kind();
        if msg.channel != self.channel {
            debug!(channel = %msg.channel, kind, "ignoring directive for another channel");
            return DispatchReport::ignored(kind, IgnoreReason::ChannelMismatch);
        }

        let mut trace = Trace::default();
        let (outcome, delivered) = match self.run(&msg, &mut trace).await {
            Ok(Flow::Done(delivered)) => {
                debug!(chat_id = msg.chat_id, kind, "directive dispatched");
                (DispatchOutcome::Completed, delivered)
            }
            Ok(Flow::Ignored(reason)) => {
                debug!(chat_id = msg.chat_id, kind, ?reason, "directive ignored");
                (DispatchOutcome::Ignored(reason), None)
            }
            Err(StepFailure { step, error }) => {
                warn!(
                    chat_id = msg.chat_id,
                    kind,
                    step = step.as_str(),
                    error = %error,
                    "dispatch aborted"
                );
                let error = error.to_string();
                (DispatchOutcome::Aborted { step, error }, None)
            }
        };

        for cleanup in trace.steps.iter().filter(|s| s.step == Step::RemoveFile) {
            if let Some(error) = &cleanup.error {
                debug!(chat_id = msg.chat_id, error = %error, "temp file cleanup failed");
            }
        }

        DispatchReport {
            kind,
            outcome,
            steps: trace.steps,
            delivered,
        }
    }

    async fn run(&self, msg: &OutboundMessage, trace: &mut Trace) -> Result<Flow, StepFailure> {
        let chat_id = msg.chat_id;
        match &msg.output_payload {
            OutputPayload::SendOutput { scene } => {
                let (text, opts) = self.render_for_send(msg, scene, true);
                let message_id = trace.check(
                    Step::SendMessage,
                    self.gateway.send_message(chat_id, &text, opts).await,
                )?;
                Ok(Flow::Done(Some(DeliveredMessage {
                    chat_id,
                    message_id,
                })))
            }

            OutputPayload::DeleteMessageOutput { message_id } => {
                trace.check(
                    Step::DeleteMessage,
                    self.gateway.delete_message(chat_id, *message_id).await,
                )?;
                Ok(Flow::Done(None))
            }

            OutputPayload::EditOutput { scene } => {
                let Some(message_id) = scene.message_id else {
                    return Err(trace.fail(Step::EditMessage, DispatchError::MissingMessageId));
                };
                let presenter = self.locales.presenter_for(&msg.user_data);
                let opts = EditOptions {
                    markup: ui::scene_markup(scene, presenter.as_ref()),
                    disable_link_preview: true,
                };
                let text = presenter.text(scene);
                trace.check(
                    Step::EditMessage,
                    self.gateway
                        .edit_message_text(chat_id, message_id, &text, opts)
                        .await,
                )?;
                Ok(Flow::Done(None))
            }

            OutputPayload::TextOutput { text } => {
                let opts = SendOptions {
                    markup: None,
                    disable_link_preview: true,
                    silent: true,
                };
                trace.check(
                    Step::SendMessage,
                    self.gateway.send_message(chat_id, text, opts).await,
                )?;
                Ok(Flow::Done(None))
            }

            OutputPayload::SendFile { scene } => match &scene.kind {
                SceneKind::GetConfigs {
                    mobile_config_data,
                    pc_config_data,
                } => {
                    self.send_configs(chat_id, mobile_config_data, pc_config_data, trace)
                        .await?;
                    self.notify_resend(msg, trace).await?;
                    Ok(Flow::Done(None))
                }
                SceneKind::IphoneInstruction(video)
                | SceneKind::MacInstruction(video)
                | SceneKind::AndroidInstruction(video)
                | SceneKind::WindowsInstruction(video) => {
                    self.send_instruction_video(chat_id, video, trace).await?;
                    self.notify_resend(msg, trace).await?;
                    Ok(Flow::Done(None))
                }
                SceneKind::Start
                | SceneKind::MainMenu
                | SceneKind::SelectPlatform
                | SceneKind::SendMassageToUser { .. }
                | SceneKind::Unknown => Ok(Flow::Ignored(IgnoreReason::UnmatchedScene)),
            },

            OutputPayload::SendAdminMessage { scene } => {
                if !matches!(scene.kind, SceneKind::SendMassageToUser { .. }) {
                    return Ok(Flow::Ignored(IgnoreReason::UnmatchedScene));
                }
                let (text, opts) = self.render_for_send(msg, scene, false);
                trace.check(
                    Step::SendMessage,
                    self.gateway.send_message(chat_id, &text, opts).await,
                )?;
                Ok(Flow::Done(None))
            }
        }
    }

    /// Text and send options for a scene, from one presenter lookup.
    fn render_for_send(&self, msg: &OutboundMessage, scene: &Scene, silent: bool) -> (String, SendOptions) {
        let presenter = self.locales.presenter_for(&msg.user_data);
        let opts = SendOptions {
            markup: ui::scene_markup(scene, presenter.as_ref()),
            disable_link_preview: true,
            silent,
        };
        (presenter.text(scene), opts)
    }

    /// Write both profiles, upload them, then remove the files whatever happened.
    async fn send_configs(
        &self,
        chat_id: i64,
        mobile: &str,
        pc: &str,
        trace: &mut Trace,
    ) -> Result<(), StepFailure> {
        let mut temp = TempFiles::new();
        let sent = self
            .write_and_upload_configs(chat_id, mobile, pc, &mut temp, trace)
            .await;

        let failures = temp.remove_all().await;
        if failures.is_empty() {
            trace.note(Step::RemoveFile, None);
        }
        for (path, source) in failures {
            trace.note(Step::RemoveFile, Some(&DispatchError::File { path, source }));
        }

        sent
    }

    async fn write_and_upload_configs(
        &self,
        chat_id: i64,
        mobile: &str,
        pc: &str,
        temp: &mut TempFiles,
        trace: &mut Trace,
    ) -> Result<(), StepFailure> {
        let mobile_path = files::mobile_config_path(&self.temp_dir, chat_id);
        let pc_path = files::pc_config_path(&self.temp_dir, chat_id);

        for (path, contents) in [(&mobile_path, mobile), (&pc_path, pc)] {
            let written = temp.write(path.clone(), contents.as_bytes()).await;
            trace.check(
                Step::WriteFile,
                written.map_err(|e| DispatchError::file(path, e)),
            )?;
        }

        for (path, filename) in [(mobile_path, MOBILE_CONFIG_NAME), (pc_path, PC_CONFIG_NAME)] {
            let file = FileSource::Path {
                path,
                filename: filename.to_owned(),
            };
            trace.check(
                Step::SendDocument,
                self.gateway.send_document(chat_id, file, SILENT_MEDIA).await,
            )?;
        }
        Ok(())
    }

    async fn send_instruction_video(
        &self,
        chat_id: i64,
        video: &VideoRef,
        trace: &mut Trace,
    ) -> Result<(), StepFailure> {
        let file = FileSource::parse(&video.source, &video.filename);
        trace.check(
            Step::SendVideo,
            self.gateway.send_video(chat_id, file, SILENT_MEDIA).await,
        )
    }

    async fn notify_resend(&self, msg: &OutboundMessage, trace: &mut Trace) -> Result<(), StepFailure> {
        trace.check(
            Step::NotifyResend,
            self.bus.send(BusMessage::Resend(msg.clone())).await,
        )
    }
}
