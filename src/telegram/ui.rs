//! Inline keyboard helpers for scene messages.
//!
//! Button labels come from the presenter; callback data is locale-independent
//! so the coordinator can route presses without knowing the user's language.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::l10n::{Button, Presenter};
use crate::types::{Scene, SceneKind};

/// Callback data sent by the "get profiles" button.
pub const CB_GET_CONFIGS: &str = "get_configs";
/// Callback data sent by the "instructions" button.
pub const CB_INSTRUCTIONS: &str = "instructions";
/// Callback data sent by the "back" button.
pub const CB_MAIN_MENU: &str = "main_menu";
/// Callback data sent by the acknowledge button under admin notices.
pub const CB_ACKNOWLEDGE: &str = "ack";

/// Callback data for a device-specific instruction button.
pub fn instruction_callback(platform: &str) -> String {
    format!("instruction:{platform}")
}

/// Keyboard for a scene, or `None` if the scene has no buttons.
pub fn scene_markup(scene: &Scene, presenter: &dyn Presenter) -> Option<InlineKeyboardMarkup> {
    let button = |kind: Button, data: String| InlineKeyboardButton::callback(presenter.button(kind), data);
    let back = || button(Button::Back, CB_MAIN_MENU.to_owned());

    let rows = match &scene.kind {
        SceneKind::Start | SceneKind::MainMenu => vec![
            vec![button(Button::GetConfigs, CB_GET_CONFIGS.to_owned())],
            vec![button(Button::Instructions, CB_INSTRUCTIONS.to_owned())],
        ],
        SceneKind::SelectPlatform => vec![
            vec![
                button(Button::Iphone, instruction_callback("iphone")),
                button(Button::Mac, instruction_callback("mac")),
            ],
            vec![
                button(Button::Android, instruction_callback("android")),
                button(Button::Windows, instruction_callback("windows")),
            ],
            vec![back()],
        ],
        SceneKind::GetConfigs { .. }
        | SceneKind::IphoneInstruction(_)
        | SceneKind::MacInstruction(_)
        | SceneKind::AndroidInstruction(_)
        | SceneKind::WindowsInstruction(_) => vec![vec![back()]],
        SceneKind::SendMassageToUser { .. } => {
            vec![vec![button(Button::Acknowledge, CB_ACKNOWLEDGE.to_owned())]]
        }
        SceneKind::Unknown => return None,
    };

    Some(InlineKeyboardMarkup::new(rows))
}
