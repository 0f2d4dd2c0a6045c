//! English presenter.

use super::{Button, LocaleTag, Presenter};
use crate::types::{Scene, SceneKind};

/// English texts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenterEn;

impl Presenter for PresenterEn {
    fn locale(&self) -> LocaleTag {
        LocaleTag::En
    }

    fn text(&self, scene: &Scene) -> String {
        match &scene.kind {
            SceneKind::Start => "*Welcome!*\nThis bot issues your VPN profiles and explains how to set them up.".to_owned(),
            SceneKind::MainMenu => "Choose an action:".to_owned(),
            SceneKind::SelectPlatform => "Which device are you setting up?".to_owned(),
            SceneKind::GetConfigs { .. } => {
                "Your VPN profiles are below. Use `mobileConfig.ovpn` on phones and `pcConfig.ovpn` on computers.".to_owned()
            }
            SceneKind::IphoneInstruction(_) => "*iPhone*: install OpenVPN Connect, then open `mobileConfig.ovpn` with it.".to_owned(),
            SceneKind::MacInstruction(_) => "*macOS*: install Tunnelblick, then double-click `pcConfig.ovpn`.".to_owned(),
            SceneKind::AndroidInstruction(_) => "*Android*: install OpenVPN for Android and import `mobileConfig.ovpn`.".to_owned(),
            SceneKind::WindowsInstruction(_) => "*Windows*: install OpenVPN GUI and import `pcConfig.ovpn`.".to_owned(),
            SceneKind::SendMassageToUser { text } => text.clone(),
            SceneKind::Unknown => "Something went wrong. Send /start to begin again.".to_owned(),
        }
    }

    fn button(&self, button: Button) -> String {
        match button {
            Button::GetConfigs => "Get profiles",
            Button::Instructions => "Setup instructions",
            Button::Back => "« Back",
            Button::Iphone => "iPhone",
            Button::Mac => "Mac",
            Button::Android => "Android",
            Button::Windows => "Windows",
            Button::Acknowledge => "OK",
        }
        .to_owned()
    }
}
