//! Russian presenter. The default locale.

use super::{Button, LocaleTag, Presenter};
use crate::types::{Scene, SceneKind};

/// Russian texts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenterRu;

impl Presenter for PresenterRu {
    fn locale(&self) -> LocaleTag {
        LocaleTag::Ru
    }

    fn text(&self, scene: &Scene) -> String {
        match &scene.kind {
            SceneKind::Start => "*Добро пожаловать!*\nЭтот бот выдаёт VPN-профили и помогает их настроить.".to_owned(),
            SceneKind::MainMenu => "Выберите действие:".to_owned(),
            SceneKind::SelectPlatform => "Какое устройство вы настраиваете?".to_owned(),
            SceneKind::GetConfigs { .. } => {
                "Ваши VPN-профили ниже. `mobileConfig.ovpn` для телефона, `pcConfig.ovpn` для компьютера.".to_owned()
            }
            SceneKind::IphoneInstruction(_) => "*iPhone*: установите OpenVPN Connect и откройте в нём `mobileConfig.ovpn`.".to_owned(),
            SceneKind::MacInstruction(_) => "*macOS*: установите Tunnelblick и дважды щёлкните `pcConfig.ovpn`.".to_owned(),
            SceneKind::AndroidInstruction(_) => "*Android*: установите OpenVPN for Android и импортируйте `mobileConfig.ovpn`.".to_owned(),
            SceneKind::WindowsInstruction(_) => "*Windows*: установите OpenVPN GUI и импортируйте `pcConfig.ovpn`.".to_owned(),
            SceneKind::SendMassageToUser { text } => text.clone(),
            SceneKind::Unknown => "Что-то пошло не так. Отправьте /start, чтобы начать заново.".to_owned(),
        }
    }

    fn button(&self, button: Button) -> String {
        match button {
            Button::GetConfigs => "Получить профили",
            Button::Instructions => "Инструкции",
            Button::Back => "« Назад",
            Button::Iphone => "iPhone",
            Button::Mac => "Mac",
            Button::Android => "Android",
            Button::Windows => "Windows",
            Button::Acknowledge => "Понятно",
        }
        .to_owned()
    }
}
