//! Telegram keyboard tests.

use teloxide::types::InlineKeyboardButtonKind;

use telegram_bridge::l10n::{PresenterEn, PresenterRu};
use telegram_bridge::telegram::ui::{instruction_callback, scene_markup, CB_ACKNOWLEDGE, CB_MAIN_MENU};
use telegram_bridge::types::{Scene, SceneKind, VideoRef};

fn callback_data(kind: &InlineKeyboardButtonKind) -> &str {
    match kind {
        InlineKeyboardButtonKind::CallbackData(data) => data,
        other => panic!("expected CallbackData, got {other:?}"),
    }
}

#[test]
fn platform_picker_has_four_devices_and_back() {
    let kb = scene_markup(&Scene::new(SceneKind::SelectPlatform), &PresenterEn)
        .expect("platform picker has a keyboard");
    let rows = &kb.inline_keyboard;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].len(), 2);
    assert_eq!(rows[1].len(), 2);

    let data: Vec<&str> = rows[..2]
        .iter()
        .flatten()
        .map(|b| callback_data(&b.kind))
        .collect();
    assert_eq!(
        data,
        vec![
            "instruction:iphone",
            "instruction:mac",
            "instruction:android",
            "instruction:windows"
        ]
    );
    assert_eq!(callback_data(&rows[2][0].kind), CB_MAIN_MENU);
}

#[test]
fn labels_follow_presenter_but_callbacks_do_not() {
    let scene = Scene::new(SceneKind::MainMenu);
    let en = scene_markup(&scene, &PresenterEn).expect("keyboard");
    let ru = scene_markup(&scene, &PresenterRu).expect("keyboard");

    assert_eq!(en.inline_keyboard[0][0].text, "Get profiles");
    assert_eq!(ru.inline_keyboard[0][0].text, "Получить профили");
    assert_eq!(
        callback_data(&en.inline_keyboard[0][0].kind),
        callback_data(&ru.inline_keyboard[0][0].kind)
    );
}

#[test]
fn instruction_scene_offers_back_button() {
    let scene = Scene::new(SceneKind::MacInstruction(VideoRef {
        filename: "mac.mp4".to_owned(),
        source: "/videos/mac.mp4".to_owned(),
    }));
    let kb = scene_markup(&scene, &PresenterEn).expect("keyboard");
    assert_eq!(kb.inline_keyboard.len(), 1);
    assert_eq!(callback_data(&kb.inline_keyboard[0][0].kind), CB_MAIN_MENU);
}

#[test]
fn admin_notice_offers_acknowledge() {
    let scene = Scene::new(SceneKind::SendMassageToUser {
        text: "hello".to_owned(),
    });
    let kb = scene_markup(&scene, &PresenterRu).expect("keyboard");
    assert_eq!(callback_data(&kb.inline_keyboard[0][0].kind), CB_ACKNOWLEDGE);
}

#[test]
fn unknown_scene_has_no_keyboard() {
    assert!(scene_markup(&Scene::new(SceneKind::Unknown), &PresenterEn).is_none());
}

#[test]
fn instruction_callback_format() {
    assert_eq!(instruction_callback("android"), "instruction:android");
}
