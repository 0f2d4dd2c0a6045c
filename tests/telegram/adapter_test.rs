//! Tests for `src/telegram/mod.rs` lifecycle and sender snapshots.

use std::sync::{Arc, Mutex};

use teloxide::types::{User, UserId};

use telegram_bridge::bus::MessageBus;
use telegram_bridge::telegram::gateway::ChatGateway;
use telegram_bridge::telegram::inbound::{chat_user, InboundNormalizer};
use telegram_bridge::telegram::TelegramAdapter;
use telegram_bridge::types::Channel;

use crate::common::{Journal, RecordingBus, RecordingGateway};

fn normalizer() -> Arc<InboundNormalizer> {
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    Arc::new(InboundNormalizer::new(
        Channel::new("main"),
        Arc::new(RecordingGateway::new(Arc::clone(&journal))) as Arc<dyn ChatGateway>,
        Arc::new(RecordingBus::new(journal)) as Arc<dyn MessageBus>,
    ))
}

fn user(id: u64) -> User {
    User {
        id: UserId(id),
        is_bot: false,
        first_name: "Ada".to_owned(),
        last_name: None,
        username: Some("ada".to_owned()),
        language_code: Some("ru".to_owned()),
        is_premium: false,
        added_to_attachment_menu: false,
    }
}

#[tokio::test]
async fn stop_without_launch_is_a_no_op() {
    let adapter = TelegramAdapter::with_token("123:abc", normalizer());
    assert!(!adapter.is_running().await);

    adapter.stop().await;
    adapter.stop().await;

    assert!(!adapter.is_running().await);
}

#[test]
fn sender_snapshot_copies_profile() {
    let snapshot = chat_user(&user(42)).expect("id fits");
    assert_eq!(snapshot.user_id, 42);
    assert_eq!(snapshot.username.as_deref(), Some("ada"));
    assert_eq!(snapshot.first_name.as_deref(), Some("Ada"));
    assert_eq!(snapshot.language_code.as_deref(), Some("ru"));
}

#[test]
fn out_of_range_sender_id_is_dropped() {
    assert!(chat_user(&user(u64::MAX)).is_none());
    assert!(chat_user(&user(u64::try_from(i64::MAX).expect("fits"))).is_some());
}
