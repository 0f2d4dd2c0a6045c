//! Tests for `src/telegram/inbound.rs`: event normalization and forwarding.

use std::sync::{Arc, Mutex};

use serde_json::json;

use telegram_bridge::bus::{BusMessage, MessageBus};
use telegram_bridge::telegram::gateway::ChatGateway;
use telegram_bridge::telegram::inbound::{
    normalize_callback, normalize_text, CallbackEvent, InboundNormalizer, TextEvent,
};
use telegram_bridge::types::{Channel, ChatUser, InputPayload};

use crate::common::{Call, Journal, Op, RecordingBus, RecordingGateway};

fn fakes(bus: RecordingBus, journal: &Journal) -> (Arc<RecordingGateway>, Arc<RecordingBus>, InboundNormalizer) {
    let gateway = Arc::new(RecordingGateway::new(Arc::clone(journal)));
    let bus = Arc::new(bus);
    let normalizer = InboundNormalizer::new(
        Channel::new("C"),
        Arc::clone(&gateway) as Arc<dyn ChatGateway>,
        Arc::clone(&bus) as Arc<dyn MessageBus>,
    );
    (gateway, bus, normalizer)
}

fn new_journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

#[test]
fn text_event_normalizes_to_text_input_envelope() {
    let msg = normalize_text(
        &Channel::new("C"),
        TextEvent {
            from: ChatUser::with_id(1),
            message_id: 5,
            text: "hi".to_owned(),
        },
    );
    let value = serde_json::to_value(&msg).expect("serialize");
    assert_eq!(
        value,
        json!({
            "channel": "C",
            "telegramUser": {"telegramUserId": 1},
            "inputPayload": {"tpe": "TextInput", "text": "hi", "messageId": 5}
        })
    );
}

#[test]
fn callback_without_data_or_message_defaults() {
    let msg = normalize_callback(
        &Channel::new("C"),
        CallbackEvent {
            id: "cb-1".to_owned(),
            from: ChatUser::with_id(2),
            data: None,
            message_id: None,
        },
    );
    assert_eq!(
        msg.input_payload,
        InputPayload::CallbackInput {
            data: String::new(),
            message_id: 0
        }
    );
}

#[test]
fn user_profile_fields_are_copied() {
    let user = ChatUser {
        user_id: 42,
        username: Some("neo".to_owned()),
        first_name: Some("Thomas".to_owned()),
        last_name: Some("Anderson".to_owned()),
        language_code: Some("en".to_owned()),
        ..ChatUser::default()
    };
    let msg = normalize_text(
        &Channel::new("C"),
        TextEvent {
            from: user.clone(),
            message_id: 1,
            text: "/start".to_owned(),
        },
    );
    assert_eq!(msg.chat_user, user);
}

#[tokio::test]
async fn text_is_forwarded_to_inbound_target() {
    let journal = new_journal();
    let (gateway, bus, normalizer) = fakes(RecordingBus::new(Arc::clone(&journal)), &journal);

    normalizer
        .handle_text(TextEvent {
            from: ChatUser::with_id(1),
            message_id: 5,
            text: "hi".to_owned(),
        })
        .await;

    assert!(gateway.calls().is_empty());
    match bus.sent().as_slice() {
        [BusMessage::Inbound(msg)] => {
            assert_eq!(msg.channel, Channel::new("C"));
            assert_eq!(
                msg.input_payload,
                InputPayload::TextInput {
                    text: "hi".to_owned(),
                    message_id: 5
                }
            );
        }
        other => panic!("expected one inbound message, got {other:?}"),
    }
}

#[tokio::test]
async fn callback_is_acknowledged_before_forwarding() {
    let journal = new_journal();
    let (gateway, bus, normalizer) = fakes(RecordingBus::new(Arc::clone(&journal)), &journal);

    normalizer
        .handle_callback(CallbackEvent {
            id: "cb-9".to_owned(),
            from: ChatUser::with_id(3),
            data: Some("get_configs".to_owned()),
            message_id: Some(77),
        })
        .await;

    assert_eq!(
        gateway.calls(),
        vec![Call::Answer {
            callback_id: "cb-9".to_owned()
        }]
    );
    assert_eq!(
        journal.lock().expect("lock").clone(),
        vec!["gateway:Answer", "bus:processInboundTelegramMessage"]
    );
    match bus.sent().as_slice() {
        [BusMessage::Inbound(msg)] => assert_eq!(
            msg.input_payload,
            InputPayload::CallbackInput {
                data: "get_configs".to_owned(),
                message_id: 77
            }
        ),
        other => panic!("expected one inbound message, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_acknowledgment_does_not_block_forwarding() {
    let journal = new_journal();
    let (gateway, bus, normalizer) = fakes(RecordingBus::new(Arc::clone(&journal)), &journal);
    gateway.fail_on(Op::Answer);

    normalizer
        .handle_callback(CallbackEvent {
            id: "cb-1".to_owned(),
            from: ChatUser::with_id(3),
            data: Some("ack".to_owned()),
            message_id: Some(1),
        })
        .await;

    assert_eq!(bus.sent().len(), 1);
}

#[tokio::test]
async fn closed_bus_is_swallowed() {
    let journal = new_journal();
    let (_gateway, bus, normalizer) = fakes(RecordingBus::closed(Arc::clone(&journal)), &journal);

    normalizer
        .handle_text(TextEvent {
            from: ChatUser::with_id(1),
            message_id: 1,
            text: "hello".to_owned(),
        })
        .await;

    assert!(bus.sent().is_empty());
    assert_eq!(
        journal.lock().expect("lock").clone(),
        vec!["bus:processInboundTelegramMessage"]
    );
}
