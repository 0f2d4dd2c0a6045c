//! Coverage for config loading and token resolution.

use std::path::PathBuf;

use telegram_bridge::config::{load_config, resolve_bot_token, LocaleStrategy, TelegramConfig};
use telegram_bridge::l10n::{LocaleResolver, LocaleTag};
use telegram_bridge::types::{Channel, ChatUser};

fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, contents).expect("should write config");
    (tmp, path)
}

#[test]
fn parse_full_config() {
    let (_tmp, path) = write_config(
        r#"
[telegram]
bot_token_env = "VPN_BOT_TOKEN"
channel = "vpn"

[locale]
strategy = "language_code"
default = "en"

[files]
temp_dir = "/var/tmp/bridge"

[logging]
dir = "/var/log/bridge"
"#,
    );
    let config = match load_config(&path) {
        Ok(config) => config,
        Err(err) => panic!("full config should load: {err}"),
    };
    assert_eq!(config.telegram.bot_token_env, "VPN_BOT_TOKEN");
    assert_eq!(config.telegram.channel, Channel::new("vpn"));
    assert_eq!(config.locale.strategy, LocaleStrategy::LanguageCode);
    assert_eq!(config.locale.default_locale, LocaleTag::En);
    assert_eq!(config.files.temp_dir, PathBuf::from("/var/tmp/bridge"));
    assert_eq!(config.logging.dir, Some(PathBuf::from("/var/log/bridge")));
}

#[test]
fn configured_resolver_follows_strategy() {
    let (_tmp, path) = write_config(
        r#"
[telegram]
channel = "vpn"

[locale]
strategy = "language_code"
default = "en"
"#,
    );
    let config = load_config(&path).expect("should load");
    let resolver = config.locale.resolver();
    let russian = ChatUser {
        language_code: Some("ru-RU".to_owned()),
        ..ChatUser::with_id(1)
    };
    assert_eq!(resolver.resolve(&russian), LocaleTag::Ru);
    assert_eq!(resolver.resolve(&ChatUser::with_id(2)), LocaleTag::En);
}

#[test]
fn unknown_locale_is_rejected() {
    let (_tmp, path) = write_config(
        r#"
[telegram]
channel = "vpn"

[locale]
default = "de"
"#,
    );
    assert!(load_config(&path).is_err());
}

#[test]
fn missing_file_names_path_in_error() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join("absent.toml");
    let err = match load_config(&path) {
        Ok(_) => panic!("missing file should fail"),
        Err(err) => err,
    };
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn bot_token_is_read_from_named_variable() {
    let var = "TELEGRAM_BRIDGE_TEST_TOKEN_PRESENT";
    std::env::set_var(var, "  123:abc  ");
    let telegram = TelegramConfig {
        bot_token_env: var.to_owned(),
        channel: Channel::new("vpn"),
    };
    assert_eq!(resolve_bot_token(&telegram).expect("token"), "123:abc");
}

#[test]
fn unset_or_empty_token_is_an_error() {
    let unset = TelegramConfig {
        bot_token_env: "TELEGRAM_BRIDGE_TEST_TOKEN_UNSET".to_owned(),
        channel: Channel::new("vpn"),
    };
    assert!(resolve_bot_token(&unset).is_err());

    let var = "TELEGRAM_BRIDGE_TEST_TOKEN_EMPTY";
    std::env::set_var(var, " ");
    let empty = TelegramConfig {
        bot_token_env: var.to_owned(),
        channel: Channel::new("vpn"),
    };
    assert!(resolve_bot_token(&empty).is_err());
}
