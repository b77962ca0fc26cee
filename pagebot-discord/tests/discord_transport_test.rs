//! Integration tests for [`pagebot_discord::DiscordTransport`] and [`pagebot_discord::DiscordBotHandle`]
//! against a mock REST server.
//!
//! Covers: auth header and body of sends, edit/delete paths, API error mapping, snowflake
//! validation, token verification on start, and inbound routing through the handle's inbound entry.

use std::sync::Arc;

use bot_runtime::{BotEngine, BotHandle, CommandDispatch, InboundOutcome, InboundRouter};
use command_registry::Command;
use mockito::Matcher;
use pagebot_core::{Chat, Context, PagebotError, Platform, Transport, TransportError, User};
use pagebot_discord::{DiscordBotHandle, DiscordConfig, DiscordTransport};

fn config_for(server: &mockito::ServerGuard) -> DiscordConfig {
    DiscordConfig::new("secret").with_api_url(Some(server.url()))
}

/// **Test: send_message POSTs the content with the bot authorization header.**
///
/// **Setup:** Mock POST /channels/123/messages expecting `Authorization: Bot secret`.
/// **Action:** `send_message(chat 123, "hi")`.
/// **Expected:** returned id and channel come from the response body.
#[tokio::test]
async fn test_send_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/channels/123/messages")
        .match_header("authorization", "Bot secret")
        .match_body(Matcher::Json(serde_json::json!({ "content": "hi" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"999","channel_id":"123","content":"hi"}"#)
        .create_async()
        .await;

    let transport = DiscordTransport::new(config_for(&server));
    let sent = transport
        .send_message(&Chat::new("123", "channel"), "hi")
        .await
        .unwrap();

    assert_eq!(sent.id, "999");
    assert_eq!(sent.chat_id, "123");
    mock.assert_async().await;
}

/// **Test: edit uses PATCH and delete uses DELETE on the message path.**
#[tokio::test]
async fn test_edit_and_delete() {
    let mut server = mockito::Server::new_async().await;
    let edit = server
        .mock("PATCH", "/channels/1/messages/2")
        .match_body(Matcher::Json(serde_json::json!({ "content": "new" })))
        .with_status(200)
        .with_body(r#"{"id":"2","channel_id":"1"}"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/channels/1/messages/2")
        .with_status(204)
        .create_async()
        .await;

    let transport = DiscordTransport::new(config_for(&server));
    let chat = Chat::new("1", "channel");
    transport.edit_message(&chat, "2", "new").await.unwrap();
    transport.delete_message(&chat, "2").await.unwrap();

    edit.assert_async().await;
    delete.assert_async().await;
}

/// **Test: a non-success status becomes an API error carrying status and body.**
#[tokio::test]
async fn test_api_error_mapping() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/channels/5/messages")
        .with_status(403)
        .with_body(r#"{"message":"Missing Access","code":50001}"#)
        .create_async()
        .await;

    let transport = DiscordTransport::new(config_for(&server));
    let err = transport
        .send_message(&Chat::new("5", "channel"), "x")
        .await
        .unwrap_err();

    match err {
        PagebotError::Transport(TransportError::Api(msg)) => {
            assert!(msg.contains("403"));
            assert!(msg.contains("Missing Access"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

/// **Test: ids that are not snowflakes are rejected before any request.**
#[tokio::test]
async fn test_invalid_ids_rejected() {
    let server = mockito::Server::new_async().await;
    let transport = DiscordTransport::new(config_for(&server));

    let err = transport
        .send_message(&Chat::new("../guilds", "channel"), "x")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PagebotError::Transport(TransportError::InvalidChatId(_))
    ));

    let err = transport
        .delete_message(&Chat::new("1", "channel"), "")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PagebotError::Transport(TransportError::InvalidMessageId(_))
    ));
}

/// **Test: start verifies the token with GET /users/@me; a rejected token fails start.**
#[tokio::test]
async fn test_start_verifies_token() {
    let mut server = mockito::Server::new_async().await;
    let ok = server
        .mock("GET", "/users/@me")
        .match_header("authorization", "Bot secret")
        .with_status(200)
        .with_body(r#"{"id":"42","username":"pagebot","discriminator":"0"}"#)
        .create_async()
        .await;

    let router = InboundRouter::new(Arc::new(BotEngine::new()));
    let mut handle = DiscordBotHandle::new(config_for(&server), router.clone());
    handle.start().await.unwrap();
    assert!(handle.is_running());
    assert_eq!(handle.bot_user().unwrap().username, "pagebot");
    ok.assert_async().await;

    handle.stop().await.unwrap();
    assert!(!handle.is_running());

    let mut bad_server = mockito::Server::new_async().await;
    let _unauthorized = bad_server
        .mock("GET", "/users/@me")
        .with_status(401)
        .with_body(r#"{"message":"401: Unauthorized","code":0}"#)
        .create_async()
        .await;
    let mut bad = DiscordBotHandle::new(config_for(&bad_server), router);
    assert!(bad.start().await.is_err());
    assert!(!bad.is_running());
}

/// **Test: the inbound entry routes commands while started; own and post-stop messages are ignored.**
///
/// **Setup:** Engine with `/ping`; handle verified against a mock `/users/@me` (bot id 42);
/// the inbound entry is taken before start.
/// **Action:** Messages from a user, from the bot itself, and from a user after `stop()`.
/// **Expected:** Dispatched, then Ignored twice.
#[tokio::test]
async fn test_inbound_routes_commands() {
    let mut server = mockito::Server::new_async().await;
    let _me = server
        .mock("GET", "/users/@me")
        .with_status(200)
        .with_body(r#"{"id":"42","username":"pagebot"}"#)
        .create_async()
        .await;

    let engine = Arc::new(BotEngine::new());
    engine.commands().register(Command::new(
        "ping",
        "Ping",
        |_p: Platform, _c: Context| async { Ok(()) },
    ));
    let mut handle = DiscordBotHandle::new(config_for(&server), InboundRouter::new(engine));
    let inbound = handle.inbound();
    assert!(!inbound.is_running());
    handle.start().await.unwrap();
    assert!(inbound.is_running());

    let outcome = inbound
        .handle_message("7", "100", User::new("1"), "/ping")
        .await
        .unwrap();
    assert_eq!(
        outcome,
        InboundOutcome::Command(CommandDispatch::Dispatched("ping".to_string()))
    );

    let own = inbound
        .handle_message("7", "101", User::new("42"), "/ping")
        .await
        .unwrap();
    assert_eq!(own, InboundOutcome::Ignored);

    handle.stop().await.unwrap();
    let after_stop = inbound
        .handle_message("7", "102", User::new("1"), "/ping")
        .await
        .unwrap();
    assert_eq!(after_stop, InboundOutcome::Ignored);
}
