//! Integration tests for [`bot_runtime::BotEngine`].
//!
//! Covers: effect order of a button (action, navigation, command), missing next pages,
//! enter/leave hook order per chat, delivery through the attached transport, and error mapping.

mod common;

use std::sync::{Arc, Mutex};

use bot_runtime::{BotEngine, CommandDispatch, EngineError, SessionKey};
use command_registry::Command;
use common::MockTransport;
use page_graph::Button;
use pagebot_core::{Chat, Context, PagebotError, Platform};

type Log = Arc<Mutex<Vec<String>>>;

fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Registers a command whose handler appends `cmd:<name>` to the log.
fn logging_command(engine: &BotEngine, name: &str, log: &Log) {
    let log = log.clone();
    let tag = format!("cmd:{}", name);
    engine
        .commands()
        .register(Command::new(name, "logs", move |_p: Platform, _c: Context| {
            let log = log.clone();
            let tag = tag.clone();
            async move {
                log.lock().unwrap().push(tag);
                Ok(())
            }
        }));
}

/// Builds a page whose hooks append `enter:<name>` / `leave:<name>` to the log.
fn logging_page(engine: &BotEngine, name: &str, buttons: Vec<Button>, log: &Log) {
    let (enter_log, leave_log) = (log.clone(), log.clone());
    let (enter_tag, leave_tag) = (format!("enter:{}", name), format!("leave:{}", name));
    engine
        .pages()
        .build_page(name)
        .content(format!("{} content", name))
        .buttons(buttons)
        .on_enter(move |_p: Platform, _c: Context| {
            let log = enter_log.clone();
            let tag = enter_tag.clone();
            async move {
                log.lock().unwrap().push(tag);
                Ok(())
            }
        })
        .on_leave(move |_p: Platform, _c: Context| {
            let log = leave_log.clone();
            let tag = leave_tag.clone();
            async move {
                log.lock().unwrap().push(tag);
                Ok(())
            }
        })
        .build()
        .unwrap();
}

fn chat_ctx(id: &str) -> Context {
    Context::in_chat(Chat::private(id))
}

/// **Test: a button with action, next page and command runs all three in that order.**
///
/// **Setup:** Page `target` with hooks; command `go`; button with all three effects.
/// **Action:** `engine.execute(telegram, &button, &ctx)`.
/// **Expected:** log is action, enter:target, cmd:go; report carries the page and dispatch.
#[tokio::test]
async fn test_execute_runs_effects_in_order() {
    let engine = BotEngine::new();
    let log = log();
    logging_page(&engine, "target", Vec::new(), &log);
    logging_command(&engine, "go", &log);

    let action_log = log.clone();
    let button = Button::builder("All", &[])
        .action(move || {
            let log = action_log.clone();
            async move {
                log.lock().unwrap().push("action".to_string());
                Ok(())
            }
        })
        .next_page("target")
        .command("go")
        .build()
        .unwrap();

    let report = engine
        .execute(Platform::Telegram, &button, &chat_ctx("1"))
        .await
        .unwrap();

    assert_eq!(entries(&log), vec!["action", "enter:target", "cmd:go"]);
    assert!(report.action_ran);
    assert_eq!(report.page.unwrap().page, "target");
    assert_eq!(
        report.command,
        Some(CommandDispatch::Dispatched("go".to_string()))
    );
}

/// **Test: a next page that does not exist is skipped; the action and command still run.**
///
/// **Setup:** Command `go`; button with an action, `next_page("nowhere")` and `go`; a transport
/// attached for Discord.
/// **Action:** `engine.execute(discord, &button, &ctx)`.
/// **Expected:** log is action, cmd:go; no page in the report, no session, nothing delivered.
#[tokio::test]
async fn test_execute_skips_missing_next_page() {
    let engine = BotEngine::new();
    let transport = MockTransport::new(Platform::Discord);
    engine.attach_transport(transport.clone()).await;
    let log = log();
    logging_command(&engine, "go", &log);

    let action_log = log.clone();
    let button = Button::builder("Broken", &[])
        .action(move || {
            let log = action_log.clone();
            async move {
                log.lock().unwrap().push("action".to_string());
                Ok(())
            }
        })
        .next_page("nowhere")
        .command("go")
        .build()
        .unwrap();

    let report = engine
        .execute(Platform::Discord, &button, &chat_ctx("1"))
        .await
        .unwrap();

    assert!(report.action_ran);
    assert!(report.page.is_none());
    assert_eq!(
        report.command,
        Some(CommandDispatch::Dispatched("go".to_string()))
    );
    assert_eq!(entries(&log), vec!["action", "cmd:go"]);
    assert!(transport.texts().is_empty());
    assert!(engine
        .sessions()
        .get(&SessionKey::new(Platform::Discord, "1"))
        .await
        .is_none());
}

/// **Test: an unknown command on a button is reported, not an error.**
#[tokio::test]
async fn test_execute_unknown_command_reports_not_found() {
    let engine = BotEngine::new();
    let button = Button::builder("Ghost", &[]).command("ghost").build().unwrap();

    let report = engine
        .execute(Platform::Telegram, &button, &Context::new())
        .await
        .unwrap();

    assert_eq!(
        report.command,
        Some(CommandDispatch::NotFound("ghost".to_string()))
    );
}

/// **Test: a failing action stops execution before navigation.**
#[tokio::test]
async fn test_execute_action_failure() {
    let engine = BotEngine::new();
    let log = log();
    logging_page(&engine, "target", Vec::new(), &log);
    let button = Button::builder("Boom", &[])
        .action(|| async { Err::<(), _>(PagebotError::handler("boom")) })
        .next_page("target")
        .build()
        .unwrap();

    let err = engine
        .execute(Platform::Telegram, &button, &chat_ctx("1"))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Action { ref button, .. } if button == "Boom"));
    assert!(entries(&log).is_empty());
}

/// **Test: navigating within a chat leaves the previous page before entering the next.**
///
/// **Setup:** Pages `home` (button to `about`) and `about`.
/// **Action:** show `home`, then press button 1.
/// **Expected:** enter:home, leave:home, enter:about; session points at `about`.
#[tokio::test]
async fn test_navigation_runs_leave_then_enter() {
    let engine = BotEngine::new();
    let log = log();
    let to_about = Button::builder("About", &[])
        .next_page("about")
        .build()
        .unwrap();
    logging_page(&engine, "home", vec![to_about], &log);
    logging_page(&engine, "about", Vec::new(), &log);
    let ctx = chat_ctx("7");

    engine
        .show_page(Platform::Telegram, "home", &ctx)
        .await
        .unwrap();
    engine.press(Platform::Telegram, 1, &ctx).await.unwrap();

    assert_eq!(entries(&log), vec!["enter:home", "leave:home", "enter:about"]);
    assert_eq!(
        engine
            .sessions()
            .get(&SessionKey::new(Platform::Telegram, "7"))
            .await
            .as_deref(),
        Some("about")
    );
}

/// **Test: sessions are per chat; a second chat does not trigger the first chat's leave hook.**
#[tokio::test]
async fn test_sessions_are_per_chat() {
    let engine = BotEngine::new();
    let log = log();
    logging_page(&engine, "home", Vec::new(), &log);

    engine
        .show_page(Platform::Telegram, "home", &chat_ctx("1"))
        .await
        .unwrap();
    engine
        .show_page(Platform::Telegram, "home", &chat_ctx("2"))
        .await
        .unwrap();

    assert_eq!(entries(&log), vec!["enter:home", "enter:home"]);
}

/// **Test: displayed pages are delivered through the platform's attached transport.**
#[tokio::test]
async fn test_show_page_delivers_rendered_text() {
    let engine = BotEngine::new();
    let transport = MockTransport::new(Platform::Discord);
    engine.attach_transport(transport.clone()).await;
    let tg_only = Button::builder("Telegram only", &[Platform::Telegram])
        .next_page("home")
        .build()
        .unwrap();
    let both = Button::builder("Both", &[]).next_page("home").build().unwrap();
    engine
        .pages()
        .build_page("home")
        .content("Welcome")
        .buttons([tg_only, both])
        .build()
        .unwrap();

    let rendered = engine
        .show_page(Platform::Discord, "home", &chat_ctx("42"))
        .await
        .unwrap();

    assert_eq!(rendered.buttons.len(), 1);
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat_id, "42");
    assert_eq!(sent[0].text, "Welcome\n\n1. Both");
}

/// **Test: showing an unknown page is an error.**
#[tokio::test]
async fn test_show_page_not_found() {
    let engine = BotEngine::new();

    let err = engine
        .show_page(Platform::Telegram, "missing", &Context::new())
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::PageNotFound(ref name) if name == "missing"));
}

/// **Test: press without a current page, and press past the last visible button.**
#[tokio::test]
async fn test_press_errors() {
    let engine = BotEngine::new();
    let only = Button::builder("Only", &[]).next_page("home").build().unwrap();
    engine
        .pages()
        .build_page("home")
        .button(only)
        .build()
        .unwrap();
    let ctx = chat_ctx("3");

    let err = engine.press(Platform::Telegram, 1, &ctx).await.unwrap_err();
    assert!(matches!(err, EngineError::NoActivePage));

    engine
        .show_page(Platform::Telegram, "home", &ctx)
        .await
        .unwrap();
    let err = engine.press(Platform::Telegram, 2, &ctx).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::ButtonOutOfRange {
            index: 2,
            available: 1
        }
    ));
}

/// **Test: reply without a transport is dropped and reported as not delivered.**
#[tokio::test]
async fn test_reply_without_transport() {
    let engine = BotEngine::new();

    assert!(!engine.reply(Platform::Telegram, &chat_ctx("1"), "hi").await);

    let transport = MockTransport::new(Platform::Telegram);
    engine.attach_transport(transport.clone()).await;
    assert!(engine.reply(Platform::Telegram, &chat_ctx("1"), "hi").await);
    assert_eq!(transport.texts(), vec!["hi"]);
}
