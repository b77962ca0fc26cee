//! Integration tests for [`page_graph::PageTable`] and the page builder.
//!
//! Covers: name validation, publishing and replacement, button ordering, per-platform rendering,
//! and hook invocation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use page_graph::{BuildError, Button, ButtonStyle, PageTable};
use pagebot_core::{Context, Platform, RenderedButton};

fn nav(text: &str, target: &str, platforms: &[Platform]) -> Button {
    Button::builder(text, platforms)
        .next_page(target)
        .build()
        .unwrap()
}

/// **Test: a page without a name fails at build() and is not published.**
#[test]
fn test_build_page_without_name_fails() {
    let table = PageTable::new();
    let err = table.build_page("  ").content("orphan").build().unwrap_err();

    assert_eq!(err, BuildError::MissingPageName);
    assert!(table.is_empty());
}

/// **Test: build() publishes the page; a later build with the same name replaces it.**
#[test]
fn test_build_publishes_and_last_registration_wins() {
    let table = PageTable::new();
    table.build_page("home").content("v1").build().unwrap();
    let second = table.build_page("home").content("v2").build().unwrap();

    assert_eq!(table.len(), 1);
    let stored = table.get("home").unwrap();
    assert!(Arc::ptr_eq(&stored, &second));
    assert_eq!(stored.content(), "v2");
    assert!(table.contains("home"));
    assert!(!table.contains("missing"));
}

/// **Test: rendering to a platform shows only that platform's buttons, in insertion order, 1-indexed.**
///
/// **Setup:** buttons A (all), B (discord only), C (telegram only, danger), D (all, primary).
/// **Expected:** telegram sees A, C, D numbered 1..3; discord sees A, B, D.
#[test]
fn test_render_filters_by_platform_in_order() {
    let table = PageTable::new();
    let page = table
        .build_page("menu")
        .content("Pick one")
        .button(nav("A", "a", &[]))
        .button(nav("B", "b", &[Platform::Discord]))
        .button(
            Button::builder("C", &[Platform::Telegram])
                .command("c")
                .style(ButtonStyle::Danger)
                .build()
                .unwrap(),
        )
        .button(
            Button::builder("D", &[])
                .next_page("d")
                .style(ButtonStyle::Primary)
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let telegram = page.render(Platform::Telegram);
    assert_eq!(telegram.page, "menu");
    assert_eq!(telegram.content, "Pick one");
    assert_eq!(
        telegram.buttons,
        vec![
            RenderedButton {
                index: 1,
                text: "A".to_string(),
                style: None
            },
            RenderedButton {
                index: 2,
                text: "C".to_string(),
                style: Some("danger".to_string())
            },
            RenderedButton {
                index: 3,
                text: "D".to_string(),
                style: Some("primary".to_string())
            },
        ]
    );
    assert_eq!(telegram.to_text(), "Pick one\n\n1. A\n2. C [danger]\n3. D [primary]");

    let discord: Vec<String> = page
        .render(Platform::Discord)
        .buttons
        .into_iter()
        .map(|b| b.text)
        .collect();
    assert_eq!(discord, vec!["A", "B", "D"]);
}

#[test]
fn test_visible_button_is_one_based() {
    let table = PageTable::new();
    let page = table
        .build_page("p")
        .buttons([nav("first", "x", &[]), nav("second", "y", &[])])
        .build()
        .unwrap();

    assert!(page.visible_button(Platform::Telegram, 0).is_none());
    assert_eq!(
        page.visible_button(Platform::Telegram, 1).unwrap().text(),
        "first"
    );
    assert_eq!(
        page.visible_button(Platform::Telegram, 2).unwrap().text(),
        "second"
    );
    assert!(page.visible_button(Platform::Telegram, 3).is_none());
}

/// **Test: enter/leave hooks run with the platform and context they are given.**
#[tokio::test]
async fn test_hooks_run() {
    let entered = Arc::new(AtomicUsize::new(0));
    let left = Arc::new(AtomicUsize::new(0));
    let (e, l) = (entered.clone(), left.clone());

    let table = PageTable::new();
    let page = table
        .build_page("hooked")
        .on_enter(move |platform: Platform, ctx: Context| {
            let e = e.clone();
            async move {
                assert_eq!(platform, Platform::Discord);
                assert_eq!(ctx.user_id(), Some("u1"));
                e.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .on_leave(move |_platform: Platform, _ctx: Context| {
            let l = l.clone();
            async move {
                l.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .build()
        .unwrap();

    let ctx = Context::new().with_user(pagebot_core::User::new("u1"));
    page.enter(Platform::Discord, &ctx).await.unwrap();
    page.leave(Platform::Discord, &ctx).await.unwrap();

    assert_eq!(entered.load(Ordering::SeqCst), 1);
    assert_eq!(left.load(Ordering::SeqCst), 1);
    assert!(page.has_on_enter());
    assert!(page.has_on_leave());
}

#[test]
fn test_names_sorted() {
    let table = PageTable::new();
    table.build_page("zeta").build().unwrap();
    table.build_page("alpha").build().unwrap();
    assert_eq!(table.names(), vec!["alpha".to_string(), "zeta".to_string()]);
}
