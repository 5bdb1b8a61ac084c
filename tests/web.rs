//! Browser-only checks against real `localStorage` and the document root.
//! Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::Utc;
use gloo::timers::callback::Timeout;
use health_analyzer::backdrop::{AnimationFrames, FrameLoop};
use health_analyzer::chat::{ChatSession, ReplyTimers};
use health_analyzer::config::ChatConfig;
use health_analyzer::storage::{KeyValueStore, LocalStore, MemoryStore, SharedStore};
use health_analyzer::theme::{apply_to_document, ThemeMode, THEME_KEY};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_store_round_trip() {
    let store = LocalStore;
    store.set("web_test_slot", "value").unwrap();
    assert_eq!(store.get("web_test_slot").unwrap().as_deref(), Some("value"));
    assert_eq!(store.get("web_test_missing_slot").unwrap(), None);
}

#[wasm_bindgen_test]
fn theme_survives_reload() {
    let store = SharedStore::browser();
    ThemeMode::Dark.persist(&store).unwrap();
    assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    assert_eq!(ThemeMode::restore(&SharedStore::new(LocalStore)), ThemeMode::Dark);

    ThemeMode::Light.persist(&store).unwrap();
    assert_eq!(ThemeMode::restore(&store), ThemeMode::Light);
}

#[wasm_bindgen_test]
fn dark_class_follows_mode() {
    let root = gloo_utils::document_element();

    apply_to_document(ThemeMode::Dark);
    assert!(root.class_list().contains("dark"));

    apply_to_document(ThemeMode::Light);
    assert!(!root.class_list().contains("dark"));
}

#[wasm_bindgen_test]
fn history_written_to_local_storage() {
    let config = Rc::new(ChatConfig::default());
    let mut session = ChatSession::new(SharedStore::browser(), config.clone());
    assert!(session.begin_session("web-test-user"));
    let before = session.messages().len();
    session.send_message("hello", chrono::Utc::now());

    let mut reloaded = ChatSession::new(SharedStore::browser(), config);
    reloaded.begin_session("  web-test-user ");
    assert_eq!(reloaded.messages().len(), before + 1);
    assert_eq!(reloaded.messages()[before].text, "hello");
}

async fn sleep(ms: u32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        Timeout::new(ms, move || {
            let _ = resolve.call0(&JsValue::NULL);
        })
        .forget();
    });
    JsFuture::from(promise).await.unwrap();
}

fn quick_session() -> (Rc<RefCell<ChatSession>>, ReplyTimers<Timeout>) {
    let config = Rc::new(ChatConfig {
        reply_delay_ms: 20,
        ..ChatConfig::default()
    });
    let mut session = ChatSession::new(SharedStore::new(MemoryStore::new()), config.clone());
    session.begin_session("web-timer-user");
    (Rc::new(RefCell::new(session)), ReplyTimers::new(config.reply_delay_ms))
}

fn schedule_replies(session: &Rc<RefCell<ChatSession>>, timers: &mut ReplyTimers<Timeout>) {
    let pending = session.borrow().pending_replies().to_vec();
    timers.sync(&pending, |ticket, delay_ms| {
        let session = session.clone();
        Timeout::new(delay_ms, move || {
            session.borrow_mut().deliver_reply(ticket, Utc::now());
        })
    });
}

#[wasm_bindgen_test]
async fn reply_arrives_after_delay() {
    let (session, mut timers) = quick_session();
    session.borrow_mut().send_message("hi", Utc::now());
    schedule_replies(&session, &mut timers);
    assert_eq!(session.borrow().messages().len(), 1);

    sleep(80).await;
    assert_eq!(session.borrow().messages().len(), 2);
    assert!(!session.borrow().awaiting_reply());
}

#[wasm_bindgen_test]
async fn cancelled_reply_never_arrives() {
    let (session, mut timers) = quick_session();
    session.borrow_mut().send_message("hi", Utc::now());
    schedule_replies(&session, &mut timers);

    assert_eq!(timers.cancel_all(), 1);
    sleep(80).await;
    assert_eq!(session.borrow().messages().len(), 1);
}

#[wasm_bindgen_test]
async fn frame_loop_stops_when_dropped() {
    let frames = Rc::new(Cell::new(0u32));
    let running = {
        let frames = frames.clone();
        FrameLoop::start(AnimationFrames, move || frames.set(frames.get() + 1))
    };

    sleep(200).await;
    assert!(frames.get() > 0);

    drop(running);
    let stopped_at = frames.get();
    sleep(200).await;
    assert_eq!(frames.get(), stopped_at);
    assert_eq!(Rc::strong_count(&frames), 1);
}
