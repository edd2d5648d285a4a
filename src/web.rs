//! Browser facade.
//!
//! One `Session` lives in a thread-local for the lifetime of the page. Every
//! export borrows it for the duration of a single call and hands results back
//! to the page script as JSON strings. The elapsed-time display is refreshed
//! by a `setInterval` task owned by the session's ticker.

use std::cell::RefCell;

use js_sys::Date;
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::achievements::{ACHIEVEMENTS, AchievementDefinition};
use crate::catalog::{self, ELEMENTS};
use crate::run::GameMode;
use crate::scoring::{self, HintSize};
use crate::session::{LEADERBOARD_VIEW, Session};
use crate::storage::BrowserStore;
use crate::timer::{TICK_INTERVAL_MS, Ticker};
use crate::traversal::{Direction, NavDirection};

type BrowserSession = Session<BrowserStore, IntervalTicker>;

thread_local! {
    static SESSION: RefCell<Option<BrowserSession>> = const { RefCell::new(None) };
}

/// Element that shows the running clock, if the page has one.
const TIMER_ELEMENT_ID: &str = "timer";

// --- Interval ticker -----------------------------------------------------------

/// `setInterval` task that refreshes the clock display every `TICK_INTERVAL_MS`.
pub struct IntervalTicker {
    handle: Option<i32>,
    callback: Closure<dyn FnMut()>,
}

impl IntervalTicker {
    pub fn new() -> Self {
        Self {
            handle: None,
            callback: Closure::wrap(Box::new(on_tick) as Box<dyn FnMut()>),
        }
    }
}

impl Default for IntervalTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ticker for IntervalTicker {
    fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        let Some(win) = window() else {
            log::warn!("no window, clock display will not refresh");
            return;
        };
        match win.set_interval_with_callback_and_timeout_and_arguments_0(
            self.callback.as_ref().unchecked_ref(),
            TICK_INTERVAL_MS,
        ) {
            Ok(id) => self.handle = Some(id),
            Err(e) => log::warn!("setInterval failed: {e:?}"),
        }
    }

    fn stop(&mut self) {
        if let Some(id) = self.handle.take() {
            if let Some(win) = window() {
                win.clear_interval_with_handle(id);
            }
        }
    }

    fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for IntervalTicker {
    // the closure dies with us, so the interval must not outlive it
    fn drop(&mut self) {
        self.stop();
    }
}

fn on_tick() {
    let elapsed = SESSION.with(|cell| {
        cell.borrow_mut()
            .as_mut()
            .and_then(|session| session.tick(Date::now()))
    });
    if let Some(secs) = elapsed {
        set_text(TIMER_ELEMENT_ID, &scoring::format_time(secs));
    }
}

fn set_text(id: &str, text: &str) {
    if let Some(el) = window()
        .and_then(|w| w.document())
        .and_then(|doc| doc.get_element_by_id(id))
    {
        el.set_text_content(Some(text));
    }
}

// --- Helpers -------------------------------------------------------------------

fn with_session<R>(f: impl FnOnce(&mut BrowserSession) -> R) -> Result<R, JsValue> {
    SESSION.with(|cell| match cell.borrow_mut().as_mut() {
        Some(session) => Ok(f(session)),
        None => Err(JsValue::from_str("game not started, call start_game() first")),
    })
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn install_visibility_listener() -> Result<(), JsValue> {
    let doc = window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let hidden_doc = doc.clone();
    let closure = Closure::wrap(Box::new(move || {
        let hidden = hidden_doc.hidden();
        SESSION.with(|cell| {
            if let Some(session) = cell.borrow_mut().as_mut() {
                if hidden {
                    session.suspend();
                } else {
                    session.resume();
                    if let Some(secs) = session.tick(Date::now()) {
                        set_text(TIMER_ELEMENT_ID, &scoring::format_time(secs));
                    }
                }
            }
        });
    }) as Box<dyn FnMut()>);
    doc.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

// --- Exports -------------------------------------------------------------------

/// Creates the session (once per page) and returns the initial snapshot.
#[wasm_bindgen]
pub fn start_game() -> Result<String, JsValue> {
    let fresh = SESSION.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_some() {
            return false;
        }
        *slot = Some(Session::new(BrowserStore::new(), IntervalTicker::new()));
        true
    });
    if fresh {
        install_visibility_listener()?;
    }
    snapshot()
}

#[wasm_bindgen]
pub fn snapshot() -> Result<String, JsValue> {
    with_session(|s| to_json(&s.snapshot()))?
}

#[wasm_bindgen]
pub fn submit_guess(guess: &str) -> Result<String, JsValue> {
    with_session(|s| to_json(&s.submit(guess, Date::now())))?
}

/// Returns the selected atomic number, or `None` when the cell is not in play.
#[wasm_bindgen]
pub fn select_element(atomic: u8) -> Result<Option<u8>, JsValue> {
    with_session(|s| s.select(atomic).map(|e| e.atomic_number))
}

/// Arrow-key handler; accepts `KeyboardEvent.key` values.
#[wasm_bindgen]
pub fn navigate(key: &str) -> Result<Option<u8>, JsValue> {
    let Some(direction) = Direction::parse(key) else {
        return Ok(None);
    };
    with_session(|s| s.navigate(direction).map(|e| e.atomic_number))
}

/// `size` is one of `small`, `medium`, `large`; unknown sizes count as small.
#[wasm_bindgen]
pub fn request_hint(size: &str) -> Result<Option<String>, JsValue> {
    let size = HintSize::parse(size).unwrap_or_default();
    with_session(|s| s.request_hint(size).map(|hint| to_json(&hint)).transpose())?
}

#[wasm_bindgen]
pub fn check_all() -> Result<String, JsValue> {
    let summary = with_session(|s| s.check_all(Date::now()))?.map_err(js_error)?;
    to_json(&summary)
}

#[wasm_bindgen]
pub fn finish_challenge() -> Result<String, JsValue> {
    let summary = with_session(|s| s.finish(Date::now()))?.map_err(js_error)?;
    to_json(&summary)
}

#[wasm_bindgen]
pub fn reset_challenge() -> Result<String, JsValue> {
    with_session(|s| {
        s.reset();
        to_json(&s.snapshot())
    })?
}

/// Returns false for an unrecognised value.
#[wasm_bindgen]
pub fn set_nav_direction(value: &str) -> Result<bool, JsValue> {
    let Some(nav) = NavDirection::parse(value) else {
        return Ok(false);
    };
    with_session(|s| {
        s.set_nav_direction(nav);
        true
    })
}

#[wasm_bindgen]
pub fn set_game_mode(value: &str) -> Result<bool, JsValue> {
    let Some(mode) = GameMode::parse(value) else {
        return Ok(false);
    };
    with_session(|s| {
        s.set_game_mode(mode);
        true
    })
}

#[wasm_bindgen]
pub fn leaderboard(limit: Option<u32>) -> Result<String, JsValue> {
    let limit = limit.map_or(LEADERBOARD_VIEW, |n| n as usize);
    with_session(|s| to_json(&s.top_scores(limit)))?
}

#[wasm_bindgen]
pub fn history() -> Result<String, JsValue> {
    with_session(|s| to_json(&s.history()))?
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AchievementView {
    #[serde(flatten)]
    definition: &'static AchievementDefinition,
    unlocked: bool,
    unlocked_at: Option<u64>,
}

#[wasm_bindgen]
pub fn achievements() -> Result<String, JsValue> {
    with_session(|s| {
        let book = s.achievements();
        let views: Vec<AchievementView> = ACHIEVEMENTS
            .iter()
            .map(|definition| AchievementView {
                definition,
                unlocked: book.is_unlocked(definition.id),
                unlocked_at: book.unlocked_at(definition.id),
            })
            .collect();
        to_json(&views)
    })?
}

/// The static element table, for rendering the grid.
#[wasm_bindgen]
pub fn element_catalog() -> Result<String, JsValue> {
    to_json(&ELEMENTS[..])
}

/// Display formatting for the input box: `"fE"` becomes `"Fe"`.
#[wasm_bindgen]
pub fn format_symbol(input: &str) -> String {
    catalog::format_symbol(input)
}

#[wasm_bindgen]
pub fn export_data() -> Result<String, JsValue> {
    with_session(|s| s.export_data())?.map_err(js_error)
}

#[wasm_bindgen]
pub fn import_data(raw: &str) -> Result<(), JsValue> {
    with_session(|s| s.import_data(raw))?.map_err(js_error)
}

#[wasm_bindgen]
pub fn reset_all_data() -> Result<(), JsValue> {
    with_session(|s| s.reset_all_data())
}
