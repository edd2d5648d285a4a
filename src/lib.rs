//! AtomicMemory core crate.
//!
//! A periodic-table memorization challenge: the player types the symbol of
//! every element into an empty table while the run is timed and scored.
//! Everything except the `web` facade is plain Rust and runs natively, so the
//! game rules are tested without a browser.

pub mod achievements;
pub mod catalog;
pub mod run;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod timer;
pub mod traversal;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use catalog::{ELEMENTS, Element};
pub use run::{GameMode, RunState};
pub use scoring::{HintSize, Rank, RunRecord};
pub use session::{FinishError, RunSummary, Session, SubmitOutcome};
pub use storage::{KeyValueStore, MemoryStore};
pub use timer::{ManualTicker, Ticker};
pub use traversal::{Direction, NavDirection};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::debug!("atomic-memory {} loaded", env!("CARGO_PKG_VERSION"));
}
