//! Best-run persistence
//!
//! A single record in LocalStorage: the most disk space ever freed in one
//! session.

use serde::{Deserialize, Serialize};

/// LocalStorage key (used only in wasm32)
#[allow(dead_code)]
const STORAGE_KEY: &str = "filepurge-score";

/// The stored best run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighScore {
    /// Disk kilobytes freed
    pub freed_kb: u32,
    /// Unix timestamp (ms) when achieved
    pub achieved_at_ms: f64,
}

/// Whether `score` should replace the stored best.
///
/// A first-ever score is always stored; after that only strict
/// improvements are.
pub fn beats(previous: Option<u32>, score: u32) -> bool {
    match previous {
        Some(best) => score > best,
        None => true,
    }
}

/// Decode a stored record. Earlier builds stored the bare kilobyte count,
/// so a plain integer is still accepted.
#[allow(dead_code)]
fn parse_stored(raw: &str) -> Option<HighScore> {
    if let Ok(best) = serde_json::from_str::<HighScore>(raw) {
        return Some(best);
    }
    raw.trim().parse::<u32>().ok().map(|freed_kb| HighScore {
        freed_kb,
        achieved_at_ms: 0.0,
    })
}

/// Load the stored best run (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn load() -> Option<HighScore> {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()?;
    let raw = storage.get_item(STORAGE_KEY).ok()??;
    parse_stored(&raw)
}

#[cfg(target_arch = "wasm32")]
fn save(best: &HighScore) {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    if let Some(storage) = storage {
        if let Ok(json) = serde_json::to_string(best) {
            let _ = storage.set_item(STORAGE_KEY, &json);
            log::info!("best run saved ({}kb)", best.freed_kb);
        }
    }
}

/// Record a finished run, returning the new best if `freed_kb` took it.
#[cfg(target_arch = "wasm32")]
pub fn record(freed_kb: u32) -> Option<HighScore> {
    let previous = load().map(|best| best.freed_kb);
    if !beats(previous, freed_kb) {
        log::info!(
            "freed {}kb, best remains {}kb",
            freed_kb,
            previous.unwrap_or(0)
        );
        return None;
    }

    let best = HighScore {
        freed_kb,
        achieved_at_ms: js_sys::Date::now(),
    };
    save(&best);
    Some(best)
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn load() -> Option<HighScore> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn record(_freed_kb: u32) -> Option<HighScore> {
    // No-op for native
    None
}
