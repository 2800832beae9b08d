//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time
//! - Keyboard and mouse mapping
//! - Storage (LocalStorage on web)

use crate::sim::{Key, PointerButton};

/// Map a DOM `KeyboardEvent.key` value to a game key
pub fn map_key(key: &str) -> Option<Key> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Key::Up),
        "ArrowDown" | "s" | "S" => Some(Key::Down),
        "ArrowLeft" | "a" | "A" => Some(Key::Left),
        "ArrowRight" | "d" | "D" => Some(Key::Right),
        " " | "Spacebar" => Some(Key::Action),
        "p" | "P" | "Escape" => Some(Key::Pause),
        "r" | "R" => Some(Key::Restart),
        _ => None,
    }
}

/// Keys whose browser default (scrolling) should be suppressed
pub fn blocks_default(key: Key) -> bool {
    matches!(key, Key::Up | Key::Down | Key::Left | Key::Right | Key::Action)
}

/// Map `MouseEvent.button`
pub fn map_button(button: i16) -> Option<PointerButton> {
    match button {
        0 => Some(PointerButton::Primary),
        2 => Some(PointerButton::Secondary),
        _ => None,
    }
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Seed for a new run
pub fn fresh_seed() -> u64 {
    now_ms() as u64
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(target_arch = "wasm32")]
pub fn storage_get(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

#[cfg(target_arch = "wasm32")]
pub fn storage_set(key: &str, value: &str) {
    match local_storage() {
        Some(storage) => {
            if let Err(e) = storage.set_item(key, value) {
                log::warn!("LocalStorage write failed: {e:?}");
            }
        }
        None => log::warn!("LocalStorage unavailable"),
    }
}
