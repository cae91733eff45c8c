//! Platform-specific key bindings

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Modifiers accepted for the save shortcut
/// - macOS: CONTROL or SUPER (Cmd key)
/// - Linux/Windows: CONTROL
#[cfg(target_os = "macos")]
const SAVE_MODIFIERS: KeyModifiers = KeyModifiers::CONTROL.union(KeyModifiers::SUPER);

#[cfg(not(target_os = "macos"))]
const SAVE_MODIFIERS: KeyModifiers = KeyModifiers::CONTROL;

/// Save shortcut display for the wizard footer
/// Ctrl+S works on all platforms
pub const SAVE_SHORTCUT: &str = "Ctrl+S";

/// Whether `key` asks to save the form
pub fn is_save_key(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('s') | KeyCode::Char('S'))
        && key.modifiers.intersects(SAVE_MODIFIERS)
}
