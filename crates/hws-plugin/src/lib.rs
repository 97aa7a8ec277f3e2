//! # hws-plugin — the whitespace highlighter
//!
//! Marks runs of two or more spaces and runs of tabs in every buffer the
//! host shows, each with its own configurable highlight style.
//!
//! - **[`highlighter`]** — [`WhitespaceHighlighter`]: enabled flag, config,
//!   scan / clear / toggle, and the [`Plugin`](hws_host::Plugin) hooks
//!
//! Wiring it into a host:
//!
//! ```
//! use hws_core::Config;
//! use hws_host::{Host, settings::Settings};
//! use hws_plugin::{default_keymap, WhitespaceHighlighter};
//!
//! let mut host = Host::new(Settings::new(), default_keymap());
//! host.register(Box::new(WhitespaceHighlighter::new(Config::default())));
//! let id = host.open_text("a\tb", None);
//! # let _ = id;
//! ```

pub mod highlighter;

use hws_host::keymap::{Key, KeyChord, Keymap, Modifiers};

pub use highlighter::WhitespaceHighlighter;

/// Name of the toggle command.
pub const TOGGLE_COMMAND: &str = "hws_toggle_whitespaces";

/// The default key map: `ctrl+alt+w` toggles highlighting.
#[must_use]
pub fn default_keymap() -> Keymap {
    let mut keymap = Keymap::new();
    keymap.bind(
        vec![KeyChord::new(Modifiers::CTRL | Modifiers::ALT, Key::Char('w'))],
        TOGGLE_COMMAND,
    );
    keymap
}
