// SPDX-License-Identifier: MIT
//
// hws-host — the editor side of the whitespace highlighter.
//
// The highlighter never owns text. It asks a host for everything: buffer
// size and syntax, pattern search, named region sets, the open views of a
// window, persisted settings, key bindings. This crate names those services
// as traits and ships an in-memory host that implements all of them, so
// the plugin can be driven end to end without a real editor.
//
//   Host ── owns ──▶ MemoryWindow ── owns ──▶ MemoryView ── owns ──▶ Buffer
//    │                                            └─ region sets by name
//    ├── Settings (JSON)      ├── Keymap (chord → command)
//    └── plugins: Vec<Box<dyn Plugin>>  ◀── load / activated / modified

pub mod buffer;
pub mod keymap;
pub mod plugin;
pub mod settings;
pub mod style;
pub mod view;
pub mod window;

pub use plugin::{BufferEvent, Host, Plugin};
pub use view::{MemoryView, View, ViewId};
pub use window::{MemoryWindow, Window};
