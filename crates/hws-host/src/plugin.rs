// SPDX-License-Identifier: MIT
//
// Plugin registry and event dispatch.
//
// Plugins implement `Plugin`; every hook has a no-op default, so a plugin
// only overrides what it reacts to. The `Host` owns the window, settings,
// key map and registered plugins, and turns its own operations into
// events:
//
//   open_text / open_file   → on_load, then on_activated
//   activate                → on_activated
//   insert / erase          → on_modified
//   reload_settings         → on_settings_changed
//   run_command / press     → run_command on each plugin until one claims it
//
// Dispatch is synchronous and in registration order. Nothing is queued.

use std::io;
use std::ops::Range;
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::buffer::Buffer;
use crate::keymap::{KeyChord, Keymap, Lookup};
use crate::settings::Settings;
use crate::view::{View, ViewId};
use crate::window::{MemoryWindow, Window};

// ─── Events ──────────────────────────────────────────────────────────────────

/// Buffer lifecycle events delivered to plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferEvent {
    /// The buffer finished loading.
    Load,
    /// The view gained focus.
    Activated,
    /// The buffer text changed.
    Modified,
}

// ─── Plugin trait ────────────────────────────────────────────────────────────

/// A host extension.
pub trait Plugin {
    /// Name used in log output.
    fn name(&self) -> &str;

    fn on_load(&mut self, _view: &mut dyn View) {}

    fn on_activated(&mut self, _view: &mut dyn View) {}

    fn on_modified(&mut self, _view: &mut dyn View) {}

    /// The host's settings were reloaded.
    fn on_settings_changed(&mut self, _settings: &Settings) {}

    /// Run the window command called `name`.
    ///
    /// Return `true` if this plugin owns the command. Commands take no
    /// arguments and produce no value; they act through the window.
    fn run_command(&mut self, _name: &str, _window: &mut dyn Window) -> bool {
        false
    }
}

/// Deliver one event to one plugin.
pub fn dispatch(plugin: &mut dyn Plugin, event: BufferEvent, view: &mut dyn View) {
    match event {
        BufferEvent::Load => plugin.on_load(view),
        BufferEvent::Activated => plugin.on_activated(view),
        BufferEvent::Modified => plugin.on_modified(view),
    }
}

// ─── Host ────────────────────────────────────────────────────────────────────

/// An in-memory editor host with one window.
pub struct Host {
    window: MemoryWindow,
    settings: Settings,
    keymap: Keymap,
    plugins: Vec<Box<dyn Plugin>>,
    /// Chords pressed so far toward a multi-chord binding.
    pending_keys: Vec<KeyChord>,
}

impl Host {
    #[must_use]
    pub fn new(settings: Settings, keymap: Keymap) -> Self {
        Self {
            window: MemoryWindow::new(),
            settings,
            keymap,
            plugins: Vec::new(),
            pending_keys: Vec::new(),
        }
    }

    /// Register a plugin. It receives every event from now on.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        debug!(plugin = plugin.name(), "registered plugin");
        self.plugins.push(plugin);
    }

    #[inline]
    #[must_use]
    pub const fn window(&self) -> &MemoryWindow {
        &self.window
    }

    #[inline]
    pub const fn window_mut(&mut self) -> &mut MemoryWindow {
        &mut self.window
    }

    #[inline]
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub const fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    // -- Buffers ------------------------------------------------------------

    /// Open a scratch buffer holding `text`, focus it, and fire load and
    /// activated.
    pub fn open_text(&mut self, text: &str, syntax: Option<&str>) -> ViewId {
        self.open_buffer(Buffer::from_text(text), syntax)
    }

    /// Open a file, focus it, and fire load and activated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn open_file(&mut self, path: &Path, syntax: Option<&str>) -> io::Result<ViewId> {
        let buffer = Buffer::from_file(path)?;
        Ok(self.open_buffer(buffer, syntax))
    }

    fn open_buffer(&mut self, buffer: Buffer, syntax: Option<&str>) -> ViewId {
        let id = self.window.open(buffer, syntax.map(str::to_string));
        self.emit(BufferEvent::Load, id);
        self.emit(BufferEvent::Activated, id);
        id
    }

    /// Focus a view and fire activated. Returns `false` for unknown views.
    pub fn activate(&mut self, id: ViewId) -> bool {
        if !self.window.focus(id) {
            return false;
        }
        self.emit(BufferEvent::Activated, id);
        true
    }

    /// Insert text into a view's buffer and fire modified.
    ///
    /// Returns `false` for unknown views.
    ///
    /// # Panics
    ///
    /// Panics if `char_idx` is past the end of the buffer.
    pub fn insert(&mut self, id: ViewId, char_idx: usize, text: &str) -> bool {
        let Some(view) = self.window.view_mut(id) else {
            return false;
        };
        view.buffer_mut().insert(char_idx, text);
        self.emit(BufferEvent::Modified, id);
        true
    }

    /// Remove a char range from a view's buffer and fire modified.
    ///
    /// Returns `false` for unknown views.
    ///
    /// # Panics
    ///
    /// Panics if the range ends past the end of the buffer.
    pub fn erase(&mut self, id: ViewId, range: Range<usize>) -> bool {
        let Some(view) = self.window.view_mut(id) else {
            return false;
        };
        view.buffer_mut().remove(range);
        self.emit(BufferEvent::Modified, id);
        true
    }

    /// Deliver `event` for view `id` to every plugin.
    pub fn emit(&mut self, event: BufferEvent, id: ViewId) {
        let Some(view) = self.window.view_mut(id) else {
            return;
        };
        trace!(?event, view = %id, "dispatching");
        for plugin in &mut self.plugins {
            dispatch(plugin.as_mut(), event, &mut *view);
        }
    }

    // -- Settings -----------------------------------------------------------

    /// Replace the settings and notify every plugin.
    pub fn reload_settings(&mut self, settings: Settings) {
        self.settings = settings;
        for plugin in &mut self.plugins {
            plugin.on_settings_changed(&self.settings);
        }
    }

    // -- Commands -----------------------------------------------------------

    /// Run a window command. Returns `false` if no plugin owns it.
    pub fn run_command(&mut self, name: &str) -> bool {
        for plugin in &mut self.plugins {
            if plugin.run_command(name, &mut self.window) {
                debug!(command = name, plugin = plugin.name(), "ran command");
                return true;
            }
        }
        warn!(command = name, "no plugin handles command");
        false
    }

    /// Feed one key chord through the key map.
    ///
    /// Returns the command that ran, if the chord completed a binding. A
    /// chord that breaks a pending sequence starts a new one.
    pub fn press(&mut self, chord: KeyChord) -> Option<String> {
        let restart = !self.pending_keys.is_empty();
        self.pending_keys.push(chord);
        let command = match self.keymap.lookup(&self.pending_keys) {
            Lookup::Pending => return None,
            Lookup::Command(name) => name.to_string(),
            Lookup::Unbound => {
                self.pending_keys.clear();
                return if restart { self.press(chord) } else { None };
            }
        };
        self.pending_keys.clear();
        self.run_command(&command).then_some(command)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every hook call as a string.
    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Plugin for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn on_load(&mut self, view: &mut dyn View) {
            self.log.borrow_mut().push(format!("load {}", view.id()));
        }

        fn on_activated(&mut self, view: &mut dyn View) {
            self.log.borrow_mut().push(format!("activated {}", view.id()));
        }

        fn on_modified(&mut self, view: &mut dyn View) {
            self.log.borrow_mut().push(format!("modified {}", view.id()));
        }

        fn on_settings_changed(&mut self, settings: &Settings) {
            self.log
                .borrow_mut()
                .push(format!("settings {}", settings.as_map().len()));
        }

        fn run_command(&mut self, name: &str, window: &mut dyn Window) -> bool {
            if name != "count_views" {
                return false;
            }
            let n = window.views_mut().count();
            self.log.borrow_mut().push(format!("views {n}"));
            true
        }
    }

    fn host() -> (Host, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let keymap = Keymap::from_json(
            r#"[
                { "keys": ["ctrl+alt+w"], "command": "count_views" },
                { "keys": ["ctrl+k", "ctrl+c"], "command": "count_views" },
                { "keys": ["f2"], "command": "nobody" }
            ]"#,
        )
        .unwrap();
        let mut host = Host::new(Settings::new(), keymap);
        host.register(Box::new(Recorder { log: Rc::clone(&log) }));
        (host, log)
    }

    fn take(log: &Rc<RefCell<Vec<String>>>) -> Vec<String> {
        std::mem::take(&mut *log.borrow_mut())
    }

    #[test]
    fn open_fires_load_then_activated() {
        let (mut host, log) = host();
        let id = host.open_text("x", None);
        assert_eq!(take(&log), vec![format!("load {id}"), format!("activated {id}")]);
    }

    #[test]
    fn activate_and_edit_fire_events() {
        let (mut host, log) = host();
        let a = host.open_text("ab", None);
        let _b = host.open_text("", None);
        take(&log);

        assert!(host.activate(a));
        assert!(host.insert(a, 1, "  "));
        assert!(host.erase(a, 1..2));
        assert_eq!(
            take(&log),
            vec![
                format!("activated {a}"),
                format!("modified {a}"),
                format!("modified {a}"),
            ]
        );
        assert_eq!(host.window().view(a).unwrap().buffer().text(), "a b");
    }

    #[test]
    fn unknown_view_fires_nothing() {
        let (mut host, log) = host();
        assert!(!host.activate(ViewId(42)));
        assert!(!host.insert(ViewId(42), 0, "x"));
        assert!(take(&log).is_empty());
    }

    #[test]
    fn reload_notifies_plugins() {
        let (mut host, log) = host();
        let settings = Settings::from_json(r#"{ "a": 1, "b": 2 }"#).unwrap();
        host.reload_settings(settings);
        assert_eq!(take(&log), vec!["settings 2".to_string()]);
        assert_eq!(host.settings().as_map().len(), 2);
    }

    #[test]
    fn commands_route_to_owner() {
        let (mut host, log) = host();
        host.open_text("", None);
        host.open_text("", None);
        take(&log);
        assert!(host.run_command("count_views"));
        assert!(!host.run_command("missing"));
        assert_eq!(take(&log), vec!["views 2".to_string()]);
    }

    #[test]
    fn press_runs_bound_command() {
        let (mut host, log) = host();
        let ran = host.press("ctrl+alt+w".parse().unwrap());
        assert_eq!(ran.as_deref(), Some("count_views"));
        assert_eq!(take(&log), vec!["views 0".to_string()]);
    }

    #[test]
    fn press_multi_chord_sequence() {
        let (mut host, log) = host();
        assert_eq!(host.press("ctrl+k".parse().unwrap()), None);
        assert_eq!(
            host.press("ctrl+c".parse().unwrap()).as_deref(),
            Some("count_views")
        );
        assert_eq!(take(&log), vec!["views 0".to_string()]);
    }

    #[test]
    fn press_unbound_or_unowned_runs_nothing() {
        let (mut host, log) = host();
        assert_eq!(host.press("ctrl+q".parse().unwrap()), None);
        assert_eq!(host.press("f2".parse().unwrap()), None);
        // A broken sequence resets; the next chord starts fresh.
        assert_eq!(host.press("ctrl+k".parse().unwrap()), None);
        assert_eq!(host.press("x".parse().unwrap()), None);
        assert_eq!(
            host.press("ctrl+alt+w".parse().unwrap()).as_deref(),
            Some("count_views")
        );
        assert_eq!(take(&log), vec!["views 0".to_string()]);
    }

    #[test]
    fn chord_breaking_a_sequence_is_tried_on_its_own() {
        let (mut host, log) = host();
        assert_eq!(host.press("ctrl+k".parse().unwrap()), None);
        assert_eq!(
            host.press("ctrl+alt+w".parse().unwrap()).as_deref(),
            Some("count_views")
        );
        // It can also open a new sequence.
        assert_eq!(host.press("ctrl+k".parse().unwrap()), None);
        assert_eq!(host.press("ctrl+k".parse().unwrap()), None);
        assert_eq!(
            host.press("ctrl+c".parse().unwrap()).as_deref(),
            Some("count_views")
        );
        assert_eq!(take(&log), vec!["views 0".to_string(), "views 0".to_string()]);
    }
}
