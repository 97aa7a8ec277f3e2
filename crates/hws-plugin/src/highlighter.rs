//! The whitespace highlighter.
//!
//! One handler manages both region sets. On every load, activation and
//! modification of a view, while enabled, the view is rescanned and both
//! sets are replaced outright. There is no diffing against the previous
//! scan.
//!
//! The enabled flag lives on the highlighter, not in a global. It starts
//! from [`Config::enabled`] and afterwards only the toggle command changes
//! it; settings reloads replace the rest of the config but leave the flag
//! alone.

use hws_core::config::Config;
use hws_core::region::{DrawFlags, RegionKey};
use hws_core::scan::{self, Skip};
use hws_host::settings::Settings;
use hws_host::{Plugin, View, Window};
use tracing::{debug, info};

use crate::TOGGLE_COMMAND;

/// Highlighter state: the enabled flag and the current options.
#[derive(Debug, Clone)]
pub struct WhitespaceHighlighter {
    enabled: bool,
    config: Config,
}

impl WhitespaceHighlighter {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            enabled: config.enabled,
            config,
        }
    }

    /// Build from the host's settings, with defaults for anything missing.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Config::from_map(settings.as_map()))
    }

    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Scan `view` and replace both of its whitespace region sets.
    ///
    /// Runs regardless of the enabled flag; the event hooks check it.
    ///
    /// # Errors
    ///
    /// Returns the [`Skip`] reason when the view is too large or is a
    /// search-results view. Its region sets are then left as they were.
    pub fn scan_and_highlight(&self, view: &mut dyn View) -> Result<(), Skip> {
        scan::should_scan(view.size(), view.syntax(), &self.config)?;
        let found = scan::scan(&view.text());
        for key in RegionKey::ALL {
            let regions = found.regions(key);
            debug!(view = %view.id(), set = %key, count = regions.len(), "highlighting");
            view.add_regions(
                key.name(),
                regions.to_vec(),
                self.config.scope(key),
                DrawFlags::DRAW_EMPTY,
            );
        }
        Ok(())
    }

    /// Remove both whitespace region sets from every view in `window`.
    pub fn clear_all(window: &mut dyn Window) {
        for view in window.views_mut() {
            for key in RegionKey::ALL {
                view.erase_regions(key.name());
            }
        }
    }

    /// Flip the enabled flag. Turning on rescans the active view; turning
    /// off clears every view in `window`. Returns the new state.
    pub fn toggle(&mut self, window: &mut dyn Window) -> bool {
        self.enabled = !self.enabled;
        info!(enabled = self.enabled, "toggled whitespace highlighting");
        if self.enabled {
            if let Some(view) = window.active_view_mut() {
                self.highlight(view);
            }
        } else {
            Self::clear_all(window);
        }
        self.enabled
    }

    /// Event hook body: scan if enabled, log skips.
    fn on_buffer_event(&self, view: &mut dyn View) {
        if self.enabled {
            self.highlight(view);
        }
    }

    fn highlight(&self, view: &mut dyn View) {
        if let Err(skip) = self.scan_and_highlight(view) {
            debug!(view = %view.id(), %skip, "skipped scan");
        }
    }
}

impl Default for WhitespaceHighlighter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Plugin for WhitespaceHighlighter {
    fn name(&self) -> &str {
        "highlight_whitespaces"
    }

    fn on_load(&mut self, view: &mut dyn View) {
        self.on_buffer_event(view);
    }

    fn on_activated(&mut self, view: &mut dyn View) {
        self.on_buffer_event(view);
    }

    fn on_modified(&mut self, view: &mut dyn View) {
        self.on_buffer_event(view);
    }

    fn on_settings_changed(&mut self, settings: &Settings) {
        self.config = Config::from_map(settings.as_map());
        debug!(config = ?self.config, "reloaded settings");
    }

    fn run_command(&mut self, name: &str, window: &mut dyn Window) -> bool {
        if name != TOGGLE_COMMAND {
            return false;
        }
        self.toggle(window);
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
