// SPDX-License-Identifier: MIT
//
// Views — a buffer as the host shows it, plus the named region sets that
// plugins draw on top of it.
//
// Region sets are keyed by name. Adding a set under an existing name
// replaces it wholesale; there is no merging. Erasing a name that was never
// added is a no-op.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use hws_core::region::{DrawFlags, Region};
use hws_core::scan;
use regex::Regex;

use crate::buffer::Buffer;

// ─── ViewId ──────────────────────────────────────────────────────────────────

/// Identifies a view within its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u32);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

// ─── RegionSet ───────────────────────────────────────────────────────────────

/// A named collection of regions drawn with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSet {
    pub regions: Vec<Region>,
    /// Highlight style (scope) name resolved by the rendering layer.
    pub scope: String,
    pub flags: DrawFlags,
}

// ─── View trait ──────────────────────────────────────────────────────────────

/// The services a host view offers to plugins.
pub trait View {
    fn id(&self) -> ViewId;

    /// Buffer size in bytes.
    fn size(&self) -> u64;

    /// Syntax definition name, if the view has one.
    fn syntax(&self) -> Option<&str>;

    /// The whole buffer text. Callers running several searches should take
    /// this once and search it with [`scan::find_all`].
    fn text(&self) -> Cow<'_, str>;

    /// All non-overlapping matches of `pattern`, as char-offset regions.
    fn find_all(&self, pattern: &Regex) -> Vec<Region> {
        scan::find_all(&self.text(), pattern)
    }

    /// Replace the region set called `key`.
    fn add_regions(&mut self, key: &str, regions: Vec<Region>, scope: &str, flags: DrawFlags);

    /// Remove the region set called `key` entirely.
    fn erase_regions(&mut self, key: &str);

    /// The regions currently in the set called `key` (empty if absent).
    fn get_regions(&self, key: &str) -> Vec<Region>;
}

// ─── MemoryView ──────────────────────────────────────────────────────────────

/// An in-memory view over a [`Buffer`].
#[derive(Debug)]
pub struct MemoryView {
    id: ViewId,
    buffer: Buffer,
    syntax: Option<String>,
    regions: BTreeMap<String, RegionSet>,
}

impl MemoryView {
    #[must_use]
    pub const fn new(id: ViewId, buffer: Buffer) -> Self {
        Self {
            id,
            buffer,
            syntax: None,
            regions: BTreeMap::new(),
        }
    }

    /// Set the syntax name (builder style).
    #[must_use]
    pub fn with_syntax(mut self, syntax: impl Into<String>) -> Self {
        self.syntax = Some(syntax.into());
        self
    }

    pub fn set_syntax(&mut self, syntax: Option<String>) {
        self.syntax = syntax;
    }

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Mutable buffer access. Edits made through this bypass event
    /// dispatch; go through [`Host`](crate::Host) to notify plugins.
    #[inline]
    pub const fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    /// Display name: the file name, or `untitled` for scratch buffers.
    #[must_use]
    pub fn name(&self) -> String {
        self.buffer
            .path()
            .and_then(|p| p.file_name())
            .map_or_else(|| "untitled".to_string(), |n| n.to_string_lossy().into_owned())
    }

    /// The full region set called `key`, with its style.
    #[must_use]
    pub fn region_set(&self, key: &str) -> Option<&RegionSet> {
        self.regions.get(key)
    }

    /// All region sets, ordered by name.
    pub fn region_sets(&self) -> impl Iterator<Item = (&str, &RegionSet)> {
        self.regions.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl View for MemoryView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn size(&self) -> u64 {
        self.buffer.len_bytes() as u64
    }

    fn syntax(&self) -> Option<&str> {
        self.syntax.as_deref()
    }

    fn text(&self) -> Cow<'_, str> {
        Cow::Owned(self.buffer.text())
    }

    fn add_regions(&mut self, key: &str, regions: Vec<Region>, scope: &str, flags: DrawFlags) {
        self.regions.insert(
            key.to_string(),
            RegionSet {
                regions,
                scope: scope.to_string(),
                flags,
            },
        );
    }

    fn erase_regions(&mut self, key: &str) {
        self.regions.remove(key);
    }

    fn get_regions(&self, key: &str) -> Vec<Region> {
        self.regions
            .get(key)
            .map(|set| set.regions.clone())
            .unwrap_or_default()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn view(text: &str) -> MemoryView {
        MemoryView::new(ViewId(1), Buffer::from_text(text))
    }

    #[test]
    fn size_is_bytes() {
        assert_eq!(view("é").size(), 2);
    }

    #[test]
    fn find_all_uses_char_offsets() {
        let v = view("é  x");
        let re = Regex::new(" {2,}").unwrap();
        assert_eq!(v.find_all(&re), vec![Region::new(1, 3)]);
    }

    #[test]
    fn add_replaces_existing_set() {
        let mut v = view("");
        v.add_regions("k", vec![Region::new(0, 1)], "a", DrawFlags::empty());
        v.add_regions("k", vec![Region::new(2, 4)], "b", DrawFlags::DRAW_EMPTY);
        assert_eq!(v.get_regions("k"), vec![Region::new(2, 4)]);
        let set = v.region_set("k").unwrap();
        assert_eq!(set.scope, "b");
        assert_eq!(set.flags, DrawFlags::DRAW_EMPTY);
    }

    #[test]
    fn add_empty_list_keeps_named_set() {
        let mut v = view("");
        v.add_regions("k", Vec::new(), "a", DrawFlags::empty());
        assert!(v.region_set("k").is_some());
        assert!(v.get_regions("k").is_empty());
    }

    #[test]
    fn erase_removes_and_tolerates_missing() {
        let mut v = view("");
        v.add_regions("k", vec![Region::new(0, 1)], "a", DrawFlags::empty());
        v.erase_regions("k");
        v.erase_regions("never-added");
        assert!(v.region_set("k").is_none());
        assert_eq!(v.region_sets().count(), 0);
    }

    #[test]
    fn syntax_and_name() {
        let v = view("x").with_syntax("Plain Text");
        assert_eq!(v.syntax(), Some("Plain Text"));
        assert_eq!(v.name(), "untitled");
        assert_eq!(v.id().to_string(), "view#1");
    }
}
