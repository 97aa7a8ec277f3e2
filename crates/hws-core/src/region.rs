//! Regions and the named region sets a scan produces.
//!
//! All offsets are **char offsets** from the start of the buffer, never byte
//! offsets. A region is half-open: `start..end`.

use std::fmt;

use bitflags::bitflags;

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// A contiguous char range within a buffer, `[start, end)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Region {
    pub start: usize,
    pub end: usize,
}

impl Region {
    /// Create a region. `start` and `end` are swapped if given out of order.
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Create a region from a start offset and a length.
    #[inline]
    #[must_use]
    pub const fn at(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Number of chars covered.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    /// True when the region covers no chars.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Whether the char at `offset` lies inside the region.
    #[inline]
    #[must_use]
    pub const fn contains(self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// RegionKey
// ---------------------------------------------------------------------------

/// The two named region sets the highlighter owns on every view.
///
/// The names are what the host sees; they stay stable so that regions drawn
/// by an earlier session of the highlighter can still be erased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionKey {
    /// Runs of two or more spaces.
    Spaces,
    /// Runs of one or more tabs.
    Tabs,
}

impl RegionKey {
    /// Both keys, spaces first.
    pub const ALL: [Self; 2] = [Self::Spaces, Self::Tabs];

    /// The host-facing region set name.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spaces => "WhitespacesHighlightListener",
            Self::Tabs => "WhitespacesHighlightListener2",
        }
    }

    /// Short human label, used in reports.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Spaces => "spaces",
            Self::Tabs => "tabs",
        }
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Draw flags
// ---------------------------------------------------------------------------

bitflags! {
    /// How the host should draw a region set.
    ///
    /// ```
    /// use hws_core::region::DrawFlags;
    ///
    /// let flags = DrawFlags::DRAW_EMPTY | DrawFlags::HIDE_ON_MINIMAP;
    /// assert!(flags.contains(DrawFlags::DRAW_EMPTY));
    /// assert!(!flags.contains(DrawFlags::DRAW_NO_FILL));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct DrawFlags: u8 {
        /// Draw empty regions as a caret-width marker.
        const DRAW_EMPTY           = 1 << 0;
        /// Do not show the regions on the minimap.
        const HIDE_ON_MINIMAP      = 1 << 1;
        /// Outline only, no background fill.
        const DRAW_NO_FILL         = 1 << 2;
        /// Fill only, no outline.
        const DRAW_NO_OUTLINE      = 1 << 3;
        /// Underline the region instead of filling it.
        const DRAW_SOLID_UNDERLINE = 1 << 4;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
