// SPDX-License-Identifier: MIT
//
// Highlight styles — the host's rendering layer for region sets.
//
// Plugins only ever name a style ("invalid", "comment", ...). The style
// table resolves that name to colors and attributes. Dotted names fall back
// to their parent: `invalid.deprecated.trailing` tries itself, then
// `invalid.deprecated`, then `invalid`. A name with no match at all renders
// in inverse video so the region is still visible.
//
// `render` paints a view's region sets over its text as ANSI SGR sequences.

use std::collections::HashMap;
use std::io::{self, Write};

use bitflags::bitflags;
use hws_core::region::DrawFlags;

use crate::view::MemoryView;

// ─── Style ───────────────────────────────────────────────────────────────────

/// A terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's own foreground/background.
    #[default]
    Default,
    /// Palette index: 0-7 standard, 8-15 bright, 16-255 extended.
    Ansi256(u8),
    Rgb(u8, u8, u8),
}

bitflags! {
    /// Text attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        const BOLD      = 1 << 0;
        const DIM       = 1 << 1;
        const ITALIC    = 1 << 2;
        const UNDERLINE = 1 << 3;
        const INVERSE   = 1 << 4;
    }
}

/// A resolved highlight style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attr,
}

impl Style {
    /// Style used for names the table cannot resolve.
    pub const FALLBACK: Self = Self {
        fg: Color::Default,
        bg: Color::Default,
        attrs: Attr::INVERSE,
    };

    #[must_use]
    pub const fn fg_bg(fg: Color, bg: Color) -> Self {
        Self {
            fg,
            bg,
            attrs: Attr::empty(),
        }
    }

    /// Adjust the style for a region set's draw flags.
    #[must_use]
    pub fn with_flags(mut self, flags: DrawFlags) -> Self {
        if flags.intersects(DrawFlags::DRAW_NO_FILL | DrawFlags::DRAW_SOLID_UNDERLINE) {
            if self.fg == Color::Default {
                self.fg = self.bg;
            }
            self.bg = Color::Default;
            self.attrs.remove(Attr::INVERSE);
        }
        if flags.contains(DrawFlags::DRAW_SOLID_UNDERLINE) {
            self.attrs |= Attr::UNDERLINE;
        }
        self
    }

    /// Write the SGR sequence that switches the terminal to this style.
    /// Always starts from a reset, so it does not depend on prior state.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    pub fn write_sgr(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(b"\x1b[0")?;
        for (flag, code) in [
            (Attr::BOLD, ";1"),
            (Attr::DIM, ";2"),
            (Attr::ITALIC, ";3"),
            (Attr::UNDERLINE, ";4"),
            (Attr::INVERSE, ";7"),
        ] {
            if self.attrs.contains(flag) {
                w.write_all(code.as_bytes())?;
            }
        }
        write_color(w, self.fg, 30, 90, 38)?;
        write_color(w, self.bg, 40, 100, 48)?;
        w.write_all(b"m")
    }
}

/// Append one color parameter. `base`/`bright` are the SGR bases for
/// palette indices 0-7 and 8-15; `extended` is 38 (fg) or 48 (bg).
fn write_color(
    w: &mut impl Write,
    color: Color,
    base: u8,
    bright: u8,
    extended: u8,
) -> io::Result<()> {
    match color {
        Color::Default => Ok(()),
        Color::Ansi256(idx) if idx < 8 => write!(w, ";{}", base + idx),
        Color::Ansi256(idx) if idx < 16 => write!(w, ";{}", bright + idx - 8),
        Color::Ansi256(idx) => write!(w, ";{extended};5;{idx}"),
        Color::Rgb(r, g, b) => write!(w, ";{extended};2;{r};{g};{b}"),
    }
}

// ─── StyleTable ──────────────────────────────────────────────────────────────

/// Maps highlight style names to styles.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    styles: HashMap<String, Style>,
}

impl StyleTable {
    /// An empty table. Every name resolves to [`Style::FALLBACK`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with the common scope names a color scheme defines.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.insert("invalid", Style::fg_bg(Color::Ansi256(15), Color::Ansi256(1)));
        table.insert(
            "invalid.deprecated",
            Style::fg_bg(Color::Ansi256(0), Color::Ansi256(3)),
        );
        table.insert(
            "comment",
            Style {
                fg: Color::Ansi256(8),
                bg: Color::Ansi256(236),
                attrs: Attr::ITALIC,
            },
        );
        table.insert("string", Style::fg_bg(Color::Ansi256(0), Color::Ansi256(2)));
        table.insert("keyword", Style::fg_bg(Color::Ansi256(0), Color::Ansi256(5)));
        table.insert("markup.deleted", Style::fg_bg(Color::Ansi256(15), Color::Ansi256(9)));
        table.insert("region.redish", Style::fg_bg(Color::Default, Color::Rgb(191, 97, 106)));
        table.insert("region.orangish", Style::fg_bg(Color::Default, Color::Rgb(208, 135, 112)));
        table.insert("region.yellowish", Style::fg_bg(Color::Default, Color::Rgb(235, 203, 139)));
        table.insert("region.bluish", Style::fg_bg(Color::Default, Color::Rgb(129, 161, 193)));
        table
    }

    pub fn insert(&mut self, name: impl Into<String>, style: Style) {
        self.styles.insert(name.into(), style);
    }

    /// Resolve a style name, walking up dotted parents.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Style {
        let mut candidate = name.trim();
        loop {
            if let Some(style) = self.styles.get(candidate) {
                return *style;
            }
            match candidate.rsplit_once('.') {
                Some((parent, _)) => candidate = parent,
                None => return Style::FALLBACK,
            }
        }
    }
}

// ─── Rendering ───────────────────────────────────────────────────────────────

/// Paint `view`'s text with its region sets highlighted.
///
/// Region sets are applied in name order; where sets overlap, the later one
/// wins. Tabs are expanded to the next multiple of `tab_width` columns so the
/// highlight covers the space they occupy.
///
/// # Errors
///
/// Propagates write errors.
pub fn render(
    w: &mut impl Write,
    view: &MemoryView,
    table: &StyleTable,
    tab_width: usize,
) -> io::Result<()> {
    let text = view.buffer().text();
    let mut styles: Vec<Option<Style>> = vec![None; view.buffer().len_chars()];
    for (_, set) in view.region_sets() {
        let style = table.resolve(&set.scope).with_flags(set.flags);
        for region in &set.regions {
            let end = region.end.min(styles.len());
            for slot in styles.iter_mut().take(end).skip(region.start) {
                *slot = Some(style);
            }
        }
    }

    let tab_width = tab_width.max(1);
    let mut current: Option<Style> = None;
    let mut col = 0;
    for (ch, style) in text.chars().zip(styles) {
        if style != current {
            match style {
                Some(s) => s.write_sgr(w)?,
                None => w.write_all(b"\x1b[0m")?,
            }
            current = style;
        }
        match ch {
            '\t' => {
                let width = tab_width - col % tab_width;
                write!(w, "{:width$}", "")?;
                col += width;
            }
            '\n' => {
                // Keep highlights from bleeding to the terminal edge.
                if current.is_some() {
                    w.write_all(b"\x1b[0m")?;
                    current = None;
                }
                w.write_all(b"\n")?;
                col = 0;
            }
            _ => {
                write!(w, "{ch}")?;
                col += 1;
            }
        }
    }
    if current.is_some() {
        w.write_all(b"\x1b[0m")?;
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
