// SPDX-License-Identifier: MIT
//
// Key map — binds key chords to command names.
//
// A key map file is a JSON array of bindings:
//
//   [
//     { "keys": ["ctrl+alt+w"], "command": "hws_toggle_whitespaces" },
//     { "keys": ["ctrl+k", "ctrl+w"], "command": "hws_toggle_whitespaces" }
//   ]
//
// A binding with several chords fires only when they are pressed in
// sequence. When two bindings share the same chords, the later one wins,
// so user key maps can be appended after the defaults.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::Deserialize;
use thiserror::Error;

/// Error parsing a chord or a key map file.
#[derive(Debug, Error)]
pub enum KeymapError {
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),

    #[error("unknown key `{0}`")]
    UnknownKey(String),

    #[error("binding for `{0}` has no keys")]
    NoKeys(String),

    #[error("failed to parse key map JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

// ─── Chords ──────────────────────────────────────────────────────────────────

bitflags! {
    /// Modifier keys held during a chord.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
        const SUPER = 0b0000_1000;
    }
}

/// The non-modifier part of a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character. ASCII letters are stored lowercase.
    Char(char),
    Enter,
    Tab,
    Space,
    Backspace,
    Escape,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// F1 through F24.
    F(u8),
}

/// One key press with its modifiers, e.g. `ctrl+alt+w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub modifiers: Modifiers,
    pub key: Key,
}

impl KeyChord {
    #[must_use]
    pub const fn new(modifiers: Modifiers, key: Key) -> Self {
        Self { modifiers, key }
    }
}

fn parse_modifier(name: &str) -> Result<Modifiers, KeymapError> {
    match name.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => Ok(Modifiers::CTRL),
        "alt" | "option" => Ok(Modifiers::ALT),
        "shift" => Ok(Modifiers::SHIFT),
        "super" | "cmd" | "command" => Ok(Modifiers::SUPER),
        _ => Err(KeymapError::UnknownModifier(name.to_string())),
    }
}

fn parse_key(name: &str) -> Result<Key, KeymapError> {
    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Ok(Key::Char(ch.to_ascii_lowercase()));
    }
    let lower = name.to_ascii_lowercase();
    let key = match lower.as_str() {
        "enter" => Key::Enter,
        "tab" => Key::Tab,
        "space" => Key::Space,
        "backspace" => Key::Backspace,
        "escape" | "esc" => Key::Escape,
        "delete" => Key::Delete,
        "up" => Key::Up,
        "down" => Key::Down,
        "left" => Key::Left,
        "right" => Key::Right,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" => Key::PageUp,
        "pagedown" => Key::PageDown,
        _ => match lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            Some(n @ 1..=24) => Key::F(n),
            _ => return Err(KeymapError::UnknownKey(name.to_string())),
        },
    };
    Ok(key)
}

impl FromStr for KeyChord {
    type Err = KeymapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // `ctrl++` binds the plus key itself.
        let (mods, key) = match s.strip_suffix("++") {
            Some(prefix) => (prefix, "+"),
            None if s == "+" => ("", s),
            None => s.rsplit_once('+').unwrap_or(("", s)),
        };
        let mut modifiers = Modifiers::empty();
        for name in mods.split('+').filter(|n| !n.is_empty()) {
            modifiers |= parse_modifier(name)?;
        }
        Ok(Self::new(modifiers, parse_key(key)?))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(ch) => write!(f, "{ch}"),
            Self::F(n) => write!(f, "f{n}"),
            Self::Enter => f.write_str("enter"),
            Self::Tab => f.write_str("tab"),
            Self::Space => f.write_str("space"),
            Self::Backspace => f.write_str("backspace"),
            Self::Escape => f.write_str("escape"),
            Self::Delete => f.write_str("delete"),
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
            Self::Home => f.write_str("home"),
            Self::End => f.write_str("end"),
            Self::PageUp => f.write_str("pageup"),
            Self::PageDown => f.write_str("pagedown"),
        }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Modifiers::CTRL, "ctrl+"),
            (Modifiers::ALT, "alt+"),
            (Modifiers::SHIFT, "shift+"),
            (Modifiers::SUPER, "super+"),
        ] {
            if self.modifiers.contains(flag) {
                f.write_str(name)?;
            }
        }
        write!(f, "{}", self.key)
    }
}

// ─── Keymap ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct BindingSpec {
    keys: Vec<String>,
    command: String,
}

/// A chord sequence bound to a command name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub keys: Vec<KeyChord>,
    pub command: String,
}

/// What a chord sequence resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// A binding matched exactly.
    Command(&'a str),
    /// The sequence is the start of at least one binding; wait for more keys.
    Pending,
    /// Nothing is bound to this sequence.
    Unbound,
}

/// An ordered list of bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keymap {
    bindings: Vec<Binding>,
}

impl Keymap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a key map file.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid JSON, unknown keys or modifiers, or a
    /// binding with an empty `keys` list.
    pub fn from_json(text: &str) -> Result<Self, KeymapError> {
        let specs: Vec<BindingSpec> = serde_json::from_str(text)?;
        let mut keymap = Self::new();
        for spec in specs {
            if spec.keys.is_empty() {
                return Err(KeymapError::NoKeys(spec.command));
            }
            let keys = spec
                .keys
                .iter()
                .map(|k| k.parse())
                .collect::<Result<Vec<KeyChord>, _>>()?;
            keymap.bind(keys, spec.command);
        }
        Ok(keymap)
    }

    /// Add a binding. It takes precedence over earlier ones for the same keys.
    pub fn bind(&mut self, keys: Vec<KeyChord>, command: impl Into<String>) {
        self.bindings.push(Binding {
            keys,
            command: command.into(),
        });
    }

    /// Append all of `other`'s bindings after this map's.
    pub fn extend(&mut self, other: Self) {
        self.bindings.extend(other.bindings);
    }

    /// Resolve a chord sequence.
    #[must_use]
    pub fn lookup(&self, keys: &[KeyChord]) -> Lookup<'_> {
        if let Some(b) = self.bindings.iter().rev().find(|b| b.keys == keys) {
            return Lookup::Command(&b.command);
        }
        if !keys.is_empty()
            && self
                .bindings
                .iter()
                .any(|b| b.keys.len() > keys.len() && b.keys.starts_with(keys))
        {
            return Lookup::Pending;
        }
        Lookup::Unbound
    }

    #[must_use]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chord(s: &str) -> KeyChord {
        s.parse().unwrap()
    }

    // ── Chord parsing ─────────────────────────────────────────────────────

    #[test]
    fn parse_ctrl_alt_w() {
        assert_eq!(
            chord("ctrl+alt+w"),
            KeyChord::new(Modifiers::CTRL | Modifiers::ALT, Key::Char('w'))
        );
    }

    #[test]
    fn modifier_order_and_case_do_not_matter() {
        assert_eq!(chord("Alt+Ctrl+W"), chord("ctrl+alt+w"));
    }

    #[test]
    fn parse_plain_and_named_keys() {
        assert_eq!(chord("x"), KeyChord::new(Modifiers::empty(), Key::Char('x')));
        assert_eq!(chord("shift+tab").key, Key::Tab);
        assert_eq!(chord("f12").key, Key::F(12));
        assert_eq!(chord("super+pageup").key, Key::PageUp);
    }

    #[test]
    fn parse_plus_key() {
        assert_eq!(chord("ctrl++"), KeyChord::new(Modifiers::CTRL, Key::Char('+')));
        assert_eq!(chord("+"), KeyChord::new(Modifiers::empty(), Key::Char('+')));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            "hyper+w".parse::<KeyChord>(),
            Err(KeymapError::UnknownModifier(m)) if m == "hyper"
        ));
        assert!(matches!(
            "ctrl+banana".parse::<KeyChord>(),
            Err(KeymapError::UnknownKey(_))
        ));
        assert!(matches!("f99".parse::<KeyChord>(), Err(KeymapError::UnknownKey(_))));
        assert!(matches!("".parse::<KeyChord>(), Err(KeymapError::UnknownKey(_))));
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(chord("alt+ctrl+W").to_string(), "ctrl+alt+w");
        assert_eq!(chord("shift+f5").to_string(), "shift+f5");
    }

    // ── Keymap ────────────────────────────────────────────────────────────

    #[test]
    fn from_json_and_lookup() {
        let km = Keymap::from_json(
            r#"[{ "keys": ["ctrl+alt+w"], "command": "hws_toggle_whitespaces" }]"#,
        )
        .unwrap();
        assert_eq!(
            km.lookup(&[chord("ctrl+alt+w")]),
            Lookup::Command("hws_toggle_whitespaces")
        );
        assert_eq!(km.lookup(&[chord("ctrl+w")]), Lookup::Unbound);
    }

    #[test]
    fn multi_chord_sequence() {
        let km = Keymap::from_json(r#"[{ "keys": ["ctrl+k", "ctrl+w"], "command": "c" }]"#)
            .unwrap();
        assert_eq!(km.lookup(&[chord("ctrl+k")]), Lookup::Pending);
        assert_eq!(
            km.lookup(&[chord("ctrl+k"), chord("ctrl+w")]),
            Lookup::Command("c")
        );
        assert_eq!(km.lookup(&[]), Lookup::Unbound);
    }

    #[test]
    fn later_binding_wins() {
        let mut km = Keymap::new();
        km.bind(vec![chord("f6")], "first");
        let user = Keymap::from_json(r#"[{ "keys": ["f6"], "command": "second" }]"#).unwrap();
        km.extend(user);
        assert_eq!(km.lookup(&[chord("f6")]), Lookup::Command("second"));
        assert_eq!(km.bindings().len(), 2);
    }

    #[test]
    fn from_json_errors() {
        assert!(matches!(
            Keymap::from_json(r#"[{ "keys": [], "command": "c" }]"#),
            Err(KeymapError::NoKeys(c)) if c == "c"
        ));
        assert!(matches!(
            Keymap::from_json("{}"),
            Err(KeymapError::Parse(_))
        ));
    }
}
