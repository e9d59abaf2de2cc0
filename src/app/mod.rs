//! Application state types and entry glue.
//!
//! Defines the screens, modals and theme that make up the TUI state, and
//! re-exports the event loop as `run`.
//!
pub mod form;
pub mod keymap;
pub mod update;

use ratatui::style::Color;
use std::time::Instant;

use crate::model::User;
use crate::store::UserStore;
use form::UserForm;
use keymap::Keymap;

/// Which view is routed to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Table of all records.
    List,
    /// Edit form for one record, looked up by id on every frame.
    Detail { id: u64 },
    /// Blank form for a new record.
    Create,
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Form,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub row_alt_bg: Color,
    pub error: Color,
}

const NAMED_COLORS: [(&str, Color); 8] = [
    ("reset", Color::Reset),
    ("black", Color::Black),
    ("white", Color::White),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("gray", Color::Gray),
    ("darkgray", Color::DarkGray),
];

impl Theme {
    /// Catppuccin Mocha palette.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            row_alt_bg: Color::Rgb(0x18, 0x18, 0x25),   // mantle
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    fn slots(&mut self) -> [(&'static str, &mut Color); 12] {
        [
            ("text", &mut self.text),
            ("muted", &mut self.muted),
            ("title", &mut self.title),
            ("border", &mut self.border),
            ("header_bg", &mut self.header_bg),
            ("header_fg", &mut self.header_fg),
            ("status_bg", &mut self.status_bg),
            ("status_fg", &mut self.status_fg),
            ("highlight_fg", &mut self.highlight_fg),
            ("highlight_bg", &mut self.highlight_bg),
            ("row_alt_bg", &mut self.row_alt_bg),
            ("error", &mut self.error),
        ]
    }

    /// Parse `key = color` lines. Unknown keys and bad colors keep the `mocha` value.
    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let (key, val) = (key.trim(), val.trim());
            let Some(color) = Self::parse_color(val) else {
                tracing::debug!(key, val, "ignoring unparsable theme color");
                continue;
            };
            if let Some((_, slot)) = theme.slots().into_iter().find(|(k, _)| *k == key) {
                *slot = color;
            }
        }
        theme
    }

    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Parse "#RRGGBB", "RRGGBB" or one of a few color names.
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if let Some((_, c)) = NAMED_COLORS.iter().find(|(n, _)| *n == lower) {
            return Some(*c);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    fn color_to_str(c: Color) -> String {
        match c {
            Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
            other => NAMED_COLORS
                .iter()
                .find(|(_, nc)| *nc == other)
                .map(|(n, _)| n.to_string())
                .unwrap_or_else(|| "reset".to_string()),
        }
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-manager-tui theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or a name (reset, black, white, red, green, yellow, gray, darkgray)\n\n");
        let mut copy = *self;
        for (key, color) in copy.slots() {
            let _ = writeln!(&mut buf, "{} = {}", key, Self::color_to_str(*color));
        }
        std::fs::write(path, buf)
    }

    /// Load `path`, or write the default theme there if it does not exist yet.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default theme");
        }
        t
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

/// Modal dialogs drawn over the current screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    /// `selected`: 0 = Yes, 1 = No.
    DeleteConfirm { id: u64, name: String, selected: usize },
    Info { message: String },
    Help { scroll: u16 },
}

pub struct AppState {
    pub started_at: Instant,
    pub store: UserStore,
    pub base_url: String,
    pub screen: Screen,
    pub form: Option<UserForm>,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    /// Last status line message.
    pub status: Option<String>,
}

impl AppState {
    pub fn new(store: UserStore, base_url: impl Into<String>, theme: Theme, keymap: Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            store,
            base_url: base_url.into(),
            screen: Screen::List,
            form: None,
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            theme,
            keymap,
            modal: None,
            status: None,
        }
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.store.users().get(self.selected_index)
    }

    /// Keep the cursor inside the collection after it shrinks.
    pub fn clamp_selection(&mut self) {
        let len = self.store.users().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    /// Close the modal and return to the input mode of the current screen.
    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = match self.screen {
            Screen::List => InputMode::Normal,
            Screen::Detail { .. } | Screen::Create => InputMode::Form,
        };
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_parse_overrides_known_keys() {
        let t = Theme::parse("# c\ntext = #000000\nerror = red\nbogus = #FFFFFF\nborder = nothex\n");
        assert_eq!(t.text, Color::Rgb(0, 0, 0));
        assert_eq!(t.error, Color::Red);
        assert_eq!(t.border, Theme::mocha().border);
    }

    #[test]
    fn parse_color_rejects_bad_hex() {
        assert_eq!(Theme::parse_color("#12345"), None);
        assert_eq!(Theme::parse_color("zzzzzz"), None);
        assert_eq!(Theme::parse_color("FFaa00"), Some(Color::Rgb(0xff, 0xaa, 0x00)));
    }
}
