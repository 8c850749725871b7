//! User configuration: animation constants, frame pacing and keybindings.
//!
//! Settings are read from a simple key-value text file at
//! `$XDG_CONFIG_HOME/choreo/config.toml` (default `~/.config/choreo/config.toml`).
//! Missing keys keep their defaults; bad values are logged and ignored.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

use crate::core::engine::ChoreoConfig;

// ───────────────────────────────────────── errors ────────────

/// A config value that parsed but is outside its allowed range.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("`{key}`: cannot parse {value:?}")]
    Parse { key: String, value: String },
    #[error("`smoothing_alpha` must be strictly between 0 and 1, got {0}")]
    Alpha(f64),
    #[error("`{key}` must be a finite number, got {value}")]
    NotFinite { key: &'static str, value: f64 },
    #[error("`{0}` must be greater than zero")]
    Zero(&'static str),
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    #[error("no valid key in binding {0:?}")]
    EmptyBinding(String),
}

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    NextFilter,
    PrevFilter,
    Search,
    ToggleMenu,
    Quit,
}

impl Action {
    pub const ALL: &[Action] = &[
        Action::ScrollUp,
        Action::ScrollDown,
        Action::PageUp,
        Action::PageDown,
        Action::NextFilter,
        Action::PrevFilter,
        Action::Search,
        Action::ToggleMenu,
        Action::Quit,
    ];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::NextFilter => "next_filter",
            Action::PrevFilter => "prev_filter",
            Action::Search => "search",
            Action::ToggleMenu => "toggle_menu",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT/SHIFT are compared, and SHIFT not at all for characters
    /// since it is already reflected in the character's case.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mut mask = KeyModifiers::CONTROL | KeyModifiers::ALT;
        if !matches!(self.code, KeyCode::Char(_)) {
            mask |= KeyModifiers::SHIFT;
        }
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Short form for the status bar (e.g. `"↑"`, `"Ctrl+c"`, `"/"`).
    pub fn display(&self) -> String {
        let mut s = self.modifier_prefix();
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            other => key_name(other),
        });
        s
    }

    /// Config-file form (e.g. `"Alt+Up"`, `"Ctrl+c"`, `"q"`).
    fn to_config_string(&self) -> String {
        let mut s = self.modifier_prefix();
        s.push_str(&key_name(self.code));
        s
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => KeyCode::F(s[1..].parse().ok()?),
            _ => {
                // Single characters keep their case: `N` and `n` differ.
                let mut chars = key_part.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                KeyCode::Char(c)
            }
        };

        Some(KeyBind { code, modifiers })
    }
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::BackTab => "BackTab".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub choreo: ChoreoConfig,
    /// Animation frames per second delivered to the follower.
    pub frame_rate_hz: u32,
    /// Pixel height of one terminal row, used to express scroll offsets in
    /// the same unit as `scroll_threshold`.
    pub px_per_row: f64,
    pub bindings: HashMap<Action, Vec<KeyBind>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            choreo: ChoreoConfig::default(),
            frame_rate_hz: 60,
            px_per_row: 16.0,
            bindings: Self::default_bindings(),
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        let n = KeyModifiers::NONE;
        let bind = |code| KeyBind::new(code, n);
        let mut m = HashMap::new();

        m.insert(ScrollUp, vec![bind(KeyCode::Up), bind(KeyCode::Char('k'))]);
        m.insert(ScrollDown, vec![bind(KeyCode::Down), bind(KeyCode::Char('j'))]);
        m.insert(PageUp, vec![bind(KeyCode::PageUp)]);
        m.insert(PageDown, vec![bind(KeyCode::PageDown), bind(KeyCode::Char(' '))]);
        m.insert(NextFilter, vec![bind(KeyCode::Tab), bind(KeyCode::Right)]);
        m.insert(
            PrevFilter,
            vec![
                KeyBind::new(KeyCode::BackTab, KeyModifiers::SHIFT),
                bind(KeyCode::Left),
            ],
        );
        m.insert(Search, vec![bind(KeyCode::Char('/'))]);
        m.insert(ToggleMenu, vec![bind(KeyCode::Char('m'))]);
        m.insert(Quit, vec![bind(KeyCode::Char('q'))]);

        m
    }

    /// Find the action bound to a key event.  The binding with the most
    /// modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<(Action, u32)> = None;
        for (&action, binds) in &self.bindings {
            for bind in binds.iter().filter(|b| b.matches(event)) {
                let mc = bind.modifiers.bits().count_ones();
                if best.map_or(true, |(_, c)| mc > c) {
                    best = Some((action, mc));
                }
            }
        }
        best.map(|(action, _)| action)
    }

    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Status-bar hint built from the current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | {}: filter | {}: search | {}: menu | {}: quit",
            self.short_binding(Action::ScrollUp),
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::NextFilter),
            self.short_binding(Action::Search),
            self.short_binding(Action::ToggleMenu),
            self.short_binding(Action::Quit),
        )
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate_hz.max(1)))
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from `path` (or the default location), falling back to
    /// defaults when the file is missing or unreadable.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), "config: loaded");
                Self::parse(&contents)
            }
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "config: using defaults");
                Self::default()
            }
        }
    }

    /// Parse the key-value format.  Every rejected line is logged and skipped.
    pub fn parse(s: &str) -> Self {
        let mut config = Self::default();
        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"');
            if let Err(err) = config.apply(key.trim(), value) {
                tracing::warn!(%err, "config: ignoring value");
            }
        }
        config
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let parse_err = || ConfigError::Parse {
            key: key.to_string(),
            value: value.to_string(),
        };
        let float = || value.parse::<f64>().map_err(|_| parse_err());
        // Negative durations clamp to zero ("fire on the next tick").
        let millis = || {
            value
                .parse::<i64>()
                .map(|v| Duration::from_millis(v.max(0) as u64))
                .map_err(|_| parse_err())
        };

        match key {
            "smoothing_alpha" => self.choreo.smoothing_alpha = validate_alpha(float()?)?,
            "fade_out_ms" => self.choreo.fade_out = millis()?,
            "fade_in_ms" => self.choreo.fade_in = millis()?,
            "search_debounce_ms" => self.choreo.search_debounce = millis()?,
            "scroll_threshold" => {
                self.choreo.scroll_threshold = validate_finite("scroll_threshold", float()?)?
            }
            "frame_rate_hz" => {
                let hz = value.parse::<u32>().map_err(|_| parse_err())?;
                if hz == 0 {
                    return Err(ConfigError::Zero("frame_rate_hz"));
                }
                self.frame_rate_hz = hz;
            }
            "px_per_row" => {
                let px = validate_finite("px_per_row", float()?)?;
                if px <= 0.0 {
                    return Err(ConfigError::Zero("px_per_row"));
                }
                self.px_per_row = px;
            }
            _ => {
                let action = Action::from_config_key(key)
                    .ok_or_else(|| ConfigError::UnknownAction(key.to_string()))?;
                let parsed: Vec<KeyBind> = value
                    .split(',')
                    .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                    .collect();
                if parsed.is_empty() {
                    return Err(ConfigError::EmptyBinding(value.to_string()));
                }
                self.bindings.insert(action, parsed);
            }
        }
        Ok(())
    }

    /// Render the effective configuration in file format.
    pub fn serialise(&self) -> String {
        let c = &self.choreo;
        let mut lines = vec![
            "# choreo configuration".to_string(),
            String::new(),
            "# Animation".to_string(),
            format!("smoothing_alpha = {}", c.smoothing_alpha),
            format!("fade_out_ms = {}", c.fade_out.as_millis()),
            format!("fade_in_ms = {}", c.fade_in.as_millis()),
            format!("scroll_threshold = {}", c.scroll_threshold),
            format!("search_debounce_ms = {}", c.search_debounce.as_millis()),
            format!("frame_rate_hz = {}", self.frame_rate_hz),
            format!("px_per_row = {}", self.px_per_row),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(KeyBind::to_config_string).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

fn validate_alpha(alpha: f64) -> Result<f64, ConfigError> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(alpha)
    } else {
        Err(ConfigError::Alpha(alpha))
    }
}

fn validate_finite(key: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NotFinite { key, value })
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/choreo/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("choreo").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parses_overrides() {
        let c = AppConfig::parse(
            "# comment\n\
             smoothing_alpha = 0.25\n\
             fade_out_ms = 120\n\
             fade_in_ms = \"800\"\n\
             scroll_threshold = 40.5\n\
             search_debounce_ms = -5\n\
             frame_rate_hz = 30\n\
             quit = Ctrl+x, Q\n",
        );
        assert_eq!(c.choreo.smoothing_alpha, 0.25);
        assert_eq!(c.choreo.fade_out, Duration::from_millis(120));
        assert_eq!(c.choreo.fade_in, Duration::from_millis(800));
        assert_eq!(c.choreo.scroll_threshold, 40.5);
        assert_eq!(c.choreo.search_debounce, Duration::ZERO);
        assert_eq!(c.frame_rate_hz, 30);
        assert_eq!(
            c.match_key(key(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(
            c.match_key(key(KeyCode::Char('Q'), KeyModifiers::NONE)),
            Some(Action::Quit)
        );
        assert_eq!(c.match_key(key(KeyCode::Char('q'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let c = AppConfig::parse(
            "smoothing_alpha = 1.5\n\
             scroll_threshold = nan\n\
             frame_rate_hz = 0\n\
             px_per_row = -2\n\
             fade_in_ms = soon\n\
             bogus = 1\n",
        );
        let d = AppConfig::default();
        assert_eq!(c.choreo, d.choreo);
        assert_eq!(c.frame_rate_hz, d.frame_rate_hz);
        assert_eq!(c.px_per_row, d.px_per_row);
    }

    #[test]
    fn apply_reports_errors() {
        let mut c = AppConfig::default();
        assert_eq!(c.apply("smoothing_alpha", "0"), Err(ConfigError::Alpha(0.0)));
        assert_eq!(c.apply("frame_rate_hz", "0"), Err(ConfigError::Zero("frame_rate_hz")));
        assert!(matches!(c.apply("fade_out_ms", "x"), Err(ConfigError::Parse { .. })));
        assert_eq!(
            c.apply("nope", "a"),
            Err(ConfigError::UnknownAction("nope".into()))
        );
        assert_eq!(
            c.apply("quit", "Hyper+q"),
            Err(ConfigError::EmptyBinding("Hyper+q".into()))
        );
    }

    #[test]
    fn serialised_config_parses_back() {
        let mut original = AppConfig::default();
        original.choreo.smoothing_alpha = 0.3;
        original.frame_rate_hz = 24;
        let parsed = AppConfig::parse(&original.serialise());
        assert_eq!(parsed.choreo, original.choreo);
        assert_eq!(parsed.frame_rate_hz, 24);
        assert_eq!(parsed.bindings, original.bindings);
    }

    #[test]
    fn status_hint_uses_first_binding() {
        let hint = AppConfig::default().status_bar_hint();
        assert!(hint.starts_with("↑/↓: scroll"));
        assert!(hint.contains("/: search"));
    }
}
