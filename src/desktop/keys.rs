//! `+`-delimited key combinations ("ctrl+s", "alt+f4", "enter")

use std::fmt;

/// Modifier names in canonical form
pub const MODIFIERS: [&str; 4] = ["ctrl", "alt", "shift", "win"];

/// Ordered, de-duplicated set of canonical key names pressed together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    keys: Vec<String>,
}

impl KeyCombo {
    /// Parse a combination; `None` when no key name survives trimming
    pub fn parse(spec: &str) -> Option<Self> {
        let mut keys: Vec<String> = Vec::new();
        for part in spec.split('+') {
            let part = part.trim().to_lowercase();
            if part.is_empty() {
                continue;
            }
            let key = canonical(&part).to_string();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        if keys.is_empty() {
            None
        } else {
            Some(Self { keys })
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Keys that are held while the rest are tapped
    pub fn modifiers(&self) -> impl Iterator<Item = &str> {
        self.keys
            .iter()
            .map(String::as_str)
            .filter(|k| MODIFIERS.contains(k))
    }

    /// Keys that are not modifiers
    pub fn main_keys(&self) -> impl Iterator<Item = &str> {
        self.keys
            .iter()
            .map(String::as_str)
            .filter(|k| !MODIFIERS.contains(k))
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keys.join("+"))
    }
}

fn canonical(name: &str) -> &str {
    match name {
        "control" | "ctl" => "ctrl",
        "option" | "menu" => "alt",
        "windows" | "super" | "meta" | "cmd" | "command" | "logo" => "win",
        "return" => "enter",
        "escape" => "esc",
        "del" | "supr" => "delete",
        "bksp" => "backspace",
        "pgup" | "page_up" | "prior" => "pageup",
        "pgdn" | "page_down" | "next" => "pagedown",
        "print" | "prtsc" | "print_screen" => "printscreen",
        "arrowup" => "up",
        "arrowdown" => "down",
        "arrowleft" => "left",
        "arrowright" => "right",
        other => other,
    }
}
