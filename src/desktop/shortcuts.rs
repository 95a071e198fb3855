//! Keyboard-shortcut equivalents for common click targets
//!
//! A `click` on a phrase listed here is replaced by the keypress, which is
//! faster and more reliable than searching the UI tree. Phrases are matched
//! after trimming and lower-casing.

/// (phrase, key combination)
const SHORTCUTS: &[(&str, &str)] = &[
    // Spanish
    ("guardar", "ctrl+s"),
    ("guardar como", "ctrl+shift+s"),
    ("abrir", "ctrl+o"),
    ("nuevo", "ctrl+n"),
    ("imprimir", "ctrl+p"),
    ("copiar", "ctrl+c"),
    ("cortar", "ctrl+x"),
    ("pegar", "ctrl+v"),
    ("deshacer", "ctrl+z"),
    ("rehacer", "ctrl+y"),
    ("seleccionar todo", "ctrl+a"),
    ("buscar", "ctrl+f"),
    ("reemplazar", "ctrl+h"),
    ("nueva pestaña", "ctrl+t"),
    ("cerrar pestaña", "ctrl+w"),
    ("actualizar", "f5"),
    ("recargar", "f5"),
    ("negrita", "ctrl+b"),
    ("cursiva", "ctrl+i"),
    ("subrayado", "ctrl+u"),
    // English
    ("save", "ctrl+s"),
    ("save as", "ctrl+shift+s"),
    ("open", "ctrl+o"),
    ("new", "ctrl+n"),
    ("print", "ctrl+p"),
    ("copy", "ctrl+c"),
    ("cut", "ctrl+x"),
    ("paste", "ctrl+v"),
    ("undo", "ctrl+z"),
    ("redo", "ctrl+y"),
    ("select all", "ctrl+a"),
    ("find", "ctrl+f"),
    ("replace", "ctrl+h"),
    ("new tab", "ctrl+t"),
    ("close tab", "ctrl+w"),
    ("refresh", "f5"),
    ("reload", "f5"),
    ("bold", "ctrl+b"),
    ("italic", "ctrl+i"),
    ("underline", "ctrl+u"),
];

/// Static phrase → shortcut table, read-only after construction
#[derive(Debug, Clone, Copy)]
pub struct ShortcutTable {
    entries: &'static [(&'static str, &'static str)],
}

impl Default for ShortcutTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutTable {
    pub fn new() -> Self {
        Self { entries: SHORTCUTS }
    }

    /// Shortcut for a target phrase (case-insensitive, trimmed)
    pub fn lookup(&self, phrase: &str) -> Option<&'static str> {
        let phrase = phrase.trim().to_lowercase();
        if phrase.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(name, _)| *name == phrase)
            .map(|(_, combo)| *combo)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
