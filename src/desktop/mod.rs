//! Desktop knowledge: shortcut and program tables, key combos, UI targeting

pub mod apps;
pub mod keys;
pub mod locator;
pub mod shortcuts;

pub use keys::KeyCombo;
pub use locator::{MatchResult, UiElement, UiTargetLocator};
pub use shortcuts::ShortcutTable;
