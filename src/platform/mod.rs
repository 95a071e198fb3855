//! Desktop side effects behind narrow traits
//!
//! Handlers in the dispatcher only talk to these traits, so the same
//! dispatcher drives a real desktop, a dry run, or a test double.

pub mod clipboard;
pub mod recording;
#[cfg(windows)]
pub mod windows;
#[cfg(not(windows))]
pub mod xdotool;

use crate::core::error::Result;
use crate::desktop::keys::KeyCombo;
use serde::Serialize;
use std::process::{Child, ExitStatus};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub use recording::{InputEvent, RecordingDesktop, StaticNode, StaticTree};

/// Screen coordinate in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Screen rectangle in pixels (left, top, right, bottom)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn center(&self) -> Point {
        Point {
            x: (self.left + self.right) / 2,
            y: (self.top + self.bottom) / 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }
}

/// Control categories the locator distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Button,
    MenuItem,
    Text,
    TabItem,
    Hyperlink,
    Window,
    Pane,
    Edit,
    Other,
}

impl ControlKind {
    /// Categories a user would plausibly ask to click
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            ControlKind::Button
                | ControlKind::MenuItem
                | ControlKind::Text
                | ControlKind::TabItem
                | ControlKind::Hyperlink
        )
    }
}

/// Keyboard and pointer injection
pub trait InputDriver: Send + Sync {
    /// Press all keys of the combination together, then release
    fn press_combo(&self, combo: &KeyCombo) -> Result<()>;

    /// Type a single character
    fn type_char(&self, c: char) -> Result<()>;

    /// Move the pointer to `to`, animated over `duration`
    fn move_pointer(&self, to: Point, duration: Duration) -> Result<()>;

    /// Primary-button click at the current pointer position
    fn click(&self) -> Result<()>;
}

/// Plain-text clipboard writes
pub trait TextClipboard: Send + Sync {
    fn set_text(&self, text: &str) -> Result<()>;
}

/// Fire-and-forget program launcher
pub trait AppLauncher: Send + Sync {
    fn launch(&self, target: &str) -> Result<()>;
}

/// One element of a live accessibility tree
///
/// Any accessor may fail if the element vanished since it was enumerated.
pub trait UiNode {
    fn name(&self) -> Result<String>;
    fn kind(&self) -> Result<ControlKind>;
    fn bounding_rect(&self) -> Result<Rect>;
    fn children(&self) -> Result<Vec<Box<dyn UiNode>>>;
}

/// Access to the foreground window's accessibility tree
pub trait UiTree: Send + Sync {
    /// Root of the current foreground window, if there is one
    fn foreground_window(&self) -> Result<Option<Box<dyn UiNode>>>;
}

/// Tree used where no accessibility API is wired up
#[derive(Debug, Default)]
pub struct NoUiTree;

impl UiTree for NoUiTree {
    fn foreground_window(&self) -> Result<Option<Box<dyn UiNode>>> {
        tracing::debug!("No accessibility backend on this platform");
        Ok(None)
    }
}

/// Everything the dispatcher needs from the desktop
pub struct Desktop {
    pub input: Box<dyn InputDriver>,
    /// `None` when no clipboard could be opened; typing falls back to keystrokes
    pub clipboard: Option<Box<dyn TextClipboard>>,
    pub launcher: Box<dyn AppLauncher>,
    pub ui: Box<dyn UiTree>,
}

impl Desktop {
    /// Backends for the platform this binary was built for
    pub fn native() -> Self {
        let clipboard = match clipboard::ArboardClipboard::new() {
            Ok(clipboard) => Some(Box::new(clipboard) as Box<dyn TextClipboard>),
            Err(e) => {
                tracing::warn!("Clipboard unavailable, typing key by key: {}", e);
                None
            }
        };

        #[cfg(windows)]
        {
            Self {
                input: Box::new(windows::UiaInput::new()),
                clipboard,
                launcher: Box::new(windows::StartLauncher),
                ui: Box::new(windows::UiaTree),
            }
        }

        #[cfg(not(windows))]
        {
            Self {
                input: Box::new(xdotool::XdotoolInput::new()),
                clipboard,
                launcher: Box::new(xdotool::ShellLauncher),
                ui: Box::new(NoUiTree),
            }
        }
    }

    /// Desktop that logs every action instead of performing it
    pub fn dry_run() -> Self {
        RecordingDesktop::new().into_desktop(Box::new(NoUiTree))
    }
}

/// Wait on a launched program from a detached thread so it never lingers
/// as a zombie once it exits
pub(crate) fn reap_in_background(mut child: Child) -> JoinHandle<Option<ExitStatus>> {
    thread::spawn(move || match child.wait() {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::debug!("Failed to wait on launched program: {}", e);
            None
        }
    })
}
