//! Dry-run desktop and in-memory UI tree
//!
//! `RecordingDesktop` logs each side effect into a shared event list instead
//! of touching the real desktop. It backs the `--dry-run` flag and the test
//! suites. `StaticTree` is a fixed accessibility tree for the same purposes.

use crate::core::error::{AgentError, Result};
use crate::desktop::keys::KeyCombo;
use crate::platform::{
    AppLauncher, ControlKind, Desktop, InputDriver, Point, Rect, TextClipboard, UiNode, UiTree,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A side effect that would have been performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Combo(String),
    Char(char),
    MovePointer(Point),
    Click,
    Clipboard(String),
    Launch(String),
}

type EventLog = Arc<Mutex<Vec<InputEvent>>>;

fn record(log: &EventLog, event: InputEvent) {
    tracing::info!("[dry-run] {:?}", event);
    log.lock().unwrap_or_else(|e| e.into_inner()).push(event);
}

/// Shared handle onto a recorded session
#[derive(Debug, Clone)]
pub struct RecordingDesktop {
    log: EventLog,
    clipboard: bool,
    failing_clipboard: bool,
}

impl Default for RecordingDesktop {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingDesktop {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            clipboard: true,
            failing_clipboard: false,
        }
    }

    /// Simulate a desktop without clipboard access
    pub fn without_clipboard(mut self) -> Self {
        self.clipboard = false;
        self
    }

    /// Simulate a clipboard that refuses writes
    pub fn with_failing_clipboard(mut self) -> Self {
        self.failing_clipboard = true;
        self
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<InputEvent> {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Characters typed key by key, concatenated
    pub fn typed_text(&self) -> String {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                InputEvent::Char(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// Key combinations pressed, in order
    pub fn combos(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                InputEvent::Combo(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// Build a desktop whose side effects land in this recording
    pub fn into_desktop(self, ui: Box<dyn UiTree>) -> Desktop {
        let clipboard: Option<Box<dyn TextClipboard>> = if self.clipboard {
            Some(Box::new(RecordingClipboard {
                log: self.log.clone(),
                fail: self.failing_clipboard,
            }))
        } else {
            None
        };

        Desktop {
            input: Box::new(RecordingInput {
                log: self.log.clone(),
            }),
            clipboard,
            launcher: Box::new(RecordingLauncher { log: self.log }),
            ui,
        }
    }
}

struct RecordingInput {
    log: EventLog,
}

impl InputDriver for RecordingInput {
    fn press_combo(&self, combo: &KeyCombo) -> Result<()> {
        record(&self.log, InputEvent::Combo(combo.to_string()));
        Ok(())
    }

    fn type_char(&self, c: char) -> Result<()> {
        record(&self.log, InputEvent::Char(c));
        Ok(())
    }

    fn move_pointer(&self, to: Point, _duration: Duration) -> Result<()> {
        record(&self.log, InputEvent::MovePointer(to));
        Ok(())
    }

    fn click(&self) -> Result<()> {
        record(&self.log, InputEvent::Click);
        Ok(())
    }
}

struct RecordingClipboard {
    log: EventLog,
    fail: bool,
}

impl TextClipboard for RecordingClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        if self.fail {
            return Err(AgentError::Clipboard("clipboard is locked".into()));
        }
        record(&self.log, InputEvent::Clipboard(text.to_string()));
        Ok(())
    }
}

struct RecordingLauncher {
    log: EventLog,
}

impl AppLauncher for RecordingLauncher {
    fn launch(&self, target: &str) -> Result<()> {
        record(&self.log, InputEvent::Launch(target.to_string()));
        Ok(())
    }
}

/// Node of an in-memory accessibility tree
#[derive(Debug, Clone)]
pub struct StaticNode {
    pub name: String,
    pub kind: ControlKind,
    pub rect: Rect,
    pub children: Vec<Arc<StaticNode>>,
    /// Accessors fail, as for an element destroyed mid-scan
    pub stale: bool,
}

impl StaticNode {
    pub fn new(name: impl Into<String>, kind: ControlKind) -> Self {
        Self {
            name: name.into(),
            kind,
            rect: Rect::default(),
            children: Vec::new(),
            stale: false,
        }
    }

    pub fn window(name: impl Into<String>) -> Self {
        Self::new(name, ControlKind::Window).with_rect(Rect::new(0, 0, 1920, 1080))
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn with_child(mut self, child: StaticNode) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    pub fn stale(mut self) -> Self {
        self.stale = true;
        self
    }
}

/// Fixed accessibility tree with a visit counter
#[derive(Debug, Clone, Default)]
pub struct StaticTree {
    window: Option<Arc<StaticNode>>,
    visits: Arc<AtomicUsize>,
}

impl StaticTree {
    pub fn new(window: StaticNode) -> Self {
        Self {
            window: Some(Arc::new(window)),
            visits: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Tree with no foreground window
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of child enumerations performed so far
    pub fn visits(&self) -> usize {
        self.visits.load(Ordering::SeqCst)
    }
}

impl UiTree for StaticTree {
    fn foreground_window(&self) -> Result<Option<Box<dyn UiNode>>> {
        Ok(self.window.as_ref().map(|node| {
            Box::new(StaticHandle {
                node: node.clone(),
                visits: self.visits.clone(),
            }) as Box<dyn UiNode>
        }))
    }
}

struct StaticHandle {
    node: Arc<StaticNode>,
    visits: Arc<AtomicUsize>,
}

impl StaticHandle {
    fn check(&self) -> Result<()> {
        if self.node.stale {
            Err(AgentError::Internal(format!(
                "element '{}' is no longer available",
                self.node.name
            )))
        } else {
            Ok(())
        }
    }
}

impl UiNode for StaticHandle {
    fn name(&self) -> Result<String> {
        self.check()?;
        Ok(self.node.name.clone())
    }

    fn kind(&self) -> Result<ControlKind> {
        self.check()?;
        Ok(self.node.kind)
    }

    fn bounding_rect(&self) -> Result<Rect> {
        self.check()?;
        Ok(self.node.rect)
    }

    fn children(&self) -> Result<Vec<Box<dyn UiNode>>> {
        self.check()?;
        self.visits.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .node
            .children
            .iter()
            .map(|child| {
                Box::new(StaticHandle {
                    node: child.clone(),
                    visits: self.visits.clone(),
                }) as Box<dyn UiNode>
            })
            .collect())
    }
}
