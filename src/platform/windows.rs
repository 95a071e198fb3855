//! Windows backends: UI Automation tree, keyboard/mouse injection, launcher

use crate::core::error::{AgentError, Result};
use crate::desktop::keys::KeyCombo;
use crate::platform::{
    reap_in_background, AppLauncher, ControlKind, InputDriver, Point, Rect, UiNode, UiTree,
};
use std::process::Command;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;
use uiautomation::controls::ControlType;
use uiautomation::inputs::{Keyboard, Mouse};
use uiautomation::types::Point as UiaPoint;
use uiautomation::{UIAutomation, UIElement, UITreeWalker};

fn uia_err(e: uiautomation::Error) -> AgentError {
    AgentError::Input(e.to_string())
}

/// Accessibility tree of the window owning keyboard focus
pub struct UiaTree;

impl UiTree for UiaTree {
    fn foreground_window(&self) -> Result<Option<Box<dyn UiNode>>> {
        let automation = UIAutomation::new().map_err(uia_err)?;
        let walker = automation.get_control_view_walker().map_err(uia_err)?;
        let root = automation.get_root_element().map_err(uia_err)?;

        let mut element = match automation.get_focused_element() {
            Ok(element) => element,
            Err(e) => {
                tracing::debug!("No focused element: {}", e);
                return Ok(None);
            }
        };

        // Climb to the top-level window: the last ancestor below the desktop root.
        loop {
            let parent = match walker.get_parent(&element) {
                Ok(parent) => parent,
                Err(_) => break,
            };
            if automation.compare_elements(&parent, &root).unwrap_or(true) {
                break;
            }
            element = parent;
        }

        Ok(Some(Box::new(UiaNode {
            element,
            walker: Rc::new(walker),
        })))
    }
}

struct UiaNode {
    element: UIElement,
    walker: Rc<UITreeWalker>,
}

impl UiNode for UiaNode {
    fn name(&self) -> Result<String> {
        self.element.get_name().map_err(uia_err)
    }

    fn kind(&self) -> Result<ControlKind> {
        let kind = match self.element.get_control_type().map_err(uia_err)? {
            ControlType::Button => ControlKind::Button,
            ControlType::MenuItem => ControlKind::MenuItem,
            ControlType::Text => ControlKind::Text,
            ControlType::TabItem => ControlKind::TabItem,
            ControlType::Hyperlink => ControlKind::Hyperlink,
            ControlType::Window => ControlKind::Window,
            ControlType::Pane => ControlKind::Pane,
            ControlType::Edit => ControlKind::Edit,
            _ => ControlKind::Other,
        };
        Ok(kind)
    }

    fn bounding_rect(&self) -> Result<Rect> {
        let rect = self.element.get_bounding_rectangle().map_err(uia_err)?;
        Ok(Rect::new(
            rect.get_left(),
            rect.get_top(),
            rect.get_right(),
            rect.get_bottom(),
        ))
    }

    fn children(&self) -> Result<Vec<Box<dyn UiNode>>> {
        let mut children: Vec<Box<dyn UiNode>> = Vec::new();
        let mut next = self.walker.get_first_child(&self.element).ok();
        while let Some(child) = next {
            next = self.walker.get_next_sibling(&child).ok();
            children.push(Box::new(UiaNode {
                element: child,
                walker: self.walker.clone(),
            }));
        }
        Ok(children)
    }
}

/// Keyboard and mouse through `SendInput`
pub struct UiaInput {
    last_pointer: Mutex<Option<Point>>,
}

impl Default for UiaInput {
    fn default() -> Self {
        Self::new()
    }
}

impl UiaInput {
    pub fn new() -> Self {
        Self {
            last_pointer: Mutex::new(None),
        }
    }
}

/// Send-keys token for a canonical key name
fn key_token(key: &str) -> String {
    match key {
        "ctrl" => "{ctrl}".into(),
        "alt" => "{alt}".into(),
        "shift" => "{shift}".into(),
        "win" => "{win}".into(),
        "backspace" => "{back}".into(),
        "printscreen" => "{snapshot}".into(),
        "pageup" => "{prior}".into(),
        "pagedown" => "{next}".into(),
        single if single.chars().count() == 1 => single.into(),
        named => format!("{{{}}}", named),
    }
}

/// Nested hold syntax: `{ctrl}({shift}(s))`
fn send_keys_spec(combo: &KeyCombo) -> String {
    let main: String = combo.main_keys().map(key_token).collect();
    combo
        .modifiers()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .fold(main, |inner, modifier| {
            format!("{}({})", key_token(modifier), inner)
        })
}

impl InputDriver for UiaInput {
    fn press_combo(&self, combo: &KeyCombo) -> Result<()> {
        Keyboard::new()
            .send_keys(&send_keys_spec(combo))
            .map_err(uia_err)
    }

    fn type_char(&self, c: char) -> Result<()> {
        Keyboard::new().send_text(&c.to_string()).map_err(uia_err)
    }

    fn move_pointer(&self, to: Point, duration: Duration) -> Result<()> {
        Mouse::new()
            .move_time(duration.as_millis() as u64)
            .move_to(&UiaPoint::new(to.x, to.y))
            .map_err(uia_err)?;
        if let Ok(mut last) = self.last_pointer.lock() {
            *last = Some(to);
        }
        Ok(())
    }

    fn click(&self) -> Result<()> {
        let target = self
            .last_pointer
            .lock()
            .ok()
            .and_then(|last| *last)
            .ok_or_else(|| AgentError::Input("click before any pointer movement".into()))?;
        Mouse::new()
            .click(&UiaPoint::new(target.x, target.y))
            .map_err(uia_err)
    }
}

/// Launches through the shell's `start`, without waiting
pub struct StartLauncher;

impl AppLauncher for StartLauncher {
    fn launch(&self, target: &str) -> Result<()> {
        Command::new("cmd")
            .args(["/C", "start", "", target])
            .spawn()
            .map(|child| {
                reap_in_background(child);
            })
            .map_err(|e| AgentError::Launch {
                target: target.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_keys_spec_nests_modifiers() {
        let combo = KeyCombo::parse("ctrl+shift+s").unwrap();
        assert_eq!(send_keys_spec(&combo), "{ctrl}({shift}(s))");
    }

    #[test]
    fn test_send_keys_spec_named_key() {
        let combo = KeyCombo::parse("alt+f4").unwrap();
        assert_eq!(send_keys_spec(&combo), "{alt}({f4})");
    }
}
