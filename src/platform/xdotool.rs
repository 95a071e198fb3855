//! Input injection and program launch on X11 desktops
//!
//! Drives the `xdotool` binary; pointer motion is interpolated with an
//! ease-out curve so the movement is visible to the user.

use crate::core::error::{AgentError, Result};
use crate::desktop::keys::KeyCombo;
use crate::platform::{reap_in_background, AppLauncher, InputDriver, Point};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

const MOVE_STEPS: u32 = 15;

pub struct XdotoolInput {
    binary: String,
}

impl Default for XdotoolInput {
    fn default() -> Self {
        Self::new()
    }
}

impl XdotoolInput {
    pub fn new() -> Self {
        Self {
            binary: "xdotool".into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|e| AgentError::Input(format!("{} {:?}: {}", self.binary, args, e)))?;

        if !output.status.success() {
            return Err(AgentError::Input(format!(
                "{} {:?} exited with {}: {}",
                self.binary,
                args,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn pointer_position(&self) -> Result<Point> {
        let out = self.run(&["getmouselocation", "--shell"])?;
        let mut point = Point { x: 0, y: 0 };
        for line in out.lines() {
            if let Some(x) = line.strip_prefix("X=") {
                point.x = x.trim().parse().unwrap_or(0);
            } else if let Some(y) = line.strip_prefix("Y=") {
                point.y = y.trim().parse().unwrap_or(0);
            }
        }
        Ok(point)
    }
}

/// xdotool keysym for a canonical key name
fn keysym(key: &str) -> String {
    match key {
        "ctrl" => "ctrl".into(),
        "alt" => "alt".into(),
        "shift" => "shift".into(),
        "win" => "super".into(),
        "enter" => "Return".into(),
        "esc" => "Escape".into(),
        "tab" => "Tab".into(),
        "space" => "space".into(),
        "backspace" => "BackSpace".into(),
        "delete" => "Delete".into(),
        "insert" => "Insert".into(),
        "home" => "Home".into(),
        "end" => "End".into(),
        "pageup" => "Prior".into(),
        "pagedown" => "Next".into(),
        "up" => "Up".into(),
        "down" => "Down".into(),
        "left" => "Left".into(),
        "right" => "Right".into(),
        "printscreen" => "Print".into(),
        f if f.len() > 1 && f.starts_with('f') && f[1..].chars().all(|c| c.is_ascii_digit()) => {
            f.to_uppercase()
        }
        other => other.into(),
    }
}

impl InputDriver for XdotoolInput {
    fn press_combo(&self, combo: &KeyCombo) -> Result<()> {
        let spec = combo
            .keys()
            .iter()
            .map(|k| keysym(k))
            .collect::<Vec<_>>()
            .join("+");
        self.run(&["key", "--clearmodifiers", &spec])?;
        Ok(())
    }

    fn type_char(&self, c: char) -> Result<()> {
        let text = c.to_string();
        self.run(&["type", "--delay", "10", "--", &text])?;
        Ok(())
    }

    fn move_pointer(&self, to: Point, duration: Duration) -> Result<()> {
        let start = self.pointer_position()?;
        let step_delay = duration / MOVE_STEPS;

        for i in 1..=MOVE_STEPS {
            let t = i as f64 / MOVE_STEPS as f64;
            let eased = 1.0 - (1.0 - t).powi(3);
            let x = start.x + ((to.x - start.x) as f64 * eased) as i32;
            let y = start.y + ((to.y - start.y) as f64 * eased) as i32;
            self.run(&["mousemove", &x.to_string(), &y.to_string()])?;
            thread::sleep(step_delay);
        }
        Ok(())
    }

    fn click(&self) -> Result<()> {
        self.run(&["click", "1"])?;
        Ok(())
    }
}

/// Launches through `sh -c`; the child is reaped off-thread
pub struct ShellLauncher;

impl AppLauncher for ShellLauncher {
    fn launch(&self, target: &str) -> Result<()> {
        Command::new("sh")
            .arg("-c")
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
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
    fn test_keysym_mapping() {
        assert_eq!(keysym("win"), "super");
        assert_eq!(keysym("enter"), "Return");
        assert_eq!(keysym("f5"), "F5");
        assert_eq!(keysym("f"), "f");
        assert_eq!(keysym("s"), "s");
    }
}
