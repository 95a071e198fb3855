//! Find a clickable element in the foreground window by its visible name
//!
//! Two phases, fast path first:
//! 1. exact (case-insensitive) name match among shallow descendants;
//! 2. scored scan of interactive controls across the whole window tree.
//!
//! Only the foreground window is ever searched. Elements are read fresh on
//! every call because the tree can change between commands.

use crate::core::config::LocatorConfig;
use crate::platform::{ControlKind, Rect, UiNode, UiTree};
use serde::Serialize;
use std::collections::VecDeque;
use std::ops::ControlFlow;

/// Score for a candidate whose name contains the description tightly
pub const TIGHT_SUBSTRING_SCORE: f32 = 0.9;
/// Score for a candidate whose name contains the description among other text
pub const LOOSE_SUBSTRING_SCORE: f32 = 0.7;

/// Snapshot of a matched on-screen control
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiElement {
    pub name: String,
    pub kind: ControlKind,
    pub rect: Rect,
}

impl UiElement {
    fn read(node: &dyn UiNode) -> crate::core::error::Result<Self> {
        Ok(Self {
            name: node.name()?,
            kind: node.kind()?,
            rect: node.bounding_rect()?,
        })
    }
}

/// Best candidate and how confident the match is, in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub element: Option<UiElement>,
    pub confidence: f32,
}

impl MatchResult {
    pub fn none() -> Self {
        Self {
            element: None,
            confidence: 0.0,
        }
    }

    pub fn exact(element: UiElement) -> Self {
        Self {
            element: Some(element),
            confidence: 1.0,
        }
    }

    pub fn is_found(&self) -> bool {
        self.element.is_some()
    }
}

/// Locator over a UI tree, bounded by the locator config
pub struct UiTargetLocator<'a> {
    tree: &'a dyn UiTree,
    config: &'a LocatorConfig,
}

impl<'a> UiTargetLocator<'a> {
    pub fn new(tree: &'a dyn UiTree, config: &'a LocatorConfig) -> Self {
        Self { tree, config }
    }

    /// Locate the element best matching `description`
    ///
    /// An empty description is a defined no-op and never touches the tree.
    pub fn locate(&self, description: &str) -> MatchResult {
        let target = description.trim().to_lowercase();
        if target.is_empty() {
            return MatchResult::none();
        }

        let window = match self.tree.foreground_window() {
            Ok(Some(window)) => window,
            Ok(None) => {
                tracing::warn!("No foreground window to search for '{}'", description);
                return MatchResult::none();
            }
            Err(e) => {
                tracing::warn!("Could not read foreground window: {}", e);
                return MatchResult::none();
            }
        };

        if let Some(element) = self.direct_match(window.as_ref(), &target) {
            tracing::debug!("Direct match for '{}': {:?}", description, element.name);
            return MatchResult::exact(element);
        }

        tracing::debug!("No direct match for '{}', scanning full tree", description);
        let result = self.fuzzy_scan(window.as_ref(), &target);
        match &result.element {
            Some(element) => tracing::debug!(
                "Fuzzy match for '{}': '{}' ({:.2})",
                description,
                element.name,
                result.confidence
            ),
            None => tracing::debug!("Nothing in the window resembles '{}'", description),
        }
        result
    }

    fn direct_match(&self, root: &dyn UiNode, target: &str) -> Option<UiElement> {
        let mut found = None;
        walk(root, self.config.direct_depth, self.config.max_nodes, |node| {
            let Ok(name) = node.name() else {
                return ControlFlow::Continue(());
            };
            if name.is_empty() || name.to_lowercase() != target {
                return ControlFlow::Continue(());
            }
            match UiElement::read(node) {
                Ok(element) => {
                    found = Some(element);
                    ControlFlow::Break(())
                }
                Err(_) => ControlFlow::Continue(()),
            }
        });
        found
    }

    fn fuzzy_scan(&self, root: &dyn UiNode, target: &str) -> MatchResult {
        let mut best = MatchResult::none();
        let floor = self.config.fuzzy_floor;

        walk(root, self.config.max_depth, self.config.max_nodes, |node| {
            match node.kind() {
                Ok(kind) if kind.is_interactive() => {}
                _ => return ControlFlow::Continue(()),
            }
            let name = match node.name() {
                Ok(name) if !name.trim().is_empty() => name,
                _ => return ControlFlow::Continue(()),
            };
            let Some(score) = score_candidate(target, &name.to_lowercase(), floor) else {
                return ControlFlow::Continue(());
            };
            // Ties keep the first-seen candidate.
            if score <= best.confidence {
                return ControlFlow::Continue(());
            }
            let Ok(element) = UiElement::read(node) else {
                return ControlFlow::Continue(());
            };

            best = MatchResult {
                element: Some(element),
                confidence: score,
            };
            if score >= 1.0 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        best
    }
}

/// Breadth-first walk of the descendants of `root`
///
/// Depth 1 is the root's direct children. Nodes whose children cannot be
/// enumerated are visited but not expanded.
fn walk<F>(root: &dyn UiNode, max_depth: usize, max_nodes: usize, mut visit: F)
where
    F: FnMut(&dyn UiNode) -> ControlFlow<()>,
{
    if max_depth == 0 {
        return;
    }

    let mut queue: VecDeque<(Box<dyn UiNode>, usize)> = match root.children() {
        Ok(children) => children.into_iter().map(|c| (c, 1)).collect(),
        Err(e) => {
            tracing::debug!("Window children unavailable: {}", e);
            return;
        }
    };

    let mut visited = 0;
    while let Some((node, depth)) = queue.pop_front() {
        visited += 1;
        if visited > max_nodes {
            tracing::debug!("Scan stopped after {} nodes", max_nodes);
            return;
        }

        if visit(node.as_ref()).is_break() {
            return;
        }

        if depth < max_depth {
            if let Ok(children) = node.children() {
                queue.extend(children.into_iter().map(|c| (c, depth + 1)));
            }
        }
    }
}

/// Score a lower-cased candidate name against a lower-cased description
///
/// Exact → 1.0; containment → 0.9 when the name is at most twice as long as
/// the description, else 0.7; otherwise the similarity ratio when it exceeds
/// `floor`.
pub fn score_candidate(target: &str, name: &str, floor: f32) -> Option<f32> {
    if target.is_empty() || name.is_empty() {
        return None;
    }
    if name == target {
        return Some(1.0);
    }
    if name.contains(target) {
        let name_len = name.chars().count();
        let target_len = target.chars().count();
        return Some(if name_len <= target_len * 2 {
            TIGHT_SUBSTRING_SCORE
        } else {
            LOOSE_SUBSTRING_SCORE
        });
    }
    let ratio = similarity(target, name);
    (ratio > floor).then_some(ratio)
}

/// Longest-common-subsequence ratio: 2·LCS / (|a| + |b|), in [0, 1]
pub fn similarity(a: &str, b: &str) -> f32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in &a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (2 * prev[b.len()]) as f32 / total as f32
}
