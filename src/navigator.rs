//! Keyboard Navigator
//!
//! Turns a key press into a focus move plus at most one engine command. The
//! planning step is pure; the picker carries out the command.

use crate::tree::Node;
use crate::visible::clamp_focus;
use std::fmt;
use std::str::FromStr;

/// Keys the picker understands, plus everything else
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
    Char(char),
    Other(String),
}

impl FromStr for Key {
    type Err = std::convert::Infallible;

    /// Parses browser-style key names (`ArrowUp`, `Enter`, ` `) and short
    /// forms (`up`, `space`, `esc`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == " " {
            return Ok(Key::Space);
        }
        let key = match s.trim().to_ascii_lowercase().as_str() {
            "up" | "arrowup" => Key::Up,
            "down" | "arrowdown" => Key::Down,
            "left" | "arrowleft" => Key::Left,
            "right" | "arrowright" => Key::Right,
            "space" | "spacebar" => Key::Space,
            "enter" | "return" => Key::Enter,
            "escape" | "esc" => Key::Escape,
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other(s.to_string()),
                }
            }
        };
        Ok(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Up => write!(f, "ArrowUp"),
            Key::Down => write!(f, "ArrowDown"),
            Key::Left => write!(f, "ArrowLeft"),
            Key::Right => write!(f, "ArrowRight"),
            Key::Space => write!(f, "Space"),
            Key::Enter => write!(f, "Enter"),
            Key::Escape => write!(f, "Escape"),
            Key::Char(c) => write!(f, "{}", c),
            Key::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Whether the host should run its default behavior for the key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Consumed; default behavior (e.g. scrolling) suppressed
    Handled,
    /// Not ours
    PassThrough,
}

/// Engine work requested by a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavCommand {
    None,
    Expand(Node),
    Collapse(Node),
    Toggle { node: Node, target: bool },
    ClearQuery,
}

/// Result of planning one key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavPlan {
    pub focus: usize,
    pub command: NavCommand,
    pub outcome: KeyOutcome,
}

/// Plan the effect of `key`.
///
/// `is_expanded` reports Expanded Set membership; `display_checked` reports
/// the node's current derived display state (leaf membership, or all children
/// checked for a non-leaf).
pub fn plan<E, C>(
    key: &Key,
    focus: usize,
    visible: &[Node],
    is_expanded: E,
    display_checked: C,
) -> NavPlan
where
    E: Fn(&str) -> bool,
    C: Fn(&Node) -> bool,
{
    let len = visible.len();
    let focus = clamp_focus(focus, len);
    let current = visible.get(focus);

    let handled = |focus: usize, command: NavCommand| NavPlan {
        focus,
        command,
        outcome: KeyOutcome::Handled,
    };

    match key {
        Key::Down => handled(clamp_focus(focus + 1, len), NavCommand::None),
        Key::Up => handled(focus.saturating_sub(1), NavCommand::None),
        Key::Right => match current {
            Some(node) if node.has_children && !is_expanded(&node.id) => {
                handled(focus, NavCommand::Expand(node.clone()))
            }
            _ => handled(focus, NavCommand::None),
        },
        Key::Left => match current {
            Some(node) if node.has_children && is_expanded(&node.id) => {
                handled(focus, NavCommand::Collapse(node.clone()))
            }
            _ => handled(focus, NavCommand::None),
        },
        Key::Space | Key::Enter => match current {
            Some(node) => handled(
                focus,
                NavCommand::Toggle {
                    node: node.clone(),
                    target: !display_checked(node),
                },
            ),
            None => handled(focus, NavCommand::None),
        },
        Key::Escape => handled(0, NavCommand::ClearQuery),
        Key::Char(_) | Key::Other(_) => NavPlan {
            focus,
            command: NavCommand::None,
            outcome: KeyOutcome::PassThrough,
        },
    }
}
