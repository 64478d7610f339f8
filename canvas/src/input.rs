//! Input model: pointer buttons, keys, and the gesture state machine.
//!
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up. Each active variant owns the controller for that gesture,
//! which captured everything it needs at press time (object id, start
//! transform, pivot or center). A "suspend point" is simply the wait for the
//! next pointer event; nothing blocks.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::drag::DragGesture;
use crate::object::{ObjectId, ObjectKind};
use crate::resize::ResizeGesture;
use crate::rotate::RotateGesture;

/// Pointer button identifier. Touch and pen contacts report `Primary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape" || self.0 == "Esc"
    }

    /// Enter or Space: activates a focused control.
    #[must_use]
    pub fn is_activation(&self) -> bool {
        matches!(self.0.as_str(), "Enter" | " " | "Spacebar")
    }
}

/// The gesture currently in progress.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Moving an object by its body or frame.
    Dragging(DragGesture),
    /// Scaling an object by its corner handle.
    Resizing(ResizeGesture),
    /// Rotating an object by its knob.
    Rotating(RotateGesture),
}

impl InputState {
    /// Whether any gesture is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// The kind and id of the object the active gesture targets.
    #[must_use]
    pub fn target(&self) -> Option<(ObjectKind, ObjectId)> {
        match self {
            Self::Idle => None,
            Self::Dragging(g) => Some((g.kind, g.id)),
            Self::Resizing(g) => Some((g.kind, g.id)),
            Self::Rotating(g) => Some((g.kind, g.id)),
        }
    }
}
