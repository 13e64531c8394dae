//! Typed UI events.

use bitflags::bitflags;
use strata_core::math::Vec2;

use crate::component::ComponentId;
use crate::frame::FrameId;

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Phase of a mouse click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickAction {
    Press,
    Release,
    /// Press and release over the same component.
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Press,
    Repeat,
    Release,
}

/// Platform independent key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u32);

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const NONE  = 0;
        const SHIFT = 1 << 0;
        const CTRL  = 1 << 1;
        const ALT   = 1 << 2;
        const SUPER = 1 << 3;
    }
}

/// Event payload. The variant determines the [`EventKind`] used to select
/// listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    MouseClick {
        action: ClickAction,
        button: MouseButton,
        /// Cursor position in frame coordinates.
        position: Vec2,
    },
    CursorEnter {
        entered: bool,
        position: Vec2,
    },
    MouseDrag {
        /// Cursor movement since the previous drag event.
        delta: Vec2,
        position: Vec2,
    },
    Scroll {
        x_offset: f32,
        y_offset: f32,
    },
    Key {
        key: KeyCode,
        action: KeyAction,
        modifiers: Modifiers,
    },
    Char {
        codepoint: char,
    },
    Focus {
        focused: bool,
    },
    CheckBoxChangeValue {
        old: bool,
        new: bool,
    },
    ScrollBarChangeValue {
        old: f32,
        new: f32,
    },
    WidgetClose,
    WidgetMinimize {
        minimized: bool,
    },
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::MouseClick { .. } => EventKind::MouseClick,
            EventPayload::CursorEnter { .. } => EventKind::CursorEnter,
            EventPayload::MouseDrag { .. } => EventKind::MouseDrag,
            EventPayload::Scroll { .. } => EventKind::Scroll,
            EventPayload::Key { .. } => EventKind::Key,
            EventPayload::Char { .. } => EventKind::Char,
            EventPayload::Focus { .. } => EventKind::Focus,
            EventPayload::CheckBoxChangeValue { .. } => EventKind::CheckBoxChangeValue,
            EventPayload::ScrollBarChangeValue { .. } => EventKind::ScrollBarChangeValue,
            EventPayload::WidgetClose => EventKind::WidgetClose,
            EventPayload::WidgetMinimize { .. } => EventKind::WidgetMinimize,
        }
    }
}

/// Key used by [`crate::listener::ListenerMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MouseClick,
    CursorEnter,
    MouseDrag,
    Scroll,
    Key,
    Char,
    Focus,
    CheckBoxChangeValue,
    ScrollBarChangeValue,
    WidgetClose,
    WidgetMinimize,
}

/// An event addressed to one component of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub target: ComponentId,
    pub frame: FrameId,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(target: ComponentId, frame: FrameId, payload: EventPayload) -> Self {
        Self {
            target,
            frame,
            payload,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    /// Same frame and payload, different target.
    pub fn retarget(&self, target: ComponentId) -> Self {
        Self {
            target,
            frame: self.frame,
            payload: self.payload.clone(),
        }
    }

    pub fn is_click(&self, button: MouseButton) -> bool {
        matches!(
            self.payload,
            EventPayload::MouseClick { action: ClickAction::Click, button: b, .. } if b == button
        )
    }
}
