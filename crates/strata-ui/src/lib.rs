//! Strata UI - layered frames and deferred event dispatch
//!
//! This crate provides the composition and event core of a retained-mode UI:
//! - A generational component tree with per-component listener maps
//! - Frames holding a fixed component layer, a fixed tooltip layer and a
//!   stack of user layers in between
//! - A FIFO event processor that delivers events to listeners once per tick
//! - Hit testing and draw ordering across layers
//! - An input router turning raw device input into targeted events
//! - Kind-keyed themes and the default check box, scroll bar and widget
//!   behaviours
//!
//! Rendering, layout and text shaping are left to the embedding application.
//!
//! ## Quick Start
//!
//! ```rust
//! use strata_ui::{EventKind, Listener, RawInput, Rect, UiContext, Vec2, MouseButton};
//!
//! let mut ui = UiContext::new();
//! let frame = ui.create_frame(Vec2::new(800.0, 600.0));
//! let root = ui.container(frame).unwrap();
//!
//! let check_box = ui.check_box("Enable", false, Rect::new(10.0, 10.0, 120.0, 20.0));
//! ui.add_child(root, check_box).unwrap();
//! ui.add_listener(
//!     check_box,
//!     EventKind::CheckBoxChangeValue,
//!     Listener::infallible(|event, _| println!("{:?}", event.payload)),
//! );
//!
//! // In the event loop:
//! ui.handle_input(frame, RawInput::CursorMoved(Vec2::new(20.0, 20.0)));
//! ui.handle_input(frame, RawInput::MouseButton { button: MouseButton::Left, pressed: true });
//! ui.handle_input(frame, RawInput::MouseButton { button: MouseButton::Left, pressed: false });
//! ui.tick(); // toggles the check box
//! ui.tick(); // delivers the change event
//! ```

pub mod component;
pub mod context;
pub mod draw_order;
pub mod error;
pub mod event;
pub mod frame;
pub mod input;
pub mod layer;
pub mod listener;
pub mod processor;
pub mod style;
pub mod theme;
pub mod widgets;

pub use component::{
    Capabilities, Component, ComponentId, ComponentKind, ComponentState, ComponentTree,
    ScrollBarState, WidgetState,
};
pub use context::UiContext;
pub use draw_order::DrawItem;
pub use error::{ListenerError, UiError};
pub use event::{
    ClickAction, Event, EventKind, EventPayload, KeyAction, KeyCode, Modifiers, MouseButton,
};
pub use frame::{Frame, FrameId, Frames};
pub use input::{InputRouter, RawInput};
pub use layer::{Layer, LayerId, LayerKind};
pub use listener::{Listener, ListenerMap, ListenerResult};
pub use processor::{DispatchStats, EventContext, EventProcessor, EventSender, ProcessorState};
pub use style::{Color, Style};
pub use theme::{ColorPalette, Theme, ThemeManager};

// Re-export common types from strata-core
pub use strata_core::config::Config;
pub use strata_core::geometry::Rect;
pub use strata_core::math::Vec2;
