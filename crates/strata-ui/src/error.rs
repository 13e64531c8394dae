//! Error types for the few caller-facing fallible operations.
//!
//! Most of the frame and listener API treats invalid arguments as silent
//! no-ops; these errors cover operations where the caller asked for something
//! that cannot be done and needs to know.

use crate::component::{ComponentId, ComponentKind};
use crate::frame::FrameId;
use crate::layer::LayerId;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UiError {
    #[error("component {0} does not exist")]
    UnknownComponent(ComponentId),

    #[error("layer {0} does not exist")]
    UnknownLayer(LayerId),

    #[error("frame {0} does not exist")]
    UnknownFrame(FrameId),

    #[error("layer {0} is a fixed frame layer and cannot be destroyed on its own")]
    FixedLayer(LayerId),

    #[error("adding {child} under {parent} would create a cycle")]
    HierarchyCycle {
        parent: ComponentId,
        child: ComponentId,
    },

    #[error("component {0} is a layer container and cannot be reparented")]
    LayerContainer(ComponentId),

    #[error("component {component} is not a {expected:?}")]
    KindMismatch {
        component: ComponentId,
        expected: ComponentKind,
    },
}

/// Failure reported by a listener. Isolated per listener during dispatch.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("listener failed: {message}")]
pub struct ListenerError {
    pub message: String,
}

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<UiError> for ListenerError {
    fn from(err: UiError) -> Self {
        Self::new(err.to_string())
    }
}
