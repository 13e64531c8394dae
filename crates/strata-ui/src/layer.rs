//! Layers: one z-ordered plane of UI content.

use std::fmt;

use strata_core::alloc::IndexSlot;

use crate::component::ComponentId;
use crate::frame::FrameId;

/// Handle to a layer owned by [`crate::frame::Frames`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub(crate) IndexSlot);

impl LayerId {
    pub fn to_bits(&self) -> u64 {
        self.0.to_bits()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layer({}v{})", self.0.index(), self.0.generation())
    }
}

/// Role of a layer within its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Fixed bottom layer holding the main component tree.
    Component,
    /// Fixed top layer for tooltips.
    Tooltip,
    /// Dialogs, popups and other floating content.
    User,
}

impl LayerKind {
    pub fn is_fixed(&self) -> bool {
        !matches!(self, LayerKind::User)
    }
}

#[derive(Debug)]
pub struct Layer {
    kind: LayerKind,
    container: ComponentId,
    pub(crate) frame: Option<FrameId>,
    pub(crate) bottom: Option<LayerId>,
    pub(crate) top: Option<LayerId>,
    /// A hit on the bare root container falls through to lower layers.
    pub events_passable: bool,
    /// The layer takes part in hit testing at all.
    pub events_receivable: bool,
}

impl Layer {
    pub(crate) fn new(kind: LayerKind, container: ComponentId) -> Self {
        let (events_passable, events_receivable) = match kind {
            LayerKind::Component => (false, true),
            LayerKind::Tooltip => (true, false),
            LayerKind::User => (true, true),
        };
        Self {
            kind,
            container,
            frame: None,
            bottom: None,
            top: None,
            events_passable,
            events_receivable,
        }
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Root container component of this layer.
    pub fn container(&self) -> ComponentId {
        self.container
    }

    /// Owning frame while attached.
    pub fn frame(&self) -> Option<FrameId> {
        self.frame
    }

    /// Neighbour directly below.
    pub fn bottom(&self) -> Option<LayerId> {
        self.bottom
    }

    /// Neighbour directly above.
    pub fn top(&self) -> Option<LayerId> {
        self.top
    }

    pub fn is_attached(&self) -> bool {
        self.frame.is_some()
    }

    pub(crate) fn clear_links(&mut self) {
        self.frame = None;
        self.bottom = None;
        self.top = None;
    }
}
