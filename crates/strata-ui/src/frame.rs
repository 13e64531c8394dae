//! Frames and the layer stack they own.
//!
//! Each frame owns a fixed component layer at the bottom and a fixed tooltip
//! layer at the top. User layers are spliced in between, in insertion order,
//! and every attached layer keeps `bottom`/`top` links to its neighbours:
//!
//! ```text
//! component <-> user_1 <-> ... <-> user_n <-> tooltip
//! ```
//!
//! Layer ownership changes are tolerant: unknown or stale handles, fixed
//! layers and layers already in place are silently ignored.

use std::fmt;

use indexmap::IndexSet;
use strata_core::alloc::{IndexSlot, RandomState, SparseSet};
use strata_core::geometry::Rect;
use strata_core::math::Vec2;
use strata_core::profiling::profile_function;

use crate::component::{Component, ComponentId, ComponentKind, ComponentTree};
use crate::error::UiError;
use crate::layer::{Layer, LayerId, LayerKind};

/// Handle to a frame owned by [`Frames`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(pub(crate) IndexSlot);

impl FrameId {
    pub fn to_bits(&self) -> u64 {
        self.0.to_bits()
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({}v{})", self.0.index(), self.0.generation())
    }
}

#[derive(Debug)]
pub struct Frame {
    component_layer: LayerId,
    tooltip_layer: LayerId,
    layers: IndexSet<LayerId, RandomState>,
    size: Vec2,
}

impl Frame {
    pub fn component_layer(&self) -> LayerId {
        self.component_layer
    }

    pub fn tooltip_layer(&self) -> LayerId {
        self.tooltip_layer
    }

    /// User layers in z-order, bottom first.
    pub fn user_layers(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.layers.iter().copied()
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }
}

/// Storage for frames and layers.
pub struct Frames {
    frames: SparseSet<Frame>,
    layers: SparseSet<Layer>,
}

impl Frames {
    pub fn new() -> Self {
        Self {
            frames: SparseSet::new(),
            layers: SparseSet::new(),
        }
    }

    pub fn frame(&self, frame: FrameId) -> Option<&Frame> {
        self.frames.try_get(frame.0)
    }

    pub fn layer(&self, layer: LayerId) -> Option<&Layer> {
        self.layers.try_get(layer.0)
    }

    pub fn layer_mut(&mut self, layer: LayerId) -> Option<&mut Layer> {
        self.layers.try_get_mut(layer.0)
    }

    pub fn contains_frame(&self, frame: FrameId) -> bool {
        self.frames.contains(frame.0)
    }

    pub fn contains_layer(&self, layer: LayerId) -> bool {
        self.layers.contains(layer.0)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn frame_ids(&self) -> impl Iterator<Item = FrameId> + '_ {
        self.frames.keys().map(FrameId)
    }

    /// Create a frame of the given size with its two fixed layers linked
    /// together.
    pub fn create_frame(&mut self, tree: &mut ComponentTree, size: Vec2) -> FrameId {
        profile_function!();
        let component_layer = self.spawn_layer(tree, LayerKind::Component, size);
        let tooltip_layer = self.spawn_layer(tree, LayerKind::Tooltip, size);

        let frame = FrameId(self.frames.push(Frame {
            component_layer,
            tooltip_layer,
            layers: IndexSet::default(),
            size,
        }));

        if let Some(layer) = self.layer_mut(component_layer) {
            layer.frame = Some(frame);
            layer.top = Some(tooltip_layer);
        }
        if let Some(layer) = self.layer_mut(tooltip_layer) {
            layer.frame = Some(frame);
            layer.bottom = Some(component_layer);
        }

        tracing::debug!("created {} ({}x{})", frame, size.x, size.y);
        frame
    }

    /// Destroy a frame. User layers are detached and stay alive; the fixed
    /// layers are destroyed together with their container subtrees.
    pub fn destroy_frame(&mut self, tree: &mut ComponentTree, frame: FrameId) -> Result<(), UiError> {
        profile_function!();
        let user_layers = self.layers(frame);
        if user_layers.is_empty() && !self.contains_frame(frame) {
            return Err(UiError::UnknownFrame(frame));
        }
        for layer in user_layers {
            self.remove_layer(frame, layer);
        }

        let removed = self
            .frames
            .try_remove(frame.0)
            .ok_or(UiError::UnknownFrame(frame))?;
        for fixed in [removed.component_layer, removed.tooltip_layer] {
            if let Some(layer) = self.layers.try_remove(fixed.0) {
                tree.destroy_subtree(layer.container());
            }
        }
        tracing::debug!("destroyed {}", frame);
        Ok(())
    }

    /// Create a detached user layer with an empty root container.
    pub fn create_layer(&mut self, tree: &mut ComponentTree) -> LayerId {
        self.spawn_layer(tree, LayerKind::User, Vec2::ZERO)
    }

    fn spawn_layer(&mut self, tree: &mut ComponentTree, kind: LayerKind, size: Vec2) -> LayerId {
        let mut root = Component::new(ComponentKind::LayerContainer)
            .with_bounds(Rect::from_position_size(Vec2::ZERO, size));
        if kind == LayerKind::Tooltip {
            root.style.clear_decoration();
        }
        let container = tree.insert(root);
        LayerId(self.layers.push(Layer::new(kind, container)))
    }

    /// Destroy a user layer and its container subtree, detaching it first if
    /// needed.
    pub fn destroy_layer(&mut self, tree: &mut ComponentTree, layer: LayerId) -> Result<(), UiError> {
        let info = self.layer(layer).ok_or(UiError::UnknownLayer(layer))?;
        if info.kind().is_fixed() {
            return Err(UiError::FixedLayer(layer));
        }
        if let Some(owner) = info.frame() {
            self.remove_layer(owner, layer);
        }
        if let Some(removed) = self.layers.try_remove(layer.0) {
            tree.destroy_subtree(removed.container());
        }
        tracing::trace!("destroyed {}", layer);
        Ok(())
    }

    /// Attach `layer` to `frame`, directly below the tooltip layer.
    ///
    /// Unknown frames or layers, fixed layers and layers already attached to
    /// `frame` are ignored. A layer attached to another frame is removed from
    /// it first.
    pub fn add_layer(&mut self, frame: FrameId, layer: LayerId) {
        profile_function!();
        let Some(target) = self.frame(frame) else {
            tracing::trace!("add_layer: unknown {}", frame);
            return;
        };
        let tooltip = target.tooltip_layer;
        let previous = target
            .layers
            .last()
            .copied()
            .unwrap_or(target.component_layer);

        let Some(info) = self.layer(layer) else {
            tracing::trace!("add_layer: unknown {}", layer);
            return;
        };
        if info.kind().is_fixed() {
            tracing::trace!("add_layer: {} is a fixed layer", layer);
            return;
        }
        if info.frame() == Some(frame) {
            return;
        }
        if let Some(owner) = info.frame() {
            self.remove_layer(owner, layer);
        }

        if let Some(entry) = self.layer_mut(layer) {
            entry.frame = Some(frame);
            entry.bottom = Some(previous);
            entry.top = Some(tooltip);
        }
        if let Some(entry) = self.layer_mut(previous) {
            entry.top = Some(layer);
        }
        if let Some(entry) = self.layer_mut(tooltip) {
            entry.bottom = Some(layer);
        }
        if let Some(target) = self.frames.try_get_mut(frame.0) {
            target.layers.insert(layer);
        }
        tracing::debug!("attached {} to {}", layer, frame);
    }

    /// Detach `layer` from `frame`.
    ///
    /// If the frame tracks the layer, its neighbours are linked directly to
    /// each other. A layer that `frame` does not track only has its owner and
    /// links cleared, with one deliberate exception: if its owner is another
    /// frame, it is unlinked from that owner, relinking the owner's chain.
    /// An owner cleared without unlinking would leave the layer inside a
    /// chain that no longer leads back to it. Fixed layers are never detached.
    pub fn remove_layer(&mut self, frame: FrameId, layer: LayerId) {
        profile_function!();
        let Some(info) = self.layer(layer) else {
            tracing::trace!("remove_layer: unknown {}", layer);
            return;
        };
        if info.kind().is_fixed() {
            tracing::trace!("remove_layer: {} is a fixed layer", layer);
            return;
        }

        let tracked_by = |frames: &Self, id: FrameId| {
            frames
                .frame(id)
                .is_some_and(|f| f.layers.contains(&layer))
        };
        let owner = if tracked_by(self, frame) {
            Some(frame)
        } else {
            info.frame().filter(|&other| tracked_by(self, other))
        };

        match owner {
            Some(owner) => self.unlink(owner, layer),
            None => {
                if let Some(entry) = self.layer_mut(layer) {
                    entry.clear_links();
                }
            }
        }
    }

    fn unlink(&mut self, owner: FrameId, layer: LayerId) {
        let Some(entry) = self.layer_mut(layer) else {
            return;
        };
        let bottom = entry.bottom;
        let top = entry.top;
        entry.clear_links();

        if let Some(below) = bottom.and_then(|id| self.layer_mut(id)) {
            below.top = top;
        }
        if let Some(above) = top.and_then(|id| self.layer_mut(id)) {
            above.bottom = bottom;
        }
        if let Some(frame) = self.frames.try_get_mut(owner.0) {
            frame.layers.shift_remove(&layer);
        }
        tracing::debug!("detached {} from {}", layer, owner);
    }

    /// Component layer, user layers in insertion order, then the tooltip
    /// layer. Empty for unknown frames.
    pub fn all_layers(&self, frame: FrameId) -> Vec<LayerId> {
        let Some(frame) = self.frame(frame) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(frame.layers.len() + 2);
        out.push(frame.component_layer);
        out.extend(frame.layers.iter().copied());
        out.push(frame.tooltip_layer);
        out
    }

    /// Copy of the user layers only.
    pub fn layers(&self, frame: FrameId) -> Vec<LayerId> {
        self.frame(frame)
            .map(|f| f.layers.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn component_layer(&self, frame: FrameId) -> Option<LayerId> {
        self.frame(frame).map(|f| f.component_layer)
    }

    pub fn tooltip_layer(&self, frame: FrameId) -> Option<LayerId> {
        self.frame(frame).map(|f| f.tooltip_layer)
    }

    /// Root container of the frame's component layer.
    pub fn container(&self, frame: FrameId) -> Option<ComponentId> {
        self.component_layer(frame)
            .and_then(|layer| self.layer(layer))
            .map(|layer| layer.container())
    }

    pub fn layer_container(&self, layer: LayerId) -> Option<ComponentId> {
        self.layer(layer).map(|l| l.container())
    }

    pub fn layer_frame(&self, layer: LayerId) -> Option<FrameId> {
        self.layer(layer).and_then(|l| l.frame())
    }

    pub fn bottom_layer(&self, layer: LayerId) -> Option<LayerId> {
        self.layer(layer).and_then(|l| l.bottom())
    }

    pub fn top_layer(&self, layer: LayerId) -> Option<LayerId> {
        self.layer(layer).and_then(|l| l.top())
    }

    /// Resize a frame and the root containers of its fixed layers.
    pub fn resize(&mut self, tree: &mut ComponentTree, frame: FrameId, size: Vec2) {
        let Some(entry) = self.frames.try_get_mut(frame.0) else {
            return;
        };
        entry.size = size;
        let fixed = [entry.component_layer, entry.tooltip_layer];
        for layer in fixed {
            if let Some(root) = self.layer_container(layer).and_then(|c| tree.get_mut(c)) {
                root.set_size(size);
            }
        }
    }

    /// Layer whose root container is the topmost ancestor of `component`.
    pub fn layer_of(&self, tree: &ComponentTree, component: ComponentId) -> Option<LayerId> {
        let mut root = component;
        while let Some(parent) = tree.parent(root) {
            root = parent;
        }
        self.layers
            .iter()
            .find(|(_, layer)| layer.container() == root)
            .map(|(slot, _)| LayerId(slot))
    }

    /// Frame that `component` is currently displayed in, if any.
    pub fn frame_of(&self, tree: &ComponentTree, component: ComponentId) -> Option<FrameId> {
        self.layer_of(tree, component)
            .and_then(|layer| self.layer_frame(layer))
    }
}

impl Default for Frames {
    fn default() -> Self {
        Self::new()
    }
}
