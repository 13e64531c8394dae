//! Component tree: generational storage of styled nodes.
//!
//! Components are plain data nodes composed from a kind tag, a capability
//! set, a style, a per-kind state and a listener map. Parent/child links are
//! handles into the same [`ComponentTree`]; destroying a node makes every
//! handle to it and its descendants stale.

use std::fmt;

use bitflags::bitflags;
use strata_core::alloc::{IndexSlot, SparseSet};
use strata_core::geometry::Rect;
use strata_core::math::Vec2;
use strata_core::profiling::profile_function;

use crate::error::UiError;
use crate::listener::ListenerMap;
use crate::style::Style;

/// Handle to a component in a [`ComponentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(pub(crate) IndexSlot);

impl ComponentId {
    pub fn to_bits(&self) -> u64 {
        self.0.to_bits()
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({}v{})", self.0.index(), self.0.generation())
    }
}

/// Kind tag used for theme resolution and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Panel,
    LayerContainer,
    Label,
    Button,
    CheckBox,
    ScrollBar,
    Widget,
}

impl ComponentKind {
    /// Kind consulted next when no theme is registered for this one.
    pub fn fallback(&self) -> Option<ComponentKind> {
        match self {
            ComponentKind::Panel => None,
            ComponentKind::LayerContainer => Some(ComponentKind::Panel),
            ComponentKind::Label => Some(ComponentKind::Panel),
            ComponentKind::Button => Some(ComponentKind::Label),
            ComponentKind::CheckBox => Some(ComponentKind::Button),
            ComponentKind::ScrollBar => Some(ComponentKind::Panel),
            ComponentKind::Widget => Some(ComponentKind::Panel),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Panel => "Panel",
            ComponentKind::LayerContainer => "LayerContainer",
            ComponentKind::Label => "Label",
            ComponentKind::Button => "Button",
            ComponentKind::CheckBox => "CheckBox",
            ComponentKind::ScrollBar => "ScrollBar",
            ComponentKind::Widget => "Widget",
        }
    }
}

bitflags! {
    /// Behaviours a component opts into.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const NONE        = 0;
        /// Can be moved by dragging its title bar.
        const DRAGGABLE   = 1 << 0;
        /// Can be resized by the user.
        const RESIZABLE   = 1 << 1;
        /// Shows a close button.
        const CLOSEABLE   = 1 << 2;
        /// Shows a minimize button.
        const MINIMIZABLE = 1 << 3;
        /// Takes keyboard focus when pressed.
        const FOCUSABLE   = 1 << 4;
        /// Moves in front of its siblings when it or a part of it is pressed.
        const ASCENDIBLE  = 1 << 5;
    }
}

impl Capabilities {
    pub fn window() -> Self {
        Self::DRAGGABLE
            | Self::RESIZABLE
            | Self::CLOSEABLE
            | Self::MINIMIZABLE
            | Self::FOCUSABLE
            | Self::ASCENDIBLE
    }
}

/// Scroll bar value model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollBarState {
    pub min_value: f32,
    pub max_value: f32,
    pub cur_value: f32,
    /// Portion of the range currently visible.
    pub visible_amount: f32,
    pub scroll_step: f32,
}

impl Default for ScrollBarState {
    fn default() -> Self {
        Self {
            min_value: 0.0,
            max_value: 100.0,
            cur_value: 0.0,
            visible_amount: 30.0,
            scroll_step: 1.0,
        }
    }
}

/// Child parts and window state of a [`ComponentKind::Widget`].
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetState {
    pub title: String,
    pub title_height: f32,
    pub minimized: bool,
    /// Title bar shown. Hiding it also hides the close and minimize buttons.
    pub title_enabled: bool,
    /// Height to restore when un-minimizing.
    pub restored_height: f32,
    pub title_bar: ComponentId,
    pub close_button: ComponentId,
    pub minimize_button: ComponentId,
    pub content: ComponentId,
    pub resize_button: ComponentId,
}

/// Per-kind data.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ComponentState {
    #[default]
    None,
    Label {
        text: String,
    },
    Button {
        text: String,
    },
    CheckBox {
        text: String,
        checked: bool,
    },
    ScrollBar(ScrollBarState),
    Widget(Box<WidgetState>),
}

/// A styled node in the component tree.
#[derive(Debug)]
pub struct Component {
    kind: ComponentKind,
    /// Position relative to the parent, and size.
    pub bounds: Rect,
    pub visible: bool,
    /// Disabled components are hit by hit testing but receive no input events.
    pub enabled: bool,
    pub capabilities: Capabilities,
    pub style: Style,
    pub state: ComponentState,
    pub listeners: ListenerMap,
    parent: Option<ComponentId>,
    children: Vec<ComponentId>,
}

impl Component {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            bounds: Rect::ZERO,
            visible: true,
            enabled: true,
            capabilities: Capabilities::NONE,
            style: Style::default(),
            state: ComponentState::None,
            listeners: ListenerMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_state(mut self, state: ComponentState) -> Self {
        self.state = state;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    /// Children in paint order (last child is front-most).
    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }

    pub fn has(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.bounds.x = position.x;
        self.bounds.y = position.y;
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.bounds.width = size.x;
        self.bounds.height = size.y;
    }
}

/// Owner of all components.
pub struct ComponentTree {
    nodes: SparseSet<Component>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self {
            nodes: SparseSet::new(),
        }
    }

    /// Insert a detached component.
    pub fn insert(&mut self, mut component: Component) -> ComponentId {
        component.parent = None;
        component.children.clear();
        ComponentId(self.nodes.push(component))
    }

    pub fn create(&mut self, kind: ComponentKind) -> ComponentId {
        self.insert(Component::new(kind))
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.nodes.contains(id.0)
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.nodes.try_get(id.0)
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.nodes.try_get_mut(id.0)
    }

    pub fn try_component(&self, id: ComponentId) -> Result<&Component, UiError> {
        self.get(id).ok_or(UiError::UnknownComponent(id))
    }

    pub fn try_component_mut(&mut self, id: ComponentId) -> Result<&mut Component, UiError> {
        self.get_mut(id).ok_or(UiError::UnknownComponent(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.get(id).and_then(|c| c.parent)
    }

    pub fn children(&self, id: ComponentId) -> &[ComponentId] {
        self.get(id).map(|c| c.children()).unwrap_or(&[])
    }

    /// True if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: ComponentId, id: ComponentId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Append `child` to `parent`, detaching it from its previous parent first.
    pub fn add_child(&mut self, parent: ComponentId, child: ComponentId) -> Result<(), UiError> {
        self.try_component(parent)?;
        let child_node = self.try_component(child)?;
        if child_node.kind == ComponentKind::LayerContainer {
            return Err(UiError::LayerContainer(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(UiError::HierarchyCycle { parent, child });
        }

        self.detach(child);
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        Ok(())
    }

    /// Remove `child` from `parent` without destroying it. Returns false if it
    /// was not a child of `parent`.
    pub fn remove_child(&mut self, parent: ComponentId, child: ComponentId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.detach(child);
        true
    }

    /// Move `id` to the end of its parent's children, in front of its
    /// siblings. Returns false for detached or stale ids.
    pub fn bring_to_front(&mut self, id: ComponentId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        let Some(node) = self.get_mut(parent) else {
            return false;
        };
        if node.children.last() != Some(&id) {
            node.children.retain(|&c| c != id);
            node.children.push(id);
        }
        true
    }

    fn detach(&mut self, child: ComponentId) {
        let Some(old_parent) = self.parent(child) else {
            return;
        };
        if let Some(node) = self.get_mut(old_parent) {
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
    }

    /// Destroy a component and its whole subtree.
    ///
    /// Layer containers belong to their layer and are only destroyed together
    /// with it.
    pub fn destroy(&mut self, id: ComponentId) -> Result<(), UiError> {
        if self.try_component(id)?.kind == ComponentKind::LayerContainer {
            return Err(UiError::LayerContainer(id));
        }
        self.destroy_subtree(id);
        Ok(())
    }

    /// Destroy without the layer container check. Returns false for stale ids.
    pub(crate) fn destroy_subtree(&mut self, id: ComponentId) -> bool {
        profile_function!();
        if !self.contains(id) {
            return false;
        }
        self.detach(id);

        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            if let Some(component) = self.nodes.try_remove(node.0) {
                stack.extend(component.children);
            }
        }
        tracing::trace!("destroyed component subtree rooted at {}", id);
        true
    }

    /// Position of the component relative to the root of its tree.
    pub fn absolute_position(&self, id: ComponentId) -> Option<Vec2> {
        let mut position = self.get(id)?.bounds.position();
        let mut current = self.parent(id);
        while let Some(node) = current {
            let component = self.get(node)?;
            position += component.bounds.position();
            current = component.parent;
        }
        Some(position)
    }

    pub fn absolute_bounds(&self, id: ComponentId) -> Option<Rect> {
        let size = self.get(id)?.bounds.size();
        let position = self.absolute_position(id)?;
        Some(Rect::from_position_size(position, size))
    }

    /// Visible itself and through every ancestor.
    pub fn is_visible_in_tree(&self, id: ComponentId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            match self.get(node) {
                Some(component) if component.visible => current = component.parent,
                _ => return false,
            }
        }
        true
    }

    /// Pre-order traversal of the subtree rooted at `id`.
    pub fn descendants(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            let Some(component) = self.get(node) else {
                continue;
            };
            out.push(node);
            stack.extend(component.children.iter().rev().copied());
        }
        out
    }
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}
