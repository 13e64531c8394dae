//! Root UI context.
//!
//! [`UiContext`] owns the component tree, the frames and layers, the theme
//! manager, one input router per frame and the event processor. One tick of
//! the UI is: feed raw input with [`UiContext::handle_input`], then drain the
//! queue with [`UiContext::tick`].

use strata_core::alloc::HashMap;
use strata_core::config::Config;
use strata_core::geometry::Rect;
use strata_core::math::Vec2;
use strata_core::profiling::{self, profile_function};

use crate::component::{Capabilities, Component, ComponentId, ComponentTree, ScrollBarState};
use crate::draw_order::{self, DrawItem};
use crate::error::UiError;
use crate::event::{Event, EventKind};
use crate::frame::{FrameId, Frames};
use crate::hit_test;
use crate::input::{InputRouter, RawInput};
use crate::layer::LayerId;
use crate::listener::Listener;
use crate::processor::{DispatchStats, EventProcessor, EventSender};
use crate::theme::ThemeManager;
use crate::widgets;

pub struct UiContext {
    config: Config,
    tree: ComponentTree,
    frames: Frames,
    themes: ThemeManager,
    routers: HashMap<FrameId, InputRouter>,
    processor: EventProcessor,
}

impl UiContext {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let processor = EventProcessor::with_config(&config);
        Self {
            config,
            tree: ComponentTree::new(),
            frames: Frames::new(),
            themes: ThemeManager::default(),
            routers: HashMap::default(),
            processor,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ComponentTree {
        &mut self.tree
    }

    pub fn frames(&self) -> &Frames {
        &self.frames
    }

    pub fn themes(&self) -> &ThemeManager {
        &self.themes
    }

    /// Replace the theme manager. Existing components keep their styles.
    pub fn set_themes(&mut self, themes: ThemeManager) {
        self.themes = themes;
    }

    pub fn processor(&self) -> &EventProcessor {
        &self.processor
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.tree.get(id)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.tree.get_mut(id)
    }

    // Frames and layers

    pub fn create_frame(&mut self, size: Vec2) -> FrameId {
        let frame = self.frames.create_frame(&mut self.tree, size);
        for layer in self.frames.all_layers(frame) {
            self.theme_layer_container(layer);
        }
        self.routers.insert(frame, InputRouter::new(frame));
        frame
    }

    /// Destroy a frame, its fixed layers and any events still queued for it.
    /// User layers attached to it are detached and stay alive.
    pub fn destroy_frame(&mut self, frame: FrameId) -> Result<(), UiError> {
        self.frames.destroy_frame(&mut self.tree, frame)?;
        self.routers.remove(&frame);
        let discarded = self.processor.discard_frame(frame);
        if discarded > 0 {
            tracing::debug!("discarded {} queued events for {}", discarded, frame);
        }
        Ok(())
    }

    pub fn resize_frame(&mut self, frame: FrameId, size: Vec2) {
        self.frames.resize(&mut self.tree, frame, size);
    }

    pub fn create_layer(&mut self) -> LayerId {
        let layer = self.frames.create_layer(&mut self.tree);
        self.theme_layer_container(layer);
        layer
    }

    pub fn destroy_layer(&mut self, layer: LayerId) -> Result<(), UiError> {
        self.frames.destroy_layer(&mut self.tree, layer)
    }

    fn theme_layer_container(&mut self, layer: LayerId) {
        if let Some(container) = self
            .frames
            .layer_container(layer)
            .and_then(|id| self.tree.get_mut(id))
        {
            self.themes.apply(container);
        }
    }

    pub fn add_layer(&mut self, frame: FrameId, layer: LayerId) {
        self.frames.add_layer(frame, layer);
    }

    pub fn remove_layer(&mut self, frame: FrameId, layer: LayerId) {
        self.frames.remove_layer(frame, layer);
    }

    pub fn all_layers(&self, frame: FrameId) -> Vec<LayerId> {
        self.frames.all_layers(frame)
    }

    pub fn layers(&self, frame: FrameId) -> Vec<LayerId> {
        self.frames.layers(frame)
    }

    pub fn component_layer(&self, frame: FrameId) -> Option<LayerId> {
        self.frames.component_layer(frame)
    }

    pub fn tooltip_layer(&self, frame: FrameId) -> Option<LayerId> {
        self.frames.tooltip_layer(frame)
    }

    /// Root container of the frame's component layer.
    pub fn container(&self, frame: FrameId) -> Option<ComponentId> {
        self.frames.container(frame)
    }

    pub fn layer_container(&self, layer: LayerId) -> Option<ComponentId> {
        self.frames.layer_container(layer)
    }

    pub fn layer_frame(&self, layer: LayerId) -> Option<FrameId> {
        self.frames.layer_frame(layer)
    }

    pub fn set_layer_events(&mut self, layer: LayerId, receivable: bool, passable: bool) {
        if let Some(layer) = self.frames.layer_mut(layer) {
            layer.events_receivable = receivable;
            layer.events_passable = passable;
        }
    }

    // Components

    /// Theme and insert a detached component.
    pub fn create(&mut self, component: Component) -> ComponentId {
        widgets::create(&mut self.tree, &self.themes, component)
    }

    pub fn panel(&mut self, bounds: Rect) -> ComponentId {
        widgets::panel(&mut self.tree, &self.themes, bounds)
    }

    pub fn label(&mut self, text: impl Into<String>, bounds: Rect) -> ComponentId {
        widgets::label(&mut self.tree, &self.themes, text, bounds)
    }

    pub fn button(&mut self, text: impl Into<String>, bounds: Rect) -> ComponentId {
        widgets::button(&mut self.tree, &self.themes, text, bounds)
    }

    pub fn check_box(&mut self, text: impl Into<String>, checked: bool, bounds: Rect) -> ComponentId {
        widgets::check_box(&mut self.tree, &self.themes, text, checked, bounds)
    }

    pub fn scroll_bar(&mut self, state: ScrollBarState, bounds: Rect) -> ComponentId {
        widgets::scroll_bar(&mut self.tree, &self.themes, state, bounds)
    }

    pub fn widget(
        &mut self,
        title: impl Into<String>,
        bounds: Rect,
        capabilities: Capabilities,
    ) -> Result<ComponentId, UiError> {
        widgets::widget(&mut self.tree, &self.themes, title, bounds, capabilities)
    }

    pub fn add_child(&mut self, parent: ComponentId, child: ComponentId) -> Result<(), UiError> {
        self.tree.add_child(parent, child)
    }

    pub fn remove_child(&mut self, parent: ComponentId, child: ComponentId) -> bool {
        self.tree.remove_child(parent, child)
    }

    /// Destroy a component and its subtree. Layer containers are owned by
    /// their layer and are destroyed with it instead.
    pub fn destroy_component(&mut self, id: ComponentId) -> Result<(), UiError> {
        self.tree.destroy(id)
    }

    // Listeners and events

    /// Register `listener` on `component`. Returns false for unknown
    /// components.
    pub fn add_listener(&mut self, component: ComponentId, kind: EventKind, listener: Listener) -> bool {
        match self.tree.get_mut(component) {
            Some(c) => {
                c.listeners.add_listener(kind, listener);
                true
            }
            None => {
                tracing::trace!("add_listener: unknown {}", component);
                false
            }
        }
    }

    pub fn remove_listener(&mut self, component: ComponentId, kind: EventKind, listener: &Listener) -> bool {
        self.tree
            .get_mut(component)
            .is_some_and(|c| c.listeners.remove_listener(kind, listener))
    }

    pub fn push_event(&self, event: Event) {
        self.processor.push_event(event);
    }

    pub fn sender(&self) -> EventSender {
        self.processor.sender()
    }

    /// Deliver queued events. Events for frames destroyed in the meantime
    /// are dropped.
    pub fn process_events(&mut self) -> DispatchStats {
        let stats = self.processor.process_events(&mut self.tree, &mut self.frames);
        self.forget_dead_routers();
        stats
    }

    /// One UI tick: start a profiler frame and deliver queued events.
    pub fn tick(&mut self) -> DispatchStats {
        profiling::new_frame();
        profile_function!();
        self.process_events()
    }

    // Input and rendering

    pub fn hit_test(&self, frame: FrameId, point: Vec2) -> Option<ComponentId> {
        hit_test::resolve(&self.tree, &self.frames, frame, point)
    }

    pub fn draw_order(&self, frame: FrameId) -> Vec<DrawItem> {
        draw_order::draw_order(&self.tree, &self.frames, frame)
    }

    /// Route raw input for `frame`. Returns the number of events queued.
    ///
    /// A button press also raises the ascendible ancestors of the pressed
    /// component in front of their siblings.
    pub fn handle_input(&mut self, frame: FrameId, input: RawInput) -> usize {
        self.forget_dead_routers();
        if !self.frames.contains_frame(frame) {
            tracing::trace!("handle_input: unknown {}", frame);
            return 0;
        }
        let router = self
            .routers
            .entry(frame)
            .or_insert_with(|| InputRouter::new(frame));
        let held = router.pressed();
        let queued = router.handle(input, &self.tree, &self.frames, &self.processor);

        let pressed = router.pressed();
        if pressed != held
            && let Some(target) = pressed
            && self.tree.get(target).is_some_and(|c| c.enabled)
        {
            widgets::raise_ascendible(&mut self.tree, target);
        }
        queued
    }

    /// Drop routers of frames destroyed without going through
    /// [`UiContext::destroy_frame`], e.g. from a listener.
    fn forget_dead_routers(&mut self) {
        let frames = &self.frames;
        self.routers.retain(|id, _| frames.contains_frame(*id));
    }

    pub fn input_router(&self, frame: FrameId) -> Option<&InputRouter> {
        self.routers.get(&frame)
    }

    pub fn set_focus(&mut self, frame: FrameId, target: Option<ComponentId>) {
        if let Some(router) = self.routers.get_mut(&frame) {
            router.set_focus(target, &self.tree, &self.processor);
        }
    }
}

impl Default for UiContext {
    fn default() -> Self {
        Self::new()
    }
}
