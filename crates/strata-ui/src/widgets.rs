//! Built-in widget builders and their default listeners.
//!
//! Builders create themed components and register the listeners that give
//! each kind its behaviour. The listeners only mutate component state and
//! emit derived events; applications react to those events through their own
//! listeners.

use strata_core::geometry::Rect;
use strata_core::math::Vec2;

use crate::component::{
    Capabilities, Component, ComponentId, ComponentKind, ComponentState, ComponentTree,
    ScrollBarState, WidgetState,
};
use crate::error::{ListenerError, UiError};
use crate::event::{Event, EventKind, EventPayload, MouseButton};
use crate::listener::Listener;
use crate::processor::EventContext;
use crate::theme::ThemeManager;

pub const DEFAULT_TITLE_HEIGHT: f32 = 20.0;
const RESIZE_HANDLE_SIZE: f32 = 10.0;

/// Theme `component` and insert it detached.
pub fn create(tree: &mut ComponentTree, themes: &ThemeManager, mut component: Component) -> ComponentId {
    themes.apply(&mut component);
    tree.insert(component)
}

pub fn panel(tree: &mut ComponentTree, themes: &ThemeManager, bounds: Rect) -> ComponentId {
    create(tree, themes, Component::new(ComponentKind::Panel).with_bounds(bounds))
}

pub fn label(
    tree: &mut ComponentTree,
    themes: &ThemeManager,
    text: impl Into<String>,
    bounds: Rect,
) -> ComponentId {
    create(
        tree,
        themes,
        Component::new(ComponentKind::Label)
            .with_bounds(bounds)
            .with_state(ComponentState::Label { text: text.into() }),
    )
}

pub fn button(
    tree: &mut ComponentTree,
    themes: &ThemeManager,
    text: impl Into<String>,
    bounds: Rect,
) -> ComponentId {
    create(
        tree,
        themes,
        Component::new(ComponentKind::Button)
            .with_bounds(bounds)
            .with_state(ComponentState::Button { text: text.into() })
            .with_capabilities(Capabilities::FOCUSABLE),
    )
}

/// Check box that toggles on left click.
pub fn check_box(
    tree: &mut ComponentTree,
    themes: &ThemeManager,
    text: impl Into<String>,
    checked: bool,
    bounds: Rect,
) -> ComponentId {
    let mut component = Component::new(ComponentKind::CheckBox)
        .with_bounds(bounds)
        .with_state(ComponentState::CheckBox {
            text: text.into(),
            checked,
        })
        .with_capabilities(Capabilities::FOCUSABLE);
    component
        .listeners
        .add_listener(EventKind::MouseClick, check_box_click_listener());
    create(tree, themes, component)
}

/// Scroll bar that follows the mouse wheel.
pub fn scroll_bar(
    tree: &mut ComponentTree,
    themes: &ThemeManager,
    state: ScrollBarState,
    bounds: Rect,
) -> ComponentId {
    let mut component = Component::new(ComponentKind::ScrollBar)
        .with_bounds(bounds)
        .with_state(ComponentState::ScrollBar(state));
    component
        .listeners
        .add_listener(EventKind::Scroll, scroll_bar_scroll_listener());
    create(tree, themes, component)
}

/// Window-like container with a title bar, close and minimize buttons, a
/// content panel and a resize handle. Parts are shown according to
/// `capabilities`. An [`Capabilities::ASCENDIBLE`] widget is raised in front
/// of its siblings when anything inside it is pressed (see
/// [`raise_ascendible`]).
pub fn widget(
    tree: &mut ComponentTree,
    themes: &ThemeManager,
    title: impl Into<String>,
    bounds: Rect,
    capabilities: Capabilities,
) -> Result<ComponentId, UiError> {
    let title = title.into();
    let title_bar = label(tree, themes, title.clone(), Rect::ZERO);
    let minimize_button = button(tree, themes, "_", Rect::ZERO);
    let close_button = button(tree, themes, "x", Rect::ZERO);
    let content = panel(tree, themes, Rect::ZERO);
    let resize_button = button(tree, themes, "", Rect::ZERO);

    let state = WidgetState {
        title,
        title_height: DEFAULT_TITLE_HEIGHT,
        minimized: false,
        title_enabled: true,
        restored_height: bounds.height,
        title_bar,
        close_button,
        minimize_button,
        content,
        resize_button,
    };
    let root = create(
        tree,
        themes,
        Component::new(ComponentKind::Widget)
            .with_bounds(bounds)
            .with_capabilities(capabilities)
            .with_state(ComponentState::Widget(Box::new(state))),
    );

    tree.add_child(root, title_bar)?;
    tree.add_child(root, content)?;
    tree.add_child(root, resize_button)?;
    tree.add_child(title_bar, minimize_button)?;
    tree.add_child(title_bar, close_button)?;

    for part in [minimize_button, close_button, resize_button] {
        tree.try_component_mut(part)?.capabilities = Capabilities::NONE;
    }
    tree.try_component_mut(title_bar)?
        .listeners
        .add_listener(EventKind::MouseDrag, widget_drag_listener(root));
    tree.try_component_mut(close_button)?
        .listeners
        .add_listener(EventKind::MouseClick, widget_close_listener(root));
    tree.try_component_mut(minimize_button)?
        .listeners
        .add_listener(EventKind::MouseClick, widget_minimize_listener(root));
    tree.try_component_mut(resize_button)?
        .listeners
        .add_listener(EventKind::MouseDrag, widget_resize_listener(root));

    layout_widget(tree, root)?;
    Ok(root)
}

pub fn widget_state(tree: &ComponentTree, widget: ComponentId) -> Option<&WidgetState> {
    match &tree.get(widget)?.state {
        ComponentState::Widget(state) => Some(state),
        _ => None,
    }
}

/// Content panel of a widget, where application components go.
pub fn widget_content(tree: &ComponentTree, widget: ComponentId) -> Option<ComponentId> {
    widget_state(tree, widget).map(|state| state.content)
}

pub fn is_checked(tree: &ComponentTree, check_box: ComponentId) -> Option<bool> {
    match tree.get(check_box)?.state {
        ComponentState::CheckBox { checked, .. } => Some(checked),
        _ => None,
    }
}

pub fn scroll_bar_state(tree: &ComponentTree, scroll_bar: ComponentId) -> Option<ScrollBarState> {
    match tree.get(scroll_bar)?.state {
        ComponentState::ScrollBar(state) => Some(state),
        _ => None,
    }
}

/// Change a widget's capabilities and show or hide its parts to match.
pub fn set_widget_capabilities(
    tree: &mut ComponentTree,
    widget: ComponentId,
    capabilities: Capabilities,
) -> Result<(), UiError> {
    tree.try_component_mut(widget)?.capabilities = capabilities;
    layout_widget(tree, widget)
}

/// Minimize or restore a widget. Returns false if the state did not change.
pub fn set_minimized(
    tree: &mut ComponentTree,
    widget: ComponentId,
    minimized: bool,
) -> Result<bool, UiError> {
    let component = tree.try_component_mut(widget)?;
    let height = component.bounds.height;
    let ComponentState::Widget(state) = &mut component.state else {
        return Err(UiError::KindMismatch {
            component: widget,
            expected: ComponentKind::Widget,
        });
    };
    if state.minimized == minimized {
        return Ok(false);
    }
    state.minimized = minimized;
    let new_height = if minimized {
        state.restored_height = height;
        state.title_height
    } else {
        state.restored_height
    };
    component.bounds.height = new_height;
    layout_widget(tree, widget)?;
    Ok(true)
}

/// Show or hide a widget's title bar. Ignored while the widget is minimized;
/// returns false if nothing changed.
pub fn set_title_enabled(
    tree: &mut ComponentTree,
    widget: ComponentId,
    enabled: bool,
) -> Result<bool, UiError> {
    let ComponentState::Widget(state) = &mut tree.try_component_mut(widget)?.state else {
        return Err(UiError::KindMismatch {
            component: widget,
            expected: ComponentKind::Widget,
        });
    };
    if state.minimized || state.title_enabled == enabled {
        return Ok(false);
    }
    state.title_enabled = enabled;
    layout_widget(tree, widget)?;
    Ok(true)
}

/// Bring every [`Capabilities::ASCENDIBLE`] component on the path from
/// `component` to its root in front of its siblings. Returns how many moved.
pub fn raise_ascendible(tree: &mut ComponentTree, component: ComponentId) -> usize {
    let mut raised = 0;
    let mut current = Some(component);
    while let Some(node) = current {
        let ascendible = tree.get(node).is_some_and(|c| c.has(Capabilities::ASCENDIBLE));
        if ascendible && tree.bring_to_front(node) {
            raised += 1;
        }
        current = tree.parent(node);
    }
    raised
}

/// Position a widget's parts from its bounds, state and capabilities.
pub fn layout_widget(tree: &mut ComponentTree, widget: ComponentId) -> Result<(), UiError> {
    let component = tree.try_component(widget)?;
    let bounds = component.bounds;
    let capabilities = component.capabilities;
    let ComponentState::Widget(state) = &component.state else {
        return Err(UiError::KindMismatch {
            component: widget,
            expected: ComponentKind::Widget,
        });
    };
    let state = (**state).clone();
    let th = state.title_height;
    let width = bounds.width;
    let content_top = if state.title_enabled { th } else { 0.0 };

    let parts = [
        (state.title_bar, Rect::new(0.0, 0.0, width, th), state.title_enabled),
        (
            state.close_button,
            Rect::new(width - th, 0.0, th, th),
            capabilities.contains(Capabilities::CLOSEABLE),
        ),
        (
            state.minimize_button,
            Rect::new(width - 2.0 * th, 0.0, th, th),
            capabilities.contains(Capabilities::MINIMIZABLE),
        ),
        (
            state.content,
            Rect::new(0.0, content_top, width, (bounds.height - content_top).max(0.0)),
            !state.minimized,
        ),
        (
            state.resize_button,
            Rect::new(
                width - RESIZE_HANDLE_SIZE,
                bounds.height - RESIZE_HANDLE_SIZE,
                RESIZE_HANDLE_SIZE,
                RESIZE_HANDLE_SIZE,
            ),
            !state.minimized && capabilities.contains(Capabilities::RESIZABLE),
        ),
    ];
    for (part, rect, visible) in parts {
        let part = tree.try_component_mut(part)?;
        part.bounds = rect;
        part.visible = visible;
    }
    Ok(())
}

fn check_box_click(event: &Event, ctx: &mut EventContext<'_>) -> Result<(), ListenerError> {
    if !event.is_click(MouseButton::Left) {
        return Ok(());
    }
    let component = ctx.tree_mut().try_component_mut(event.target)?;
    let ComponentState::CheckBox { checked, .. } = &mut component.state else {
        return Err(UiError::KindMismatch {
            component: event.target,
            expected: ComponentKind::CheckBox,
        }
        .into());
    };
    let old = *checked;
    *checked = !old;
    ctx.push_event(Event::new(
        event.target,
        event.frame,
        EventPayload::CheckBoxChangeValue { old, new: !old },
    ));
    Ok(())
}

/// Toggles a check box on left click and emits
/// [`EventPayload::CheckBoxChangeValue`].
pub fn check_box_click_listener() -> Listener {
    Listener::new(check_box_click)
}

/// New scroll bar value after scrolling by `y_offset`, or `None` when the
/// whole range is visible.
pub fn scrolled_value(state: &ScrollBarState, y_offset: f32) -> Option<f32> {
    let range = state.max_value - state.min_value;
    let visible = state.visible_amount;
    if range - visible < 0.001 {
        return None;
    }
    let new = state.cur_value - state.scroll_step * y_offset * visible * range / (range - visible);
    // Not `f32::clamp`: bounds come from public fields and may be inverted or NaN.
    Some(new.min(state.max_value).max(state.min_value))
}

fn scroll_bar_scroll(event: &Event, ctx: &mut EventContext<'_>) -> Result<(), ListenerError> {
    let EventPayload::Scroll { y_offset, .. } = event.payload else {
        return Ok(());
    };
    let component = ctx.tree_mut().try_component_mut(event.target)?;
    let ComponentState::ScrollBar(state) = &mut component.state else {
        return Err(UiError::KindMismatch {
            component: event.target,
            expected: ComponentKind::ScrollBar,
        }
        .into());
    };
    let Some(new) = scrolled_value(state, y_offset) else {
        return Ok(());
    };
    let old = state.cur_value;
    state.cur_value = new;
    ctx.push_event(Event::new(
        event.target,
        event.frame,
        EventPayload::ScrollBarChangeValue { old, new },
    ));
    Ok(())
}

/// Moves a scroll bar on wheel input and emits
/// [`EventPayload::ScrollBarChangeValue`].
pub fn scroll_bar_scroll_listener() -> Listener {
    Listener::new(scroll_bar_scroll)
}

/// Hides `widget` and sends it [`EventPayload::WidgetClose`] when the close
/// button is clicked.
pub fn widget_close_listener(widget: ComponentId) -> Listener {
    Listener::new(move |event, ctx| {
        if !event.is_click(MouseButton::Left) {
            return Ok(());
        }
        let component = ctx.tree_mut().try_component_mut(widget)?;
        if !component.has(Capabilities::CLOSEABLE) {
            return Ok(());
        }
        component.visible = false;
        ctx.push_event(Event::new(widget, event.frame, EventPayload::WidgetClose));
        Ok(())
    })
}

/// Toggles minimization when the minimize button is clicked and sends
/// [`EventPayload::WidgetMinimize`] to the widget.
pub fn widget_minimize_listener(widget: ComponentId) -> Listener {
    Listener::new(move |event, ctx| {
        if !event.is_click(MouseButton::Left) {
            return Ok(());
        }
        let tree = ctx.tree_mut();
        if !tree.try_component(widget)?.has(Capabilities::MINIMIZABLE) {
            return Ok(());
        }
        let minimized = !widget_state(tree, widget)
            .map(|state| state.minimized)
            .unwrap_or(false);
        set_minimized(tree, widget, minimized)?;
        ctx.push_event(Event::new(
            widget,
            event.frame,
            EventPayload::WidgetMinimize { minimized },
        ));
        Ok(())
    })
}

/// Moves a draggable widget by the drag delta of its title bar.
pub fn widget_drag_listener(widget: ComponentId) -> Listener {
    Listener::new(move |event, ctx| {
        let EventPayload::MouseDrag { delta, .. } = event.payload else {
            return Ok(());
        };
        let component = ctx.tree_mut().try_component_mut(widget)?;
        if component.has(Capabilities::DRAGGABLE) {
            component.bounds = component.bounds.offset(delta);
        }
        Ok(())
    })
}

/// Grows or shrinks a resizable widget by the drag delta of its resize
/// handle.
pub fn widget_resize_listener(widget: ComponentId) -> Listener {
    Listener::new(move |event, ctx| {
        let EventPayload::MouseDrag { delta, .. } = event.payload else {
            return Ok(());
        };
        let tree = ctx.tree_mut();
        let component = tree.try_component_mut(widget)?;
        if !component.has(Capabilities::RESIZABLE) {
            return Ok(());
        }
        let min = match &component.state {
            ComponentState::Widget(state) => Vec2::new(state.title_height * 3.0, state.title_height * 2.0),
            _ => Vec2::ZERO,
        };
        let size = (component.bounds.size() + delta).max(min);
        component.set_size(size);
        layout_widget(tree, widget)?;
        Ok(())
    })
}
