//! Translation of raw device input into targeted UI events.

use strata_core::math::Vec2;
use strata_core::profiling::profile_function;

use crate::component::{Capabilities, ComponentId, ComponentTree};
use crate::event::{ClickAction, Event, EventPayload, KeyAction, KeyCode, Modifiers, MouseButton};
use crate::frame::{FrameId, Frames};
use crate::hit_test;
use crate::processor::EventProcessor;

/// Device input in frame coordinates, as delivered by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    CursorMoved(Vec2),
    /// Cursor left the frame's surface.
    CursorLeft,
    MouseButton {
        button: MouseButton,
        pressed: bool,
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
    Char(char),
}

/// Per-frame pointer and focus state.
///
/// Disabled components still take part in hit testing, so they block the
/// components underneath, but they never receive events and never take
/// focus. Only [`Capabilities::FOCUSABLE`] components take focus on press.
#[derive(Debug)]
pub struct InputRouter {
    frame: FrameId,
    cursor: Vec2,
    hovered: Option<ComponentId>,
    pressed: Option<(ComponentId, MouseButton)>,
    focused: Option<ComponentId>,
    /// Events queued by the current `handle` call.
    emitted: usize,
}

impl InputRouter {
    pub fn new(frame: FrameId) -> Self {
        Self {
            frame,
            cursor: Vec2::ZERO,
            hovered: None,
            pressed: None,
            focused: None,
            emitted: 0,
        }
    }

    pub fn frame(&self) -> FrameId {
        self.frame
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn hovered(&self) -> Option<ComponentId> {
        self.hovered
    }

    pub fn pressed(&self) -> Option<ComponentId> {
        self.pressed.map(|(id, _)| id)
    }

    pub fn focused(&self) -> Option<ComponentId> {
        self.focused
    }

    /// Move focus, emitting focus events to the old and new holders.
    pub fn set_focus(
        &mut self,
        target: Option<ComponentId>,
        tree: &ComponentTree,
        processor: &EventProcessor,
    ) {
        if self.focused == target {
            return;
        }
        if let Some(old) = self.focused.take() {
            self.emit(tree, processor, old, EventPayload::Focus { focused: false });
        }
        if let Some(new) = target {
            self.emit(tree, processor, new, EventPayload::Focus { focused: true });
        }
        self.focused = target;
    }

    /// Handle one input, queueing the resulting events. Returns how many
    /// events were queued.
    pub fn handle(
        &mut self,
        input: RawInput,
        tree: &ComponentTree,
        frames: &Frames,
        processor: &EventProcessor,
    ) -> usize {
        profile_function!();
        self.forget_stale(tree);
        self.emitted = 0;

        match input {
            RawInput::CursorMoved(position) => self.cursor_moved(position, tree, frames, processor),
            RawInput::CursorLeft => {
                if let Some(old) = self.hovered.take() {
                    self.emit(
                        tree,
                        processor,
                        old,
                        EventPayload::CursorEnter {
                            entered: false,
                            position: self.cursor,
                        },
                    );
                }
            }
            RawInput::MouseButton { button, pressed } => {
                if pressed {
                    self.button_pressed(button, tree, processor);
                } else {
                    self.button_released(button, tree, processor);
                }
            }
            RawInput::Scroll { x_offset, y_offset } => {
                if let Some(target) = self.hovered {
                    self.emit(tree, processor, target, EventPayload::Scroll { x_offset, y_offset });
                }
            }
            RawInput::Key {
                key,
                action,
                modifiers,
            } => {
                if let Some(target) = self.focused {
                    self.emit(
                        tree,
                        processor,
                        target,
                        EventPayload::Key {
                            key,
                            action,
                            modifiers,
                        },
                    );
                }
            }
            RawInput::Char(codepoint) => {
                if let Some(target) = self.focused {
                    self.emit(tree, processor, target, EventPayload::Char { codepoint });
                }
            }
        }

        self.emitted
    }

    fn cursor_moved(
        &mut self,
        position: Vec2,
        tree: &ComponentTree,
        frames: &Frames,
        processor: &EventProcessor,
    ) {
        let delta = position - self.cursor;
        self.cursor = position;

        let hovered = hit_test::resolve(tree, frames, self.frame, position);
        if hovered != self.hovered {
            if let Some(old) = self.hovered {
                self.emit(
                    tree,
                    processor,
                    old,
                    EventPayload::CursorEnter {
                        entered: false,
                        position,
                    },
                );
            }
            if let Some(new) = hovered {
                self.emit(
                    tree,
                    processor,
                    new,
                    EventPayload::CursorEnter {
                        entered: true,
                        position,
                    },
                );
            }
            self.hovered = hovered;
        }

        if let Some((target, _)) = self.pressed {
            if delta != Vec2::ZERO {
                self.emit(tree, processor, target, EventPayload::MouseDrag { delta, position });
            }
        }
    }

    fn button_pressed(&mut self, button: MouseButton, tree: &ComponentTree, processor: &EventProcessor) {
        let Some(target) = self.hovered else {
            return;
        };
        if self.pressed.is_some() {
            return;
        }
        self.pressed = Some((target, button));
        self.emit(
            tree,
            processor,
            target,
            EventPayload::MouseClick {
                action: ClickAction::Press,
                button,
                position: self.cursor,
            },
        );
        if is_focusable(tree, target) {
            self.set_focus(Some(target), tree, processor);
        }
    }

    fn button_released(&mut self, button: MouseButton, tree: &ComponentTree, processor: &EventProcessor) {
        let Some((target, held)) = self.pressed else {
            return;
        };
        if held != button {
            return;
        }
        self.pressed = None;
        self.emit(
            tree,
            processor,
            target,
            EventPayload::MouseClick {
                action: ClickAction::Release,
                button,
                position: self.cursor,
            },
        );
        if self.hovered == Some(target) {
            self.emit(
                tree,
                processor,
                target,
                EventPayload::MouseClick {
                    action: ClickAction::Click,
                    button,
                    position: self.cursor,
                },
            );
        }
    }

    fn emit(
        &mut self,
        tree: &ComponentTree,
        processor: &EventProcessor,
        target: ComponentId,
        payload: EventPayload,
    ) {
        if !is_enabled(tree, target) {
            tracing::trace!("not sending {:?} to disabled {}", payload.kind(), target);
            return;
        }
        processor.push_event(Event::new(target, self.frame, payload));
        self.emitted += 1;
    }

    fn forget_stale(&mut self, tree: &ComponentTree) {
        if self.hovered.is_some_and(|id| !tree.contains(id)) {
            self.hovered = None;
        }
        if self.pressed.is_some_and(|(id, _)| !tree.contains(id)) {
            self.pressed = None;
        }
        if self.focused.is_some_and(|id| !tree.contains(id)) {
            self.focused = None;
        }
    }
}

fn is_enabled(tree: &ComponentTree, id: ComponentId) -> bool {
    tree.get(id).is_some_and(|c| c.enabled)
}

fn is_focusable(tree: &ComponentTree, id: ComponentId) -> bool {
    tree.get(id).is_some_and(|c| c.enabled && c.has(Capabilities::FOCUSABLE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, ComponentKind};
    use crate::event::{Event, EventPayload};
    use crate::event::EventKind;
    use strata_core::geometry::Rect;

    struct Fixture {
        tree: ComponentTree,
        frames: Frames,
        processor: EventProcessor,
        router: InputRouter,
        a: ComponentId,
        b: ComponentId,
    }

    fn fixture() -> Fixture {
        let mut tree = ComponentTree::new();
        let mut frames = Frames::new();
        let frame = frames.create_frame(&mut tree, Vec2::new(200.0, 100.0));
        let root = frames.container(frame).unwrap();
        let button = |bounds| {
            Component::new(ComponentKind::Button)
                .with_bounds(bounds)
                .with_capabilities(Capabilities::FOCUSABLE)
        };
        let a = tree.insert(button(Rect::new(0.0, 0.0, 50.0, 50.0)));
        let b = tree.insert(button(Rect::new(100.0, 0.0, 50.0, 50.0)));
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();
        Fixture {
            tree,
            frames,
            processor: EventProcessor::new(),
            router: InputRouter::new(frame),
            a,
            b,
        }
    }

    impl Fixture {
        fn send(&mut self, input: RawInput) -> usize {
            self.router.handle(input, &self.tree, &self.frames, &self.processor)
        }

        /// Drain the queue and return `(target, kind)` pairs.
        fn drain(&mut self) -> Vec<(ComponentId, EventKind)> {
            let queue = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
            let mut ids = self.tree.descendants(self.frames.container(self.router.frame()).unwrap());
            ids.retain(|&id| id == self.a || id == self.b);
            for id in ids {
                let seen = queue.clone();
                let listener = crate::listener::Listener::infallible(move |event, _| {
                    seen.lock().unwrap().push((event.target, event.kind()));
                });
                let component = self.tree.get_mut(id).unwrap();
                component.listeners.clear();
                for kind in [
                    EventKind::CursorEnter,
                    EventKind::MouseClick,
                    EventKind::MouseDrag,
                    EventKind::Focus,
                    EventKind::Scroll,
                    EventKind::Char,
                ] {
                    component.listeners.add_listener(kind, listener.clone());
                }
            }
            self.processor.process_events(&mut self.tree, &mut self.frames);
            let out = queue.lock().unwrap().clone();
            out
        }
    }

    #[test]
    fn test_enter_and_leave() {
        let mut f = fixture();
        assert_eq!(f.send(RawInput::CursorMoved(Vec2::new(10.0, 10.0))), 1);
        assert_eq!(f.router.hovered(), Some(f.a));
        assert_eq!(f.send(RawInput::CursorMoved(Vec2::new(110.0, 10.0))), 2);
        assert_eq!(f.router.hovered(), Some(f.b));

        let (a, b) = (f.a, f.b);
        assert_eq!(
            f.drain(),
            vec![
                (a, EventKind::CursorEnter),
                (a, EventKind::CursorEnter),
                (b, EventKind::CursorEnter),
            ]
        );
    }

    #[test]
    fn test_click_sequence_and_focus() {
        let mut f = fixture();
        f.send(RawInput::CursorMoved(Vec2::new(10.0, 10.0)));
        f.send(RawInput::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        assert_eq!(f.router.focused(), Some(f.a));
        f.send(RawInput::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        });

        let a = f.a;
        assert_eq!(
            f.drain(),
            vec![
                (a, EventKind::CursorEnter),
                (a, EventKind::MouseClick),
                (a, EventKind::Focus),
                (a, EventKind::MouseClick),
                (a, EventKind::MouseClick),
            ]
        );
    }

    #[test]
    fn test_release_elsewhere_is_not_a_click() {
        let mut f = fixture();
        f.send(RawInput::CursorMoved(Vec2::new(10.0, 10.0)));
        f.send(RawInput::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        f.drain();

        f.send(RawInput::CursorMoved(Vec2::new(110.0, 10.0)));
        f.send(RawInput::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        });

        let (a, b) = (f.a, f.b);
        assert_eq!(
            f.drain(),
            vec![
                (a, EventKind::CursorEnter),
                (b, EventKind::CursorEnter),
                (a, EventKind::MouseDrag),
                (a, EventKind::MouseClick),
            ]
        );
    }

    #[test]
    fn test_disabled_component_swallows_input() {
        let mut f = fixture();
        f.tree.get_mut(f.a).unwrap().enabled = false;

        assert_eq!(f.send(RawInput::CursorMoved(Vec2::new(10.0, 10.0))), 0);
        assert_eq!(f.router.hovered(), Some(f.a));
        f.send(RawInput::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        assert_eq!(f.router.focused(), None);
        assert!(f.drain().is_empty());
    }

    #[test]
    fn test_keyboard_goes_to_focused() {
        let mut f = fixture();
        assert_eq!(f.send(RawInput::Char('x')), 0);
        let b = f.b;
        f.router.set_focus(Some(b), &f.tree, &f.processor);
        f.send(RawInput::Char('x'));

        assert_eq!(f.drain(), vec![(b, EventKind::Focus), (b, EventKind::Char)]);
    }

    #[test]
    fn test_non_focusable_press_keeps_focus() {
        let mut f = fixture();
        let b = f.b;
        f.tree.get_mut(b).unwrap().capabilities = Capabilities::NONE;

        f.send(RawInput::CursorMoved(Vec2::new(10.0, 10.0)));
        f.send(RawInput::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        f.send(RawInput::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        });
        assert_eq!(f.router.focused(), Some(f.a));

        f.send(RawInput::CursorMoved(Vec2::new(110.0, 10.0)));
        f.send(RawInput::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        assert_eq!(f.router.focused(), Some(f.a));
    }

    #[test]
    fn test_count_ignores_concurrent_pushes() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        let mut f = fixture();
        let sender = f.processor.sender();
        let frame = f.router.frame();
        let b = f.b;
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();
        let producer = std::thread::spawn(move || {
            while !flag.load(Ordering::Relaxed) {
                sender.push(Event::new(b, frame, EventPayload::Focus { focused: true }));
            }
        });

        for i in 0..200 {
            let x = if i % 2 == 0 { 10.0 } else { 110.0 };
            let expected = if i == 0 { 1 } else { 2 };
            assert_eq!(f.send(RawInput::CursorMoved(Vec2::new(x, 10.0))), expected);
        }
        stop.store(true, Ordering::Relaxed);
        producer.join().unwrap();
    }
}
