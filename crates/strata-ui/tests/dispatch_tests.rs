//! Event queue and listener dispatch.

use std::sync::{Arc, Mutex};

use strata_ui::{
    ComponentId, Event, EventKind, EventPayload, FrameId, Listener, ListenerError,
    ProcessorState, RawInput, Rect, UiContext, UiError, Vec2,
};

type Log = Arc<Mutex<Vec<String>>>;

fn recorder(log: &Log, name: &str) -> Listener {
    let log = log.clone();
    let name = name.to_owned();
    Listener::infallible(move |_, _| log.lock().unwrap().push(name.clone()))
}

fn setup() -> (UiContext, FrameId, ComponentId) {
    let mut ui = UiContext::new();
    let frame = ui.create_frame(Vec2::new(100.0, 100.0));
    let target = ui.panel(Rect::new(0.0, 0.0, 10.0, 10.0));
    let root = ui.container(frame).unwrap();
    ui.add_child(root, target).unwrap();
    (ui, frame, target)
}

fn scroll(target: ComponentId, frame: FrameId) -> Event {
    Event::new(
        target,
        frame,
        EventPayload::Scroll {
            x_offset: 0.0,
            y_offset: 1.0,
        },
    )
}

#[test]
fn test_listeners_fire_in_registration_order_once() {
    let (mut ui, frame, target) = setup();
    let log = Log::default();
    for name in ["l1", "l2", "l3", "l4"] {
        ui.add_listener(target, EventKind::Scroll, recorder(&log, name));
    }
    ui.add_listener(target, EventKind::Key, recorder(&log, "key"));

    ui.push_event(scroll(target, frame));
    let stats = ui.process_events();

    assert_eq!(*log.lock().unwrap(), vec!["l1", "l2", "l3", "l4"]);
    assert_eq!(stats.dispatched, 1);
    assert_eq!(stats.listeners_invoked, 4);
}

#[test]
fn test_events_are_fifo() {
    let (mut ui, frame, target) = setup();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    ui.add_listener(
        target,
        EventKind::Scroll,
        Listener::infallible(move |event, _| {
            if let EventPayload::Scroll { y_offset, .. } = event.payload {
                sink.lock().unwrap().push(y_offset);
            }
        }),
    );

    for i in 0..5 {
        ui.push_event(Event::new(
            target,
            frame,
            EventPayload::Scroll {
                x_offset: 0.0,
                y_offset: i as f32,
            },
        ));
    }
    ui.process_events();

    assert_eq!(*seen.lock().unwrap(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_events_pushed_during_dispatch_wait_for_next_cycle() {
    let (mut ui, frame, target) = setup();
    let log = Log::default();
    ui.add_listener(
        target,
        EventKind::Scroll,
        Listener::infallible(move |event, ctx| {
            ctx.push_event(Event::new(event.target, event.frame, EventPayload::Focus { focused: true }));
        }),
    );
    ui.add_listener(target, EventKind::Focus, recorder(&log, "focus"));

    ui.push_event(scroll(target, frame));
    ui.process_events();
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(ui.processor().state(), ProcessorState::Queued);

    ui.process_events();
    assert_eq!(*log.lock().unwrap(), vec!["focus"]);
    assert_eq!(ui.processor().state(), ProcessorState::Empty);
}

#[test]
fn test_stale_target_is_dropped() {
    let (mut ui, frame, target) = setup();
    let log = Log::default();
    ui.add_listener(target, EventKind::Scroll, recorder(&log, "scroll"));
    ui.push_event(scroll(target, frame));

    ui.destroy_component(target).unwrap();
    let stats = ui.process_events();

    assert_eq!(stats.dropped, 1);
    assert_eq!(stats.dispatched, 0);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_target_destroyed_by_earlier_event_is_dropped() {
    let (mut ui, frame, target) = setup();
    let log = Log::default();
    let killer = ui.panel(Rect::ZERO);
    ui.add_listener(
        killer,
        EventKind::Scroll,
        Listener::new(move |_, ctx| Ok(ctx.tree_mut().destroy(target)?)),
    );
    ui.add_listener(target, EventKind::Scroll, recorder(&log, "scroll"));

    ui.push_event(scroll(killer, frame));
    ui.push_event(scroll(target, frame));
    let stats = ui.process_events();

    assert_eq!(stats.dispatched, 1);
    assert_eq!(stats.dropped, 1);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_failing_listener_does_not_stop_others() {
    let (mut ui, frame, target) = setup();
    let log = Log::default();
    ui.add_listener(target, EventKind::Scroll, recorder(&log, "first"));
    ui.add_listener(
        target,
        EventKind::Scroll,
        Listener::new(|_, _| Err(ListenerError::new("nope"))),
    );
    ui.add_listener(
        target,
        EventKind::Scroll,
        Listener::new(|_, _| panic!("listener panic")),
    );
    ui.add_listener(target, EventKind::Scroll, recorder(&log, "last"));

    ui.push_event(scroll(target, frame));
    let stats = ui.process_events();

    assert_eq!(*log.lock().unwrap(), vec!["first", "last"]);
    assert_eq!(stats.listener_failures, 2);
}

#[test]
fn test_removal_during_dispatch_applies_to_next_pass() {
    let (mut ui, frame, target) = setup();
    let log = Log::default();
    let second = recorder(&log, "second");
    let to_remove = second.clone();
    ui.add_listener(
        target,
        EventKind::Scroll,
        Listener::infallible(move |event, ctx| {
            if let Some(component) = ctx.component_mut(event.target) {
                component.listeners.remove_listener(EventKind::Scroll, &to_remove);
            }
        }),
    );
    ui.add_listener(target, EventKind::Scroll, second);

    ui.push_event(scroll(target, frame));
    ui.process_events();
    assert_eq!(*log.lock().unwrap(), vec!["second"]);

    ui.push_event(scroll(target, frame));
    ui.process_events();
    assert_eq!(*log.lock().unwrap(), vec!["second"]);
}

#[test]
fn test_duplicate_registration_and_removal() {
    let (mut ui, frame, target) = setup();
    let log = Log::default();
    let listener = recorder(&log, "dup");
    ui.add_listener(target, EventKind::Scroll, listener.clone());
    ui.add_listener(target, EventKind::Scroll, listener.clone());

    ui.push_event(scroll(target, frame));
    ui.process_events();
    assert_eq!(log.lock().unwrap().len(), 2);

    assert!(ui.remove_listener(target, EventKind::Scroll, &listener));
    ui.push_event(scroll(target, frame));
    ui.process_events();
    assert_eq!(log.lock().unwrap().len(), 3);
}

#[test]
fn test_background_senders() {
    let (mut ui, frame, target) = setup();
    let log = Log::default();
    ui.add_listener(target, EventKind::Scroll, recorder(&log, "scroll"));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let sender = ui.sender();
            std::thread::spawn(move || {
                for _ in 0..25 {
                    sender.push(scroll(target, frame));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = ui.tick();
    assert_eq!(stats.dispatched, 100);
    assert_eq!(log.lock().unwrap().len(), 100);
}

#[test]
fn test_destroy_frame_discards_queued_events() {
    let (mut ui, frame, target) = setup();
    let other = ui.create_frame(Vec2::new(10.0, 10.0));
    let survivor = ui.panel(Rect::ZERO);
    ui.push_event(scroll(target, frame));
    ui.push_event(scroll(survivor, other));

    ui.destroy_frame(frame).unwrap();

    assert_eq!(ui.processor().pending_len(), 1);
    assert_eq!(ui.process_events().dispatched, 1);
}

#[test]
fn test_listener_cannot_destroy_layer_container() {
    let (mut ui, frame, target) = setup();
    let root = ui.container(frame).unwrap();
    let outcome = Arc::new(Mutex::new(None));
    let sink = outcome.clone();
    ui.add_listener(
        target,
        EventKind::Scroll,
        Listener::infallible(move |_, ctx| {
            *sink.lock().unwrap() = Some(ctx.tree_mut().destroy(root));
        }),
    );

    ui.push_event(scroll(target, frame));
    ui.process_events();

    assert_eq!(*outcome.lock().unwrap(), Some(Err(UiError::LayerContainer(root))));
    assert!(ui.component(root).is_some());
    let panel = ui.panel(Rect::ZERO);
    assert_eq!(ui.add_child(root, panel), Ok(()));
    assert_eq!(ui.hit_test(frame, Vec2::new(50.0, 50.0)), Some(root));
}

#[test]
fn test_frame_destroyed_by_listener_is_cleaned_up() {
    let (mut ui, frame, target) = setup();
    let other = ui.create_frame(Vec2::new(50.0, 50.0));
    let survivor = ui.panel(Rect::ZERO);
    let log = Log::default();
    ui.add_listener(survivor, EventKind::Scroll, recorder(&log, "late"));
    ui.add_listener(
        target,
        EventKind::Scroll,
        Listener::new(move |_, ctx| {
            let (tree, frames) = ctx.split_mut();
            Ok(frames.destroy_frame(tree, other)?)
        }),
    );
    assert!(ui.input_router(other).is_some());

    ui.push_event(scroll(target, frame));
    ui.push_event(scroll(survivor, other));
    let stats = ui.process_events();

    assert_eq!(stats.dispatched, 1);
    assert_eq!(stats.dropped, 1);
    assert!(log.lock().unwrap().is_empty());
    assert!(ui.input_router(other).is_none());
    assert_eq!(ui.handle_input(other, RawInput::CursorMoved(Vec2::new(1.0, 1.0))), 0);
    assert!(ui.input_router(frame).is_some());
}

#[test]
fn test_listeners_observe_draining_state() {
    let (mut ui, frame, target) = setup();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    ui.add_listener(
        target,
        EventKind::Scroll,
        Listener::infallible(move |event, ctx| {
            sink.lock().unwrap().push((ctx.processor_state(), ctx.pending_len()));
            ctx.push_event(Event::new(event.target, event.frame, EventPayload::Focus { focused: true }));
            sink.lock().unwrap().push((ctx.processor_state(), ctx.pending_len()));
        }),
    );

    ui.push_event(scroll(target, frame));
    ui.process_events();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![(ProcessorState::Draining, 0), (ProcessorState::Draining, 1)]
    );
    assert_eq!(ui.processor().state(), ProcessorState::Queued);
}
