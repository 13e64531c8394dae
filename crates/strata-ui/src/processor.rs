//! Deferred event delivery.
//!
//! Events are queued with [`EventProcessor::push_event`] (or through a cloned
//! [`EventSender`] from another thread) and delivered in FIFO order by
//! [`EventProcessor::process_events`]. The queue is swapped out at the start
//! of a cycle, so events emitted by listeners are delivered on the next cycle.

use std::any::Any;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use strata_core::config::Config;
use strata_core::profiling::{profile_function, profile_scope};

use crate::component::{Component, ComponentId, ComponentTree};
use crate::event::Event;
use crate::frame::{FrameId, Frames};

type Queue = Arc<Mutex<Vec<Event>>>;

fn lock(queue: &Queue) -> MutexGuard<'_, Vec<Event>> {
    // A panicking producer cannot leave the vector half-written.
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cloneable handle for pushing events from anywhere, including other threads.
#[derive(Clone)]
pub struct EventSender {
    queue: Queue,
}

impl EventSender {
    pub fn push(&self, event: Event) {
        lock(&self.queue).push(event);
    }
}

/// Observable state of the processor. Listeners see
/// [`ProcessorState::Draining`] through [`EventContext::processor_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    Empty,
    Queued,
    Draining,
}

/// Counters for one [`EventProcessor::process_events`] cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Events whose target was alive when dispatched.
    pub dispatched: usize,
    /// Events dropped because their target or frame no longer exists.
    pub dropped: usize,
    pub listeners_invoked: usize,
    /// Listeners that returned an error or panicked.
    pub listener_failures: usize,
}

impl DispatchStats {
    fn merge(&mut self, other: DispatchStats) {
        self.dispatched += other.dispatched;
        self.dropped += other.dropped;
        self.listeners_invoked += other.listeners_invoked;
        self.listener_failures += other.listener_failures;
    }
}

/// Mutable view handed to listeners while an event is dispatched.
pub struct EventContext<'a> {
    tree: &'a mut ComponentTree,
    frames: &'a mut Frames,
    processor: &'a EventProcessor,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(
        tree: &'a mut ComponentTree,
        frames: &'a mut Frames,
        processor: &'a EventProcessor,
    ) -> Self {
        Self {
            tree,
            frames,
            processor,
        }
    }

    pub fn tree(&self) -> &ComponentTree {
        &*self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ComponentTree {
        &mut *self.tree
    }

    pub fn frames(&self) -> &Frames {
        &*self.frames
    }

    pub fn frames_mut(&mut self) -> &mut Frames {
        &mut *self.frames
    }

    /// Both stores at once, for frame and layer operations that also touch
    /// components.
    pub fn split_mut(&mut self) -> (&mut ComponentTree, &mut Frames) {
        (&mut *self.tree, &mut *self.frames)
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.tree.get(id)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.tree.get_mut(id)
    }

    /// Queue an event for the next cycle.
    pub fn push_event(&self, event: Event) {
        self.processor.push_event(event);
    }

    pub fn sender(&self) -> EventSender {
        self.processor.sender()
    }

    pub fn processor_state(&self) -> ProcessorState {
        self.processor.state()
    }

    /// Events waiting for the next cycle.
    pub fn pending_len(&self) -> usize {
        self.processor.pending_len()
    }
}

/// FIFO event queue with listener dispatch.
pub struct EventProcessor {
    sender: EventSender,
    draining: AtomicBool,
    capacity: usize,
    catch_panics: bool,
}

struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl EventProcessor {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            sender: EventSender {
                queue: Arc::new(Mutex::new(Vec::with_capacity(config.event_queue_capacity))),
            },
            draining: AtomicBool::new(false),
            capacity: config.event_queue_capacity,
            catch_panics: config.catch_listener_panics,
        }
    }

    pub fn push_event(&self, event: Event) {
        tracing::trace!("queued {:?} for {}", event.kind(), event.target);
        self.sender.push(event);
    }

    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }

    pub fn pending_len(&self) -> usize {
        lock(&self.sender.queue).len()
    }

    pub fn state(&self) -> ProcessorState {
        if self.draining.load(Ordering::Acquire) {
            ProcessorState::Draining
        } else if self.pending_len() == 0 {
            ProcessorState::Empty
        } else {
            ProcessorState::Queued
        }
    }

    /// Drop every queued event addressed to `frame`.
    pub fn discard_frame(&self, frame: FrameId) -> usize {
        let mut queue = lock(&self.sender.queue);
        let before = queue.len();
        queue.retain(|event| event.frame != frame);
        before - queue.len()
    }

    /// Drop every queued event.
    pub fn clear(&self) {
        lock(&self.sender.queue).clear();
    }

    /// Deliver every event queued before this call, in order.
    pub fn process_events(&self, tree: &mut ComponentTree, frames: &mut Frames) -> DispatchStats {
        profile_function!();
        let mut stats = DispatchStats::default();
        if self.draining.swap(true, Ordering::AcqRel) {
            tracing::warn!("process_events called while already draining");
            return stats;
        }
        let _guard = DrainGuard(&self.draining);

        let events = mem::replace(
            &mut *lock(&self.sender.queue),
            Vec::with_capacity(self.capacity),
        );
        for event in events {
            stats.merge(self.dispatch(&event, tree, frames));
        }

        if stats.dropped > 0 || stats.listener_failures > 0 {
            tracing::debug!(
                "dispatch cycle: {} dispatched, {} dropped, {} listener failures",
                stats.dispatched,
                stats.dropped,
                stats.listener_failures
            );
        }
        stats
    }

    fn dispatch(&self, event: &Event, tree: &mut ComponentTree, frames: &mut Frames) -> DispatchStats {
        profile_scope!("dispatch_event");
        let mut stats = DispatchStats::default();
        let kind = event.kind();

        if !frames.contains_frame(event.frame) {
            tracing::debug!("dropping {:?}: {} no longer exists", kind, event.frame);
            stats.dropped = 1;
            return stats;
        }
        let Some(component) = tree.get(event.target) else {
            tracing::debug!("dropping {:?}: target {} no longer exists", kind, event.target);
            stats.dropped = 1;
            return stats;
        };
        stats.dispatched = 1;

        let listeners = component.listeners.listeners(kind);
        for listener in listeners {
            let mut ctx = EventContext::new(tree, frames, self);
            stats.listeners_invoked += 1;
            let outcome = if self.catch_panics {
                panic::catch_unwind(AssertUnwindSafe(|| listener.call(event, &mut ctx)))
            } else {
                Ok(listener.call(event, &mut ctx))
            };
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!("{:?} listener on {} failed: {}", kind, event.target, err);
                    stats.listener_failures += 1;
                }
                Err(payload) => {
                    tracing::warn!(
                        "{:?} listener on {} panicked: {}",
                        kind,
                        event.target,
                        panic_message(payload.as_ref())
                    );
                    stats.listener_failures += 1;
                }
            }
        }
        stats
    }
}

impl Default for EventProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "<non-string panic>"
    }
}
