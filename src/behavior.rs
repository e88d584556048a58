use std::future::Future;
use std::pin::Pin;

use crate::context::ActorContext;
use crate::payload::Payload;

/// The future a message handler or a setup handler returns, borrowing the
/// `ActorContext` for exactly the span of one dispatch.
///
/// The run loop owns a single `ActorContext` for the actor's whole lifetime
/// and only ever lends it out by `&mut` for the duration of one Setup or
/// Receive call, so a handler panic unwinds just that call — the context
/// itself, including the mailbox, lives on in the run loop's stack frame and
/// is never dropped by the unwind. Expressing that in the type needs a
/// higher-ranked `for<'a>` bound: callers box their own future explicitly
/// (`Box::pin(async move { .. })`) rather than `Behavior::receive` boxing a
/// named `Fut` for them, since no single `Fut` type can vary with the
/// per-call lifetime `'a`.
pub type BehaviorFuture<'a> = Pin<Box<dyn Future<Output = Behavior> + Send + 'a>>;

/// `(context, message) -> Behavior`, invoked once per mailbox item.
pub type MessageHandler = Box<dyn for<'a> FnMut(&'a mut ActorContext, Payload) -> BehaviorFuture<'a> + Send>;

/// `context -> Behavior`, invoked exactly once before the first message.
pub type SetupHandler = Box<dyn for<'a> FnOnce(&'a mut ActorContext) -> BehaviorFuture<'a> + Send>;

/// The dispatch state of an actor.
///
/// Unlike the originating Go program's `Behavior` (a nilable interface, so a
/// forgotten return silently meant "keep going" or "stop"), this is a
/// non-nullable enum: handler code always returns one of the three variants
/// explicitly. See DESIGN.md for the redesign note.
pub enum Behavior {
    /// The next message goes to `handler`, which yields the successor.
    Receive(MessageHandler),
    /// Keep the current `Receive` handler.
    Same,
    /// Stop the actor after this step.
    Stopped,
}

impl Behavior {
    pub fn is_stopped(&self) -> bool {
        matches!(self, Behavior::Stopped)
    }

    /// Build a `Receive` from a closure that returns an already-boxed future.
    ///
    /// ```ignore
    /// Behavior::receive(|ctx, msg| Box::pin(async move {
    ///     Behavior::Same
    /// }))
    /// ```
    pub fn receive<F>(f: F) -> Behavior
    where
        F: for<'a> FnMut(&'a mut ActorContext, Payload) -> BehaviorFuture<'a> + Send + 'static,
    {
        Behavior::Receive(Box::new(f))
    }
}

/// Build a `SetupHandler` from a closure that returns an already-boxed future.
pub fn setup<F>(f: F) -> SetupHandler
where
    F: for<'a> FnOnce(&'a mut ActorContext) -> BehaviorFuture<'a> + Send + 'static,
{
    Box::new(f)
}

/// Delivered once, immediately after `Setup`, when `deliver_signals(true)`.
#[derive(Debug, Clone, Copy)]
pub struct PostInit;

/// Delivered once, before children are reaped, when `deliver_signals(true)`.
#[derive(Debug, Clone, Copy)]
pub struct PreStop;

/// Delivered once, after all children have been reaped, when
/// `deliver_signals(true)`.
#[derive(Debug, Clone, Copy)]
pub struct PostStop;

/// The default death-watch notification; `WatchWith` lets callers substitute
/// any other payload.
#[derive(Debug, Clone)]
pub struct Terminated {
    pub actor_ref: crate::actor_ref::ActorRef,
}
