use tokio::sync::oneshot;

use crate::actor_ref::ActorRef;
use crate::behavior::{self, Behavior, SetupHandler};
use crate::envelope::Command;
use crate::mailbox::{ChildEntry, Listener, Mailbox, StashBuffer};
use crate::payload::{Message, Payload};
use crate::system::SystemHandle;

/// The per-actor capability object passed to handler code.
///
/// Owned exclusively by the actor's own run loop; every operation here
/// assumes it is only ever called from that single task (no external
/// synchronisation, per SPEC_FULL.md §4.3).
pub struct ActorContext {
    pub(crate) system: SystemHandle,
    parent_ref: Option<ActorRef>,
    self_ref: Option<ActorRef>,
    children: Vec<ChildEntry>,
    listeners: Vec<Listener>,
    pub(crate) mailbox: Mailbox,
    // `None` while no envelope is being dispatched; `Some(sender)` while one
    // is, where `sender` is itself `None` for the system-root sentinel.
    current_sender: Option<Option<ActorRef>>,
    deliver_signals: bool,
}

impl ActorContext {
    pub(crate) fn new(
        system: SystemHandle,
        parent_ref: Option<ActorRef>,
        self_ref: Option<ActorRef>,
        mailbox: Mailbox,
    ) -> Self {
        ActorContext {
            system,
            parent_ref,
            self_ref,
            children: Vec::new(),
            listeners: Vec::new(),
            mailbox,
            current_sender: None,
            deliver_signals: false,
        }
    }

    /// This actor's own ref, or `None` for the implicit system/root context
    /// returned by `ActorSystem::context()`.
    pub fn self_ref(&self) -> Option<&ActorRef> {
        self.self_ref.as_ref()
    }

    /// The parent's ref. Unspecified for the root context — calling this
    /// there is a programming error.
    pub fn parent_ref(&self) -> &ActorRef {
        self.parent_ref
            .as_ref()
            .expect("parent_ref() must not be called on the root context")
    }

    pub(crate) fn parent_ref_opt(&self) -> Option<&ActorRef> {
        self.parent_ref.as_ref()
    }

    /// The sender of the envelope currently being dispatched. Only defined
    /// while a user-message (or signal) handler is executing.
    pub fn sender(&self) -> Option<&ActorRef> {
        self.current_sender
            .as_ref()
            .expect("sender() called outside of message dispatch")
            .as_ref()
    }

    /// A snapshot of currently-live children.
    pub fn children(&self) -> Vec<ActorRef> {
        self.children.iter().map(|c| c.actor_ref.clone()).collect()
    }

    pub fn deliver_signals(&mut self, value: bool) {
        self.deliver_signals = value;
    }

    pub(crate) fn signals_enabled(&self) -> bool {
        self.deliver_signals
    }

    /// Allocate a new actor, append it to the children list, and start its
    /// run loop on a fresh tokio task.
    pub fn spawn(&mut self, setup: SetupHandler) -> ActorRef {
        let (envelope_tx, command_tx, mailbox) = Mailbox::new(
            self.system.config.mailbox_capacity,
            self.system.config.command_capacity,
        );
        let child_ref = ActorRef::new(envelope_tx, command_tx);
        let child_context = ActorContext::new(
            self.system.clone(),
            self.self_ref.clone(),
            Some(child_ref.clone()),
            mailbox,
        );

        slog::debug!(self.system.log, "actor spawned"; "actor" => format!("{:?}", child_ref));

        let handle = tokio::spawn(crate::run_loop::run(child_context, setup));
        self.children.push(ChildEntry {
            actor_ref: child_ref.clone(),
            handle,
        });
        child_ref
    }

    /// Subscribe to `target`'s termination; the default notification is
    /// `Terminated { actor_ref: target }`.
    pub async fn watch(&mut self, target: &ActorRef) {
        let notification = behavior::Terminated {
            actor_ref: target.clone(),
        };
        self.watch_with(target, notification).await;
    }

    /// Subscribe to `target`'s termination with a custom notification.
    pub async fn watch_with<T: Message>(&mut self, target: &ActorRef, notification: T) {
        let watcher = self
            .self_ref
            .clone()
            .expect("watch() must not be called on the root context");
        target
            .tell_command(Command::Listen {
                watcher,
                notification: Payload::new(notification),
            })
            .await;
    }

    /// Send `msg` to `target` from an ephemeral child, and return a
    /// single-slot channel that resolves with whatever that child is first
    /// told in reply. The reply is addressed to the ephemeral child, not to
    /// this actor.
    pub fn ask<T: Message>(&mut self, target: ActorRef, msg: T) -> oneshot::Receiver<Payload> {
        let (tx, rx) = oneshot::channel::<Payload>();
        let mut tx = Some(tx);

        self.spawn(behavior::setup(move |ctx| {
            Box::pin(async move {
                target.tell(ctx, msg).await;
                Behavior::receive(move |_ctx, payload| {
                    Box::pin(async move {
                        if let Some(tx) = tx.take() {
                            let _ = tx.send(payload);
                        }
                        Behavior::Stopped
                    })
                })
            })
        }));

        rx
    }

    /// A fresh stash buffer, advisory-sized, bound to this context.
    pub fn new_stash(&mut self, size: usize) -> StashBuffer {
        StashBuffer::new(size)
    }

    pub(crate) fn remember_sender(&mut self, sender: Option<ActorRef>) {
        self.current_sender = Some(sender);
    }

    pub(crate) fn clear_sender(&mut self) {
        self.current_sender = None;
    }

    pub(crate) fn push_listener(&mut self, watcher: ActorRef, notification: Payload) {
        self.listeners.push(Listener {
            watcher,
            notification,
        });
    }

    /// Hand over every registered death-watch subscription; called once,
    /// during the final notification step, since each `notification` payload
    /// is consumed exactly once.
    pub(crate) fn take_listeners(&mut self) -> Vec<Listener> {
        std::mem::take(&mut self.listeners)
    }

    /// Remove the child matching `target` from the live list and join its
    /// task. Panics (a protocol fault, per SPEC_FULL.md §7) if `target` is
    /// not a live child — the source's `ChildTerminated` handling has the
    /// same fatal-if-unknown contract.
    pub(crate) async fn reap_child(&mut self, target: &ActorRef) {
        let idx = self
            .children
            .iter()
            .position(|c| &c.actor_ref == target)
            .unwrap_or_else(|| panic!("protocol fault: ChildTerminated for unknown child {:?}", target));
        let entry = self.children.remove(idx);
        let _ = entry.handle.await;
    }

    /// Send `Terminate` to every live child. Part of Reap (State 6); the
    /// actual joins happen as `ChildTerminated` commands are drained.
    pub(crate) async fn terminate_all_children(&self) {
        for child in &self.children {
            child.actor_ref.tell_command(Command::Terminate).await;
        }
    }

    pub(crate) fn has_live_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Remove and return `target`'s task handle without joining it — used
    /// only by `ActorSystem::wait()`, which does its own joining.
    pub(crate) fn take_child_handle(&mut self, target: &ActorRef) -> Option<tokio::task::JoinHandle<()>> {
        let idx = self.children.iter().position(|c| &c.actor_ref == target)?;
        Some(self.children.remove(idx).handle)
    }
}
