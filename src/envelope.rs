use crate::actor_ref::ActorRef;
use crate::payload::Payload;

/// A `(sender, payload)` pair transported through a mailbox.
///
/// `sender` is `None` for messages sent by the implicit system root, and
/// also for synthesized lifecycle signals (`PostInit`/`PreStop`/`PostStop`).
pub struct Envelope {
    pub sender: Option<ActorRef>,
    pub payload: Payload,
}

/// Internal control messages, never visible to user handler code.
///
/// A closed set, matching `tractor/system.go`'s `terminateCommand`,
/// `listenCommand` and `childTerminatedCommand`.
pub enum Command {
    /// Ask the actor to stop reading further user messages.
    Terminate,
    /// Register a death-watch subscription: `watcher` wants `notification`
    /// delivered once this actor terminates.
    Listen {
        watcher: ActorRef,
        notification: Payload,
    },
    /// Sent by a child to its parent once the child's run loop has fully
    /// exited.
    ChildTerminated(ActorRef),
}
