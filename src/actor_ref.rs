use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::Sender;

use crate::context::ActorContext;
use crate::envelope::{Command, Envelope};
use crate::payload::{Message, Payload};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

struct Inner {
    id: u64,
    envelope_tx: Sender<Envelope>,
    command_tx: Sender<Command>,
}

/// An opaque handle to an actor.
///
/// Identity is the address of the mailbox it points to: two `ActorRef`s
/// compare equal iff they were cloned from the same `spawn` call, matching
/// `tractor/system.go`'s `localActorRef` pointer-equality. Sends through a
/// ref whose actor has already terminated are best-effort and never panic.
#[derive(Clone)]
pub struct ActorRef {
    inner: Arc<Inner>,
}

impl ActorRef {
    pub(crate) fn new(envelope_tx: Sender<Envelope>, command_tx: Sender<Command>) -> Self {
        ActorRef {
            inner: Arc::new(Inner {
                id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
                envelope_tx,
                command_tx,
            }),
        }
    }

    /// Enqueue a user message addressed from `ctx`'s actor. Suspends if the
    /// target's mailbox is full; silently absorbed if the target has
    /// already terminated.
    pub async fn tell<T: Message>(&self, ctx: &ActorContext, msg: T) {
        self.tell_from(ctx.self_ref().cloned(), msg).await;
    }

    /// Like `tell`, but the sender is supplied directly rather than read
    /// from a context. Used to let the implicit system root send the first
    /// message to a freshly-spawned root actor, where there is no context
    /// to read `Self()` from.
    pub async fn tell_from<T: Message>(&self, sender: Option<ActorRef>, msg: T) {
        let envelope = Envelope {
            sender,
            payload: Payload::new(msg),
        };
        let _ = self.inner.envelope_tx.send(envelope).await;
    }

    pub(crate) async fn tell_command(&self, cmd: Command) {
        let _ = self.inner.command_tx.send(cmd).await;
    }

    /// Deliver an already-erased payload, e.g. a stored death-watch
    /// notification that was boxed at `Watch`/`WatchWith` time rather than
    /// at delivery time.
    pub(crate) async fn tell_payload(&self, sender: Option<ActorRef>, payload: Payload) {
        let envelope = Envelope { sender, payload };
        let _ = self.inner.envelope_tx.send(envelope).await;
    }
}

impl PartialEq for ActorRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ActorRef {}

impl Hash for ActorRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.inner) as usize).hash(state);
    }
}

impl fmt::Debug for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorRef(#{})", self.inner.id)
    }
}
