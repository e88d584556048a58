use std::collections::VecDeque;

use tokio::sync::mpsc::{self, Receiver, Sender};

use crate::actor_ref::ActorRef;
use crate::envelope::{Command, Envelope};

/// One item taken off the mailbox in the Active state: either a user
/// envelope or an internal command.
pub enum Item {
    Envelope(Envelope),
    Command(Command),
}

/// The aggregate riker-fashion "mailbox coupling" note in DESIGN.md refers
/// to: the message queue, the command queue and the stash, kept together
/// because the run loop always reads them as a unit. Owned directly by
/// `ActorContext` — see DESIGN.md for why no `Rc`/`RefCell` wrapper is
/// needed here.
pub struct Mailbox {
    envelope_rx: Receiver<Envelope>,
    command_rx: Receiver<Command>,
    stash: VecDeque<Envelope>,
}

impl Mailbox {
    pub fn new(
        mailbox_capacity: usize,
        command_capacity: usize,
    ) -> (Sender<Envelope>, Sender<Command>, Mailbox) {
        let (envelope_tx, envelope_rx) = mpsc::channel(mailbox_capacity.max(1));
        let (command_tx, command_rx) = mpsc::channel(command_capacity.max(1));
        let mailbox = Mailbox {
            envelope_rx,
            command_rx,
            stash: VecDeque::new(),
        };
        (envelope_tx, command_tx, mailbox)
    }

    /// Active-state take: stash head first, otherwise race the two channels
    /// fairly. Both channel senders are held by at least one `ActorRef`
    /// (this actor's own, reachable by the rest of the system) for as long
    /// as the actor itself is alive, so `recv()` only returns `None` once
    /// every sender has been dropped, i.e. never while this task is the one
    /// running it.
    pub async fn take(&mut self) -> Item {
        if let Some(envelope) = self.stash.pop_front() {
            return Item::Envelope(envelope);
        }

        tokio::select! {
            cmd = self.command_rx.recv() => Item::Command(cmd.expect("command channel sender dropped while actor is running")),
            env = self.envelope_rx.recv() => Item::Envelope(env.expect("envelope channel sender dropped while actor is running")),
        }
    }

    /// Drain-state, non-blocking: only commands are read here.
    pub fn try_take_command(&mut self) -> Option<Command> {
        self.command_rx.try_recv().ok()
    }

    /// Reap-state take: block for the next command only. User envelopes sent
    /// to a terminating actor are never read off the channel here — they sit
    /// until the sender side notices the channel is gone, same as any other
    /// post-termination send.
    pub async fn next_command(&mut self) -> Command {
        self.command_rx
            .recv()
            .await
            .expect("command channel sender dropped while actor is running")
    }

    /// Push a previously-stashed run of envelopes so they are consumed
    /// ahead of anything still sitting in the mailbox channel.
    pub fn unstash(&mut self, envelopes: Vec<Envelope>) {
        self.stash.extend(envelopes);
    }
}

/// A per-context buffer of deferred envelopes, reinserted at the head of
/// the input stream on demand.
///
/// `size` is advisory, used only to presize the backing `Vec`; unlike the
/// bounded mailbox/command channels, the stash has no hard capacity.
pub struct StashBuffer {
    buffer: Vec<Envelope>,
}

impl StashBuffer {
    pub(crate) fn new(size: usize) -> Self {
        StashBuffer {
            buffer: Vec::with_capacity(size),
        }
    }

    /// Record an envelope, preserving the sender of the message currently
    /// being dispatched.
    pub fn stash(&mut self, ctx: &mut super::context::ActorContext, payload: crate::payload::Payload) {
        let sender = ctx.sender().cloned();
        self.buffer.push(Envelope { sender, payload });
    }

    /// Push the whole buffer to the front of the mailbox's stash area and
    /// return `handler` as the next behavior.
    pub fn unstash_all(
        &mut self,
        ctx: &mut super::context::ActorContext,
        handler: crate::behavior::Behavior,
    ) -> crate::behavior::Behavior {
        let drained: Vec<Envelope> = self.buffer.drain(..).collect();
        ctx.mailbox.unstash(drained);
        handler
    }

    /// Like `unstash_all`, but only the first `count` buffered envelopes.
    pub fn unstash(
        &mut self,
        ctx: &mut super::context::ActorContext,
        handler: crate::behavior::Behavior,
        count: usize,
    ) -> crate::behavior::Behavior {
        let count = count.min(self.buffer.len());
        let drained: Vec<Envelope> = self.buffer.drain(..count).collect();
        ctx.mailbox.unstash(drained);
        handler
    }
}

/// A live child: its ref (for Tell/Terminate) and the task handle joined
/// during Reap.
pub struct ChildEntry {
    pub actor_ref: ActorRef,
    pub handle: tokio::task::JoinHandle<()>,
}

/// A registered death-watch subscription.
pub struct Listener {
    pub watcher: ActorRef,
    pub notification: crate::payload::Payload,
}
