use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use slog::error;

use crate::behavior::{Behavior, MessageHandler, PostInit, PostStop, PreStop, SetupHandler};
use crate::context::ActorContext;
use crate::envelope::{Command, Envelope};
use crate::mailbox::Item;
use crate::payload::Payload;

/// Drives one actor's lifecycle end to end: Setup, Active dispatch, Reap,
/// then notification of the parent and any watchers. Spawned once per actor
/// by `ActorContext::spawn`; returns only once the actor has fully stopped.
pub(crate) async fn run(mut ctx: ActorContext, setup: SetupHandler) {
    let log = ctx.system.log.clone();

    // --- 1. Setup ---
    let setup_result = invoke_setup(&mut ctx, setup, &log).await;

    let mut handler = match setup_result {
        Behavior::Receive(h) => Some(h),
        Behavior::Same => {
            error!(log, "Setup returned Same, which has no predecessor to keep; stopping");
            None
        }
        Behavior::Stopped => None,
    };

    if let Some(h) = handler.as_mut() {
        deliver_signal(&mut ctx, h, PostInit, &log).await;

        // --- 2/3/4. Active ---
        'active: loop {
            match ctx.mailbox.take().await {
                Item::Envelope(Envelope { sender, payload }) => {
                    ctx.remember_sender(sender);
                    let next = invoke(&mut ctx, h, payload, &log).await;
                    ctx.clear_sender();
                    match next {
                        Behavior::Same => {}
                        Behavior::Receive(new_handler) => *h = new_handler,
                        Behavior::Stopped => break 'active,
                    }
                }
                Item::Command(cmd) => match cmd {
                    Command::Listen {
                        watcher,
                        notification,
                    } => ctx.push_listener(watcher, notification),
                    Command::ChildTerminated(child) => ctx.reap_child(&child).await,
                    Command::Terminate => break 'active,
                },
            }
        }
    }

    // --- 4. Drain ---
    // Non-blocking: only commands still sitting in the channel are honoured
    // here (Listen/ChildTerminated), a queued Terminate is discarded, and no
    // user envelope is read. Without this, a Listen that lands in the window
    // between Active exiting and Reap starting would never be picked up for
    // a childless actor, since Reap's own drain loop only runs while it has
    // live children left to wait on.
    while let Some(cmd) = ctx.mailbox.try_take_command() {
        match cmd {
            Command::Listen {
                watcher,
                notification,
            } => ctx.push_listener(watcher, notification),
            Command::ChildTerminated(child) => ctx.reap_child(&child).await,
            Command::Terminate => {}
        }
    }

    // --- 5. PreStop ---
    if let Some(h) = handler.as_mut() {
        deliver_signal(&mut ctx, h, PreStop, &log).await;
    }

    // --- 6. Reap ---
    ctx.terminate_all_children().await;
    while ctx.has_live_children() {
        match ctx.mailbox.next_command().await {
            Command::ChildTerminated(child) => ctx.reap_child(&child).await,
            Command::Listen {
                watcher,
                notification,
            } => ctx.push_listener(watcher, notification),
            Command::Terminate => {}
        }
    }

    // --- 7. PostStop ---
    if let Some(h) = handler.as_mut() {
        deliver_signal(&mut ctx, h, PostStop, &log).await;
    }

    // --- 8. Notify parent and watchers ---
    slog::debug!(log, "actor stopped"; "actor" => format!("{:?}", ctx.self_ref()));
    let self_ref = ctx.self_ref().cloned();
    if let Some(parent) = ctx.parent_ref_opt() {
        let parent = parent.clone();
        let child = self_ref.clone().expect("a non-root actor always has a self ref");
        parent.tell_command(Command::ChildTerminated(child)).await;
    }
    for listener in ctx.take_listeners() {
        listener
            .watcher
            .tell_payload(self_ref.clone(), listener.notification)
            .await;
    }
}

/// `invoke`/`invoke_setup` catch a handler panic, log it and fold it into
/// `Behavior::Stopped` instead of tearing down the whole task: one bad
/// message must not take the actor's children and watchers down with it
/// without a chance to notify them.
async fn invoke(
    ctx: &mut ActorContext,
    handler: &mut MessageHandler,
    payload: Payload,
    log: &slog::Logger,
) -> Behavior {
    let fut = (*handler)(ctx, payload);
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(behavior) => behavior,
        Err(_) => {
            error!(log, "actor panicked while handling a message; stopping");
            Behavior::Stopped
        }
    }
}

async fn invoke_setup(ctx: &mut ActorContext, setup: SetupHandler, log: &slog::Logger) -> Behavior {
    let fut = setup(ctx);
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(behavior) => behavior,
        Err(_) => {
            error!(log, "actor panicked during Setup; stopping");
            Behavior::Stopped
        }
    }
}

async fn deliver_signal<T: crate::payload::Message>(
    ctx: &mut ActorContext,
    handler: &mut MessageHandler,
    signal: T,
    log: &slog::Logger,
) {
    if !ctx.signals_enabled() {
        return;
    }
    // Signals bypass the sender field (SPEC_FULL.md §4.4): synthesise an
    // envelope with sender = None rather than leaving it unset, so `Sender()`
    // resolves to `None` instead of panicking if a signal handler calls it.
    ctx.remember_sender(None);
    let next = invoke(ctx, handler, Payload::new(signal), log).await;
    ctx.clear_sender();
    if let Behavior::Receive(new_handler) = next {
        *handler = new_handler;
    }
}
