use tokio::sync::mpsc;

use tractor_rs::{setup, ActorSystem, Behavior, Terminated};

#[derive(Debug)]
struct Boom;

/// A handler panic stops only that actor; the parent keeps running and, if
/// it watched the child, observes the termination like any other stop.
#[tokio::test(flavor = "multi_thread")]
async fn panicking_child_does_not_take_down_the_parent() {
    let (tx, mut rx) = mpsc::unbounded_channel::<()>();

    let mut system = ActorSystem::new(setup(move |ctx| {
        Box::pin(async move {
            let child = ctx.spawn(setup(|_ctx| {
                Box::pin(async move {
                    Behavior::receive(|_ctx, msg| {
                        Box::pin(async move {
                            assert!(msg.is::<Boom>());
                            panic!("boom");
                        })
                    })
                })
            }));
            ctx.watch(&child).await;
            child.tell(ctx, Boom).await;

            Behavior::receive(move |_ctx, msg| {
                let tx = tx.clone();
                Box::pin(async move {
                    assert!(msg.is::<Terminated>(), "the parent observes the panic as a stop");
                    let _ = tx.send(());
                    Behavior::Stopped
                })
            })
        })
    }))
    .expect("valid system name");

    rx.recv().await.expect("the parent is still alive to receive Terminated");
    system.wait().await;
}

/// A panic during Setup is folded into Stopped; the actor still tears down
/// cleanly (no teardown step is skipped).
#[tokio::test(flavor = "multi_thread")]
async fn panic_during_setup_still_stops_cleanly() {
    let mut system = ActorSystem::new(setup(|_ctx| {
        Box::pin(async move {
            panic!("setup blew up");
        })
    }))
    .expect("valid system name");

    system.wait().await;
}
