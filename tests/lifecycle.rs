use tokio::sync::mpsc;

use tractor_rs::{setup, ActorSystem, Behavior, PostInit, PostStop, PreStop};

#[derive(Debug)]
struct Stop;

/// With signals opted in, the observed sequence is exactly
/// `PostInit` -> (user messages) -> `PreStop` -> `PostStop`.
#[tokio::test(flavor = "multi_thread")]
async fn signals_are_delivered_in_order_around_user_messages() {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let mut system = ActorSystem::new(setup(move |ctx| {
        ctx.deliver_signals(true);
        Box::pin(async move {
            let tx = tx.clone();
            Behavior::receive(move |_ctx, msg| {
                let tx = tx.clone();
                Box::pin(async move {
                    if msg.is::<PostInit>() {
                        let _ = tx.send("post_init".into());
                        Behavior::Same
                    } else if msg.is::<PreStop>() {
                        let _ = tx.send("pre_stop".into());
                        Behavior::Same
                    } else if msg.is::<PostStop>() {
                        let _ = tx.send("post_stop".into());
                        Behavior::Same
                    } else if msg.is::<Stop>() {
                        let _ = tx.send("stop".into());
                        Behavior::Stopped
                    } else {
                        Behavior::Same
                    }
                })
            })
        })
    }))
    .expect("valid system name");

    let root = system.root();
    root.tell(system.context(), Stop).await;
    system.wait().await;

    let mut seen = Vec::new();
    rx.close();
    while let Some(event) = rx.recv().await {
        seen.push(event);
    }
    assert_eq!(seen, vec!["post_init", "stop", "pre_stop", "post_stop"]);
}

/// `deliver_signals` defaults to off: no PostInit/PreStop/PostStop ever
/// reaches the handler unless the actor opts in.
#[tokio::test(flavor = "multi_thread")]
async fn signals_are_not_delivered_by_default() {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let mut system = ActorSystem::new(setup(move |_ctx| {
        Box::pin(async move {
            let tx = tx.clone();
            Behavior::receive(move |_ctx, msg| {
                let tx = tx.clone();
                Box::pin(async move {
                    if msg.is::<Stop>() {
                        let _ = tx.send("stop".into());
                        Behavior::Stopped
                    } else {
                        let _ = tx.send("signal".into());
                        Behavior::Same
                    }
                })
            })
        })
    }))
    .expect("valid system name");

    let root = system.root();
    root.tell(system.context(), Stop).await;
    system.wait().await;

    rx.close();
    let mut seen = Vec::new();
    while let Some(event) = rx.recv().await {
        seen.push(event);
    }
    assert_eq!(seen, vec!["stop"]);
}
