use tractor_rs::{setup, ActorSystem, Behavior};

/// Returning `Stopped` straight from `Setup` tears down cleanly without the
/// handler ever being invoked.
#[tokio::test(flavor = "multi_thread")]
async fn stopped_from_setup_never_invokes_a_handler() {
    let mut system =
        ActorSystem::new(setup(|_ctx| Box::pin(async move { Behavior::Stopped }))).expect("valid system name");

    system.wait().await;
}

/// Returning `Stopped` from the very first message also tears down cleanly,
/// with no further handler invocation for anything already queued behind it.
#[tokio::test(flavor = "multi_thread")]
async fn stopped_from_first_message_ends_dispatch() {
    #[derive(Debug)]
    struct Any;

    let mut system = ActorSystem::new(setup(|_ctx| {
        Box::pin(async move {
            Behavior::receive(|_ctx, msg| {
                Box::pin(async move {
                    assert!(msg.is::<Any>());
                    Behavior::Stopped
                })
            })
        })
    }))
    .expect("valid system name");

    let root = system.root();
    root.tell(system.context(), Any).await;
    root.tell(system.context(), Any).await;

    system.wait().await;
}
