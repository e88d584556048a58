use tractor_rs::{setup, ActorSystem, Behavior};

#[test]
fn invalid_name_is_rejected_with_a_readable_message() {
    let result = tractor_rs::SystemBuilder::new()
        .name("not a valid name!")
        .create(setup(|_ctx| Box::pin(async move { Behavior::Stopped })));

    let err = result.expect_err("spaces and '!' are not valid in a system name");
    assert_eq!(
        format!("{}", err),
        "invalid actor system name: \"not a valid name!\""
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn a_valid_name_is_accepted() {
    let mut system = ActorSystem::new(setup(|_ctx| Box::pin(async move { Behavior::Stopped })))
        .expect("the default root setup always uses a valid name");
    assert_eq!(system.name(), "tractor");
    system.wait().await;
}
