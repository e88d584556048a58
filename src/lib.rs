//! A tiny message-driven actor runtime: bounded mailboxes, behavior
//! combinators, death-watch, ask and stash, built on tokio.

mod actor_ref;
mod behavior;
mod config;
mod context;
mod envelope;
mod mailbox;
mod payload;
mod run_loop;
mod system;

pub use actor_ref::ActorRef;
pub use behavior::{
    setup, Behavior, BehaviorFuture, MessageHandler, PostInit, PostStop, PreStop, SetupHandler,
    Terminated,
};
pub use config::{load_config, Config, LogLevel};
pub use context::ActorContext;
pub use mailbox::StashBuffer;
pub use payload::{Message, Payload};
pub use system::{ActorSystem, SystemBuilder, SystemError};
