use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use slog::{o, Drain, Logger};

use crate::actor_ref::ActorRef;
use crate::behavior::SetupHandler;
use crate::config::{load_config, Config};
use crate::context::ActorContext;
use crate::mailbox::Mailbox;

pub(crate) struct Inner {
    pub(crate) config: Config,
    pub(crate) log: Logger,
}

/// A cheaply-cloned handle shared by `ActorSystem` and every `ActorContext`
/// spawned under it, carrying the config and logger every context needs at
/// spawn time.
#[derive(Clone)]
pub(crate) struct SystemHandle(Arc<Inner>);

impl SystemHandle {
    fn new(config: Config, log: Logger) -> Self {
        SystemHandle(Arc::new(Inner { config, log }))
    }
}

impl Deref for SystemHandle {
    type Target = Inner;
    fn deref(&self) -> &Inner {
        &self.0
    }
}

/// Build a default `slog::Logger`: an async-drained, leveled term drain, in
/// the manner of this runtime's antecedent's logger bootstrap. `cfg.debug`
/// additionally turns on a bit more chatter at construction time, matching
/// the source's own use of the `debug` flag.
fn default_log(cfg: &Config) -> Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog::LevelFilter::new(drain, cfg.log_level.to_slog()).fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    Logger::root(drain, o!())
}

/// Constructs a name/config/logger before creating the `ActorSystem`, in the
/// manner of this runtime's antecedent's `SystemBuilder`.
#[derive(Default)]
pub struct SystemBuilder {
    name: Option<String>,
    cfg: Option<Config>,
    log: Option<Logger>,
}

impl SystemBuilder {
    pub fn new() -> Self {
        SystemBuilder::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn cfg(mut self, cfg: Config) -> Self {
        self.cfg = Some(cfg);
        self
    }

    pub fn log(mut self, log: Logger) -> Self {
        self.log = Some(log);
        self
    }

    pub fn create(self, setup: SetupHandler) -> Result<ActorSystem, SystemError> {
        let name = self.name.unwrap_or_else(|| "tractor".to_string());
        let cfg = self.cfg.unwrap_or_else(load_config);
        let log = self.log.unwrap_or_else(|| default_log(&cfg));
        ActorSystem::create(name, cfg, log, setup)
    }
}

/// A closed-set error type for system construction failures.
///
/// Currently the only failure mode is an invalid system name; more variants
/// are added here rather than via a generic boxed-error type, matching this
/// runtime's antecedent's own hand-rolled `SystemError`.
pub enum SystemError {
    InvalidName(String),
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemError::InvalidName(name) => {
                write!(f, "invalid actor system name: {:?}", name)
            }
        }
    }
}

impl fmt::Debug for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl std::error::Error for SystemError {}

fn validate_name(name: &str) -> Result<(), SystemError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SystemError::InvalidName(name.to_string()))
    }
}

/// The runtime's entry point: holds the implicit root context, spawns the
/// user-provided root behavior under it, and exposes a barrier
/// (`ActorSystem::wait`) that waits for the whole hierarchy to terminate.
pub struct ActorSystem {
    name: String,
    handle: SystemHandle,
    root: ActorRef,
    /// The implicit parent of the root actor: `self_ref`/`parent_ref` both
    /// `None`. Its only live child is `root`, tracked so `wait()` can join
    /// the root task directly instead of modeling a separate wait-group.
    context: ActorContext,
}

impl ActorSystem {
    /// Create a system named `"tractor"`, with config and logging loaded the
    /// default way, and spawn `setup` as the root actor.
    pub fn new(setup: SetupHandler) -> Result<ActorSystem, SystemError> {
        SystemBuilder::new().create(setup)
    }

    fn create(name: String, cfg: Config, log: Logger, setup: SetupHandler) -> Result<ActorSystem, SystemError> {
        validate_name(&name)?;

        if cfg.debug {
            slog::debug!(log, "starting actor system"; "name" => &name);
        }

        let handle = SystemHandle::new(cfg.clone(), log.clone());
        let (_envelope_tx, _command_tx, root_mailbox) = Mailbox::new(1, 1);
        let mut context = ActorContext::new(handle.clone(), None, None, root_mailbox);
        let root = context.spawn(setup);

        slog::debug!(log, "actor system started"; "name" => &name);

        Ok(ActorSystem {
            name,
            handle,
            root,
            context,
        })
    }

    /// A ref to the user-provided root actor.
    pub fn root(&self) -> ActorRef {
        self.root.clone()
    }

    /// The implicit system context: `self_ref()` is `None`. Pass this as the
    /// `ctx` argument when `Tell`ing the root actor from outside any actor.
    pub fn context(&self) -> &ActorContext {
        &self.context
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn log(&self) -> &Logger {
        &self.handle.log
    }

    /// Block until the root actor — and transitively, its whole descendant
    /// hierarchy — has fully terminated.
    pub async fn wait(&mut self) {
        if let Some(handle) = self.context.take_child_handle(&self.root) {
            let _ = handle.await;
        }
        slog::debug!(self.handle.log, "actor system stopped"; "name" => &self.name);
    }
}
