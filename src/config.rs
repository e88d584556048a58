//! Crate-local configuration, loaded the way `riker`'s own `load_config`
//! does: a `Default` impl overlaid with values from an optional TOML file
//! named by an environment variable.

use std::env;
use std::fs;
use std::io;

/// Runtime-tunable knobs. Everything here has a sane default; a config file
/// only needs to set what it wants to override.
#[derive(Clone, Debug)]
pub struct Config {
    pub debug: bool,
    /// Bounded capacity of every actor's user-message mailbox channel.
    pub mailbox_capacity: usize,
    /// Bounded capacity of every actor's internal command channel
    /// (`Terminate`/`Listen`/`ChildTerminated`).
    pub command_capacity: usize,
    /// Minimum `slog` level the default diagnostic sink emits.
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            debug: true,
            mailbox_capacity: 1000,
            command_capacity: 2,
            log_level: LogLevel::Info,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn parse(s: &str) -> Option<LogLevel> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Some(LogLevel::Critical),
            "error" => Some(LogLevel::Error),
            "warning" | "warn" => Some(LogLevel::Warning),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    pub(crate) fn to_slog(self) -> slog::Level {
        match self {
            LogLevel::Critical => slog::Level::Critical,
            LogLevel::Error => slog::Level::Error,
            LogLevel::Warning => slog::Level::Warning,
            LogLevel::Info => slog::Level::Info,
            LogLevel::Debug => slog::Level::Debug,
            LogLevel::Trace => slog::Level::Trace,
        }
    }
}

impl Config {
    fn merge(&mut self, value: &toml::Value) -> Option<()> {
        let table = value.as_table()?;
        if let Some(debug) = table.get("debug").and_then(toml::Value::as_bool) {
            self.debug = debug;
        }
        if let Some(mailbox) = table.get("mailbox").and_then(toml::Value::as_table) {
            if let Some(cap) = mailbox.get("capacity").and_then(toml::Value::as_integer) {
                self.mailbox_capacity = cap.max(1) as usize;
            }
            if let Some(cap) = mailbox.get("command_capacity").and_then(toml::Value::as_integer) {
                self.command_capacity = cap.max(1) as usize;
            }
        }
        if let Some(log) = table.get("log").and_then(toml::Value::as_table) {
            if let Some(level) = log.get("level").and_then(toml::Value::as_str) {
                if let Some(level) = LogLevel::parse(level) {
                    self.log_level = level;
                }
            }
        }
        None
    }
}

/// Load `Config::default()` overlaid with `$TRACTOR_CONF` (default
/// `config/tractor.toml`), if that file exists and parses. A missing file is
/// not an error; a present-but-malformed one is logged to stderr and
/// otherwise ignored, since there is no logger yet at this point in startup.
pub fn load_config() -> Config {
    let mut cfg = Config::default();

    let path = env::var("TRACTOR_CONF").unwrap_or_else(|_| "config/tractor.toml".into());
    match read_and_parse(&path) {
        Ok(value) => {
            cfg.merge(&value);
        }
        Err(Error::NotFound) => {}
        Err(Error::Invalid(e)) => {
            eprintln!("tractor: ignoring malformed config at {}: {}", path, e);
        }
    }

    cfg
}

enum Error {
    NotFound,
    Invalid(toml::de::Error),
}

fn read_and_parse(path: &str) -> Result<toml::Value, Error> {
    let contents = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(Error::NotFound),
        Err(_) => return Err(Error::NotFound),
    };
    toml::from_str(&contents).map_err(Error::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // `TRACTOR_CONF` is process-global; serialize the tests that set it so
    // they don't stomp on each other when run concurrently.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert!(cfg.debug);
        assert_eq!(cfg.mailbox_capacity, 1000);
        assert_eq!(cfg.command_capacity, 2);
        assert_eq!(cfg.log_level, LogLevel::Info);
    }

    #[test]
    fn merge_overrides_only_whats_present() {
        let mut cfg = Config::default();
        let value: toml::Value = toml::from_str(
            r#"
            debug = false

            [mailbox]
            capacity = 8
            "#,
        )
        .unwrap();
        cfg.merge(&value);
        assert!(!cfg.debug);
        assert_eq!(cfg.mailbox_capacity, 8);
        assert_eq!(cfg.command_capacity, 2);
    }

    #[test]
    fn log_level_parses_case_insensitively() {
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("warn"), Some(LogLevel::Warning));
        assert_eq!(LogLevel::parse("nonsense"), None);
    }

    #[test]
    fn load_config_honors_a_file_named_by_the_env_var() {
        let _guard = ENV_LOCK.lock().unwrap();
        let path = env::temp_dir().join("tractor-test-config-override.toml");
        fs::write(&path, "[mailbox]\ncapacity = 42\n").expect("can write to the temp dir");

        env::set_var("TRACTOR_CONF", &path);
        let cfg = load_config();
        env::remove_var("TRACTOR_CONF");
        let _ = fs::remove_file(&path);

        assert_eq!(cfg.mailbox_capacity, 42);
        // Anything the file doesn't mention keeps the compiled-in default.
        assert_eq!(cfg.command_capacity, 2);
    }

    #[test]
    fn load_config_ignores_a_missing_file() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("TRACTOR_CONF", "/nonexistent/tractor-test-config.toml");
        let cfg = load_config();
        env::remove_var("TRACTOR_CONF");

        assert_eq!(cfg.mailbox_capacity, Config::default().mailbox_capacity);
    }
}
