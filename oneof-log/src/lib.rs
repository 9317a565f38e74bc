use std::{
    fmt,
    io::IsTerminal,
    str::FromStr,
    sync::{Arc, Mutex, OnceLock},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// The level's name right-aligned to the width of the longest one.
    pub const fn padded_name(self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => " info",
            Level::Warn => " warn",
            Level::Error => "error",
        }
    }

    const fn ansi_color(self) -> &'static str {
        match self {
            Level::Trace => "37",
            Level::Debug => "35",
            Level::Info => "34",
            Level::Warn => "33",
            Level::Error => "31",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.padded_name().trim_start())
    }
}

fn log_default(level: Level, fmt: fmt::Arguments, source: &str) {
    let module_space = if source.is_empty() { "" } else { " " };
    if std::io::stderr().is_terminal() {
        eprintln!(
            "[oneof \x1b[1;{}m{}\x1b[0m{module_space}{source}] {fmt}",
            level.ansi_color(),
            level.padded_name()
        );
    } else {
        eprintln!("[oneof {}{module_space}{source}] {fmt}", level.padded_name());
    }
}

/// Receives every message that passes through a [`RootLogger`] using it.
///
/// Unlike the default sink, custom callbacks are not subject to the `ONEOF_LOG` filter.
pub type CustomLogCallback = Box<dyn Fn(Level, &str, fmt::Arguments) + Send>;

pub enum MessageCallback {
    Default,
    Custom(CustomLogCallback),
}

impl fmt::Debug for MessageCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl MessageCallback {
    fn log(&self, level: Level, fmt: fmt::Arguments, source: &str) {
        const CRATE_MODULE_PREFIX: &str = "oneof::";

        let module_rel = source.strip_prefix(CRATE_MODULE_PREFIX).unwrap_or(source);

        match self {
            Self::Default => {
                let filter = ENV_LOG_FILTER.get_or_init(|| parse_log_env_var().unwrap_or_default());
                if !filter.filter(level, module_rel) {
                    return;
                }

                log_default(level, fmt, module_rel)
            }
            Self::Custom(callback) => callback(level, module_rel, fmt),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

pub trait Logger: sealed::Sealed {
    fn log(&self, level: Level, fmt: fmt::Arguments, source: &str);
}

#[derive(Debug)]
struct RootLoggerImpl {
    callback: MessageCallback,
}

#[derive(Debug, Clone)]
pub struct RootLogger {
    root: Arc<Mutex<RootLoggerImpl>>,
}

impl RootLogger {
    pub fn new() -> Self {
        Self::with_callback(MessageCallback::Default)
    }

    pub fn with_callback(callback: MessageCallback) -> Self {
        Self {
            root: Arc::new(Mutex::new(RootLoggerImpl { callback })),
        }
    }

    pub fn set_message_callback(&mut self, callback: MessageCallback) {
        self.root
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .callback = callback;
    }
}

impl Default for RootLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for RootLogger {
    fn log(&self, level: Level, fmt: fmt::Arguments, module_path: &str) {
        // A panicking custom callback must not silence every later message.
        self.root
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .callback
            .log(level, fmt, module_path)
    }
}

impl sealed::Sealed for RootLogger {}

pub trait AsLogger {
    fn as_logger(&self) -> &impl Logger;
}

impl<T: AsLogger> AsLogger for &T {
    fn as_logger(&self) -> &impl Logger {
        <T as AsLogger>::as_logger(*self)
    }
}

impl<T: AsLogger> AsLogger for &mut T {
    fn as_logger(&self) -> &impl Logger {
        <T as AsLogger>::as_logger(*self)
    }
}

impl AsLogger for RootLogger {
    fn as_logger(&self) -> &impl Logger {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum LevelFilter {
    Level(Level),
    None,
}

impl LevelFilter {
    fn filter(self, level: Level) -> bool {
        match self {
            LevelFilter::Level(filter) => level >= filter,
            LevelFilter::None => false,
        }
    }
}

impl FromStr for LevelFilter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "trace" => Self::Level(Level::Trace),
            "debug" => Self::Level(Level::Debug),
            "info" => Self::Level(Level::Info),
            "warn" => Self::Level(Level::Warn),
            "error" => Self::Level(Level::Error),
            "none" => Self::None,
            _ => return Err(()),
        })
    }
}

/// A default level plus `module=level` overrides, as read from `ONEOF_LOG`.
///
/// Modules are matched by path prefix relative to the crate root, so `alloc`
/// also covers `alloc::counting`. The longest matching prefix wins.
#[derive(Debug, PartialEq, Eq)]
struct LogFilter {
    top_level: LevelFilter,
    modules: Vec<(String, LevelFilter)>,
}

impl LogFilter {
    fn filter(&self, level: Level, module: &str) -> bool {
        self.modules
            .iter()
            .filter(|(prefix, _)| {
                module
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
            })
            .max_by_key(|(prefix, _)| prefix.len())
            .map_or(self.top_level, |&(_, filter)| filter)
            .filter(level)
    }
}

impl Default for LogFilter {
    fn default() -> Self {
        Self {
            #[cfg(not(debug_assertions))]
            top_level: LevelFilter::Level(Level::Warn),
            #[cfg(debug_assertions)]
            top_level: LevelFilter::Level(Level::Debug),
            modules: Vec::new(),
        }
    }
}

impl FromStr for LogFilter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut result = Self::default();
        for directive in s.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            match directive.split_once('=') {
                Some((module, level)) => result
                    .modules
                    .push((module.trim().to_owned(), level.trim().parse()?)),
                None => result.top_level = directive.parse()?,
            }
        }
        Ok(result)
    }
}

fn parse_log_env_var() -> Option<LogFilter> {
    std::env::var("ONEOF_LOG").ok()?.parse().ok()
}

static ENV_LOG_FILTER: OnceLock<LogFilter> = OnceLock::new();

#[macro_export]
macro_rules! log {
    ($logger: expr, $level: expr, $($fmt: tt)*) => {
        $crate::Logger::log(
            $crate::AsLogger::as_logger(&$logger),
            $level, format_args!($($fmt)*), module_path!()
        )
    };
    (@mkmacro $dollar: tt, $name: ident, $level: ident) => {
        #[macro_export]
        #[clippy::format_args]
        macro_rules! $name {
            ($dollar logger: expr, $dollar ($dollar rest: tt)*) => {
                $crate::log!($dollar logger, $crate::Level::$level, $dollar ($dollar rest)*)
            }
        }
    }
}

log!(@mkmacro $, trace, Trace);
log!(@mkmacro $, debug, Debug);
log!(@mkmacro $, warning, Warn);
log!(@mkmacro $, info, Info);
log!(@mkmacro $, error, Error);
