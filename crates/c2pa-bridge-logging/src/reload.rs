//! Runtime changes to the installed log level

use c2pa_bridge_core::{BridgeError, BridgeResult, LogLevel};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{Registry, reload};

type FilterHandle = reload::Handle<LevelFilter, Registry>;

struct Installed {
    handle: FilterHandle,
    level: LogLevel,
}

/// Level control for the subscriber installed by [`crate::init_logging`]
///
/// Empty until a reloadable subscriber is installed; `RUST_LOG` driven
/// subscribers never populate it.
#[derive(Default)]
pub struct ReloadHandle {
    installed: Mutex<Option<Installed>>,
}

impl ReloadHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide handle
    pub fn global() -> &'static ReloadHandle {
        static GLOBAL: OnceCell<ReloadHandle> = OnceCell::new();
        GLOBAL.get_or_init(ReloadHandle::new)
    }

    pub(crate) fn install(&self, handle: FilterHandle, level: LogLevel) {
        *self.installed.lock() = Some(Installed { handle, level });
    }

    pub fn is_installed(&self) -> bool {
        self.installed.lock().is_some()
    }

    /// Level currently applied, if a reloadable subscriber is installed
    pub fn level(&self) -> Option<LogLevel> {
        self.installed.lock().as_ref().map(|i| i.level)
    }

    /// Swap the level filter of the installed subscriber
    pub fn set_level(&self, level: LogLevel) -> BridgeResult<()> {
        let mut installed = self.installed.lock();
        let installed = installed
            .as_mut()
            .ok_or_else(|| BridgeError::Config("no reloadable subscriber installed".to_string()))?;
        installed
            .handle
            .reload(level_filter(level))
            .map_err(|e| BridgeError::Config(format!("cannot change log level to {level}: {e}")))?;
        installed.level = level;
        Ok(())
    }
}

/// `tracing` filter for a bridge log level
pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Trace => LevelFilter::TRACE,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Off => LevelFilter::OFF,
    }
}
