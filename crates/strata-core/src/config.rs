use crate::profiling::{ProfilingBackend, init_profiling};

/// Configuration for a Strata UI context.
#[derive(Debug, Clone)]
pub struct Config {
    /// `tracing` filter directive handed to [`crate::logging::init_with_filter`].
    pub log_filter: String,
    pub profiling: ProfilingMode,
    /// Initial capacity of the pending event queue.
    pub event_queue_capacity: usize,
    /// Isolate panicking listeners instead of unwinding through the dispatch loop.
    pub catch_listener_panics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_filter: crate::logging::DEFAULT_FILTER.to_owned(),
            profiling: ProfilingMode::Off,
            event_queue_capacity: 64,
            catch_listener_panics: true,
        }
    }
}

impl Config {
    /// Defaults, with the log filter taken from `STRATA_LOG` when set.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Ok(filter) = std::env::var(crate::logging::LOG_ENV) {
            config.log_filter = filter;
        }
        config
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn with_profiling(mut self, profiling: ProfilingMode) -> Self {
        self.profiling = profiling;
        self
    }

    pub fn with_event_queue_capacity(mut self, capacity: usize) -> Self {
        self.event_queue_capacity = capacity;
        self
    }

    pub fn with_catch_listener_panics(mut self, catch: bool) -> Self {
        self.catch_listener_panics = catch;
        self
    }

    /// Install the global subscriber and start profiling as configured.
    /// Intended to be called once by the application at startup.
    pub fn install_globals(&self) {
        crate::logging::init_with_filter(&self.log_filter);
        match self.profiling {
            ProfilingMode::Off => {}
            ProfilingMode::On => init_profiling(ProfilingBackend::InProcess),
            #[cfg(feature = "profiling")]
            ProfilingMode::WithWebserver => init_profiling(ProfilingBackend::PuffinHttp),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingMode {
    /// Profiling is disabled
    Off,
    /// Scopes are recorded in-process
    On,
    /// Scopes are recorded and served to `puffin_viewer` over HTTP
    #[cfg(feature = "profiling")]
    WithWebserver,
}
