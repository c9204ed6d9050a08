use std::collections::BTreeSet;

/// Default number of lines decoded between two cancellation checks.
pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// Options for [`decode_log`](crate::candump::parse::decode_log).
///
/// ```
/// use can_decode::LogOptions;
///
/// let opts = LogOptions::new()
///     .with_parallel(true)
///     .with_batch_size(256)
///     .with_interfaces(vec!["can0".to_string()]);
/// assert!(opts.accepts_interface("can0"));
/// assert!(!opts.accepts_interface("can1"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogOptions {
    /// Decode each batch with rayon.
    pub parallel: bool,
    /// Lines per batch; the cancel flag is checked once per batch.
    pub batch_size: usize,
    /// Keep only frames from these interfaces. `None` keeps everything.
    pub interfaces: Option<BTreeSet<String>>,
}

impl Default for LogOptions {
    fn default() -> Self {
        LogOptions {
            parallel: false,
            batch_size: DEFAULT_BATCH_SIZE,
            interfaces: None,
        }
    }
}

impl LogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// A batch size of 0 is treated as 1.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_interfaces(mut self, interfaces: Vec<String>) -> Self {
        self.interfaces = Some(interfaces.into_iter().collect());
        self
    }

    pub fn accepts_interface(&self, interface: &str) -> bool {
        self.interfaces
            .as_ref()
            .is_none_or(|set| set.contains(interface))
    }

    pub(crate) fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}
