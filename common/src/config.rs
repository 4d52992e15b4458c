/// Concurrency bound when `--threads` is not given.
pub const DEFAULT_THREADS: usize = 5;

/// Run-wide options. Parsed once from the command line, immutable for
/// the rest of the run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Upper bound on per-host tasks in flight within a single stage.
    ///
    /// Never exceeded no matter how many hosts a stage has queued.
    pub threads: usize,
    /// Adds the extended vulnerability script set to every service
    /// enumeration invocation. Global toggle, not per-host.
    pub vuln_scan: bool,
    /// Propagates each tool's own verbose flag and widens the terminal
    /// log filter. Never changes control flow.
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            vuln_scan: false,
            verbose: false,
        }
    }
}
