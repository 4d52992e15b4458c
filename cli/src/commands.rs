use clap::Parser;

use sweepr_common::config::{Config, DEFAULT_THREADS};
use sweepr_common::target::Target;

#[derive(Parser)]
#[command(name = "sweepr")]
#[command(about = "A recon pipeline orchestrator.", version)]
pub struct CommandLine {
    /// Target domain to sweep
    pub domain: Target,

    /// Maximum per-host tasks in flight within a stage
    #[arg(long, value_name = "N", default_value_t = DEFAULT_THREADS, value_parser = parse_threads)]
    pub threads: usize,

    /// Request the extended vulnerability script set during service enumeration
    #[arg(long)]
    pub vuln: bool,

    /// Propagate verbose output to tools that support it
    #[arg(long)]
    pub verbose: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        Config {
            threads: self.threads,
            vuln_scan: self.vuln,
            verbose: self.verbose,
        }
    }
}

fn parse_threads(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        Ok(_) => Err("thread count must be at least 1".into()),
        Err(_) => Err(format!("'{s}' is not a positive integer")),
    }
}
