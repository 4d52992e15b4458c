//! External collaborator catalogue.
//!
//! One place naming every tool the pipeline shells out to, plus the two
//! required input files. Paths default to bare names resolved on PATH;
//! integration tests substitute stub executables by building a custom
//! [`ToolSet`].

use std::path::PathBuf;

/// Commands and input files for one run. Behavior of each tool is
/// opaque to the pipeline; only the input/output file contract matters.
#[derive(Clone, Debug)]
pub struct ToolSet {
    /// Subdomain enumeration: domain -> hostname list.
    pub subfinder: PathBuf,
    /// Takeover check: hostname list -> takeover findings.
    pub subjack: PathBuf,
    /// CORS probe: hostname list -> CORS findings.
    pub corsy: PathBuf,
    /// DNS batch resolver: hostname list + resolver list -> records.
    pub massdns: PathBuf,
    /// Screenshot capture, one invocation per host.
    pub gowitness: PathBuf,
    /// Content discovery, one invocation per host.
    pub ffuf: PathBuf,
    /// Mass port scan: ip list -> JSON port findings.
    pub masscan: PathBuf,
    /// Detailed service enumeration, one invocation per host group.
    pub nmap: PathBuf,
    /// XML-to-HTML transform for the service scanner output.
    pub xsltproc: PathBuf,

    /// Resolver list consumed by the DNS stage, one per line.
    pub resolvers: PathBuf,
    /// Content-discovery wordlist, one path segment per line.
    pub wordlist: PathBuf,
}

impl Default for ToolSet {
    fn default() -> Self {
        Self {
            subfinder: "subfinder".into(),
            subjack: "subjack".into(),
            corsy: "corsy".into(),
            massdns: "massdns".into(),
            gowitness: "gowitness".into(),
            ffuf: "ffuf".into(),
            masscan: "masscan".into(),
            nmap: "nmap".into(),
            xsltproc: "xsltproc".into(),
            resolvers: "resolvers.txt".into(),
            wordlist: "wordlist.txt".into(),
        }
    }
}
