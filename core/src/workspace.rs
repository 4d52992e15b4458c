//! # Workspace Manager
//!
//! Owns the per-target output tree. Every artifact path used by any
//! stage is derived here, so the layout is fixed in one place:
//!
//! ```text
//! <domain>/
//!   subdomains/     raw + normalized host lists
//!   scans/          takeover, cors, dns resolution output
//!   screenshots/    one image per host
//!   content/        one found-paths list per host
//!   ports/          ip list + mass scan output
//!   services/       one xml + html per scanned host
//!   logs/           persistent run log
//!   report.html     aggregate report
//!   index.json      persisted artifact index
//! ```

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use sweepr_common::error::Error;
use sweepr_common::target::Target;

const SUBDIRS: &[&str] = &[
    "subdomains",
    "scans",
    "screenshots",
    "content",
    "ports",
    "services",
    "logs",
];

/// The per-target output tree. Creation is idempotent: re-running a
/// sweep against an existing workspace reuses the directories and
/// overwrites individual stage outputs.
#[derive(Clone, Debug)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Creates (or reuses) the workspace for `target` under the
    /// current directory.
    pub fn create(target: &Target) -> Result<Self, Error> {
        Self::create_in(Path::new("."), target)
    }

    /// Creates (or reuses) the workspace for `target` under `base`.
    pub fn create_in(base: &Path, target: &Target) -> Result<Self, Error> {
        let root = base.join(target.as_str());
        for sub in SUBDIRS {
            std::fs::create_dir_all(root.join(sub))?;
        }
        Ok(Workspace { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Strips the workspace root from `path`, yielding the
    /// filesystem-independent reference stored in the artifact index.
    pub fn rel<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    pub fn log_file(&self) -> PathBuf {
        self.root.join("logs").join("sweepr.log")
    }

    pub fn report_file(&self) -> PathBuf {
        self.root.join("report.html")
    }

    pub fn index_file(&self) -> PathBuf {
        self.root.join("index.json")
    }

    pub fn raw_subdomains_file(&self) -> PathBuf {
        self.root.join("subdomains").join("raw.txt")
    }

    pub fn subdomains_file(&self) -> PathBuf {
        self.root.join("subdomains").join("subdomains.txt")
    }

    pub fn takeover_file(&self) -> PathBuf {
        self.root.join("scans").join("takeover.txt")
    }

    pub fn cors_file(&self) -> PathBuf {
        self.root.join("scans").join("cors.txt")
    }

    pub fn resolved_file(&self) -> PathBuf {
        self.root.join("scans").join("resolved.txt")
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.root.join("screenshots")
    }

    pub fn screenshot_file(&self, host: &str) -> PathBuf {
        self.root.join("screenshots").join(format!("{host}.png"))
    }

    pub fn content_file(&self, host: &str) -> PathBuf {
        self.root.join("content").join(format!("{host}.txt"))
    }

    pub fn ip_list_file(&self) -> PathBuf {
        self.root.join("ports").join("ips.txt")
    }

    pub fn masscan_file(&self) -> PathBuf {
        self.root.join("ports").join("masscan.json")
    }

    pub fn service_xml_file(&self, ip: IpAddr) -> PathBuf {
        self.root.join("services").join(format!("{ip}.xml"))
    }

    pub fn service_html_file(&self, ip: IpAddr) -> PathBuf {
        self.root.join("services").join(format!("{ip}.html"))
    }
}
