//! The central abstraction for pipeline stages.
//!
//! Every stage implements [`Stage`] and runs against a shared
//! [`RunContext`]. High-level orchestration depends only on this
//! interface; the concrete stages live in [`crate::stages`], one
//! module per step.

use std::collections::BTreeSet;
use std::path::Path;

use async_trait::async_trait;

use sweepr_common::config::Config;
use sweepr_common::error::Error;
use sweepr_common::target::Target;

use crate::artifact::ArtifactIndex;
use crate::ports::HostPortGroup;
use crate::stages::dns::ResolvedHost;
use crate::tools::ToolSet;
use crate::workspace::Workspace;

/// The fixed pipeline steps, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StageId {
    Subdomains,
    Takeover,
    Cors,
    Dns,
    Screenshots,
    Content,
    PortScan,
    Services,
}

impl StageId {
    /// Every stage in execution order.
    pub const ALL: [StageId; 8] = [
        StageId::Subdomains,
        StageId::Takeover,
        StageId::Cors,
        StageId::Dns,
        StageId::Screenshots,
        StageId::Content,
        StageId::PortScan,
        StageId::Services,
    ];

    /// Human-readable stage name used in logs and diagnostics.
    pub fn title(self) -> &'static str {
        match self {
            StageId::Subdomains => "subdomain enumeration",
            StageId::Takeover => "takeover check",
            StageId::Cors => "cors scan",
            StageId::Dns => "dns resolution",
            StageId::Screenshots => "screenshot capture",
            StageId::Content => "content discovery",
            StageId::PortScan => "port scan",
            StageId::Services => "service enumeration",
        }
    }

    /// Logical name of the stage's primary artifact in the index.
    /// Fan-out stages additionally record one `<artifact>:<host>`
    /// entry per task.
    pub fn artifact(self) -> &'static str {
        match self {
            StageId::Subdomains => "subdomains",
            StageId::Takeover => "takeover",
            StageId::Cors => "cors",
            StageId::Dns => "resolved-hosts",
            StageId::Screenshots => "screenshot",
            StageId::Content => "content",
            StageId::PortScan => "open-ports",
            StageId::Services => "service-scan",
        }
    }
}

/// One pipeline step. Implementations receive only the artifacts they
/// declare as input via the context accessors and record their outputs
/// in the shared index.
#[async_trait]
pub trait Stage: Send + Sync {
    fn id(&self) -> StageId;

    /// A required stage escalates even soft tool failures to fatal.
    /// No stage in the default pipeline sets this; the classification
    /// exists so a deployment can harden individual steps.
    fn required(&self) -> bool {
        false
    }

    async fn run(&self, cx: &mut RunContext<'_>) -> Result<(), Error>;
}

/// Mutable state threaded through the pipeline by the single
/// orchestrating task. Downstream data is `None` until (and unless)
/// the producing stage succeeds, which is how an absent artifact is
/// told apart from a legitimately empty one.
pub struct RunContext<'a> {
    pub target: &'a Target,
    pub config: &'a Config,
    pub tools: &'a ToolSet,
    pub ws: &'a Workspace,
    pub index: ArtifactIndex,

    /// Canonical SubdomainSet: deduplicated, sorted, lowercase.
    pub subdomains: Option<BTreeSet<String>>,
    /// Hosts the DNS stage resolved to addresses.
    pub resolved: Option<Vec<ResolvedHost>>,
    /// Aggregated port groups feeding service enumeration.
    pub groups: Option<Vec<HostPortGroup>>,
}

impl<'a> RunContext<'a> {
    pub fn new(
        target: &'a Target,
        config: &'a Config,
        tools: &'a ToolSet,
        ws: &'a Workspace,
    ) -> Self {
        Self {
            target,
            config,
            tools,
            ws,
            index: ArtifactIndex::new(),
            subdomains: None,
            resolved: None,
            groups: None,
        }
    }

    /// Records `path` (made workspace-relative) as produced.
    pub fn produce(&mut self, name: impl Into<String>, path: &Path) {
        let rel = self.ws.rel(path).to_path_buf();
        self.index.record_produced(name, rel);
    }

    pub fn require_subdomains(&self, stage: StageId) -> Result<&BTreeSet<String>, Error> {
        self.subdomains
            .as_ref()
            .ok_or(Error::UnmetDataDependency {
                stage: stage.title(),
                artifact: StageId::Subdomains.artifact(),
            })
    }

    pub fn require_resolved(&self, stage: StageId) -> Result<&[ResolvedHost], Error> {
        self.resolved
            .as_deref()
            .ok_or(Error::UnmetDataDependency {
                stage: stage.title(),
                artifact: StageId::Dns.artifact(),
            })
    }

    pub fn require_groups(&self, stage: StageId) -> Result<&[HostPortGroup], Error> {
        self.groups.as_deref().ok_or(Error::UnmetDataDependency {
            stage: stage.title(),
            artifact: StageId::PortScan.artifact(),
        })
    }
}
