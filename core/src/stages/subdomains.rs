//! Subdomain enumeration plus the normalization pass that produces the
//! canonical SubdomainSet every downstream stage consumes.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::info;

use sweepr_common::error::Error;
use sweepr_common::target::{self, Target};

use crate::exec::{ToolCommand, require_tool};
use crate::stage::{RunContext, Stage, StageId};

pub struct SubdomainStage;

#[async_trait]
impl Stage for SubdomainStage {
    fn id(&self) -> StageId {
        StageId::Subdomains
    }

    async fn run(&self, cx: &mut RunContext<'_>) -> Result<(), Error> {
        let id = self.id();
        require_tool(&cx.tools.subfinder)?;

        let raw_path = cx.ws.raw_subdomains_file();
        ToolCommand::new(&cx.tools.subfinder)
            .arg("-d")
            .arg(cx.target.as_str())
            .arg("-silent")
            .arg("-o")
            .arg(raw_path.display().to_string())
            .arg_if(cx.config.verbose, "-v")
            .run()
            .await?;

        let raw = if raw_path.is_file() {
            std::fs::read_to_string(&raw_path)?
        } else {
            String::new()
        };
        let set = normalize(&raw, cx.target);

        let out = cx.ws.subdomains_file();
        let mut body = set.iter().cloned().collect::<Vec<_>>().join("\n");
        if !body.is_empty() {
            body.push('\n');
        }
        std::fs::write(&out, body)?;

        info!("{} unique subdomains under {}", set.len(), cx.target);
        cx.produce(id.artifact(), &out);
        cx.subdomains = Some(set);
        Ok(())
    }
}

/// Filters raw tool output down to the canonical SubdomainSet:
/// trimmed, lowercased, wildcard markers stripped, syntactically valid
/// and within the target's namespace, deduplicated and sorted. Same
/// raw input always yields the same set.
pub(crate) fn normalize(raw: &str, target: &Target) -> BTreeSet<String> {
    raw.lines()
        .filter_map(|line| {
            let host = line.trim().trim_end_matches('.').to_ascii_lowercase();
            let host = host.strip_prefix("*.").unwrap_or(&host);
            (target::is_valid_hostname(host) && target.owns(host)).then(|| host.to_string())
        })
        .collect()
}
