//! Batch DNS resolution. The derived address set is the sole input to
//! the port scan.

use std::net::IpAddr;

use async_trait::async_trait;
use tracing::info;

use sweepr_common::error::Error;

use crate::exec::{ToolCommand, require_file, require_tool};
use crate::stage::{RunContext, Stage, StageId};

/// One resolution result from the batch resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedHost {
    pub hostname: Option<String>,
    pub ip: IpAddr,
}

pub struct DnsStage;

#[async_trait]
impl Stage for DnsStage {
    fn id(&self) -> StageId {
        StageId::Dns
    }

    async fn run(&self, cx: &mut RunContext<'_>) -> Result<(), Error> {
        let id = self.id();
        if cx.require_subdomains(id)?.is_empty() {
            info!("no hosts, skipping {}", id.title());
            cx.index.record_skipped(id.artifact(), "no hosts to resolve");
            cx.resolved = Some(Vec::new());
            return Ok(());
        }
        require_tool(&cx.tools.massdns)?;
        require_file(&cx.tools.resolvers, "resolver list")?;

        let out = cx.ws.resolved_file();
        ToolCommand::new(&cx.tools.massdns)
            .arg("-r")
            .arg(cx.tools.resolvers.display().to_string())
            .arg("-t")
            .arg("A")
            .arg("-o")
            .arg("S")
            .arg("-w")
            .arg(out.display().to_string())
            .arg(cx.ws.subdomains_file().display().to_string())
            .run()
            .await?;

        let text = if out.is_file() {
            std::fs::read_to_string(&out)?
        } else {
            String::new()
        };
        let resolved = parse_records(&text);

        info!("{} hosts resolved to addresses", resolved.len());
        cx.produce(id.artifact(), &out);
        cx.resolved = Some(resolved);
        Ok(())
    }
}

/// Parses `hostname type value` records from the resolver's simple
/// text output, keeping A records with a parseable address.
pub(crate) fn parse_records(text: &str) -> Vec<ResolvedHost> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let host = fields.next()?;
            let rtype = fields.next()?;
            let value = fields.next()?;
            if rtype != "A" {
                return None;
            }
            let ip: IpAddr = value.parse().ok()?;
            let hostname = host.trim_end_matches('.');
            Some(ResolvedHost {
                hostname: (!hostname.is_empty()).then(|| hostname.to_ascii_lowercase()),
                ip,
            })
        })
        .collect()
}
