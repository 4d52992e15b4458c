//! Mass port scan over every resolved address, followed by the
//! aggregation pass that builds one port group per host.

use std::collections::BTreeSet;
use std::net::IpAddr;

use async_trait::async_trait;
use tracing::info;

use sweepr_common::error::Error;

use crate::exec::{ToolCommand, require_tool};
use crate::ports;
use crate::stage::{RunContext, Stage, StageId};

pub struct PortScanStage;

#[async_trait]
impl Stage for PortScanStage {
    fn id(&self) -> StageId {
        StageId::PortScan
    }

    async fn run(&self, cx: &mut RunContext<'_>) -> Result<(), Error> {
        let id = self.id();
        let ips: BTreeSet<IpAddr> = cx.require_resolved(id)?.iter().map(|r| r.ip).collect();
        if ips.is_empty() {
            info!("no resolved addresses, skipping {}", id.title());
            cx.index.record_skipped(id.artifact(), "no addresses to scan");
            cx.groups = Some(Vec::new());
            return Ok(());
        }
        require_tool(&cx.tools.masscan)?;

        let ip_list = cx.ws.ip_list_file();
        let mut body = ips
            .iter()
            .map(|ip| ip.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        body.push('\n');
        std::fs::write(&ip_list, body)?;

        let out = cx.ws.masscan_file();
        ToolCommand::new(&cx.tools.masscan)
            .arg("-iL")
            .arg(ip_list.display().to_string())
            .arg("-p1-65535")
            .arg("--rate")
            .arg("10000")
            .arg("-oJ")
            .arg(out.display().to_string())
            .run()
            .await?;

        let text = if out.is_file() {
            std::fs::read_to_string(&out)?
        } else {
            String::new()
        };
        let findings = ports::parse_masscan(&text);
        let groups = ports::aggregate(&findings);

        info!(
            "{} open ports across {} of {} addresses",
            findings.len(),
            groups.len(),
            ips.len()
        );
        cx.produce(id.artifact(), &out);
        cx.groups = Some(groups);
        Ok(())
    }
}
