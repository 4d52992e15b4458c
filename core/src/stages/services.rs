//! Detailed service enumeration: one consolidated scan per host group,
//! each followed by the XML-to-HTML transform, bounded by the
//! configured thread count.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{info, warn};

use sweepr_common::error::Error;

use crate::exec::{ToolCommand, require_tool};
use crate::runner::run_bounded;
use crate::stage::{RunContext, Stage, StageId};

pub struct ServiceStage;

#[async_trait]
impl Stage for ServiceStage {
    fn id(&self) -> StageId {
        StageId::Services
    }

    async fn run(&self, cx: &mut RunContext<'_>) -> Result<(), Error> {
        let id = self.id();
        let groups = cx.require_groups(id)?.to_vec();
        if groups.is_empty() {
            info!("no hosts with open ports, skipping {}", id.title());
            cx.index.record_skipped(id.artifact(), "no hosts with open ports");
            return Ok(());
        }
        require_tool(&cx.tools.nmap)?;
        require_tool(&cx.tools.xsltproc)?;

        let mut reports: BTreeMap<String, PathBuf> = BTreeMap::new();
        let tasks = groups
            .iter()
            .map(|group| {
                let xml = cx.ws.service_xml_file(group.ip);
                let html = cx.ws.service_html_file(group.ip);
                let scan = ToolCommand::new(&cx.tools.nmap)
                    .arg("-sV")
                    .arg_if(cx.config.vuln_scan, "--script=vuln")
                    .arg_if(cx.config.verbose, "-v")
                    .arg("-p")
                    .arg(group.directive())
                    .arg("-oX")
                    .arg(xml.display().to_string())
                    .arg(group.ip.to_string());
                let render = ToolCommand::new(&cx.tools.xsltproc)
                    .arg(xml.display().to_string())
                    .arg("-o")
                    .arg(html.display().to_string());

                reports.insert(group.ip.to_string(), html);
                (group.ip.to_string(), vec![scan, render])
            })
            .collect();

        let results = run_bounded(cx.config.threads, tasks).await;
        let mut scanned = 0usize;
        for (ip, outcome) in results {
            let name = format!("{}:{ip}", id.artifact());
            match outcome {
                Ok(()) => {
                    scanned += 1;
                    if let Some(html) = reports.get(&ip) {
                        cx.produce(name, html);
                    }
                }
                Err(e) => {
                    warn!("service enumeration of {ip} failed: {e}");
                    cx.index.record_failed(name, e.to_string());
                }
            }
        }

        info!("service enumeration finished for {scanned}/{} hosts", groups.len());
        Ok(())
    }
}
