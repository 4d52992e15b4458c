//! Screenshot capture, one external task per host, bounded by the
//! configured thread count.

use async_trait::async_trait;
use tracing::{info, warn};

use sweepr_common::error::Error;

use crate::exec::{ToolCommand, require_tool};
use crate::runner::run_bounded;
use crate::stage::{RunContext, Stage, StageId};

pub struct ScreenshotStage;

#[async_trait]
impl Stage for ScreenshotStage {
    fn id(&self) -> StageId {
        StageId::Screenshots
    }

    async fn run(&self, cx: &mut RunContext<'_>) -> Result<(), Error> {
        let id = self.id();
        let hosts = cx.require_subdomains(id)?.clone();
        if hosts.is_empty() {
            info!("no hosts, skipping {}", id.title());
            cx.index.record_skipped(id.artifact(), "no hosts to capture");
            return Ok(());
        }
        require_tool(&cx.tools.gowitness)?;

        let destination = cx.ws.screenshots_dir().display().to_string();
        let tasks = hosts
            .iter()
            .map(|host| {
                let cmd = ToolCommand::new(&cx.tools.gowitness)
                    .arg("single")
                    .arg(format!("http://{host}"))
                    .arg("--destination")
                    .arg(destination.clone())
                    .arg("--output")
                    .arg(format!("{host}.png"));
                (host.clone(), vec![cmd])
            })
            .collect();

        let results = run_bounded(cx.config.threads, tasks).await;
        let mut captured = 0usize;
        for (host, outcome) in results {
            let name = format!("{}:{host}", id.artifact());
            match outcome {
                Ok(()) => {
                    captured += 1;
                    let file = cx.ws.screenshot_file(&host);
                    cx.produce(name, &file);
                }
                Err(e) => {
                    warn!("screenshot of {host} failed: {e}");
                    cx.index.record_failed(name, e.to_string());
                }
            }
        }

        info!("captured {captured}/{} hosts", hosts.len());
        Ok(())
    }
}
