//! Subdomain takeover check over the full host list.

use async_trait::async_trait;
use tracing::info;

use sweepr_common::error::Error;

use crate::exec::{ToolCommand, require_tool};
use crate::stage::{RunContext, Stage, StageId};

pub struct TakeoverStage;

#[async_trait]
impl Stage for TakeoverStage {
    fn id(&self) -> StageId {
        StageId::Takeover
    }

    async fn run(&self, cx: &mut RunContext<'_>) -> Result<(), Error> {
        let id = self.id();
        if cx.require_subdomains(id)?.is_empty() {
            info!("no hosts, skipping {}", id.title());
            cx.index.record_skipped(id.artifact(), "no hosts to check");
            return Ok(());
        }
        require_tool(&cx.tools.subjack)?;

        let out = cx.ws.takeover_file();
        ToolCommand::new(&cx.tools.subjack)
            .arg("-w")
            .arg(cx.ws.subdomains_file().display().to_string())
            .arg("-o")
            .arg(out.display().to_string())
            .arg_if(cx.config.verbose, "-v")
            .run()
            .await?;

        cx.produce(id.artifact(), &out);
        Ok(())
    }
}
