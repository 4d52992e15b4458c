//! CORS misconfiguration probe over the full host list.

use async_trait::async_trait;
use tracing::info;

use sweepr_common::error::Error;

use crate::exec::{ToolCommand, require_tool};
use crate::stage::{RunContext, Stage, StageId};

pub struct CorsStage;

#[async_trait]
impl Stage for CorsStage {
    fn id(&self) -> StageId {
        StageId::Cors
    }

    async fn run(&self, cx: &mut RunContext<'_>) -> Result<(), Error> {
        let id = self.id();
        if cx.require_subdomains(id)?.is_empty() {
            info!("no hosts, skipping {}", id.title());
            cx.index.record_skipped(id.artifact(), "no hosts to probe");
            return Ok(());
        }
        require_tool(&cx.tools.corsy)?;

        let out = cx.ws.cors_file();
        ToolCommand::new(&cx.tools.corsy)
            .arg("-i")
            .arg(cx.ws.subdomains_file().display().to_string())
            .arg("-o")
            .arg(out.display().to_string())
            .run()
            .await?;

        cx.produce(id.artifact(), &out);
        Ok(())
    }
}
