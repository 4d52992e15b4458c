//! Content discovery, one external task per host against the shared
//! wordlist, bounded by the configured thread count.

use async_trait::async_trait;
use tracing::{info, warn};

use sweepr_common::error::Error;

use crate::exec::{ToolCommand, require_file, require_tool};
use crate::runner::run_bounded;
use crate::stage::{RunContext, Stage, StageId};

pub struct ContentStage;

#[async_trait]
impl Stage for ContentStage {
    fn id(&self) -> StageId {
        StageId::Content
    }

    async fn run(&self, cx: &mut RunContext<'_>) -> Result<(), Error> {
        let id = self.id();
        let hosts = cx.require_subdomains(id)?.clone();
        if hosts.is_empty() {
            info!("no hosts, skipping {}", id.title());
            cx.index.record_skipped(id.artifact(), "no hosts to brute");
            return Ok(());
        }
        require_tool(&cx.tools.ffuf)?;
        require_file(&cx.tools.wordlist, "content-discovery wordlist")?;

        let wordlist = cx.tools.wordlist.display().to_string();
        let tasks = hosts
            .iter()
            .map(|host| {
                let out = cx.ws.content_file(host);
                let cmd = ToolCommand::new(&cx.tools.ffuf)
                    .arg("-u")
                    .arg(format!("http://{host}/FUZZ"))
                    .arg("-w")
                    .arg(wordlist.clone())
                    .arg("-o")
                    .arg(out.display().to_string())
                    .arg_if(cx.config.verbose, "-v");
                (host.clone(), vec![cmd])
            })
            .collect();

        let results = run_bounded(cx.config.threads, tasks).await;
        let mut found = 0usize;
        for (host, outcome) in results {
            let name = format!("{}:{host}", id.artifact());
            match outcome {
                Ok(()) => {
                    found += 1;
                    let file = cx.ws.content_file(&host);
                    cx.produce(name, &file);
                }
                Err(e) => {
                    warn!("content discovery on {host} failed: {e}");
                    cx.index.record_failed(name, e.to_string());
                }
            }
        }

        info!("content discovery finished for {found}/{} hosts", hosts.len());
        Ok(())
    }
}
