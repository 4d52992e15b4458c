//! # Stage Runner
//!
//! Executes the fixed stage sequence in ordinal order, enforcing the
//! two-tier failure policy: fatal errors (missing dependency, bad
//! input, workspace i/o) abort the run; tool failures and unmet data
//! dependencies are recorded against the stage and the pipeline moves
//! on. No stage starts before its predecessor has finished.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use sweepr_common::config::Config;
use sweepr_common::error::Error;
use sweepr_common::target::Target;

use crate::artifact::ArtifactIndex;
use crate::exec::ToolCommand;
use crate::stage::{RunContext, Stage};
use crate::stages;
use crate::tools::ToolSet;
use crate::workspace::Workspace;

/// The pipeline in its fixed order.
fn pipeline() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(stages::subdomains::SubdomainStage),
        Box::new(stages::takeover::TakeoverStage),
        Box::new(stages::cors::CorsStage),
        Box::new(stages::dns::DnsStage),
        Box::new(stages::screenshots::ScreenshotStage),
        Box::new(stages::content::ContentStage),
        Box::new(stages::portscan::PortScanStage),
        Box::new(stages::services::ServiceStage),
    ]
}

/// Runs every stage against `target` and returns the completed
/// artifact index. Soft failures are inside the index; an `Err` here
/// means the run itself was aborted.
pub async fn run(
    target: &Target,
    config: &Config,
    tools: &ToolSet,
    ws: &Workspace,
) -> Result<ArtifactIndex, Error> {
    let mut cx = RunContext::new(target, config, tools, ws);

    for stage in pipeline() {
        let id = stage.id();
        info!("starting {}", id.title());

        match stage.run(&mut cx).await {
            Ok(()) => {}
            Err(e) if e.is_fatal() || stage.required() => {
                return Err(e);
            }
            Err(e) => {
                warn!("{} failed: {e}", id.title());
                cx.index.record_failed(id.artifact(), e.to_string());
            }
        }
    }

    cx.index.write_json(&ws.index_file())?;
    Ok(cx.index)
}

/// Runs one command chain per work item, at most `limit` chains in
/// flight. Within a chain the commands run in order and the first
/// failure wins. Results come back sorted by label so downstream
/// bookkeeping is deterministic; once dispatched, a task always runs
/// to completion.
pub(crate) async fn run_bounded(
    limit: usize,
    tasks: Vec<(String, Vec<ToolCommand>)>,
) -> Vec<(String, Result<(), Error>)> {
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let mut in_flight = FuturesUnordered::new();

    for (label, chain) in tasks {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore closed");

        in_flight.push(tokio::spawn(async move {
            let mut outcome = Ok(());
            for cmd in chain {
                if let Err(e) = cmd.run().await {
                    outcome = Err(e);
                    break;
                }
            }
            drop(permit);
            (label, outcome)
        }));
    }

    let mut results = Vec::new();
    while let Some(joined) = in_flight.next().await {
        match joined {
            Ok(pair) => results.push(pair),
            Err(e) => warn!("per-host task panicked: {e}"),
        }
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
