//! # Report Builder
//!
//! Renders the artifact index into one self-contained HTML document at
//! the workspace root. The index is the only input: stages that failed
//! show an explicit marker with the recorded reason, and every per-host
//! artifact actually produced gets its own link, so a host whose
//! service scan failed reads differently from a host never scanned.

use std::path::PathBuf;

use tracing::info;

use sweepr_common::error::Error;
use sweepr_common::target::Target;

use crate::artifact::{ArtifactIndex, Entry, Outcome};
use crate::stage::StageId;
use crate::workspace::Workspace;

const STYLE: &str = "\
body { font-family: monospace; margin: 2em auto; max-width: 60em; color: #222; }\n\
h1 { border-bottom: 2px solid #222; padding-bottom: 0.3em; }\n\
h2 { margin-top: 1.5em; }\n\
ul { list-style: none; padding-left: 1em; }\n\
li { margin: 0.2em 0; }\n\
.failed { color: #b00020; }\n\
.skipped { color: #777; font-style: italic; }\n";

/// Writes `report.html` and returns its path.
pub fn write(ws: &Workspace, target: &Target, index: &ArtifactIndex) -> Result<PathBuf, Error> {
    let mut html = String::with_capacity(4096);
    html.push_str("<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>sweep of {}</title>\n", escape(target.as_str())));
    html.push_str(&format!("<style>\n{STYLE}</style>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>sweep of {}</h1>\n", escape(target.as_str())));
    html.push_str(&format!(
        "<p>{} artifacts produced, {} failures recorded.</p>\n",
        index.produced_count(),
        index.failed_count()
    ));

    for stage in StageId::ALL {
        html.push_str(&format!("<h2>{}</h2>\n<ul>\n", escape(stage.title())));

        let primary = index.get(stage.artifact());
        let per_host: Vec<&Entry> = index
            .with_prefix(&format!("{}:", stage.artifact()));

        if primary.is_none() && per_host.is_empty() {
            html.push_str("<li class=\"skipped\">no output</li>\n");
        }
        if let Some(entry) = primary {
            html.push_str(&render_entry(entry));
        }
        for entry in per_host {
            html.push_str(&render_entry(entry));
        }

        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");

    let path = ws.report_file();
    std::fs::write(&path, html)?;
    info!("report written to {}", path.display());
    Ok(path)
}

fn render_entry(entry: &Entry) -> String {
    let name = escape(&entry.name);
    match &entry.outcome {
        Outcome::Produced { path } => {
            let href = escape(&path.display().to_string());
            format!("<li><a href=\"{href}\">{name}</a></li>\n")
        }
        Outcome::Failed { reason } => format!(
            "<li class=\"failed\">{name} &mdash; stage failed: {}</li>\n",
            escape(reason)
        ),
        Outcome::Skipped { reason } => format!(
            "<li class=\"skipped\">{name} &mdash; no output: {}</li>\n",
            escape(reason)
        ),
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
