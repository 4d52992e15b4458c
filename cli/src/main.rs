mod commands;
mod terminal;

use anyhow::Context;
use colored::*;

use commands::CommandLine;
use sweepr_core::tools::ToolSet;
use sweepr_core::workspace::Workspace;
use sweepr_core::{report, runner};
use terminal::{logging, print, spinner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg = commands.config();

    let ws = Workspace::create(&commands.domain)
        .with_context(|| format!("failed to create workspace for {}", commands.domain))?;
    logging::init(&ws.log_file(), cfg.verbose)?;

    print::banner();
    print::aligned_line("target", commands.domain.to_string().bold());
    print::aligned_line("threads", cfg.threads);
    print::aligned_line("vuln scan", if cfg.vuln_scan { "on" } else { "off" });
    print::aligned_line("output", ws.root().display());

    print::header("running pipeline");
    spinner::get_spinner().set_message(format!("sweeping {}", commands.domain));

    let outcome = runner::run(&commands.domain, &cfg, &ToolSet::default(), &ws).await;
    spinner::get_spinner().finish_and_clear();
    let index = match outcome {
        Ok(index) => index,
        Err(e) => {
            // Through tracing, so the fatal diagnostic reaches the run
            // log as well as the terminal.
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    let report_path = report::write(&ws, &commands.domain, &index)?;

    print::fat_separator();
    let produced: ColoredString = format!("{} artifacts", index.produced_count())
        .bold()
        .green();
    let failures: ColoredString = match index.failed_count() {
        0 => "no failures".bold().green(),
        n => format!("{n} failures").bold().yellow(),
    };
    print::centerln(&format!("Sweep complete: {produced}, {failures}"));
    print::aligned_line("report", report_path.display());
    print::end_of_program();

    Ok(())
}
