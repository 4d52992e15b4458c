//! Dual-sink logging: colored symbol-prefixed lines on the terminal,
//! the same event stream appended plainly to the persistent run log.

use std::fs::OpenOptions;
use std::path::Path;

use colored::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use super::spinner::SpinnerWriter;

/// Event target reserved for pre-formatted lines (banner, summary);
/// the formatter passes these through without a level symbol.
pub const RAW_TARGET: &str = "sweepr::print";

pub struct SweeprFormatter;

impl<S, N> FormatEvent<S, N> for SweeprFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        if meta.target() == RAW_TARGET {
            ctx.field_format().format_fields(writer.by_ref(), event)?;
            return writeln!(writer);
        }

        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) = match *meta.level() {
            Level::TRACE => ("[ ]", |s| s.dimmed()),
            Level::DEBUG => ("[?]", |s| s.blue()),
            Level::INFO => ("[+]", |s| s.green().bold()),
            Level::WARN => ("[*]", |s| s.yellow().bold()),
            Level::ERROR => ("[-]", |s| s.red().bold()),
        };

        write!(writer, "{} ", color_func(symbol.into()))?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Initializes the duplicated output sink required for every line of
/// progress and error text: both layers are fed from the same event
/// stream, so ordering between terminal and log file matches.
pub fn init(log_file: &Path, verbose: bool) -> anyhow::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;
    let level = if verbose { "debug" } else { "info" };

    let terminal_layer = tracing_subscriber::fmt::layer()
        .event_format(SweeprFormatter)
        .with_writer(|| SpinnerWriter)
        .with_filter(EnvFilter::new(level));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(terminal_layer)
        .with(file_layer)
        .init();

    Ok(())
}
