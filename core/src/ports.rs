//! # Port Aggregator
//!
//! Collapses the raw stream of per-port findings from the mass scanner
//! into one consolidated group per host, so the detailed service
//! enumeration can issue a single invocation per ip. The grouping is a
//! single pass into an ordered map; once built it is never mutated.

use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;

use serde::Deserialize;
use tracing::debug;

/// One open port on one host, exactly as emitted by the port scanner.
/// Many findings may share an ip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortFinding {
    pub ip: IpAddr,
    pub port: u16,
}

/// All open ports recorded for one host. Exists only for ips with at
/// least one finding; the port set is deduplicated and ordered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostPortGroup {
    pub ip: IpAddr,
    pub ports: BTreeSet<u16>,
}

impl HostPortGroup {
    /// The comma-joined port directive for a single service
    /// enumeration invocation, no trailing separator.
    pub fn directive(&self) -> String {
        self.ports
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Groups findings by ip. Iteration order over groups is ascending by
/// ip and the port set ascending by port, so the same findings always
/// produce the same output regardless of input order.
pub fn aggregate(findings: &[PortFinding]) -> Vec<HostPortGroup> {
    let mut by_ip: BTreeMap<IpAddr, BTreeSet<u16>> = BTreeMap::new();
    for finding in findings {
        by_ip.entry(finding.ip).or_default().insert(finding.port);
    }

    by_ip
        .into_iter()
        .map(|(ip, ports)| HostPortGroup { ip, ports })
        .collect()
}

#[derive(Deserialize)]
struct MasscanRecord {
    ip: IpAddr,
    #[serde(default)]
    ports: Vec<MasscanPort>,
}

#[derive(Deserialize)]
struct MasscanPort {
    port: u16,
}

/// Parses the port scanner's JSON output: an array of
/// `{ip, ports: [{port, ...}]}` records.
///
/// masscan is known to emit a trailing comma before the closing
/// bracket and to interleave status lines, so when the strict array
/// parse fails each line is retried as a standalone record.
pub fn parse_masscan(text: &str) -> Vec<PortFinding> {
    let records: Vec<MasscanRecord> = match serde_json::from_str(text.trim()) {
        Ok(records) => records,
        Err(e) => {
            debug!("strict port-scan parse failed ({e}), falling back to per-line parse");
            text.lines()
                .map(|l| l.trim().trim_end_matches(','))
                .filter(|l| l.starts_with('{'))
                .filter_map(|l| serde_json::from_str(l).ok())
                .collect()
        }
    };

    records
        .into_iter()
        .flat_map(|r| {
            let ip = r.ip;
            r.ports
                .into_iter()
                .map(move |p| PortFinding { ip, port: p.port })
        })
        .collect()
}
