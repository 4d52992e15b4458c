use std::str::FromStr;

use sweepr_common::config::Config;
use sweepr_common::error::Error;
use sweepr_common::target::Target;
use sweepr_core::artifact::{ArtifactIndex, Outcome};
use sweepr_core::workspace::Workspace;
use sweepr_core::{report, runner};

use crate::util::{FAIL, TestRig};

fn config() -> Config {
    Config {
        threads: 3,
        vuln_scan: false,
        verbose: false,
    }
}

async fn sweep(rig: &TestRig) -> (Workspace, Result<ArtifactIndex, Error>) {
    let target = Target::from_str("example.com").unwrap();
    let ws = Workspace::create_in(&rig.dir.join("out"), &target).unwrap();
    let result = runner::run(&target, &config(), &rig.tools, &ws).await;
    (ws, result)
}

fn assert_produced(index: &ArtifactIndex, name: &str) {
    match index.get(name) {
        Some(entry) => assert!(
            matches!(entry.outcome, Outcome::Produced { .. }),
            "expected '{name}' to be produced, got {:?}",
            entry.outcome
        ),
        None => panic!("no index entry for '{name}'"),
    }
}

fn assert_failed(index: &ArtifactIndex, name: &str, reason_part: &str) {
    match index.get(name) {
        Some(entry) => match &entry.outcome {
            Outcome::Failed { reason } => assert!(
                reason.contains(reason_part),
                "failure reason for '{name}' was '{reason}', expected it to mention '{reason_part}'"
            ),
            other => panic!("expected '{name}' to be failed, got {other:?}"),
        },
        None => panic!("no index entry for '{name}'"),
    }
}

#[tokio::test]
async fn full_pipeline_happy_path() {
    let rig = TestRig::new("happy");
    let (ws, result) = sweep(&rig).await;
    let index = result.expect("pipeline should complete");

    assert_produced(&index, "subdomains");
    assert_produced(&index, "takeover");
    assert_produced(&index, "cors");
    assert_produced(&index, "resolved-hosts");
    assert_produced(&index, "open-ports");
    for host in ["api.example.com", "sub.example.com"] {
        assert_produced(&index, &format!("screenshot:{host}"));
        assert_produced(&index, &format!("content:{host}"));
    }
    for ip in ["10.0.0.1", "10.0.0.2"] {
        assert_produced(&index, &format!("service-scan:{ip}"));
    }

    // The normalized host list is sorted and newline-terminated.
    let subdomains = std::fs::read_to_string(ws.subdomains_file()).unwrap();
    assert_eq!(subdomains, "api.example.com\nsub.example.com\n");

    // Each scanned host got its rendered service report.
    assert!(ws.root().join("services/10.0.0.1.html").is_file());
    assert!(ws.root().join("services/10.0.0.2.html").is_file());

    // The index is persisted alongside the artifacts.
    assert!(ws.index_file().is_file());

    let target = Target::from_str("example.com").unwrap();
    let report_path = report::write(&ws, &target, &index).unwrap();
    let html = std::fs::read_to_string(report_path).unwrap();
    assert!(html.contains("service-scan:10.0.0.1"));
    assert!(html.contains("service-scan:10.0.0.2"));
}

#[tokio::test]
async fn zero_hosts_is_not_an_error() {
    let mut rig = TestRig::new("zero-hosts");
    rig.tools.subfinder = rig.stub("subfinder", &crate::util::emit_after_flag("-o", ""));

    let (_ws, result) = sweep(&rig).await;
    let index = result.expect("empty host list must not be fatal");

    assert_produced(&index, "subdomains");
    // No per-host work was dispatched anywhere downstream.
    assert_eq!(index.with_prefix("screenshot:").len(), 0);
    assert_eq!(index.with_prefix("content:").len(), 0);
    assert_eq!(index.with_prefix("service-scan:").len(), 0);
    // The list-based stages were skipped, not failed.
    for name in ["takeover", "cors", "resolved-hosts", "open-ports", "service-scan"] {
        let entry = index.get(name).unwrap_or_else(|| panic!("missing '{name}'"));
        assert!(
            matches!(entry.outcome, Outcome::Skipped { .. }),
            "'{name}' should be skipped, got {:?}",
            entry.outcome
        );
    }
}

#[tokio::test]
async fn soft_failure_does_not_abort_siblings() {
    let mut rig = TestRig::new("soft-fail");
    rig.tools.subjack = rig.stub("subjack", FAIL);
    rig.tools.gowitness = rig.stub("gowitness", FAIL);

    let (ws, result) = sweep(&rig).await;
    let index = result.expect("soft failures must not abort the run");

    assert_failed(&index, "takeover", "exit code 1");

    // Unrelated stages still ran and their artifacts are recorded.
    assert_produced(&index, "cors");
    assert_produced(&index, "resolved-hosts");
    assert_produced(&index, "open-ports");

    // Per-host screenshot failures are recorded per task and do not
    // stop content discovery.
    assert_failed(&index, "screenshot:api.example.com", "exit code 1");
    assert_failed(&index, "screenshot:sub.example.com", "exit code 1");
    assert_produced(&index, "content:api.example.com");

    let target = Target::from_str("example.com").unwrap();
    let report_path = report::write(&ws, &target, &index).unwrap();
    let html = std::fs::read_to_string(report_path).unwrap();
    assert!(html.contains("stage failed"));
}

#[tokio::test]
async fn failed_upstream_stage_starves_only_its_dependents() {
    let mut rig = TestRig::new("unmet");
    rig.tools.massdns = rig.stub("massdns", FAIL);

    let (_ws, result) = sweep(&rig).await;
    let index = result.expect("an unmet data dependency must not abort the run");

    assert_failed(&index, "resolved-hosts", "exit code 1");
    // Port scan and service enumeration starve on the missing artifact...
    assert_failed(&index, "open-ports", "resolved-hosts");
    assert_failed(&index, "service-scan", "open-ports");
    // ...while stages that only need the host list are untouched.
    assert_produced(&index, "takeover");
    assert_produced(&index, "cors");
    assert_produced(&index, "screenshot:api.example.com");
    assert_produced(&index, "content:api.example.com");
}

#[tokio::test]
async fn missing_resolver_list_aborts_before_spawning() {
    let rig = TestRig::new("no-resolvers");
    let massdns_marker = rig.dir.join("massdns-ran");
    let masscan_marker = rig.dir.join("masscan-ran");

    let mut rig = rig;
    rig.tools.massdns = rig.marker_stub("massdns", &massdns_marker);
    rig.tools.masscan = rig.marker_stub("masscan", &masscan_marker);
    rig.tools.resolvers = rig.dir.join("definitely-missing.txt");

    let (_ws, result) = sweep(&rig).await;
    match result {
        Err(Error::MissingDependency(msg)) => {
            assert!(msg.contains("resolver list"), "unexpected message: {msg}")
        }
        other => panic!("expected MissingDependency, got {other:?}"),
    }

    // Neither the resolver nor any later stage's tool was spawned.
    assert!(!massdns_marker.exists());
    assert!(!masscan_marker.exists());
}

#[tokio::test]
async fn vuln_toggle_reaches_every_service_scan() {
    let mut rig = TestRig::new("vuln");
    // A stub that refuses to run without the extended script set, so a
    // produced artifact proves the flag was passed for every group.
    rig.tools.nmap = rig.stub(
        "nmap",
        "#!/bin/sh\n\
         seen=0\n\
         out=\"\"\n\
         prev=\"\"\n\
         for a in \"$@\"; do\n\
           if [ \"$a\" = \"--script=vuln\" ]; then seen=1; fi\n\
           if [ \"$prev\" = \"-oX\" ]; then out=\"$a\"; fi\n\
           prev=\"$a\"\n\
         done\n\
         [ \"$seen\" = \"1\" ] || exit 2\n\
         printf '%s' '<nmaprun></nmaprun>' > \"$out\"\n",
    );

    let target = Target::from_str("example.com").unwrap();
    let ws = Workspace::create_in(&rig.dir.join("out"), &target).unwrap();
    let cfg = Config {
        threads: 1,
        vuln_scan: true,
        verbose: false,
    };
    let index = runner::run(&target, &cfg, &rig.tools, &ws)
        .await
        .expect("pipeline should complete");

    assert_produced(&index, "service-scan:10.0.0.1");
    assert_produced(&index, "service-scan:10.0.0.2");
}
