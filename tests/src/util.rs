//! Stub-executable scaffolding: each external tool is replaced by a
//! small shell script that honors the real tool's output flag, wired
//! into the pipeline through a custom `ToolSet`.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use sweepr_core::tools::ToolSet;

static SCRATCH_ID: AtomicUsize = AtomicUsize::new(0);

pub const FAIL: &str = "#!/bin/sh\nexit 1\n";

/// A scratch directory holding stub executables, the required input
/// files and the workspace for one test run. Removed on drop.
pub struct TestRig {
    pub dir: PathBuf,
    pub tools: ToolSet,
}

impl TestRig {
    /// Builds a rig where every tool succeeds and produces plausible
    /// output: two subdomains, two resolved addresses, three open
    /// ports. Individual tests override single tools from here.
    pub fn new(tag: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "sweepr-it-{tag}-{}-{}",
            std::process::id(),
            SCRATCH_ID.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create scratch dir");

        let resolvers = dir.join("resolvers.txt");
        fs::write(&resolvers, "1.1.1.1\n8.8.8.8\n").expect("write resolver list");
        let wordlist = dir.join("wordlist.txt");
        fs::write(&wordlist, "admin\nlogin\n").expect("write wordlist");

        let mut rig = TestRig {
            dir,
            tools: ToolSet::default(),
        };
        rig.tools.resolvers = resolvers;
        rig.tools.wordlist = wordlist;

        rig.tools.subfinder = rig.stub(
            "subfinder",
            &emit_after_flag("-o", "sub.example.com\napi.example.com\n"),
        );
        rig.tools.subjack = rig.stub("subjack", &emit_after_flag("-o", "no takeovers\n"));
        rig.tools.corsy = rig.stub("corsy", &emit_after_flag("-o", "no cors issues\n"));
        rig.tools.massdns = rig.stub(
            "massdns",
            &emit_after_flag(
                "-w",
                "sub.example.com. A 10.0.0.1\napi.example.com. A 10.0.0.2\n",
            ),
        );
        rig.tools.gowitness = rig.stub("gowitness", GOWITNESS_STUB);
        rig.tools.ffuf = rig.stub("ffuf", &emit_after_flag("-o", "admin\n"));
        rig.tools.masscan = rig.stub(
            "masscan",
            &emit_after_flag(
                "-oJ",
                r#"[{"ip": "10.0.0.1", "ports": [{"port": 80}]}, {"ip": "10.0.0.1", "ports": [{"port": 443}]}, {"ip": "10.0.0.2", "ports": [{"port": 22}]}]"#,
            ),
        );
        rig.tools.nmap = rig.stub("nmap", &emit_after_flag("-oX", "<nmaprun></nmaprun>\n"));
        rig.tools.xsltproc = rig.stub("xsltproc", &emit_after_flag("-o", "<html></html>\n"));

        rig
    }

    /// Writes an executable script named `name` into the rig.
    pub fn stub(&self, name: &str, script: &str) -> PathBuf {
        let path = self.dir.join(name);
        fs::write(&path, script).expect("write stub");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod stub");
        path
    }

    /// A stub that records its own invocation by touching `marker`,
    /// for asserting a tool was never spawned.
    pub fn marker_stub(&self, name: &str, marker: &Path) -> PathBuf {
        self.stub(
            name,
            &format!("#!/bin/sh\n: > \"{}\"\nexit 0\n", marker.display()),
        )
    }
}

impl Drop for TestRig {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

/// A script that writes `content` to the argument following `flag`,
/// the contract shared by every list-to-file tool in the pipeline.
pub fn emit_after_flag(flag: &str, content: &str) -> String {
    format!(
        "#!/bin/sh\n\
         out=\"\"\n\
         prev=\"\"\n\
         for a in \"$@\"; do\n\
           if [ \"$prev\" = \"{flag}\" ]; then out=\"$a\"; fi\n\
           prev=\"$a\"\n\
         done\n\
         printf '%s' '{content}' > \"$out\"\n"
    )
}

/// The screenshot tool takes a destination directory and an output
/// name instead of a single output flag.
const GOWITNESS_STUB: &str = "#!/bin/sh\n\
dest=\"\"\n\
name=\"\"\n\
prev=\"\"\n\
for a in \"$@\"; do\n\
  case \"$prev\" in\n\
    --destination) dest=\"$a\" ;;\n\
    --output) name=\"$a\" ;;\n\
  esac\n\
  prev=\"$a\"\n\
done\n\
: > \"$dest/$name\"\n";
