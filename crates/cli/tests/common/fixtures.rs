//! Test fixtures: a fake `gtm` on a private PATH

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::cli::BridgeCommand;

/// Fake gtm: prints `$FAKE_GTM_VERSION` to stderr for `-v`, otherwise
/// echoes its arguments, appends them to `$FAKE_GTM_LOG` and exits with
/// `$FAKE_GTM_EXIT`.
const FAKE_GTM: &str = r#"#!/bin/sh
if [ "$1" = "-v" ]; then
  echo "${FAKE_GTM_VERSION:-v1.0}" >&2
  exit 0
fi
echo "$*" >> "$FAKE_GTM_LOG"
echo "gtm: $*"
exit "${FAKE_GTM_EXIT:-0}"
"#;

/// Isolated environment for one test
pub struct TestProject {
    root: TempDir,
}

impl TestProject {
    /// Workspace with a fake gtm installed in `bin/`
    pub fn with_fake_gtm() -> Self {
        let project = Self::without_gtm();
        let gtm = project.bin_dir().join("gtm");
        std::fs::write(&gtm, FAKE_GTM).expect("write fake gtm");
        std::fs::set_permissions(&gtm, std::fs::Permissions::from_mode(0o755))
            .expect("chmod fake gtm");
        project
    }

    /// Workspace whose PATH has no gtm at all
    pub fn without_gtm() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("bin")).expect("create bin dir");
        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.path().join("bin")
    }

    /// Config file path handed to `--config` (absent unless written)
    pub fn config_path(&self) -> PathBuf {
        self.path().join("config.toml")
    }

    pub fn write_config(&self, toml: &str) {
        std::fs::write(self.config_path(), toml).expect("write config");
    }

    pub fn gtm_log(&self) -> PathBuf {
        self.path().join("gtm.log")
    }

    /// Argument lines of every non-probe gtm call, in call order
    pub fn recorded_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.gtm_log())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// A `gtm-bridge` command wired to this project's PATH and config
    pub fn bridge(&self, args: &[&str]) -> BridgeCommand {
        let config = self.config_path();
        let log = self.gtm_log();
        let mut cmd = BridgeCommand::new(self.path());
        cmd.args(&["--config", config.to_str().expect("utf-8 path")])
            .args(args)
            .env("PATH", self.bin_dir().to_str().expect("utf-8 path"))
            .env("FAKE_GTM_LOG", log.to_str().expect("utf-8 path"))
            .env("RUST_LOG", "debug");
        cmd
    }
}
