use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Isolated environment for one test run: its own HOME, a config that pins
/// every remote to an unreachable local address, and a scratch download dir.
/// Checkouts therefore always fail fast and the report only carries the
/// fixture modules a test passes explicitly.
pub struct TestEnv {
    tmp: TempDir,
    pub home: PathBuf,
    pub download: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");
        let download = tmp.path().join("stats_checkout");

        let env = Self {
            tmp,
            home,
            download,
        };
        env.write_config(&[]);
        env
    }

    /// Rewrites the config file: offline CVS/feed endpoints plus any extra
    /// `key = value` lines for the `[general]` table.
    pub fn write_config(&self, extra: &[&str]) {
        let mut body = String::from(
            "[general]\n\
             core_cvs_root = \":local:/nonexistent/drupal\"\n\
             contrib_cvs_root = \":local:/nonexistent/drupal-contrib\"\n\
             release_history_base = \"http://127.0.0.1:9/release-history\"\n",
        );
        for line in extra {
            body.push_str(line);
            body.push('\n');
        }
        let dir = self.home.join(".config/modstats");
        fs::create_dir_all(&dir).expect("create config dir");
        fs::write(dir.join("config.toml"), body).expect("write config file");
    }

    pub fn cmd_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("modstats").expect("binary under test");
        cmd.env("HOME", &self.home);
        cmd
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = self.cmd_bare();
        cmd.arg("--download-dir").arg(&self.download);
        cmd
    }

    /// Creates a fixture module directory; `files` are (relative path,
    /// contents) pairs, empty for a module with no files at all.
    pub fn write_module(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = self.tmp.path().join("modules").join(name);
        fs::create_dir_all(&dir).expect("create fixture module dir");
        for (rel, contents) in files {
            let path = dir.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create fixture dirs");
            }
            fs::write(path, contents).expect("write fixture file");
        }
        dir
    }

    pub fn scratch_dir(&self, name: &str) -> PathBuf {
        self.tmp.path().join(name)
    }
}
