use std::path::{Path, PathBuf};

/// Filesystem layout under the download root: `core/` for the core checkout,
/// `contrib/<path>/` for contrib modules, plus the run log.
#[derive(Clone, Debug)]
pub struct DownloadLayout {
    root: PathBuf,
}

impl DownloadLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn core_dir(&self) -> PathBuf {
        self.root.join("core")
    }

    pub fn contrib_dir(&self) -> PathBuf {
        self.root.join("contrib")
    }

    pub fn run_log_path(&self) -> PathBuf {
        self.root.join("run-log.jsonl")
    }

    /// Pre-creates the contrib subtrees the checkouts land in. Existing
    /// directories are fine.
    pub fn ensure(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(self.contrib_dir().join("modules"))?;
        std::fs::create_dir_all(self.contrib_dir().join("themes"))?;
        Ok(())
    }
}

/// Best-effort run log: one JSONL event per checkout attempt or skipped
/// module. Write failures are ignored; the log never affects the run.
pub fn log_event(layout: &DownloadLayout, action: &str, data: serde_json::Value) {
    if std::fs::create_dir_all(layout.root()).is_err() {
        return;
    }
    let event = serde_json::json!({
        "ts": epoch_secs(),
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(layout.run_log_path())
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()));
}

fn epoch_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
