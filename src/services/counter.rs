use crate::domain::models::ModuleStats;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// File extensions that count toward a module's code lines.
pub const CODE_EXTS: &[&str] = &["php", "inc", "module", "install"];

/// SimpleTest suite files.
const TEST_EXT: &str = "test";

const ASSERT_NEEDLE: &[u8] = b"assert";

#[derive(Clone, Copy, Debug)]
pub struct CountOptions {
    /// Walk nested subdirectories. Off means only the module root's
    /// immediate files are counted.
    pub recurse: bool,
}

impl Default for CountOptions {
    fn default() -> Self {
        Self { recurse: true }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CountError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to walk module tree: {0}")]
    Walk(#[from] walkdir::Error),
}

enum FileClass {
    Test,
    Code,
    Other,
}

fn under_tests_dir(rel: &Path) -> bool {
    rel.parent()
        .map(|dir| {
            dir.components()
                .any(|c| matches!(c, Component::Normal(n) if n == "tests"))
        })
        .unwrap_or(false)
}

/// Classification works on the path relative to the module root, so a module
/// that is itself named `tests` does not turn into all-test content.
fn classify(rel: &Path) -> FileClass {
    let Some(ext) = rel.extension().and_then(|e| e.to_str()) else {
        return FileClass::Other;
    };
    if ext == TEST_EXT {
        return FileClass::Test;
    }
    if !CODE_EXTS.contains(&ext) {
        return FileClass::Other;
    }
    if under_tests_dir(rel) {
        FileClass::Test
    } else {
        FileClass::Code
    }
}

/// Lines are `\n`-separated segments; a final segment without a trailing
/// newline still counts, an empty file has none.
fn line_count(bytes: &[u8]) -> u64 {
    if bytes.is_empty() {
        return 0;
    }
    let newlines = bytes.iter().filter(|&&b| b == b'\n').count() as u64;
    if bytes.ends_with(b"\n") {
        newlines
    } else {
        newlines + 1
    }
}

/// Non-overlapping occurrence count. The needle contains no newline, so the
/// whole-buffer count equals the per-line substring count.
fn count_occurrences(haystack: &[u8], needle: &[u8]) -> u64 {
    let mut count = 0;
    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        if &haystack[i..i + needle.len()] == needle {
            count += 1;
            i += needle.len();
        } else {
            i += 1;
        }
    }
    count
}

fn read_file(path: &Path) -> Result<Vec<u8>, CountError> {
    std::fs::read(path).map_err(|source| CountError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Counts one module tree. Pure function of the file contents: re-running on
/// an unchanged tree yields identical stats.
pub fn count_module(root: &Path, opts: CountOptions) -> Result<ModuleStats, CountError> {
    let mut stats = ModuleStats::default();
    let mut walker = WalkDir::new(root).follow_links(false);
    if !opts.recurse {
        walker = walker.max_depth(1);
    }
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        match classify(rel) {
            FileClass::Test => {
                let bytes = read_file(entry.path())?;
                stats.test_lines += line_count(&bytes);
                stats.asserts += count_occurrences(&bytes, ASSERT_NEEDLE);
            }
            FileClass::Code => {
                let bytes = read_file(entry.path())?;
                stats.code_lines += line_count(&bytes);
            }
            FileClass::Other => {}
        }
    }
    Ok(stats)
}
