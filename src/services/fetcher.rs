use crate::services::storage::DownloadLayout;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

pub const CORE_CVS_ROOT: &str = ":pserver:anonymous:anonymous@cvs.drupal.org:/cvs/drupal";
pub const CONTRIB_CVS_ROOT: &str =
    ":pserver:anonymous:anonymous@cvs.drupal.org:/cvs/drupal-contrib";

/// The most popular contrib modules and themes, in order of popularity, by
/// their repository path segments.
pub const TOP_MODULES: &[&str] = &[
    "modules/views",
    "modules/cck",
    "modules/token",
    "modules/pathauto",
    "modules/filefield",
    "modules/admin_menu",
    "modules/imageapi",
    "modules/imagefield",
    "modules/imagecache",
    "modules/date",
    "modules/imce",
    "modules/google_analytics",
    "modules/wysiwyg",
    "modules/webform",
    "modules/advanced_help",
    "modules/poormanscron",
    "modules/captcha",
    "modules/image",
    "modules/jquery_ui",
    "modules/ctools",
    "modules/lightbox2",
    "modules/nodewords",
    "modules/link",
    "modules/backup_migrate",
    "modules/jquery_update",
    "modules/devel",
    "modules/xmlsitemap",
    "modules/fckeditor",
    "modules/panels",
    "modules/globalredirect",
    "modules/calendar",
    "modules/page_title",
    "themes/zen",
    "modules/imce_wysiwyg",
    "modules/transliteration",
    "modules/votingapi",
    "modules/ckeditor",
    "modules/views_slideshow",
    "modules/print",
    "modules/nice_menus",
    "modules/tagadelic",
    "modules/email",
    "modules/logintoboggan",
    "modules/contemplate",
    "modules/site_map",
    "modules/path_redirect",
    "modules/emfield",
    "modules/i18n",
];

/// Checkout bookkeeping entries that are not modules.
const CORE_LISTING_FILTER: &[&str] = &["README.txt", "CVS"];

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("I/O failure during checkout of {module}: {source}")]
    Io {
        module: String,
        source: std::io::Error,
    },
    #[error("cvs checkout of {module} exited with {status}")]
    CheckoutFailed { module: String, status: ExitStatus },
}

fn run_checkout(
    cvs_root: &str,
    source: &str,
    dest: &Path,
    tag: Option<&str>,
    label: &str,
) -> Result<(), FetchError> {
    let mut cmd = Command::new("cvs");
    cmd.arg("-z6")
        .arg("-d")
        .arg(cvs_root)
        .arg("checkout")
        .arg("-P");
    if let Some(tag) = tag {
        cmd.arg("-r").arg(tag);
    }
    cmd.arg("-d").arg(dest).arg(source);
    let status = cmd.status().map_err(|source| FetchError::Io {
        module: label.to_string(),
        source,
    })?;
    if !status.success() {
        return Err(FetchError::CheckoutFailed {
            module: label.to_string(),
            status,
        });
    }
    Ok(())
}

fn io_err(label: &str, source: std::io::Error) -> FetchError {
    FetchError::Io {
        module: label.to_string(),
        source,
    }
}

fn list_module_dirs(dest: &Path, label: &str) -> Result<Vec<PathBuf>, FetchError> {
    let mut modules = Vec::new();
    for entry in std::fs::read_dir(dest).map_err(|e| io_err(label, e))? {
        let entry = entry.map_err(|e| io_err(label, e))?;
        let name = entry.file_name();
        if CORE_LISTING_FILTER.iter().any(|f| name == *f) {
            continue;
        }
        if !entry.file_type().map_err(|e| io_err(label, e))?.is_dir() {
            continue;
        }
        modules.push(entry.path().canonicalize().map_err(|e| io_err(label, e))?);
    }
    modules.sort();
    Ok(modules)
}

/// Checks out the whole core modules tree and returns the absolute path of
/// each module directory found in it.
pub fn checkout_core(layout: &DownloadLayout, cvs_root: &str) -> Result<Vec<PathBuf>, FetchError> {
    let dest = layout.core_dir();
    run_checkout(cvs_root, "drupal/modules", &dest, None, "drupal core")?;
    list_module_dirs(&dest, "drupal core")
}

/// Checks out one contrib module. A pinned tag yields a release checkout;
/// without a tag the checkout is unversioned.
pub fn checkout_contrib(
    layout: &DownloadLayout,
    cvs_root: &str,
    module_path: &str,
    tag: Option<&str>,
) -> Result<PathBuf, FetchError> {
    let dest = layout.contrib_dir().join(module_path);
    run_checkout(
        cvs_root,
        &format!("contributions/{module_path}/"),
        &dest,
        tag,
        module_path,
    )?;
    dest.canonicalize().map_err(|e| io_err(module_path, e))
}

/// Last segment of a repository path: `modules/views` -> `views`.
pub fn module_basename(module_path: &str) -> &str {
    module_path.rsplit('/').next().unwrap_or(module_path)
}
