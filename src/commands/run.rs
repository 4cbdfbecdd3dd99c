use crate::cli::Cli;
use crate::domain::models::{Module, SourceKind};
use crate::services::config::{ConfigFile, ConfigGeneral};
use crate::services::counter::{self, CountOptions};
use crate::services::fetcher;
use crate::services::report::Reporter;
use crate::services::resolver;
use crate::services::storage::{self, DownloadLayout};
use anyhow::Context;
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn handle_run(cli: &Cli, config: &ConfigFile) -> anyhow::Result<()> {
    let general = &config.general;
    let download_dir = cli
        .download_dir
        .clone()
        .unwrap_or_else(|| general.download_dir.clone());
    let layout = DownloadLayout::new(download_dir);
    layout.ensure().context("create download directories")?;

    let opts = CountOptions {
        recurse: !cli.no_recurse,
    };

    // Everything is fetched before the first report line, so slow checkouts
    // cannot interleave with the table.
    let core_modules = checkout_core(&layout, general);
    let top_modules = if cli.core_only {
        Vec::new()
    } else {
        fetch_contrib_set(&layout, general, fetcher::TOP_MODULES.iter().copied())?
    };
    let custom_contrib = fetch_contrib_set(
        &layout,
        general,
        cli.contrib_module.iter().map(String::as_str),
    )?;
    let custom_local = resolve_local_modules(&cli.local_module)?;

    let stdout = std::io::stdout();
    let mut reporter = Reporter::new(stdout.lock());
    reporter.print_header()?;

    reporter.print_line("Core Modules:")?;
    for module in &core_modules {
        count_and_record(&mut reporter, &layout, module, opts)?;
    }

    if !cli.core_only {
        reporter.print_line("Top Modules (sorted by popularity):")?;
        for module in &top_modules {
            count_and_record(&mut reporter, &layout, module, opts)?;
        }
    }

    reporter.print_line("Custom Modules:")?;
    for module in &custom_local {
        // A local module the user asked for must be countable; unlike
        // downloaded modules this is fatal for the run.
        let stats = counter::count_module(&module.root, opts)
            .with_context(|| format!("count local module {}", module.root.display()))?;
        reporter.record_and_print(&module.name, &stats)?;
    }
    for module in &custom_contrib {
        count_and_record(&mut reporter, &layout, module, opts)?;
    }
    if cli.local_module.is_empty() && cli.contrib_module.is_empty() {
        reporter.print_line("\t(None)")?;
    }

    reporter.print_summary()?;
    Ok(())
}

fn module_display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn kind_label(kind: SourceKind) -> String {
    format!("{kind:?}").to_lowercase()
}

fn checkout_core(layout: &DownloadLayout, general: &ConfigGeneral) -> Vec<Module> {
    match fetcher::checkout_core(layout, &general.core_cvs_root) {
        Ok(roots) => {
            storage::log_event(layout, "core_checkout_ok", json!({ "modules": roots.len() }));
            roots
                .into_iter()
                .map(|root| Module {
                    name: module_display_name(&root),
                    kind: SourceKind::Core,
                    root,
                    release_tag: None,
                })
                .collect()
        }
        Err(e) => {
            eprintln!("warning: skipping core modules: {e}");
            storage::log_event(
                layout,
                "core_checkout_failed",
                json!({ "error": e.to_string() }),
            );
            Vec::new()
        }
    }
}

fn fetch_contrib_set<'a>(
    layout: &DownloadLayout,
    general: &ConfigGeneral,
    module_paths: impl Iterator<Item = &'a str>,
) -> anyhow::Result<Vec<Module>> {
    let mut out = Vec::new();
    for module_path in module_paths {
        if let Some(module) = fetch_contrib(layout, general, module_path)? {
            out.push(module);
        }
    }
    Ok(out)
}

/// Resolves a release tag and checks the module out. A feed failure is fatal;
/// a failed checkout skips just this module.
fn fetch_contrib(
    layout: &DownloadLayout,
    general: &ConfigGeneral,
    module_path: &str,
) -> anyhow::Result<Option<Module>> {
    let name = fetcher::module_basename(module_path);
    let tag = resolver::resolve_release_tag(&general.release_history_base, name, &general.core_versions)
        .with_context(|| format!("resolve release tag for {module_path}"))?;

    match fetcher::checkout_contrib(layout, &general.contrib_cvs_root, module_path, tag.as_deref())
    {
        Ok(root) => {
            let module = Module {
                name: name.to_string(),
                kind: SourceKind::Contrib,
                root,
                release_tag: tag,
            };
            storage::log_event(
                layout,
                "contrib_checkout_ok",
                json!({
                    "module": module_path,
                    "kind": kind_label(module.kind),
                    "tag": &module.release_tag,
                }),
            );
            Ok(Some(module))
        }
        Err(e) => {
            eprintln!("warning: skipping {module_path}: {e}");
            storage::log_event(
                layout,
                "contrib_checkout_failed",
                json!({ "module": module_path, "error": e.to_string() }),
            );
            Ok(None)
        }
    }
}

fn resolve_local_modules(paths: &[PathBuf]) -> anyhow::Result<Vec<Module>> {
    let mut out = Vec::new();
    for path in paths {
        let root = path
            .canonicalize()
            .with_context(|| format!("local module not readable: {}", path.display()))?;
        out.push(Module {
            name: module_display_name(&root),
            kind: SourceKind::Local,
            root,
            release_tag: None,
        });
    }
    Ok(out)
}

fn count_and_record<W: Write>(
    reporter: &mut Reporter<W>,
    layout: &DownloadLayout,
    module: &Module,
    opts: CountOptions,
) -> anyhow::Result<()> {
    match counter::count_module(&module.root, opts) {
        Ok(stats) => reporter.record_and_print(&module.name, &stats),
        Err(e) => {
            eprintln!("warning: skipping {}: {e}", module.name);
            storage::log_event(
                layout,
                "count_failed",
                json!({
                    "module": &module.name,
                    "kind": kind_label(module.kind),
                    "error": e.to_string(),
                }),
            );
            Ok(())
        }
    }
}
