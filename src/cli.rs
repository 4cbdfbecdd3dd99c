use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "modstats",
    version,
    about = "Test coverage statistics for Drupal core and contrib modules"
)]
pub struct Cli {
    #[arg(
        short = 'l',
        long = "local-module",
        value_name = "PATH",
        help = "Directory of a local module to include in the stats count (repeatable)"
    )]
    pub local_module: Vec<PathBuf>,

    #[arg(
        short = 'c',
        long = "contrib-module",
        value_name = "NAME",
        help = "Contrib module to download and include, by repository path (e.g. modules/views, repeatable)"
    )]
    pub contrib_module: Vec<String>,

    #[arg(long, help = "Skip the top-modules download; report core and custom modules only")]
    pub core_only: bool,

    #[arg(long, help = "Count only each module root's immediate files")]
    pub no_recurse: bool,

    #[arg(
        long,
        value_name = "PATH",
        help = "Where module checkouts land (overrides the config file)"
    )]
    pub download_dir: Option<PathBuf>,
}
