use clap::Parser;
use std::path::PathBuf;

/// Pick images from a folder with a live terminal preview.
///
/// Selected paths are written to stdout, one per line.
#[derive(Parser, Debug, Default)]
#[command(name = "phototerm", version)]
pub struct Cli {
    /// Folder to scan for images (not recursive).
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Configuration file to use instead of the default location.
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Separate selected paths with NUL instead of newline.
    #[arg(long = "print0", short = '0', default_value_t = false)]
    pub print0: bool,
}
