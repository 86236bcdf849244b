//! Collects the images in a folder that seed the selection list.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use image::ImageFormat;
use thiserror::Error;
use walkdir::WalkDir;

const EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "tiff", "tif", "bmp", "gif"];

const FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::WebP,
    ImageFormat::Tiff,
    ImageFormat::Bmp,
    ImageFormat::Gif,
];

/// Enough for every signature in [`FORMATS`] (WebP needs 12).
const MAGIC_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("folder not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("folder is empty: {}", .0.display())]
    EmptyFolder(PathBuf),

    #[error("no valid images found in {} (supported formats: {})", .0.display(), supported_formats())]
    NoValidImages(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

pub fn supported_formats() -> String {
    FORMATS
        .iter()
        .map(|format| format!("{format:?}").to_uppercase())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Non-recursive scan of `folder`, sorted by file name.
///
/// Hidden files and anything without an image extension are skipped
/// silently; files whose content does not match a supported format are
/// skipped with a warning.
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !folder.exists() {
        return Err(ScanError::NotFound(folder.to_path_buf()));
    }
    if !folder.is_dir() {
        return Err(ScanError::NotADirectory(folder.to_path_buf()));
    }

    let mut saw_any = false;
    let mut images = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ScanError::Io {
            path: folder.to_path_buf(),
            source,
        })?;
        saw_any = true;
        if !entry.file_type().is_file() || is_hidden(entry.path()) || !has_image_extension(entry.path()) {
            continue;
        }
        if is_valid_image(entry.path()) {
            images.push(entry.into_path());
        } else {
            tracing::warn!(path = %entry.path().display(), "skipping file that is not a supported image");
        }
    }

    if !saw_any {
        return Err(ScanError::EmptyFolder(folder.to_path_buf()));
    }
    if images.is_empty() {
        return Err(ScanError::NoValidImages(folder.to_path_buf()));
    }
    tracing::info!(folder = %folder.display(), count = images.len(), "scanned folder");
    Ok(images)
}

/// Whether the file starts with the signature of a supported format.
pub fn is_valid_image(path: &Path) -> bool {
    let mut header = Vec::with_capacity(MAGIC_LEN);
    let read = File::open(path).and_then(|file| file.take(MAGIC_LEN as u64).read_to_end(&mut header));
    if let Err(err) = read {
        tracing::debug!(path = %path.display(), error = %err, "cannot read image header");
        return false;
    }
    image::guess_format(&header).is_ok_and(|format| FORMATS.contains(&format))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

fn has_image_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        let ext = ext.to_string_lossy();
        EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known))
    })
}
