use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use bon::Builder;
use image::ImageFormat;
use kdam::{BarExt, tqdm};
use tracing::{debug, warn};

use crate::data::example::{CountExample, ImagePayload};

/// Neither image dimension exceeds this after the build (aspect preserved).
pub const DEFAULT_MAX_DIMENSION: u32 = 1024;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("could not read dataset root `{path}`")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of a dataset build. Skips are counted rather than fatal, so a
/// partial build is always explicit to the caller.
#[derive(Debug, Default)]
pub struct DatasetBuild {
    pub examples: Vec<CountExample>,
    /// Subdirectories whose name did not parse as a non-negative integer.
    pub skipped_dirs: usize,
    /// Image files that could not be read or decoded.
    pub skipped_files: usize,
}

/// Builds a count dataset from a directory-per-label image corpus.
///
/// The root contains one subdirectory per integer label; every `.jpg`,
/// `.jpeg`, or `.png` file (case-insensitive) inside a label directory becomes
/// one [`CountExample`]. Labels are visited in ascending numeric order and
/// files within a label directory in sorted name order, so the output
/// sequence is stable across filesystems. Images are downscaled so neither
/// dimension exceeds
/// `max_dimension` (never upscaled) and re-encoded as PNG.
///
/// Unparsable directory names and undecodable files are logged and skipped;
/// only an unreadable root is an error.
#[derive(Builder, Debug)]
pub struct DatasetBuilder {
    #[builder(default = DEFAULT_MAX_DIMENSION)]
    pub max_dimension: u32,

    #[builder(default = true)]
    pub show_progress: bool,
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DatasetBuilder {
    pub fn build_dataset(&self, root: impl AsRef<Path>) -> Result<DatasetBuild, DatasetError> {
        let root = root.as_ref();
        let mut build = DatasetBuild::default();

        let mut labeled_files: Vec<(u32, Vec<PathBuf>)> = Vec::new();
        for dir in sorted_subdirectories(root)? {
            let name = dir.file_name().unwrap_or_default().to_string_lossy();
            let label: u32 = match name.parse() {
                Ok(label) => label,
                Err(_) => {
                    warn!(directory = %name, "skipping non-numeric label directory");
                    build.skipped_dirs += 1;
                    continue;
                }
            };
            labeled_files.push((label, sorted_image_files(&dir)));
        }
        // Numeric order, not path order: `10` must come after `2`.
        labeled_files.sort_by_key(|(label, _)| *label);

        let total: usize = labeled_files.iter().map(|(_, files)| files.len()).sum();
        let mut bar = self
            .show_progress
            .then(|| tqdm!(total = total, desc = "building dataset"));

        for (label, files) in labeled_files {
            for path in files {
                match self.load_image(&path) {
                    Ok(image) => {
                        debug!(path = %path.display(), label, "added example");
                        build.examples.push(CountExample::new(image, label));
                    }
                    Err(err) => {
                        warn!(path = %path.display(), error = %err, "skipping unreadable image");
                        build.skipped_files += 1;
                    }
                }
                if let Some(bar) = bar.as_mut() {
                    let _ = bar.update(1);
                }
            }
        }

        Ok(build)
    }

    fn load_image(&self, path: &Path) -> Result<ImagePayload, image::ImageError> {
        let mut decoded = image::ImageReader::open(path)
            .map_err(image::ImageError::IoError)?
            .with_guessed_format()
            .map_err(image::ImageError::IoError)?
            .decode()?;

        if decoded.width() > self.max_dimension || decoded.height() > self.max_dimension {
            decoded = decoded.thumbnail(self.max_dimension, self.max_dimension);
        }

        let mut bytes = Cursor::new(Vec::new());
        decoded.write_to(&mut bytes, ImageFormat::Png)?;

        Ok(ImagePayload::new(
            bytes.into_inner(),
            decoded.width(),
            decoded.height(),
            "image/png",
        ))
    }
}

/// Builds a dataset from `root` with the default settings.
pub fn build_count_dataset(root: impl AsRef<Path>) -> Result<DatasetBuild, DatasetError> {
    DatasetBuilder::default().build_dataset(root)
}

fn sorted_subdirectories(root: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let entries = fs::read_dir(root).map_err(|source| DatasetError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn sorted_image_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_image_extension(path))
        .collect();
    files.sort();
    files
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_has_image_extension_is_case_insensitive() {
        assert!(has_image_extension(&PathBuf::from("a.JPG")));
        assert!(has_image_extension(&PathBuf::from("a.jpeg")));
        assert!(has_image_extension(&PathBuf::from("a.Png")));
        assert!(!has_image_extension(&PathBuf::from("a.gif")));
        assert!(!has_image_extension(&PathBuf::from("jpg")));
    }
}
