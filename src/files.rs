//! Blob storage for product files and preview images.
//!
//! Downloadable files live in a private directory; preview images live under
//! the public web root and are referenced by their `/products/...` URL path.
//! Blob names are `{uuid}-{original-filename}` so concurrent uploads of the
//! same filename never collide.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// URL prefix under which preview images are served.
pub const IMAGE_URL_PREFIX: &str = "/products";

/// Filesystem store for product blobs.
#[derive(Debug, Clone)]
pub struct FileStore {
    files_dir: PathBuf,
    public_dir: PathBuf,
}

impl FileStore {
    pub fn new(files_dir: impl Into<PathBuf>, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            files_dir: files_dir.into(),
            public_dir: public_dir.into(),
        }
    }

    /// Directory from which the web server serves preview images.
    pub fn image_serve_root(&self) -> PathBuf {
        self.public_dir.join("products")
    }

    /// Store a downloadable product file, returning its stored path.
    pub fn save_file(&self, original_name: &str, bytes: &[u8]) -> io::Result<String> {
        fs::create_dir_all(&self.files_dir)?;
        let path = self.files_dir.join(blob_name(original_name));
        fs::write(&path, bytes)?;
        Ok(path.to_string_lossy().into_owned())
    }

    /// Store a preview image, returning its public URL path.
    pub fn save_image(&self, original_name: &str, bytes: &[u8]) -> io::Result<String> {
        let dir = self.image_serve_root();
        fs::create_dir_all(&dir)?;
        let blob = blob_name(original_name);
        fs::write(dir.join(&blob), bytes)?;
        Ok(format!("{IMAGE_URL_PREFIX}/{blob}"))
    }

    /// Read a stored product file.
    pub fn read_file(&self, file_path: &str) -> io::Result<Vec<u8>> {
        fs::read(file_path)
    }

    /// Delete a stored product file.
    pub fn remove_file(&self, file_path: &str) -> io::Result<()> {
        fs::remove_file(file_path)
    }

    /// Delete a preview image given its public URL path.
    pub fn remove_image(&self, image_path: &str) -> io::Result<()> {
        fs::remove_file(self.public_dir.join(image_path.trim_start_matches('/')))
    }
}

fn blob_name(original_name: &str) -> String {
    // Keep only the final path component of the client-supplied name.
    let original = Path::new(original_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    format!("{}-{}", Uuid::new_v4(), original)
}
