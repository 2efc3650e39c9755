use super::format::AudioFormat;
use crate::error::{AppError, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Local directory holding uploaded audio blobs.
///
/// A recording references its blob only by the generated filename.
#[derive(Debug, Clone)]
pub struct AudioStorage {
    root: PathBuf,
    max_bytes: usize,
}

impl AudioStorage {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        info!("Audio storage at {}", root.display());
        Ok(Self { root, max_bytes })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Build a unique blob name: `<unix millis>-<random suffix>.<ext>`.
    ///
    /// The extension comes from the uploaded file name when it names a
    /// supported format, so the pipeline can recover the format later.
    pub fn generate_filename(format: AudioFormat, original_name: Option<&str>) -> String {
        let extension = original_name
            .and_then(AudioFormat::from_filename)
            .unwrap_or(format)
            .extension();
        let suffix = uuid::Uuid::new_v4().simple().to_string();

        format!(
            "{}-{}.{}",
            Utc::now().timestamp_millis(),
            &suffix[..12],
            extension
        )
    }

    /// Write an uploaded blob and return its stored filename
    pub async fn save(
        &self,
        bytes: &[u8],
        format: AudioFormat,
        original_name: Option<&str>,
    ) -> Result<String> {
        if bytes.len() > self.max_bytes {
            return Err(AppError::PayloadTooLarge {
                limit: self.max_bytes,
            });
        }

        let filename = Self::generate_filename(format, original_name);
        tokio::fs::write(self.root.join(&filename), bytes).await?;
        info!("Stored upload {} ({} bytes)", filename, bytes.len());

        Ok(filename)
    }

    pub async fn read(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.path_for(filename)?;
        Ok(tokio::fs::read(path).await?)
    }

    /// Remove a stored blob; a file that is already gone is not an error
    pub async fn delete(&self, filename: &str) -> Result<()> {
        let path = self.path_for(filename)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Audio file {} was already removed", path.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve a stored filename, rejecting anything that could escape the root
    pub fn path_for(&self, filename: &str) -> Result<PathBuf> {
        let is_plain = !filename.is_empty()
            && !filename.contains(['/', '\\'])
            && filename != "."
            && filename != "..";
        if !is_plain {
            return Err(AppError::validation(format!(
                "Invalid audio filename: {}",
                filename
            )));
        }
        Ok(self.root.join(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generated_filename_shape() {
        let name = AudioStorage::generate_filename(AudioFormat::Wav, Some("Weekly Sync.M4A"));
        let (millis, rest) = name.split_once('-').unwrap();

        assert!(millis.parse::<i64>().is_ok());
        assert!(rest.ends_with(".m4a"));
        assert_eq!(rest.len(), 12 + ".m4a".len());
    }

    #[test]
    fn test_generated_filenames_are_unique() {
        let a = AudioStorage::generate_filename(AudioFormat::Webm, None);
        let b = AudioStorage::generate_filename(AudioFormat::Webm, None);
        assert_ne!(a, b);
        assert!(a.ends_with(".webm"));
    }

    #[test]
    fn test_unknown_extension_uses_detected_format() {
        let name = AudioStorage::generate_filename(AudioFormat::Webm, Some("blob.bin"));
        assert!(name.ends_with(".webm"));
    }

    #[tokio::test]
    async fn test_save_read_delete() {
        let dir = TempDir::new().unwrap();
        let storage = AudioStorage::new(dir.path(), 1024).unwrap();

        let filename = storage
            .save(b"RIFF....", AudioFormat::Wav, Some("memo.wav"))
            .await
            .unwrap();
        assert_eq!(storage.read(&filename).await.unwrap(), b"RIFF....");

        storage.delete(&filename).await.unwrap();
        assert!(storage.read(&filename).await.is_err());
        // Second delete is a no-op
        storage.delete(&filename).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_rejects_oversized_upload() {
        let dir = TempDir::new().unwrap();
        let storage = AudioStorage::new(dir.path(), 4).unwrap();

        let result = storage.save(b"12345", AudioFormat::Mp3, None).await;
        assert!(matches!(result, Err(AppError::PayloadTooLarge { limit: 4 })));
    }

    #[test]
    fn test_path_traversal_rejected() {
        let dir = TempDir::new().unwrap();
        let storage = AudioStorage::new(dir.path(), 4).unwrap();

        assert!(storage.path_for("../etc/passwd").is_err());
        assert!(storage.path_for("..").is_err());
        assert!(storage.path_for("").is_err());
        assert!(storage.path_for("1700-abc.wav").is_ok());
    }
}
