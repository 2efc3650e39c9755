// Integration tests for stored audio files
//
// These tests verify that uploaded WAV files land in storage and that their
// headers can be probed from disk.

mod common;

use anyhow::Result;
use common::wav_bytes;
use recap::{AudioFormat, AudioStorage, WavInfo};
use std::path::PathBuf;
use tempfile::TempDir;

#[tokio::test]
async fn test_stored_wav_can_be_probed_from_disk() -> Result<()> {
    let dir = TempDir::new()?;
    let storage = AudioStorage::new(dir.path(), 10 * 1024 * 1024)?;

    let filename = storage
        .save(&wav_bytes(3), AudioFormat::Wav, Some("standup.wav"))
        .await?;
    let info = WavInfo::open(storage.path_for(&filename)?)?;

    assert_eq!(info.sample_rate, 16000);
    assert_eq!(info.channels, 1);
    assert_eq!(info.whole_seconds(), 3);

    Ok(())
}

#[test]
fn test_probe_nonexistent_file_fails() {
    let path = PathBuf::from("/nonexistent/path/to/audio.wav");
    assert!(WavInfo::open(&path).is_err(), "Opening nonexistent file should fail");
}

#[tokio::test]
async fn test_storage_root_created_on_demand() -> Result<()> {
    let dir = TempDir::new()?;
    let root = dir.path().join("nested").join("uploads");

    let storage = AudioStorage::new(&root, 1024)?;

    assert!(root.is_dir());
    assert_eq!(storage.root(), root.as_path());

    Ok(())
}

#[tokio::test]
async fn test_stored_filename_keeps_original_extension() -> Result<()> {
    let dir = TempDir::new()?;
    let storage = AudioStorage::new(dir.path(), 1024 * 1024)?;

    let filename = storage
        .save(b"not really m4a", AudioFormat::M4a, Some("Voice Memo.M4A"))
        .await?;

    assert!(filename.to_ascii_lowercase().ends_with(".m4a"));
    assert!(!filename.contains(' '));
    assert_eq!(storage.read(&filename).await?, b"not really m4a".to_vec());

    Ok(())
}

#[tokio::test]
async fn test_deleting_missing_file_is_ok() -> Result<()> {
    let dir = TempDir::new()?;
    let storage = AudioStorage::new(dir.path(), 1024)?;

    storage.delete("1700000000000-abcdef123456.wav").await?;

    Ok(())
}
