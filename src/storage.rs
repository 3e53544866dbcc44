//! Artifact persistence.
//!
//! A model file is a small binary envelope around a bincode payload:
//!
//! ```text
//! +-------+-----------+-------------+-----------------+
//! | SPSF  | crc32 u32 | length u64  | bincode payload |
//! +-------+-----------+-------------+-----------------+
//! ```
//!
//! Integers are little endian. The format is private to this crate and
//! carries no version; a file written by a different build may be rejected.
//!
//! Writes go to a temporary sibling file which is synced and then renamed
//! over the target, so a crash never leaves a half-written model behind.

use std::fs::{self, File};
use std::io::{self, BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};

use bincode::Options;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, info};
use uuid::Uuid;

use crate::error::{Result, SpamSiftError};
use crate::model::ModelArtifact;

/// Leading bytes of every model file.
pub const MAGIC: &[u8; 4] = b"SPSF";

const HEADER_LEN: usize = 4 + 4 + 8;

/// Fixed-width integer encoding, the same layout as `bincode::serialize`.
fn payload_options() -> impl Options {
    bincode::options()
        .with_fixint_encoding()
        .allow_trailing_bytes()
}

/// Serialize an artifact into the on-disk envelope.
pub fn encode_artifact(artifact: &ModelArtifact) -> Result<Vec<u8>> {
    let payload = payload_options()
        .serialize(artifact)
        .map_err(|e| SpamSiftError::serialization(format!("Failed to encode model: {e}")))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
    bytes.write_u64::<LittleEndian>(payload.len() as u64)?;
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode and validate an artifact from the on-disk envelope.
pub fn decode_artifact(bytes: &[u8]) -> Result<ModelArtifact> {
    if bytes.len() < HEADER_LEN || &bytes[..4] != MAGIC {
        return Err(SpamSiftError::serialization("not a spamsift model file"));
    }

    let mut header = Cursor::new(&bytes[4..HEADER_LEN]);
    let checksum = header.read_u32::<LittleEndian>()?;
    let length = header.read_u64::<LittleEndian>()?;

    let payload = &bytes[HEADER_LEN..];
    if payload.len() as u64 != length {
        return Err(SpamSiftError::serialization(format!(
            "model file truncated: expected {length} payload bytes, found {}",
            payload.len()
        )));
    }
    if crc32fast::hash(payload) != checksum {
        return Err(SpamSiftError::serialization("model file checksum mismatch"));
    }

    // Declared collection lengths can never make decoding read past the payload.
    let artifact: ModelArtifact = payload_options()
        .with_limit(length)
        .deserialize(payload)
        .map_err(|e| SpamSiftError::serialization(format!("Failed to decode model: {e}")))?;
    artifact.validate()?;
    Ok(artifact)
}

/// Persist `artifact` at `path`, replacing any existing file atomically.
pub fn save_artifact<P: AsRef<Path>>(artifact: &ModelArtifact, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode_artifact(artifact)?;
    write_atomically(path, |writer| Ok(writer.write_all(&bytes)?))?;
    info!("Saved model ({} bytes) to {}", bytes.len(), path.display());
    Ok(())
}

/// Load an artifact previously written by [`save_artifact`].
///
/// A missing file yields [`SpamSiftError::ModelNotFound`].
pub fn load_artifact<P: AsRef<Path>>(path: P) -> Result<ModelArtifact> {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(SpamSiftError::model_not_found(path));
        }
        Err(e) => return Err(e.into()),
    };

    let artifact = decode_artifact(&bytes)?;
    info!(
        "Loaded model from {} ({} terms, {} classes)",
        path.display(),
        artifact.vocabulary().len(),
        artifact.classes().len()
    );
    Ok(artifact)
}

/// Temporary sibling path used while writing `target`.
pub fn temp_path_for(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    target.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
}

/// Write `target` through a synced temporary file and rename it into place.
///
/// Parent directories are created as needed. On failure the temporary file
/// is removed and any existing `target` is left untouched.
pub fn write_atomically<F>(target: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_path_for(target);
    debug!("Writing {} via {}", target.display(), temp_path.display());

    let result = File::create(&temp_path)
        .map_err(SpamSiftError::from)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            write(&mut writer)?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
            Ok(())
        })
        .and_then(|()| Ok(fs::rename(&temp_path, target)?));

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use crate::model::ModelTrainer;
    use tempfile::TempDir;

    fn artifact() -> ModelArtifact {
        ModelTrainer::default().train(&Corpus::demo()).unwrap()
    }

    #[test]
    fn test_encode_decode() {
        let artifact = artifact();
        let bytes = encode_artifact(&artifact).unwrap();
        assert_eq!(&bytes[..4], MAGIC);
        assert_eq!(decode_artifact(&bytes).unwrap(), artifact);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_artifact(b"not a model"),
            Err(SpamSiftError::Serialization(_))
        ));
    }

    #[test]
    fn test_decode_detects_corruption() {
        let mut bytes = encode_artifact(&artifact()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        assert!(matches!(
            decode_artifact(&bytes),
            Err(SpamSiftError::Serialization(_))
        ));

        let bytes = encode_artifact(&artifact()).unwrap();
        assert!(matches!(
            decode_artifact(&bytes[..bytes.len() - 3]),
            Err(SpamSiftError::Serialization(_))
        ));
    }

    #[test]
    fn test_decode_rejects_oversized_lengths() {
        // A checksummed payload whose leading vocabulary length is absurd.
        let mut payload = u64::MAX.to_le_bytes().to_vec();
        payload.extend_from_slice(b"free");

        let mut bytes = MAGIC.to_vec();
        bytes.write_u32::<LittleEndian>(crc32fast::hash(&payload)).unwrap();
        bytes.write_u64::<LittleEndian>(payload.len() as u64).unwrap();
        bytes.extend_from_slice(&payload);

        assert!(matches!(
            decode_artifact(&bytes),
            Err(SpamSiftError::Serialization(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("models").join("spam.bin");
        let artifact = artifact();

        save_artifact(&artifact, &path).unwrap();
        assert_eq!(load_artifact(&path).unwrap(), artifact);

        // Only the target remains; the temporary file was renamed away.
        let entries: Vec<_> = fs::read_dir(path.parent().unwrap()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_load_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.bin");
        match load_artifact(&path) {
            Err(SpamSiftError::ModelNotFound { path: missing }) => assert_eq!(missing, path),
            other => panic!("expected ModelNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.bin");
        fs::write(&path, b"previous").unwrap();

        let result = write_atomically(&path, |writer| {
            writer.write_all(b"partial")?;
            Err(SpamSiftError::invalid_operation("boom"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read(&path).unwrap(), b"previous");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let temp = temp_path_for(Path::new("/data/model.bin"));
        assert_eq!(temp.parent(), Some(Path::new("/data")));
        let name = temp.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(".model.bin."));
        assert!(name.ends_with(".tmp"));
    }
}
