//! Artifact persistence
//!
//! ```text
//! ┌──────────┬────────────────┬──────────────────┬─────────────────────────┐
//! │ FRDMODEL │ schema (u16 LE)│ sha256(payload)  │ bincode(FittedPipeline) │
//! │  8 bytes │    2 bytes     │    32 bytes      │          ...            │
//! └──────────┴────────────────┴──────────────────┴─────────────────────────┘
//! ```
//!
//! The schema version is checked before the payload is decoded. Writes go to a
//! temp file in the target directory and are renamed into place, so readers
//! only ever see a complete artifact.

use std::fs;
use std::io::Write;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::pipeline::FittedPipeline;
use crate::constants::{ARTIFACT_MAGIC, ARTIFACT_SCHEMA_VERSION};
use crate::error::{CoreError, CoreResult};

const CHECKSUM_LEN: usize = 32;
const HEADER_LEN: usize = ARTIFACT_MAGIC.len() + 2 + CHECKSUM_LEN;

pub fn encode_artifact(pipeline: &FittedPipeline) -> CoreResult<Vec<u8>> {
    let payload = bincode::serde::encode_to_vec(pipeline, bincode::config::standard())?;
    let checksum = Sha256::digest(&payload);

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(ARTIFACT_MAGIC);
    bytes.extend_from_slice(&pipeline.schema_version.to_le_bytes());
    bytes.extend_from_slice(checksum.as_slice());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

pub fn decode_artifact(bytes: &[u8]) -> CoreResult<FittedPipeline> {
    if bytes.len() < HEADER_LEN || bytes[..ARTIFACT_MAGIC.len()] != ARTIFACT_MAGIC[..] {
        return Err(CoreError::CorruptArtifact("missing artifact header".to_string()));
    }

    let version_at = ARTIFACT_MAGIC.len();
    let found = u16::from_le_bytes([bytes[version_at], bytes[version_at + 1]]);
    if found != ARTIFACT_SCHEMA_VERSION {
        return Err(CoreError::SchemaVersion {
            expected: ARTIFACT_SCHEMA_VERSION,
            found,
        });
    }

    let (expected, payload) = bytes[version_at + 2..].split_at(CHECKSUM_LEN);
    let actual = Sha256::digest(payload);
    if actual.as_slice() != expected {
        return Err(CoreError::CorruptArtifact(format!(
            "checksum mismatch: header {} payload {}",
            hex::encode(expected),
            hex::encode(actual)
        )));
    }

    let (pipeline, _) = bincode::serde::decode_from_slice::<FittedPipeline, _>(
        payload,
        bincode::config::standard(),
    )?;

    if pipeline.schema_version != found {
        return Err(CoreError::SchemaVersion {
            expected: found,
            found: pipeline.schema_version,
        });
    }
    pipeline.verify_layout()?;

    Ok(pipeline)
}

/// Atomically replace the artifact at `path`, creating parent directories
pub fn save_artifact(pipeline: &FittedPipeline, path: &Path) -> CoreResult<()> {
    let bytes = encode_artifact(pipeline)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| CoreError::Io(e.error))?;

    log::info!("Saved model to {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Load and validate the artifact at `path`
pub fn load_artifact(path: &Path) -> CoreResult<FittedPipeline> {
    if !path.exists() {
        return Err(CoreError::NotFound(
            "Model not found. Run fraud-train first.".to_string(),
        ));
    }

    let bytes = fs::read(path)?;
    let pipeline = decode_artifact(&bytes)?;
    log::info!(
        "Loaded model from {} ({} features, trained at {})",
        path.display(),
        pipeline.layout.columns.len(),
        pipeline.trained_at
    );
    Ok(pipeline)
}
