//! Settings store
//!
//! Single-record file holding the last [`ConnectionConfig`].

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::config::ConnectionConfig;
use crate::error::{LinkError, Result};

/// Header size: CRC (4) + payload length (4)
pub const HEADER_SIZE: usize = 8;

/// Upper bound on a sane payload (host names are short)
const MAX_PAYLOAD_SIZE: usize = 64 * 1024;

/// File-backed store for the last-used connection config
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved config
    ///
    /// Returns `Ok(None)` if nothing was saved yet, and
    /// `LinkError::Settings` if the file is truncated or corrupted.
    pub fn load(&self) -> Result<Option<ConnectionConfig>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        decode(&bytes).map(Some)
    }

    /// Load the saved config, falling back to defaults on any problem
    pub fn load_or_default(&self) -> ConnectionConfig {
        match self.load() {
            Ok(Some(config)) => config,
            Ok(None) => ConnectionConfig::default(),
            Err(e) => {
                tracing::warn!("Ignoring settings at {}: {}", self.path.display(), e);
                ConnectionConfig::default()
            }
        }
    }

    /// Persist `config`, replacing any previous record
    ///
    /// Writes a sibling temp file and renames it over the target so a crash
    /// never leaves a half-written record behind.
    pub fn save(&self, config: &ConnectionConfig) -> Result<()> {
        let bytes = encode(config)?;

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let tmp_path = self.path.with_extension("tmp");
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    /// Forget the saved config
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Encode a config record: crc (4) + len (4) + payload
fn encode(config: &ConnectionConfig) -> Result<Vec<u8>> {
    let payload =
        bincode::serialize(config).map_err(|e| LinkError::Serialization(e.to_string()))?;
    let crc = crc32fast::hash(&payload);

    let mut record = Vec::with_capacity(HEADER_SIZE + payload.len());
    record.extend_from_slice(&crc.to_le_bytes());
    record.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    record.extend_from_slice(&payload);
    Ok(record)
}

/// Decode and verify a config record
fn decode(bytes: &[u8]) -> Result<ConnectionConfig> {
    if bytes.len() < HEADER_SIZE {
        return Err(LinkError::Settings(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let stored_crc = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let payload_len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;

    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(LinkError::Settings(format!(
            "Payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }
    if bytes.len() != HEADER_SIZE + payload_len {
        return Err(LinkError::Settings(format!(
            "Length mismatch: header says {} payload bytes, file has {}",
            payload_len,
            bytes.len() - HEADER_SIZE
        )));
    }

    let payload = &bytes[HEADER_SIZE..];
    let actual_crc = crc32fast::hash(payload);
    if actual_crc != stored_crc {
        return Err(LinkError::Settings(format!(
            "CRC mismatch: stored 0x{:08x}, computed 0x{:08x}",
            stored_crc, actual_crc
        )));
    }

    bincode::deserialize(payload).map_err(|e| LinkError::Serialization(e.to_string()))
}
