//! Spit persistence: the record format and a compressed on-disk store.
//!
//! A [`SpitRecord`] is both the save format and the sync payload. The
//! [`SpitStore`] groups every spit of a camp into one `.sp` file using zstd
//! compression and CRC32 validation. Each record is stored as its JSON text so
//! a damaged record can be recovered without losing its neighbours.

use crate::inventory::{InventoryRecord, SlotRecord};
use anyhow::{Context, Result};
use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use spitroast_core::BlockPos;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Magic number for spit store identification ("SPIT").
const STORE_MAGIC: u32 = 0x5350_4954;

/// Current store format version.
const STORE_VERSION: u16 = 1;

/// Header length in bytes.
const HEADER_LEN: usize = 14;

/// Full persisted state of one spit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpitRecord {
    /// Seconds of cooking progress.
    pub progress: u32,
    /// Slot contents.
    pub items: InventoryRecord,
}

impl SpitRecord {
    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to encode spit record")
    }

    /// Decode from JSON. Missing fields take their defaults.
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to decode spit record")
    }

    /// Decode from JSON, recovering field by field.
    ///
    /// A missing or malformed `progress` becomes 0, a malformed slot becomes
    /// empty, and input that is not a JSON object yields an empty record.
    pub fn from_json_lenient(contents: &str) -> Self {
        let value: Value = match serde_json::from_str(contents) {
            Ok(value) => value,
            Err(err) => {
                warn!("Failed to parse spit record: {err}. Using an empty spit");
                return Self::default();
            }
        };
        let Some(fields) = value.as_object() else {
            warn!("Spit record is not an object. Using an empty spit");
            return Self::default();
        };

        let progress = match fields.get("progress") {
            None => 0,
            Some(raw) => u32::deserialize(raw).unwrap_or_else(|err| {
                warn!(%raw, "Bad spit progress: {err}. Using 0");
                0
            }),
        };
        let items = match fields.get("items") {
            None => InventoryRecord::default(),
            Some(raw) => lenient_items(raw),
        };
        Self { progress, items }
    }
}

fn lenient_items(raw: &Value) -> InventoryRecord {
    let Some(slots) = raw.get("slots").and_then(Value::as_array) else {
        warn!(%raw, "Bad spit items. Using empty slots");
        return InventoryRecord::default();
    };
    let slots = slots
        .iter()
        .enumerate()
        .map(|(slot, entry)| {
            Option::<SlotRecord>::deserialize(entry).unwrap_or_else(|err| {
                warn!(slot, %entry, "Bad spit slot: {err}. Leaving it empty");
                None
            })
        })
        .collect();
    InventoryRecord { slots }
}

/// Store file header structure.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StoreHeader {
    magic: u32,
    version: u16,
    crc32: u32,
    payload_len: u32,
}

impl StoreHeader {
    fn new(crc32: u32, payload_len: u32) -> Self {
        Self {
            magic: STORE_MAGIC,
            version: STORE_VERSION,
            crc32,
            payload_len,
        }
    }

    fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..10].copy_from_slice(&self.crc32.to_le_bytes());
        bytes[10..14].copy_from_slice(&self.payload_len.to_le_bytes());
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            anyhow::bail!("Spit store header too short");
        }

        let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if magic != STORE_MAGIC {
            anyhow::bail!(
                "Invalid spit store magic: expected 0x{:08X}, got 0x{:08X}",
                STORE_MAGIC,
                magic
            );
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != STORE_VERSION {
            anyhow::bail!("Unsupported spit store version {version}");
        }
        let crc32 = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);
        let payload_len = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]);

        Ok(Self {
            magic,
            version,
            crc32,
            payload_len,
        })
    }
}

/// On-disk store for every spit in a camp.
#[derive(Debug, Clone)]
pub struct SpitStore {
    path: PathBuf,
}

impl SpitStore {
    /// Create a store writing to `path`, creating parent directories.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create save directory")?;
        }
        Ok(Self { path })
    }

    /// Path of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a save exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write every record, replacing the previous save.
    pub fn save(&self, spits: &BTreeMap<BlockPos, SpitRecord>) -> Result<()> {
        let entries = spits
            .iter()
            .map(|(pos, record)| record.to_json().map(|json| (*pos, json)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        self.save_entries(&entries)
    }

    /// Write already-encoded record entries, replacing the previous save.
    pub fn save_entries(&self, entries: &BTreeMap<BlockPos, String>) -> Result<()> {
        let serialized = bincode::serialize(entries).context("Failed to serialize spits")?;

        let compressed =
            zstd::encode_all(&serialized[..], 3).context("Failed to compress spits")?;

        let mut hasher = Hasher::new();
        hasher.update(&compressed);
        let header = StoreHeader::new(hasher.finalize(), compressed.len() as u32);

        let mut file = File::create(&self.path).context("Failed to create spit store")?;
        file.write_all(&header.to_bytes())
            .context("Failed to write header")?;
        file.write_all(&compressed)
            .context("Failed to write payload")?;

        info!(path = %self.path.display(), spits = entries.len(), "Saved spits");
        Ok(())
    }

    /// Load every record from disk.
    ///
    /// The file itself must be intact; individual records recover field by
    /// field.
    pub fn load(&self) -> Result<BTreeMap<BlockPos, SpitRecord>> {
        let mut file = File::open(&self.path)
            .with_context(|| format!("Failed to open spit store {}", self.path.display()))?;

        let mut header_bytes = [0u8; HEADER_LEN];
        file.read_exact(&mut header_bytes)
            .context("Failed to read spit store header")?;
        let header = StoreHeader::from_bytes(&header_bytes)?;

        let mut compressed = vec![0u8; header.payload_len as usize];
        file.read_exact(&mut compressed)
            .context("Failed to read spit store payload")?;

        let mut hasher = Hasher::new();
        hasher.update(&compressed);
        let computed_crc = hasher.finalize();
        if computed_crc != header.crc32 {
            anyhow::bail!(
                "CRC32 mismatch: expected {:08X}, got {:08X}",
                header.crc32,
                computed_crc
            );
        }

        let decompressed =
            zstd::decode_all(&compressed[..]).context("Failed to decompress spits")?;
        let entries: BTreeMap<BlockPos, String> =
            bincode::deserialize(&decompressed).context("Failed to deserialize spits")?;

        Ok(entries
            .into_iter()
            .map(|(pos, json)| (pos, SpitRecord::from_json_lenient(&json)))
            .collect())
    }
}
