//! Save/Load of the career record
//!
//! Only progress counters survive between runs. Sessions themselves are
//! short and always start fresh, so the world is never written out.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use thiserror::Error;

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Progress carried from one mission to the next
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerRecord {
    /// Save format version
    pub version: u32,
    /// Level the next session starts on
    pub level: u32,
    pub missions_completed: u32,
    pub missions_failed: u32,
    pub total_deliveries: u32,
}

impl Default for CareerRecord {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            level: 1,
            missions_completed: 0,
            missions_failed: 0,
            total_deliveries: 0,
        }
    }
}

/// Save the career record to a writer
pub fn save_career<W: Write>(writer: W, record: &CareerRecord) -> Result<(), SaveError> {
    bincode::serialize_into(writer, record)?;
    Ok(())
}

/// Load a career record from a reader
pub fn load_career<R: Read>(reader: R) -> Result<CareerRecord, SaveError> {
    let record: CareerRecord = bincode::deserialize_from(reader)?;
    if record.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: record.version,
        });
    }
    Ok(record)
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}
