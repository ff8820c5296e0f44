//! Save/Load functionality for persisting exploration progress
//!
//! Saves are pretty-printed JSON, one file per numbered slot. Rooms are
//! never written: they regenerate from their coordinates on load.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use backrooms_logic::geometry::RoomCoordinate;

use crate::world::VisitedSet;

/// Save format version. Records with any other version are rejected.
pub const SAVE_VERSION: &str = "1.0";

/// Player position in panel-local pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedPosition {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveStats {
    pub rooms_explored: usize,
}

/// Serializable snapshot of exploration progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    /// Save format version
    pub version: String,
    /// Local time of the save, ISO-8601
    pub timestamp: String,
    pub player: SavedPosition,
    pub current_room: RoomCoordinate,
    /// Visited coordinates as `[x, y]` pairs, sorted
    pub visited_rooms: Vec<[i32; 2]>,
    pub stats: SaveStats,
}

impl SaveRecord {
    /// Snapshot the given state, stamped with the current local time.
    pub fn new(player: (f32, f32), current_room: RoomCoordinate, visited: &VisitedSet) -> Self {
        Self {
            version: SAVE_VERSION.to_string(),
            timestamp: chrono::Local::now()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            player: SavedPosition {
                x: player.0,
                y: player.1,
            },
            current_room,
            visited_rooms: visited.sorted().iter().map(|c| [c.x, c.y]).collect(),
            stats: SaveStats {
                rooms_explored: visited.len(),
            },
        }
    }

    pub fn visited_set(&self) -> VisitedSet {
        self.visited_rooms
            .iter()
            .map(|[x, y]| RoomCoordinate::new(*x, *y))
            .collect()
    }
}

/// Write a record as pretty JSON
pub fn save_record<W: Write>(writer: W, record: &SaveRecord) -> Result<(), SaveError> {
    serde_json::to_writer_pretty(writer, record)?;
    Ok(())
}

/// Read a record, rejecting unknown versions
pub fn load_record<R: Read>(reader: R) -> Result<SaveRecord, SaveError> {
    let record: SaveRecord = serde_json::from_reader(reader)?;

    if record.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION.to_string(),
            found: record.version,
        });
    }

    Ok(record)
}

/// Numbered save slots inside one directory
#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self, slot: u32) -> PathBuf {
        self.dir.join(format!("save_slot_{}.json", slot))
    }

    pub fn exists(&self, slot: u32) -> bool {
        self.slot_path(slot).is_file()
    }

    /// Write `record` to `slot`, creating the directory on first use.
    pub fn save(&self, slot: u32, record: &SaveRecord) -> Result<PathBuf, SaveError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.slot_path(slot);
        let mut writer = BufWriter::new(File::create(&path)?);
        save_record(&mut writer, record)?;
        writer.flush()?;
        Ok(path)
    }

    pub fn load(&self, slot: u32) -> Result<SaveRecord, SaveError> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Err(SaveError::NotFound { slot });
        }
        load_record(BufReader::new(File::open(path)?))
    }
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Json(serde_json::Error),
    NotFound { slot: u32 },
    VersionMismatch { expected: String, found: String },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::Json(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Json(e) => write!(f, "Serialization error: {}", e),
            SaveError::NotFound { slot } => write!(f, "No save found in slot {}", slot),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}
