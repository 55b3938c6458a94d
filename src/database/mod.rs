// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The calibration ("sync point") database.

Entries are kept in insertion order and addressed by index; inserting or
deleting shifts the indices of everything after. The database also carries
the observer's reference position, because every stored coordinate is only
meaningful relative to it.
 */

mod error;
mod read;
#[cfg(test)]
mod tests;
mod write;

pub use error::DatabaseError;

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
    str::FromStr,
};

use itertools::Itertools;
use log::debug;
use marlu::RADec;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::direction::{epoch_from_julian_date, ReferencePosition, TelescopeDirectionVector};

/// All of the file types a database can be read from or written to.
#[derive(
    Debug, Clone, Copy, strum_macros::Display, strum_macros::EnumIter, strum_macros::EnumString,
)]
pub enum DatabaseFileType {
    #[strum(to_string = "yaml", serialize = "yml")]
    Yaml,

    #[strum(serialize = "json")]
    Json,
}

lazy_static::lazy_static! {
    pub static ref DATABASE_FILE_TYPES_COMMA_SEPARATED: String = DatabaseFileType::iter().join(", ");
}

/// One sync point: where the sky really was, and where the mount thought it
/// was pointing at the time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentDatabaseEntry {
    /// When the sync happened (Julian date, UTC).
    pub observation_julian_date: f64,

    /// \[decimal hours\]
    pub right_ascension: f64,

    /// \[decimal degrees\]
    pub declination: f64,

    /// The raw direction reported by the mount.
    pub telescope_direction: TelescopeDirectionVector,

    /// Extra bytes belonging to whichever math plugin made the entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub private_data: Vec<u8>,
}

impl AlignmentDatabaseEntry {
    pub fn new(
        observation_julian_date: f64,
        right_ascension: f64,
        declination: f64,
        telescope_direction: TelescopeDirectionVector,
    ) -> Self {
        Self {
            observation_julian_date,
            right_ascension,
            declination,
            telescope_direction,
            private_data: vec![],
        }
    }

    /// The sky coordinate of this entry, in radians.
    pub fn radec(&self) -> RADec {
        RADec::from_degrees(self.right_ascension * 15.0, self.declination)
    }

    pub fn epoch(&self) -> hifitime::Epoch {
        epoch_from_julian_date(self.observation_julian_date)
    }
}

/// An ordered collection of [`AlignmentDatabaseEntry`]s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlignmentDatabase {
    entries: Vec<AlignmentDatabaseEntry>,
    reference_position: Option<ReferencePosition>,

    /// Where [`AlignmentDatabase::read_increment`] reads from next.
    cursor: usize,
}

impl AlignmentDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference_position(reference_position: ReferencePosition) -> Self {
        Self {
            reference_position: Some(reference_position),
            ..Default::default()
        }
    }

    pub fn reference_position(&self) -> Option<ReferencePosition> {
        self.reference_position
    }

    pub fn set_reference_position(&mut self, reference_position: ReferencePosition) {
        self.reference_position = Some(reference_position);
    }

    pub fn entries(&self) -> &[AlignmentDatabaseEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn append(&mut self, entry: AlignmentDatabaseEntry) {
        self.entries.push(entry);
    }

    /// Insert an entry at `index`, shifting everything at and after `index`
    /// along by one. `index` may equal the length of the database.
    pub fn insert(
        &mut self,
        index: usize,
        entry: AlignmentDatabaseEntry,
    ) -> Result<(), DatabaseError> {
        if index > self.entries.len() {
            return Err(self.out_of_range(index));
        }
        self.entries.insert(index, entry);
        Ok(())
    }

    /// Replace the entry at `index`.
    pub fn edit(
        &mut self,
        index: usize,
        entry: AlignmentDatabaseEntry,
    ) -> Result<(), DatabaseError> {
        let len = self.entries.len();
        match self.entries.get_mut(index) {
            Some(e) => {
                *e = entry;
                Ok(())
            }
            None => Err(DatabaseError::IndexOutOfRange { index, len }),
        }
    }

    /// Remove and return the entry at `index`.
    pub fn delete(&mut self, index: usize) -> Result<AlignmentDatabaseEntry, DatabaseError> {
        if index >= self.entries.len() {
            return Err(self.out_of_range(index));
        }
        let entry = self.entries.remove(index);
        self.cursor = self.cursor.min(self.entries.len());
        Ok(entry)
    }

    /// Remove all entries. The reference position is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    pub fn read(&self, index: usize) -> Result<&AlignmentDatabaseEntry, DatabaseError> {
        self.entries
            .get(index)
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Read the entry at the cursor and move the cursor to the next entry.
    /// `None` is returned once the cursor has passed the last entry.
    pub fn read_increment(&mut self) -> Option<&AlignmentDatabaseEntry> {
        let entry = self.entries.get(self.cursor)?;
        self.cursor += 1;
        Some(entry)
    }

    /// Position the cursor. Setting it to the length of the database is
    /// allowed, leaving nothing more to read.
    pub fn set_cursor(&mut self, index: usize) -> Result<(), DatabaseError> {
        if index > self.entries.len() {
            return Err(self.out_of_range(index));
        }
        self.cursor = index;
        Ok(())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn out_of_range(&self, index: usize) -> DatabaseError {
        DatabaseError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        }
    }

    /// Read a database from a file. The format is determined by the file's
    /// extension.
    pub fn read_file<P: AsRef<Path>>(file: P) -> Result<AlignmentDatabase, DatabaseError> {
        let file = file.as_ref();
        let ext = file.extension().and_then(|e| e.to_str());
        let file_type = ext
            .and_then(|s| DatabaseFileType::from_str(s).ok())
            .ok_or_else(|| DatabaseError::UnsupportedExt {
                ext: ext.unwrap_or("<no extension>").to_string(),
            })?;
        debug!("Reading alignment database '{}'", file.display());
        let mut buf = BufReader::new(File::open(file)?);
        let db = match file_type {
            DatabaseFileType::Yaml => read::database_from_yaml(&mut buf),
            DatabaseFileType::Json => read::database_from_json(&mut buf),
        }?;
        debug!("Read {} alignment database entries", db.len());
        Ok(db)
    }

    /// Replace the contents of this database with those of a file. The
    /// current reference position is only replaced if the file has one.
    pub fn load_file<P: AsRef<Path>>(&mut self, file: P) -> Result<(), DatabaseError> {
        let AlignmentDatabase {
            entries,
            reference_position,
            cursor: _,
        } = Self::read_file(file)?;
        self.entries = entries;
        if reference_position.is_some() {
            self.reference_position = reference_position;
        }
        self.cursor = 0;
        Ok(())
    }

    /// Write this database to a file. The format is determined by the file's
    /// extension.
    pub fn write_file<P: AsRef<Path>>(&self, file: P) -> Result<(), DatabaseError> {
        let file = file.as_ref();
        let ext = file.extension().and_then(|e| e.to_str());
        let file_type = ext
            .and_then(|s| DatabaseFileType::from_str(s).ok())
            .ok_or_else(|| DatabaseError::UnsupportedExt {
                ext: ext.unwrap_or("<no extension>").to_string(),
            })?;
        debug!(
            "Writing {} alignment database entries to '{}'",
            self.len(),
            file.display()
        );
        let mut buf = BufWriter::new(File::create(file)?);
        match file_type {
            DatabaseFileType::Yaml => write::database_to_yaml(&mut buf, self),
            DatabaseFileType::Json => write::database_to_json(&mut buf, self),
        }?;
        buf.flush()?;
        Ok(())
    }
}
