// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read in alignment databases.
//!
//! Coordinates may be given as decimal numbers or as sexagesimal strings
//! (e.g. `11h34m23.8s` and `-17d27m50.7s`).

use marlu::sexagesimal::{sexagesimal_dms_string_to_degrees, sexagesimal_hms_string_to_degrees};
use serde::Deserialize;

use super::{AlignmentDatabase, AlignmentDatabaseEntry, DatabaseError};
use crate::direction::{ReferencePosition, TelescopeDirectionVector};

#[derive(Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Decimal(f64),
    Sexagesimal(String),
}

#[derive(Deserialize)]
struct EntryFile {
    observation_julian_date: f64,
    right_ascension: Coordinate,
    declination: Coordinate,
    telescope_direction: TelescopeDirectionVector,
    #[serde(default)]
    private_data: Vec<u8>,
}

#[derive(Deserialize)]
struct DatabaseFile {
    #[serde(default)]
    reference_position: Option<ReferencePosition>,
    #[serde(default)]
    entries: Vec<EntryFile>,
}

/// Convert a yaml file to an [`AlignmentDatabase`].
pub(super) fn database_from_yaml<T: std::io::BufRead>(
    buf: &mut T,
) -> Result<AlignmentDatabase, DatabaseError> {
    let file: DatabaseFile = serde_yaml::from_reader(buf)?;
    validate(file)
}

/// Convert a json file to an [`AlignmentDatabase`].
pub(super) fn database_from_json<T: std::io::BufRead>(
    buf: &mut T,
) -> Result<AlignmentDatabase, DatabaseError> {
    let file: DatabaseFile = serde_json::from_reader(buf)?;
    validate(file)
}

fn validate(file: DatabaseFile) -> Result<AlignmentDatabase, DatabaseError> {
    let mut db = AlignmentDatabase {
        entries: Vec::with_capacity(file.entries.len()),
        reference_position: file.reference_position,
        cursor: 0,
    };

    // Complain if we spot something wrong.
    for (index, entry) in file.entries.into_iter().enumerate() {
        let ra = match entry.right_ascension {
            Coordinate::Decimal(h) => h,
            Coordinate::Sexagesimal(s) => sexagesimal_hms_string_to_degrees(&s)? / 15.0,
        };
        if !(0.0..24.0).contains(&ra) {
            return Err(DatabaseError::InvalidRa { index, ra });
        }
        let dec = match entry.declination {
            Coordinate::Decimal(d) => d,
            Coordinate::Sexagesimal(s) => sexagesimal_dms_string_to_degrees(&s)?,
        };
        if !(-90.0..=90.0).contains(&dec) {
            return Err(DatabaseError::InvalidDec { index, dec });
        }
        if !entry.telescope_direction.is_finite() {
            return Err(DatabaseError::NonFiniteDirection { index });
        }
        if !entry.observation_julian_date.is_finite() {
            return Err(DatabaseError::NonFiniteJulianDate {
                index,
                jd: entry.observation_julian_date,
            });
        }

        db.entries.push(AlignmentDatabaseEntry {
            observation_julian_date: entry.observation_julian_date,
            right_ascension: ra,
            declination: dec,
            telescope_direction: entry.telescope_direction,
            private_data: entry.private_data,
        });
    }

    Ok(db)
}
