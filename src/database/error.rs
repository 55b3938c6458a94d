// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with the alignment database.

use thiserror::Error;

use super::DATABASE_FILE_TYPES_COMMA_SEPARATED;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Alignment database index {index} is out of range; the database has {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Alignment database entry {index}: RA {ra} h is out of range (0 h <= RA < 24 h)")]
    InvalidRa { index: usize, ra: f64 },

    #[error("Alignment database entry {index}: Dec {dec}° is out of range (-90° <= Dec <= 90°)")]
    InvalidDec { index: usize, dec: f64 },

    #[error("Alignment database entry {index}: the telescope direction has non-finite components")]
    NonFiniteDirection { index: usize },

    #[error("Alignment database entry {index}: the observation Julian date {jd} is not finite")]
    NonFiniteJulianDate { index: usize, jd: f64 },

    #[error("Tried to use an alignment database file with an unsupported extension '{ext}'; supported: {}", *DATABASE_FILE_TYPES_COMMA_SEPARATED)]
    UnsupportedExt { ext: String },

    #[error(transparent)]
    Sexagesimal(#[from] marlu::sexagesimal::SexagesimalError),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
