// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to write out alignment databases. Coordinates are always written as
//! decimal numbers.

use serde::Serialize;

use super::{AlignmentDatabase, AlignmentDatabaseEntry, DatabaseError};
use crate::direction::ReferencePosition;

#[derive(Serialize)]
struct DatabaseFileRef<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_position: Option<&'a ReferencePosition>,
    entries: &'a [AlignmentDatabaseEntry],
}

impl<'a> From<&'a AlignmentDatabase> for DatabaseFileRef<'a> {
    fn from(db: &'a AlignmentDatabase) -> Self {
        Self {
            reference_position: db.reference_position.as_ref(),
            entries: &db.entries,
        }
    }
}

/// Write an [`AlignmentDatabase`] to a yaml file.
pub(super) fn database_to_yaml<T: std::io::Write>(
    buf: &mut T,
    db: &AlignmentDatabase,
) -> Result<(), DatabaseError> {
    serde_yaml::to_writer(buf, &DatabaseFileRef::from(db))?;
    Ok(())
}

/// Write an [`AlignmentDatabase`] to a json file.
pub(super) fn database_to_json<T: std::io::Write>(
    buf: &mut T,
    db: &AlignmentDatabase,
) -> Result<(), DatabaseError> {
    serde_json::to_writer_pretty(buf, &DatabaseFileRef::from(db))?;
    Ok(())
}
