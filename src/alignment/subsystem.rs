// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A database and a math plugin kept in step with each other.

use std::path::Path;

use hifitime::Epoch;
use log::debug;
use marlu::RADec;

use super::{AlignmentError, ApproximateMountAlignment, InitialiseReport, MathPlugin};
use crate::{
    constants::TAU,
    database::{AlignmentDatabase, AlignmentDatabaseEntry},
    direction::{julian_date_from_epoch, ReferencePosition, TelescopeDirectionVector},
};

/// Owns the sync point database and the math plugin using it. Every change
/// to the database goes through here, and re-initialises the plugin once a
/// reference position is known, so the plugin never sees a database that is
/// being modified.
///
/// If re-initialising fails, the change to the database is kept and the
/// plugin is left uninitialised.
pub struct AlignmentSubsystem {
    database: AlignmentDatabase,
    plugin: Box<dyn MathPlugin>,
    last_report: Option<InitialiseReport>,
}

impl AlignmentSubsystem {
    pub fn new(
        database: AlignmentDatabase,
        plugin: Box<dyn MathPlugin>,
    ) -> Result<AlignmentSubsystem, AlignmentError> {
        let mut subsystem = Self {
            database,
            plugin,
            last_report: None,
        };
        subsystem.reinitialise()?;
        Ok(subsystem)
    }

    pub fn database(&self) -> &AlignmentDatabase {
        &self.database
    }

    pub fn plugin(&self) -> &dyn MathPlugin {
        self.plugin.as_ref()
    }

    /// What happened the last time the plugin was initialised.
    pub fn last_report(&self) -> Option<&InitialiseReport> {
        self.last_report.as_ref()
    }

    /// Swap in a different math plugin.
    pub fn set_plugin(
        &mut self,
        plugin: Box<dyn MathPlugin>,
    ) -> Result<Option<&InitialiseReport>, AlignmentError> {
        self.plugin = plugin;
        self.reinitialise()
    }

    pub fn set_reference_position(
        &mut self,
        reference_position: ReferencePosition,
    ) -> Result<Option<&InitialiseReport>, AlignmentError> {
        self.database.set_reference_position(reference_position);
        self.reinitialise()
    }

    pub fn set_approximate_mount_alignment(
        &mut self,
        alignment: ApproximateMountAlignment,
    ) -> Result<Option<&InitialiseReport>, AlignmentError> {
        self.plugin.set_approximate_mount_alignment(alignment);
        self.reinitialise()
    }

    pub fn append(
        &mut self,
        entry: AlignmentDatabaseEntry,
    ) -> Result<Option<&InitialiseReport>, AlignmentError> {
        self.database.append(entry);
        self.reinitialise()
    }

    pub fn insert(
        &mut self,
        index: usize,
        entry: AlignmentDatabaseEntry,
    ) -> Result<Option<&InitialiseReport>, AlignmentError> {
        self.database.insert(index, entry)?;
        self.reinitialise()
    }

    pub fn edit(
        &mut self,
        index: usize,
        entry: AlignmentDatabaseEntry,
    ) -> Result<Option<&InitialiseReport>, AlignmentError> {
        self.database.edit(index, entry)?;
        self.reinitialise()
    }

    pub fn delete(&mut self, index: usize) -> Result<Option<&InitialiseReport>, AlignmentError> {
        self.database.delete(index)?;
        self.reinitialise()
    }

    pub fn clear(&mut self) -> Result<Option<&InitialiseReport>, AlignmentError> {
        self.database.clear();
        self.reinitialise()
    }

    /// Replace the database with the contents of a file.
    pub fn load_file<P: AsRef<Path>>(
        &mut self,
        file: P,
    ) -> Result<Option<&InitialiseReport>, AlignmentError> {
        self.database.load_file(file)?;
        self.reinitialise()
    }

    pub fn save_file<P: AsRef<Path>>(&self, file: P) -> Result<(), AlignmentError> {
        self.database.write_file(file)?;
        Ok(())
    }

    /// Record that the mount, pointing at `telescope_direction`, was really
    /// looking at `radec` at `epoch`.
    pub fn sync(
        &mut self,
        radec: RADec,
        epoch: Epoch,
        telescope_direction: TelescopeDirectionVector,
    ) -> Result<Option<&InitialiseReport>, AlignmentError> {
        // Rounding can take a tiny negative RA all the way up to 24 h.
        let mut ra_hours = radec.ra.rem_euclid(TAU).to_degrees() / 15.0;
        if ra_hours >= 24.0 {
            ra_hours -= 24.0;
        }
        let entry = AlignmentDatabaseEntry::new(
            julian_date_from_epoch(epoch),
            ra_hours,
            radec.dec.to_degrees(),
            telescope_direction,
        );
        debug!(
            "Sync point {}: RA {} h, Dec {}°",
            self.database.len() + 1,
            entry.right_ascension,
            entry.declination
        );
        self.append(entry)
    }

    /// Initialise the plugin from the database, if the database has a
    /// reference position.
    pub fn reinitialise(&mut self) -> Result<Option<&InitialiseReport>, AlignmentError> {
        self.last_report = None;
        if self.database.reference_position().is_none() {
            debug!("No reference position yet; not initialising the math plugin");
            return Ok(None);
        }
        let report = self.plugin.initialise(&self.database)?;
        self.last_report = Some(report);
        Ok(self.last_report.as_ref())
    }

    pub fn celestial_to_telescope_at(
        &self,
        radec: RADec,
        epoch: Epoch,
    ) -> Result<TelescopeDirectionVector, AlignmentError> {
        self.plugin.celestial_to_telescope_at(radec, epoch)
    }

    pub fn telescope_to_celestial_at(
        &self,
        direction: TelescopeDirectionVector,
        epoch: Epoch,
    ) -> Result<RADec, AlignmentError> {
        self.plugin.telescope_to_celestial_at(direction, epoch)
    }

    pub fn celestial_to_telescope(
        &self,
        radec: RADec,
        julian_offset: f64,
    ) -> Result<TelescopeDirectionVector, AlignmentError> {
        self.plugin.celestial_to_telescope(radec, julian_offset)
    }

    pub fn telescope_to_celestial(
        &self,
        direction: TelescopeDirectionVector,
    ) -> Result<RADec, AlignmentError> {
        self.plugin.telescope_to_celestial(direction)
    }
}
