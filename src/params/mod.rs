// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters for running alignment transforms.
//!
//! The code here is kind of "mirroring" the code within the `cli` module; the
//! idea is that `cli` is unparsed, user-facing code, whereas parameters have
//! been parsed and are ready to be used directly.

#[cfg(test)]
mod tests;

use log::debug;
use thiserror::Error;

use crate::{
    alignment::{
        AlignmentError, AlignmentSubsystem, ApproximateMountAlignment, BuiltInMathPlugin,
        MathPlugin, MathPluginType,
    },
    database::AlignmentDatabase,
    direction::ReferencePosition,
};

/// Everything needed to get a math plugin going.
#[derive(Debug, Clone)]
pub struct AlignmentParams {
    /// The sync points. Its reference position has already been resolved.
    pub database: AlignmentDatabase,

    pub approximate_alignment: ApproximateMountAlignment,

    pub math_plugin: MathPluginType,

    /// Use the approximate alignment alone when there are no sync points.
    pub uncalibrated_fallback: bool,
}

impl AlignmentParams {
    /// Check the reference position and put it in the database. If
    /// `reference_position` is `None`, the database must already have one.
    /// The approximate alignment, if not given, is guessed from the observer's
    /// hemisphere.
    pub fn new(
        mut database: AlignmentDatabase,
        reference_position: Option<ReferencePosition>,
        approximate_alignment: Option<ApproximateMountAlignment>,
        math_plugin: MathPluginType,
        uncalibrated_fallback: bool,
    ) -> Result<AlignmentParams, ParamsError> {
        let position = reference_position
            .or_else(|| database.reference_position())
            .ok_or(ParamsError::NoReferencePosition)?;
        if !(-90.0..=90.0).contains(&position.latitude) {
            return Err(ParamsError::InvalidLatitude(position.latitude));
        }
        if !(-180.0..=360.0).contains(&position.longitude) {
            return Err(ParamsError::InvalidLongitude(position.longitude));
        }
        database.set_reference_position(position);

        let approximate_alignment = match approximate_alignment {
            Some(a) => a,
            None => {
                let a = ApproximateMountAlignment::from_latitude(position.latitude);
                debug!(
                    "No approximate mount alignment given; using {a} for latitude {}°",
                    position.latitude
                );
                a
            }
        };

        Ok(AlignmentParams {
            database,
            approximate_alignment,
            math_plugin,
            uncalibrated_fallback,
        })
    }

    pub fn reference_position(&self) -> Option<ReferencePosition> {
        self.database.reference_position()
    }

    /// A fresh, uninitialised built-in plugin set up with these parameters.
    pub fn built_in_plugin(&self) -> BuiltInMathPlugin {
        let mut plugin = BuiltInMathPlugin::new(self.approximate_alignment);
        plugin.set_uncalibrated_fallback(self.uncalibrated_fallback);
        plugin
    }

    pub fn plugin(&self) -> Box<dyn MathPlugin> {
        match self.math_plugin {
            MathPluginType::BuiltIn => Box::new(self.built_in_plugin()),
        }
    }

    /// Hand the database to a new subsystem, which initialises the plugin.
    pub fn into_subsystem(self) -> Result<AlignmentSubsystem, AlignmentError> {
        let plugin = self.plugin();
        AlignmentSubsystem::new(self.database, plugin)
    }
}

#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("No observer position was given, and the database doesn't have one")]
    NoReferencePosition,

    #[error("Latitude {0}° is not within -90° to 90°")]
    InvalidLatitude(f64),

    #[error("Longitude {0}° is not within -180° to 360°")]
    InvalidLongitude(f64),
}
