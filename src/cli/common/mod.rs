// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Common arguments for command-line interfaces. The transform subcommands
//! all need a database, an observer position and a mount alignment, so those
//! arguments are shared between them.

mod printers;
#[cfg(test)]
mod tests;

pub(crate) use printers::{display_warnings, InfoPrinter, Warn};

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use itertools::Itertools;
use log::debug;
use marlu::sexagesimal::{
    sexagesimal_dms_string_to_degrees, sexagesimal_hms_string_to_degrees, SexagesimalError,
};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::{
    alignment::{
        ApproximateMountAlignment, InitialiseReport, MathPluginType,
        MATH_PLUGINS_COMMA_SEPARATED, MOUNT_ALIGNMENTS_COMMA_SEPARATED,
    },
    database::{AlignmentDatabase, DatabaseError},
    direction::ReferencePosition,
    params::{AlignmentParams, ParamsError},
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    static ref MOUNT_ALIGNMENT_HELP: String =
        format!("How the mount is roughly set up; only used when there are too few sync points. Supported: {}. Default: the celestial pole of the observer's hemisphere", *MOUNT_ALIGNMENTS_COMMA_SEPARATED);

    static ref MATH_PLUGIN_HELP: String =
        format!("The math plugin that calculates transforms. Supported: {}. Default: {}", *MATH_PLUGINS_COMMA_SEPARATED, MathPluginType::default());
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(SkyalignError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(SkyalignError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(SkyalignError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct AlignmentArgs {
    /// Path to the sync point database (yaml or json). Without one, there
    /// are no sync points.
    #[clap(short, long, parse(from_str), help_heading = "ALIGNMENT")]
    pub(super) database: Option<PathBuf>,

    /// The observer's latitude [degrees], e.g. -26.7033 or -26d42m11.95s.
    /// Overrides the database's reference position.
    #[clap(long, allow_hyphen_values = true, help_heading = "OBSERVER")]
    pub(super) latitude: Option<String>,

    /// The observer's longitude [degrees, east positive], e.g. 116.67 or
    /// 116d40m14.93s. Overrides the database's reference position.
    #[clap(long, allow_hyphen_values = true, help_heading = "OBSERVER")]
    pub(super) longitude: Option<String>,

    #[clap(long, help = MOUNT_ALIGNMENT_HELP.as_str(), help_heading = "ALIGNMENT")]
    pub(super) mount_alignment: Option<String>,

    #[clap(long, help = MATH_PLUGIN_HELP.as_str(), help_heading = "ALIGNMENT")]
    pub(super) math_plugin: Option<String>,

    /// Fail if the database has no sync points, rather than using the mount
    /// alignment alone.
    #[clap(long, help_heading = "ALIGNMENT")]
    #[serde(default)]
    pub(super) no_uncalibrated_fallback: bool,
}

impl AlignmentArgs {
    /// Prefer `self`'s arguments over `other`'s.
    pub(super) fn merge(self, other: Self) -> Self {
        Self {
            database: self.database.or(other.database),
            latitude: self.latitude.or(other.latitude),
            longitude: self.longitude.or(other.longitude),
            mount_alignment: self.mount_alignment.or(other.mount_alignment),
            math_plugin: self.math_plugin.or(other.math_plugin),
            no_uncalibrated_fallback: self.no_uncalibrated_fallback
                || other.no_uncalibrated_fallback,
        }
    }

    pub(super) fn parse(self) -> Result<AlignmentParams, AlignmentArgsError> {
        debug!("{:#?}", self);

        let AlignmentArgs {
            database,
            latitude,
            longitude,
            mount_alignment,
            math_plugin,
            no_uncalibrated_fallback,
        } = self;

        let mut printer = InfoPrinter::new("Alignment".into());

        let database = match database {
            Some(file) => {
                let db = AlignmentDatabase::read_file(&file)?;
                printer.push_line(
                    format!("{} sync points from {}", db.len(), file.display()).into(),
                );
                db
            }
            None => {
                "No sync point database was given".warn();
                AlignmentDatabase::new()
            }
        };

        let reference_position = match (latitude, longitude) {
            (Some(lat), Some(long)) => Some(ReferencePosition::new(
                parse_degrees(&lat)?,
                parse_degrees(&long)?,
            )),
            (None, None) => None,
            _ => return Err(AlignmentArgsError::OnlyOneOfLatitudeLongitude),
        };

        let mount_alignment = match mount_alignment {
            Some(s) => Some(
                ApproximateMountAlignment::from_str(&s)
                    .map_err(|_| AlignmentArgsError::InvalidMountAlignment(s))?,
            ),
            None => None,
        };
        let math_plugin = match math_plugin {
            Some(s) => MathPluginType::from_str(&s)
                .map_err(|_| AlignmentArgsError::InvalidMathPlugin(s))?,
            None => MathPluginType::default(),
        };

        let params = AlignmentParams::new(
            database,
            reference_position,
            mount_alignment,
            math_plugin,
            !no_uncalibrated_fallback,
        )?;
        if mount_alignment.is_none() {
            format!(
                "No mount alignment was given; assuming {}",
                params.approximate_alignment
            )
            .warn();
        }

        if let Some(pos) = params.reference_position() {
            printer.push_line(
                format!(
                    "Observer: {:.4}° latitude, {:.4}° longitude",
                    pos.latitude, pos.longitude
                )
                .into(),
            );
        }
        printer.push_line(format!("Mount alignment: {}", params.approximate_alignment).into());
        printer.push_line(format!("Math plugin: {}", params.math_plugin).into());
        printer.display();

        Ok(params)
    }
}

/// Decimal degrees, or a sexagesimal string like "-26d42m11.95s".
pub(super) fn parse_degrees(s: &str) -> Result<f64, AlignmentArgsError> {
    let s = s.trim();
    match s.parse() {
        Ok(f) => Ok(f),
        Err(_) => sexagesimal_dms_string_to_degrees(s).map_err(|err| {
            AlignmentArgsError::Sexagesimal {
                value: s.to_string(),
                err,
            }
        }),
    }
}

/// Decimal hours, or a sexagesimal string like "11h34m23.8s".
pub(super) fn parse_hours(s: &str) -> Result<f64, AlignmentArgsError> {
    let s = s.trim();
    match s.parse() {
        Ok(f) => Ok(f),
        Err(_) => sexagesimal_hms_string_to_degrees(s)
            .map(|deg| deg / 15.0)
            .map_err(|err| AlignmentArgsError::Sexagesimal {
                value: s.to_string(),
                err,
            }),
    }
}

/// Pass any numerical degeneracies found while initialising on to the user.
pub(super) fn warn_about_report(report: Option<&InitialiseReport>) {
    if let Some(report) = report {
        for warning in &report.warnings {
            warning.to_string().warn();
        }
    }
    display_warnings();
}

#[derive(Error, Debug)]
pub(super) enum AlignmentArgsError {
    #[error("Only one of latitude and longitude was given, but both are required")]
    OnlyOneOfLatitudeLongitude,

    #[error("Couldn't parse '{value}' as a number or sexagesimal value: {err}")]
    Sexagesimal {
        value: String,
        err: SexagesimalError,
    },

    #[error("Unrecognised mount alignment '{0}'. Supported: {}", *MOUNT_ALIGNMENTS_COMMA_SEPARATED)]
    InvalidMountAlignment(String),

    #[error("Unrecognised math plugin '{0}'. Supported: {}", *MATH_PLUGINS_COMMA_SEPARATED)]
    InvalidMathPlugin(String),

    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}
