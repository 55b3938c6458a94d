// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Convert between sky coordinates and telescope directions.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info};
use marlu::{
    sexagesimal::{degrees_to_sexagesimal_dms, degrees_to_sexagesimal_hms},
    RADec,
};
use serde::{Deserialize, Serialize};

use super::{
    common::{parse_degrees, parse_hours, warn_about_report, AlignmentArgs, ARG_FILE_HELP},
    SkyalignError,
};
use crate::{
    alignment::AlignmentSubsystem,
    constants::TAU,
    direction::{epoch_from_julian_date, TelescopeDirectionVector},
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct CelestialToTelescopeArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// The right ascension [hours], e.g. 11.5733 or 11h34m23.8s.
    #[clap(long, help_heading = "COORDINATE")]
    pub(super) ra: Option<String>,

    /// The declination [degrees], e.g. -17.4641 or -17d27m50.7s.
    #[clap(long, allow_hyphen_values = true, help_heading = "COORDINATE")]
    pub(super) dec: Option<String>,

    /// When to do the conversion, as a Julian date (UTC). Default: now.
    #[clap(long, help_heading = "TIME")]
    pub(super) julian_date: Option<f64>,

    /// Days added to the time of the conversion.
    #[clap(long, allow_hyphen_values = true, help_heading = "TIME")]
    pub(super) julian_offset: Option<f64>,

    #[clap(flatten)]
    #[serde(rename = "alignment")]
    #[serde(default)]
    pub(super) alignment_args: AlignmentArgs,
}

impl CelestialToTelescopeArgs {
    pub(super) fn merge(self) -> Result<CelestialToTelescopeArgs, SkyalignError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let CelestialToTelescopeArgs {
                args_file: _,
                ra,
                dec,
                julian_date,
                julian_offset,
                alignment_args,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(CelestialToTelescopeArgs {
                args_file: None,
                ra: cli_args.ra.or(ra),
                dec: cli_args.dec.or(dec),
                julian_date: cli_args.julian_date.or(julian_date),
                julian_offset: cli_args.julian_offset.or(julian_offset),
                alignment_args: cli_args.alignment_args.merge(alignment_args),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn run(self) -> Result<(), SkyalignError> {
        let CelestialToTelescopeArgs {
            args_file: _,
            ra,
            dec,
            julian_date,
            julian_offset,
            alignment_args,
        } = self;

        let (ra, dec) = match (ra, dec) {
            (Some(ra), Some(dec)) => (parse_hours(&ra)?, parse_degrees(&dec)?),
            _ => {
                return Err(SkyalignError::Args(
                    "Both a right ascension and a declination are required".to_string(),
                ))
            }
        };
        if !(0.0..24.0).contains(&ra) {
            return Err(SkyalignError::Args(format!(
                "Right ascension {ra} h is not within 0 to 24"
            )));
        }
        if !(-90.0..=90.0).contains(&dec) {
            return Err(SkyalignError::Args(format!(
                "Declination {dec}° is not within -90 to 90"
            )));
        }
        let radec = RADec::from_degrees(ra * 15.0, dec);

        let subsystem = alignment_args.parse()?.into_subsystem()?;
        report_transform(&subsystem);

        let julian_offset = julian_offset.unwrap_or_default();
        let direction = match julian_date {
            Some(jd) => subsystem
                .celestial_to_telescope_at(radec, epoch_from_julian_date(jd + julian_offset))?,
            None => subsystem.celestial_to_telescope(radec, julian_offset)?,
        };
        info!(
            "Telescope direction: ({:.9}, {:.9}, {:.9})",
            direction.x, direction.y, direction.z
        );
        Ok(())
    }
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct TelescopeToCelestialArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// The x component of the telescope direction.
    #[clap(short, long, allow_hyphen_values = true, help_heading = "DIRECTION")]
    pub(super) x: Option<f64>,

    /// The y component of the telescope direction.
    #[clap(short, long, allow_hyphen_values = true, help_heading = "DIRECTION")]
    pub(super) y: Option<f64>,

    /// The z component of the telescope direction.
    #[clap(short, long, allow_hyphen_values = true, help_heading = "DIRECTION")]
    pub(super) z: Option<f64>,

    /// When to do the conversion, as a Julian date (UTC). Default: now.
    #[clap(long, help_heading = "TIME")]
    pub(super) julian_date: Option<f64>,

    #[clap(flatten)]
    #[serde(rename = "alignment")]
    #[serde(default)]
    pub(super) alignment_args: AlignmentArgs,
}

impl TelescopeToCelestialArgs {
    pub(super) fn merge(self) -> Result<TelescopeToCelestialArgs, SkyalignError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let TelescopeToCelestialArgs {
                args_file: _,
                x,
                y,
                z,
                julian_date,
                alignment_args,
            } = unpack_arg_file!(arg_file);

            Ok(TelescopeToCelestialArgs {
                args_file: None,
                x: cli_args.x.or(x),
                y: cli_args.y.or(y),
                z: cli_args.z.or(z),
                julian_date: cli_args.julian_date.or(julian_date),
                alignment_args: cli_args.alignment_args.merge(alignment_args),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn run(self) -> Result<(), SkyalignError> {
        let TelescopeToCelestialArgs {
            args_file: _,
            x,
            y,
            z,
            julian_date,
            alignment_args,
        } = self;

        let direction = match (x, y, z) {
            (Some(x), Some(y), Some(z)) => TelescopeDirectionVector::new(x, y, z),
            _ => {
                return Err(SkyalignError::Args(
                    "All of x, y and z are required".to_string(),
                ))
            }
        };

        let subsystem = alignment_args.parse()?.into_subsystem()?;
        report_transform(&subsystem);

        let radec = match julian_date {
            Some(jd) => {
                subsystem.telescope_to_celestial_at(direction, epoch_from_julian_date(jd))?
            }
            None => subsystem.telescope_to_celestial(direction)?,
        };
        let ra_deg = radec.ra.rem_euclid(TAU).to_degrees();
        let dec_deg = radec.dec.to_degrees();
        info!(
            "RA: {:.6} h ({}), Dec: {:.6}° ({})",
            ra_deg / 15.0,
            degrees_to_sexagesimal_hms(ra_deg),
            dec_deg,
            degrees_to_sexagesimal_dms(dec_deg)
        );
        Ok(())
    }
}

fn report_transform(subsystem: &AlignmentSubsystem) {
    if let Some(report) = subsystem.last_report() {
        info!(
            "Using the {} math plugin ({} sync points, {})",
            subsystem.plugin().name(),
            report.num_sync_points,
            report.regime
        );
    }
    warn_about_report(subsystem.last_report());
}
