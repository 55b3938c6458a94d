// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Write out the convex hull over a database's sync points.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use clap::Parser;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{
    common::{warn_about_report, AlignmentArgs, ARG_FILE_HELP},
    SkyalignError,
};
use crate::alignment::MathPlugin;

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct HullObjArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// Where to write the hull over the actual (sky) directions, as a
    /// Wavefront OBJ file. Vertex 1 is the nadir; the rest are the sync
    /// points in database order.
    #[clap(short, long, parse(from_str), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,

    /// Also write the hull over the apparent (mount) directions here.
    #[clap(long, parse(from_str), help_heading = "OUTPUT FILES")]
    pub(super) apparent_output: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "alignment")]
    #[serde(default)]
    pub(super) alignment_args: AlignmentArgs,
}

impl HullObjArgs {
    pub(super) fn merge(self) -> Result<HullObjArgs, SkyalignError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let HullObjArgs {
                args_file: _,
                output,
                apparent_output,
                alignment_args,
            } = unpack_arg_file!(arg_file);

            Ok(HullObjArgs {
                args_file: None,
                output: cli_args.output.or(output),
                apparent_output: cli_args.apparent_output.or(apparent_output),
                alignment_args: cli_args.alignment_args.merge(alignment_args),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn run(self) -> Result<(), SkyalignError> {
        let HullObjArgs {
            args_file: _,
            output,
            apparent_output,
            alignment_args,
        } = self;

        let output = output.ok_or_else(|| {
            SkyalignError::Args("No output OBJ file was specified".to_string())
        })?;

        // Hulls are specific to the built-in plugin.
        let params = alignment_args.parse()?;
        let mut plugin = params.built_in_plugin();
        let report = plugin.initialise(&params.database)?;
        warn_about_report(Some(&report));

        let (actual, apparent) = match (plugin.actual_hull(), plugin.apparent_hull()) {
            (Some(actual), Some(apparent)) => (actual, apparent),
            _ if report.num_sync_points < 4 => {
                return Err(SkyalignError::Hull(format!(
                    "There are only {} sync points, so no hull was made",
                    report.num_sync_points
                )))
            }
            _ => {
                return Err(SkyalignError::Hull(
                    "The sync points are too degenerate to make a hull".to_string(),
                ))
            }
        };

        for (hull, file) in [(actual, Some(&output)), (apparent, apparent_output.as_ref())] {
            let file = match file {
                Some(f) => f,
                None => continue,
            };
            let mut buf = BufWriter::new(File::create(file)?);
            hull.write_obj(&mut buf)?;
            buf.flush()?;
            info!(
                "Wrote a hull with {} vertices and {} faces to {}",
                hull.num_vertices(),
                hull.num_faces(),
                file.display()
            );
        }
        Ok(())
    }
}
