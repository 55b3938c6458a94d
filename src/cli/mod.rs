// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command-line interface code. More specific options for `skyalign`
//! subcommands are contained in modules.
//!
//! All booleans must have `#[serde(default)]` annotated, and anything that
//! isn't a boolean must be optional. This allows all arguments to be optional
//! *and* usable in an arguments file.
//!
//! Only 3 things should be public in this module: `Skyalign`,
//! `Skyalign::run`, and `SkyalignError`.

#[macro_use]
mod common;
mod convert;
mod database;
mod error;
mod hull;

pub use error::SkyalignError;

use std::path::PathBuf;

use clap::{AppSettings, Args, Parser, Subcommand};
use log::info;

// Add build-time information from the "built" crate.
include!(concat!(env!("OUT_DIR"), "/built.rs"));

#[derive(Debug, Parser)]
#[clap(
    version,
    author,
    about = "Telescope mount alignment from sync points: TAKI transforms and convex-hull facet selection"
)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_subcommands = true)]
#[clap(propagate_version = true)]
#[clap(infer_long_args = true)]
pub struct Skyalign {
    #[clap(flatten)]
    global_opts: GlobalArgs,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    #[clap(global = true)]
    verbosity: u8,

    /// Save the input arguments into a new TOML file that can be used to
    /// reproduce this run.
    #[clap(long)]
    #[clap(global = true)]
    save_toml: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
#[clap(arg_required_else_help = true)]
enum Command {
    #[clap(about = "Print a summary of a sync point database.")]
    DatabaseInfo(database::DatabaseInfoArgs),

    #[clap(about = "Convert a sync point database between formats.")]
    DatabaseConvert(database::DatabaseConvertArgs),

    #[clap(alias = "c2t")]
    #[clap(about = "Find the telescope direction for a sky coordinate.")]
    CelestialToTelescope(convert::CelestialToTelescopeArgs),

    #[clap(alias = "t2c")]
    #[clap(about = "Find the sky coordinate for a telescope direction.")]
    TelescopeToCelestial(convert::TelescopeToCelestialArgs),

    #[clap(about = "Write the convex hull over a database's sync points as a Wavefront OBJ file.")]
    HullObj(hull::HullObjArgs),
}

impl Skyalign {
    pub fn run(self) -> Result<(), SkyalignError> {
        // Set up logging.
        let GlobalArgs {
            verbosity,
            save_toml,
        } = self.global_opts;
        setup_logging(verbosity)
            .map_err(|e| SkyalignError::Generic(format!("Failed to initialise logging: {e}")))?;

        // Print the version of skyalign and its build-time information.
        let sub_command = match &self.command {
            Command::DatabaseInfo(_) => "database-info",
            Command::DatabaseConvert(_) => "database-convert",
            Command::CelestialToTelescope(_) => "celestial-to-telescope",
            Command::TelescopeToCelestial(_) => "telescope-to-celestial",
            Command::HullObj(_) => "hull-obj",
        };
        info!("skyalign {} {}", sub_command, env!("CARGO_PKG_VERSION"));
        display_build_info();

        macro_rules! merge_save_run {
            ($args:expr) => {{
                let args = $args.merge()?;
                if let Some(toml) = save_toml {
                    use std::{
                        fs::File,
                        io::{BufWriter, Write},
                    };

                    let mut f = BufWriter::new(File::create(toml)?);
                    let toml_str = toml::to_string(&args).map_err(|e| {
                        SkyalignError::Generic(format!("Couldn't serialise arguments: {e}"))
                    })?;
                    f.write_all(toml_str.as_bytes())?;
                    f.flush()?;
                }
                args.run()?;
            }};
        }

        match self.command {
            // Database utilities.
            Command::DatabaseInfo(args) => args.run()?,
            Command::DatabaseConvert(args) => args.run()?,

            Command::CelestialToTelescope(args) => {
                merge_save_run!(args)
            }

            Command::TelescopeToCelestial(args) => {
                merge_save_run!(args)
            }

            Command::HullObj(args) => {
                merge_save_run!(args)
            }
        }

        info!("skyalign {} complete.", sub_command);
        Ok(())
    }
}

/// Activate a logger. All log messages are put onto `stdout`. `env_logger`
/// automatically only uses colours and fancy symbols if we're on a tty (e.g. a
/// terminal); piped output will be formatted sensibly. Source code lines are
/// displayed in log messages when verbosity >= 3.
fn setup_logging(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Info),
        1 => builder.filter_level(log::LevelFilter::Debug),
        2 => builder.filter_level(log::LevelFilter::Trace),
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
            builder.format(|buf, record| {
                use std::io::Write;

                let timestamp = buf.timestamp();
                let level = record.level();
                let target = record.target();
                let line = record.line().unwrap_or(0);
                let message = record.args();

                writeln!(buf, "[{timestamp} {level} {target}:{line}] {message}")
            })
        }
    };
    builder.try_init()
}

/// Write many info-level log lines of how this executable was compiled.
fn display_build_info() {
    let dirty = match GIT_DIRTY {
        Some(true) => " (dirty)",
        _ => "",
    };
    match GIT_COMMIT_HASH_SHORT {
        Some(hash) => {
            info!("Compiled on git commit hash: {hash}{dirty}");
        }
        None => info!("Compiled on git commit hash: <no git info>"),
    }
    if let Some(hr) = GIT_HEAD_REF {
        info!("            git head ref: {}", hr);
    }
    info!("            {}", BUILT_TIME_UTC);
    info!("         with compiler {}", RUSTC_VERSION);
    info!("");
}
