// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all skyalign-related errors. This should be the *only*
//! error enum that is publicly visible from the command-line code.

use thiserror::Error;

use super::common::AlignmentArgsError;
use crate::{
    alignment::AlignmentError,
    database::{DatabaseError, DATABASE_FILE_TYPES_COMMA_SEPARATED},
    hull::HullError,
    params::ParamsError,
};

/// The *only* publicly visible error from the skyalign binary. Each variant
/// carries a rendered message.
#[derive(Error, Debug)]
pub enum SkyalignError {
    /// An error from a math plugin, or from converting coordinates.
    #[error("{0}")]
    Alignment(String),

    /// An error related to sync point databases.
    #[error("{0}\n\nSync point databases are files with one of these extensions: {exts}", exts = *DATABASE_FILE_TYPES_COMMA_SEPARATED)]
    Database(String),

    /// An error related to the convex hull over sync points.
    #[error("{0}\n\nA hull needs at least 4 sync points that aren't all in one plane with the nadir.")]
    Hull(String),

    /// An error related to command-line arguments.
    #[error("{0}")]
    Args(String),

    /// An error related to argument files.
    #[error("{0}")]
    ArgFile(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<AlignmentError> for SkyalignError {
    fn from(e: AlignmentError) -> Self {
        let s = e.to_string();
        match e {
            AlignmentError::Database(e) => Self::from(e),
            AlignmentError::MissingReferencePosition => Self::Args(s),
            AlignmentError::NoCalibrationData
            | AlignmentError::NotInitialised
            | AlignmentError::NoIntersection
            | AlignmentError::ZeroTelescopeDirection { .. }
            | AlignmentError::ZeroDirection
            | AlignmentError::Clock(_) => Self::Alignment(s),
        }
    }
}

impl From<DatabaseError> for SkyalignError {
    fn from(e: DatabaseError) -> Self {
        let s = e.to_string();
        match e {
            DatabaseError::IO(_) => Self::Generic(s),
            _ => Self::Database(s),
        }
    }
}

impl From<HullError> for SkyalignError {
    fn from(e: HullError) -> Self {
        let s = e.to_string();
        match e {
            HullError::IO(_) => Self::Generic(s),
            _ => Self::Hull(s),
        }
    }
}

impl From<ParamsError> for SkyalignError {
    fn from(e: ParamsError) -> Self {
        Self::Args(e.to_string())
    }
}

impl From<AlignmentArgsError> for SkyalignError {
    fn from(e: AlignmentArgsError) -> Self {
        let s = e.to_string();
        match e {
            AlignmentArgsError::Database(e) => Self::from(e),
            AlignmentArgsError::Params(e) => Self::from(e),
            AlignmentArgsError::OnlyOneOfLatitudeLongitude
            | AlignmentArgsError::Sexagesimal { .. }
            | AlignmentArgsError::InvalidMountAlignment(_)
            | AlignmentArgsError::InvalidMathPlugin(_) => Self::Args(s),
        }
    }
}

impl From<std::io::Error> for SkyalignError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
