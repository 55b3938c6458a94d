// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::*;
use crate::{
    alignment::TransformRegime, database::AlignmentDatabaseEntry,
    direction::TelescopeDirectionVector,
};

#[test]
fn test_position_from_the_database() {
    let db = AlignmentDatabase::with_reference_position(ReferencePosition::new(-31.0, 150.0));
    let params = AlignmentParams::new(db, None, None, MathPluginType::BuiltIn, true).unwrap();
    assert_eq!(
        params.reference_position(),
        Some(ReferencePosition::new(-31.0, 150.0))
    );
    assert_eq!(
        params.approximate_alignment,
        ApproximateMountAlignment::SouthCelestialPole
    );
}

#[test]
fn test_given_position_wins() {
    let db = AlignmentDatabase::with_reference_position(ReferencePosition::new(-31.0, 150.0));
    let params = AlignmentParams::new(
        db,
        Some(ReferencePosition::new(52.0, -1.5)),
        Some(ApproximateMountAlignment::Zenith),
        MathPluginType::BuiltIn,
        true,
    )
    .unwrap();
    assert_eq!(
        params.database.reference_position(),
        Some(ReferencePosition::new(52.0, -1.5))
    );
    assert_eq!(params.approximate_alignment, ApproximateMountAlignment::Zenith);
}

#[test]
fn test_bad_positions() {
    let result = AlignmentParams::new(
        AlignmentDatabase::new(),
        None,
        None,
        MathPluginType::BuiltIn,
        true,
    );
    assert!(matches!(result, Err(ParamsError::NoReferencePosition)));

    let result = AlignmentParams::new(
        AlignmentDatabase::new(),
        Some(ReferencePosition::new(95.0, 0.0)),
        None,
        MathPluginType::BuiltIn,
        true,
    );
    assert!(matches!(result, Err(ParamsError::InvalidLatitude(_))));

    let result = AlignmentParams::new(
        AlignmentDatabase::new(),
        Some(ReferencePosition::new(10.0, 400.0)),
        None,
        MathPluginType::BuiltIn,
        true,
    );
    assert!(matches!(result, Err(ParamsError::InvalidLongitude(_))));
}

#[test]
fn test_into_subsystem() {
    let mut db = AlignmentDatabase::new();
    db.append(AlignmentDatabaseEntry::new(
        2_460_000.5,
        6.0,
        -20.0,
        TelescopeDirectionVector::new(0.0, 0.6, 0.8),
    ));
    let params = AlignmentParams::new(
        db,
        Some(ReferencePosition::new(-26.7, 116.67)),
        None,
        MathPluginType::BuiltIn,
        false,
    )
    .unwrap();
    let subsystem = params.into_subsystem().unwrap();
    assert_eq!(
        subsystem.last_report().map(|r| r.regime),
        Some(TransformRegime::OneSyncPoint)
    );
    assert_eq!(
        subsystem.plugin().approximate_mount_alignment(),
        ApproximateMountAlignment::SouthCelestialPole
    );
}

#[test]
fn test_fallback_is_passed_on() {
    let db = AlignmentDatabase::with_reference_position(ReferencePosition::new(10.0, 10.0));
    let params = AlignmentParams::new(db, None, None, MathPluginType::BuiltIn, false).unwrap();
    let result = params.into_subsystem();
    assert!(matches!(result, Err(AlignmentError::NoCalibrationData)));
}
