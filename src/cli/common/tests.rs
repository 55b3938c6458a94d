// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against command-line interfaces that aren't big enough to go in their
//! own modules.

use std::io::Write;

use approx::assert_abs_diff_eq;
use indoc::indoc;

use super::*;

#[test]
fn test_parse_degrees() {
    assert_abs_diff_eq!(parse_degrees("-26.7033").unwrap(), -26.7033);
    assert_abs_diff_eq!(
        parse_degrees("-26d42m11.95s").unwrap(),
        -(26.0 + 42.0 / 60.0 + 11.95 / 3600.0),
        epsilon = 1e-10
    );
    assert!(matches!(
        parse_degrees("north"),
        Err(AlignmentArgsError::Sexagesimal { .. })
    ));
}

#[test]
fn test_parse_hours() {
    assert_abs_diff_eq!(parse_hours("11.5").unwrap(), 11.5);
    assert_abs_diff_eq!(
        parse_hours("11h30m00s").unwrap(),
        11.5,
        epsilon = 1e-10
    );
}

#[test]
fn test_merge_prefers_cli() {
    let cli = AlignmentArgs {
        latitude: Some("10".to_string()),
        ..Default::default()
    };
    let file = AlignmentArgs {
        latitude: Some("20".to_string()),
        longitude: Some("30".to_string()),
        no_uncalibrated_fallback: true,
        ..Default::default()
    };
    let merged = cli.merge(file);
    assert_eq!(merged.latitude.as_deref(), Some("10"));
    assert_eq!(merged.longitude.as_deref(), Some("30"));
    assert!(merged.no_uncalibrated_fallback);
}

#[test]
fn test_parse_without_database() {
    let params = AlignmentArgs {
        latitude: Some("-31".to_string()),
        longitude: Some("150d30m00s".to_string()),
        ..Default::default()
    }
    .parse()
    .unwrap();
    let pos = params.reference_position().unwrap();
    assert_abs_diff_eq!(pos.latitude, -31.0);
    assert_abs_diff_eq!(pos.longitude, 150.5, epsilon = 1e-10);
    assert_eq!(
        params.approximate_alignment,
        ApproximateMountAlignment::SouthCelestialPole
    );
    assert_eq!(params.math_plugin, MathPluginType::BuiltIn);
    assert!(params.uncalibrated_fallback);
    assert!(params.database.is_empty());
}

#[test]
fn test_parse_errors() {
    let result = AlignmentArgs {
        latitude: Some("-31".to_string()),
        ..Default::default()
    }
    .parse();
    assert!(matches!(
        result,
        Err(AlignmentArgsError::OnlyOneOfLatitudeLongitude)
    ));

    let result = AlignmentArgs {
        latitude: Some("-31".to_string()),
        longitude: Some("150".to_string()),
        mount_alignment: Some("sideways".to_string()),
        ..Default::default()
    }
    .parse();
    assert!(matches!(
        result,
        Err(AlignmentArgsError::InvalidMountAlignment(_))
    ));

    let result = AlignmentArgs {
        latitude: Some("-31".to_string()),
        longitude: Some("150".to_string()),
        math_plugin: Some("nearest".to_string()),
        ..Default::default()
    }
    .parse();
    assert!(matches!(result, Err(AlignmentArgsError::InvalidMathPlugin(_))));

    let result = AlignmentArgs::default().parse();
    assert!(matches!(
        result,
        Err(AlignmentArgsError::Params(ParamsError::NoReferencePosition))
    ));
}

#[test]
fn test_parse_with_database() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(
        indoc! {"
            reference_position:
              latitude: 52.0
              longitude: -1.5
            entries:
              - observation_julian_date: 2460000.5
                right_ascension: 5.5
                declination: 20.0
                telescope_direction: {x: 0.0, y: 0.6, z: 0.8}
        "}
        .as_bytes(),
    )
    .unwrap();
    file.flush().unwrap();

    let params = AlignmentArgs {
        database: Some(file.path().to_path_buf()),
        mount_alignment: Some("zenith".to_string()),
        ..Default::default()
    }
    .parse()
    .unwrap();
    assert_eq!(params.database.len(), 1);
    assert_eq!(
        params.reference_position(),
        Some(ReferencePosition::new(52.0, -1.5))
    );
    assert_eq!(params.approximate_alignment, ApproximateMountAlignment::Zenith);
}
