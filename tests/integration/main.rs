// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::str::from_utf8;

use approx::assert_abs_diff_eq;
use assert_cmd::{output::OutputError, Command};
use indoc::indoc;
use marlu::RADec;
use tempfile::TempDir;

use skyalign::{
    direction::epoch_from_julian_date, AlignmentDatabase, ApproximateMountAlignment,
    BuiltInMathPlugin, MathPlugin, TelescopeDirectionVector,
};

const JULIAN_DATE: &str = "2460000.5";

const THREE_POINTS: &str = indoc! {"
    reference_position:
      latitude: -26.7
      longitude: 116.67
    entries:
      - observation_julian_date: 2460000.5
        right_ascension: 11h34m23.8s
        declination: -17d27m50.7s
        telescope_direction: {x: 0.71, y: -0.12, z: 0.69}
      - observation_julian_date: 2460000.5
        right_ascension: 14.2
        declination: -60.5
        telescope_direction: {x: -0.25, y: 0.62, z: 0.74}
      - observation_julian_date: 2460000.5
        right_ascension: 9.1
        declination: 5.0
        telescope_direction: {x: -0.55, y: -0.61, z: 0.57}
"};

const FIVE_POINTS: &str = indoc! {"
    reference_position:
      latitude: -26.7
      longitude: 116.67
    entries:
      - observation_julian_date: 2460000.5
        right_ascension: 0.0
        declination: -30.0
        telescope_direction: {x: 0.1, y: 0.2, z: 0.97}
      - observation_julian_date: 2460000.5
        right_ascension: 6.0
        declination: 10.0
        telescope_direction: {x: 0.8, y: -0.1, z: 0.59}
      - observation_julian_date: 2460000.5
        right_ascension: 12.0
        declination: -60.0
        telescope_direction: {x: -0.5, y: 0.6, z: 0.62}
      - observation_julian_date: 2460000.5
        right_ascension: 18.0
        declination: 20.0
        telescope_direction: {x: -0.3, y: -0.7, z: 0.64}
      - observation_julian_date: 2460000.5
        right_ascension: 3.0
        declination: -80.0
        telescope_direction: {x: 0.6, y: 0.6, z: 0.53}
"};

fn skyalign() -> Command {
    Command::cargo_bin("skyalign").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

fn make_file_in_dir<T: AsRef<Path>, U: AsRef<Path>>(
    filename: T,
    dir: U,
    contents: &str,
) -> PathBuf {
    let path = dir.as_ref().join(filename);
    let mut f = File::create(&path).expect("couldn't make file");
    f.write_all(contents.as_bytes()).unwrap();
    path
}

/// Pull the vector out of the "Telescope direction: (x, y, z)" log line.
fn parse_direction(stdout: &str) -> TelescopeDirectionVector {
    let line = stdout
        .lines()
        .find_map(|l| l.split("Telescope direction: (").nth(1))
        .unwrap_or_else(|| panic!("no telescope direction in output:\n{stdout}"));
    let xyz: Vec<f64> = line
        .trim_end_matches(')')
        .split(", ")
        .map(|s| s.parse().unwrap())
        .collect();
    TelescopeDirectionVector::new(xyz[0], xyz[1], xyz[2])
}

#[test]
fn test_database_info() {
    let tmp_dir = TempDir::new().unwrap();
    let db = make_file_in_dir("db.yaml", tmp_dir.path(), THREE_POINTS);

    let cmd = skyalign()
        .args(["database-info", &db.display().to_string()])
        .ok();
    assert!(cmd.is_ok(), "database-info failed on a good database");
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("3 sync points"), "{stdout}");
    assert!(stdout.contains("-26.7000° latitude"), "{stdout}");
}

#[test]
fn test_database_convert() {
    let tmp_dir = TempDir::new().unwrap();
    let yaml = make_file_in_dir("db.yaml", tmp_dir.path(), THREE_POINTS);
    let json = tmp_dir.path().join("db.json");

    let cmd = skyalign()
        .args([
            "database-convert",
            &yaml.display().to_string(),
            &json.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    let from_yaml = AlignmentDatabase::read_file(&yaml).unwrap();
    let from_json = AlignmentDatabase::read_file(&json).unwrap();
    assert_eq!(from_yaml.len(), from_json.len());
    assert_eq!(
        from_yaml.reference_position(),
        from_json.reference_position()
    );
    for (y, j) in from_yaml.entries().iter().zip(from_json.entries()) {
        assert_abs_diff_eq!(y.right_ascension, j.right_ascension, epsilon = 1e-12);
        assert_abs_diff_eq!(y.declination, j.declination, epsilon = 1e-12);
        assert_abs_diff_eq!(
            y.telescope_direction,
            j.telescope_direction,
            epsilon = 1e-12
        );
    }
}

#[test]
fn test_unsupported_database_fails() {
    let tmp_dir = TempDir::new().unwrap();
    let db = make_file_in_dir("db.txt", tmp_dir.path(), THREE_POINTS);

    let cmd = skyalign()
        .args(["database-info", &db.display().to_string()])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("yaml, json"), "{stderr}");
}

#[test]
fn test_celestial_to_telescope_matches_library() {
    let tmp_dir = TempDir::new().unwrap();
    let db_file = make_file_in_dir("db.yaml", tmp_dir.path(), THREE_POINTS);

    let cmd = skyalign()
        .args([
            "celestial-to-telescope",
            "--database",
            &db_file.display().to_string(),
            "--mount-alignment",
            "zenith",
            "--ra",
            "12.5",
            "--dec",
            "-30.25",
            "--julian-date",
            JULIAN_DATE,
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    let result = parse_direction(&stdout);
    assert!(stdout.contains("three sync points"), "{stdout}");

    let db = AlignmentDatabase::read_file(&db_file).unwrap();
    let mut plugin = BuiltInMathPlugin::new(ApproximateMountAlignment::Zenith);
    plugin.initialise(&db).unwrap();
    let expected = plugin
        .celestial_to_telescope_at(
            RADec::from_degrees(12.5 * 15.0, -30.25),
            epoch_from_julian_date(JULIAN_DATE.parse().unwrap()),
        )
        .unwrap();
    assert_abs_diff_eq!(result, expected, epsilon = 1e-8);
}

#[test]
fn test_telescope_to_celestial_zenith() {
    // Without sync points, a zenith-aligned mount pointing straight up is
    // looking at a declination equal to the observer's latitude.
    let cmd = skyalign()
        .args([
            "telescope-to-celestial",
            "--latitude",
            "-26.7",
            "--longitude",
            "116.67",
            "--mount-alignment",
            "zenith",
            "-x",
            "0",
            "-y",
            "0",
            "-z",
            "1",
            "--julian-date",
            JULIAN_DATE,
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Dec: -26.700000°"), "{stdout}");
    assert!(stdout.contains("No sync point database was given"), "{stdout}");
}

#[test]
fn test_missing_observer_position_fails() {
    let cmd = skyalign()
        .args(["telescope-to-celestial", "-x", "0", "-y", "0", "-z", "1"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("No observer position"), "{stderr}");
}

#[test]
fn test_save_toml_reproduces_run() {
    let tmp_dir = TempDir::new().unwrap();
    let db_file = make_file_in_dir("db.yaml", tmp_dir.path(), THREE_POINTS);
    let toml = tmp_dir.path().join("args.toml");

    let cmd = skyalign()
        .args([
            "celestial-to-telescope",
            "--database",
            &db_file.display().to_string(),
            "--ra",
            "3.25",
            "--dec",
            "-45",
            "--julian-date",
            JULIAN_DATE,
            "--save-toml",
            &toml.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    let first = parse_direction(&stdout);
    assert!(toml.exists());

    let cmd = skyalign()
        .args(["celestial-to-telescope", &toml.display().to_string()])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert_abs_diff_eq!(parse_direction(&stdout), first, epsilon = 1e-12);
}

#[test]
fn test_hull_obj() {
    let tmp_dir = TempDir::new().unwrap();
    let db_file = make_file_in_dir("db.yaml", tmp_dir.path(), FIVE_POINTS);
    let obj = tmp_dir.path().join("hull.obj");
    let apparent_obj = tmp_dir.path().join("apparent.obj");

    let cmd = skyalign()
        .args([
            "hull-obj",
            "--database",
            &db_file.display().to_string(),
            "--output",
            &obj.display().to_string(),
            "--apparent-output",
            &apparent_obj.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    for file in [obj, apparent_obj] {
        let contents = std::fs::read_to_string(file).unwrap();
        assert!(contents.contains("v 0 0 -1"));
        assert_eq!(contents.lines().filter(|l| l.starts_with("v ")).count(), 6);
        // Every point is on the unit sphere, so all 6 make it onto the hull.
        assert_eq!(contents.lines().filter(|l| l.starts_with("f ")).count(), 8);
    }
}

#[test]
fn test_hull_obj_needs_four_points() {
    let tmp_dir = TempDir::new().unwrap();
    let db_file = make_file_in_dir("db.yaml", tmp_dir.path(), THREE_POINTS);
    let obj = tmp_dir.path().join("hull.obj");

    let cmd = skyalign()
        .args([
            "hull-obj",
            "--database",
            &db_file.display().to_string(),
            "--output",
            &obj.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("only 3 sync points"), "{stderr}");
    assert!(!obj.exists());
}
