// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::{Cursor, Write};

use approx::assert_abs_diff_eq;
use indoc::indoc;

use super::*;

fn entry(jd: f64, ra: f64, dec: f64, v: [f64; 3]) -> AlignmentDatabaseEntry {
    AlignmentDatabaseEntry::new(jd, ra, dec, TelescopeDirectionVector::from(v))
}

fn test_database() -> AlignmentDatabase {
    let mut db = AlignmentDatabase::with_reference_position(ReferencePosition::new(-26.7, 116.67));
    db.append(entry(2_460_000.5, 1.5, -30.0, [0.1, 0.2, 0.97]));
    db.append(entry(2_460_000.501, 23.999, 89.0, [-0.5, 0.5, 0.707]));
    let mut e = entry(2_460_000.502, 12.25, -0.5, [0.0, -1.0, 0.0]);
    e.private_data = vec![0, 1, 255];
    db.append(e);
    db
}

fn assert_entries_match(a: &AlignmentDatabase, b: &AlignmentDatabase) {
    assert_eq!(a.len(), b.len());
    assert_eq!(a.reference_position(), b.reference_position());
    for (a, b) in a.entries().iter().zip(b.entries()) {
        assert_abs_diff_eq!(a.observation_julian_date, b.observation_julian_date, epsilon = 1e-9);
        assert_abs_diff_eq!(a.right_ascension, b.right_ascension, epsilon = 1e-12);
        assert_abs_diff_eq!(a.declination, b.declination, epsilon = 1e-12);
        assert_abs_diff_eq!(a.telescope_direction, b.telescope_direction, epsilon = 1e-12);
        assert_eq!(a.private_data, b.private_data);
    }
}

#[test]
fn test_insert_edit_delete_shift_indices() {
    let mut db = test_database();
    let new = entry(2_460_001.0, 6.0, 10.0, [1.0, 0.0, 0.0]);

    db.insert(1, new.clone()).unwrap();
    assert_eq!(db.len(), 4);
    assert_eq!(db.read(1).unwrap(), &new);
    assert_abs_diff_eq!(db.read(2).unwrap().right_ascension, 23.999);

    // Inserting at the end is an append.
    db.insert(4, new.clone()).unwrap();
    assert_eq!(db.len(), 5);
    assert!(matches!(
        db.insert(7, new.clone()),
        Err(DatabaseError::IndexOutOfRange { index: 7, len: 5 })
    ));

    let removed = db.delete(0).unwrap();
    assert_abs_diff_eq!(removed.right_ascension, 1.5);
    assert_eq!(db.read(0).unwrap(), &new);
    assert!(db.delete(4).is_err());

    let mut edited = new.clone();
    edited.declination = -45.0;
    db.edit(3, edited).unwrap();
    assert_abs_diff_eq!(db.read(3).unwrap().declination, -45.0);
    assert!(db.edit(4, new).is_err());

    db.clear();
    assert!(db.is_empty());
    assert!(db.read(0).is_err());
    // Clearing doesn't forget where we are.
    assert!(db.reference_position().is_some());
}

#[test]
fn test_read_increment() {
    let mut db = test_database();
    assert_abs_diff_eq!(db.read_increment().unwrap().right_ascension, 1.5);
    assert_abs_diff_eq!(db.read_increment().unwrap().right_ascension, 23.999);
    // Plain reads don't move the cursor.
    db.read(0).unwrap();
    assert_eq!(db.cursor(), 2);
    assert_abs_diff_eq!(db.read_increment().unwrap().right_ascension, 12.25);
    assert!(db.read_increment().is_none());

    db.set_cursor(1).unwrap();
    assert_abs_diff_eq!(db.read_increment().unwrap().right_ascension, 23.999);
    db.set_cursor(3).unwrap();
    assert!(db.read_increment().is_none());
    assert!(db.set_cursor(4).is_err());

    // Deleting below the cursor keeps it in range.
    db.delete(2).unwrap();
    assert_eq!(db.cursor(), 2);
    assert!(db.read_increment().is_none());
}

#[test]
fn test_copies_are_deep() {
    let db = test_database();
    let mut copy = db.read(2).unwrap().clone();
    copy.private_data[0] = 42;
    assert_eq!(db.read(2).unwrap().private_data[0], 0);
}

#[test]
fn test_read_yaml_with_sexagesimal() {
    let mut buf = Cursor::new(indoc! {"
        reference_position:
          latitude: -26.7
          longitude: 116.67
        entries:
          - observation_julian_date: 2460000.5
            right_ascension: 11h34m23.7854s
            declination: -17d27m50.6772s
            telescope_direction:
              x: 0.1
              y: 0.2
              z: 0.97
          - observation_julian_date: 2460000.6
            right_ascension: 3
            declination: 45.5
            telescope_direction:
              x: 1.0
              y: 0.0
              z: 0.0
            private_data: [1, 2, 3]
    "});
    let db = read::database_from_yaml(&mut buf).unwrap();
    assert_eq!(db.len(), 2);
    assert_eq!(
        db.reference_position(),
        Some(ReferencePosition::new(-26.7, 116.67))
    );

    let e = db.read(0).unwrap();
    assert_abs_diff_eq!(
        e.right_ascension,
        11.0 + 34.0 / 60.0 + 23.7854 / 3600.0,
        epsilon = 1e-9
    );
    assert_abs_diff_eq!(
        e.declination,
        -(17.0 + 27.0 / 60.0 + 50.6772 / 3600.0),
        epsilon = 1e-9
    );
    assert!(e.private_data.is_empty());

    let e = db.read(1).unwrap();
    assert_abs_diff_eq!(e.right_ascension, 3.0);
    assert_abs_diff_eq!(e.declination, 45.5);
    assert_eq!(e.private_data, vec![1, 2, 3]);
}

#[test]
fn test_read_rejects_bad_values() {
    let mut buf = Cursor::new(indoc! {"
        entries:
          - observation_julian_date: 2460000.5
            right_ascension: 24.0
            declination: 0.0
            telescope_direction: {x: 1.0, y: 0.0, z: 0.0}
    "});
    let result = read::database_from_yaml(&mut buf);
    assert!(matches!(result, Err(DatabaseError::InvalidRa { index: 0, .. })));

    let mut buf = Cursor::new(indoc! {"
        entries:
          - observation_julian_date: 2460000.5
            right_ascension: 1.0
            declination: 0.0
            telescope_direction: {x: 1.0, y: 0.0, z: 0.0}
          - observation_julian_date: 2460000.5
            right_ascension: 1.0
            declination: -90.5
            telescope_direction: {x: 1.0, y: 0.0, z: 0.0}
    "});
    let result = read::database_from_yaml(&mut buf);
    assert!(matches!(result, Err(DatabaseError::InvalidDec { index: 1, .. })));

    let mut buf = Cursor::new(indoc! {r#"
        {
            "entries": [
                {
                    "observation_julian_date": 2460000.5,
                    "right_ascension": 1.0,
                    "declination": 0.0,
                    "telescope_direction": {"x": 1.0, "y": null, "z": 0.0}
                }
            ]
        }
    "#});
    assert!(read::database_from_json(&mut buf).is_err());
}

#[test]
fn test_empty_database_has_no_entries() {
    let mut buf = Cursor::new("{}");
    let db = read::database_from_json(&mut buf).unwrap();
    assert!(db.is_empty());
    assert!(db.reference_position().is_none());
}

#[test]
fn test_yaml_round_trip() {
    let db = test_database();
    let temp = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    db.write_file(temp.path()).unwrap();
    let read = AlignmentDatabase::read_file(temp.path()).unwrap();
    assert_entries_match(&db, &read);

    // Save again and reload; nothing should drift.
    let temp2 = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    read.write_file(temp2.path()).unwrap();
    let read2 = AlignmentDatabase::read_file(temp2.path()).unwrap();
    assert_entries_match(&db, &read2);
}

#[test]
fn test_json_round_trip() {
    let db = test_database();
    let temp = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    db.write_file(temp.path()).unwrap();
    let read = AlignmentDatabase::read_file(temp.path()).unwrap();
    assert_entries_match(&db, &read);
}

#[test]
fn test_load_file_replaces_entries() {
    let db = test_database();
    let temp = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    db.write_file(temp.path()).unwrap();

    let mut other = AlignmentDatabase::new();
    other.append(entry(2_459_000.0, 2.0, 2.0, [0.0, 0.0, 1.0]));
    other.read_increment();
    other.load_file(temp.path()).unwrap();
    assert_entries_match(&db, &other);
    assert_eq!(other.cursor(), 0);
}

#[test]
fn test_load_file_keeps_reference_position_if_file_has_none() {
    let mut temp = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    temp.write_all(b"entries: []\n").unwrap();
    temp.flush().unwrap();

    let mut db = test_database();
    db.load_file(temp.path()).unwrap();
    assert!(db.is_empty());
    assert_eq!(
        db.reference_position(),
        Some(ReferencePosition::new(-26.7, 116.67))
    );
}

#[test]
fn test_unsupported_extension() {
    let temp = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    let result = test_database().write_file(temp.path());
    assert!(matches!(result, Err(DatabaseError::UnsupportedExt { .. })));
    let result = AlignmentDatabase::read_file(temp.path());
    assert!(matches!(result, Err(DatabaseError::UnsupportedExt { .. })));
}

#[test]
fn test_yml_extension_is_yaml() {
    let db = test_database();
    let temp = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    db.write_file(temp.path()).unwrap();
    let read = AlignmentDatabase::read_file(temp.path()).unwrap();
    assert_entries_match(&db, &read);

    // Only the canonical name is advertised.
    assert_eq!(DatabaseFileType::Yaml.to_string(), "yaml");
    assert_eq!(*DATABASE_FILE_TYPES_COMMA_SEPARATED, "yaml, json");
}
