// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The built-in math plugin.
//!
//! Depending on how many sync points there are:
//! - 0: the approximate mount alignment is used to rotate between the local
//!   sky and the mount's frame;
//! - 1-3: one TAKI transform, with missing reference directions synthesised;
//! - 4+: convex hulls are built over the actual and apparent directions (plus
//!   a nadir vertex), and each hull face gets a TAKI transform from its three
//!   sync points. If the sync points are too degenerate for a hull, no
//!   transform is applied.

use hifitime::Epoch;
use log::{debug, trace, warn};
use marlu::RADec;

use super::{
    calculate_taki_matrices, AlignmentError, ApproximateMountAlignment, InitialiseReport,
    MathPlugin, TakiMatrices, TransformRegime, TransformWarning,
};
use crate::{
    constants::NADIR_VERTEX_NUMBER,
    database::AlignmentDatabase,
    direction::{
        azel_from_direction, direction_from_azel, ReferencePosition, TelescopeDirectionVector,
    },
    hull::{ConvexHull, HullError},
};

const NADIR: TelescopeDirectionVector = TelescopeDirectionVector::new(0.0, 0.0, -1.0);
const ZENITH: TelescopeDirectionVector = TelescopeDirectionVector::new(0.0, 0.0, 1.0);

#[derive(Debug, Clone)]
enum TransformKind {
    Uncalibrated,
    Single(TakiMatrices),
    Hull {
        /// Faces carry actual -> apparent transforms.
        actual: ConvexHull,
        /// Faces carry apparent -> actual transforms.
        apparent: ConvexHull,
    },
}

#[derive(Debug, Clone)]
struct TransformState {
    reference_position: ReferencePosition,
    kind: TransformKind,
}

#[derive(Debug, Clone)]
pub struct BuiltInMathPlugin {
    approximate_alignment: ApproximateMountAlignment,

    /// If true, an empty database initialises to the uncalibrated transform
    /// instead of failing.
    uncalibrated_fallback: bool,

    state: Option<TransformState>,
}

impl Default for BuiltInMathPlugin {
    fn default() -> Self {
        Self::new(ApproximateMountAlignment::default())
    }
}

impl BuiltInMathPlugin {
    pub fn new(approximate_alignment: ApproximateMountAlignment) -> Self {
        Self {
            approximate_alignment,
            uncalibrated_fallback: true,
            state: None,
        }
    }

    pub fn set_uncalibrated_fallback(&mut self, uncalibrated_fallback: bool) {
        self.uncalibrated_fallback = uncalibrated_fallback;
    }

    pub fn is_initialised(&self) -> bool {
        self.state.is_some()
    }

    /// The hull over actual directions, if there were enough sync points to
    /// build one.
    pub fn actual_hull(&self) -> Option<&ConvexHull> {
        match &self.state {
            Some(TransformState {
                kind: TransformKind::Hull { actual, .. },
                ..
            }) => Some(actual),
            _ => None,
        }
    }

    /// The hull over apparent directions, if there were enough sync points
    /// to build one.
    pub fn apparent_hull(&self) -> Option<&ConvexHull> {
        match &self.state {
            Some(TransformState {
                kind: TransformKind::Hull { apparent, .. },
                ..
            }) => Some(apparent),
            _ => None,
        }
    }

    fn state(&self) -> Result<&TransformState, AlignmentError> {
        self.state.as_ref().ok_or(AlignmentError::NotInitialised)
    }

    fn compute(
        &self,
        database: &AlignmentDatabase,
    ) -> Result<(TransformState, InitialiseReport), AlignmentError> {
        let reference_position = database
            .reference_position()
            .ok_or(AlignmentError::MissingReferencePosition)?;
        let entries = database.entries();
        let mut report = InitialiseReport {
            regime: TransformRegime::Uncalibrated,
            num_sync_points: entries.len(),
            num_hull_faces: None,
            warnings: vec![],
        };

        // Where each sync point really was in the local sky, and where the
        // mount said it was.
        let actual: Vec<TelescopeDirectionVector> = entries
            .iter()
            .map(|e| {
                let azel = reference_position.radec_to_azel(e.radec(), e.epoch());
                direction_from_azel(azel)
            })
            .collect();
        let apparent = entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                e.telescope_direction
                    .try_normalised()
                    .ok_or(AlignmentError::ZeroTelescopeDirection { sync_point: i + 1 })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let kind = match entries.len() {
            0 => {
                if !self.uncalibrated_fallback {
                    return Err(AlignmentError::NoCalibrationData);
                }
                TransformKind::Uncalibrated
            }

            1 => {
                report.regime = TransformRegime::OneSyncPoint;
                // Make a second sync point out of where the mount is assumed
                // to have its pole.
                let (dummy_actual, dummy_apparent) = match self.approximate_alignment {
                    ApproximateMountAlignment::Zenith => (ZENITH, ZENITH),
                    ApproximateMountAlignment::NorthCelestialPole => {
                        let pole = RADec::from_degrees(0.0, 90.0);
                        let azel = reference_position.radec_to_azel(pole, entries[0].epoch());
                        (direction_from_azel(azel), ZENITH)
                    }
                    ApproximateMountAlignment::SouthCelestialPole => {
                        let pole = RADec::from_degrees(0.0, -90.0);
                        let azel = reference_position.radec_to_azel(pole, entries[0].epoch());
                        (direction_from_azel(azel), ZENITH)
                    }
                };
                let actual = [actual[0], dummy_actual, third_direction(actual[0], dummy_actual)];
                let apparent = [
                    apparent[0],
                    dummy_apparent,
                    third_direction(apparent[0], dummy_apparent),
                ];
                TransformKind::Single(taki_or_identity(actual, apparent, &[1], &mut report))
            }

            2 => {
                report.regime = TransformRegime::TwoSyncPoints;
                let actual = [actual[0], actual[1], third_direction(actual[0], actual[1])];
                let apparent = [
                    apparent[0],
                    apparent[1],
                    third_direction(apparent[0], apparent[1]),
                ];
                TransformKind::Single(taki_or_identity(actual, apparent, &[1, 2], &mut report))
            }

            3 => {
                report.regime = TransformRegime::ThreeSyncPoints;
                let actual = [actual[0], actual[1], actual[2]];
                let apparent = [apparent[0], apparent[1], apparent[2]];
                TransformKind::Single(taki_or_identity(actual, apparent, &[1, 2, 3], &mut report))
            }

            n => {
                report.regime = TransformRegime::ConvexHull;
                match (build_hull(&actual), build_hull(&apparent)) {
                    (Ok(actual_hull), Ok(apparent_hull)) => {
                        let (kind, num_hull_faces) = face_transforms(
                            actual_hull,
                            apparent_hull,
                            &actual,
                            &apparent,
                            &mut report,
                        );
                        report.num_hull_faces = Some(num_hull_faces);
                        kind
                    }
                    (Err(e), _) | (_, Err(e)) => {
                        // Nothing sensible can be interpolated between the
                        // sync points, so don't transform at all.
                        warn!("Couldn't build a hull over the sync points: {e}");
                        let warning = TransformWarning::SingularTransform {
                            sync_points: (1..=n).collect(),
                        };
                        warn!("{warning}");
                        report.warnings.push(warning);
                        TransformKind::Single(TakiMatrices::IDENTITY)
                    }
                }
            }
        };

        Ok((
            TransformState {
                reference_position,
                kind,
            },
            report,
        ))
    }

    /// Which sync points make up the actual hull face hit by `direction`?
    /// The vertex numbers are sorted.
    #[cfg(test)]
    pub(crate) fn actual_face_for(
        &self,
        direction: TelescopeDirectionVector,
    ) -> Option<[usize; 3]> {
        let hull = self.actual_hull()?;
        let f = hull.find_intersected_face(direction, NADIR_VERTEX_NUMBER)?;
        let mut vnums = hull.face_vertex_numbers(f);
        vnums.sort_unstable();
        Some(vnums)
    }
}

impl MathPlugin for BuiltInMathPlugin {
    fn name(&self) -> &'static str {
        "built_in"
    }

    fn approximate_mount_alignment(&self) -> ApproximateMountAlignment {
        self.approximate_alignment
    }

    fn set_approximate_mount_alignment(&mut self, alignment: ApproximateMountAlignment) {
        self.approximate_alignment = alignment;
    }

    fn initialise(
        &mut self,
        database: &AlignmentDatabase,
    ) -> Result<InitialiseReport, AlignmentError> {
        self.state = None;
        let (state, report) = self.compute(database)?;
        debug!(
            "Initialised the {} math plugin from {} sync points ({})",
            self.name(),
            report.num_sync_points,
            report.regime
        );
        self.state = Some(state);
        Ok(report)
    }

    fn celestial_to_telescope_at(
        &self,
        radec: RADec,
        epoch: Epoch,
    ) -> Result<TelescopeDirectionVector, AlignmentError> {
        let state = self.state()?;
        let position = state.reference_position;
        let actual = direction_from_azel(position.radec_to_azel(radec, epoch));

        let apparent = match &state.kind {
            TransformKind::Uncalibrated => {
                let mut v = actual;
                match self.approximate_alignment {
                    ApproximateMountAlignment::Zenith => (),
                    ApproximateMountAlignment::NorthCelestialPole => {
                        v.rotate_around_y(position.latitude - 90.0)
                    }
                    ApproximateMountAlignment::SouthCelestialPole => {
                        v.rotate_around_y(position.latitude + 90.0)
                    }
                }
                v
            }

            TransformKind::Single(taki) => taki.actual_to_apparent * actual,

            TransformKind::Hull { actual: hull, .. } => {
                let f = hull
                    .find_intersected_face(actual, NADIR_VERTEX_NUMBER)
                    .ok_or(AlignmentError::NoIntersection)?;
                trace!("Using actual hull face {:?}", hull.face_vertex_numbers(f));
                hull.face(f).matrix * actual
            }
        };

        apparent.try_normalised().ok_or(AlignmentError::ZeroDirection)
    }

    fn telescope_to_celestial_at(
        &self,
        direction: TelescopeDirectionVector,
        epoch: Epoch,
    ) -> Result<RADec, AlignmentError> {
        let state = self.state()?;
        let position = state.reference_position;
        let apparent = direction
            .try_normalised()
            .ok_or(AlignmentError::ZeroDirection)?;

        let actual = match &state.kind {
            TransformKind::Uncalibrated => {
                let mut v = apparent;
                match self.approximate_alignment {
                    ApproximateMountAlignment::Zenith => (),
                    ApproximateMountAlignment::NorthCelestialPole => {
                        v.rotate_around_y(90.0 - position.latitude)
                    }
                    ApproximateMountAlignment::SouthCelestialPole => {
                        v.rotate_around_y(-90.0 - position.latitude)
                    }
                }
                v
            }

            TransformKind::Single(taki) => taki.apparent_to_actual * apparent,

            TransformKind::Hull {
                apparent: hull, ..
            } => {
                let f = hull
                    .find_intersected_face(apparent, NADIR_VERTEX_NUMBER)
                    .ok_or(AlignmentError::NoIntersection)?;
                trace!("Using apparent hull face {:?}", hull.face_vertex_numbers(f));
                hull.face(f).matrix * apparent
            }
        };

        let actual = actual
            .try_normalised()
            .ok_or(AlignmentError::ZeroDirection)?;
        Ok(position.azel_to_radec(azel_from_direction(actual), epoch))
    }
}

/// A third reference direction perpendicular to the other two. It is not
/// normalised; its length follows the separation of the other two. If they
/// are parallel, the zero vector comes back and the transform will be
/// singular.
fn third_direction(
    a: TelescopeDirectionVector,
    b: TelescopeDirectionVector,
) -> TelescopeDirectionVector {
    a * b
}

fn taki_or_identity(
    actual: [TelescopeDirectionVector; 3],
    apparent: [TelescopeDirectionVector; 3],
    sync_points: &[usize],
    report: &mut InitialiseReport,
) -> TakiMatrices {
    match calculate_taki_matrices(actual, apparent) {
        Some(m) => m,
        None => {
            let warning = TransformWarning::SingularTransform {
                sync_points: sync_points.to_vec(),
            };
            warn!("{warning}");
            report.warnings.push(warning);
            TakiMatrices::IDENTITY
        }
    }
}

/// A hull over the nadir and each direction, numbered from 1.
fn build_hull(directions: &[TelescopeDirectionVector]) -> Result<ConvexHull, HullError> {
    let vertices = std::iter::once((NADIR_VERTEX_NUMBER, NADIR))
        .chain(directions.iter().enumerate().map(|(i, &d)| (i + 1, d)));
    ConvexHull::from_directions(vertices)
}

/// Give every face not touching the nadir a TAKI transform from its three
/// sync points. Returns the number of such faces in the actual hull.
fn face_transforms(
    mut actual_hull: ConvexHull,
    mut apparent_hull: ConvexHull,
    actual: &[TelescopeDirectionVector],
    apparent: &[TelescopeDirectionVector],
    report: &mut InitialiseReport,
) -> (TransformKind, usize) {
    debug!(
        "Actual hull has {} faces, apparent hull has {} faces",
        actual_hull.num_faces(),
        apparent_hull.num_faces()
    );

    let mut num_hull_faces = 0;
    for f in actual_hull.face_ids().collect::<Vec<_>>() {
        if actual_hull.face_has_vertex_number(f, NADIR_VERTEX_NUMBER) {
            continue;
        }
        let vnums = actual_hull.face_vertex_numbers(f);
        let taki = taki_or_identity(
            vnums.map(|v| actual[v - 1]),
            vnums.map(|v| apparent[v - 1]),
            &vnums,
            report,
        );
        actual_hull.face_mut(f).matrix = taki.actual_to_apparent;
        num_hull_faces += 1;
    }
    for f in apparent_hull.face_ids().collect::<Vec<_>>() {
        if apparent_hull.face_has_vertex_number(f, NADIR_VERTEX_NUMBER) {
            continue;
        }
        let vnums = apparent_hull.face_vertex_numbers(f);
        // Going the other way, so the apparent directions are the ones that
        // need to span 3D space.
        let taki = taki_or_identity(
            vnums.map(|v| apparent[v - 1]),
            vnums.map(|v| actual[v - 1]),
            &vnums,
            report,
        );
        apparent_hull.face_mut(f).matrix = taki.actual_to_apparent;
    }

    (
        TransformKind::Hull {
            actual: actual_hull,
            apparent: apparent_hull,
        },
        num_hull_faces,
    )
}
