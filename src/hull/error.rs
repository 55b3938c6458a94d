// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with building convex hulls.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HullError {
    #[error("A convex hull needs at least 4 vertices, but only {found} were supplied")]
    TooFewVertices { found: usize },

    #[error("All of the hull's vertices are collinear")]
    AllCollinear,

    #[error("All of the hull's vertices are coplanar")]
    AllCoplanar,

    #[error("The hull has already been seeded")]
    AlreadySeeded,

    #[error("The hull must be seeded before it can be constructed")]
    NotSeeded,

    #[error("The hull must be constructed before its faces can be ordered")]
    NotConstructed,

    #[error("Hull fails Euler's formula: V = {vertices}, E = {edges}, F = {faces}")]
    Euler {
        vertices: usize,
        edges: usize,
        faces: usize,
    },

    #[error("Hull is inconsistent: {0}")]
    Inconsistent(String),

    #[error("Hull is not convex: vertex number {vnum} can see face {face}")]
    NotConvex { face: usize, vnum: usize },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
