// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Incremental 3D convex hulls over direction vectors.

Vertices are scaled into integer space (see [`HULL_SCALE_FACTOR`]) so that the
orientation test used throughout construction is exact. Vertices, edges and
faces live in arenas and refer to each other by index; removed records are
tombstoned rather than freed, so indices stay valid until [`ConvexHull::reset`].

A hull is built in stages: vertices are added, the hull is seeded with
[`ConvexHull::double_triangle`], the remaining vertices are folded in with
[`ConvexHull::construct_hull`] and finally
[`ConvexHull::edge_order_on_faces`] makes each face's edges follow its vertex
winding.
 */

mod error;
mod ray;

pub use error::HullError;
pub use ray::ray_triangle_intersection;

use std::{cmp::Ordering, io::Write};

use log::trace;

use crate::{
    constants::{HULL_SCALE_FACTOR, RAY_SCALE_FACTOR},
    direction::TelescopeDirectionVector,
    math::Matrix3,
};

pub type VertexId = usize;
pub type EdgeId = usize;
pub type FaceId = usize;

/// Where a hull is in its construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HullState {
    Empty,
    Seeded,
    Constructed,
    Ordered,
}

#[derive(Clone, Debug)]
pub struct Vertex {
    coords: [i64; 3],

    /// A caller-supplied identifier; vertices in different hulls with the
    /// same number describe the same sync point.
    vnum: usize,

    /// The cone edge already made from this vertex to the vertex currently
    /// being added.
    duplicate: Option<EdgeId>,
    on_hull: bool,
    processed: bool,
    removed: bool,
}

impl Vertex {
    pub fn vnum(&self) -> usize {
        self.vnum
    }

    pub fn coords(&self) -> [i64; 3] {
        self.coords
    }

    /// The vertex position, scaled back out of integer space.
    pub fn position(&self) -> TelescopeDirectionVector {
        TelescopeDirectionVector::new(
            self.coords[0] as f64 / HULL_SCALE_FACTOR,
            self.coords[1] as f64 / HULL_SCALE_FACTOR,
            self.coords[2] as f64 / HULL_SCALE_FACTOR,
        )
    }
}

#[derive(Clone, Debug)]
pub struct Edge {
    endpoints: [VertexId; 2],
    adjface: [Option<FaceId>; 2],

    /// The cone face replacing a visible face on this edge.
    newface: Option<FaceId>,
    delete: bool,
    removed: bool,
}

impl Edge {
    pub fn endpoints(&self) -> [VertexId; 2] {
        self.endpoints
    }

    pub fn adjacent_faces(&self) -> [Option<FaceId>; 2] {
        self.adjface
    }
}

#[derive(Clone, Debug)]
pub struct Face {
    edges: [EdgeId; 3],
    vertices: [VertexId; 3],
    visible: bool,
    removed: bool,

    /// The transform attached to this face by whoever owns the hull.
    pub matrix: Matrix3,
}

impl Face {
    pub fn vertices(&self) -> [VertexId; 3] {
        self.vertices
    }

    pub fn edges(&self) -> [EdgeId; 3] {
        self.edges
    }
}

#[derive(Clone, Debug)]
pub struct ConvexHull {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    faces: Vec<Face>,

    /// The vertex construction starts from.
    head: VertexId,
    state: HullState,
}

impl Default for ConvexHull {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvexHull {
    pub fn new() -> Self {
        Self {
            vertices: vec![],
            edges: vec![],
            faces: vec![],
            head: 0,
            state: HullState::Empty,
        }
    }

    /// Build a hull from numbered directions, running every construction
    /// stage.
    pub fn from_directions<I>(directions: I) -> Result<ConvexHull, HullError>
    where
        I: IntoIterator<Item = (usize, TelescopeDirectionVector)>,
    {
        let mut hull = Self::new();
        for (vnum, direction) in directions {
            hull.make_new_vertex(direction, vnum);
        }
        hull.double_triangle()?;
        hull.construct_hull()?;
        hull.edge_order_on_faces()?;
        Ok(hull)
    }

    /// Forget everything.
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.faces.clear();
        self.head = 0;
        self.state = HullState::Empty;
    }

    pub fn state(&self) -> HullState {
        self.state
    }

    /// Add a vertex to be included in the hull. This must happen before the
    /// hull is seeded.
    pub fn make_new_vertex(
        &mut self,
        direction: TelescopeDirectionVector,
        vnum: usize,
    ) -> VertexId {
        let scale = |c: f64| (c * HULL_SCALE_FACTOR).round() as i64;
        self.vertices.push(Vertex {
            coords: [scale(direction.x), scale(direction.y), scale(direction.z)],
            vnum,
            duplicate: None,
            on_hull: false,
            processed: false,
            removed: false,
        });
        self.vertices.len() - 1
    }

    /// Seed the hull with two opposite-facing triangles over the first
    /// non-collinear vertices, and find the first vertex not coplanar with
    /// them to start construction from.
    pub fn double_triangle(&mut self) -> Result<(), HullError> {
        if self.state != HullState::Empty {
            return Err(HullError::AlreadySeeded);
        }
        let n = self.vertices.len();
        if n < 4 {
            return Err(HullError::TooFewVertices { found: n });
        }

        let v0 = 0;
        let v1 = (1..n)
            .find(|&i| self.vertices[i].coords != self.vertices[v0].coords)
            .ok_or(HullError::AllCollinear)?;
        let v2 = (v1 + 1..n)
            .find(|&i| !self.collinear(v0, v1, i))
            .ok_or(HullError::AllCollinear)?;
        for v in [v0, v1, v2] {
            self.vertices[v].processed = true;
        }

        let f0 = self.make_face(v0, v1, v2, None);
        self.make_face(v2, v1, v0, Some(f0));

        let v3 = (1..n)
            .map(|k| (v2 + k) % n)
            .find(|&i| self.volume_sign(f0, i) != Ordering::Equal)
            .ok_or(HullError::AllCoplanar)?;
        trace!(
            "Seeded hull with vertices {}, {}, {}; construction starts at {}",
            self.vertices[v0].vnum,
            self.vertices[v1].vnum,
            self.vertices[v2].vnum,
            self.vertices[v3].vnum
        );
        self.head = v3;
        self.state = HullState::Seeded;
        Ok(())
    }

    /// Add every unprocessed vertex to the hull, starting from the vertex
    /// found by [`ConvexHull::double_triangle`].
    pub fn construct_hull(&mut self) -> Result<(), HullError> {
        if self.state != HullState::Seeded {
            return Err(HullError::NotSeeded);
        }
        let n = self.vertices.len();
        for k in 0..n {
            let v = (self.head + k) % n;
            if self.vertices[v].removed || self.vertices[v].processed {
                continue;
            }
            self.vertices[v].processed = true;
            let added = self.add_one(v);
            if !added {
                trace!("Vertex {} is inside the hull", self.vertices[v].vnum);
            }
            self.clean_up();
        }
        self.state = HullState::Constructed;
        Ok(())
    }

    /// Reorder each face's edges so that edge `i` joins vertices `i` and
    /// `i + 1`.
    pub fn edge_order_on_faces(&mut self) -> Result<(), HullError> {
        if self.state != HullState::Constructed {
            return Err(HullError::NotConstructed);
        }
        for f in 0..self.faces.len() {
            if self.faces[f].removed {
                continue;
            }
            let vertices = self.faces[f].vertices;
            let mut edges = self.faces[f].edges;
            for i in 0..3 {
                let (a, b) = (vertices[i], vertices[(i + 1) % 3]);
                let joins = |e: EdgeId| {
                    let [x, y] = self.edges[e].endpoints;
                    (x == a && y == b) || (x == b && y == a)
                };
                if !joins(edges[i]) {
                    if let Some(j) = (0..3).find(|&j| joins(edges[j])) {
                        edges.swap(i, j);
                    }
                }
            }
            self.faces[f].edges = edges;
        }
        self.state = HullState::Ordered;
        Ok(())
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id]
    }

    pub fn face_mut(&mut self, id: FaceId) -> &mut Face {
        &mut self.faces[id]
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).filter(|&v| !self.vertices[v].removed)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).filter(|&e| !self.edges[e].removed)
    }

    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).filter(|&f| !self.faces[f].removed)
    }

    pub fn num_vertices(&self) -> usize {
        self.vertex_ids().count()
    }

    pub fn num_edges(&self) -> usize {
        self.edge_ids().count()
    }

    pub fn num_faces(&self) -> usize {
        self.face_ids().count()
    }

    /// The vertex numbers of a face, in winding order.
    pub fn face_vertex_numbers(&self, f: FaceId) -> [usize; 3] {
        self.faces[f].vertices.map(|v| self.vertices[v].vnum)
    }

    pub fn face_positions(&self, f: FaceId) -> [TelescopeDirectionVector; 3] {
        self.faces[f].vertices.map(|v| self.vertices[v].position())
    }

    /// Does the face have a vertex with this number?
    pub fn face_has_vertex_number(&self, f: FaceId, vnum: usize) -> bool {
        self.face_vertex_numbers(f).contains(&vnum)
    }

    /// Find the first face hit by a ray from the origin along `direction`,
    /// ignoring faces that touch vertex number `ignored_vnum`.
    pub fn find_intersected_face(
        &self,
        direction: TelescopeDirectionVector,
        ignored_vnum: usize,
    ) -> Option<FaceId> {
        let ray = direction * RAY_SCALE_FACTOR;
        self.face_ids()
            .filter(|&f| !self.face_has_vertex_number(f, ignored_vnum))
            .find(|&f| {
                let [a, b, c] = self.face_positions(f);
                ray_triangle_intersection(&ray, &a, &b, &c)
            })
    }

    /// Check V - E + F = 2, as well as the relationships between the numbers
    /// of faces, edges and vertices of a closed triangulated surface.
    pub fn check_euler(&self) -> Result<(), HullError> {
        let (v, e, f) = (self.num_vertices(), self.num_edges(), self.num_faces());
        let (vi, ei, fi) = (v as isize, e as isize, f as isize);
        if vi - ei + fi != 2 || fi != 2 * vi - 4 || 2 * ei != 3 * fi {
            return Err(HullError::Euler {
                vertices: v,
                edges: e,
                faces: f,
            });
        }
        Ok(())
    }

    /// Check that every edge joins two faces that traverse it in opposite
    /// directions, and that every face's edges know about the face.
    pub fn consistency(&self) -> Result<(), HullError> {
        for e in self.edge_ids() {
            let edge = &self.edges[e];
            let [Some(f0), Some(f1)] = edge.adjface else {
                return Err(HullError::Inconsistent(format!(
                    "edge {e} doesn't have two adjacent faces"
                )));
            };
            if self.faces[f0].removed || self.faces[f1].removed {
                return Err(HullError::Inconsistent(format!(
                    "edge {e} is adjacent to a removed face"
                )));
            }
            let [a, b] = edge.endpoints;
            match (self.traverses(f0, a, b), self.traverses(f1, b, a)) {
                (true, true) => (),
                _ => match (self.traverses(f0, b, a), self.traverses(f1, a, b)) {
                    (true, true) => (),
                    _ => {
                        return Err(HullError::Inconsistent(format!(
                            "faces {f0} and {f1} don't traverse edge {e} in opposite directions"
                        )))
                    }
                },
            }
        }
        for f in self.face_ids() {
            for e in self.faces[f].edges {
                if self.edges[e].removed || !self.edges[e].adjface.contains(&Some(f)) {
                    return Err(HullError::Inconsistent(format!(
                        "face {f} lists edge {e}, which isn't adjacent to it"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Check that no vertex can see any face.
    pub fn convexity(&self) -> Result<(), HullError> {
        for f in self.face_ids() {
            for v in self.vertex_ids() {
                if self.faces[f].vertices.contains(&v) {
                    continue;
                }
                if self.volume_sign(f, v) == Ordering::Less {
                    return Err(HullError::NotConvex {
                        face: f,
                        vnum: self.vertices[v].vnum,
                    });
                }
            }
        }
        Ok(())
    }

    /// Write the hull as a Wavefront OBJ.
    pub fn write_obj<W: Write>(&self, mut w: W) -> Result<(), HullError> {
        let mut obj_index = vec![0; self.vertices.len()];
        for (i, v) in self.vertex_ids().enumerate() {
            let vertex = &self.vertices[v];
            let p = vertex.position();
            writeln!(w, "# vertex number {}", vertex.vnum)?;
            writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
            obj_index[v] = i + 1;
        }
        for f in self.face_ids() {
            let [a, b, c] = self.faces[f].vertices.map(|v| obj_index[v]);
            writeln!(w, "f {a} {b} {c}")?;
        }
        Ok(())
    }

    fn traverses(&self, f: FaceId, a: VertexId, b: VertexId) -> bool {
        let vertices = self.faces[f].vertices;
        (0..3).any(|i| vertices[i] == a && vertices[(i + 1) % 3] == b)
    }

    fn collinear(&self, a: VertexId, b: VertexId, c: VertexId) -> bool {
        let a = self.vertices[a].coords.map(i128::from);
        let b = self.vertices[b].coords.map(i128::from);
        let c = self.vertices[c].coords.map(i128::from);
        (c[2] - a[2]) * (b[1] - a[1]) - (b[2] - a[2]) * (c[1] - a[1]) == 0
            && (b[2] - a[2]) * (c[0] - a[0]) - (b[0] - a[0]) * (c[2] - a[2]) == 0
            && (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]) == 0
    }

    /// The sign of the volume of the tetrahedron made by face `f` and vertex
    /// `p`. `Less` means `p` can see the face.
    fn volume_sign(&self, f: FaceId, p: VertexId) -> Ordering {
        let [a, b, c] = self.faces[f]
            .vertices
            .map(|v| self.vertices[v].coords.map(i128::from));
        let d = self.vertices[p].coords.map(i128::from);

        let (ax, ay, az) = (a[0] - d[0], a[1] - d[1], a[2] - d[2]);
        let (bx, by, bz) = (b[0] - d[0], b[1] - d[1], b[2] - d[2]);
        let (cx, cy, cz) = (c[0] - d[0], c[1] - d[1], c[2] - d[2]);
        let volume =
            ax * (by * cz - bz * cy) + ay * (bz * cx - bx * cz) + az * (bx * cy - by * cx);
        volume.cmp(&0)
    }

    fn make_null_edge(&mut self) -> EdgeId {
        self.edges.push(Edge {
            endpoints: [0, 0],
            adjface: [None, None],
            newface: None,
            delete: false,
            removed: false,
        });
        self.edges.len() - 1
    }

    fn make_null_face(&mut self) -> FaceId {
        self.faces.push(Face {
            edges: [0; 3],
            vertices: [0; 3],
            visible: false,
            removed: false,
            matrix: Matrix3::IDENTITY,
        });
        self.faces.len() - 1
    }

    /// Make a face from three vertices. If `fold` is given, its edges are
    /// reused in reverse order.
    fn make_face(
        &mut self,
        v0: VertexId,
        v1: VertexId,
        v2: VertexId,
        fold: Option<FaceId>,
    ) -> FaceId {
        let (e0, e1, e2) = match fold {
            None => (
                self.make_null_edge(),
                self.make_null_edge(),
                self.make_null_edge(),
            ),
            Some(fold) => {
                let [a, b, c] = self.faces[fold].edges;
                (c, b, a)
            }
        };
        self.edges[e0].endpoints = [v0, v1];
        self.edges[e1].endpoints = [v1, v2];
        self.edges[e2].endpoints = [v2, v0];

        let f = self.make_null_face();
        self.faces[f].edges = [e0, e1, e2];
        self.faces[f].vertices = [v0, v1, v2];

        let side = usize::from(fold.is_some());
        for e in [e0, e1, e2] {
            self.edges[e].adjface[side] = Some(f);
        }
        f
    }

    fn is_visible(&self, f: Option<FaceId>) -> bool {
        f.map_or(false, |f| self.faces[f].visible)
    }

    /// Add vertex `p` to the hull. Returns false if `p` is inside it.
    fn add_one(&mut self, p: VertexId) -> bool {
        let mut any_visible = false;
        for f in 0..self.faces.len() {
            if self.faces[f].removed {
                continue;
            }
            if self.volume_sign(f, p) == Ordering::Less {
                self.faces[f].visible = true;
                any_visible = true;
            }
        }
        if !any_visible {
            self.vertices[p].on_hull = false;
            return false;
        }

        // Only the edges that existed before this vertex are considered.
        let num_edges = self.edges.len();
        for e in 0..num_edges {
            if self.edges[e].removed {
                continue;
            }
            let [f0, f1] = self.edges[e].adjface;
            match (self.is_visible(f0), self.is_visible(f1)) {
                // Interior to the visible region.
                (true, true) => self.edges[e].delete = true,
                // A horizon edge.
                (true, false) | (false, true) => {
                    let visible_face = if self.is_visible(f0) { f0 } else { f1 };
                    if let Some(visible_face) = visible_face {
                        let new_face = self.make_cone_face(e, p, visible_face);
                        self.edges[e].newface = Some(new_face);
                    }
                }
                (false, false) => (),
            }
        }
        true
    }

    /// Make a new face from edge `e` to vertex `p`, reusing the cone edges
    /// already made from either endpoint.
    fn make_cone_face(&mut self, e: EdgeId, p: VertexId, visible_face: FaceId) -> FaceId {
        let mut new_edges = [0; 2];
        for (i, new_edge) in new_edges.iter_mut().enumerate() {
            let d = self.edges[e].endpoints[i];
            *new_edge = match self.vertices[d].duplicate {
                Some(dup) => dup,
                None => {
                    let dup = self.make_null_edge();
                    self.edges[dup].endpoints = [d, p];
                    self.vertices[d].duplicate = Some(dup);
                    dup
                }
            };
        }

        let f = self.make_null_face();
        self.faces[f].edges = [e, new_edges[0], new_edges[1]];
        self.make_ccw(f, e, p, visible_face);

        for new_edge in new_edges {
            let adjface = &mut self.edges[new_edge].adjface;
            if adjface[0].is_none() {
                adjface[0] = Some(f);
            } else if adjface[1].is_none() {
                adjface[1] = Some(f);
            }
        }
        f
    }

    /// Give the new face `f` the same winding as the visible face it
    /// replaces on edge `e`.
    fn make_ccw(&mut self, f: FaceId, e: EdgeId, p: VertexId, visible_face: FaceId) {
        let [e0, e1] = self.edges[e].endpoints;
        let fv = self.faces[visible_face].vertices;
        let i = fv.iter().position(|&v| v == e0).unwrap_or(0);

        let face = &mut self.faces[f];
        if fv[(i + 1) % 3] != e1 {
            face.vertices = [e1, e0, p];
        } else {
            face.vertices = [e0, e1, p];
            face.edges.swap(1, 2);
        }
    }

    fn clean_up(&mut self) {
        self.clean_edges();
        self.clean_faces();
        self.clean_vertices();
    }

    fn clean_edges(&mut self) {
        for e in 0..self.edges.len() {
            if self.edges[e].removed {
                continue;
            }
            if let Some(new_face) = self.edges[e].newface.take() {
                let side = if self.is_visible(self.edges[e].adjface[0]) {
                    0
                } else {
                    1
                };
                self.edges[e].adjface[side] = Some(new_face);
            }
        }
        for edge in self.edges.iter_mut() {
            if edge.delete {
                edge.removed = true;
                edge.delete = false;
            }
        }
    }

    fn clean_faces(&mut self) {
        for face in self.faces.iter_mut() {
            if face.visible {
                face.removed = true;
                face.visible = false;
            }
        }
    }

    fn clean_vertices(&mut self) {
        for e in 0..self.edges.len() {
            if self.edges[e].removed {
                continue;
            }
            for v in self.edges[e].endpoints {
                self.vertices[v].on_hull = true;
            }
        }
        for vertex in self.vertices.iter_mut() {
            if vertex.processed && !vertex.on_hull {
                vertex.removed = true;
            }
            vertex.duplicate = None;
            vertex.on_hull = false;
        }
    }
}
