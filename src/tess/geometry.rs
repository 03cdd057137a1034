// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Projection of the input vertices onto the sweep plane.

use crate::geom::{Real, SweepPoint};
use crate::mesh::{Mesh, F_HEAD};

const MAX_VALID_COORD: Real = (1u32 << 23) as Real;
const MIN_VALID_COORD: Real = -MAX_VALID_COORD;

/// Result of [`project_polygon`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct Projection {
    pub normal: [Real; 3],
    pub bmin: SweepPoint,
    pub bmax: SweepPoint,
}

pub(crate) fn is_valid_coord(c: Real) -> bool {
    (MIN_VALID_COORD..=MAX_VALID_COORD).contains(&c)
}

fn dot(u: &[Real; 3], v: &[Real; 3]) -> Real {
    u[0] * v[0] + u[1] * v[1] + u[2] * v[2]
}

fn long_axis(v: &[Real; 3]) -> usize {
    let mut i = 0;
    if v[1].abs() > v[0].abs() {
        i = 1;
    }
    if v[2].abs() > v[i].abs() {
        i = 2;
    }
    i
}

fn short_axis(v: &[Real; 3]) -> usize {
    let mut i = 0;
    if v[1].abs() < v[0].abs() {
        i = 1;
    }
    if v[2].abs() < v[i].abs() {
        i = 2;
    }
    i
}

fn sub(a: &[Real; 3], b: &[Real; 3]) -> [Real; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Estimates a plane normal for the input.
///
/// Takes the two extreme vertices along the axis of largest extent and picks the
/// third vertex that maximises the cross product with them. Collinear input falls
/// back to the axis least aligned with the line; empty or single-point input gets
/// +Z.
pub(crate) fn compute_normal(mesh: &Mesh) -> [Real; 3] {
    let mut ids = mesh.vertex_ids();
    let first = match ids.next() {
        Some(v) => v,
        None => return [0.0, 0.0, 1.0],
    };

    let first_coords = mesh.verts[first as usize].coords;
    let mut min_val = first_coords;
    let mut max_val = first_coords;
    let mut min_vert = [first; 3];
    let mut max_vert = [first; 3];
    for v in mesh.vertex_ids() {
        let c = mesh.verts[v as usize].coords;
        for i in 0..3 {
            if c[i] < min_val[i] {
                min_val[i] = c[i];
                min_vert[i] = v;
            }
            if c[i] > max_val[i] {
                max_val[i] = c[i];
                max_vert[i] = v;
            }
        }
    }

    let mut i = 0;
    if max_val[1] - min_val[1] > max_val[0] - min_val[0] {
        i = 1;
    }
    if max_val[2] - min_val[2] > max_val[i] - min_val[i] {
        i = 2;
    }
    if min_val[i] >= max_val[i] {
        // All points coincide.
        return [0.0, 0.0, 1.0];
    }

    let v2 = mesh.verts[max_vert[i] as usize].coords;
    let d1 = sub(&mesh.verts[min_vert[i] as usize].coords, &v2);
    let mut norm = [0.0; 3];
    let mut max_len2 = 0.0;
    for v in mesh.vertex_ids() {
        let d2 = sub(&mesh.verts[v as usize].coords, &v2);
        let tn = [
            d1[1] * d2[2] - d1[2] * d2[1],
            d1[2] * d2[0] - d1[0] * d2[2],
            d1[0] * d2[1] - d1[1] * d2[0],
        ];
        let tl2 = dot(&tn, &tn);
        if tl2 > max_len2 {
            max_len2 = tl2;
            norm = tn;
        }
    }

    if max_len2 <= 0.0 {
        // Collinear: any normal perpendicular to the line will do.
        norm = [0.0; 3];
        norm[short_axis(&d1)] = 1.0;
    }
    norm
}

/// Flips t for every vertex if the positively wound contours have negative total
/// area, so a computed normal always yields counter-clockwise outer contours.
fn check_orientation(mesh: &mut Mesh) {
    let mut area = 0.0;
    let mut f = mesh.faces[F_HEAD as usize].next;
    while f != F_HEAD {
        let start = mesh.faces[f as usize].an_edge;
        if mesh.winding(start) > 0 {
            let mut e = start;
            loop {
                let (o, d) = (mesh.org_point(e), mesh.dst_point(e));
                area += (o.s - d.s) * (o.t + d.t);
                e = mesh.lnext(e);
                if e == start {
                    break;
                }
            }
        }
        f = mesh.faces[f as usize].next;
    }
    if area < 0.0 {
        let verts: Vec<_> = mesh.vertex_ids().collect();
        for v in verts {
            let t = &mut mesh.verts[v as usize].t;
            *t = -*t;
        }
    }
}

/// Projects every vertex onto the plane perpendicular to the normal's dominant
/// axis, writing `s`/`t`, and returns the normal used and the bounds in (s, t).
///
/// A zero or missing hint means the normal is computed, in which case the
/// orientation is also normalised by [`check_orientation`].
pub(crate) fn project_polygon(mesh: &mut Mesh, normal_hint: Option<[Real; 3]>) -> Projection {
    let (norm, computed) = match normal_hint {
        Some(n) if n != [0.0; 3] => (n, false),
        _ => (compute_normal(mesh), true),
    };

    let i = long_axis(&norm);
    let mut s_unit = [0.0; 3];
    let mut t_unit = [0.0; 3];
    s_unit[(i + 1) % 3] = 1.0;
    t_unit[(i + 2) % 3] = if norm[i] > 0.0 { 1.0 } else { -1.0 };

    let verts: Vec<_> = mesh.vertex_ids().collect();
    for &v in &verts {
        let vert = &mut mesh.verts[v as usize];
        vert.s = dot(&vert.coords, &s_unit);
        vert.t = dot(&vert.coords, &t_unit);
    }
    if computed {
        check_orientation(mesh);
    }

    let mut points = verts.iter().map(|&v| mesh.point(v));
    let (bmin, bmax) = match points.next() {
        Some(p) => points.fold((p, p), |(lo, hi), p| {
            (
                SweepPoint::new(lo.s.min(p.s), lo.t.min(p.t)),
                SweepPoint::new(hi.s.max(p.s), hi.t.max(p.t)),
            )
        }),
        None => (SweepPoint::new(0.0, 0.0), SweepPoint::new(0.0, 0.0)),
    };

    Projection {
        normal: norm,
        bmin,
        bmax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{sym, INVALID};
    use approx::assert_abs_diff_eq;

    fn contour(mesh: &mut Mesh, points: &[[Real; 3]]) {
        let mut e = INVALID;
        for p in points {
            if e == INVALID {
                e = mesh.make_edge();
                mesh.splice(e, sym(e));
            } else {
                mesh.split_edge(e);
                e = mesh.lnext(e);
            }
            let v = mesh.org(e) as usize;
            mesh.verts[v].coords = *p;
            mesh.edges[e as usize].winding = 1;
            mesh.edges[sym(e) as usize].winding = -1;
        }
    }

    #[test]
    fn valid_coord_range() {
        assert!(is_valid_coord(0.0));
        assert!(is_valid_coord(MAX_VALID_COORD));
        assert!(!is_valid_coord(MAX_VALID_COORD * 2.0));
        assert!(!is_valid_coord(Real::NAN));
        assert!(!is_valid_coord(Real::NEG_INFINITY));
    }

    #[test]
    fn empty_mesh_normal_is_z() {
        assert_eq!(compute_normal(&Mesh::new()), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn xz_plane_normal_is_along_y() {
        let mut mesh = Mesh::new();
        contour(&mut mesh, &[[0.0, 2.0, 0.0], [1.0, 2.0, 0.0], [1.0, 2.0, 1.0], [0.0, 2.0, 1.0]]);
        let n = compute_normal(&mesh);
        assert_eq!(long_axis(&n), 1);
        assert_abs_diff_eq!(n[0], 0.0);
        assert_abs_diff_eq!(n[2], 0.0);
    }

    #[test]
    fn collinear_points_still_get_a_normal() {
        let mut mesh = Mesh::new();
        contour(&mut mesh, &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        let n = compute_normal(&mesh);
        assert_eq!(dot(&n, &n), 1.0);
        assert_eq!(n[0], 0.0);
    }

    /// Signed (s, t) area of the loops carrying positive winding.
    fn positive_loop_area(mesh: &Mesh) -> Real {
        let mut area = 0.0;
        for f in mesh.face_ids() {
            let start = mesh.faces[f as usize].an_edge;
            if mesh.winding(start) <= 0 {
                continue;
            }
            let mut e = start;
            loop {
                let (o, d) = (mesh.org_point(e), mesh.dst_point(e));
                area += 0.5 * (o.s * d.t - d.s * o.t);
                e = mesh.lnext(e);
                if e == start {
                    break;
                }
            }
        }
        area
    }

    #[test]
    fn computed_normal_makes_the_contour_counter_clockwise() {
        let clockwise = [[0.0, 0.0, 0.0], [0.0, 4.0, 0.0], [4.0, 4.0, 0.0], [4.0, 0.0, 0.0]];
        let counter = [[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [4.0, 4.0, 0.0], [0.0, 4.0, 0.0]];
        for points in [clockwise, counter] {
            let mut mesh = Mesh::new();
            contour(&mut mesh, &points);
            let proj = project_polygon(&mut mesh, None);
            assert_eq!(long_axis(&proj.normal), 2);
            assert_abs_diff_eq!(positive_loop_area(&mesh), 16.0, epsilon = 1e-4);
            assert_abs_diff_eq!(proj.bmax.s - proj.bmin.s, 4.0);
            assert_abs_diff_eq!(proj.bmax.t - proj.bmin.t, 4.0);
        }
    }

    #[test]
    fn hint_is_used_verbatim() {
        let mut mesh = Mesh::new();
        contour(&mut mesh, &[[0.0, 0.0, 0.0], [0.0, 4.0, 0.0], [4.0, 4.0, 0.0], [4.0, 0.0, 0.0]]);
        let proj = project_polygon(&mut mesh, Some([0.0, 0.0, 1.0]));
        assert_eq!(proj.normal, [0.0, 0.0, 1.0]);
        assert_abs_diff_eq!(proj.bmin.t, 0.0);
        assert_abs_diff_eq!(proj.bmax.t, 4.0);
    }
}
