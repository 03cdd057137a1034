// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Shared test utilities for the integration tests.

#![allow(dead_code)]

use sweep_tess::{ElementType, Tessellator, WindingRule, TESS_UNDEF};

/// Signed area of a triangle (2D), positive when counter-clockwise.
pub fn triangle_area(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
    0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]))
}

/// Signed area of a simple polygon given as flat [x0, y0, x1, y1, ...].
pub fn polygon_signed_area(verts: &[f32]) -> f32 {
    let n = verts.len() / 2;
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0f32;
    for i in 0..n {
        let j = (i + 1) % n;
        area += verts[i * 2] * verts[j * 2 + 1];
        area -= verts[j * 2] * verts[i * 2 + 1];
    }
    area * 0.5
}

/// Output vertex `i` as an (x, y) pair, for any vertex size.
pub fn vertex(tess: &Tessellator, i: u32, vertex_size: usize) -> [f32; 2] {
    let base = i as usize * vertex_size;
    [tess.vertices()[base], tess.vertices()[base + 1]]
}

/// Triangles of a `Polygons` / poly_size 3 tessellation, as vertex coordinates.
pub fn triangles(tess: &Tessellator, vertex_size: usize) -> Vec<[[f32; 2]; 3]> {
    tess.elements()
        .chunks(3)
        .map(|tri| {
            [
                vertex(tess, tri[0], vertex_size),
                vertex(tess, tri[1], vertex_size),
                vertex(tess, tri[2], vertex_size),
            ]
        })
        .collect()
}

/// Total absolute area of all output triangles (2D output, poly_size 3).
pub fn total_tessellation_area(tess: &Tessellator) -> f32 {
    triangles(tess, 2)
        .iter()
        .map(|t| triangle_area(t[0], t[1], t[2]).abs())
        .sum()
}

/// Total signed area of all output triangles (2D output, poly_size 3).
pub fn total_tessellation_signed_area(tess: &Tessellator) -> f32 {
    triangles(tess, 2)
        .iter()
        .map(|t| triangle_area(t[0], t[1], t[2]))
        .sum()
}

/// Checks that every vertex is finite and every non-padding index is in range.
pub fn verify_valid_output(tess: &Tessellator) {
    for (i, &v) in tess.vertices().iter().enumerate() {
        assert!(v.is_finite(), "vertex component [{}] = {} is not finite", i, v);
    }
    for (i, &idx) in tess.elements().iter().enumerate() {
        if idx == TESS_UNDEF {
            continue;
        }
        assert!(
            (idx as usize) < tess.vertex_count(),
            "element[{}] = {} out of range (vertex_count={})",
            i,
            idx,
            tess.vertex_count()
        );
    }
}

/// Checks boundary output: `(start, count)` pairs that tile the vertex buffer in order.
pub fn verify_valid_contours(tess: &Tessellator) {
    for &v in tess.vertices() {
        assert!(v.is_finite(), "vertex component {} is not finite", v);
    }
    let mut next = 0;
    for (i, pair) in tess.elements().chunks(2).enumerate() {
        let (start, count) = (pair[0] as usize, pair[1] as usize);
        assert_eq!(start, next, "loop {} does not follow the previous one", i);
        assert!(count >= 3, "loop {} has only {} vertices", i, count);
        next = start + count;
    }
    assert_eq!(next, tess.vertex_count(), "loops do not cover every output vertex");
}

/// Asserts that no output triangle has an area at or below `epsilon`.
pub fn verify_no_degenerate_triangles(tess: &Tessellator, epsilon: f32) {
    for (i, t) in triangles(tess, 2).iter().enumerate() {
        let area = triangle_area(t[0], t[1], t[2]).abs();
        assert!(
            area > epsilon,
            "triangle {} is degenerate (area={}, vertices={:?})",
            i,
            area,
            t
        );
    }
}

/// Tessellates 2D contours into triangles, panicking on failure.
pub fn tessellate_contours(contours: &[Vec<f32>], winding_rule: WindingRule) -> Tessellator {
    let mut tess = Tessellator::new();
    for contour in contours {
        tess.add_contour(2, contour);
    }
    if let Err(err) = tess.tessellate(winding_rule, ElementType::Polygons, 3, 2, None) {
        panic!("tessellation failed for {:?}: {}", winding_rule, err);
    }
    tess
}

/// Triangles with their corners rotated to start at the smallest one, sorted, so
/// two tessellations of the same region can be compared.
pub fn canonical_triangles(tess: &Tessellator) -> Vec<[[i64; 2]; 3]> {
    let key = |p: [f32; 2]| [(p[0] * 1000.0).round() as i64, (p[1] * 1000.0).round() as i64];
    let mut tris: Vec<[[i64; 2]; 3]> = triangles(tess, 2)
        .into_iter()
        .map(|t| {
            let mut k = [key(t[0]), key(t[1]), key(t[2])];
            let first = (0..3).min_by_key(|&i| k[i]).unwrap_or(0);
            k.rotate_left(first);
            k
        })
        .collect();
    tris.sort();
    tris
}

pub fn assert_area_approx(actual: f32, expected: f32, tolerance: f32, label: &str) {
    assert!(
        (actual - expected).abs() < tolerance,
        "{}: expected area ~{}, got {} (diff={})",
        label,
        expected,
        actual,
        (actual - expected).abs()
    );
}
