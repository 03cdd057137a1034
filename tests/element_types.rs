// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

mod helpers;

use sweep_tess::{ElementType, Tessellator, WindingRule, TESS_UNDEF};

const SQUARE: [f32; 8] = [0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0];

fn run(contours: &[&[f32]], element_type: ElementType, poly_size: usize) -> Tessellator {
    let mut tess = Tessellator::new();
    for c in contours {
        tess.add_contour(2, c);
    }
    tess.tessellate(WindingRule::Odd, element_type, poly_size, 2, None)
        .unwrap();
    if element_type == ElementType::BoundaryContours {
        helpers::verify_valid_contours(&tess);
    } else {
        helpers::verify_valid_output(&tess);
    }
    tess
}

fn regular_polygon(n: usize, radius: f32) -> Vec<f32> {
    (0..n)
        .flat_map(|i| {
            let a = i as f32 * std::f32::consts::TAU / n as f32;
            [radius * a.cos(), radius * a.sin()]
        })
        .collect()
}

#[test]
fn quads_merge_a_square_into_one_element() {
    let tess = run(&[&SQUARE], ElementType::Polygons, 4);
    assert_eq!(tess.element_count(), 1);
    assert_eq!(tess.elements().len(), 4);
    assert!(tess.elements().iter().all(|&i| i != TESS_UNDEF));
}

#[test]
fn hexagon_fits_one_six_sided_element() {
    let hex = regular_polygon(6, 5.0);
    let tess = run(&[&hex], ElementType::Polygons, 6);
    assert_eq!(tess.element_count(), 1);
    assert_eq!(tess.vertex_count(), 6);
}

#[test]
fn triangles_are_padded_when_poly_size_is_larger() {
    let tri = [0.0, 0.0, 4.0, 0.0, 0.0, 4.0];
    let tess = run(&[&tri], ElementType::Polygons, 5);
    assert_eq!(tess.element_count(), 1);
    let elems = tess.elements();
    assert_eq!(elems.len(), 5);
    assert!(elems[..3].iter().all(|&i| i != TESS_UNDEF));
    assert_eq!(&elems[3..], &[TESS_UNDEF, TESS_UNDEF]);
}

#[test]
fn merged_polygons_stay_convex() {
    // An L shape cannot become one convex polygon, however large poly_size is.
    let ell = [0.0, 0.0, 4.0, 0.0, 4.0, 2.0, 2.0, 2.0, 2.0, 4.0, 0.0, 4.0];
    let tess = run(&[&ell], ElementType::Polygons, 8);
    assert!(tess.element_count() >= 2);
    for poly in tess.elements().chunks(8) {
        let pts: Vec<[f32; 2]> = poly
            .iter()
            .take_while(|&&i| i != TESS_UNDEF)
            .map(|&i| helpers::vertex(&tess, i, 2))
            .collect();
        for k in 0..pts.len() {
            let (a, b, c) = (pts[k], pts[(k + 1) % pts.len()], pts[(k + 2) % pts.len()]);
            assert!(helpers::triangle_area(a, b, c) >= 0.0, "reflex corner in {:?}", pts);
        }
    }
}

#[test]
fn connected_neighbours_are_symmetric() {
    let hex = regular_polygon(6, 5.0);
    let tess = run(&[&hex], ElementType::ConnectedPolygons, 3);
    let n = tess.element_count();
    assert_eq!(n, 4);
    let elems = tess.elements();
    assert_eq!(elems.len(), n * 6);

    let mut shared_edges = 0;
    for i in 0..n {
        let neighbours = &elems[i * 6 + 3..i * 6 + 6];
        for &j in neighbours {
            if j == TESS_UNDEF {
                continue;
            }
            shared_edges += 1;
            assert!((j as usize) < n);
            let back = &elems[j as usize * 6 + 3..j as usize * 6 + 6];
            assert!(back.contains(&(i as u32)), "{} -> {} has no way back", i, j);
        }
    }
    // Three interior diagonals, each seen from both sides.
    assert_eq!(shared_edges, 6);
}

#[test]
fn connected_neighbour_shares_the_edge_vertices() {
    let tess = run(&[&SQUARE], ElementType::ConnectedPolygons, 3);
    let elems = tess.elements();
    assert_eq!(tess.element_count(), 2);
    for i in 0..2 {
        let verts = &elems[i * 6..i * 6 + 3];
        for k in 0..3 {
            let nb = elems[i * 6 + 3 + k];
            if nb == TESS_UNDEF {
                continue;
            }
            let other = &elems[nb as usize * 6..nb as usize * 6 + 3];
            assert!(other.contains(&verts[k]));
            assert!(other.contains(&verts[(k + 1) % 3]));
        }
    }
}

#[test]
fn boundary_of_a_square_is_one_loop() {
    let tess = run(&[&SQUARE], ElementType::BoundaryContours, 3);
    assert_eq!(tess.element_count(), 1);
    assert_eq!(tess.elements(), &[0, 4]);
    assert_eq!(tess.vertex_count(), 4);
    helpers::assert_area_approx(helpers::polygon_signed_area(tess.vertices()), 100.0, 1e-3, "loop");
}

#[test]
fn boundary_ignores_poly_size() {
    let mut tess = Tessellator::new();
    tess.add_contour(2, &SQUARE);
    tess.tessellate(WindingRule::Odd, ElementType::BoundaryContours, 0, 2, None)
        .unwrap();
    assert_eq!(tess.element_count(), 1);
}

#[test]
fn boundary_merges_overlapping_contours() {
    let a = [0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0];
    let b = [2.0, 2.0, 6.0, 2.0, 6.0, 6.0, 2.0, 6.0];
    let mut tess = Tessellator::new();
    tess.add_contour(2, &a);
    tess.add_contour(2, &b);
    tess.tessellate(WindingRule::NonZero, ElementType::BoundaryContours, 3, 2, None)
        .unwrap();
    assert_eq!(tess.element_count(), 1);
    // Union outline: six corners plus the two crossings.
    assert_eq!(tess.elements()[1], 8);
    helpers::assert_area_approx(helpers::polygon_signed_area(tess.vertices()), 28.0, 1e-3, "union");
}
