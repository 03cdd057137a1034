// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Sweep-plane predicates.
//
// Every function here works on projected (s, t) coordinates. The sweep runs
// in increasing s; ties are broken by t. The "transposed" variants swap the
// roles of s and t and are only used to compute the t-coordinate of an
// intersection.

pub type Real = f32;

/// A point in sweep-plane coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SweepPoint {
    pub s: Real,
    pub t: Real,
}

impl SweepPoint {
    #[inline]
    pub const fn new(s: Real, t: Real) -> Self {
        SweepPoint { s, t }
    }

    /// The same point with s and t swapped.
    #[inline]
    pub const fn transposed(self) -> Self {
        SweepPoint { s: self.t, t: self.s }
    }
}

/// Lexicographic sweep order: `u.s < v.s`, or equal s and `u.t <= v.t`.
#[inline]
pub fn lex_leq(u: SweepPoint, v: SweepPoint) -> bool {
    u.s < v.s || (u.s == v.s && u.t <= v.t)
}

#[inline]
pub fn lex_eq(u: SweepPoint, v: SweepPoint) -> bool {
    u.s == v.s && u.t == v.t
}

/// Lexicographic order with t compared first.
#[inline]
pub fn trans_leq(u: SweepPoint, v: SweepPoint) -> bool {
    lex_leq(u.transposed(), v.transposed())
}

/// For `u <= v <= w` in sweep order, evaluates edge `uw` at `v.s` and returns
/// `v.t - uw(v.s)`: the signed vertical offset of `v` from the edge.
///
/// Exactly zero when `uw` is vertical. The interpolation is anchored at the
/// nearer endpoint, so the implied edge value always lies between `u.t` and `w.t`.
pub fn orient_eval(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> Real {
    debug_assert!(lex_leq(u, v) && lex_leq(v, w));
    let gap_l = v.s - u.s;
    let gap_r = w.s - v.s;
    if gap_l + gap_r <= 0.0 {
        return 0.0;
    }
    if gap_l < gap_r {
        (v.t - u.t) + (u.t - w.t) * (gap_l / (gap_l + gap_r))
    } else {
        (v.t - w.t) + (w.t - u.t) * (gap_r / (gap_l + gap_r))
    }
}

/// Same sign as [`orient_eval`] (above, on, below the edge `uw`) without the division.
pub fn orient_sign(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> Real {
    debug_assert!(lex_leq(u, v) && lex_leq(v, w));
    let gap_l = v.s - u.s;
    let gap_r = w.s - v.s;
    if gap_l + gap_r > 0.0 {
        (v.t - w.t) * gap_l + (v.t - u.t) * gap_r
    } else {
        0.0
    }
}

/// [`orient_eval`] with s and t swapped.
#[inline]
pub fn trans_eval(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> Real {
    orient_eval(u.transposed(), v.transposed(), w.transposed())
}

/// [`orient_sign`] with s and t swapped.
#[inline]
pub fn trans_sign(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> Real {
    orient_sign(u.transposed(), v.transposed(), w.transposed())
}

/// Counter-clockwise (or collinear) turn test. Not reliable on near-degenerate input;
/// only the convex-merge pass uses it.
#[inline]
pub fn ccw(u: SweepPoint, v: SweepPoint, w: SweepPoint) -> bool {
    u.s * (v.t - w.t) + v.s * (w.t - u.t) + w.s * (u.t - v.t) >= 0.0
}

#[inline]
pub fn l1_dist(u: SweepPoint, v: SweepPoint) -> Real {
    (u.s - v.s).abs() + (u.t - v.t).abs()
}

/// Returns `(b*x + a*y) / (a + b)`, or the midpoint when both weights are zero.
/// Negative weights are clamped to zero, so the result always lies in `[min(x,y), max(x,y)]`.
#[inline]
pub fn weighted_blend(a: Real, x: Real, b: Real, y: Real) -> Real {
    let a = a.max(0.0);
    let b = b.max(0.0);
    if a <= b {
        if b == 0.0 {
            x / 2.0 + y / 2.0
        } else {
            x + (y - x) * (a / (a + b))
        }
    } else {
        y + (x - y) * (b / (a + b))
    }
}

/// One of the two orders used by [`intersect_segments`]: the sweep order for the
/// s-coordinate, the transposed order for the t-coordinate.
struct Order {
    leq: fn(SweepPoint, SweepPoint) -> bool,
    eval: fn(SweepPoint, SweepPoint, SweepPoint) -> Real,
    sign: fn(SweepPoint, SweepPoint, SweepPoint) -> Real,
    coord: fn(SweepPoint) -> Real,
}

const SWEEP_ORDER: Order = Order {
    leq: lex_leq,
    eval: orient_eval,
    sign: orient_sign,
    coord: s_of,
};

const TRANSPOSED_ORDER: Order = Order {
    leq: trans_leq,
    eval: trans_eval,
    sign: trans_sign,
    coord: t_of,
};

fn s_of(p: SweepPoint) -> Real {
    p.s
}

fn t_of(p: SweepPoint) -> Real {
    p.t
}

/// Intersection of segments `(o1, d1)` and `(o2, d2)`.
///
/// The s-coordinate is interpolated from the two middle endpoints in sweep order and
/// the t-coordinate from the two middle endpoints in transposed order. The result is
/// always inside the intersection of the two bounding boxes, even for near-parallel
/// or barely overlapping segments.
pub fn intersect_segments(
    o1: SweepPoint,
    d1: SweepPoint,
    o2: SweepPoint,
    d2: SweepPoint,
) -> SweepPoint {
    let s = middle_coordinate(&SWEEP_ORDER, o1, d1, o2, d2);
    let t = middle_coordinate(&TRANSPOSED_ORDER, o1, d1, o2, d2);
    SweepPoint::new(s, t)
}

// Crossing coordinate along `order`, interpolated between the two middle endpoints.
fn middle_coordinate(
    order: &Order,
    mut o1: SweepPoint,
    mut d1: SweepPoint,
    mut o2: SweepPoint,
    mut d2: SweepPoint,
) -> Real {
    let leq = order.leq;
    let coord = order.coord;
    if !leq(o1, d1) {
        std::mem::swap(&mut o1, &mut d1);
    }
    if !leq(o2, d2) {
        std::mem::swap(&mut o2, &mut d2);
    }
    if !leq(o1, o2) {
        std::mem::swap(&mut o1, &mut o2);
        std::mem::swap(&mut d1, &mut d2);
    }

    if !leq(o2, d1) {
        // No overlap: split the gap.
        return coord(o2) / 2.0 + coord(d1) / 2.0;
    }

    let (mut z1, mut z2, far) = if leq(d1, d2) {
        // o1 <= o2 <= d1 <= d2
        ((order.eval)(o1, o2, d1), (order.eval)(o2, d1, d2), d1)
    } else {
        // o1 <= o2 <= d2 <= d1
        ((order.sign)(o1, o2, d1), -(order.sign)(o1, d2, d1), d2)
    };
    if z1 + z2 < 0.0 {
        z1 = -z1;
        z2 = -z2;
    }
    weighted_blend(z1, coord(o2), z2, coord(far))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn p(s: Real, t: Real) -> SweepPoint {
        SweepPoint::new(s, t)
    }

    #[test]
    fn lex_leq_orders_by_s_then_t() {
        assert!(lex_leq(p(0.0, 5.0), p(1.0, 0.0)));
        assert!(lex_leq(p(0.0, 0.0), p(0.0, 1.0)));
        assert!(lex_leq(p(2.0, 2.0), p(2.0, 2.0)));
        assert!(!lex_leq(p(1.0, 0.0), p(0.0, 9.0)));
        assert!(!lex_leq(p(0.0, 1.0), p(0.0, 0.0)));
    }

    #[test]
    fn trans_leq_orders_by_t_then_s() {
        assert!(trans_leq(p(5.0, 0.0), p(0.0, 1.0)));
        assert!(trans_leq(p(0.0, 0.0), p(1.0, 0.0)));
        assert!(!trans_leq(p(0.0, 1.0), p(9.0, 0.0)));
    }

    #[test]
    fn orient_eval_reports_offset_from_edge() {
        let r = orient_eval(p(0.0, 0.0), p(0.5, 1.0), p(1.0, 0.0));
        assert_abs_diff_eq!(r, 1.0, epsilon = 1e-6);
        let r = orient_eval(p(0.0, 0.0), p(1.0, -2.0), p(4.0, 4.0));
        assert_abs_diff_eq!(r, -3.0, epsilon = 1e-6);
    }

    #[test]
    fn vertical_edge_evaluates_to_zero() {
        assert_eq!(orient_eval(p(0.0, 0.0), p(0.0, 0.5), p(0.0, 1.0)), 0.0);
        assert_eq!(orient_sign(p(3.0, -1.0), p(3.0, 0.0), p(3.0, 7.0)), 0.0);
    }

    #[test]
    fn orient_sign_matches_orient_eval() {
        let cases = [
            (p(0.0, 0.0), p(0.5, 1.0), p(1.0, 0.0)),
            (p(0.0, 0.0), p(0.1, -1.0), p(3.0, 0.5)),
            (p(-2.0, 1.0), p(0.0, 0.0), p(2.0, -1.0)),
        ];
        for (u, v, w) in cases {
            let eval = orient_eval(u, v, w);
            let sign = orient_sign(u, v, w);
            assert_eq!(eval > 0.0, sign > 0.0);
            assert_eq!(eval < 0.0, sign < 0.0);
        }
    }

    #[test]
    fn transposed_variants_swap_axes() {
        let (u, v, w) = (p(0.0, 0.0), p(1.0, 0.5), p(0.0, 1.0));
        assert_abs_diff_eq!(trans_eval(u, v, w), 1.0, epsilon = 1e-6);
        assert!(trans_sign(u, v, w) > 0.0);
    }

    #[test]
    fn ccw_detects_turn_direction() {
        assert!(ccw(p(0.0, 0.0), p(1.0, 0.0), p(0.5, 1.0)));
        assert!(!ccw(p(0.0, 0.0), p(0.5, 1.0), p(1.0, 0.0)));
    }

    #[test]
    fn weighted_blend_clamps_and_collapses() {
        assert_abs_diff_eq!(weighted_blend(0.0, 0.0, 0.0, 1.0), 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(weighted_blend(1.0, 0.0, 1.0, 2.0), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(weighted_blend(-1.0, 4.0, 1.0, 8.0), 4.0, epsilon = 1e-6);
        assert_abs_diff_eq!(weighted_blend(3.0, 0.0, 1.0, 4.0), 3.0, epsilon = 1e-6);
    }

    #[test]
    fn crossing_segments_meet_at_center() {
        let x = intersect_segments(p(0.0, 0.0), p(10.0, 10.0), p(10.0, 0.0), p(0.0, 10.0));
        assert_abs_diff_eq!(x.s, 5.0, epsilon = 1e-4);
        assert_abs_diff_eq!(x.t, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn steep_crossing_takes_t_from_the_transposed_order() {
        // t = 50 s meets t = 50 - 25 s at s = 2/3.
        let x = intersect_segments(p(0.0, 0.0), p(2.0, 100.0), p(2.0, 0.0), p(0.0, 50.0));
        assert_abs_diff_eq!(x.s, 2.0 / 3.0, epsilon = 1e-4);
        assert_abs_diff_eq!(x.t, 100.0 / 3.0, epsilon = 1e-3);
        // Swapping the roles of the segments and their ends changes nothing.
        let y = intersect_segments(p(0.0, 50.0), p(2.0, 0.0), p(2.0, 100.0), p(0.0, 0.0));
        assert_abs_diff_eq!(x.s, y.s, epsilon = 1e-5);
        assert_abs_diff_eq!(x.t, y.t, epsilon = 1e-4);
    }

    #[test]
    fn intersection_stays_inside_both_boxes() {
        // Nearly parallel segments.
        let (o1, d1) = (p(0.0, 0.0), p(100.0, 1.0));
        let (o2, d2) = (p(0.0, 0.001), p(100.0, 0.999));
        let x = intersect_segments(o1, d1, o2, d2);
        for (a, b) in [(o1, d1), (o2, d2)] {
            assert!(x.s >= a.s.min(b.s) && x.s <= a.s.max(b.s), "s={} outside", x.s);
            assert!(x.t >= a.t.min(b.t) && x.t <= a.t.max(b.t), "t={} outside", x.t);
        }
    }
}
