//! The tolerance tower and the polynomial root solvers used by the curve
//! code.
//!
//! The constants are chosen for the stability of cubic bézier work and are
//! deliberately not configurable: every algorithm in the workspace assumes
//! the same tower.

use arrayvec::ArrayVec;

/// Tolerance on values that are compared against exact quantities.
pub const EPSILON: f64 = 1e-12;

/// The smallest representable relative rounding error.
pub const MACHINE_EPSILON: f64 = 1.12e-16;

/// Tolerance on curve-time parameters (`t` values in `[0, 1]`).
pub const CURVETIME_EPSILON: f64 = 1e-8;

/// Tolerance on spatial distances.
pub const GEOMETRIC_EPSILON: f64 = 2e-7;

/// Tolerance on trigonometric quantities (normalized cross products).
pub const TRIGONOMETRIC_EPSILON: f64 = 1e-8;

/// Tolerance on angles in radians.
pub const ANGULAR_EPSILON: f64 = 1e-5;

/// Length of the handles of a cubic bézier approximating a quarter circle
/// of radius one: `4/3 * (sqrt(2) - 1)`.
pub const KAPPA: f64 = 0.552_284_749_830_793_6;

/// Convergence threshold of the fat-line clipping loop.
pub const CLIPPING_EPSILON: f64 = 1e-9;

/// Maximum recursion depth of the fat-line clipping loop.
pub const RECURSION_LIMIT: u32 = 40;

/// Maximum total number of clipping calls for one curve pair.
pub const CALL_LIMIT: u32 = 4096;

#[inline]
pub fn is_zero(v: f64) -> bool {
    v >= -EPSILON && v <= EPSILON
}

#[inline]
pub fn is_machine_zero(v: f64) -> bool {
    v >= -MACHINE_EPSILON && v <= MACHINE_EPSILON
}

#[inline]
pub fn clamp(v: f64, min: f64, max: f64) -> f64 {
    if v < min {
        min
    } else if v > max {
        max
    } else {
        v
    }
}

// Accept a root when it lies within EPSILON of the requested range, clamped
// into the range. Roots are never duplicated by the solvers below, so a
// plain push is enough.
fn push_root<const N: usize>(roots: &mut ArrayVec<f64, N>, root: f64, range: Option<(f64, f64)>) {
    if roots.is_full() {
        return;
    }
    match range {
        None => roots.push(root),
        Some((min, max)) => {
            if root > min - EPSILON && root < max + EPSILON {
                roots.push(clamp(root, min, max));
            }
        }
    }
}

/// Solve `a·x² + b·x + c = 0`.
///
/// When a range is provided, roots within `[min - EPSILON, max + EPSILON]`
/// are clamped into `[min, max]` and roots outside are dropped. A
/// discriminant within `EPSILON` of zero yields the double root once.
pub fn solve_quadratic(a: f64, b: f64, c: f64, range: Option<(f64, f64)>) -> ArrayVec<f64, 2> {
    let mut roots = ArrayVec::new();

    if a.abs() < EPSILON {
        // Linear equation.
        if b.abs() >= EPSILON {
            push_root(&mut roots, -c / b, range);
        }
        return roots;
    }

    let delta = b * b - 4.0 * a * c;
    if delta.abs() < EPSILON {
        push_root(&mut roots, -b / (2.0 * a), range);
    } else if delta > 0.0 {
        let sqrt_delta = delta.sqrt();
        push_root(&mut roots, (-b - sqrt_delta) / (2.0 * a), range);
        push_root(&mut roots, (-b + sqrt_delta) / (2.0 * a), range);
    }

    roots
}

/// Solve `a·x³ + b·x² + c·x + d = 0`.
///
/// Degrades to [`solve_quadratic`] when `|a| < EPSILON`. Three real roots
/// are computed with the trigonometric method, the remaining cases with
/// Cardano's formula. Range handling is as in [`solve_quadratic`].
pub fn solve_cubic(
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    range: Option<(f64, f64)>,
) -> ArrayVec<f64, 3> {
    let mut roots = ArrayVec::new();

    if a.abs() < EPSILON {
        for root in solve_quadratic(b, c, d, range) {
            roots.push(root);
        }
        return roots;
    }

    let frac_1_3 = 1.0 / 3.0;

    let bn = b / a;
    let cn = c / a;
    let dn = d / a;

    let delta0 = (3.0 * cn - bn * bn) / 9.0;
    let delta1 = (9.0 * bn * cn - 27.0 * dn - 2.0 * bn * bn * bn) / 54.0;
    let discriminant = delta0 * delta0 * delta0 + delta1 * delta1;

    if discriminant >= 0.0 {
        let delta_p_sqrt = delta1 + discriminant.sqrt();
        let delta_m_sqrt = delta1 - discriminant.sqrt();

        let s = delta_p_sqrt.signum() * delta_p_sqrt.abs().powf(frac_1_3);
        let t = delta_m_sqrt.signum() * delta_m_sqrt.abs().powf(frac_1_3);

        push_root(&mut roots, -bn * frac_1_3 + (s + t), range);

        // A discriminant within EPSILON of zero means s == t and the cubic
        // has a double root next to the simple one. Don't report it when it
        // coincides with the simple root (s + t == 0, triple root).
        if (s - t).abs() < EPSILON && (s + t).abs() >= EPSILON {
            push_root(&mut roots, -bn * frac_1_3 - (s + t) * 0.5, range);
        }
    } else {
        // Three distinct real roots.
        let theta = (delta1 / (-delta0 * delta0 * delta0).sqrt()).acos();
        let two_sqrt_delta0 = 2.0 * (-delta0).sqrt();
        for k in 0..3 {
            let angle = (theta + 2.0 * core::f64::consts::PI * k as f64) * frac_1_3;
            push_root(&mut roots, two_sqrt_delta0 * angle.cos() - bn * frac_1_3, range);
        }
    }

    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx_eq<const N: usize>(a: ArrayVec<f64, N>, b: &[f64], epsilon: f64) {
        let mut a: Vec<f64> = a.iter().cloned().collect();
        a.sort_by(|x, y| x.partial_cmp(y).unwrap());
        let mut b: Vec<f64> = b.to_vec();
        b.sort_by(|x, y| x.partial_cmp(y).unwrap());
        assert_eq!(a.len(), b.len(), "{:?} != {:?}", a, b);
        for i in 0..a.len() {
            assert!((a[i] - b[i]).abs() <= epsilon, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn cubic_roots() {
        assert_approx_eq(solve_cubic(2.0, -4.0, 2.0, 0.0, None), &[0.0, 1.0], 1e-7);
        assert_approx_eq(solve_cubic(-1.0, 1.0, -1.0, 1.0, None), &[1.0], 1e-6);
        assert_approx_eq(solve_cubic(-2.0, 2.0, -1.0, 10.0, None), &[2.0], 5e-5);
        // (x - 1)^3, a triple root, is reported once.
        assert_approx_eq(solve_cubic(1.0, -3.0, 3.0, -1.0, None), &[1.0], 5e-5);
        // (x - 1)^2 (x + 2), a double root next to a simple one.
        assert_approx_eq(solve_cubic(1.0, 0.0, -3.0, 2.0, None), &[-2.0, 1.0], 5e-5);
    }

    #[test]
    fn quadratic_roots() {
        assert_approx_eq(solve_cubic(0.0, 1.0, -5.0, -14.0, None), &[-2.0, 7.0], 5e-5);
        // (x - 3)^2, a double root, is reported once.
        assert_approx_eq(solve_cubic(0.0, 1.0, -6.0, 9.0, None), &[3.0], 5e-5);
    }

    #[test]
    fn linear_and_constant() {
        assert_approx_eq(solve_cubic(0.0, 0.0, 2.0, 1.0, None), &[-0.5], 5e-5);
        assert_approx_eq(solve_cubic(0.0, 0.0, 0.0, 0.0, None), &[], 5e-5);
    }

    #[test]
    fn range_clamping() {
        // Roots slightly outside the range are clamped into it...
        let roots = solve_quadratic(1.0, -2.0, 1.0 - 1e-14, Some((0.0, 1.0)));
        assert_eq!(roots.len(), 1);
        assert!(roots[0] <= 1.0);
        // ...roots far outside are dropped.
        assert_approx_eq(
            solve_cubic(0.0, 1.0, -5.0, -14.0, Some((0.0, 1.0))),
            &[],
            0.0,
        );
    }
}
