//! Angle canonicalization for the serialization boundary.

/// Fold an angle in degrees into `(-90, 90]`.
///
/// The angle is first reduced modulo 360 into `(-180, 180]`, then folded by
/// 180-degree steps. A half turn leaves a rectangle's outline unchanged, so
/// the fold preserves the visual pose without swapping width and height.
/// Runs only when writing records; the in-memory angle accumulates freely so
/// a live drag never jumps.
pub fn canonicalize_angle(angle: f64) -> f64 {
    let mut n = angle % 360.0;
    if n > 180.0 {
        n -= 360.0;
    } else if n <= -180.0 {
        n += 360.0;
    }
    while n > 90.0 {
        n -= 180.0;
    }
    while n <= -90.0 {
        n += 180.0;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identity_inside_range() {
        for a in [0.0, 45.0, 90.0, -89.9, 12.345] {
            assert!(approx(canonicalize_angle(a), a), "{a}");
        }
    }

    #[test]
    fn test_known_folds() {
        assert!(approx(canonicalize_angle(450.0), 90.0));
        assert!(approx(canonicalize_angle(180.0), 0.0));
        assert!(approx(canonicalize_angle(-180.0), 0.0));
        assert!(approx(canonicalize_angle(-90.0), 90.0));
        assert!(approx(canonicalize_angle(91.0), -89.0));
        assert!(approx(canonicalize_angle(-100.0), 80.0));
        assert!(approx(canonicalize_angle(360.0), 0.0));
        assert!(approx(canonicalize_angle(-350.0), 10.0));
        assert!(approx(canonicalize_angle(1234.5), -25.5));
    }

    #[test]
    fn test_output_range_over_sweep() {
        let mut a = -1080.0;
        while a <= 1080.0 {
            let n = canonicalize_angle(a);
            assert!(n > -90.0 && n <= 90.0, "canonicalize({a}) = {n}");
            a += 7.3;
        }
    }

    #[test]
    fn test_idempotent() {
        let mut a = -720.0;
        while a <= 720.0 {
            let once = canonicalize_angle(a);
            assert!(approx(canonicalize_angle(once), once), "{a}");
            a += 11.1;
        }
    }

    #[test]
    fn test_half_turn_equivalence() {
        // Angles 180 degrees apart canonicalize to the same value.
        for a in [-33.0, 12.0, 89.0, 250.0] {
            assert!(approx(canonicalize_angle(a), canonicalize_angle(a + 180.0)));
        }
    }
}
