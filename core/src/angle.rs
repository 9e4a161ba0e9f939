//! Pendulum sweep of the hook and fixed-point sine/cosine.

use crate::constants::{ANGLE_MAX_MDEG, ANGLE_MIN_MDEG, ANGULAR_SPEED_MDEG_PER_MS};
use crate::fixed::{deg_milli_to_rad_fixed, I, PI_Q16};

/// Millidegrees covered by one swing from one limit to the other.
const SWEEP_SPAN_MDEG: i64 = (ANGLE_MAX_MDEG - ANGLE_MIN_MDEG) as i64;

/// Hook angle at `t_ms` after round start, in millidegrees from straight down.
///
/// Time is folded into one back-and-forth period: the first half sweeps
/// min -> max, the second half sweeps back. Negative times fold the same way.
pub fn angle_millideg_at(t_ms: i64) -> i32 {
    // i128: client timestamps are untrusted and may be near i64::MAX.
    let travelled = t_ms as i128 * ANGULAR_SPEED_MDEG_PER_MS as i128;
    let phase = travelled.rem_euclid(2 * SWEEP_SPAN_MDEG as i128) as i64;

    let md = if phase <= SWEEP_SPAN_MDEG {
        ANGLE_MIN_MDEG as i64 + phase
    } else {
        ANGLE_MAX_MDEG as i64 - (phase - SWEEP_SPAN_MDEG)
    };
    md as i32
}

/// Hook angle at `t_ms` in Q16.16 radians.
pub fn angle_at(t_ms: i64) -> I {
    deg_milli_to_rad_fixed(angle_millideg_at(t_ms))
}

// CORDIC sin/cos with ITER=16
// Constants in Q16.16 format for i64 fixed-point
const ITER: usize = 16;
const ATAN_Q16: [I; ITER] = [
    51472, // atan(2^0)  = 45°
    30386, // atan(2^-1) = 26.565°
    16055, // atan(2^-2) = 14.036°
    8150,  // atan(2^-3) = 7.125°
    4091,  // atan(2^-4) = 3.576°
    2047,  // atan(2^-5) = 1.790°
    1024,  // atan(2^-6) = 0.895°
    512,   // atan(2^-7) = 0.448°
    256,
    128,
    64,
    32,
    16,
    8,
    4,
    2,
];
const K_Q16: I = 39797; // CORDIC gain ~0.6073 in Q16.16

/// Returns `(sin, cos)` of a Q16.16 angle.
///
/// Rotation mode converges for |angle| < ~99.9°; the hook never leaves ±70°.
pub fn cordic_sin_cos(angle: I) -> (I, I) {
    debug_assert!(angle.abs() < PI_Q16 / 2 + PI_Q16 / 18, "CORDIC: angle out of range");

    let mut x = K_Q16;
    let mut y: I = 0;
    let mut z = angle;
    for (i, step) in ATAN_Q16.iter().enumerate() {
        let x_shift = x >> i;
        let y_shift = y >> i;
        if z >= 0 {
            x -= y_shift;
            y += x_shift;
            z -= step;
        } else {
            x += y_shift;
            y -= x_shift;
            z += step;
        }
    }
    (y, x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::ONE;

    #[test]
    fn test_sweep_starts_at_min() {
        assert_eq!(angle_millideg_at(0), ANGLE_MIN_MDEG);
        assert_eq!(angle_millideg_at(1000), -70_000 + 90_000);
    }

    #[test]
    fn test_sweep_rises_then_falls() {
        // Half period is 1555.5ms.
        let mut prev = angle_millideg_at(0);
        for t in 1..=1555 {
            let a = angle_millideg_at(t);
            assert!(a > prev, "sweep should rise at {}ms", t);
            prev = a;
        }
        let mut prev = angle_millideg_at(1556);
        for t in 1557..=3111 {
            let a = angle_millideg_at(t);
            assert!(a < prev, "sweep should fall at {}ms", t);
            prev = a;
        }
    }

    #[test]
    fn test_sweep_stays_in_limits_and_repeats() {
        // 28s is a whole number of 3111.1ms periods (9 of them).
        for t in (-5_000..70_000).step_by(7) {
            let a = angle_millideg_at(t);
            assert!((ANGLE_MIN_MDEG..=ANGLE_MAX_MDEG).contains(&a));
            assert_eq!(a, angle_millideg_at(t + 28_000));
        }
    }

    #[test]
    fn test_sweep_symmetric() {
        // Straight down falls at 777.7ms; t and 1555 - t mirror the angle
        // up to the 0.5ms the integer pair is off from the true mirror.
        for d in 0..=1555 {
            let before = angle_millideg_at(1555 - d);
            let after = angle_millideg_at(d);
            assert_eq!(before, -after - 50, "asymmetry at offset {}", d);
        }
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let a = angle_millideg_at(i64::MAX);
        let b = angle_millideg_at(i64::MIN);
        assert!((ANGLE_MIN_MDEG..=ANGLE_MAX_MDEG).contains(&a));
        assert!((ANGLE_MIN_MDEG..=ANGLE_MAX_MDEG).contains(&b));
    }

    #[test]
    fn test_cordic_accuracy() {
        let (s, c) = cordic_sin_cos(0);
        assert!(s.abs() < 64, "sin(0) = {}", s);
        assert!((c - ONE).abs() < 64, "cos(0) = {}", c);

        let (s, c) = cordic_sin_cos(deg_milli_to_rad_fixed(30_000));
        assert!((s - ONE / 2).abs() < 64, "sin(30) = {}", s);
        assert!((c - 56756).abs() < 64, "cos(30) = {}", c);

        let (s, _) = cordic_sin_cos(deg_milli_to_rad_fixed(-70_000));
        assert!((s + 61584).abs() < 64, "sin(-70) = {}", s);
    }
}
