// Q16.16 fixed-point arithmetic using i64
//
// Every distance and direction used for scoring goes through these helpers so a
// replay produces the same lengths on every platform.

pub type I = i64;

pub const FRAC_BITS: u32 = 16;
pub const ONE: I = 1 << FRAC_BITS;

/// π in Q16.16
pub const PI_Q16: I = 205_887;

#[inline]
pub fn to_fixed_int(n: i64) -> I {
    n << FRAC_BITS
}

/// Squared euclidean distance between two Q16.16 points, in Q32.32.
///
/// Kept in i64: play-field coordinates stay below 2^26 in Q16.16, so the sum of
/// two squares stays below 2^53.
#[inline]
pub fn dist_sq(ax: I, ay: I, bx: I, by: I) -> i64 {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy
}

/// Millidegrees to Q16.16 radians (truncates toward zero, symmetric around 0).
#[inline]
pub fn deg_milli_to_rad_fixed(md: i32) -> I {
    md as I * PI_Q16 / 180_000
}
