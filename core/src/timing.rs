//! Rope travel and retraction durations, in whole milliseconds.

use crate::constants::{ROPE_SPEED, WEIGHT_DRAG_PERMILLE};
use crate::scene::ItemKind;

/// One-way travel time for `length` pixels at full rope speed.
pub fn travel_ms(length: u32) -> u64 {
    length as u64 * 1000 / ROPE_SPEED
}

/// Retraction multiplier in permille: `1 + 0.6 * weight`.
pub fn weight_factor_permille(kind: ItemKind) -> u64 {
    1000 + kind.weight_tenths() * WEIGHT_DRAG_PERMILLE / 10
}

/// Time to reel `kind` back over `length` pixels.
pub fn retract_ms(length: u32, kind: ItemKind) -> u64 {
    length as u64 * weight_factor_permille(kind) / ROPE_SPEED
}

/// Out and back at full speed; misses carry no weight penalty.
pub fn miss_ms(length: u32) -> u64 {
    2 * travel_ms(length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_travel() {
        assert_eq!(travel_ms(320), 1000);
        assert_eq!(travel_ms(4), 12);
        assert_eq!(travel_ms(0), 0);
    }

    #[test]
    fn test_weight_factors() {
        assert_eq!(weight_factor_permille(ItemKind::GoldBig), 2800);
        assert_eq!(weight_factor_permille(ItemKind::GoldMed), 2200);
        assert_eq!(weight_factor_permille(ItemKind::GoldSmall), 1600);
        assert_eq!(weight_factor_permille(ItemKind::Rock), 2800);
        assert_eq!(weight_factor_permille(ItemKind::Bag), 1900);
    }

    #[test]
    fn test_retract_scales_with_weight() {
        assert_eq!(retract_ms(320, ItemKind::GoldSmall), 1600);
        assert_eq!(retract_ms(272, ItemKind::GoldBig), 2380);
        assert!(retract_ms(200, ItemKind::Rock) > retract_ms(200, ItemKind::Bag));
    }

    #[test]
    fn test_miss_is_round_trip() {
        assert_eq!(miss_ms(460), 2 * 1437);
    }
}
