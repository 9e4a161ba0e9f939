//! Discretized rope extension and hit test.

use crate::angle::cordic_sin_cos;
use crate::constants::{
    FIELD_HEIGHT, FIELD_WIDTH, FLOOR_Y, HIT_RADIUS, MAX_RAY_STEPS, ORIGIN_X, ORIGIN_Y, RAY_STEP,
};
use crate::fixed::{dist_sq, to_fixed_int, I};
use crate::scene::Scene;

/// What the rope reached and how far it travelled (pixels).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RayCast {
    /// Arena index of the item hit, if any.
    pub hit: Option<usize>,
    pub length: u32,
}

impl RayCast {
    pub fn miss(length: u32) -> Self {
        Self { hit: None, length }
    }
}

/// Marches from the hook origin along `angle` (Q16.16 radians, 0 = straight
/// down, positive toward +x) in `RAY_STEP` increments.
///
/// After each step the boundary is checked first, then every live item in
/// scene order; the first item within `HIT_RADIUS` wins.
pub fn cast_ray(angle: I, scene: &Scene) -> RayCast {
    let (sinv, cosv) = cordic_sin_cos(angle);
    let step_x = sinv * RAY_STEP as I;
    let step_y = cosv * RAY_STEP as I;

    let floor_y = to_fixed_int(FLOOR_Y as i64);
    let max_x = to_fixed_int(FIELD_WIDTH as i64);
    let max_y = to_fixed_int(FIELD_HEIGHT as i64);
    let hit_r = to_fixed_int(HIT_RADIUS as i64);
    let hit_r_sq = hit_r * hit_r;

    let mut x = to_fixed_int(ORIGIN_X as i64);
    let mut y = to_fixed_int(ORIGIN_Y as i64);
    let mut length: u32 = 0;

    for _ in 0..MAX_RAY_STEPS {
        x += step_x;
        y += step_y;
        length += RAY_STEP as u32;

        if y >= floor_y || x < 0 || x > max_x || y < 0 || y > max_y {
            return RayCast::miss(length);
        }

        let hit = scene.live().find(|(_, it)| {
            dist_sq(to_fixed_int(it.x as i64), to_fixed_int(it.y as i64), x, y) <= hit_r_sq
        });
        if let Some((index, _)) = hit {
            return RayCast {
                hit: Some(index),
                length,
            };
        }
    }

    RayCast::miss(length)
}
