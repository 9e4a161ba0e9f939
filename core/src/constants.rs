// Game configuration constants
// These are shared by the browser client and the replay verifier - must match exactly!
// Everything here is server-fixed; clients never choose them.

/// Play field width (pixels)
pub const FIELD_WIDTH: i32 = 480;

/// Play field height (pixels)
pub const FIELD_HEIGHT: i32 = 640;

/// Floor line; the rope stops here (pixels)
pub const FLOOR_Y: i32 = 560;

/// Hook pivot (pixels)
pub const ORIGIN_X: i32 = 240;
pub const ORIGIN_Y: i32 = 100;

/// Horizontal margin kept free of items on both sides (pixels)
pub const ITEM_MARGIN_X: i32 = 40;

/// Shallowest item row (pixels); the deepest is FLOOR_Y
pub const ITEM_MIN_Y: i32 = 300;

/// Number of items placed in every scene
pub const SCENE_ITEM_COUNT: usize = 18;

/// Bag value range, inclusive
pub const BAG_VALUE_MIN: i32 = 10;
pub const BAG_VALUE_MAX: i32 = 80;

/// Sweep limits around straight down (millidegrees)
pub const ANGLE_MIN_MDEG: i32 = -70_000;
pub const ANGLE_MAX_MDEG: i32 = 70_000;

/// Sweep speed: 90°/s expressed as millidegrees per millisecond
pub const ANGULAR_SPEED_MDEG_PER_MS: i64 = 90;

/// Rope speed (pixels/second)
pub const ROPE_SPEED: u64 = 320;

/// Ray march increment (pixels)
pub const RAY_STEP: i32 = 4;

/// Upper bound on ray steps; the field diagonal is well under this
pub const MAX_RAY_STEPS: u32 = 1024;

/// Hook and item radii (pixels)
pub const HOOK_RADIUS: i32 = 12;
pub const ITEM_RADIUS: i32 = 18;
pub const HIT_RADIUS: i32 = HOOK_RADIUS + ITEM_RADIUS;

/// Extra retraction per unit of item weight, in permille of the base time
pub const WEIGHT_DRAG_PERMILLE: u64 = 600;

/// Default round length (seconds)
pub const ROUND_DURATION_SEC: u32 = 60;

/// How late a submission may arrive after the round should have ended (seconds)
pub const SUBMIT_GRACE_SEC: u32 = 3;

/// Length of the seed hint exposed to clients (hex characters)
pub const SEED_HINT_LEN: usize = 8;
