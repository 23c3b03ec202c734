// Shared tuning constants used by the core and both front-ends.

// Hand landmark model (21 points per hand)
pub const LANDMARKS_PER_HAND: usize = 21;
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9; // base of the middle finger, also the hand anchor
pub const REQUIRED_LANDMARKS: [usize; 4] = [WRIST, THUMB_TIP, INDEX_TIP, MIDDLE_MCP];

// Hands needed in one frame to switch to the gallery sphere
pub const GALLERY_HAND_COUNT: usize = 2;

// Tension calibration
pub const TENSION_OFFSET: f32 = 0.2; // pinch/palm ratio that reads as a closed pinch
pub const TENSION_SPAN: f32 = 1.0;
pub const PALM_SIZE_FLOOR: f32 = 0.1;
pub const PALM_SIZE_EPSILON: f32 = 1e-3;

// Mode thresholds on tension
pub const CONTRACT_THRESHOLD: f32 = 0.25;
pub const REVEAL_THRESHOLD: f32 = 0.95;

// Damping time constants (seconds)
pub const POSITION_TAU_SEC: f32 = 0.4;
pub const ROTATION_TAU_SEC: f32 = 0.4;
pub const SCALE_TAU_SEC: f32 = 0.4;
pub const OPACITY_TAU_SEC: f32 = 0.2;
pub const COLOR_TAU_SEC: f32 = 0.2;
pub const EMISSIVE_TAU_SEC: f32 = 0.1;
pub const GROUP_TAU_SEC: f32 = 0.5;

// Largest frame step the engine integrates in one tick
pub const MAX_TICK_DT_SEC: f32 = 0.25;

// Heart layout
pub const HEART_SCALE: f32 = 0.35;
pub const HEART_DEPTH: f32 = 4.0;
pub const EXPLODED_EXTENT: [f32; 3] = [22.0, 22.0, 12.0];
pub const REST_JITTER: [f32; 3] = [0.4, 0.4, 0.2]; // full range in radians

// Gallery sphere
pub const GALLERY_RADIUS: f32 = 8.0;
pub const GALLERY_REFERENCE_EXTENT: f32 = 9.5; // viewport side that shows the sphere unscaled
pub const GALLERY_MIN_FACTOR: f32 = 0.5;

// Photos
pub const DEFAULT_OBJECT_COUNT: usize = 80;
pub const PLACEHOLDER_COUNT: usize = 80;
pub const MAX_UPLOADS: usize = 30;

// Palette
pub const HOT_PINK: [f32; 3] = [1.0, 0.412, 0.706]; // #ff69b4, tint before the first tick settles
pub const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

// Camera
pub const CAMERA_Z: f32 = 12.0;
pub const CAMERA_FOV_DEG: f32 = 45.0;
