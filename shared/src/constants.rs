pub const DEFAULT_MIN_SELECTABLE: usize = 2;
pub const DEFAULT_MAX_SELECTABLE: usize = 10;

pub const FULL_TURN_DEGREES: f64 = 360.0;
pub const MIN_SPINS: f64 = 3.0; // Minimum full rotations added per spin
pub const MAX_SPINS: f64 = 6.0; // Exclusive upper bound on full rotations
pub const SPIN_DURATION_MS: u64 = 3000; // Must match the caller's animation length

pub const DEFAULT_PRESET: [&str; 4] = ["Pizza", "Sushi", "Tacos", "Ramen"];

pub const EMPTY_WHEEL_ERROR: &str = "Cannot spin a wheel with no options";
pub const EMPTY_LABEL_ERROR: &str = "Every option in play needs a name";
pub const MIN_SELECTABLE_ZERO_ERROR: &str = "At least one option must be required to spin";
pub const MIN_EXCEEDS_MAX_ERROR: &str = "Minimum options cannot exceed the maximum";
