pub const DEFAULT_MAX_PARTICIPANTS: u32 = 30;

/// Bounds a requested participant count to `[1, max]`. A `max` of 0 is
/// treated as 1 so the range is never empty.
pub fn clamp_quantity(requested: i64, max: u32) -> u32 {
    let upper = max.max(1) as i64;
    requested.clamp(1, upper) as u32
}
