use crate::error::RebalancerError;
use rebalancer_math::{floor_to_spacing, max_usable_tick, min_usable_tick};
use rebalancer_types::TickRange;

/// Half-width multipliers of the tick spacing, selected by a 1-based preset
pub const WIDTH_PRESETS: [i32; 10] = [1, 2, 3, 5, 8, 13, 21, 34, 55, 89];

/// Multiplier for a 1-based width preset
pub fn width_multiplier(preset: u32) -> Option<i32> {
    let index = preset.checked_sub(1)?;
    WIDTH_PRESETS.get(index as usize).copied()
}

/// Range of `multiplier * tick_spacing` ticks on each side of `tick`, floored
/// onto the spacing grid.
///
/// The result always satisfies `tick_lower <= tick < tick_upper`.
pub fn select_range(tick: i32, preset: u32, tick_spacing: i32) -> Result<TickRange, RebalancerError> {
    let multiplier = width_multiplier(preset).ok_or(RebalancerError::InvalidRangeParameter)?;
    let half_width = multiplier * tick_spacing;

    let range = TickRange {
        tick_lower: floor_to_spacing(tick - half_width, tick_spacing),
        tick_upper: floor_to_spacing(tick + half_width, tick_spacing),
    };

    if range.tick_lower < min_usable_tick(tick_spacing) || range.tick_upper > max_usable_tick(tick_spacing) {
        return Err(RebalancerError::TickOutOfBounds);
    }
    Ok(range)
}
