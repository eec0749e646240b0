use rebalancer_types::{Position, TriggerPolicy};

/// Whether an open position may be rebalanced at `tick`, `elapsed` seconds after
/// it was opened or last rebalanced
pub fn is_eligible(policy: &TriggerPolicy, position: &Position, tick: i32, elapsed: u64) -> bool {
    if !position.is_open() {
        return false;
    }
    match *policy {
        TriggerPolicy::PriceDrift(margin) => drifted(position, tick, margin),
        TriggerPolicy::Elapsed(interval) => elapsed >= interval,
        TriggerPolicy::Either(margin, interval) => drifted(position, tick, margin) || elapsed >= interval,
    }
}

/// Tick within `margin` of either bound, or outside the range
fn drifted(position: &Position, tick: i32, margin: i32) -> bool {
    tick < position.tick_lower.saturating_add(margin) || tick >= position.tick_upper.saturating_sub(margin)
}
