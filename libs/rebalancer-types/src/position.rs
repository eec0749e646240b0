use soroban_sdk::{contracttype, Address};

/// A rebalancer-managed liquidity position.
///
/// A closed position keeps its id reserved but every other field is reset:
/// no owner, zero liquidity, zero ticks and zero fee snapshots.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    /// Position id, stable across rebalances
    pub id: u32,
    /// Depositor, `None` once closed
    pub owner: Option<Address>,
    /// Liquidity contributed to the pool
    pub liquidity: u128,
    /// Lower tick boundary
    pub tick_lower: i32,
    /// Upper tick boundary
    pub tick_upper: i32,
    /// Fee growth inside the range at last mint (token0)
    pub fee_growth_inside_0_last_x128: u128,
    /// Fee growth inside the range at last mint (token1)
    pub fee_growth_inside_1_last_x128: u128,
}

impl Position {
    /// The record of a closed (or withdrawn) position.
    pub fn closed(id: u32) -> Self {
        Self {
            id,
            owner: None,
            liquidity: 0,
            tick_lower: 0,
            tick_upper: 0,
            fee_growth_inside_0_last_x128: 0,
            fee_growth_inside_1_last_x128: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.liquidity != 0
    }

    pub fn range(&self) -> TickRange {
        TickRange {
            tick_lower: self.tick_lower,
            tick_upper: self.tick_upper,
        }
    }
}

/// Tick range computed by the range selector
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TickRange {
    pub tick_lower: i32,
    pub tick_upper: i32,
}

impl TickRange {
    /// True if `tick` lies in `[tick_lower, tick_upper)`
    pub fn contains(&self, tick: i32) -> bool {
        tick >= self.tick_lower && tick < self.tick_upper
    }
}
