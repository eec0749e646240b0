use soroban_sdk::{contracttype, Address};

/// Current pool state as reported by the pool's `get_state`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    /// Current sqrt(price) as Q64.96
    pub sqrt_price_x96: u128,
    /// Current tick index
    pub tick: i32,
}

/// Pool configuration - immutable after creation
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    /// Token0 address (lower address)
    pub token0: Address,
    /// Token1 address (higher address)
    pub token1: Address,
    /// Fee tier in hundredths of bps
    pub fee: u32,
    /// Tick spacing for this pool
    pub tick_spacing: i32,
}

/// Key of a pool-side liquidity position
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionKey {
    pub owner: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// Liquidity and owed tokens the pool tracks per (owner, range)
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PositionInfo {
    /// Liquidity in this position
    pub liquidity: u128,
    /// Fee growth inside at last update (token0)
    pub fee_growth_inside_0_last_x128: u128,
    /// Fee growth inside at last update (token1)
    pub fee_growth_inside_1_last_x128: u128,
    /// Uncollected token0 (burned principal + fees)
    pub tokens_owed_0: u128,
    /// Uncollected token1 (burned principal + fees)
    pub tokens_owed_1: u128,
}
