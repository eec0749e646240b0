use rebalancer_types::{PoolConfig, PoolState, PositionInfo, PositionKey};
use soroban_sdk::{contracttype, Env};

/// Storage keys for the pool contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Pool configuration (Instance storage)
    Config,
    /// Current pool state (Instance storage)
    State,
    /// Position data: PositionKey -> PositionInfo (Persistent storage)
    Position(PositionKey),
    /// Total liquidity of all positions on a range (Persistent storage)
    RangeLiquidity(i32, i32),
    /// Fee growth accumulated inside a range, per token (Persistent storage)
    FeeGrowthInside(i32, i32),
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

pub fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

// === Config ===

pub fn get_config(env: &Env) -> PoolConfig {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .unwrap_or_else(|| panic!("Pool not initialized"))
}

pub fn set_config(env: &Env, config: &PoolConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

// === State ===

pub fn get_state(env: &Env) -> PoolState {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .unwrap_or_else(|| panic!("Pool not initialized"))
}

pub fn set_state(env: &Env, state: &PoolState) {
    env.storage().instance().set(&DataKey::State, state);
    extend_instance_ttl(env);
}

// === Position ===

pub fn get_position(env: &Env, key: &PositionKey) -> PositionInfo {
    env.storage()
        .persistent()
        .get(&DataKey::Position(key.clone()))
        .unwrap_or_default()
}

pub fn set_position(env: &Env, key: &PositionKey, info: &PositionInfo) {
    let data_key = DataKey::Position(key.clone());
    if info.liquidity == 0 && info.tokens_owed_0 == 0 && info.tokens_owed_1 == 0 {
        // Remove empty position
        env.storage().persistent().remove(&data_key);
    } else {
        env.storage().persistent().set(&data_key, info);
        extend_persistent_ttl(env, &data_key);
    }
}

// === Range accumulators ===

pub fn get_range_liquidity(env: &Env, tick_lower: i32, tick_upper: i32) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::RangeLiquidity(tick_lower, tick_upper))
        .unwrap_or(0)
}

pub fn set_range_liquidity(env: &Env, tick_lower: i32, tick_upper: i32, liquidity: u128) {
    let key = DataKey::RangeLiquidity(tick_lower, tick_upper);
    if liquidity == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &liquidity);
        extend_persistent_ttl(env, &key);
    }
}

pub fn get_fee_growth_inside(env: &Env, tick_lower: i32, tick_upper: i32) -> (u128, u128) {
    env.storage()
        .persistent()
        .get(&DataKey::FeeGrowthInside(tick_lower, tick_upper))
        .unwrap_or((0, 0))
}

pub fn set_fee_growth_inside(env: &Env, tick_lower: i32, tick_upper: i32, growth: (u128, u128)) {
    let key = DataKey::FeeGrowthInside(tick_lower, tick_upper);
    env.storage().persistent().set(&key, &growth);
    extend_persistent_ttl(env, &key);
}
