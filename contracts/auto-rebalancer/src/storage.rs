use crate::error::RebalancerError;
use rebalancer_types::{Position, RebalancerConfig};
use soroban_sdk::{contracttype, Address, Env};

/// Storage keys
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Rebalancer configuration (Instance storage)
    Config,
    /// Next position ID counter (Instance storage)
    NextPositionId,
    /// Position ID -> Position (Persistent storage, removed on close)
    Position(u32),
    /// Position ID -> ledger timestamp of the last open or rebalance
    LastRebalance(u32),
    /// Owner -> open position count
    OwnerPositionCount(Address),
    /// Owner -> index -> position ID
    OwnerPositionAt(Address, u32),
    /// Position ID -> index in owner's list (for O(1) removal)
    PositionIndex(u32),
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

pub fn get_config(env: &Env) -> Result<RebalancerConfig, RebalancerError> {
    let config = env
        .storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(RebalancerError::NotInitialized)?;
    extend_instance_ttl(env);
    Ok(config)
}

pub fn set_config(env: &Env, config: &RebalancerConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

// === Position counter ===

/// Ids start at 1; zero is never handed out
pub fn get_next_position_id(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::NextPositionId)
        .unwrap_or(1)
}

pub fn set_next_position_id(env: &Env, id: u32) {
    env.storage().instance().set(&DataKey::NextPositionId, &id);
}

// === Positions ===

pub fn get_position(env: &Env, id: u32) -> Option<Position> {
    let key = DataKey::Position(id);
    let position = env.storage().persistent().get(&key);
    if position.is_some() {
        extend_persistent_ttl(env, &key);
    }
    position
}

pub fn set_position(env: &Env, position: &Position) {
    let key = DataKey::Position(position.id);
    env.storage().persistent().set(&key, position);
    extend_persistent_ttl(env, &key);
}

pub fn remove_position(env: &Env, id: u32) {
    env.storage().persistent().remove(&DataKey::Position(id));
    env.storage().persistent().remove(&DataKey::LastRebalance(id));
}

pub fn get_last_rebalance(env: &Env, id: u32) -> u64 {
    env.storage()
        .persistent()
        .get(&DataKey::LastRebalance(id))
        .unwrap_or(0)
}

pub fn set_last_rebalance(env: &Env, id: u32, timestamp: u64) {
    let key = DataKey::LastRebalance(id);
    env.storage().persistent().set(&key, &timestamp);
    extend_persistent_ttl(env, &key);
}

// === Owner index ===

pub fn get_owner_position_count(env: &Env, owner: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::OwnerPositionCount(owner.clone()))
        .unwrap_or(0)
}

pub fn get_owner_position_at(env: &Env, owner: &Address, index: u32) -> Option<u32> {
    env.storage()
        .persistent()
        .get(&DataKey::OwnerPositionAt(owner.clone(), index))
}

/// Add position to owner's indexed list - O(1) operation
pub fn add_position_to_owner(env: &Env, owner: &Address, id: u32) {
    let count = get_owner_position_count(env, owner);

    let slot = DataKey::OwnerPositionAt(owner.clone(), count);
    env.storage().persistent().set(&slot, &id);
    extend_persistent_ttl(env, &slot);

    let index = DataKey::PositionIndex(id);
    env.storage().persistent().set(&index, &count);
    extend_persistent_ttl(env, &index);

    let counter = DataKey::OwnerPositionCount(owner.clone());
    env.storage().persistent().set(&counter, &(count + 1));
    extend_persistent_ttl(env, &counter);
}

/// Remove position from owner's indexed list using swap-and-pop - O(1) operation
pub fn remove_position_from_owner(env: &Env, owner: &Address, id: u32) {
    let count = get_owner_position_count(env, owner);
    if count == 0 {
        return;
    }

    let index_to_remove: u32 = env
        .storage()
        .persistent()
        .get(&DataKey::PositionIndex(id))
        .unwrap_or(0);
    let last_index = count - 1;

    // Move the last entry into the freed slot
    if index_to_remove != last_index {
        if let Some(last_id) = get_owner_position_at(env, owner, last_index) {
            env.storage()
                .persistent()
                .set(&DataKey::OwnerPositionAt(owner.clone(), index_to_remove), &last_id);
            env.storage()
                .persistent()
                .set(&DataKey::PositionIndex(last_id), &index_to_remove);
        }
    }

    env.storage()
        .persistent()
        .remove(&DataKey::OwnerPositionAt(owner.clone(), last_index));
    env.storage().persistent().remove(&DataKey::PositionIndex(id));

    let counter = DataKey::OwnerPositionCount(owner.clone());
    if last_index == 0 {
        env.storage().persistent().remove(&counter);
    } else {
        env.storage().persistent().set(&counter, &last_index);
    }
}
