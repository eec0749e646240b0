//! Position ledger: the authoritative id -> Position mapping.
//!
//! Open positions live in persistent storage. Closing removes the entry, and
//! any id below the counter that has no entry reads back as the zeroed record.

use crate::error::RebalancerError;
use crate::storage;
use rebalancer_types::{Position, TickRange};
use soroban_sdk::{log, Address, Env};

/// Store a new open position under a fresh id
pub fn allocate(
    env: &Env,
    owner: &Address,
    liquidity: u128,
    range: TickRange,
    fee_growth_inside: (u128, u128),
) -> u32 {
    let id = storage::get_next_position_id(env);
    storage::set_next_position_id(env, id + 1);

    storage::set_position(
        env,
        &Position {
            id,
            owner: Some(owner.clone()),
            liquidity,
            tick_lower: range.tick_lower,
            tick_upper: range.tick_upper,
            fee_growth_inside_0_last_x128: fee_growth_inside.0,
            fee_growth_inside_1_last_x128: fee_growth_inside.1,
        },
    );
    storage::set_last_rebalance(env, id, env.ledger().timestamp());
    storage::add_position_to_owner(env, owner, id);

    id
}

pub fn get(env: &Env, id: u32) -> Result<Position, RebalancerError> {
    if id == 0 || id >= storage::get_next_position_id(env) {
        log!(env, "position not found", id);
        return Err(RebalancerError::PositionNotFound);
    }
    Ok(storage::get_position(env, id).unwrap_or_else(|| Position::closed(id)))
}

pub fn require_open(env: &Env, id: u32) -> Result<Position, RebalancerError> {
    let position = get(env, id)?;
    if !position.is_open() {
        log!(env, "position closed", id);
        return Err(RebalancerError::PositionClosed);
    }
    Ok(position)
}

pub fn require_owner(env: &Env, id: u32, caller: &Address) -> Result<Position, RebalancerError> {
    let position = require_open(env, id)?;
    if position.owner.as_ref() != Some(caller) {
        log!(env, "not position owner", id, caller.clone());
        return Err(RebalancerError::NotPositionOwner);
    }
    Ok(position)
}

/// Move an open position to a new range; id and owner stay put
pub fn update(
    env: &Env,
    position: &mut Position,
    liquidity: u128,
    range: TickRange,
    fee_growth_inside: (u128, u128),
) {
    position.liquidity = liquidity;
    position.tick_lower = range.tick_lower;
    position.tick_upper = range.tick_upper;
    position.fee_growth_inside_0_last_x128 = fee_growth_inside.0;
    position.fee_growth_inside_1_last_x128 = fee_growth_inside.1;

    storage::set_position(env, position);
    storage::set_last_rebalance(env, position.id, env.ledger().timestamp());
}

pub fn close(env: &Env, position: &Position) {
    if let Some(owner) = &position.owner {
        storage::remove_position_from_owner(env, owner, position.id);
    }
    storage::remove_position(env, position.id);
}

/// Seconds since the position was opened or last rebalanced
pub fn seconds_since_rebalance(env: &Env, id: u32) -> u64 {
    env.ledger()
        .timestamp()
        .saturating_sub(storage::get_last_rebalance(env, id))
}
