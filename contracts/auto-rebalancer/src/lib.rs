#![no_std]

//! Concentrated-liquidity auto-rebalancer.
//!
//! Users deposit one token of a pool's pair and receive a position that the
//! contract keeps in the pool on their behalf. Once the configured trigger
//! policy says the position has drifted, anyone may rebalance it into a fresh
//! range around the current price.

mod error;
mod events;
mod ledger;
mod pool;
mod range;
mod storage;
mod trigger;


pub use error::RebalancerError;
pub use range::WIDTH_PRESETS;

use rebalancer_math::{fees_owed, get_sqrt_ratio_at_tick, swap_to_range_ratio};
use rebalancer_types::{Position, RebalancerConfig, TickRange, TriggerPolicy};
use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Vec};

/// Maximum page size for `positions_of`
const MAX_PAGE_SIZE: u32 = 50;

#[contract]
pub struct AutoRebalancer;

/// Liquidity minted from a set of holdings, plus what could not be used
struct Provision {
    liquidity: u128,
    fee_growth_inside: (u128, u128),
    remainder0: u128,
    remainder1: u128,
}

#[contractimpl]
impl AutoRebalancer {
    /// Bind the rebalancer to a pool and the token users deposit
    pub fn initialize(
        env: Env,
        pool: Address,
        deposit_token: Address,
        trigger_policy: TriggerPolicy,
    ) -> Result<(), RebalancerError> {
        if storage::is_initialized(&env) {
            return Err(RebalancerError::AlreadyInitialized);
        }
        if !trigger_policy.is_valid() {
            return Err(RebalancerError::InvalidRangeParameter);
        }

        let pool_config = pool::get_config(&env, &pool);
        if deposit_token != pool_config.token0 && deposit_token != pool_config.token1 {
            return Err(RebalancerError::InvalidToken);
        }

        storage::set_config(
            &env,
            &RebalancerConfig {
                pool,
                token0: pool_config.token0,
                token1: pool_config.token1,
                deposit_token,
                tick_spacing: pool_config.tick_spacing,
                trigger_policy,
            },
        );
        storage::set_next_position_id(&env, 1);
        Ok(())
    }

    /// Deposit `amount` of the deposit token into a new position centred on the
    /// current price.
    ///
    /// The caller must have approved the rebalancer for `amount`. Part of the
    /// deposit is swapped so both sides of the range can be funded; whatever
    /// cannot be minted is sent back to the caller.
    ///
    /// # Returns
    /// The new position id
    pub fn deposit(env: Env, caller: Address, amount: i128, width_preset: u32) -> Result<u32, RebalancerError> {
        caller.require_auth();
        let config = storage::get_config(&env)?;

        if amount <= 0 {
            return Err(RebalancerError::InsufficientFunds);
        }
        let tick = pool::current_tick(&env, &config.pool);
        let range = select_range(&env, tick, width_preset, config.tick_spacing)?;

        let this = env.current_contract_address();
        let deposit_token = token::Client::new(&env, &config.deposit_token);
        if deposit_token.balance(&caller) < amount || deposit_token.allowance(&caller, &this) < amount {
            log!(&env, "insufficient balance or allowance", caller.clone(), amount);
            return Err(RebalancerError::InsufficientFunds);
        }
        if !matches!(deposit_token.try_transfer_from(&this, &caller, &this, &amount), Ok(Ok(()))) {
            log!(&env, "deposit transfer rejected", caller.clone(), amount);
            return Err(RebalancerError::TransferRejected);
        }

        let (amount0, amount1) = if config.deposits_token0() {
            (amount as u128, 0)
        } else {
            (0, amount as u128)
        };
        let provision = provide_liquidity(&env, &config, range, amount0, amount1)?;
        pay(&env, &config, &caller, provision.remainder0, provision.remainder1)?;

        let id = ledger::allocate(&env, &caller, provision.liquidity, range, provision.fee_growth_inside);
        events::position_opened(&env, id, &caller, provision.liquidity, range);
        Ok(id)
    }

    /// Close a position, paying its principal and accrued fees to the owner.
    ///
    /// # Returns
    /// (amount0, amount1) - Amounts paid out
    pub fn withdraw(env: Env, caller: Address, id: u32) -> Result<(u128, u128), RebalancerError> {
        caller.require_auth();
        let config = storage::get_config(&env)?;
        let position = ledger::require_owner(&env, id, &caller)?;

        let (amount0, amount1) = release(&env, &config, &position, &caller);

        ledger::close(&env, &position);
        events::position_closed(&env, id, &caller, amount0, amount1);
        Ok((amount0, amount1))
    }

    /// Move an eligible position to a fresh range around the current price.
    ///
    /// Anyone may call this; `caller` is only recorded in the event. Principal
    /// and fees are reinvested, and any remainder that cannot be minted goes to
    /// the position owner.
    pub fn trigger_rebalance(
        env: Env,
        caller: Address,
        id: u32,
        new_width_preset: u32,
    ) -> Result<(), RebalancerError> {
        caller.require_auth();
        let config = storage::get_config(&env)?;
        let mut position = ledger::require_open(&env, id)?;
        let owner = position.owner.clone().ok_or(RebalancerError::PositionClosed)?;

        let tick = pool::current_tick(&env, &config.pool);
        let new_range = select_range(&env, tick, new_width_preset, config.tick_spacing)?;
        let elapsed = ledger::seconds_since_rebalance(&env, id);
        if !trigger::is_eligible(&config.trigger_policy, &position, tick, elapsed) {
            log!(&env, "rebalance not eligible", id, tick);
            return Err(RebalancerError::RebalanceNotEligible);
        }

        let this = env.current_contract_address();
        let (amount0, amount1) = release(&env, &config, &position, &this);
        let provision = provide_liquidity(&env, &config, new_range, amount0, amount1)?;
        pay(&env, &config, &owner, provision.remainder0, provision.remainder1)?;

        ledger::update(
            &env,
            &mut position,
            provision.liquidity,
            new_range,
            provision.fee_growth_inside,
        );
        events::position_rebalanced(&env, id, &caller, provision.liquidity, new_range);
        Ok(())
    }

    // === View Functions ===

    /// Position record; ids that were withdrawn read back as the zeroed record
    pub fn positions(env: Env, id: u32) -> Result<Position, RebalancerError> {
        ledger::get(&env, id)
    }

    pub fn next_position_id(env: Env) -> u32 {
        storage::get_next_position_id(&env)
    }

    /// Whether `trigger_rebalance` would accept this position right now
    pub fn can_trigger_rebalance(env: Env, id: u32) -> bool {
        let Ok(config) = storage::get_config(&env) else {
            return false;
        };
        let Some(position) = storage::get_position(&env, id) else {
            return false;
        };
        let tick = pool::current_tick(&env, &config.pool);
        let elapsed = ledger::seconds_since_rebalance(&env, id);
        trigger::is_eligible(&config.trigger_policy, &position, tick, elapsed)
    }

    pub fn config(env: Env) -> Result<RebalancerConfig, RebalancerError> {
        storage::get_config(&env)
    }

    /// Half-width multipliers indexed by preset 1..=10
    pub fn width_presets(env: Env) -> Vec<i32> {
        Vec::from_array(&env, WIDTH_PRESETS)
    }

    /// Range a deposit with `width_preset` would get at the current price
    pub fn preview_range(env: Env, width_preset: u32) -> Result<TickRange, RebalancerError> {
        let config = storage::get_config(&env)?;
        let tick = pool::current_tick(&env, &config.pool);
        select_range(&env, tick, width_preset, config.tick_spacing)
    }

    /// Number of open positions owned by `owner`
    pub fn balance_of(env: Env, owner: Address) -> u32 {
        storage::get_owner_position_count(&env, &owner)
    }

    /// Open position ids of `owner`, `limit` capped at 50
    pub fn positions_of(env: Env, owner: Address, start_index: u32, limit: u32) -> Vec<u32> {
        let count = storage::get_owner_position_count(&env, &owner);
        let end_index = start_index.saturating_add(limit.min(MAX_PAGE_SIZE)).min(count);

        let mut ids = Vec::new(&env);
        for index in start_index..end_index {
            if let Some(id) = storage::get_owner_position_at(&env, &owner, index) {
                ids.push_back(id);
            }
        }
        ids
    }
}

fn select_range(env: &Env, tick: i32, width_preset: u32, tick_spacing: i32) -> Result<TickRange, RebalancerError> {
    range::select_range(tick, width_preset, tick_spacing).map_err(|err| {
        log!(env, "range selection failed", width_preset, tick);
        err
    })
}

/// Burn a position's liquidity and collect its principal plus the fees accrued
/// since its snapshot to `recipient`
fn release(env: &Env, config: &RebalancerConfig, position: &Position, recipient: &Address) -> (u128, u128) {
    let range = position.range();
    let (burned0, burned1) = pool::burn(env, &config.pool, range, position.liquidity);

    let (growth0, growth1) = pool::fee_growth_inside(env, &config.pool, range);
    let fees0 = fees_owed(env, growth0, position.fee_growth_inside_0_last_x128, position.liquidity);
    let fees1 = fees_owed(env, growth1, position.fee_growth_inside_1_last_x128, position.liquidity);

    pool::collect(env, &config.pool, recipient, range, burned0 + fees0, burned1 + fees1)
}

/// Swap the holdings towards the range's ratio and mint with them
fn provide_liquidity(
    env: &Env,
    config: &RebalancerConfig,
    range: TickRange,
    mut amount0: u128,
    mut amount1: u128,
) -> Result<Provision, RebalancerError> {
    let state = pool::get_state(env, &config.pool);
    let swap = swap_to_range_ratio(
        env,
        state.sqrt_price_x96,
        get_sqrt_ratio_at_tick(env, range.tick_lower),
        get_sqrt_ratio_at_tick(env, range.tick_upper),
        amount0,
        amount1,
    );
    if let Some((zero_for_one, amount_in)) = swap {
        let amount_out = pool::swap_exact_in(env, config, zero_for_one, amount_in);
        if zero_for_one {
            amount0 -= amount_in;
            amount1 += amount_out;
        } else {
            amount1 -= amount_in;
            amount0 += amount_out;
        }
    }

    let (liquidity, used0, used1) = pool::mint(env, config, range, amount0, amount1);
    if liquidity == 0 {
        log!(env, "nothing to mint", amount0, amount1);
        return Err(RebalancerError::InsufficientFunds);
    }

    Ok(Provision {
        liquidity,
        fee_growth_inside: pool::fee_growth_inside(env, &config.pool, range),
        remainder0: amount0 - used0,
        remainder1: amount1 - used1,
    })
}

/// Transfer token amounts held by the rebalancer to `to`
fn pay(env: &Env, config: &RebalancerConfig, to: &Address, amount0: u128, amount1: u128) -> Result<(), RebalancerError> {
    let this = env.current_contract_address();
    for (token, amount) in [(&config.token0, amount0), (&config.token1, amount1)] {
        if amount == 0 {
            continue;
        }
        let client = token::Client::new(env, token);
        if !matches!(client.try_transfer(&this, to, &(amount as i128)), Ok(Ok(()))) {
            log!(env, "payout transfer rejected", to.clone(), amount);
            return Err(RebalancerError::TransferRejected);
        }
    }
    Ok(())
}
