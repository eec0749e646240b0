//! Cross-contract calls into the AMM pool.
//!
//! The pool pulls tokens with `transfer_from`, so every call that makes it
//! spend the rebalancer's balance is bracketed by an allowance sized to what
//! the call may take.

use rebalancer_math::{get_liquidity_for_amounts, get_sqrt_ratio_at_tick};
use rebalancer_types::{PoolConfig, PoolState, RebalancerConfig, TickRange};
use soroban_sdk::{token, Address, Env, IntoVal, Symbol};

pub fn get_state(env: &Env, pool: &Address) -> PoolState {
    env.invoke_contract(pool, &Symbol::new(env, "get_state"), ().into_val(env))
}

pub fn get_config(env: &Env, pool: &Address) -> PoolConfig {
    env.invoke_contract(pool, &Symbol::new(env, "get_config"), ().into_val(env))
}

pub fn current_tick(env: &Env, pool: &Address) -> i32 {
    get_state(env, pool).tick
}

pub fn fee_growth_inside(env: &Env, pool: &Address, range: TickRange) -> (u128, u128) {
    env.invoke_contract(
        pool,
        &Symbol::new(env, "fee_growth_inside"),
        (range.tick_lower, range.tick_upper).into_val(env),
    )
}

/// Mint as much liquidity as `amount0_desired`/`amount1_desired` support at the
/// pool's current price.
///
/// # Returns
/// (liquidity, amount0, amount1) - zero liquidity means nothing was minted
pub fn mint(
    env: &Env,
    config: &RebalancerConfig,
    range: TickRange,
    amount0_desired: u128,
    amount1_desired: u128,
) -> (u128, u128, u128) {
    let state = get_state(env, &config.pool);
    let liquidity = get_liquidity_for_amounts(
        env,
        state.sqrt_price_x96,
        get_sqrt_ratio_at_tick(env, range.tick_lower),
        get_sqrt_ratio_at_tick(env, range.tick_upper),
        amount0_desired,
        amount1_desired,
    );
    if liquidity == 0 {
        return (0, 0, 0);
    }

    let this = env.current_contract_address();
    approve(env, &config.token0, &config.pool, amount0_desired);
    approve(env, &config.token1, &config.pool, amount1_desired);

    let (amount0, amount1): (u128, u128) = env.invoke_contract(
        &config.pool,
        &Symbol::new(env, "mint"),
        (this, range.tick_lower, range.tick_upper, liquidity).into_val(env),
    );

    approve(env, &config.token0, &config.pool, 0);
    approve(env, &config.token1, &config.pool, 0);

    (liquidity, amount0, amount1)
}

/// Burn liquidity; the released amounts become owed and must be collected
pub fn burn(env: &Env, pool: &Address, range: TickRange, liquidity: u128) -> (u128, u128) {
    env.invoke_contract(
        pool,
        &Symbol::new(env, "burn"),
        (
            env.current_contract_address(),
            range.tick_lower,
            range.tick_upper,
            liquidity,
        )
            .into_val(env),
    )
}

/// Collect up to the given amounts of what the pool owes on a range
pub fn collect(
    env: &Env,
    pool: &Address,
    recipient: &Address,
    range: TickRange,
    amount0_max: u128,
    amount1_max: u128,
) -> (u128, u128) {
    env.invoke_contract(
        pool,
        &Symbol::new(env, "collect"),
        (
            env.current_contract_address(),
            recipient.clone(),
            range.tick_lower,
            range.tick_upper,
            amount0_max,
            amount1_max,
        )
            .into_val(env),
    )
}

/// Exact-input swap with the rebalancer as sender and recipient
///
/// # Returns
/// Amount of the other token received
pub fn swap_exact_in(env: &Env, config: &RebalancerConfig, zero_for_one: bool, amount_in: u128) -> u128 {
    let this = env.current_contract_address();
    let token_in = if zero_for_one { &config.token0 } else { &config.token1 };
    approve(env, token_in, &config.pool, amount_in);

    let amount_out: u128 = env.invoke_contract(
        &config.pool,
        &Symbol::new(env, "swap"),
        (this.clone(), this, zero_for_one, amount_in).into_val(env),
    );

    approve(env, token_in, &config.pool, 0);
    amount_out
}

/// Allowance for `spender` over the rebalancer's balance, valid for this ledger only
fn approve(env: &Env, token: &Address, spender: &Address, amount: u128) {
    token::Client::new(env, token).approve(
        &env.current_contract_address(),
        spender,
        &(amount as i128),
        &env.ledger().sequence(),
    );
}
