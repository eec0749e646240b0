use crate::storage::{
    get_config, get_fee_growth_inside, get_position, get_range_liquidity, get_state,
    set_fee_growth_inside, set_position, set_range_liquidity,
};
use rebalancer_math::{
    add_delta, fee_growth_delta_x128, fees_owed, get_amounts_for_liquidity, get_sqrt_ratio_at_tick,
};
use rebalancer_types::PositionKey;
use soroban_sdk::{token, Address, Env};

/// Mint (add) liquidity to a position, pulling the owed amounts from `recipient`
/// against the allowance it granted the pool
pub fn mint(
    env: &Env,
    recipient: Address,
    tick_lower: i32,
    tick_upper: i32,
    amount: u128,
) -> (u128, u128) {
    if amount == 0 {
        panic!("Amount must be non-zero");
    }

    let config = get_config(env);
    let state = get_state(env);
    validate_ticks(tick_lower, tick_upper, config.tick_spacing);

    let (amount0, amount1) = get_amounts_for_liquidity(
        env,
        state.sqrt_price_x96,
        get_sqrt_ratio_at_tick(env, tick_lower),
        get_sqrt_ratio_at_tick(env, tick_upper),
        amount,
        true,
    );

    let key = PositionKey {
        owner: recipient.clone(),
        tick_lower,
        tick_upper,
    };
    update_position(env, &key, amount as i128);

    let range_liquidity = get_range_liquidity(env, tick_lower, tick_upper);
    set_range_liquidity(env, tick_lower, tick_upper, add_delta(range_liquidity, amount as i128));

    let pool = env.current_contract_address();
    if amount0 > 0 {
        token::Client::new(env, &config.token0).transfer_from(&pool, &recipient, &pool, &(amount0 as i128));
    }
    if amount1 > 0 {
        token::Client::new(env, &config.token1).transfer_from(&pool, &recipient, &pool, &(amount1 as i128));
    }

    (amount0, amount1)
}

/// Burn (remove) liquidity from a position; the amounts become owed to the owner
pub fn burn(env: &Env, owner: Address, tick_lower: i32, tick_upper: i32, amount: u128) -> (u128, u128) {
    let config = get_config(env);
    let state = get_state(env);
    validate_ticks(tick_lower, tick_upper, config.tick_spacing);

    let (amount0, amount1) = get_amounts_for_liquidity(
        env,
        state.sqrt_price_x96,
        get_sqrt_ratio_at_tick(env, tick_lower),
        get_sqrt_ratio_at_tick(env, tick_upper),
        amount,
        false,
    );

    let key = PositionKey {
        owner,
        tick_lower,
        tick_upper,
    };
    update_position(env, &key, -(amount as i128));

    if amount > 0 {
        let range_liquidity = get_range_liquidity(env, tick_lower, tick_upper);
        set_range_liquidity(env, tick_lower, tick_upper, add_delta(range_liquidity, -(amount as i128)));
    }

    let mut position = get_position(env, &key);
    position.tokens_owed_0 += amount0;
    position.tokens_owed_1 += amount1;
    set_position(env, &key, &position);

    (amount0, amount1)
}

/// Collect owed tokens (burned principal and fees) from a position
pub fn collect(
    env: &Env,
    owner: Address,
    recipient: Address,
    tick_lower: i32,
    tick_upper: i32,
    amount0_requested: u128,
    amount1_requested: u128,
) -> (u128, u128) {
    let config = get_config(env);
    let key = PositionKey {
        owner,
        tick_lower,
        tick_upper,
    };

    let mut position = get_position(env, &key);
    let amount0 = amount0_requested.min(position.tokens_owed_0);
    let amount1 = amount1_requested.min(position.tokens_owed_1);

    position.tokens_owed_0 -= amount0;
    position.tokens_owed_1 -= amount1;
    set_position(env, &key, &position);

    let pool = env.current_contract_address();
    if amount0 > 0 {
        token::Client::new(env, &config.token0).transfer(&pool, &recipient, &(amount0 as i128));
    }
    if amount1 > 0 {
        token::Client::new(env, &config.token1).transfer(&pool, &recipient, &(amount1 as i128));
    }

    (amount0, amount1)
}

/// Credit fees to every position on a range in proportion to its liquidity
pub fn accrue_fees(env: &Env, tick_lower: i32, tick_upper: i32, amount0: u128, amount1: u128) {
    let range_liquidity = get_range_liquidity(env, tick_lower, tick_upper);
    let (growth0, growth1) = get_fee_growth_inside(env, tick_lower, tick_upper);

    let growth0 = growth0.wrapping_add(fee_growth_delta_x128(env, amount0, range_liquidity));
    let growth1 = growth1.wrapping_add(fee_growth_delta_x128(env, amount1, range_liquidity));
    set_fee_growth_inside(env, tick_lower, tick_upper, (growth0, growth1));
}

/// Update a position with liquidity change and fee accumulation
fn update_position(env: &Env, key: &PositionKey, liquidity_delta: i128) {
    let mut position = get_position(env, key);
    let (growth0, growth1) = get_fee_growth_inside(env, key.tick_lower, key.tick_upper);

    if position.liquidity > 0 {
        position.tokens_owed_0 += fees_owed(env, growth0, position.fee_growth_inside_0_last_x128, position.liquidity);
        position.tokens_owed_1 += fees_owed(env, growth1, position.fee_growth_inside_1_last_x128, position.liquidity);
    }

    position.liquidity = add_delta(position.liquidity, liquidity_delta);
    position.fee_growth_inside_0_last_x128 = growth0;
    position.fee_growth_inside_1_last_x128 = growth1;

    set_position(env, key, &position);
}

/// Validate tick parameters
pub fn validate_ticks(tick_lower: i32, tick_upper: i32, tick_spacing: i32) {
    if tick_lower >= tick_upper {
        panic!("tick_lower must be less than tick_upper");
    }
    if tick_lower < rebalancer_types::MIN_TICK {
        panic!("tick_lower too low");
    }
    if tick_upper > rebalancer_types::MAX_TICK {
        panic!("tick_upper too high");
    }
    if tick_lower % tick_spacing != 0 || tick_upper % tick_spacing != 0 {
        panic!("tick not on spacing");
    }
}
