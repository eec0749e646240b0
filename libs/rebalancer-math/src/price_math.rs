use crate::full_math::mul_div;
use crate::liquidity_math::get_amounts_for_liquidity;
use rebalancer_types::Q96;
use soroban_sdk::Env;

/// Reference liquidity used to read a range's token ratio
const REFERENCE_LIQUIDITY: u128 = 1 << 64;

/// Value of `amount0` in token1 at the spot price
pub fn quote_token0_in_token1(env: &Env, sqrt_price_x96: u128, amount0: u128) -> u128 {
    let partial = mul_div(env, amount0, sqrt_price_x96, Q96);
    mul_div(env, partial, sqrt_price_x96, Q96)
}

/// Value of `amount1` in token0 at the spot price
pub fn quote_token1_in_token0(env: &Env, sqrt_price_x96: u128, amount1: u128) -> u128 {
    let partial = mul_div(env, amount1, Q96, sqrt_price_x96);
    mul_div(env, partial, Q96, sqrt_price_x96)
}

/// Single swap that moves `(amount0, amount1)` towards the token ratio a range
/// needs at the current price.
///
/// Returns `(zero_for_one, amount_in)`, or `None` when no swap is needed.
/// Sizing is done at the spot price and ignores fees and price impact, so the
/// bought side ends up marginally short and a small remainder of the sold
/// side is left over.
pub fn swap_to_range_ratio(
    env: &Env,
    sqrt_price_x96: u128,
    sqrt_lower_x96: u128,
    sqrt_upper_x96: u128,
    amount0: u128,
    amount1: u128,
) -> Option<(bool, u128)> {
    // Range entirely above the price: only token0 can be deposited
    if sqrt_price_x96 <= sqrt_lower_x96 {
        return (amount1 > 0).then_some((false, amount1));
    }
    // Range entirely below the price: only token1 can be deposited
    if sqrt_price_x96 >= sqrt_upper_x96 {
        return (amount0 > 0).then_some((true, amount0));
    }

    let (ratio0, ratio1) = get_amounts_for_liquidity(
        env,
        sqrt_price_x96,
        sqrt_lower_x96,
        sqrt_upper_x96,
        REFERENCE_LIQUIDITY,
        false,
    );
    let weight0 = quote_token0_in_token1(env, sqrt_price_x96, ratio0);
    let weight1 = ratio1;
    if weight0 + weight1 == 0 {
        return None;
    }

    // Everything valued in token1
    let value0 = quote_token0_in_token1(env, sqrt_price_x96, amount0);
    let total = value0 + amount1;
    let target_value0 = mul_div(env, total, weight0, weight0 + weight1);

    let swap = if value0 > target_value0 {
        let keep0 = quote_token1_in_token0(env, sqrt_price_x96, target_value0);
        (true, amount0.saturating_sub(keep0))
    } else {
        (false, (target_value0 - value0).min(amount1))
    };

    (swap.1 > 0).then_some(swap)
}
