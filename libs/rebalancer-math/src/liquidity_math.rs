use crate::full_math::{div_u256, mul_div, mul_div_rounding_up, to_u128};
use rebalancer_types::Q96;
use soroban_sdk::{Env, U256};

/// Calculate the largest liquidity the given token amounts support for a price range
pub fn get_liquidity_for_amounts(
    env: &Env,
    sqrt_ratio_x96: u128,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    amount0: u128,
    amount1: u128,
) -> u128 {
    let (sqrt_lower, sqrt_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= sqrt_lower {
        // Below range - all token0
        liquidity_for_amount0(env, sqrt_lower, sqrt_upper, amount0)
    } else if sqrt_ratio_x96 < sqrt_upper {
        let liquidity0 = liquidity_for_amount0(env, sqrt_ratio_x96, sqrt_upper, amount0);
        let liquidity1 = liquidity_for_amount1(env, sqrt_lower, sqrt_ratio_x96, amount1);
        liquidity0.min(liquidity1)
    } else {
        // Above range - all token1
        liquidity_for_amount1(env, sqrt_lower, sqrt_upper, amount1)
    }
}

/// Token amounts represented by `liquidity` at the current price.
///
/// Mints round up and burns round down so the pool never pays out more
/// than it received. With `round_up` the result never exceeds the amounts
/// `get_liquidity_for_amounts` was given for the same liquidity.
pub fn get_amounts_for_liquidity(
    env: &Env,
    sqrt_ratio_x96: u128,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
    round_up: bool,
) -> (u128, u128) {
    let (sqrt_lower, sqrt_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= sqrt_lower {
        let amount0 = amount0_for_liquidity(env, sqrt_lower, sqrt_upper, liquidity, round_up);
        (amount0, 0)
    } else if sqrt_ratio_x96 < sqrt_upper {
        let amount0 = amount0_for_liquidity(env, sqrt_ratio_x96, sqrt_upper, liquidity, round_up);
        let amount1 = amount1_for_liquidity(env, sqrt_lower, sqrt_ratio_x96, liquidity, round_up);
        (amount0, amount1)
    } else {
        let amount1 = amount1_for_liquidity(env, sqrt_lower, sqrt_upper, liquidity, round_up);
        (0, amount1)
    }
}

/// Add signed liquidity delta to unsigned liquidity
pub fn add_delta(liquidity: u128, delta: i128) -> u128 {
    if delta < 0 {
        match liquidity.checked_sub(delta.unsigned_abs()) {
            Some(result) => result,
            None => panic!("Liquidity underflow"),
        }
    } else {
        match liquidity.checked_add(delta as u128) {
            Some(result) => result,
            None => panic!("Liquidity overflow"),
        }
    }
}

fn sorted(a: u128, b: u128) -> (u128, u128) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// floor(sqrt_lower * sqrt_upper / 2^96), the shared denominator of token0 math
fn price_product(env: &Env, sqrt_lower: u128, sqrt_upper: u128) -> U256 {
    U256::from_u128(env, sqrt_lower)
        .mul(&U256::from_u128(env, sqrt_upper))
        .shr(96)
}

/// L = amount0 * (sqrt_lower * sqrt_upper / 2^96) / (sqrt_upper - sqrt_lower)
fn liquidity_for_amount0(env: &Env, sqrt_lower: u128, sqrt_upper: u128, amount0: u128) -> u128 {
    let numerator = U256::from_u128(env, amount0).mul(&price_product(env, sqrt_lower, sqrt_upper));
    let denominator = U256::from_u128(env, sqrt_upper - sqrt_lower);
    to_u128(&div_u256(env, &numerator, &denominator, false))
}

/// L = amount1 * 2^96 / (sqrt_upper - sqrt_lower)
fn liquidity_for_amount1(env: &Env, sqrt_lower: u128, sqrt_upper: u128, amount1: u128) -> u128 {
    mul_div(env, amount1, Q96, sqrt_upper - sqrt_lower)
}

/// amount0 = L * (sqrt_upper - sqrt_lower) / (sqrt_lower * sqrt_upper / 2^96)
fn amount0_for_liquidity(
    env: &Env,
    sqrt_lower: u128,
    sqrt_upper: u128,
    liquidity: u128,
    round_up: bool,
) -> u128 {
    let numerator = U256::from_u128(env, liquidity).mul(&U256::from_u128(env, sqrt_upper - sqrt_lower));
    let denominator = price_product(env, sqrt_lower, sqrt_upper);
    to_u128(&div_u256(env, &numerator, &denominator, round_up))
}

/// amount1 = L * (sqrt_upper - sqrt_lower) / 2^96
fn amount1_for_liquidity(
    env: &Env,
    sqrt_lower: u128,
    sqrt_upper: u128,
    liquidity: u128,
    round_up: bool,
) -> u128 {
    if round_up {
        mul_div_rounding_up(env, liquidity, sqrt_upper - sqrt_lower, Q96)
    } else {
        mul_div(env, liquidity, sqrt_upper - sqrt_lower, Q96)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tick_math::get_sqrt_ratio_at_tick;
    use soroban_sdk::Env;

    #[test]
    fn test_add_delta() {
        assert_eq!(add_delta(100, 50), 150);
        assert_eq!(add_delta(100, -50), 50);
        assert_eq!(add_delta(100, -100), 0);
        assert_eq!(add_delta(0, i128::MAX), i128::MAX as u128);
    }

    #[test]
    #[should_panic(expected = "Liquidity underflow")]
    fn test_add_delta_underflow() {
        add_delta(50, -100);
    }

    #[test]
    fn test_liquidity_in_range_uses_both_tokens() {
        let env = Env::default();
        let sqrt_lower = Q96 * 9 / 10;
        let sqrt_upper = Q96 * 11 / 10;

        let both = get_liquidity_for_amounts(&env, Q96, sqrt_lower, sqrt_upper, 1_000_000, 1_000_000);
        assert!(both > 0);

        // Missing one side limits liquidity to zero in range
        let one_sided = get_liquidity_for_amounts(&env, Q96, sqrt_lower, sqrt_upper, 1_000_000, 0);
        assert_eq!(one_sided, 0);
    }

    #[test]
    fn test_liquidity_out_of_range_uses_one_token() {
        let env = Env::default();
        let sqrt_lower = Q96 * 9 / 10;
        let sqrt_upper = Q96 * 11 / 10;

        let below = Q96 * 8 / 10;
        let l0 = get_liquidity_for_amounts(&env, below, sqrt_lower, sqrt_upper, 1_000_000, 0);
        let l0_extra = get_liquidity_for_amounts(&env, below, sqrt_lower, sqrt_upper, 1_000_000, 5_000_000);
        assert!(l0 > 0);
        assert_eq!(l0, l0_extra);

        let above = Q96 * 12 / 10;
        let l1 = get_liquidity_for_amounts(&env, above, sqrt_lower, sqrt_upper, 0, 1_000_000);
        assert!(l1 > 0);
        let (amount0, amount1) = get_amounts_for_liquidity(&env, above, sqrt_lower, sqrt_upper, l1, false);
        assert_eq!(amount0, 0);
        assert!(amount1 <= 1_000_000);
    }

    #[test]
    fn test_liquidity_order_independent() {
        let env = Env::default();
        let a = Q96 * 9 / 10;
        let b = Q96 * 11 / 10;
        assert_eq!(
            get_liquidity_for_amounts(&env, Q96, a, b, 1_000_000_000, 1_000_000_000),
            get_liquidity_for_amounts(&env, Q96, b, a, 1_000_000_000, 1_000_000_000)
        );
    }

    #[test]
    fn test_rounded_up_amounts_never_exceed_inputs() {
        let env = Env::default();
        let sqrt_price = get_sqrt_ratio_at_tick(&env, 3);
        let sqrt_lower = get_sqrt_ratio_at_tick(&env, -10);
        let sqrt_upper = get_sqrt_ratio_at_tick(&env, 10);

        for (amount0, amount1) in [(1_000_000u128, 1_000_000u128), (999_999, 3), (7, 500_000), (10u128.pow(15), 10u128.pow(15))] {
            let liquidity =
                get_liquidity_for_amounts(&env, sqrt_price, sqrt_lower, sqrt_upper, amount0, amount1);
            let (need0, need1) =
                get_amounts_for_liquidity(&env, sqrt_price, sqrt_lower, sqrt_upper, liquidity, true);
            assert!(need0 <= amount0, "token0 required {} > supplied {}", need0, amount0);
            assert!(need1 <= amount1, "token1 required {} > supplied {}", need1, amount1);
        }
    }

    #[test]
    fn test_burn_rounding_never_exceeds_mint_rounding() {
        let env = Env::default();
        let sqrt_price = get_sqrt_ratio_at_tick(&env, 0);
        let sqrt_lower = get_sqrt_ratio_at_tick(&env, -60);
        let sqrt_upper = get_sqrt_ratio_at_tick(&env, 60);
        let liquidity = 123_456_789_012u128;

        let (mint0, mint1) = get_amounts_for_liquidity(&env, sqrt_price, sqrt_lower, sqrt_upper, liquidity, true);
        let (burn0, burn1) = get_amounts_for_liquidity(&env, sqrt_price, sqrt_lower, sqrt_upper, liquidity, false);
        assert!(burn0 <= mint0 && mint0 - burn0 <= 1);
        assert!(burn1 <= mint1 && mint1 - burn1 <= 1);
    }

    #[test]
    fn test_large_liquidity_does_not_overflow() {
        let env = Env::default();
        let sqrt_price = get_sqrt_ratio_at_tick(&env, 0);
        let sqrt_lower = get_sqrt_ratio_at_tick(&env, -10);
        let sqrt_upper = get_sqrt_ratio_at_tick(&env, 10);

        let (amount0, amount1) =
            get_amounts_for_liquidity(&env, sqrt_price, sqrt_lower, sqrt_upper, 1u128 << 80, false);
        assert!(amount0 > 0);
        assert!(amount1 > 0);
    }

    #[test]
    fn test_narrow_range_gives_more_liquidity() {
        let env = Env::default();
        let narrow = get_liquidity_for_amounts(
            &env,
            Q96,
            Q96 * 99 / 100,
            Q96 * 101 / 100,
            1_000_000_000_000,
            1_000_000_000_000,
        );
        let wide = get_liquidity_for_amounts(
            &env,
            Q96,
            Q96 * 8 / 10,
            Q96 * 12 / 10,
            1_000_000_000_000,
            1_000_000_000_000,
        );
        assert!(narrow > wide);
    }
}
