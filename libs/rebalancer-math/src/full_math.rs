use soroban_sdk::{Env, U256};

/// Multiply and divide with 256-bit intermediate precision (rounds down)
/// Returns (a * b) / denominator
pub fn mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    let (quotient, _) = mul_div_rem(env, a, b, denominator);
    to_u128(&quotient)
}

/// Multiply and divide with 256-bit intermediate precision (rounds up)
/// Returns ceil((a * b) / denominator)
pub fn mul_div_rounding_up(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    let (quotient, has_remainder) = mul_div_rem(env, a, b, denominator);
    let result = to_u128(&quotient);
    if has_remainder {
        match result.checked_add(1) {
            Some(v) => v,
            None => panic!("U256 overflow when converting to u128"),
        }
    } else {
        result
    }
}

/// U256 division rounding down or up
pub fn div_u256(env: &Env, numerator: &U256, denominator: &U256, round_up: bool) -> U256 {
    if *denominator == U256::from_u32(env, 0) {
        panic!("Division by zero");
    }
    let quotient = numerator.div(denominator);
    if round_up && numerator.rem_euclid(denominator) != U256::from_u32(env, 0) {
        quotient.add(&U256::from_u32(env, 1))
    } else {
        quotient
    }
}

/// Narrow a U256 back to u128, panics if it does not fit
pub fn to_u128(value: &U256) -> u128 {
    match value.to_u128() {
        Some(v) => v,
        None => panic!("U256 overflow when converting to u128"),
    }
}

fn mul_div_rem(env: &Env, a: u128, b: u128, denominator: u128) -> (U256, bool) {
    if denominator == 0 {
        panic!("Division by zero");
    }
    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let denominator = U256::from_u128(env, denominator);
    let remainder = product.rem_euclid(&denominator);
    (product.div(&denominator), remainder != U256::from_u32(env, 0))
}
