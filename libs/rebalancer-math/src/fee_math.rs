use crate::full_math::to_u128;
use soroban_sdk::{Env, U256};

/// Growth of the per-liquidity fee accumulator (Q128) when `fees` are shared by `liquidity`
pub fn fee_growth_delta_x128(env: &Env, fees: u128, liquidity: u128) -> u128 {
    if liquidity == 0 {
        panic!("No liquidity to accrue fees");
    }
    let growth = U256::from_u128(env, fees)
        .shl(128)
        .div(&U256::from_u128(env, liquidity));
    to_u128(&growth)
}

/// Tokens owed to `liquidity` for the accumulator moving from `last_x128` to `current_x128`.
///
/// The accumulator is allowed to wrap, so the delta is taken modulo 2^128.
pub fn fees_owed(env: &Env, current_x128: u128, last_x128: u128, liquidity: u128) -> u128 {
    let delta = current_x128.wrapping_sub(last_x128);
    let owed = U256::from_u128(env, delta)
        .mul(&U256::from_u128(env, liquidity))
        .shr(128);
    to_u128(&owed)
}
