#![no_std]

mod config;
mod pool;
mod position;

pub use config::*;
pub use pool::*;
pub use position::*;

/// Q96 constant (2^96) for fixed-point math
pub const Q96: u128 = 1 << 96;

/// Minimum tick index
/// Limited by u128 representation (originally -887272 for uint160)
pub const MIN_TICK: i32 = -443636;

/// Maximum tick index
/// Limited by u128 representation (originally 887272 for uint160)
pub const MAX_TICK: i32 = 443636;

/// Minimum sqrt price (at MIN_TICK)
pub const MIN_SQRT_RATIO: u128 = 18446743374134;

/// Maximum sqrt price (at MAX_TICK), bounded by u128::MAX
pub const MAX_SQRT_RATIO: u128 = 340275971719517849884101479065584693834;

/// Get tick spacing for a given fee amount
pub fn fee_to_tick_spacing(fee: u32) -> Option<i32> {
    match fee {
        500 => Some(10),    // 0.05%
        3000 => Some(60),   // 0.3%
        10000 => Some(200), // 1%
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_to_tick_spacing() {
        assert_eq!(fee_to_tick_spacing(500), Some(10));
        assert_eq!(fee_to_tick_spacing(3000), Some(60));
        assert_eq!(fee_to_tick_spacing(10000), Some(200));
        assert_eq!(fee_to_tick_spacing(100), None);
    }
}
