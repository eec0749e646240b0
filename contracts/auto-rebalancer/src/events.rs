use rebalancer_types::TickRange;
use soroban_sdk::{Address, Env, Symbol};

pub fn position_opened(env: &Env, id: u32, owner: &Address, liquidity: u128, range: TickRange) {
    env.events().publish(
        (Symbol::new(env, "position_opened"), id),
        (owner.clone(), liquidity, range.tick_lower, range.tick_upper),
    );
}

pub fn position_closed(env: &Env, id: u32, owner: &Address, amount0: u128, amount1: u128) {
    env.events().publish(
        (Symbol::new(env, "position_closed"), id),
        (owner.clone(), amount0, amount1),
    );
}

/// `caller` is whoever triggered the rebalance, not necessarily the owner
pub fn position_rebalanced(env: &Env, id: u32, caller: &Address, liquidity: u128, range: TickRange) {
    env.events().publish(
        (Symbol::new(env, "position_rebalanced"), id),
        (caller.clone(), liquidity, range.tick_lower, range.tick_upper),
    );
}
