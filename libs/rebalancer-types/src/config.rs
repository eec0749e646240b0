use soroban_sdk::{contracttype, Address};

/// When an open position becomes eligible for rebalancing
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TriggerPolicy {
    /// Eligible once the tick is within `margin` ticks of either bound (or past it).
    /// A zero margin means "only when out of range".
    PriceDrift(i32),
    /// Eligible once this many seconds have passed since the last open/rebalance
    Elapsed(u64),
    /// Eligible when either of the above holds
    Either(i32, u64),
}

impl TriggerPolicy {
    pub fn is_valid(&self) -> bool {
        match *self {
            TriggerPolicy::PriceDrift(margin) => margin >= 0,
            TriggerPolicy::Elapsed(interval) => interval > 0,
            TriggerPolicy::Either(margin, interval) => margin >= 0 && interval > 0,
        }
    }
}

/// Rebalancer configuration - written once by `initialize`
#[contracttype]
#[derive(Clone, Debug)]
pub struct RebalancerConfig {
    /// Pool contract the positions live in
    pub pool: Address,
    /// Pool token0
    pub token0: Address,
    /// Pool token1
    pub token1: Address,
    /// Token users deposit (token0 or token1)
    pub deposit_token: Address,
    /// Pool tick spacing
    pub tick_spacing: i32,
    /// Rebalance eligibility rule
    pub trigger_policy: TriggerPolicy,
}

impl RebalancerConfig {
    pub fn deposits_token0(&self) -> bool {
        self.deposit_token == self.token0
    }
}
