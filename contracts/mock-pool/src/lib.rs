#![no_std]

//! Minimal concentrated-liquidity pool used as the rebalancer's counterparty in tests.
//!
//! Positions, burns, collects and fee accounting follow the usual per-range
//! accumulator model. Swaps execute at the spot price less the pool fee and do
//! not move the price; tests move it explicitly with `set_tick`.

mod liquidity;
mod storage;

use rebalancer_math::{get_sqrt_ratio_at_tick, mul_div, quote_token0_in_token1, quote_token1_in_token0};
use rebalancer_types::{fee_to_tick_spacing, PoolConfig, PoolState, PositionInfo, PositionKey};
use soroban_sdk::{contract, contractimpl, token, Address, Env};
use storage::{get_config, get_state, is_initialized, set_config, set_state};

/// Fee denominator (fees are expressed in hundredths of a bip)
const FEE_DENOMINATOR: u128 = 1_000_000;

#[contract]
pub struct MockPool;

#[contractimpl]
impl MockPool {
    /// Initialize the pool at a starting tick
    pub fn initialize(env: Env, token0: Address, token1: Address, fee: u32, tick: i32) {
        if is_initialized(&env) {
            panic!("Already initialized");
        }
        if token0 >= token1 {
            panic!("token0 must be less than token1");
        }
        let tick_spacing = fee_to_tick_spacing(fee).unwrap_or_else(|| panic!("Unsupported fee"));

        set_config(
            &env,
            &PoolConfig {
                token0,
                token1,
                fee,
                tick_spacing,
            },
        );
        set_state(
            &env,
            &PoolState {
                sqrt_price_x96: get_sqrt_ratio_at_tick(&env, tick),
                tick,
            },
        );
    }

    /// Add liquidity to a position
    ///
    /// # Returns
    /// (amount0, amount1) - Token amounts pulled from `recipient`
    pub fn mint(
        env: Env,
        recipient: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
    ) -> (u128, u128) {
        recipient.require_auth();
        liquidity::mint(&env, recipient, tick_lower, tick_upper, amount)
    }

    /// Remove liquidity from a position
    ///
    /// # Returns
    /// (amount0, amount1) - Token amounts credited to the position's owed balance
    pub fn burn(env: Env, owner: Address, tick_lower: i32, tick_upper: i32, amount: u128) -> (u128, u128) {
        owner.require_auth();
        liquidity::burn(&env, owner, tick_lower, tick_upper, amount)
    }

    /// Collect owed tokens from a position
    ///
    /// # Returns
    /// (amount0, amount1) - Amounts transferred to `recipient`
    pub fn collect(
        env: Env,
        owner: Address,
        recipient: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: u128,
        amount1_requested: u128,
    ) -> (u128, u128) {
        owner.require_auth();
        liquidity::collect(
            &env,
            owner,
            recipient,
            tick_lower,
            tick_upper,
            amount0_requested,
            amount1_requested,
        )
    }

    /// Exact-input swap at the spot price, less the pool fee
    ///
    /// # Returns
    /// Amount of the output token sent to `recipient`
    pub fn swap(env: Env, sender: Address, recipient: Address, zero_for_one: bool, amount_in: u128) -> u128 {
        sender.require_auth();
        if amount_in == 0 {
            panic!("Amount must be non-zero");
        }

        let config = get_config(&env);
        let state = get_state(&env);

        let amount_in_less_fee = mul_div(
            &env,
            amount_in,
            FEE_DENOMINATOR - config.fee as u128,
            FEE_DENOMINATOR,
        );
        let (token_in, token_out, amount_out) = if zero_for_one {
            (
                config.token0,
                config.token1,
                quote_token0_in_token1(&env, state.sqrt_price_x96, amount_in_less_fee),
            )
        } else {
            (
                config.token1,
                config.token0,
                quote_token1_in_token0(&env, state.sqrt_price_x96, amount_in_less_fee),
            )
        };

        let pool = env.current_contract_address();
        let token_out = token::Client::new(&env, &token_out);
        if token_out.balance(&pool) < amount_out as i128 {
            panic!("Insufficient liquidity");
        }

        token::Client::new(&env, &token_in).transfer_from(&pool, &sender, &pool, &(amount_in as i128));
        if amount_out > 0 {
            token_out.transfer(&pool, &recipient, &(amount_out as i128));
        }

        amount_out
    }

    // === Test hooks ===

    /// Move the pool price to `tick`
    pub fn set_tick(env: Env, tick: i32) {
        let mut state = get_state(&env);
        state.tick = tick;
        state.sqrt_price_x96 = get_sqrt_ratio_at_tick(&env, tick);
        set_state(&env, &state);
    }

    /// Pay trading fees into a range, shared by its liquidity
    pub fn accrue_fees(env: Env, payer: Address, tick_lower: i32, tick_upper: i32, amount0: u128, amount1: u128) {
        payer.require_auth();
        let config = get_config(&env);
        let pool = env.current_contract_address();
        if amount0 > 0 {
            token::Client::new(&env, &config.token0).transfer(&payer, &pool, &(amount0 as i128));
        }
        if amount1 > 0 {
            token::Client::new(&env, &config.token1).transfer(&payer, &pool, &(amount1 as i128));
        }
        liquidity::accrue_fees(&env, tick_lower, tick_upper, amount0, amount1);
    }

    // === View Functions ===

    /// Get current pool state
    pub fn get_state(env: Env) -> PoolState {
        get_state(&env)
    }

    /// Get pool configuration
    pub fn get_config(env: Env) -> PoolConfig {
        get_config(&env)
    }

    /// Fee growth accumulated inside a range, per unit of liquidity (Q128)
    pub fn fee_growth_inside(env: Env, tick_lower: i32, tick_upper: i32) -> (u128, u128) {
        storage::get_fee_growth_inside(&env, tick_lower, tick_upper)
    }

    /// Get position info
    pub fn get_position(env: Env, owner: Address, tick_lower: i32, tick_upper: i32) -> PositionInfo {
        storage::get_position(
            &env,
            &PositionKey {
                owner,
                tick_lower,
                tick_upper,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rebalancer_types::Q96;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::token::StellarAssetClient;
    use soroban_sdk::{Address, Env};

    struct Setup {
        env: Env,
        pool: Address,
        token0: Address,
        token1: Address,
    }

    impl Setup {
        fn client(&self) -> MockPoolClient<'_> {
            MockPoolClient::new(&self.env, &self.pool)
        }

        fn fund(&self, to: &Address, amount0: i128, amount1: i128) {
            StellarAssetClient::new(&self.env, &self.token0).mint(to, &amount0);
            StellarAssetClient::new(&self.env, &self.token1).mint(to, &amount1);
        }

        fn approve(&self, from: &Address, amount0: i128, amount1: i128) {
            let expiration = self.env.ledger().sequence() + 1000;
            token::Client::new(&self.env, &self.token0).approve(from, &self.pool, &amount0, &expiration);
            token::Client::new(&self.env, &self.token1).approve(from, &self.pool, &amount1, &expiration);
        }

        fn balances(&self, of: &Address) -> (i128, i128) {
            (
                token::Client::new(&self.env, &self.token0).balance(of),
                token::Client::new(&self.env, &self.token1).balance(of),
            )
        }
    }

    fn setup(fee: u32) -> Setup {
        let env = Env::default();
        env.mock_all_auths();

        let admin = Address::generate(&env);
        let a = env.register_stellar_asset_contract_v2(admin.clone()).address();
        let b = env.register_stellar_asset_contract_v2(admin).address();
        let (token0, token1) = if a < b { (a, b) } else { (b, a) };

        let pool = env.register(MockPool, ());
        MockPoolClient::new(&env, &pool).initialize(&token0, &token1, &fee, &0);

        Setup {
            env,
            pool,
            token0,
            token1,
        }
    }

    #[test]
    fn test_initialize_pool() {
        let s = setup(3000);
        let client = s.client();

        let state = client.get_state();
        assert_eq!(state.sqrt_price_x96, Q96);
        assert_eq!(state.tick, 0);

        let config = client.get_config();
        assert_eq!(config.token0, s.token0);
        assert_eq!(config.token1, s.token1);
        assert_eq!(config.fee, 3000);
        assert_eq!(config.tick_spacing, 60);
    }

    #[test]
    #[should_panic(expected = "Already initialized")]
    fn test_initialize_twice_fails() {
        let s = setup(3000);
        s.client().initialize(&s.token0, &s.token1, &3000, &0);
    }

    #[test]
    #[should_panic(expected = "Unsupported fee")]
    fn test_initialize_unsupported_fee() {
        let env = Env::default();
        let token0 = Address::generate(&env);
        let token1 = Address::generate(&env);
        let (t0, t1) = if token0 < token1 {
            (token0, token1)
        } else {
            (token1, token0)
        };
        let pool = env.register(MockPool, ());
        MockPoolClient::new(&env, &pool).initialize(&t0, &t1, &1234, &0);
    }

    #[test]
    fn test_set_tick_moves_price() {
        let s = setup(500);
        let client = s.client();
        client.set_tick(&-250);
        let state = client.get_state();
        assert_eq!(state.tick, -250);
        assert_eq!(state.sqrt_price_x96, get_sqrt_ratio_at_tick(&s.env, -250));
    }

    #[test]
    fn test_mint_burn_collect_round_trip() {
        let s = setup(3000);
        let client = s.client();
        let lp = Address::generate(&s.env);
        s.fund(&lp, 100_000_000, 100_000_000);
        s.approve(&lp, 100_000_000, 100_000_000);

        let liquidity = 1_000_000_000u128;
        let (minted0, minted1) = client.mint(&lp, &-600, &600, &liquidity);
        assert!(minted0 > 0 && minted1 > 0);
        assert_eq!(
            s.balances(&lp),
            (100_000_000 - minted0 as i128, 100_000_000 - minted1 as i128)
        );
        assert_eq!(client.get_position(&lp, &-600, &600).liquidity, liquidity);

        let (burned0, burned1) = client.burn(&lp, &-600, &600, &liquidity);
        // Burning rounds down, minting rounds up
        assert!(burned0 <= minted0 && minted0 - burned0 <= 1);
        assert!(burned1 <= minted1 && minted1 - burned1 <= 1);

        let (collected0, collected1) = client.collect(&lp, &lp, &-600, &600, &u128::MAX, &u128::MAX);
        assert_eq!((collected0, collected1), (burned0, burned1));
        assert_eq!(client.get_position(&lp, &-600, &600), PositionInfo::default());
    }

    #[test]
    fn test_accrued_fees_are_collectable() {
        let s = setup(3000);
        let client = s.client();
        let lp = Address::generate(&s.env);
        let trader = Address::generate(&s.env);
        s.fund(&lp, 100_000_000, 100_000_000);
        s.approve(&lp, 100_000_000, 100_000_000);
        s.fund(&trader, 1_000, 2_000);

        client.mint(&lp, &-600, &600, &1_000_000_000);
        client.accrue_fees(&trader, &-600, &600, &1_000, &2_000);

        let (growth0, growth1) = client.fee_growth_inside(&-600, &600);
        assert!(growth0 > 0 && growth1 > growth0);

        // A zero burn settles fees into the owed balance
        client.burn(&lp, &-600, &600, &0);
        let (fees0, fees1) = client.collect(&lp, &lp, &-600, &600, &u128::MAX, &u128::MAX);
        assert!(fees0 >= 999 && fees0 <= 1_000);
        assert!(fees1 >= 1_999 && fees1 <= 2_000);
    }

    #[test]
    fn test_fees_only_reach_the_paid_range() {
        let s = setup(3000);
        let client = s.client();
        let lp = Address::generate(&s.env);
        let trader = Address::generate(&s.env);
        s.fund(&lp, 100_000_000, 100_000_000);
        s.approve(&lp, 100_000_000, 100_000_000);
        s.fund(&trader, 1_000, 0);

        client.mint(&lp, &-600, &600, &1_000_000);
        client.mint(&lp, &-120, &120, &1_000_000);
        client.accrue_fees(&trader, &-120, &120, &1_000, &0);

        assert_eq!(client.fee_growth_inside(&-600, &600), (0, 0));
        client.burn(&lp, &-600, &600, &0);
        assert_eq!(client.get_position(&lp, &-600, &600).tokens_owed_0, 0);
    }

    #[test]
    fn test_swap_at_spot_less_fee() {
        let s = setup(3000);
        let client = s.client();
        let trader = Address::generate(&s.env);
        s.fund(&s.pool, 0, 1_000_000);
        s.fund(&trader, 10_000, 0);
        s.approve(&trader, 10_000, 0);

        let out = client.swap(&trader, &trader, &true, &10_000);
        // 0.3% fee at price 1
        assert_eq!(out, 9_970);
        assert_eq!(s.balances(&trader), (0, 9_970));
        assert_eq!(s.balances(&s.pool), (10_000, 1_000_000 - 9_970));
    }

    #[test]
    fn test_swap_token1_for_token0() {
        let s = setup(500);
        let client = s.client();
        let trader = Address::generate(&s.env);
        s.fund(&s.pool, 1_000_000, 0);
        s.fund(&trader, 0, 100_000);
        s.approve(&trader, 0, 100_000);

        let out = client.swap(&trader, &trader, &false, &100_000);
        assert_eq!(out, 99_950);
    }

    #[test]
    #[should_panic(expected = "Insufficient liquidity")]
    fn test_swap_without_reserves_fails() {
        let s = setup(3000);
        let trader = Address::generate(&s.env);
        s.fund(&trader, 10_000, 0);
        s.approve(&trader, 10_000, 0);
        s.client().swap(&trader, &trader, &true, &10_000);
    }

    #[test]
    #[should_panic(expected = "tick not on spacing")]
    fn test_mint_off_spacing_fails() {
        let s = setup(3000);
        let lp = Address::generate(&s.env);
        s.client().mint(&lp, &-50, &60, &1_000);
    }
}
