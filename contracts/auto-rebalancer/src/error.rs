use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum RebalancerError {
    /// Width preset outside the preset table, or an invalid trigger policy
    InvalidRangeParameter = 1,
    /// Selected range falls outside the usable tick grid
    TickOutOfBounds = 2,
    /// Id was never allocated
    PositionNotFound = 3,
    /// Position has already been withdrawn
    PositionClosed = 4,
    NotPositionOwner = 5,
    RebalanceNotEligible = 6,
    /// Zero amount, short balance or allowance, or nothing mintable
    InsufficientFunds = 7,
    /// The token contract refused the deposit pull
    TransferRejected = 8,
    AlreadyInitialized = 9,
    NotInitialized = 10,
    /// Deposit token is not one of the pool's tokens
    InvalidToken = 11,
}
