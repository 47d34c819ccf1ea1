use soroban_sdk::{contracterror, contracttype, Address};

/// Smallest-unit scale of one whole sale token (7 decimals).
pub const TOKEN_UNIT: i128 = 10_000_000;
/// Smallest-unit scale of one whole payment-asset unit (7 decimals).
pub const NATIVE_UNIT: i128 = 10_000_000;

/// Additive bonus percentages. The soft-cap pair picks the base rate, the
/// volume tiers key on the contribution's fiat value in cents, and the
/// referral percentage applies when the whitelist knows a referrer.
#[derive(Clone)]
#[contracttype]
pub struct BonusSchedule {
    pub pre_soft_cap_pct: u32,
    pub post_soft_cap_pct: u32,
    /// Fiat volume (cents) from which `mid_volume_pct` applies; 0 disables.
    pub mid_volume_cents: i128,
    pub mid_volume_pct: u32,
    /// Fiat volume (cents) from which `high_volume_pct` applies; 0 disables.
    pub high_volume_cents: i128,
    pub high_volume_pct: u32,
    pub referral_pct: u32,
}

#[derive(Clone)]
#[contracttype]
pub struct SaleConfig {
    /// Sale token contract; the sale transfers out of its own balance.
    pub token: Address,
    /// Asset investors pay with.
    pub payment_token: Address,
    /// Receiver of proceeds and unsold tokens on withdrawal.
    pub beneficiary: Address,
    /// Caps in smallest token units. `hard_cap >= soft_cap`.
    pub hard_cap: i128,
    pub soft_cap: i128,
    pub start_time: u64,
    pub end_time: u64,
    /// Floor on a single contribution, in smallest payment units.
    pub min_contribution: i128,
    /// Cents per whole sale token.
    pub token_price_cents: i128,
    pub bonus: BonusSchedule,
}

/// One-way sale progression: `Raising -> SoftCapMet -> Withdrawn`, never
/// backwards. Withdrawal without the soft cap is unrepresentable.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum SaleStatus {
    Raising = 0,
    SoftCapMet = 1,
    Withdrawn = 2,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    NotAuthorized = 3,
    InvalidConfig = 4,
    SaleHalted = 5,
    AlreadyHalted = 6,
    NotHalted = 7,
    OutsideSaleWindow = 8,
    NotWhitelisted = 9,
    BelowMinimum = 10,
    RateNotSet = 11,
    InvalidPrice = 12,
    HardCapExceeded = 13,
    SaleNotEnded = 14,
    SoftCapNotReached = 15,
    SoftCapReached = 16,
    NothingDeposited = 17,
    AlreadyWithdrawn = 18,
    SaleClosed = 19,
    OwnershipLocked = 20,
    Overflow = 21,
}

#[contracttype]
pub enum DataKey {
    Config,
    Owner,
    Halted,
    Status,
    TokensSold,
    TotalRefunded,
    UsdRate,
    PriceProvider,
    WhiteList,
    Deposited(Address),
}
