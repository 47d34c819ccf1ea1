use soroban_sdk::{contracterror, contracttype, Address, String, Symbol};

/// Update cycle state. A provider is created `Stopped` and stays `Pending`
/// for as long as an external fetch is outstanding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum OracleState {
    Stopped = 0,
    Pending = 1,
}

#[derive(Clone)]
#[contracttype]
pub struct OracleConfig {
    /// Data-source locator handed to the fetch transport with every request.
    pub url: String,
    /// Seconds between successive fetch requests. Always > 0.
    pub update_interval: u64,
    /// The only address allowed to answer requests.
    pub transport: Address,
    /// Asset used to pay per-request transport fees.
    pub fee_token: Address,
    /// Fee forwarded to the transport for each issued request.
    pub request_fee: i128,
    /// Accepted deviation from the prior price, in basis points.
    pub band_bps: u32,
    /// Export invoked on the watcher when a validated price is pushed.
    pub callback_fn: Symbol,
}

/// In-flight external fetch. Only the answer bearing `id` may resolve it.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct PendingRequest {
    pub id: u64,
    /// Earliest timestamp at which the transport should execute the fetch.
    pub not_before: u64,
}

/// Result of one ingestion call. Anything but `Applied` leaves
/// `current_price` untouched; only `Stale` leaves the schedule untouched.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum IngestOutcome {
    Applied = 0,
    OutOfBand = 1,
    Unparsable = 2,
    Stale = 3,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    NotAuthorized = 3,
    InvalidInterval = 4,
    InvalidBand = 5,
    InvalidPrice = 6,
    InvalidFee = 7,
    UpdatePending = 8,
    UpdateStopped = 9,
    InsufficientFees = 10,
}

#[contracttype]
pub enum DataKey {
    Owner,
    Config,
    State,
    CurrentPrice,
    Watcher,
    Pending,
    NextRequestId,
}
