#![no_std]

pub mod contract;
mod storage;
mod types;


pub use contract::{PriceOracleContract, PriceOracleContractClient};
pub use types::{Error, IngestOutcome, OracleConfig, OracleState, PendingRequest};
