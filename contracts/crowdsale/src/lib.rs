#![no_std]

pub mod contract;
mod storage;
mod types;


pub use contract::{CrowdsaleContract, CrowdsaleContractClient};
pub use types::{BonusSchedule, Error, SaleConfig, SaleStatus, NATIVE_UNIT, TOKEN_UNIT};
