use soroban_sdk::{Address, Env};

use crate::types::{DataKey, Error, SaleConfig, SaleStatus};

pub fn get_config(env: &Env) -> Result<SaleConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn set_config(env: &Env, config: &SaleConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_owner(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(Error::NotInitialized)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

pub fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    if get_owner(env)? != *caller {
        return Err(Error::NotAuthorized);
    }
    Ok(())
}

pub fn is_halted(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Halted)
        .unwrap_or(false)
}

pub fn set_halted(env: &Env, halted: bool) {
    env.storage().instance().set(&DataKey::Halted, &halted);
}

pub fn get_status(env: &Env) -> SaleStatus {
    env.storage()
        .instance()
        .get(&DataKey::Status)
        .unwrap_or(SaleStatus::Raising)
}

pub fn set_status(env: &Env, status: SaleStatus) {
    env.storage().instance().set(&DataKey::Status, &status);
}

pub fn get_tokens_sold(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TokensSold)
        .unwrap_or(0)
}

pub fn set_tokens_sold(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::TokensSold, &amount);
}

pub fn get_total_refunded(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalRefunded)
        .unwrap_or(0)
}

pub fn set_total_refunded(env: &Env, amount: i128) {
    env.storage()
        .instance()
        .set(&DataKey::TotalRefunded, &amount);
}

pub fn get_usd_rate(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::UsdRate).unwrap_or(0)
}

pub fn set_usd_rate(env: &Env, rate: i128) {
    env.storage().instance().set(&DataKey::UsdRate, &rate);
}

pub fn get_price_provider(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::PriceProvider)
        .ok_or(Error::NotInitialized)
}

pub fn set_price_provider(env: &Env, provider: &Address) {
    env.storage()
        .instance()
        .set(&DataKey::PriceProvider, provider);
}

pub fn get_white_list(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::WhiteList)
        .ok_or(Error::NotInitialized)
}

pub fn set_white_list(env: &Env, white_list: &Address) {
    env.storage().instance().set(&DataKey::WhiteList, white_list);
}

pub fn get_deposited(env: &Env, investor: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Deposited(investor.clone()))
        .unwrap_or(0)
}

pub fn set_deposited(env: &Env, investor: &Address, amount: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::Deposited(investor.clone()), &amount);
}
