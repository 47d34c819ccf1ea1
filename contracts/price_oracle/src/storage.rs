use soroban_sdk::{Address, Env};

use crate::types::{DataKey, Error, OracleConfig, OracleState, PendingRequest};

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

pub fn get_config(env: &Env) -> Result<OracleConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn set_config(env: &Env, cfg: &OracleConfig) {
    env.storage().instance().set(&DataKey::Config, cfg);
}

pub fn get_state(env: &Env) -> OracleState {
    env.storage()
        .instance()
        .get(&DataKey::State)
        .unwrap_or(OracleState::Stopped)
}

pub fn set_state(env: &Env, state: OracleState) {
    env.storage().instance().set(&DataKey::State, &state);
}

pub fn get_current_price(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::CurrentPrice)
        .unwrap_or(0)
}

pub fn set_current_price(env: &Env, price: i128) {
    env.storage().instance().set(&DataKey::CurrentPrice, &price);
}

pub fn get_watcher(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Watcher)
}

pub fn set_watcher(env: &Env, watcher: &Address) {
    env.storage().instance().set(&DataKey::Watcher, watcher);
}

pub fn get_pending(env: &Env) -> Option<PendingRequest> {
    env.storage().instance().get(&DataKey::Pending)
}

pub fn set_pending(env: &Env, req: &PendingRequest) {
    env.storage().instance().set(&DataKey::Pending, req);
}

pub fn clear_pending(env: &Env) {
    env.storage().instance().remove(&DataKey::Pending);
}

/// Hands out correlation ids, starting from 1.
pub fn next_request_id(env: &Env) -> u64 {
    let id: u64 = env
        .storage()
        .instance()
        .get(&DataKey::NextRequestId)
        .unwrap_or(1);
    env.storage()
        .instance()
        .set(&DataKey::NextRequestId, &(id + 1));
    id
}
