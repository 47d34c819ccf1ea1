#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contractmeta, contracttype, Address, Env,
};

contractmeta!(
    key = "Description",
    val = "Investor Whitelist with Referral Linkage"
);

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    NotAuthorized = 3,
    AlreadyListed = 4,
    NotListed = 5,
    InvalidReferral = 6,
}

#[contracttype]
pub enum DataKey {
    Owner,
    Approved(Address),
    Referral(Address),
}

#[contract]
pub struct InvestorWhiteListContract;

fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    let owner: Address = env
        .storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(Error::NotInitialized)?;
    if owner != *caller {
        return Err(Error::NotAuthorized);
    }
    Ok(())
}

#[contractimpl]
impl InvestorWhiteListContract {
    pub fn initialize(env: Env, owner: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(Error::AlreadyInitialized);
        }
        owner.require_auth();
        env.storage().instance().set(&DataKey::Owner, &owner);
        Ok(())
    }

    /// Approve `investor` for participation in the sale.
    pub fn add_investor(env: Env, caller: Address, investor: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        let key = DataKey::Approved(investor.clone());
        if env.storage().persistent().has(&key) {
            return Err(Error::AlreadyListed);
        }
        env.storage().persistent().set(&key, &true);
        env.events().publish(("investor_added",), investor);
        Ok(())
    }

    pub fn remove_investor(env: Env, caller: Address, investor: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        let key = DataKey::Approved(investor.clone());
        if !env.storage().persistent().has(&key) {
            return Err(Error::NotListed);
        }
        env.storage().persistent().remove(&key);
        env.events().publish(("investor_removed",), investor);
        Ok(())
    }

    /// Record `referral` as the referrer of `investor`. The link is written
    /// once and never overwritten.
    pub fn add_referral_of(
        env: Env,
        caller: Address,
        investor: Address,
        referral: Address,
    ) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        if investor == referral {
            return Err(Error::InvalidReferral);
        }
        let key = DataKey::Referral(investor.clone());
        if env.storage().persistent().has(&key) {
            return Err(Error::InvalidReferral);
        }
        env.storage().persistent().set(&key, &referral);
        env.events().publish(("referral_added",), (investor, referral));
        Ok(())
    }

    // Queries consumed by the sale contract.

    pub fn is_approved(env: Env, investor: Address) -> bool {
        env.storage()
            .persistent()
            .get(&DataKey::Approved(investor))
            .unwrap_or(false)
    }

    pub fn referrer_of(env: Env, investor: Address) -> Option<Address> {
        env.storage().persistent().get(&DataKey::Referral(investor))
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)
    }
}
