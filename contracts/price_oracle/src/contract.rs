use soroban_sdk::{
    contract, contractimpl, contractmeta, token, vec, Address, Env, IntoVal, String, Symbol, Val,
};

use crate::storage::*;
use crate::types::*;

// Metadata that is added on to every WASM custom section
contractmeta!(
    key = "Description",
    val = "Push Price Provider with Banded Validation"
);

/// Longest raw answer the parser will look at.
const MAX_RAW_LEN: usize = 31;

#[contract]
pub struct PriceOracleContract;

/// Parses a fixed-point decimal string ("748.92000") into integer cents
/// (74892). Digits past the second fractional place are truncated. Returns
/// `None` for anything malformed or non-positive.
fn parse_price_cents(raw: &String) -> Option<i128> {
    let len = raw.len() as usize;
    if len == 0 || len > MAX_RAW_LEN {
        return None;
    }
    let mut buf = [0u8; MAX_RAW_LEN];
    raw.copy_into_slice(&mut buf[..len]);

    let mut dollars: i128 = 0;
    let mut cents: i128 = 0;
    let mut frac_digits = 0u32;
    let mut seen_dot = false;
    let mut seen_digit = false;

    for &b in &buf[..len] {
        match b {
            b'0'..=b'9' => {
                seen_digit = true;
                let d = (b - b'0') as i128;
                if seen_dot {
                    if frac_digits < 2 {
                        cents = cents * 10 + d;
                        frac_digits += 1;
                    }
                } else {
                    dollars = dollars * 10 + d;
                }
            }
            b'.' if !seen_dot => seen_dot = true,
            _ => return None,
        }
    }
    if !seen_digit {
        return None;
    }
    while frac_digits < 2 {
        cents *= 10;
        frac_digits += 1;
    }
    let total = dollars * 100 + cents;
    if total <= 0 {
        return None;
    }
    Some(total)
}

fn within_band(prev: i128, new: i128, band_bps: u32) -> bool {
    let diff = if new > prev { new - prev } else { prev - new };
    diff.saturating_mul(10_000) <= prev.saturating_mul(band_bps as i128)
}

/// Issues the next external fetch: pays the transport fee, records the
/// pending correlation id, and announces the request. Returns false when the
/// fee balance can no longer cover a request.
fn issue_request(env: &Env, cfg: &OracleConfig, not_before: u64) -> bool {
    let this = env.current_contract_address();
    let fee_client = token::Client::new(env, &cfg.fee_token);
    if cfg.request_fee > 0 && fee_client.balance(&this) < cfg.request_fee {
        return false;
    }
    let id = next_request_id(env);
    set_pending(env, &PendingRequest { id, not_before });
    if cfg.request_fee > 0 {
        fee_client.transfer(&this, &cfg.transport, &cfg.request_fee);
    }
    env.events()
        .publish(("price_request",), (id, cfg.url.clone(), not_before));
    true
}

/// Reachable only from the authenticated ingestion path.
fn notify_watcher(env: &Env, cfg: &OracleConfig, price: i128) {
    let watcher = match get_watcher(env) {
        Some(w) => w,
        None => return,
    };
    let args: soroban_sdk::Vec<Val> = vec![
        env,
        env.current_contract_address().into_val(env),
        price.into_val(env),
    ];
    // A reverting watcher must never stall the feed.
    let res = env.try_invoke_contract::<(), soroban_sdk::Error>(&watcher, &cfg.callback_fn, args);
    env.events()
        .publish(("price_pushed",), (watcher, price, res.is_ok()));
}

#[contractimpl]
impl PriceOracleContract {
    pub fn initialize(
        env: Env,
        owner: Address,
        transport: Address,
        fee_token: Address,
        url: String,
        update_interval: u64,
        request_fee: i128,
        band_bps: u32,
        callback_fn: Symbol,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(Error::AlreadyInitialized);
        }
        owner.require_auth();
        if update_interval == 0 {
            return Err(Error::InvalidInterval);
        }
        if band_bps == 0 || band_bps > 10_000 {
            return Err(Error::InvalidBand);
        }
        if request_fee < 0 {
            return Err(Error::InvalidFee);
        }
        set_owner(&env, &owner);
        set_config(
            &env,
            &OracleConfig {
                url,
                update_interval,
                transport,
                fee_token,
                request_fee,
                band_bps,
                callback_fn,
            },
        );
        set_state(&env, OracleState::Stopped);
        Ok(())
    }

    // Admin

    pub fn set_url(env: Env, caller: Address, url: String) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        let mut cfg = get_config(&env)?;
        cfg.url = url;
        set_config(&env, &cfg);
        Ok(())
    }

    pub fn set_update_interval(env: Env, caller: Address, update_interval: u64) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        if update_interval == 0 {
            return Err(Error::InvalidInterval);
        }
        let mut cfg = get_config(&env)?;
        cfg.update_interval = update_interval;
        set_config(&env, &cfg);
        Ok(())
    }

    pub fn set_watcher(env: Env, caller: Address, watcher: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        set_watcher(&env, &watcher);
        env.events().publish(("watcher_set",), watcher);
        Ok(())
    }

    pub fn set_transport(env: Env, caller: Address, transport: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        let mut cfg = get_config(&env)?;
        cfg.transport = transport;
        set_config(&env, &cfg);
        Ok(())
    }

    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        set_owner(&env, &new_owner);
        env.events().publish(("owner_set",), new_owner);
        Ok(())
    }

    // Update cycle

    /// Seeds the price so consumers have a usable value before the first
    /// round-trip completes, funds the fee balance, and issues the first
    /// fetch request.
    pub fn start_update(
        env: Env,
        caller: Address,
        initial_price: i128,
        fee_budget: i128,
    ) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        if get_state(&env) == OracleState::Pending {
            return Err(Error::UpdatePending);
        }
        if initial_price <= 0 {
            return Err(Error::InvalidPrice);
        }
        if fee_budget < 0 {
            return Err(Error::InvalidFee);
        }
        let cfg = get_config(&env)?;
        set_current_price(&env, initial_price);
        set_state(&env, OracleState::Pending);
        if fee_budget > 0 {
            token::Client::new(&env, &cfg.fee_token).transfer(
                &caller,
                &env.current_contract_address(),
                &fee_budget,
            );
        }
        if !issue_request(&env, &cfg, env.ledger().timestamp()) {
            return Err(Error::InsufficientFees);
        }
        env.events().publish(("update_started",), initial_price);
        Ok(())
    }

    pub fn stop_update(env: Env, caller: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        if get_state(&env) == OracleState::Stopped {
            return Err(Error::UpdateStopped);
        }
        clear_pending(&env);
        set_state(&env, OracleState::Stopped);
        env.events().publish(("update_stopped",), ());
        Ok(())
    }

    /// Entry point for the fetch transport. The answer is applied only when
    /// it carries the pending correlation id, parses as a fixed-point price,
    /// and stays within the deviation band; every other outcome is reported
    /// without failing the call, so a bad round never strands the schedule.
    pub fn ingest_answer(
        env: Env,
        transport: Address,
        request_id: u64,
        raw: String,
    ) -> Result<IngestOutcome, Error> {
        transport.require_auth();
        let cfg = get_config(&env)?;
        if transport != cfg.transport {
            return Err(Error::NotAuthorized);
        }
        if get_state(&env) != OracleState::Pending {
            env.events().publish(("stale_answer",), request_id);
            return Ok(IngestOutcome::Stale);
        }
        let pending = match get_pending(&env) {
            Some(p) if p.id == request_id => p,
            _ => {
                env.events().publish(("stale_answer",), request_id);
                return Ok(IngestOutcome::Stale);
            }
        };
        clear_pending(&env);

        let mut applied: Option<i128> = None;
        let outcome = match parse_price_cents(&raw) {
            None => IngestOutcome::Unparsable,
            Some(price) => {
                if within_band(get_current_price(&env), price, cfg.band_bps) {
                    set_current_price(&env, price);
                    applied = Some(price);
                    IngestOutcome::Applied
                } else {
                    IngestOutcome::OutOfBand
                }
            }
        };

        // Keep the cycle alive whatever the answer quality; a depleted fee
        // balance is the one condition that ends it.
        let now = env.ledger().timestamp();
        if !issue_request(&env, &cfg, now.saturating_add(cfg.update_interval)) {
            set_state(&env, OracleState::Stopped);
            env.events().publish(("fees_depleted",), pending.id);
        }

        if let Some(price) = applied {
            notify_watcher(&env, &cfg, price);
            env.events().publish(("price_applied",), (request_id, price));
        } else {
            env.events().publish(("price_rejected",), (request_id, raw));
        }
        Ok(outcome)
    }

    /// Fee funds can only leave while no request is outstanding.
    pub fn withdraw(env: Env, caller: Address, to: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        if get_state(&env) != OracleState::Stopped {
            return Err(Error::UpdatePending);
        }
        let cfg = get_config(&env)?;
        let this = env.current_contract_address();
        let fee_client = token::Client::new(&env, &cfg.fee_token);
        let balance = fee_client.balance(&this);
        if balance > 0 {
            fee_client.transfer(&this, &to, &balance);
        }
        env.events().publish(("fees_withdrawn",), (to, balance));
        Ok(())
    }

    // Views

    pub fn state(env: Env) -> OracleState {
        get_state(&env)
    }

    pub fn current_price(env: Env) -> i128 {
        get_current_price(&env)
    }

    pub fn watcher(env: Env) -> Option<Address> {
        get_watcher(&env)
    }

    pub fn pending_request(env: Env) -> Option<PendingRequest> {
        get_pending(&env)
    }

    pub fn url(env: Env) -> Result<String, Error> {
        Ok(get_config(&env)?.url)
    }

    pub fn update_interval(env: Env) -> Result<u64, Error> {
        Ok(get_config(&env)?.update_interval)
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        get_owner(&env)
    }
}
