use soroban_sdk::{
    contract, contractimpl, contractmeta, token, vec, Address, Env, IntoVal, Symbol,
};

use crate::storage::*;
use crate::types::*;

// Metadata that is added on to every WASM custom section
contractmeta!(
    key = "Description",
    val = "Capped Crowdsale with Oracle-Fed Fiat Pricing"
);

#[contract]
pub struct CrowdsaleContract;

fn whitelist_approved(env: &Env, white_list: &Address, investor: &Address) -> bool {
    env.invoke_contract(
        white_list,
        &Symbol::new(env, "is_approved"),
        vec![env, investor.into_val(env)],
    )
}

fn whitelist_referrer(env: &Env, white_list: &Address, investor: &Address) -> Option<Address> {
    env.invoke_contract(
        white_list,
        &Symbol::new(env, "referrer_of"),
        vec![env, investor.into_val(env)],
    )
}

/// The sale accepts terminal calls once the window has elapsed or the
/// administrator has halted it.
fn sale_over(env: &Env, config: &SaleConfig) -> bool {
    env.ledger().timestamp() > config.end_time || is_halted(env)
}

fn volume_pct(bonus: &BonusSchedule, fiat_cents: i128) -> u32 {
    if bonus.high_volume_cents > 0 && fiat_cents >= bonus.high_volume_cents {
        bonus.high_volume_pct
    } else if bonus.mid_volume_cents > 0 && fiat_cents >= bonus.mid_volume_cents {
        bonus.mid_volume_pct
    } else {
        0
    }
}

fn apply_pct(base: i128, pct: u32) -> i128 {
    base.saturating_mul(100 + pct as i128) / 100
}

/// Token amount for `base` tokens of contribution, splitting across the
/// soft-cap boundary: the slice that fills `tokens_sold` up to the cap earns
/// the pre-cap rate, the rest the post-cap rate. The second value reports
/// whether this contribution crosses the cap.
fn bonus_tokens(
    bonus: &BonusSchedule,
    status: SaleStatus,
    tokens_sold: i128,
    soft_cap: i128,
    base: i128,
    extra_pct: u32,
) -> (i128, bool) {
    let pre = bonus.pre_soft_cap_pct + extra_pct;
    let post = bonus.post_soft_cap_pct + extra_pct;
    if status != SaleStatus::Raising || tokens_sold >= soft_cap {
        return (apply_pct(base, post), false);
    }
    let at_pre = apply_pct(base, pre);
    if tokens_sold + at_pre < soft_cap {
        return (at_pre, false);
    }
    if tokens_sold + at_pre == soft_cap {
        return (at_pre, true);
    }
    let room = soft_cap - tokens_sold;
    let base_pre = room * 100 / (100 + pre as i128);
    let pre_part = apply_pct(base_pre, pre);
    let post_part = apply_pct(base - base_pre, post);
    (pre_part + post_part, true)
}

fn validate_config(config: &SaleConfig) -> Result<(), Error> {
    if config.hard_cap <= 0 || config.soft_cap <= 0 || config.hard_cap < config.soft_cap {
        return Err(Error::InvalidConfig);
    }
    if config.start_time >= config.end_time {
        return Err(Error::InvalidConfig);
    }
    if config.min_contribution <= 0 || config.token_price_cents <= 0 {
        return Err(Error::InvalidConfig);
    }
    let b = &config.bonus;
    if b.pre_soft_cap_pct > 100
        || b.post_soft_cap_pct > 100
        || b.mid_volume_pct > 100
        || b.high_volume_pct > 100
        || b.referral_pct > 100
    {
        return Err(Error::InvalidConfig);
    }
    if b.mid_volume_cents < 0 || b.high_volume_cents < 0 {
        return Err(Error::InvalidConfig);
    }
    if b.high_volume_cents > 0 && b.mid_volume_cents > b.high_volume_cents {
        return Err(Error::InvalidConfig);
    }
    Ok(())
}

#[contractimpl]
impl CrowdsaleContract {
    /// A zero `usd_rate` leaves pricing to the first oracle push;
    /// contributions fail until one arrives.
    pub fn initialize(
        env: Env,
        owner: Address,
        config: SaleConfig,
        usd_rate: i128,
        price_provider: Address,
        white_list: Address,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(Error::AlreadyInitialized);
        }
        owner.require_auth();
        validate_config(&config)?;
        if usd_rate < 0 {
            return Err(Error::InvalidPrice);
        }
        set_owner(&env, &owner);
        set_config(&env, &config);
        set_usd_rate(&env, usd_rate);
        set_price_provider(&env, &price_provider);
        set_white_list(&env, &white_list);
        env.events().publish(
            ("sale_initialized",),
            (config.token, config.beneficiary, config.soft_cap, config.hard_cap),
        );
        Ok(())
    }

    /// Accept a contribution of `amount` payment units from `investor` and
    /// hand out the bonus-adjusted token allocation. Returns the token
    /// amount transferred.
    pub fn contribute(env: Env, investor: Address, amount: i128) -> Result<i128, Error> {
        investor.require_auth();
        let config = get_config(&env)?;
        let status = get_status(&env);
        if status == SaleStatus::Withdrawn {
            return Err(Error::SaleClosed);
        }
        if is_halted(&env) {
            return Err(Error::SaleHalted);
        }
        let now = env.ledger().timestamp();
        if now < config.start_time || now > config.end_time {
            return Err(Error::OutsideSaleWindow);
        }
        let white_list = get_white_list(&env)?;
        if !whitelist_approved(&env, &white_list, &investor) {
            return Err(Error::NotWhitelisted);
        }
        if amount < config.min_contribution {
            return Err(Error::BelowMinimum);
        }
        let rate = get_usd_rate(&env);
        if rate == 0 {
            return Err(Error::RateNotSet);
        }

        let fiat_cents = amount.checked_mul(rate).ok_or(Error::Overflow)? / NATIVE_UNIT;
        let base = fiat_cents
            .checked_mul(TOKEN_UNIT)
            .ok_or(Error::Overflow)?
            / config.token_price_cents;

        let mut extra_pct = volume_pct(&config.bonus, fiat_cents);
        if whitelist_referrer(&env, &white_list, &investor).is_some() {
            extra_pct += config.bonus.referral_pct;
        }

        let tokens_sold = get_tokens_sold(&env);
        let (token_amount, crossed) = bonus_tokens(
            &config.bonus,
            status,
            tokens_sold,
            config.soft_cap,
            base,
            extra_pct,
        );
        let new_sold = tokens_sold
            .checked_add(token_amount)
            .ok_or(Error::Overflow)?;
        if new_sold > config.hard_cap {
            return Err(Error::HardCapExceeded);
        }

        // Book all accounting before touching any collaborator.
        set_deposited(
            &env,
            &investor,
            get_deposited(&env, &investor)
                .checked_add(amount)
                .ok_or(Error::Overflow)?,
        );
        set_tokens_sold(&env, new_sold);
        if status == SaleStatus::Raising && (crossed || new_sold >= config.soft_cap) {
            set_status(&env, SaleStatus::SoftCapMet);
            env.events().publish(("soft_cap_reached",), new_sold);
        }

        let this = env.current_contract_address();
        token::Client::new(&env, &config.payment_token).transfer(&investor, &this, &amount);
        token::Client::new(&env, &config.token).transfer(&this, &investor, &token_amount);

        env.events()
            .publish(("purchase",), (investor, amount, token_amount));
        Ok(token_amount)
    }

    /// Push entry point for the registered price provider. Rate is cents per
    /// whole payment unit.
    pub fn receive_usd_price(env: Env, provider: Address, price: i128) -> Result<(), Error> {
        provider.require_auth();
        if provider != get_price_provider(&env)? {
            return Err(Error::NotAuthorized);
        }
        if price <= 0 {
            return Err(Error::InvalidPrice);
        }
        set_usd_rate(&env, price);
        env.events().publish(("rate_update",), price);
        Ok(())
    }

    pub fn halt(env: Env, caller: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        if is_halted(&env) {
            return Err(Error::AlreadyHalted);
        }
        set_halted(&env, true);
        env.events().publish(("sale_halted",), ());
        Ok(())
    }

    pub fn unhalt(env: Env, caller: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        if !is_halted(&env) {
            return Err(Error::NotHalted);
        }
        set_halted(&env, false);
        env.events().publish(("sale_unhalted",), ());
        Ok(())
    }

    /// Terminal success path: moves the whole payment balance and the unsold
    /// token inventory to the beneficiary, exactly once.
    pub fn withdraw(env: Env, caller: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        let config = get_config(&env)?;
        if !sale_over(&env, &config) {
            return Err(Error::SaleNotEnded);
        }
        match get_status(&env) {
            SaleStatus::Raising => return Err(Error::SoftCapNotReached),
            SaleStatus::Withdrawn => return Err(Error::AlreadyWithdrawn),
            SaleStatus::SoftCapMet => {}
        }
        set_status(&env, SaleStatus::Withdrawn);

        let this = env.current_contract_address();
        let payment = token::Client::new(&env, &config.payment_token);
        let raised = payment.balance(&this);
        if raised > 0 {
            payment.transfer(&this, &config.beneficiary, &raised);
        }
        let tokens = token::Client::new(&env, &config.token);
        let unsold = tokens.balance(&this);
        if unsold > 0 {
            tokens.transfer(&this, &config.beneficiary, &unsold);
        }
        env.events().publish(("withdrawn",), (raised, unsold));
        Ok(())
    }

    /// Terminal failure path, driven individually by each investor. Returns
    /// the refunded amount.
    pub fn refund(env: Env, investor: Address) -> Result<i128, Error> {
        investor.require_auth();
        let config = get_config(&env)?;
        if !sale_over(&env, &config) {
            return Err(Error::SaleNotEnded);
        }
        if get_status(&env) != SaleStatus::Raising {
            return Err(Error::SoftCapReached);
        }
        let amount = get_deposited(&env, &investor);
        if amount == 0 {
            return Err(Error::NothingDeposited);
        }
        // Zero the deposit before any value leaves the contract.
        set_deposited(&env, &investor, 0);
        set_total_refunded(&env, get_total_refunded(&env) + amount);

        token::Client::new(&env, &config.payment_token).transfer(
            &env.current_contract_address(),
            &investor,
            &amount,
        );
        env.events().publish(("refunded",), (investor, amount));
        Ok(amount)
    }

    pub fn set_price_provider(env: Env, caller: Address, provider: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        set_price_provider(&env, &provider);
        env.events().publish(("provider_set",), provider);
        Ok(())
    }

    pub fn set_white_list(env: Env, caller: Address, white_list: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        set_white_list(&env, &white_list);
        env.events().publish(("whitelist_set",), white_list);
        Ok(())
    }

    /// Ownership is frozen while the sale is live and unhalted.
    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        let config = get_config(&env)?;
        let now = env.ledger().timestamp();
        if now >= config.start_time && now <= config.end_time && !is_halted(&env) {
            return Err(Error::OwnershipLocked);
        }
        set_owner(&env, &new_owner);
        env.events().publish(("owner_set",), new_owner);
        Ok(())
    }

    // Views

    pub fn owner(env: Env) -> Result<Address, Error> {
        get_owner(&env)
    }

    pub fn halted(env: Env) -> bool {
        is_halted(&env)
    }

    pub fn status(env: Env) -> SaleStatus {
        get_status(&env)
    }

    pub fn soft_cap_reached(env: Env) -> bool {
        get_status(&env) != SaleStatus::Raising
    }

    pub fn tokens_sold(env: Env) -> i128 {
        get_tokens_sold(&env)
    }

    pub fn total_refunded(env: Env) -> i128 {
        get_total_refunded(&env)
    }

    pub fn deposited(env: Env, investor: Address) -> i128 {
        get_deposited(&env, &investor)
    }

    pub fn usd_rate(env: Env) -> i128 {
        get_usd_rate(&env)
    }

    pub fn price_provider(env: Env) -> Result<Address, Error> {
        get_price_provider(&env)
    }

    pub fn white_list(env: Env) -> Result<Address, Error> {
        get_white_list(&env)
    }

    pub fn sale_config(env: Env) -> Result<SaleConfig, Error> {
        get_config(&env)
    }
}
