//! # Administrator
//!
//! The ledger has a single privileged address. It is recorded once by
//! `init` and can be handed over with `transfer_admin`. Its only power
//! is overriding project status.

use soroban_sdk::{Address, Env};

use crate::{events, storage, Error};

/// Record the first administrator. Fails if one is already set.
pub fn init_admin(env: &Env, admin: &Address) -> Result<(), Error> {
    if storage::get_admin(env).is_some() {
        return Err(Error::AlreadyInitialized);
    }
    storage::set_admin(env, admin);
    events::emit_admin_changed(env, None, admin.clone());
    Ok(())
}

/// Fail with `NotAuthorized` unless `caller` is the administrator.
///
/// An uninitialised contract has no administrator, so every caller fails.
pub fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
    match storage::get_admin(env) {
        Some(admin) if admin == *caller => Ok(()),
        _ => Err(Error::NotAuthorized),
    }
}

/// Hand the administrator role from `current` to `new_admin`.
pub fn transfer_admin(env: &Env, current: &Address, new_admin: &Address) -> Result<(), Error> {
    require_admin(env, current)?;
    storage::set_admin(env, new_admin);
    events::emit_admin_changed(env, Some(current.clone()), new_admin.clone());
    Ok(())
}
