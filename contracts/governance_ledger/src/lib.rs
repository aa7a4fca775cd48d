//! # Governance Ledger Contract
//!
//! A registry of **projects**, each owning a sub-registry of **proposals**
//! with time-boxed voting. The single Soroban contract `GovernanceLedger`
//! exposes:
//!
//! | Phase        | Entry Point(s)                                        |
//! |--------------|-------------------------------------------------------|
//! | Bootstrap    | [`GovernanceLedger::init`]                            |
//! | Admin        | `transfer_admin`, `set_project_status`, `get_admin`   |
//! | Projects     | [`GovernanceLedger::create_project`], `get_project`, `project_count` |
//! | Proposals    | [`GovernanceLedger::create_proposal`], `get_proposal` |
//! | Voting       | `vote_on_proposal`, `has_user_voted`                  |
//! | Finalization | [`GovernanceLedger::finalize_proposal`]               |
//!
//! ## Architecture
//!
//! Project bookkeeping lives in [`registry`], proposal bookkeeping in
//! [`ledger`], the administrator check in [`admin`], and all storage access
//! in [`storage`]. This file only authenticates callers and dispatches.
//!
//! Every entry point is one transaction: returning `Err` reverts all storage
//! writes and events of the call.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, String};

mod admin;
pub mod events;
mod ledger;
mod registry;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_voting;

pub use types::{Project, Proposal, Status};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    ProjectNotFound = 1,
    ProposalNotFound = 2,
    NotAuthorized = 3,
    InvalidVotingDuration = 4,
    VotingClosed = 5,
    AlreadyVoted = 6,
    VotingStillActive = 7,
    AlreadyFinalized = 8,
    AlreadyInitialized = 9,
    Overflow = 10,
}

#[contract]
pub struct GovernanceLedger;

#[contractimpl]
impl GovernanceLedger {
    // ─────────────────────────────────────────────────────────
    // Administration
    // ─────────────────────────────────────────────────────────

    /// Record the administrator.
    ///
    /// Must be called once after deployment. Subsequent calls fail with
    /// `Error::AlreadyInitialized`.
    pub fn init(env: Env, admin: Address) -> Result<(), Error> {
        admin.require_auth();
        admin::init_admin(&env, &admin)
    }

    /// Return the administrator, or `None` before `init`.
    pub fn get_admin(env: Env) -> Option<Address> {
        storage::get_admin(&env)
    }

    /// Hand the administrator role to `new_admin`.
    ///
    /// - `current` must authorize and be the administrator.
    pub fn transfer_admin(env: Env, current: Address, new_admin: Address) -> Result<(), Error> {
        current.require_auth();
        admin::transfer_admin(&env, &current, &new_admin)
    }

    // ─────────────────────────────────────────────────────────
    // Projects
    // ─────────────────────────────────────────────────────────

    /// Register a project and return its id. Open to any caller.
    pub fn create_project(env: Env, creator: Address, name: String) -> Result<u64, Error> {
        creator.require_auth();
        registry::create_project(&env, &creator, name)
    }

    /// Override a project's status.
    ///
    /// - `caller` must be the administrator.
    /// - No transition table is enforced.
    pub fn set_project_status(
        env: Env,
        caller: Address,
        project_id: u64,
        status: Status,
    ) -> Result<(), Error> {
        caller.require_auth();
        registry::set_project_status(&env, &caller, project_id, status)
    }

    pub fn get_project(env: Env, project_id: u64) -> Result<Project, Error> {
        registry::get_project(&env, project_id)
    }

    /// Number of projects created so far.
    pub fn project_count(env: Env) -> u64 {
        storage::get_project_count(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Proposals
    // ─────────────────────────────────────────────────────────

    /// Open a proposal under `project_id`; voting stays open for
    /// `voting_duration` seconds (inclusive of the end timestamp).
    ///
    /// Returns the proposal id, local to the project.
    pub fn create_proposal(
        env: Env,
        proposer: Address,
        project_id: u64,
        description: String,
        voting_duration: u64,
    ) -> Result<u64, Error> {
        proposer.require_auth();
        ledger::create_proposal(&env, &proposer, project_id, description, voting_duration)
    }

    /// Cast `voter`'s single vote: `true` for yes, `false` for no.
    pub fn vote_on_proposal(
        env: Env,
        voter: Address,
        project_id: u64,
        proposal_id: u64,
        vote: bool,
    ) -> Result<(), Error> {
        voter.require_auth();
        ledger::vote(&env, &voter, project_id, proposal_id, vote)
    }

    /// Finalize a proposal whose voting window has passed.
    ///
    /// Any address may finalize; `caller` is only recorded in the event.
    /// Returns the outcome, `Approved` or `Rejected`.
    pub fn finalize_proposal(
        env: Env,
        caller: Address,
        project_id: u64,
        proposal_id: u64,
    ) -> Result<Status, Error> {
        caller.require_auth();
        ledger::finalize(&env, &caller, project_id, proposal_id)
    }

    pub fn get_proposal(env: Env, project_id: u64, proposal_id: u64) -> Result<Proposal, Error> {
        ledger::get_proposal(&env, project_id, proposal_id)
    }

    pub fn has_user_voted(
        env: Env,
        project_id: u64,
        proposal_id: u64,
        voter: Address,
    ) -> Result<bool, Error> {
        ledger::has_user_voted(&env, project_id, proposal_id, &voter)
    }
}
