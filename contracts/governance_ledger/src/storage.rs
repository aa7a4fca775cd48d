//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the ledger:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key            | Type      | Description                         |
//! |----------------|-----------|-------------------------------------|
//! | `Admin`        | `Address` | Administrator allowed to set status |
//! | `ProjectCount` | `u64`     | Auto-increment project ID counter   |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                  | Type             | Description                     |
//! |----------------------|------------------|---------------------------------|
//! | `ProjConfig(p)`      | `ProjectConfig`  | Immutable project fields        |
//! | `ProjState(p)`       | `ProjectState`   | Status and proposal counter     |
//! | `PropConfig(p, q)`   | `ProposalConfig` | Immutable proposal fields       |
//! | `PropState(p, q)`    | `ProposalState`  | Vote counters and status        |
//! | `Voted(p, q, addr)`  | `bool`           | Write-once vote receipt         |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! Every proposal key embeds its project id, so proposal ids only need to be
//! unique within a project.
//!
//! Loaders return `Option`; mapping absence to an [`Error`](crate::Error) is
//! the caller's job.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{
    Project, ProjectConfig, ProjectState, Proposal, ProposalConfig, ProposalState,
};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Administrator address (Instance).
    Admin,
    /// Global auto-increment counter for project IDs (Instance).
    ProjectCount,
    /// Immutable project configuration keyed by ID (Persistent).
    ProjConfig(u64),
    /// Mutable project state keyed by ID (Persistent).
    ProjState(u64),
    /// Immutable proposal configuration keyed by (project, proposal) (Persistent).
    PropConfig(u64, u64),
    /// Mutable proposal state keyed by (project, proposal) (Persistent).
    PropState(u64, u64),
    /// Vote receipt keyed by (project, proposal, voter) (Persistent).
    Voted(u64, u64, Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Store the administrator address.
pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
    bump_instance(env);
}

/// Retrieve the administrator address, if one has been set.
pub fn get_admin(env: &Env) -> Option<Address> {
    let admin = env.storage().instance().get(&DataKey::Admin);
    if admin.is_some() {
        bump_instance(env);
    }
    admin
}

/// Current value of the project counter (the highest allocated ID).
pub fn get_project_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ProjectCount)
        .unwrap_or(0)
}

/// Increments and stores the project counter.
/// Returns the ID to use for the *current* project (post-increment value),
/// so the first project receives ID 1.
///
/// Returns `None` if the counter would overflow.
pub fn increment_project_id(env: &Env) -> Option<u64> {
    let next = get_project_count(env).checked_add(1)?;
    env.storage()
        .instance()
        .set(&DataKey::ProjectCount, &next);
    bump_instance(env);
    Some(next)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn read_persistent<V>(env: &Env, key: &DataKey) -> Option<V>
where
    V: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
{
    let value = env.storage().persistent().get(key);
    if value.is_some() {
        bump_persistent(env, key);
    }
    value
}

fn write_persistent<V>(env: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().persistent().set(key, value);
    bump_persistent(env, key);
}

// ── Projects ─────────────────────────────────────────────────────────

/// Save both the immutable config and initial mutable state for a new project.
pub fn save_project(env: &Env, project: &Project) {
    let config = ProjectConfig {
        id: project.id,
        name: project.name.clone(),
        creator: project.creator.clone(),
        created_at: project.created_at,
    };

    let state = ProjectState {
        status: project.status,
        proposal_count: project.proposal_count,
    };

    write_persistent(env, &DataKey::ProjConfig(project.id), &config);
    write_persistent(env, &DataKey::ProjState(project.id), &state);
}

/// Load only the immutable project configuration.
pub fn load_project_config(env: &Env, id: u64) -> Option<ProjectConfig> {
    read_persistent(env, &DataKey::ProjConfig(id))
}

/// Load only the mutable project state.
pub fn load_project_state(env: &Env, id: u64) -> Option<ProjectState> {
    read_persistent(env, &DataKey::ProjState(id))
}

/// Load config and state together. Both entries are written in the same
/// transaction, so either both exist or neither does.
pub fn load_project_pair(env: &Env, id: u64) -> Option<(ProjectConfig, ProjectState)> {
    let config = load_project_config(env, id)?;
    let state = load_project_state(env, id)?;
    Some((config, state))
}

/// Load the full `Project` by combining config and state.
pub fn load_project(env: &Env, id: u64) -> Option<Project> {
    let (config, state) = load_project_pair(env, id)?;
    Some(Project {
        id: config.id,
        name: config.name,
        creator: config.creator,
        created_at: config.created_at,
        status: state.status,
        proposal_count: state.proposal_count,
    })
}

/// Save only the mutable project state.
pub fn save_project_state(env: &Env, id: u64, state: &ProjectState) {
    write_persistent(env, &DataKey::ProjState(id), state);
}

// ── Proposals ────────────────────────────────────────────────────────

/// Save both halves of a freshly created proposal.
pub fn save_proposal(env: &Env, proposal: &Proposal) {
    let config = ProposalConfig {
        id: proposal.id,
        project_id: proposal.project_id,
        description: proposal.description.clone(),
        proposer: proposal.proposer.clone(),
        created_at: proposal.created_at,
        vote_end_time: proposal.vote_end_time,
    };

    let state = ProposalState {
        yes_votes: proposal.yes_votes,
        no_votes: proposal.no_votes,
        status: proposal.status,
    };

    write_persistent(
        env,
        &DataKey::PropConfig(proposal.project_id, proposal.id),
        &config,
    );
    write_persistent(
        env,
        &DataKey::PropState(proposal.project_id, proposal.id),
        &state,
    );
}

/// Load config and state of a proposal under `project_id`.
pub fn load_proposal_pair(
    env: &Env,
    project_id: u64,
    proposal_id: u64,
) -> Option<(ProposalConfig, ProposalState)> {
    let config = read_persistent(env, &DataKey::PropConfig(project_id, proposal_id))?;
    let state = read_persistent(env, &DataKey::PropState(project_id, proposal_id))?;
    Some((config, state))
}

/// Load the full `Proposal` view.
pub fn load_proposal(env: &Env, project_id: u64, proposal_id: u64) -> Option<Proposal> {
    let (config, state) = load_proposal_pair(env, project_id, proposal_id)?;
    Some(Proposal {
        id: config.id,
        project_id: config.project_id,
        description: config.description,
        proposer: config.proposer,
        created_at: config.created_at,
        vote_end_time: config.vote_end_time,
        yes_votes: state.yes_votes,
        no_votes: state.no_votes,
        status: state.status,
    })
}

/// Save only the mutable proposal state (votes and finalization).
pub fn save_proposal_state(env: &Env, project_id: u64, proposal_id: u64, state: &ProposalState) {
    write_persistent(env, &DataKey::PropState(project_id, proposal_id), state);
}

// ── Vote receipts ────────────────────────────────────────────────────

/// `true` if `voter` already has a receipt for this proposal.
pub fn has_voted(env: &Env, project_id: u64, proposal_id: u64, voter: &Address) -> bool {
    let key = DataKey::Voted(project_id, proposal_id, voter.clone());
    let voted = env.storage().persistent().has(&key);
    if voted {
        bump_persistent(env, &key);
    }
    voted
}

/// Record a vote receipt for `voter`. Receipts are never removed.
pub fn record_vote(env: &Env, project_id: u64, proposal_id: u64, voter: &Address) {
    let key = DataKey::Voted(project_id, proposal_id, voter.clone());
    write_persistent(env, &key, &true);
}
