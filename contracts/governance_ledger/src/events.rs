//! # Events
//!
//! Every successful mutation publishes exactly one event. Off-chain
//! consumers (see `backend/indexer`) treat the event stream as the audit
//! log; contract storage only holds the current state.
//!
//! | Topics                                  | Data                     |
//! |-----------------------------------------|--------------------------|
//! | `("proj_new", project_id)`              | [`ProjectCreated`]       |
//! | `("proj_stat", project_id)`             | [`ProjectStatusChanged`] |
//! | `("prop_new", project_id, proposal_id)` | [`ProposalCreated`]      |
//! | `("voted", project_id, proposal_id)`    | [`VoteCast`]             |
//! | `("prop_fin", project_id, proposal_id)` | [`ProposalFinalized`]    |
//! | `("admin_set",)`                        | [`AdminChanged`]         |

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

use crate::types::Status;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectCreated {
    pub project_id: u64,
    pub name: String,
    pub creator: Address,
    pub created_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectStatusChanged {
    pub project_id: u64,
    pub old_status: Status,
    pub new_status: Status,
    pub caller: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalCreated {
    pub project_id: u64,
    pub proposal_id: u64,
    pub description: String,
    pub proposer: Address,
    pub vote_end_time: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VoteCast {
    pub project_id: u64,
    pub proposal_id: u64,
    pub voter: Address,
    pub vote: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalFinalized {
    pub project_id: u64,
    pub proposal_id: u64,
    pub status: Status,
    pub yes_votes: u32,
    pub no_votes: u32,
    pub caller: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminChanged {
    pub previous: Option<Address>,
    pub admin: Address,
}

pub fn emit_project_created(
    env: &Env,
    project_id: u64,
    name: String,
    creator: Address,
    created_at: u64,
) {
    let topics = (symbol_short!("proj_new"), project_id);
    let data = ProjectCreated {
        project_id,
        name,
        creator,
        created_at,
    };
    env.events().publish(topics, data);
}

pub fn emit_project_status_changed(
    env: &Env,
    project_id: u64,
    old_status: Status,
    new_status: Status,
    caller: Address,
) {
    let topics = (symbol_short!("proj_stat"), project_id);
    let data = ProjectStatusChanged {
        project_id,
        old_status,
        new_status,
        caller,
    };
    env.events().publish(topics, data);
}

pub fn emit_proposal_created(
    env: &Env,
    project_id: u64,
    proposal_id: u64,
    description: String,
    proposer: Address,
    vote_end_time: u64,
) {
    let topics = (symbol_short!("prop_new"), project_id, proposal_id);
    let data = ProposalCreated {
        project_id,
        proposal_id,
        description,
        proposer,
        vote_end_time,
    };
    env.events().publish(topics, data);
}

pub fn emit_vote_cast(env: &Env, project_id: u64, proposal_id: u64, voter: Address, vote: bool) {
    let topics = (symbol_short!("voted"), project_id, proposal_id);
    let data = VoteCast {
        project_id,
        proposal_id,
        voter,
        vote,
    };
    env.events().publish(topics, data);
}

pub fn emit_proposal_finalized(
    env: &Env,
    project_id: u64,
    proposal_id: u64,
    status: Status,
    yes_votes: u32,
    no_votes: u32,
    caller: Address,
) {
    let topics = (symbol_short!("prop_fin"), project_id, proposal_id);
    let data = ProposalFinalized {
        project_id,
        proposal_id,
        status,
        yes_votes,
        no_votes,
        caller,
    };
    env.events().publish(topics, data);
}

pub fn emit_admin_changed(env: &Env, previous: Option<Address>, admin: Address) {
    let topics = (symbol_short!("admin_set"),);
    let data = AdminChanged { previous, admin };
    env.events().publish(topics, data);
}
