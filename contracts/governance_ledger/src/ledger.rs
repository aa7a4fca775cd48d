//! # Proposal ledger
//!
//! Proposals live under their project: every lookup goes through
//! [`registry::require_project`] first and every storage key carries the
//! project id. Local ids come from the project's `proposal_count`, so two
//! projects can both own a proposal `1`.
//!
//! Window rules, with `now = env.ledger().timestamp()`:
//!
//! | Operation  | Allowed when            | Otherwise            |
//! |------------|-------------------------|----------------------|
//! | `vote`     | `now <= vote_end_time`  | `VotingClosed`       |
//! | `finalize` | `now > vote_end_time`   | `VotingStillActive`  |

use soroban_sdk::{Address, Env, String};

use crate::registry;
use crate::storage;
use crate::types::{Proposal, ProposalConfig, ProposalState, Status};
use crate::{events, Error};

/// Open a new proposal under `project_id` and return its local id.
pub fn create_proposal(
    env: &Env,
    proposer: &Address,
    project_id: u64,
    description: String,
    voting_duration: u64,
) -> Result<u64, Error> {
    let (_, mut project_state) = registry::require_project(env, project_id)?;

    if voting_duration == 0 {
        return Err(Error::InvalidVotingDuration);
    }

    let created_at = env.ledger().timestamp();
    let vote_end_time = created_at
        .checked_add(voting_duration)
        .ok_or(Error::Overflow)?;

    let proposal_id = project_state
        .proposal_count
        .checked_add(1)
        .ok_or(Error::Overflow)?;
    project_state.proposal_count = proposal_id;

    let proposal = Proposal {
        id: proposal_id,
        project_id,
        description: description.clone(),
        proposer: proposer.clone(),
        created_at,
        vote_end_time,
        yes_votes: 0,
        no_votes: 0,
        status: Status::Initial,
    };

    storage::save_project_state(env, project_id, &project_state);
    storage::save_proposal(env, &proposal);

    events::emit_proposal_created(
        env,
        project_id,
        proposal_id,
        description,
        proposer.clone(),
        vote_end_time,
    );
    Ok(proposal_id)
}

/// Record one vote by `voter`.
pub fn vote(
    env: &Env,
    voter: &Address,
    project_id: u64,
    proposal_id: u64,
    support: bool,
) -> Result<(), Error> {
    let (config, mut state) = require_proposal(env, project_id, proposal_id)?;

    if env.ledger().timestamp() > config.vote_end_time {
        return Err(Error::VotingClosed);
    }

    if storage::has_voted(env, project_id, proposal_id, voter) {
        return Err(Error::AlreadyVoted);
    }

    let counter = if support {
        &mut state.yes_votes
    } else {
        &mut state.no_votes
    };
    *counter = counter.checked_add(1).ok_or(Error::Overflow)?;

    storage::record_vote(env, project_id, proposal_id, voter);
    storage::save_proposal_state(env, project_id, proposal_id, &state);

    events::emit_vote_cast(env, project_id, proposal_id, voter.clone(), support);
    Ok(())
}

/// Close voting and derive the outcome. Anyone may call this once the
/// window has passed; only the first call succeeds.
pub fn finalize(
    env: &Env,
    caller: &Address,
    project_id: u64,
    proposal_id: u64,
) -> Result<Status, Error> {
    let (config, mut state) = require_proposal(env, project_id, proposal_id)?;

    if env.ledger().timestamp() <= config.vote_end_time {
        return Err(Error::VotingStillActive);
    }

    if !matches!(state.status, Status::Initial | Status::Active) {
        return Err(Error::AlreadyFinalized);
    }

    state.status = outcome(state.yes_votes, state.no_votes);
    storage::save_proposal_state(env, project_id, proposal_id, &state);

    events::emit_proposal_finalized(
        env,
        project_id,
        proposal_id,
        state.status,
        state.yes_votes,
        state.no_votes,
        caller.clone(),
    );
    Ok(state.status)
}

/// Strict majority approves; a tie rejects.
pub fn outcome(yes_votes: u32, no_votes: u32) -> Status {
    if yes_votes > no_votes {
        Status::Approved
    } else {
        Status::Rejected
    }
}

pub fn get_proposal(env: &Env, project_id: u64, proposal_id: u64) -> Result<Proposal, Error> {
    registry::require_project(env, project_id)?;
    storage::load_proposal(env, project_id, proposal_id).ok_or(Error::ProposalNotFound)
}

pub fn has_user_voted(
    env: &Env,
    project_id: u64,
    proposal_id: u64,
    voter: &Address,
) -> Result<bool, Error> {
    require_proposal(env, project_id, proposal_id)?;
    Ok(storage::has_voted(env, project_id, proposal_id, voter))
}

fn require_proposal(
    env: &Env,
    project_id: u64,
    proposal_id: u64,
) -> Result<(ProposalConfig, ProposalState), Error> {
    registry::require_project(env, project_id)?;
    storage::load_proposal_pair(env, project_id, proposal_id).ok_or(Error::ProposalNotFound)
}
