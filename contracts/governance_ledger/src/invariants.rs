#![allow(dead_code)]

extern crate std;

use soroban_sdk::Address;

use crate::types::{Project, Proposal, Status};
use crate::GovernanceLedgerClient;

/// INV-1: Project IDs are strictly increasing and never repeat.
pub fn assert_strictly_increasing(ids: &[u64]) {
    for pair in ids.windows(2) {
        assert!(
            pair[1] > pair[0],
            "INV-1 violated: id {} allocated after {}",
            pair[1],
            pair[0]
        );
    }
}

/// INV-2: Local proposal ids of one project run 1, 2, 3, ...
pub fn assert_dense_from_one(ids: &[u64]) {
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(
            *id,
            i as u64 + 1,
            "INV-2 violated: expected proposal id {}, got {}",
            i + 1,
            id
        );
    }
}

/// INV-3: The voting window is never empty.
pub fn assert_window_positive(proposal: &Proposal) {
    assert!(
        proposal.vote_end_time > proposal.created_at,
        "INV-3 violated: proposal {} of project {} ends at {} but was created at {}",
        proposal.id,
        proposal.project_id,
        proposal.vote_end_time,
        proposal.created_at
    );
}

/// INV-4: `yes + no` equals the number of recorded voters.
///
/// `voters` is every address that attempted a vote; each one must be
/// reported by `has_user_voted` and the counters must add up.
pub fn assert_tally_matches_voters(
    client: &GovernanceLedgerClient,
    proposal: &Proposal,
    voters: &[Address],
) {
    let recorded = voters
        .iter()
        .filter(|v| client.has_user_voted(&proposal.project_id, &proposal.id, *v))
        .count() as u64;
    assert_eq!(
        proposal.total_votes(),
        recorded,
        "INV-4 violated: {} yes + {} no != {} recorded voters",
        proposal.yes_votes,
        proposal.no_votes,
        recorded
    );
}

/// INV-5: Fields fixed at creation never change.
pub fn assert_proposal_immutable_fields(original: &Proposal, current: &Proposal) {
    assert_eq!(original.id, current.id, "INV-5 violated: id changed");
    assert_eq!(
        original.project_id, current.project_id,
        "INV-5 violated: project_id changed"
    );
    assert_eq!(
        original.description, current.description,
        "INV-5 violated: description changed"
    );
    assert_eq!(
        original.proposer, current.proposer,
        "INV-5 violated: proposer changed"
    );
    assert_eq!(
        original.created_at, current.created_at,
        "INV-5 violated: created_at changed"
    );
    assert_eq!(
        original.vote_end_time, current.vote_end_time,
        "INV-5 violated: vote_end_time changed"
    );
}

/// INV-6: A finalized proposal carries the outcome its counters imply.
pub fn assert_outcome_matches_counts(proposal: &Proposal) {
    let expected = if proposal.yes_votes > proposal.no_votes {
        Status::Approved
    } else {
        Status::Rejected
    };
    assert_eq!(
        proposal.status, expected,
        "INV-6 violated: {} yes / {} no finalized as {:?}",
        proposal.yes_votes, proposal.no_votes, proposal.status
    );
}

/// INV-7: Project creator and creation time never change.
pub fn assert_project_immutable_fields(original: &Project, current: &Project) {
    assert_eq!(original.id, current.id, "INV-7 violated: id changed");
    assert_eq!(
        original.creator, current.creator,
        "INV-7 violated: creator changed"
    );
    assert_eq!(
        original.created_at, current.created_at,
        "INV-7 violated: created_at changed"
    );
    assert_eq!(original.name, current.name, "INV-7 violated: name changed");
}

/// INV-8: `proposal_count` never decreases.
pub fn assert_proposal_count_monotonic(count_before: u64, count_after: u64) {
    assert!(
        count_after >= count_before,
        "INV-8 violated: proposal_count decreased from {} to {}",
        count_before,
        count_after
    );
}
