extern crate std;

use crate::invariants::{
    assert_outcome_matches_counts, assert_proposal_immutable_fields, assert_tally_matches_voters,
};
use crate::{test_utils::TestContext, Error, Status};

fn setup_proposal(duration: u64) -> (TestContext, u64, u64) {
    let ctx = TestContext::new();
    let project_id = ctx.create_project("Garden");
    let proposal_id = ctx.create_proposal(project_id, "Build bench", duration);
    (ctx, project_id, proposal_id)
}

// ─── Voting ──────────────────────────────────────────────

#[test]
fn test_vote_counts_yes_and_no() {
    let (ctx, p, q) = setup_proposal(100);
    let mut voters = ctx.cast_votes(p, q, true, 2);
    voters.extend(ctx.cast_votes(p, q, false, 1));

    let proposal = ctx.proposal(p, q);
    assert_eq!(proposal.yes_votes, 2);
    assert_eq!(proposal.no_votes, 1);
    assert_tally_matches_voters(&ctx.client, &proposal, &voters);
}

#[test]
fn test_has_user_voted() {
    let (ctx, p, q) = setup_proposal(100);
    let voter = ctx.generate_address();
    let bystander = ctx.generate_address();

    assert!(!ctx.client.has_user_voted(&p, &q, &voter));
    ctx.client.vote_on_proposal(&voter, &p, &q, &false);
    assert!(ctx.client.has_user_voted(&p, &q, &voter));
    assert!(!ctx.client.has_user_voted(&p, &q, &bystander));
}

#[test]
fn test_double_vote_rejected() {
    let (ctx, p, q) = setup_proposal(100);
    let voter = ctx.generate_address();
    ctx.client.vote_on_proposal(&voter, &p, &q, &true);

    // Same choice and flipped choice both fail.
    for choice in [true, false] {
        assert_eq!(
            ctx.client.try_vote_on_proposal(&voter, &p, &q, &choice),
            Err(Ok(Error::AlreadyVoted))
        );
    }

    let proposal = ctx.proposal(p, q);
    assert_eq!(proposal.yes_votes, 1);
    assert_eq!(proposal.no_votes, 0);
    assert_tally_matches_voters(&ctx.client, &proposal, &[voter]);
}

#[test]
fn test_vote_receipts_scoped_per_proposal() {
    let (ctx, p, q1) = setup_proposal(100);
    let q2 = ctx.create_proposal(p, "Add fountain", 100);
    let other_project = ctx.create_project("Library");
    let r1 = ctx.create_proposal(other_project, "Buy books", 100);
    let voter = ctx.generate_address();

    ctx.client.vote_on_proposal(&voter, &p, &q1, &true);
    ctx.client.vote_on_proposal(&voter, &p, &q2, &false);
    ctx.client.vote_on_proposal(&voter, &other_project, &r1, &true);

    assert_eq!(ctx.proposal(p, q1).yes_votes, 1);
    assert_eq!(ctx.proposal(p, q2).no_votes, 1);
    assert_eq!(ctx.proposal(other_project, r1).yes_votes, 1);
}

#[test]
fn test_vote_allowed_at_end_time() {
    let (ctx, p, q) = setup_proposal(100);
    let end = ctx.proposal(p, q).vote_end_time;

    ctx.set_time(end);
    ctx.cast_votes(p, q, true, 1);
    assert_eq!(ctx.proposal(p, q).yes_votes, 1);
}

#[test]
fn test_vote_after_end_time_rejected() {
    let (ctx, p, q) = setup_proposal(100);
    ctx.cast_votes(p, q, true, 3);
    let end = ctx.proposal(p, q).vote_end_time;

    ctx.set_time(end + 1);
    let late = ctx.generate_address();
    assert_eq!(
        ctx.client.try_vote_on_proposal(&late, &p, &q, &false),
        Err(Ok(Error::VotingClosed))
    );
    assert!(!ctx.client.has_user_voted(&p, &q, &late));
    assert_eq!(ctx.proposal(p, q).total_votes(), 3);
}

#[test]
fn test_vote_on_missing_entities_fails() {
    let (ctx, p, _) = setup_proposal(100);
    let voter = ctx.generate_address();

    assert_eq!(
        ctx.client.try_vote_on_proposal(&voter, &99, &1, &true),
        Err(Ok(Error::ProjectNotFound))
    );
    assert_eq!(
        ctx.client.try_vote_on_proposal(&voter, &p, &99, &true),
        Err(Ok(Error::ProposalNotFound))
    );
}

// ─── Finalization ────────────────────────────────────────

#[test]
fn test_total_votes_widens_full_counters() {
    let (ctx, p, q) = setup_proposal(100);
    let mut proposal = ctx.proposal(p, q);
    proposal.yes_votes = u32::MAX;
    proposal.no_votes = u32::MAX;
    assert_eq!(proposal.total_votes(), 2 * u64::from(u32::MAX));
}

#[test]
fn test_finalize_before_end_rejected() {
    let (ctx, p, q) = setup_proposal(100);
    ctx.cast_votes(p, q, true, 1);
    let caller = ctx.generate_address();

    assert_eq!(
        ctx.client.try_finalize_proposal(&caller, &p, &q),
        Err(Ok(Error::VotingStillActive))
    );

    // Still active exactly at the end timestamp.
    ctx.set_time(ctx.proposal(p, q).vote_end_time);
    assert_eq!(
        ctx.client.try_finalize_proposal(&caller, &p, &q),
        Err(Ok(Error::VotingStillActive))
    );
    assert_eq!(ctx.proposal(p, q).status, Status::Initial);
}

#[test]
fn test_finalize_twice_rejected() {
    let (ctx, p, q) = setup_proposal(100);
    ctx.cast_votes(p, q, true, 1);
    ctx.jump_time(101);

    let caller = ctx.generate_address();
    assert_eq!(ctx.client.finalize_proposal(&caller, &p, &q), Status::Approved);
    assert_eq!(
        ctx.client.try_finalize_proposal(&caller, &p, &q),
        Err(Ok(Error::AlreadyFinalized))
    );
    assert_eq!(ctx.proposal(p, q).status, Status::Approved);
}

#[test]
fn test_finalize_tie_rejects() {
    let (ctx, p, q) = setup_proposal(100);
    let mut voters = ctx.cast_votes(p, q, true, 3);
    voters.extend(ctx.cast_votes(p, q, false, 3));
    ctx.jump_time(101);

    let status = ctx.client.finalize_proposal(&ctx.creator, &p, &q);
    assert_eq!(status, Status::Rejected);

    let proposal = ctx.proposal(p, q);
    assert_eq!((proposal.yes_votes, proposal.no_votes), (3, 3));
    assert_outcome_matches_counts(&proposal);
    assert_tally_matches_voters(&ctx.client, &proposal, &voters);
}

#[test]
fn test_finalize_without_votes_rejects() {
    let (ctx, p, q) = setup_proposal(1);
    ctx.jump_time(2);
    assert_eq!(
        ctx.client.finalize_proposal(&ctx.creator, &p, &q),
        Status::Rejected
    );
}

#[test]
fn test_single_vote_decides() {
    let (ctx, p, q) = setup_proposal(10);
    ctx.cast_votes(p, q, true, 1);
    ctx.jump_time(11);
    assert_eq!(
        ctx.client.finalize_proposal(&ctx.creator, &p, &q),
        Status::Approved
    );
}

#[test]
fn test_minority_rejects() {
    let (ctx, p, q) = setup_proposal(10);
    ctx.cast_votes(p, q, true, 1);
    ctx.cast_votes(p, q, false, 2);
    ctx.jump_time(11);
    assert_eq!(
        ctx.client.finalize_proposal(&ctx.creator, &p, &q),
        Status::Rejected
    );
    assert_outcome_matches_counts(&ctx.proposal(p, q));
}

#[test]
fn test_finalize_keeps_counters_and_fields() {
    let (ctx, p, q) = setup_proposal(10);
    ctx.cast_votes(p, q, false, 2);
    let before = ctx.proposal(p, q);

    ctx.jump_time(11);
    ctx.client.finalize_proposal(&ctx.creator, &p, &q);

    let after = ctx.proposal(p, q);
    assert_proposal_immutable_fields(&before, &after);
    assert_eq!(after.no_votes, 2);
    assert_eq!(after.yes_votes, 0);
}

#[test]
fn test_vote_after_finalize_rejected() {
    let (ctx, p, q) = setup_proposal(10);
    ctx.jump_time(11);
    ctx.client.finalize_proposal(&ctx.creator, &p, &q);

    let voter = ctx.generate_address();
    assert_eq!(
        ctx.client.try_vote_on_proposal(&voter, &p, &q, &true),
        Err(Ok(Error::VotingClosed))
    );
}

#[test]
fn test_finalize_missing_entities_fails() {
    let (ctx, p, _) = setup_proposal(10);
    ctx.jump_time(11);

    assert_eq!(
        ctx.client.try_finalize_proposal(&ctx.creator, &42, &1),
        Err(Ok(Error::ProjectNotFound))
    );
    assert_eq!(
        ctx.client.try_finalize_proposal(&ctx.creator, &p, &42),
        Err(Ok(Error::ProposalNotFound))
    );
}

#[test]
fn test_project_status_does_not_gate_proposals() {
    let (ctx, p, q) = setup_proposal(10);
    ctx.client.set_project_status(&ctx.admin, &p, &Status::Rejected);

    ctx.cast_votes(p, q, true, 1);
    ctx.jump_time(11);
    assert_eq!(
        ctx.client.finalize_proposal(&ctx.creator, &p, &q),
        Status::Approved
    );
    assert_eq!(ctx.client.get_project(&p).status, Status::Rejected);
}

// ─── End-to-end ──────────────────────────────────────────

#[test]
fn test_garden_scenario() {
    let ctx = TestContext::new();

    let project_id = ctx.create_project("Garden");
    assert_eq!(project_id, 1);

    let proposal_id = ctx.create_proposal(project_id, "Build bench", 100);
    assert_eq!(proposal_id, 1);
    let proposal = ctx.proposal(project_id, proposal_id);
    assert_eq!(proposal.vote_end_time, proposal.created_at + 100);

    let alice = ctx.generate_address();
    let bob = ctx.generate_address();
    let carol = ctx.generate_address();
    ctx.client.vote_on_proposal(&alice, &project_id, &proposal_id, &true);
    ctx.client.vote_on_proposal(&bob, &project_id, &proposal_id, &true);
    ctx.client.vote_on_proposal(&carol, &project_id, &proposal_id, &false);

    ctx.set_time(proposal.vote_end_time);
    assert_eq!(
        ctx.client.try_finalize_proposal(&alice, &project_id, &proposal_id),
        Err(Ok(Error::VotingStillActive))
    );

    ctx.set_time(proposal.vote_end_time + 1);
    assert_eq!(
        ctx.client.finalize_proposal(&alice, &project_id, &proposal_id),
        Status::Approved
    );

    let finalized = ctx.proposal(project_id, proposal_id);
    assert_eq!(finalized.status, Status::Approved);
    assert_eq!((finalized.yes_votes, finalized.no_votes), (2, 1));
    assert_tally_matches_voters(&ctx.client, &finalized, &[alice, bob, carol]);
}
