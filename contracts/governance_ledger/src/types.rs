//! # Types
//!
//! Shared data structures used across all modules of the governance ledger.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! Both a `Project` and a `Proposal` are stored internally as two separate
//! ledger entries:
//!
//! - [`ProjectConfig`] / [`ProposalConfig`]: written once at creation, never mutated.
//! - [`ProjectState`] / [`ProposalState`]: written on status changes, new
//!   proposals, and votes.
//!
//! The public API exposes the reconstructed [`Project`] and [`Proposal`]
//! views.
//!
//! ### Status
//!
//! Projects and proposals share the [`Status`] enum. A project's status is an
//! administrative label with no transition table. A proposal's status only
//! ever moves forward, exactly once:
//!
//! ```text
//! Initial / Active ──► Approved
//!                  └─► Rejected
//! ```

use soroban_sdk::{contracttype, Address, String};

/// Lifecycle status shared by projects and proposals.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    Initial,
    Active,
    Completed,
    Cancelled,
    Approved,
    Rejected,
}

/// Immutable project fields, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    pub id: u64,
    pub name: String,
    pub creator: Address,
    pub created_at: u64,
}

/// Mutable project fields.
///
/// `proposal_count` doubles as the allocator for the project's local
/// proposal ids.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectState {
    pub status: Status,
    pub proposal_count: u64,
}

/// Snapshot of a project as returned by `get_project`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    /// Unique identifier, auto-incremented from 1.
    pub id: u64,
    /// Free-form display name; not unique.
    pub name: String,
    /// Address that created the project.
    pub creator: Address,
    /// Ledger timestamp of creation.
    pub created_at: u64,
    /// Current administrative status.
    pub status: Status,
    /// Number of proposals ever opened under this project.
    pub proposal_count: u64,
}

/// Immutable proposal fields, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalConfig {
    pub id: u64,
    pub project_id: u64,
    pub description: String,
    pub proposer: Address,
    pub created_at: u64,
    pub vote_end_time: u64,
}

/// Mutable proposal fields, rewritten on every vote and on finalization.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalState {
    pub yes_votes: u32,
    pub no_votes: u32,
    pub status: Status,
}

/// Snapshot of a proposal as returned by `get_proposal`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Proposal {
    /// Local identifier, unique only within `project_id`.
    pub id: u64,
    /// Owning project.
    pub project_id: u64,
    pub description: String,
    pub proposer: Address,
    pub created_at: u64,
    /// Last ledger timestamp at which votes are accepted.
    pub vote_end_time: u64,
    pub yes_votes: u32,
    pub no_votes: u32,
    pub status: Status,
}

impl Proposal {
    /// Total votes cast so far. Widened so two full counters cannot overflow.
    pub fn total_votes(&self) -> u64 {
        u64::from(self.yes_votes) + u64::from(self.no_votes)
    }
}
