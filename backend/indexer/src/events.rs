//! Canonical event types emitted by the governance ledger contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/governance_ledger/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the governance ledger contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A project was registered (`proj_new` topic).
    ProjectCreated,
    /// The administrator overrode a project status (`proj_stat` topic).
    ProjectStatusChanged,
    /// A proposal was opened under a project (`prop_new` topic).
    ProposalCreated,
    /// A vote was recorded (`voted` topic).
    VoteCast,
    /// A proposal was finalized to Approved or Rejected (`prop_fin` topic).
    ProposalFinalized,
    /// The administrator was set or transferred (`admin_set` topic).
    AdminChanged,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "proj_new" => Self::ProjectCreated,
            "proj_stat" => Self::ProjectStatusChanged,
            "prop_new" => Self::ProposalCreated,
            "voted" => Self::VoteCast,
            "prop_fin" => Self::ProposalFinalized,
            "admin_set" => Self::AdminChanged,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectCreated => "project_created",
            Self::ProjectStatusChanged => "project_status_changed",
            Self::ProposalCreated => "proposal_created",
            Self::VoteCast => "vote_cast",
            Self::ProposalFinalized => "proposal_finalized",
            Self::AdminChanged => "admin_changed",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the topic tuple carries a proposal id after the project id.
    pub fn has_proposal_topic(&self) -> bool {
        matches!(
            self,
            Self::ProposalCreated | Self::VoteCast | Self::ProposalFinalized
        )
    }
}

/// `detail` value stored for a yes vote.
pub const VOTE_YES: &str = "yes";
/// `detail` value stored for a no vote.
pub const VOTE_NO: &str = "no";

/// A fully decoded ledger event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// RPC event id; unique per event and used for idempotent inserts.
    pub event_id: String,
    pub event_type: String,
    pub project_id: Option<String>,
    pub proposal_id: Option<String>,
    /// Address that caused the event (creator, voter, admin, ...).
    pub actor: Option<String>,
    /// Kind-specific payload: `yes`/`no` for votes, a status name for
    /// status changes and finalization, the project name or proposal
    /// description for creations.
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub project_id: Option<String>,
    pub proposal_id: Option<String>,
    pub actor: Option<String>,
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

/// Vote totals for one proposal, rebuilt from indexed `vote_cast` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalTally {
    pub project_id: String,
    pub proposal_id: String,
    pub yes_votes: i64,
    pub no_votes: i64,
    /// Distinct voters seen; equals `yes_votes + no_votes` for a
    /// well-formed event stream.
    pub voters: i64,
    /// Status recorded by the `proposal_finalized` event, if any.
    pub outcome: Option<String>,
}
