//! # Project registry
//!
//! Owns project records: id allocation, existence checks, and the
//! administrator's status override. The proposal ledger resolves every
//! project through [`require_project`] before touching proposal storage.

use soroban_sdk::{Address, Env, String};

use crate::storage;
use crate::types::{Project, ProjectConfig, ProjectState, Status};
use crate::{admin, events, Error};

/// Allocate the next project id and persist a new `Initial` project.
pub fn create_project(env: &Env, creator: &Address, name: String) -> Result<u64, Error> {
    let id = storage::increment_project_id(env).ok_or(Error::Overflow)?;
    let created_at = env.ledger().timestamp();

    let project = Project {
        id,
        name: name.clone(),
        creator: creator.clone(),
        created_at,
        status: Status::Initial,
        proposal_count: 0,
    };
    storage::save_project(env, &project);

    events::emit_project_created(env, id, name, creator.clone(), created_at);
    Ok(id)
}

/// Overwrite a project's status. Any status may move to any other.
///
/// Existence is checked before authorization, so a missing project reports
/// `ProjectNotFound` even to a non-administrator.
pub fn set_project_status(
    env: &Env,
    caller: &Address,
    project_id: u64,
    status: Status,
) -> Result<(), Error> {
    let (_, mut state) = require_project(env, project_id)?;
    admin::require_admin(env, caller)?;

    let old_status = state.status;
    state.status = status;
    storage::save_project_state(env, project_id, &state);

    events::emit_project_status_changed(env, project_id, old_status, status, caller.clone());
    Ok(())
}

/// Snapshot of a project.
pub fn get_project(env: &Env, project_id: u64) -> Result<Project, Error> {
    storage::load_project(env, project_id).ok_or(Error::ProjectNotFound)
}

/// Load both halves of a project, or fail with `ProjectNotFound`.
pub fn require_project(env: &Env, project_id: u64) -> Result<(ProjectConfig, ProjectState), Error> {
    storage::load_project_pair(env, project_id).ok_or(Error::ProjectNotFound)
}
