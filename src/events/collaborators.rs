// Seams between the patient viewed listener and the services it runs against

use crate::models::patient::{Patient, PatientId};
use crate::models::user::{User, UserId};
use crate::recent::RecentList;
use anyhow::Result;
use std::sync::Arc;

pub trait PatientResolver: Send + Sync {
    fn patient_by_uuid(&self, uuid: &str) -> Option<Arc<Patient>>;

    fn patient_by_id(&self, id: PatientId) -> Option<Arc<Patient>>;
}

pub trait UserResolver: Send + Sync {
    fn user_by_uuid(&self, uuid: &str) -> Option<Arc<User>>;
}

/// Persists a user's recent list, replacing whatever was stored before
pub trait RecentListWriter: Send + Sync {
    fn store(&self, ctx: &OperationContext, user_id: UserId, list: &RecentList) -> Result<()>;
}

pub trait LimitProvider: Send + Sync {
    /// Maximum length of a recent list, zero disables tracking
    fn last_viewed_limit(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    EditUserProperties,
}

impl Privilege {
    pub fn as_str(&self) -> &'static str {
        match self {
            Privilege::EditUserProperties => "Edit User Properties",
        }
    }
}

/// Identity and privileges an operation runs with.
///
/// Passed explicitly to collaborators that need authorization instead of
/// being read from ambient session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationContext {
    actor: String,
    privileges: Vec<Privilege>,
}

impl OperationContext {
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            privileges: Vec::new(),
        }
    }

    pub fn grant(mut self, privilege: Privilege) -> Self {
        if !self.privileges.contains(&privilege) {
            self.privileges.push(privilege);
        }
        self
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn has(&self, privilege: Privilege) -> bool {
        self.privileges.contains(&privilege)
    }

    /// Fail unless the context holds `privilege`
    pub fn require(&self, privilege: Privilege) -> Result<()> {
        if !self.has(privilege) {
            anyhow::bail!(
                "{} lacks required privilege '{}'",
                self.actor,
                privilege.as_str()
            );
        }
        Ok(())
    }
}
