use crate::events::collaborators::UserResolver;
use crate::models::user::{User, UserId};
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory directory of users, keyed by uuid
pub struct UserDirectory {
    users: DashMap<String, Arc<User>>,
    by_id: DashMap<UserId, String>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            by_id: DashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            users: DashMap::with_capacity(capacity),
            by_id: DashMap::with_capacity(capacity),
        }
    }

    /// Add a user, replacing any user with the same uuid
    pub fn add_user(&self, user: User) {
        if let Some(previous) = self.users.get(&user.uuid).map(|u| u.id) {
            self.by_id.remove(&previous);
        }
        self.by_id.insert(user.id, user.uuid.clone());
        self.users.insert(user.uuid.clone(), Arc::new(user));
    }

    /// Remove a user by uuid, returning it if it existed
    pub fn remove_user(&self, uuid: &str) -> Option<Arc<User>> {
        let (_, user) = self.users.remove(uuid)?;
        self.by_id.remove_if(&user.id, |_, owner| owner == uuid);
        Some(user)
    }

    pub fn get_by_uuid(&self, uuid: &str) -> Option<Arc<User>> {
        self.users.get(uuid).map(|entry| Arc::clone(entry.value()))
    }

    pub fn get_by_id(&self, id: UserId) -> Option<Arc<User>> {
        let uuid = self.by_id.get(&id).map(|entry| entry.value().clone())?;
        self.get_by_uuid(&uuid)
    }

    /// Overwrite the stored last viewed value of a user.
    ///
    /// Returns false when no user has this id. Concurrent writes for the same
    /// user resolve last write wins.
    pub fn set_last_viewed(&self, id: UserId, value: String) -> bool {
        let Some(uuid) = self.by_id.get(&id).map(|entry| entry.value().clone()) else {
            return false;
        };

        match self.users.get_mut(&uuid) {
            Some(mut entry) => {
                let mut user = User::clone(entry.value());
                user.last_viewed_patient_ids = Some(value);
                *entry.value_mut() = Arc::new(user);
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        self.users.clear();
        self.by_id.clear();
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserResolver for UserDirectory {
    fn user_by_uuid(&self, uuid: &str) -> Option<Arc<User>> {
        self.get_by_uuid(uuid)
    }
}
