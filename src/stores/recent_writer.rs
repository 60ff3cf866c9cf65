use crate::events::collaborators::{OperationContext, Privilege, RecentListWriter};
use crate::models::user::{UserId, LAST_VIEWED_PATIENT_IDS_PROPERTY};
use crate::recent::RecentList;
use crate::stores::user_directory::UserDirectory;
use crate::wal::wal::{Wal, WalOperation};
use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tracing::debug;

/// Stores recent lists as the user's last viewed property.
///
/// The change is appended to the WAL before the directory is touched, so a
/// store that returns an error has not changed what readers see.
pub struct UserPropertyWriter {
    users: Arc<UserDirectory>,
    wal: Arc<Wal>,
}

impl UserPropertyWriter {
    pub fn new(users: Arc<UserDirectory>, wal: Arc<Wal>) -> Self {
        Self { users, wal }
    }
}

impl RecentListWriter for UserPropertyWriter {
    fn store(&self, ctx: &OperationContext, user_id: UserId, list: &RecentList) -> Result<()> {
        ctx.require(Privilege::EditUserProperties)?;

        if self.users.get_by_id(user_id).is_none() {
            bail!("User {} not found", user_id);
        }

        let value = list.to_property_value();

        self.wal
            .log_operation(WalOperation::SetLastViewed {
                user_id,
                value: value.clone(),
            })
            .context("Failed to log last viewed update")?;

        if !self.users.set_last_viewed(user_id, value) {
            bail!("User {} was removed while storing last viewed patients", user_id);
        }

        debug!(
            actor = ctx.actor(),
            user_id,
            property = LAST_VIEWED_PATIENT_IDS_PROPERTY,
            entries = list.len(),
            "User property stored"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::User;
    use tempfile::TempDir;

    fn setup() -> (UserPropertyWriter, Arc<UserDirectory>, Arc<Wal>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let wal = Arc::new(Wal::new(temp_dir.path().join("test.wal")).unwrap());
        let users = Arc::new(UserDirectory::new());
        users.add_user(User::new(3, "user-3"));

        let writer = UserPropertyWriter::new(Arc::clone(&users), Arc::clone(&wal));
        (writer, users, wal, temp_dir)
    }

    fn privileged() -> OperationContext {
        OperationContext::new("test").grant(Privilege::EditUserProperties)
    }

    #[test]
    fn test_store_updates_directory_and_wal() {
        let (writer, users, wal, _dir) = setup();

        writer
            .store(&privileged(), 3, &RecentList::new(vec![4, 5, 6]))
            .unwrap();

        assert_eq!(
            users.get_by_id(3).unwrap().last_viewed_patient_ids.as_deref(),
            Some("4,5,6")
        );
        assert_eq!(
            wal.replay().unwrap(),
            vec![WalOperation::SetLastViewed {
                user_id: 3,
                value: "4,5,6".to_string()
            }]
        );
    }

    #[test]
    fn test_store_requires_privilege() {
        let (writer, users, wal, _dir) = setup();
        let ctx = OperationContext::new("test");

        assert!(writer.store(&ctx, 3, &RecentList::new(vec![1])).is_err());
        assert!(users.get_by_id(3).unwrap().last_viewed_patient_ids.is_none());
        assert!(wal.replay().unwrap().is_empty());
    }

    #[test]
    fn test_store_unknown_user() {
        let (writer, _users, wal, _dir) = setup();

        let err = writer
            .store(&privileged(), 99, &RecentList::new(vec![1]))
            .unwrap_err();

        assert!(err.to_string().contains("99"));
        assert!(wal.replay().unwrap().is_empty());
    }
}
