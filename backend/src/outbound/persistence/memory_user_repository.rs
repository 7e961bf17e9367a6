//! In-memory user repository.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{User, UserId};

#[derive(Default)]
struct Inner {
    by_id: HashMap<UserId, User>,
    id_by_username: HashMap<String, UserId>,
    manager_by_employee: HashMap<UserId, UserId>,
}

impl Inner {
    fn member_name(&self, id: UserId) -> String {
        self.by_id
            .get(&id)
            .map_or_else(|| id.to_string(), |user| user.username().to_string())
    }
}

/// Process-local user store keyed by id, with a username uniqueness index
/// and an employee-to-manager claim index.
#[derive(Default)]
pub struct MemoryUserRepository {
    inner: RwLock<Inner>,
}

impl MemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, UserRepositoryError> {
        self.inner.read().map_err(|_| UserRepositoryError::Storage {
            message: "user store lock poisoned".to_owned(),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, UserRepositoryError> {
        self.inner.write().map_err(|_| UserRepositoryError::Storage {
            message: "user store lock poisoned".to_owned(),
        })
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut inner = self.write()?;
        let username = user.username().as_str().to_owned();
        if inner.id_by_username.contains_key(&username) {
            return Err(UserRepositoryError::DuplicateUsername { username });
        }
        // Claim checks share the write guard with the insert, so two managers
        // racing for the same employee cannot both win.
        for member in user.team() {
            if inner.manager_by_employee.contains_key(member) {
                return Err(UserRepositoryError::AlreadyClaimed {
                    username: inner.member_name(*member),
                });
            }
        }
        for member in user.team() {
            inner.manager_by_employee.insert(*member, user.id());
        }
        inner.id_by_username.insert(username, user.id());
        inner.by_id.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.read()?.by_id.get(&id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let inner = self.read()?;
        Ok(inner
            .id_by_username
            .get(username)
            .and_then(|id| inner.by_id.get(id))
            .cloned())
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError> {
        let inner = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| inner.by_id.get(id))
            .cloned()
            .collect())
    }

    async fn manager_of(
        &self,
        employee_id: UserId,
    ) -> Result<Option<User>, UserRepositoryError> {
        let inner = self.read()?;
        Ok(inner
            .manager_by_employee
            .get(&employee_id)
            .and_then(|manager_id| inner.by_id.get(manager_id))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::{PasswordHash, Username};

    fn employee(name: &str) -> User {
        User::new_employee(
            UserId::random(),
            Username::new(name).expect("valid username"),
            PasswordHash::derive("pw"),
            Utc::now(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn insert_rejects_duplicate_usernames() {
        let repo = MemoryUserRepository::new();
        repo.insert(&employee("eve")).await.expect("first insert");
        let err = repo
            .insert(&employee("eve"))
            .await
            .expect_err("duplicate must fail");
        assert_eq!(
            err,
            UserRepositoryError::DuplicateUsername {
                username: "eve".to_owned()
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn lookups_work_by_id_and_username() {
        let repo = MemoryUserRepository::new();
        let user = employee("eve");
        repo.insert(&user).await.expect("insert");

        let by_id = repo.find_by_id(user.id()).await.expect("lookup");
        assert_eq!(by_id.as_ref().map(User::id), Some(user.id()));
        let by_name = repo.find_by_username("eve").await.expect("lookup");
        assert_eq!(by_name.map(|u| u.id()), Some(user.id()));
        assert!(repo.find_by_username("ghost").await.expect("lookup").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn find_many_preserves_order_and_skips_missing_ids() {
        let repo = MemoryUserRepository::new();
        let (a, b) = (employee("a"), employee("b"));
        repo.insert(&a).await.expect("insert");
        repo.insert(&b).await.expect("insert");

        let found = repo
            .find_many(&[b.id(), UserId::random(), a.id()])
            .await
            .expect("lookup");
        let ids: Vec<_> = found.iter().map(User::id).collect();
        assert_eq!(ids, vec![b.id(), a.id()]);
    }

    #[rstest]
    #[tokio::test]
    async fn insert_rejects_a_second_claim_on_the_same_employee() {
        let repo = MemoryUserRepository::new();
        let eve = employee("eve");
        let first = User::new_manager(
            UserId::random(),
            Username::new("m1").expect("valid username"),
            PasswordHash::derive("pw"),
            vec![eve.id()],
            Utc::now(),
        );
        let second = User::new_manager(
            UserId::random(),
            Username::new("m2").expect("valid username"),
            PasswordHash::derive("pw"),
            vec![eve.id()],
            Utc::now(),
        );
        repo.insert(&eve).await.expect("insert employee");
        repo.insert(&first).await.expect("first claim wins");

        let err = repo
            .insert(&second)
            .await
            .expect_err("second claim must fail");
        assert_eq!(
            err,
            UserRepositoryError::AlreadyClaimed {
                username: "eve".to_owned()
            }
        );
        // The losing manager was not stored at all.
        assert!(repo.find_by_username("m2").await.expect("lookup").is_none());
        let claimed = repo.manager_of(eve.id()).await.expect("lookup");
        assert_eq!(claimed.map(|u| u.id()), Some(first.id()));
    }

    #[rstest]
    #[tokio::test]
    async fn manager_of_finds_the_claiming_manager() {
        let repo = MemoryUserRepository::new();
        let eve = employee("eve");
        let boss = User::new_manager(
            UserId::random(),
            Username::new("m1").expect("valid username"),
            PasswordHash::derive("pw"),
            vec![eve.id()],
            Utc::now(),
        );
        repo.insert(&eve).await.expect("insert");
        repo.insert(&boss).await.expect("insert");

        let claimed = repo.manager_of(eve.id()).await.expect("lookup");
        assert_eq!(claimed.map(|u| u.id()), Some(boss.id()));
        assert!(
            repo.manager_of(UserId::random())
                .await
                .expect("lookup")
                .is_none()
        );
    }
}
