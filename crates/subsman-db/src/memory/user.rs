//! In-memory user repository

use async_trait::async_trait;
use subsman_types::{User, UserId};

use super::{sorted_values, Table};
use crate::error::{DbError, DbResult};
use crate::repo::UserRepository;

/// In-memory user repository
#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    users: Table<UserId, User>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_table(users: Table<UserId, User>) -> Self {
        Self { users }
    }

    /// Reject `user` if another record already holds its email or username
    fn check_unique(&self, user: &User) -> DbResult<()> {
        for existing in self.users.iter() {
            if existing.id == user.id {
                continue;
            }
            if existing.email == user.email {
                return Err(DbError::Conflict("users_email_key".to_string()));
            }
            if existing.username == user.username {
                return Err(DbError::Conflict("users_username_key".to_string()));
            }
        }
        Ok(())
    }

    fn find(&self, pred: impl Fn(&User) -> bool) -> DbResult<User> {
        self.users
            .iter()
            .find(|r| pred(r.value()))
            .map(|r| r.value().clone())
            .ok_or(DbError::NotFound)
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: User) -> DbResult<User> {
        if self.users.contains_key(&user.id) {
            return Err(DbError::Conflict("users_pkey".to_string()));
        }
        self.check_unique(&user)?;
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: UserId) -> DbResult<User> {
        self.users
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or(DbError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> DbResult<User> {
        self.find(|u| u.email == email)
    }

    async fn get_by_username(&self, username: &str) -> DbResult<User> {
        self.find(|u| u.username == username)
    }

    async fn get_all(&self) -> DbResult<Vec<User>> {
        Ok(sorted_values(&self.users, |_| true))
    }

    async fn update(&self, user: &User) -> DbResult<()> {
        self.check_unique(user)?;
        let mut stored = self.users.get_mut(&user.id).ok_or(DbError::NotFound)?;
        let created_at = stored.created_at;
        *stored = user.clone();
        stored.created_at = created_at;
        Ok(())
    }

    async fn delete(&self, id: UserId) -> DbResult<()> {
        self.users.remove(&id).map(|_| ()).ok_or(DbError::NotFound)
    }

    async fn count(&self) -> DbResult<i64> {
        Ok(self.users.len() as i64)
    }

    async fn clear(&self) -> DbResult<u64> {
        let removed = self.users.len() as u64;
        self.users.clear();
        Ok(removed)
    }
}
