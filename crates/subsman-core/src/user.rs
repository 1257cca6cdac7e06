//! User use cases

use std::sync::Arc;

use chrono::Utc;
use subsman_db::UserRepository;
use subsman_types::{User, UserId, MAX_EMAIL_LEN};

use crate::error::{exists, ServiceError, ServiceResult};

/// User registration, lookup and authentication
pub struct UserService<U: UserRepository + ?Sized> {
    users: Arc<U>,
}

impl<U: UserRepository + ?Sized> UserService<U> {
    /// Create a new user service
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Register a new user.
    ///
    /// Email and username uniqueness are checked with two lookups before the
    /// insert. The check is not atomic; a concurrent registration can still
    /// reach the store, where a unique index turns it into a `Conflict`.
    pub async fn create_user(&self, user: User) -> ServiceResult<User> {
        validate_email(&user)?;

        if exists(self.users.get_by_email(&user.email).await)? {
            return Err(ServiceError::Conflict(
                "user with this email already exists".to_string(),
            ));
        }
        if exists(self.users.get_by_username(&user.username).await)? {
            return Err(ServiceError::Conflict(
                "user with this username already exists".to_string(),
            ));
        }

        let user = self.users.create(user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    pub async fn get_user(&self, id: UserId) -> ServiceResult<User> {
        self.users
            .get_by_id(id)
            .await
            .map_err(|e| ServiceError::from_db("user", e))
    }

    pub async fn list_users(&self) -> ServiceResult<Vec<User>> {
        Ok(self.users.get_all().await?)
    }

    pub async fn count_users(&self) -> ServiceResult<i64> {
        Ok(self.users.count().await?)
    }

    /// Replace a user's mutable fields
    pub async fn update_user(&self, mut user: User) -> ServiceResult<User> {
        validate_email(&user)?;
        user.updated_at = Utc::now();
        self.users
            .update(&user)
            .await
            .map_err(|e| ServiceError::from_db("user", e))?;
        Ok(user)
    }

    /// Soft-disable an account
    pub async fn deactivate_user(&self, id: UserId) -> ServiceResult<User> {
        let mut user = self.get_user(id).await?;
        user.deactivate();
        self.users
            .update(&user)
            .await
            .map_err(|e| ServiceError::from_db("user", e))?;
        tracing::info!(user_id = %id, "User deactivated");
        Ok(user)
    }

    pub async fn delete_user(&self, id: UserId) -> ServiceResult<()> {
        self.users
            .delete(id)
            .await
            .map_err(|e| ServiceError::from_db("user", e))?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Check an email/password pair.
    ///
    /// Plain string comparison against the stored credential; not suitable
    /// for production use.
    pub async fn authenticate_user(&self, email: &str, password: &str) -> ServiceResult<User> {
        let user = match self.users.get_by_email(email).await {
            Ok(user) => user,
            Err(subsman_db::DbError::NotFound) => return Err(ServiceError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        if !user.password_matches(password) {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(ServiceError::InvalidCredentials);
        }
        if !user.is_active() {
            return Err(ServiceError::InactiveAccount);
        }

        Ok(user)
    }
}

fn validate_email(user: &User) -> ServiceResult<()> {
    if user.validate_email() {
        Ok(())
    } else {
        Err(ServiceError::Validation(format!(
            "email must be 1 to {MAX_EMAIL_LEN} characters"
        )))
    }
}

impl<U: UserRepository + ?Sized> std::fmt::Debug for UserService<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}
