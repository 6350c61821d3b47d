//! Port for login account persistence.

use async_trait::async_trait;

use crate::domain::{Email, User, UserId, UserRole};

use super::{Repository, RepositoryError};

#[async_trait]
pub trait UserRepository: Repository<Entity = User, Id = UserId> {
    /// Account registered under `email`, ignoring case.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    async fn find_by_role(&self, role: UserRole) -> Result<Vec<User>, RepositoryError>;
}

#[cfg(test)]
mockall::mock! {
    pub UserStore {}

    #[async_trait]
    impl Repository for UserStore {
        type Entity = User;
        type Id = UserId;

        async fn find_by_id(&self, id: &UserId) -> Result<User, RepositoryError>;
        async fn save(&self, entity: User) -> Result<User, RepositoryError>;
        async fn update(&self, entity: User) -> Result<User, RepositoryError>;
        async fn delete(&self, id: &UserId) -> Result<bool, RepositoryError>;
        async fn find_all(&self) -> Result<Vec<User>, RepositoryError>;
    }

    #[async_trait]
    impl UserRepository for UserStore {
        async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;
        async fn find_by_role(&self, role: UserRole) -> Result<Vec<User>, RepositoryError>;
    }
}
