use uuid::Uuid;

use yamdb_domain::clock::Clock;
use yamdb_domain::pagination::PageRequest;
use yamdb_domain::user::UserRole;
use yamdb_domain::validate::{validate_email, validate_person_name, validate_username};

use crate::domain::confirmation::ConfirmationCodeIssuer;
use crate::domain::repository::UserRepository;
use crate::domain::types::{User, UserChanges};
use crate::error::ReviewsServiceError;

#[derive(Debug, Clone, Default)]
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: UserRole,
}

pub struct UserUseCase<R: UserRepository, C: Clock> {
    pub repo: R,
    pub issuer: ConfirmationCodeIssuer,
    pub clock: C,
}

impl<R: UserRepository, C: Clock> UserUseCase<R, C> {
    // ── CreateUser ───────────────────────────────────────────────────────────

    /// Validate and persist a new user. The returned record carries the issued
    /// confirmation code, never the placeholder.
    pub async fn create(&self, input: CreateUserInput) -> Result<User, ReviewsServiceError> {
        validate_username(&input.username)?;
        validate_email(&input.email)?;
        validate_person_name(&input.first_name)?;
        validate_person_name(&input.last_name)?;

        let user = User {
            id: Uuid::now_v7(),
            username: input.username,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            role: input.role,
            bio: input.bio,
            confirmation_code: None,
            date_joined: self.clock.now(),
        };
        let user = self.repo.create(&user, &self.issuer).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user)
    }

    // ── GetUser ──────────────────────────────────────────────────────────────

    pub async fn get(&self, id: Uuid) -> Result<User, ReviewsServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ReviewsServiceError::UserNotFound)
    }

    pub async fn get_by_username(&self, username: &str) -> Result<User, ReviewsServiceError> {
        self.repo
            .find_by_username(username)
            .await?
            .ok_or(ReviewsServiceError::UserNotFound)
    }

    pub async fn list(&self, page: PageRequest) -> Result<Vec<User>, ReviewsServiceError> {
        self.repo.list(page).await
    }

    // ── UpdateUser ───────────────────────────────────────────────────────────

    pub async fn update(
        &self,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<User, ReviewsServiceError> {
        if changes.is_empty() {
            return Err(ReviewsServiceError::MissingData);
        }
        if let Some(username) = &changes.username {
            validate_username(username)?;
        }
        if let Some(email) = &changes.email {
            validate_email(email)?;
        }
        for name in [&changes.first_name, &changes.last_name].into_iter().flatten() {
            validate_person_name(name)?;
        }
        self.repo
            .update(id, &changes)
            .await?
            .ok_or(ReviewsServiceError::UserNotFound)
    }

    // ── DeleteUser ───────────────────────────────────────────────────────────

    /// Removes the user together with their reviews and comments.
    pub async fn delete(&self, id: Uuid) -> Result<(), ReviewsServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ReviewsServiceError::UserNotFound);
        }
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }

    // ── ConfirmationCode ─────────────────────────────────────────────────────

    /// Check `code` against the user's current state at the clock's now.
    pub async fn check_confirmation_code(
        &self,
        username: &str,
        code: &str,
    ) -> Result<bool, ReviewsServiceError> {
        let user = self.get_by_username(username).await?;
        if !user.is_confirmable() {
            return Ok(false);
        }
        Ok(self.issuer.verify(&user, code, self.clock.now()))
    }
}
