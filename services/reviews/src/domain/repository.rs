#![allow(async_fn_in_trait)]

use uuid::Uuid;

use yamdb_domain::pagination::PageRequest;

use crate::domain::confirmation::ConfirmationCodeIssuer;
use crate::domain::types::{
    Comment, Lookup, LookupKind, NewTitle, Review, Title, TitleChanges, TitleFilter, User,
    UserChanges,
};
use crate::error::ReviewsServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ReviewsServiceError>;

    async fn find_by_username(&self, username: &str)
    -> Result<Option<User>, ReviewsServiceError>;

    /// Users ordered by id.
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, ReviewsServiceError>;

    /// Insert `user` with the placeholder code, then stamp the code produced by
    /// `issuer`. Both writes commit together. Returns the stamped record.
    async fn create(
        &self,
        user: &User,
        issuer: &ConfirmationCodeIssuer,
    ) -> Result<User, ReviewsServiceError>;

    /// Returns `None` if no such user.
    async fn update(
        &self,
        id: Uuid,
        changes: &UserChanges,
    ) -> Result<Option<User>, ReviewsServiceError>;

    /// Delete a user. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ReviewsServiceError>;
}

/// Repository for a slug-addressed lookup table (categories or genres).
pub trait LookupRepository: Send + Sync {
    fn kind(&self) -> LookupKind;

    async fn create(&self, item: &Lookup) -> Result<(), ReviewsServiceError>;

    /// Items ordered by name.
    async fn list(&self, page: PageRequest) -> Result<Vec<Lookup>, ReviewsServiceError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Lookup>, ReviewsServiceError>;

    /// Items whose slug is in `slugs`; unknown slugs are skipped.
    async fn find_by_slugs(&self, slugs: &[String]) -> Result<Vec<Lookup>, ReviewsServiceError>;

    /// Delete by slug. Returns `true` if a row was deleted.
    async fn delete_by_slug(&self, slug: &str) -> Result<bool, ReviewsServiceError>;
}

/// Repository for titles and their genre links.
pub trait TitleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Title>, ReviewsServiceError>;

    async fn exists(&self, id: Uuid) -> Result<bool, ReviewsServiceError>;

    /// Titles ordered by name.
    async fn list(
        &self,
        filter: &TitleFilter,
        page: PageRequest,
    ) -> Result<Vec<Title>, ReviewsServiceError>;

    /// Insert the title row and its genre links in one transaction.
    async fn create(&self, title: &NewTitle) -> Result<(), ReviewsServiceError>;

    /// Apply `changes`; replaces genre links when `genre_ids` is set.
    /// Returns `false` if no such title.
    async fn update(&self, id: Uuid, changes: &TitleChanges) -> Result<bool, ReviewsServiceError>;

    /// Delete a title and, by cascade, its reviews and their comments.
    async fn delete(&self, id: Uuid) -> Result<bool, ReviewsServiceError>;
}

/// Repository for reviews.
pub trait ReviewRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, ReviewsServiceError>;

    /// Reviews of a title ordered by publication date.
    async fn list_for_title(
        &self,
        title_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Review>, ReviewsServiceError>;

    /// Fails with `ReviewAlreadyExists` if the author already reviewed the title.
    async fn create(&self, review: &Review) -> Result<(), ReviewsServiceError>;

    /// Update text and/or score. `pub_date` is never touched.
    async fn update(
        &self,
        id: Uuid,
        text: Option<&str>,
        score: Option<i16>,
    ) -> Result<bool, ReviewsServiceError>;

    async fn delete(&self, id: Uuid) -> Result<bool, ReviewsServiceError>;
}

/// Repository for comments on reviews.
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, ReviewsServiceError>;

    /// Comments of a review ordered by publication date.
    async fn list_for_review(
        &self,
        review_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Comment>, ReviewsServiceError>;

    async fn create(&self, comment: &Comment) -> Result<(), ReviewsServiceError>;

    async fn update_text(&self, id: Uuid, text: &str) -> Result<bool, ReviewsServiceError>;

    async fn delete(&self, id: Uuid) -> Result<bool, ReviewsServiceError>;
}
