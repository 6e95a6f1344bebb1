use uuid::Uuid;

use yamdb_domain::clock::Clock;
use yamdb_domain::pagination::PageRequest;
use yamdb_domain::validate::validate_text;

use crate::domain::repository::{CommentRepository, ReviewRepository, UserRepository};
use crate::domain::types::{Comment, Review};
use crate::error::ReviewsServiceError;

#[derive(Debug, Clone)]
pub struct CreateCommentInput {
    /// Title the review is expected to belong to.
    pub title_id: Uuid,
    pub review_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
}

pub struct CommentUseCase<M, R, U, C>
where
    M: CommentRepository,
    R: ReviewRepository,
    U: UserRepository,
    C: Clock,
{
    pub repo: M,
    pub reviews: R,
    pub users: U,
    pub clock: C,
}

impl<M, R, U, C> CommentUseCase<M, R, U, C>
where
    M: CommentRepository,
    R: ReviewRepository,
    U: UserRepository,
    C: Clock,
{
    pub async fn create(&self, input: CreateCommentInput) -> Result<Comment, ReviewsServiceError> {
        validate_text(&input.text)?;
        self.review_of_title(input.title_id, input.review_id).await?;
        if self.users.find_by_id(input.author_id).await?.is_none() {
            return Err(ReviewsServiceError::UserNotFound);
        }

        let comment = Comment {
            id: Uuid::now_v7(),
            review_id: input.review_id,
            author_id: input.author_id,
            text: input.text,
            pub_date: self.clock.now(),
        };
        self.repo.create(&comment).await?;
        tracing::info!(comment_id = %comment.id, review_id = %comment.review_id, "comment created");
        Ok(comment)
    }

    pub async fn get(&self, id: Uuid) -> Result<Comment, ReviewsServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ReviewsServiceError::CommentNotFound)
    }

    pub async fn list_for_review(
        &self,
        review_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Comment>, ReviewsServiceError> {
        if self.reviews.find_by_id(review_id).await?.is_none() {
            return Err(ReviewsServiceError::ReviewNotFound);
        }
        self.repo.list_for_review(review_id, page).await
    }

    pub async fn update(&self, id: Uuid, text: String) -> Result<Comment, ReviewsServiceError> {
        validate_text(&text)?;
        if !self.repo.update_text(id, &text).await? {
            return Err(ReviewsServiceError::CommentNotFound);
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ReviewsServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ReviewsServiceError::CommentNotFound);
        }
        Ok(())
    }

    /// A review addressed under the wrong title is reported as not found.
    async fn review_of_title(
        &self,
        title_id: Uuid,
        review_id: Uuid,
    ) -> Result<Review, ReviewsServiceError> {
        match self.reviews.find_by_id(review_id).await? {
            Some(review) if review.title_id == title_id => Ok(review),
            _ => Err(ReviewsServiceError::ReviewNotFound),
        }
    }
}
