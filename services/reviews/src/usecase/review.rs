use uuid::Uuid;

use yamdb_domain::clock::Clock;
use yamdb_domain::pagination::PageRequest;
use yamdb_domain::validate::{validate_score, validate_text};

use crate::domain::repository::{ReviewRepository, TitleRepository, UserRepository};
use crate::domain::types::Review;
use crate::error::ReviewsServiceError;

#[derive(Debug, Clone)]
pub struct CreateReviewInput {
    pub title_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub score: i16,
}

pub struct ReviewUseCase<R, T, U, C>
where
    R: ReviewRepository,
    T: TitleRepository,
    U: UserRepository,
    C: Clock,
{
    pub repo: R,
    pub titles: T,
    pub users: U,
    pub clock: C,
}

impl<R, T, U, C> ReviewUseCase<R, T, U, C>
where
    R: ReviewRepository,
    T: TitleRepository,
    U: UserRepository,
    C: Clock,
{
    /// One review per (title, author); a second attempt fails with
    /// `ReviewAlreadyExists`.
    pub async fn create(&self, input: CreateReviewInput) -> Result<Review, ReviewsServiceError> {
        validate_text(&input.text)?;
        validate_score(input.score)?;
        if !self.titles.exists(input.title_id).await? {
            return Err(ReviewsServiceError::TitleNotFound);
        }
        if self.users.find_by_id(input.author_id).await?.is_none() {
            return Err(ReviewsServiceError::UserNotFound);
        }

        let review = Review {
            id: Uuid::now_v7(),
            title_id: input.title_id,
            author_id: input.author_id,
            text: input.text,
            score: input.score,
            pub_date: self.clock.now(),
        };
        self.repo.create(&review).await?;
        tracing::info!(review_id = %review.id, title_id = %review.title_id, "review created");
        Ok(review)
    }

    pub async fn get(&self, id: Uuid) -> Result<Review, ReviewsServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ReviewsServiceError::ReviewNotFound)
    }

    pub async fn list_for_title(
        &self,
        title_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Review>, ReviewsServiceError> {
        if !self.titles.exists(title_id).await? {
            return Err(ReviewsServiceError::TitleNotFound);
        }
        self.repo.list_for_title(title_id, page).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        text: Option<String>,
        score: Option<i16>,
    ) -> Result<Review, ReviewsServiceError> {
        if text.is_none() && score.is_none() {
            return Err(ReviewsServiceError::MissingData);
        }
        if let Some(text) = &text {
            validate_text(text)?;
        }
        if let Some(score) = score {
            validate_score(score)?;
        }
        if !self.repo.update(id, text.as_deref(), score).await? {
            return Err(ReviewsServiceError::ReviewNotFound);
        }
        self.get(id).await
    }

    /// Removes the review and its comments.
    pub async fn delete(&self, id: Uuid) -> Result<(), ReviewsServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ReviewsServiceError::ReviewNotFound);
        }
        Ok(())
    }
}
