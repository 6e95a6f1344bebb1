use uuid::Uuid;

use yamdb_domain::clock::Clock;
use yamdb_domain::pagination::PageRequest;
use yamdb_domain::validate::{validate_name, validate_year};

use crate::domain::repository::{LookupRepository, TitleRepository};
use crate::domain::types::{Category, Genre, NewTitle, Title, TitleChanges, TitleFilter};
use crate::error::ReviewsServiceError;

#[derive(Debug, Clone, Default)]
pub struct CreateTitleInput {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_slug: Option<String>,
    pub genre_slugs: Vec<String>,
}

/// Partial title update. Outer `None` leaves the field unchanged; for
/// `description` and `category_slug`, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateTitleInput {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<Option<String>>,
    pub category_slug: Option<Option<String>>,
    pub genre_slugs: Option<Vec<String>>,
}

impl UpdateTitleInput {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.year.is_none()
            && self.description.is_none()
            && self.category_slug.is_none()
            && self.genre_slugs.is_none()
    }
}

pub struct TitleUseCase<T, CR, GR, C>
where
    T: TitleRepository,
    CR: LookupRepository,
    GR: LookupRepository,
    C: Clock,
{
    pub repo: T,
    pub categories: CR,
    pub genres: GR,
    pub clock: C,
}

impl<T, CR, GR, C> TitleUseCase<T, CR, GR, C>
where
    T: TitleRepository,
    CR: LookupRepository,
    GR: LookupRepository,
    C: Clock,
{
    // ── CreateTitle ──────────────────────────────────────────────────────────

    pub async fn create(&self, input: CreateTitleInput) -> Result<Title, ReviewsServiceError> {
        validate_name(&input.name)?;
        validate_year(input.year, &self.clock)?;

        let category = match &input.category_slug {
            Some(slug) => Some(self.resolve_category(slug).await?),
            None => None,
        };
        let genres = self.resolve_genres(&input.genre_slugs).await?;

        let title = NewTitle {
            id: Uuid::now_v7(),
            name: input.name,
            year: input.year,
            description: input.description,
            category_id: category.as_ref().map(|c| c.id),
            genre_ids: genres.iter().map(|g| g.id).collect(),
        };
        self.repo.create(&title).await?;
        tracing::info!(title_id = %title.id, genres = genres.len(), "title created");

        Ok(Title {
            id: title.id,
            name: title.name,
            year: title.year,
            description: title.description,
            category,
            genres,
            rating: None,
        })
    }

    // ── GetTitle / ListTitles ────────────────────────────────────────────────

    pub async fn get(&self, id: Uuid) -> Result<Title, ReviewsServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ReviewsServiceError::TitleNotFound)
    }

    pub async fn list(
        &self,
        filter: &TitleFilter,
        page: PageRequest,
    ) -> Result<Vec<Title>, ReviewsServiceError> {
        self.repo.list(filter, page).await
    }

    // ── UpdateTitle ──────────────────────────────────────────────────────────

    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateTitleInput,
    ) -> Result<Title, ReviewsServiceError> {
        if input.is_empty() {
            return Err(ReviewsServiceError::MissingData);
        }
        if let Some(name) = &input.name {
            validate_name(name)?;
        }
        if let Some(year) = input.year {
            validate_year(year, &self.clock)?;
        }

        let category_id = match &input.category_slug {
            Some(Some(slug)) => Some(Some(self.resolve_category(slug).await?.id)),
            Some(None) => Some(None),
            None => None,
        };
        let genre_ids = match &input.genre_slugs {
            Some(slugs) => Some(
                self.resolve_genres(slugs)
                    .await?
                    .into_iter()
                    .map(|g| g.id)
                    .collect(),
            ),
            None => None,
        };

        let changes = TitleChanges {
            name: input.name,
            year: input.year,
            description: input.description,
            category_id,
            genre_ids,
        };
        if !self.repo.update(id, &changes).await? {
            return Err(ReviewsServiceError::TitleNotFound);
        }
        self.get(id).await
    }

    // ── DeleteTitle ──────────────────────────────────────────────────────────

    /// Removes the title, its reviews and their comments.
    pub async fn delete(&self, id: Uuid) -> Result<(), ReviewsServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ReviewsServiceError::TitleNotFound);
        }
        tracing::info!(title_id = %id, "title deleted");
        Ok(())
    }

    async fn resolve_category(&self, slug: &str) -> Result<Category, ReviewsServiceError> {
        self.categories
            .find_by_slug(slug)
            .await?
            .ok_or(ReviewsServiceError::CategoryNotFound)
    }

    /// All slugs must resolve; duplicates collapse to one genre.
    async fn resolve_genres(&self, slugs: &[String]) -> Result<Vec<Genre>, ReviewsServiceError> {
        let mut wanted = slugs.to_vec();
        wanted.sort();
        wanted.dedup();
        let found = self.genres.find_by_slugs(&wanted).await?;
        if found.len() != wanted.len() {
            return Err(ReviewsServiceError::GenreNotFound);
        }
        Ok(found)
    }
}
