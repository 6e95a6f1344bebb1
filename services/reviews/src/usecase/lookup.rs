use uuid::Uuid;

use yamdb_domain::pagination::PageRequest;
use yamdb_domain::validate::{validate_name, validate_slug};

use crate::domain::repository::LookupRepository;
use crate::domain::types::Lookup;
use crate::error::ReviewsServiceError;

/// Categories and genres share the same operations; the repository decides
/// which table is addressed.
pub struct LookupUseCase<R: LookupRepository> {
    pub repo: R,
    pub slug_max_len: usize,
}

impl<R: LookupRepository> LookupUseCase<R> {
    pub async fn create(&self, name: &str, slug: &str) -> Result<Lookup, ReviewsServiceError> {
        validate_name(name)?;
        validate_slug(slug, self.slug_max_len)?;
        let item = Lookup {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            slug: slug.to_owned(),
        };
        self.repo.create(&item).await?;
        tracing::info!(kind = ?self.repo.kind(), slug = %item.slug, "lookup created");
        Ok(item)
    }

    pub async fn list(&self, page: PageRequest) -> Result<Vec<Lookup>, ReviewsServiceError> {
        self.repo.list(page).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Lookup, ReviewsServiceError> {
        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| ReviewsServiceError::lookup_not_found(self.repo.kind()))
    }

    /// Titles pointing at a deleted category keep existing with no category;
    /// a deleted genre is unlinked from its titles.
    pub async fn delete_by_slug(&self, slug: &str) -> Result<(), ReviewsServiceError> {
        if !self.repo.delete_by_slug(slug).await? {
            return Err(ReviewsServiceError::lookup_not_found(self.repo.kind()));
        }
        tracing::info!(kind = ?self.repo.kind(), slug, "lookup deleted");
        Ok(())
    }
}
