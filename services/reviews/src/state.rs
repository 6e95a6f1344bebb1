use std::sync::Arc;

use sea_orm::DatabaseConnection;

use yamdb_domain::clock::{Clock, SystemClock};

use crate::config::ReviewsConfig;
use crate::domain::confirmation::{ConfirmationCodeIssuer, InvalidSecret};
use crate::domain::types::LookupKind;
use crate::infra::db::{
    DbCommentRepository, DbLookupRepository, DbReviewRepository, DbTitleRepository,
    DbUserRepository,
};
use crate::usecase::comment::CommentUseCase;
use crate::usecase::lookup::LookupUseCase;
use crate::usecase::review::ReviewUseCase;
use crate::usecase::title::TitleUseCase;
use crate::usecase::user::UserUseCase;

/// Shared application state: one database handle plus the collaborators
/// every use case needs.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub clock: Arc<dyn Clock>,
    pub issuer: ConfirmationCodeIssuer,
    pub slug_max_len: usize,
}

impl AppState {
    pub fn from_config(
        db: DatabaseConnection,
        config: &ReviewsConfig,
    ) -> Result<Self, InvalidSecret> {
        Ok(Self {
            db,
            clock: Arc::new(SystemClock),
            issuer: ConfirmationCodeIssuer::new(
                &config.secret_key,
                config.confirmation_code_ttl(),
            )?,
            slug_max_len: config.slug_max_len,
        })
    }

    pub fn users(&self) -> UserUseCase<DbUserRepository, Arc<dyn Clock>> {
        UserUseCase {
            repo: DbUserRepository {
                db: self.db.clone(),
            },
            issuer: self.issuer.clone(),
            clock: self.clock.clone(),
        }
    }

    pub fn categories(&self) -> LookupUseCase<DbLookupRepository> {
        self.lookups(LookupKind::Category)
    }

    pub fn genres(&self) -> LookupUseCase<DbLookupRepository> {
        self.lookups(LookupKind::Genre)
    }

    fn lookups(&self, kind: LookupKind) -> LookupUseCase<DbLookupRepository> {
        LookupUseCase {
            repo: DbLookupRepository {
                db: self.db.clone(),
                kind,
            },
            slug_max_len: self.slug_max_len,
        }
    }

    pub fn titles(
        &self,
    ) -> TitleUseCase<DbTitleRepository, DbLookupRepository, DbLookupRepository, Arc<dyn Clock>>
    {
        TitleUseCase {
            repo: DbTitleRepository {
                db: self.db.clone(),
            },
            categories: DbLookupRepository {
                db: self.db.clone(),
                kind: LookupKind::Category,
            },
            genres: DbLookupRepository {
                db: self.db.clone(),
                kind: LookupKind::Genre,
            },
            clock: self.clock.clone(),
        }
    }

    pub fn reviews(
        &self,
    ) -> ReviewUseCase<DbReviewRepository, DbTitleRepository, DbUserRepository, Arc<dyn Clock>>
    {
        ReviewUseCase {
            repo: DbReviewRepository {
                db: self.db.clone(),
            },
            titles: DbTitleRepository {
                db: self.db.clone(),
            },
            users: DbUserRepository {
                db: self.db.clone(),
            },
            clock: self.clock.clone(),
        }
    }

    pub fn comments(
        &self,
    ) -> CommentUseCase<DbCommentRepository, DbReviewRepository, DbUserRepository, Arc<dyn Clock>>
    {
        CommentUseCase {
            repo: DbCommentRepository {
                db: self.db.clone(),
            },
            reviews: DbReviewRepository {
                db: self.db.clone(),
            },
            users: DbUserRepository {
                db: self.db.clone(),
            },
            clock: self.clock.clone(),
        }
    }
}
