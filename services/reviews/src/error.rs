use yamdb_domain::validate::ValidationError;

use crate::domain::types::LookupKind;

/// Reviews service error variants.
///
/// Every write that is rejected surfaces here with its specific reason;
/// nothing is retried or coerced.
#[derive(Debug, thiserror::Error)]
pub enum ReviewsServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("username already taken")]
    UsernameTaken,
    #[error("email already registered")]
    EmailTaken,
    #[error("slug already exists")]
    SlugTaken,
    #[error("review for this title already exists")]
    ReviewAlreadyExists,
    #[error("user not found")]
    UserNotFound,
    #[error("category not found")]
    CategoryNotFound,
    #[error("genre not found")]
    GenreNotFound,
    #[error("title not found")]
    TitleNotFound,
    #[error("review not found")]
    ReviewNotFound,
    #[error("comment not found")]
    CommentNotFound,
    #[error("missing data")]
    MissingData,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ReviewsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.kind(),
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::SlugTaken => "SLUG_TAKEN",
            Self::ReviewAlreadyExists => "REVIEW_ALREADY_EXISTS",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::GenreNotFound => "GENRE_NOT_FOUND",
            Self::TitleNotFound => "TITLE_NOT_FOUND",
            Self::ReviewNotFound => "REVIEW_NOT_FOUND",
            Self::CommentNotFound => "COMMENT_NOT_FOUND",
            Self::MissingData => "MISSING_DATA",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Rejections caused by a uniqueness constraint.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::UsernameTaken | Self::EmailTaken | Self::SlugTaken | Self::ReviewAlreadyExists
        )
    }

    pub fn lookup_not_found(kind: LookupKind) -> Self {
        match kind {
            LookupKind::Category => Self::CategoryNotFound,
            LookupKind::Genre => Self::GenreNotFound,
        }
    }
}
