use chrono::{DateTime, Utc};
use uuid::Uuid;

use yamdb_domain::user::UserRole;

/// Stored in `users.confirmation_code` between insert and the post-create stamp.
pub const CONFIRMATION_CODE_PLACEHOLDER: &str = "XXXX";

/// Account that can author reviews and comments.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub bio: String,
    pub confirmation_code: Option<String>,
    pub date_joined: DateTime<Utc>,
}

/// Whether a user's confirmation code has been issued yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationState {
    /// No code, or still the placeholder.
    Pending,
    Issued,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_moderator(&self) -> bool {
        self.role.is_moderator()
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn confirmation_state(&self) -> ConfirmationState {
        match self.confirmation_code.as_deref() {
            None | Some(CONFIRMATION_CODE_PLACEHOLDER) => ConfirmationState::Pending,
            Some(_) => ConfirmationState::Issued,
        }
    }

    pub fn is_confirmable(&self) -> bool {
        self.confirmation_state() == ConfirmationState::Issued
    }
}

/// Partial update of a user. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<UserRole>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.bio.is_none()
            && self.role.is_none()
    }
}

/// Slug-addressed lookup record. Categories and genres share this shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

pub type Category = Lookup;
pub type Genre = Lookup;

/// Which lookup table a [`Lookup`] lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Category,
    Genre,
}

/// A reviewable work with its resolved category, genres and average score.
#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub genres: Vec<Genre>,
    /// Mean review score; `None` without reviews.
    pub rating: Option<f64>,
}

/// Row-level data for inserting a title.
#[derive(Debug, Clone)]
pub struct NewTitle {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub genre_ids: Vec<Uuid>,
}

/// Row-level partial update of a title. Outer `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct TitleChanges {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Option<Uuid>>,
    pub genre_ids: Option<Vec<Uuid>>,
}

/// Optional filters for title listings; all present filters must match.
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    pub category_slug: Option<String>,
    pub genre_slug: Option<String>,
    pub year: Option<i32>,
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: Uuid,
    pub title_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub score: i16,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Uuid,
    pub review_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}
