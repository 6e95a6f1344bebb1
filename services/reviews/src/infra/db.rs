use std::collections::HashSet;

use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel as _, ModelTrait as _, PaginatorTrait as _, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait as _, SqlErr, TransactionError, TransactionTrait,
    sea_query::{Expr, Func, JoinType, LikeExpr, Query},
};
use uuid::Uuid;

use yamdb_domain::pagination::PageRequest;
use yamdb_domain::user::UserRole;
use yamdb_reviews_schema::{categories, comments, genre_titles, genres, reviews, titles, users};

use crate::domain::confirmation::ConfirmationCodeIssuer;
use crate::domain::repository::{
    CommentRepository, LookupRepository, ReviewRepository, TitleRepository, UserRepository,
};
use crate::domain::types::{
    CONFIRMATION_CODE_PLACEHOLDER, Comment, Lookup, LookupKind, NewTitle, Review, Title,
    TitleChanges, TitleFilter, User, UserChanges,
};
use crate::error::ReviewsServiceError;

// ── Constraint mapping ───────────────────────────────────────────────────────

/// Message of a unique-constraint violation, if that is what `err` is.
fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => Some(msg),
        _ => None,
    }
}

fn unwrap_txn(err: TransactionError<DbErr>) -> DbErr {
    match err {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => e,
    }
}

fn map_user_err(err: DbErr, context: &'static str) -> ReviewsServiceError {
    match unique_violation(&err) {
        Some(msg) if msg.contains("username") => ReviewsServiceError::UsernameTaken,
        Some(msg) if msg.contains("email") => ReviewsServiceError::EmailTaken,
        _ => anyhow::Error::new(err).context(context).into(),
    }
}

fn map_slug_err(err: DbErr, context: &'static str) -> ReviewsServiceError {
    match unique_violation(&err) {
        Some(msg) if msg.contains("slug") => ReviewsServiceError::SlugTaken,
        _ => anyhow::Error::new(err).context(context).into(),
    }
}

/// Case-insensitive substring pattern with `LIKE` metacharacters taken literally.
fn contains_pattern(needle: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape('\\')
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ReviewsServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, ReviewsServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, ReviewsServiceError> {
        let (offset, limit) = page.offset_limit();
        let models = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list users")?;
        let users = models
            .into_iter()
            .map(user_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(users)
    }

    async fn create(
        &self,
        user: &User,
        issuer: &ConfirmationCodeIssuer,
    ) -> Result<User, ReviewsServiceError> {
        let stamped = self
            .db
            .transaction::<_, User, DbErr>(|txn| {
                let user = user.clone();
                let issuer = issuer.clone();
                Box::pin(async move {
                    users::ActiveModel {
                        id: Set(user.id),
                        username: Set(user.username.clone()),
                        email: Set(user.email.clone()),
                        first_name: Set(user.first_name.clone()),
                        last_name: Set(user.last_name.clone()),
                        role: Set(user.role.as_str().to_owned()),
                        bio: Set(user.bio.clone()),
                        confirmation_code: Set(Some(CONFIRMATION_CODE_PLACEHOLDER.to_owned())),
                        date_joined: Set(user.date_joined),
                    }
                    .insert(txn)
                    .await?;

                    // Post-create stamp: the code depends on the persisted identity.
                    let code = issuer
                        .issue(&user, user.date_joined)
                        .map_err(|e| DbErr::Custom(e.to_string()))?;
                    users::Entity::update_many()
                        .col_expr(users::Column::ConfirmationCode, Expr::value(code.clone()))
                        .filter(users::Column::Id.eq(user.id))
                        .exec(txn)
                        .await?;

                    Ok(User {
                        confirmation_code: Some(code),
                        ..user
                    })
                })
            })
            .await
            .map_err(|e| map_user_err(unwrap_txn(e), "create user"))?;
        Ok(stamped)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &UserChanges,
    ) -> Result<Option<User>, ReviewsServiceError> {
        let Some(model) = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user for update")?
        else {
            return Ok(None);
        };

        let mut am = model.into_active_model();
        if let Some(username) = &changes.username {
            am.username = Set(username.clone());
        }
        if let Some(email) = &changes.email {
            am.email = Set(email.clone());
        }
        if let Some(first_name) = &changes.first_name {
            am.first_name = Set(first_name.clone());
        }
        if let Some(last_name) = &changes.last_name {
            am.last_name = Set(last_name.clone());
        }
        if let Some(bio) = &changes.bio {
            am.bio = Set(bio.clone());
        }
        if let Some(role) = changes.role {
            am.role = Set(role.as_str().to_owned());
        }
        if !am.is_changed() {
            return self.find_by_id(id).await;
        }
        let model = am
            .update(&self.db)
            .await
            .map_err(|e| map_user_err(e, "update user"))?;
        Ok(Some(user_from_model(model)?))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ReviewsServiceError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> anyhow::Result<User> {
    let role: UserRole = model
        .role
        .parse()
        .with_context(|| format!("user {} has unreadable role", model.id))?;
    Ok(User {
        id: model.id,
        username: model.username,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        role,
        bio: model.bio,
        confirmation_code: model.confirmation_code,
        date_joined: model.date_joined,
    })
}

// ── Lookup repository (categories / genres) ──────────────────────────────────

#[derive(Clone)]
pub struct DbLookupRepository {
    pub db: DatabaseConnection,
    pub kind: LookupKind,
}

impl LookupRepository for DbLookupRepository {
    fn kind(&self) -> LookupKind {
        self.kind
    }

    async fn create(&self, item: &Lookup) -> Result<(), ReviewsServiceError> {
        let result = match self.kind {
            LookupKind::Category => categories::ActiveModel {
                id: Set(item.id),
                name: Set(item.name.clone()),
                slug: Set(item.slug.clone()),
            }
            .insert(&self.db)
            .await
            .map(|_| ()),
            LookupKind::Genre => genres::ActiveModel {
                id: Set(item.id),
                name: Set(item.name.clone()),
                slug: Set(item.slug.clone()),
            }
            .insert(&self.db)
            .await
            .map(|_| ()),
        };
        result.map_err(|e| map_slug_err(e, "create lookup"))
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Lookup>, ReviewsServiceError> {
        let (offset, limit) = page.offset_limit();
        let items = match self.kind {
            LookupKind::Category => categories::Entity::find()
                .order_by_asc(categories::Column::Name)
                .order_by_asc(categories::Column::Id)
                .offset(offset)
                .limit(limit)
                .all(&self.db)
                .await
                .context("list categories")?
                .into_iter()
                .map(category_from_model)
                .collect(),
            LookupKind::Genre => genres::Entity::find()
                .order_by_asc(genres::Column::Name)
                .order_by_asc(genres::Column::Id)
                .offset(offset)
                .limit(limit)
                .all(&self.db)
                .await
                .context("list genres")?
                .into_iter()
                .map(genre_from_model)
                .collect(),
        };
        Ok(items)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Lookup>, ReviewsServiceError> {
        let item = match self.kind {
            LookupKind::Category => categories::Entity::find()
                .filter(categories::Column::Slug.eq(slug))
                .one(&self.db)
                .await
                .context("find category by slug")?
                .map(category_from_model),
            LookupKind::Genre => genres::Entity::find()
                .filter(genres::Column::Slug.eq(slug))
                .one(&self.db)
                .await
                .context("find genre by slug")?
                .map(genre_from_model),
        };
        Ok(item)
    }

    async fn find_by_slugs(&self, slugs: &[String]) -> Result<Vec<Lookup>, ReviewsServiceError> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }
        let items = match self.kind {
            LookupKind::Category => categories::Entity::find()
                .filter(categories::Column::Slug.is_in(slugs.iter().cloned()))
                .order_by_asc(categories::Column::Name)
                .all(&self.db)
                .await
                .context("find categories by slugs")?
                .into_iter()
                .map(category_from_model)
                .collect(),
            LookupKind::Genre => genres::Entity::find()
                .filter(genres::Column::Slug.is_in(slugs.iter().cloned()))
                .order_by_asc(genres::Column::Name)
                .all(&self.db)
                .await
                .context("find genres by slugs")?
                .into_iter()
                .map(genre_from_model)
                .collect(),
        };
        Ok(items)
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<bool, ReviewsServiceError> {
        let result = match self.kind {
            LookupKind::Category => categories::Entity::delete_many()
                .filter(categories::Column::Slug.eq(slug))
                .exec(&self.db)
                .await
                .context("delete category")?,
            LookupKind::Genre => genres::Entity::delete_many()
                .filter(genres::Column::Slug.eq(slug))
                .exec(&self.db)
                .await
                .context("delete genre")?,
        };
        Ok(result.rows_affected > 0)
    }
}

fn category_from_model(model: categories::Model) -> Lookup {
    Lookup {
        id: model.id,
        name: model.name,
        slug: model.slug,
    }
}

fn genre_from_model(model: genres::Model) -> Lookup {
    Lookup {
        id: model.id,
        name: model.name,
        slug: model.slug,
    }
}

// ── Title repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTitleRepository {
    pub db: DatabaseConnection,
}

impl TitleRepository for DbTitleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Title>, ReviewsServiceError> {
        let Some(model) = titles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find title by id")?
        else {
            return Ok(None);
        };
        Ok(Some(load_title(&self.db, model).await?))
    }

    async fn exists(&self, id: Uuid) -> Result<bool, ReviewsServiceError> {
        let count = titles::Entity::find_by_id(id)
            .count(&self.db)
            .await
            .context("check title exists")?;
        Ok(count > 0)
    }

    async fn list(
        &self,
        filter: &TitleFilter,
        page: PageRequest,
    ) -> Result<Vec<Title>, ReviewsServiceError> {
        let (offset, limit) = page.offset_limit();
        let mut query = titles::Entity::find();
        if let Some(slug) = &filter.category_slug {
            query = query
                .join(JoinType::InnerJoin, titles::Relation::Category.def())
                .filter(categories::Column::Slug.eq(slug.as_str()));
        }
        if let Some(slug) = &filter.genre_slug {
            query = query.filter(
                titles::Column::Id.in_subquery(
                    Query::select()
                        .column((genre_titles::Entity, genre_titles::Column::TitleId))
                        .from(genre_titles::Entity)
                        .inner_join(
                            genres::Entity,
                            Expr::col((genres::Entity, genres::Column::Id))
                                .equals((genre_titles::Entity, genre_titles::Column::GenreId)),
                        )
                        .and_where(Expr::col((genres::Entity, genres::Column::Slug)).eq(slug.as_str()))
                        .to_owned(),
                ),
            );
        }
        if let Some(year) = filter.year {
            query = query.filter(titles::Column::Year.eq(year));
        }
        if let Some(name) = &filter.name {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((titles::Entity, titles::Column::Name))))
                    .like(contains_pattern(name)),
            );
        }
        let models = query
            .order_by_asc(titles::Column::Name)
            .order_by_asc(titles::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list titles")?;

        let mut results = Vec::with_capacity(models.len());
        for model in models {
            results.push(load_title(&self.db, model).await?);
        }
        Ok(results)
    }

    async fn create(&self, title: &NewTitle) -> Result<(), ReviewsServiceError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let title = title.clone();
                Box::pin(async move {
                    titles::ActiveModel {
                        id: Set(title.id),
                        name: Set(title.name.clone()),
                        year: Set(title.year),
                        description: Set(title.description.clone()),
                        category_id: Set(title.category_id),
                    }
                    .insert(txn)
                    .await?;
                    link_genres(txn, title.id, &title.genre_ids).await
                })
            })
            .await
            .map_err(unwrap_txn)
            .context("create title")?;
        Ok(())
    }

    async fn update(&self, id: Uuid, changes: &TitleChanges) -> Result<bool, ReviewsServiceError> {
        let updated = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                let changes = changes.clone();
                Box::pin(async move {
                    let Some(model) = titles::Entity::find_by_id(id).one(txn).await? else {
                        return Ok(false);
                    };
                    let mut am = model.into_active_model();
                    if let Some(name) = changes.name {
                        am.name = Set(name);
                    }
                    if let Some(year) = changes.year {
                        am.year = Set(year);
                    }
                    if let Some(description) = changes.description {
                        am.description = Set(description);
                    }
                    if let Some(category_id) = changes.category_id {
                        am.category_id = Set(category_id);
                    }
                    if am.is_changed() {
                        am.update(txn).await?;
                    }
                    if let Some(genre_ids) = changes.genre_ids {
                        genre_titles::Entity::delete_many()
                            .filter(genre_titles::Column::TitleId.eq(id))
                            .exec(txn)
                            .await?;
                        link_genres(txn, id, &genre_ids).await?;
                    }
                    Ok(true)
                })
            })
            .await
            .map_err(unwrap_txn)
            .context("update title")?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ReviewsServiceError> {
        let result = titles::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete title")?;
        Ok(result.rows_affected > 0)
    }
}

async fn link_genres<C: ConnectionTrait>(
    conn: &C,
    title_id: Uuid,
    genre_ids: &[Uuid],
) -> Result<(), DbErr> {
    let mut seen = HashSet::new();
    for genre_id in genre_ids.iter().copied().filter(|g| seen.insert(*g)) {
        genre_titles::ActiveModel {
            title_id: Set(title_id),
            genre_id: Set(genre_id),
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

/// Resolve category, genres and rating for a title row.
async fn load_title<C: ConnectionTrait>(
    conn: &C,
    model: titles::Model,
) -> Result<Title, ReviewsServiceError> {
    let category = match model.category_id {
        Some(category_id) => categories::Entity::find_by_id(category_id)
            .one(conn)
            .await
            .context("load title category")?
            .map(category_from_model),
        None => None,
    };
    let genres = model
        .find_related(genres::Entity)
        .order_by_asc(genres::Column::Name)
        .all(conn)
        .await
        .context("load title genres")?
        .into_iter()
        .map(genre_from_model)
        .collect();
    let rating = title_rating(conn, model.id).await?;
    Ok(Title {
        id: model.id,
        name: model.name,
        year: model.year,
        description: model.description,
        category,
        genres,
        rating,
    })
}

/// Mean score of a title's reviews, `None` when it has none.
async fn title_rating<C: ConnectionTrait>(
    conn: &C,
    title_id: Uuid,
) -> Result<Option<f64>, ReviewsServiceError> {
    let row: Option<(Option<i64>, i64)> = reviews::Entity::find()
        .select_only()
        .column_as(Expr::col(reviews::Column::Score).sum(), "score_sum")
        .column_as(Expr::col(reviews::Column::Id).count(), "review_count")
        .filter(reviews::Column::TitleId.eq(title_id))
        .into_tuple()
        .one(conn)
        .await
        .context("compute title rating")?;
    Ok(match row {
        Some((Some(sum), count)) if count > 0 => Some(sum as f64 / count as f64),
        _ => None,
    })
}

// ── Review repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

impl ReviewRepository for DbReviewRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, ReviewsServiceError> {
        let model = reviews::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find review by id")?;
        Ok(model.map(review_from_model))
    }

    async fn list_for_title(
        &self,
        title_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Review>, ReviewsServiceError> {
        let (offset, limit) = page.offset_limit();
        let models = reviews::Entity::find()
            .filter(reviews::Column::TitleId.eq(title_id))
            .order_by_asc(reviews::Column::PubDate)
            .order_by_asc(reviews::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list reviews for title")?;
        Ok(models.into_iter().map(review_from_model).collect())
    }

    async fn create(&self, review: &Review) -> Result<(), ReviewsServiceError> {
        let result = reviews::ActiveModel {
            id: Set(review.id),
            title_id: Set(review.title_id),
            author_id: Set(review.author_id),
            text: Set(review.text.clone()),
            score: Set(review.score),
            pub_date: Set(review.pub_date),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if unique_violation(&e).is_some() => Err(ReviewsServiceError::ReviewAlreadyExists),
            Err(e) => Err(anyhow::Error::new(e).context("create review").into()),
        }
    }

    async fn update(
        &self,
        id: Uuid,
        text: Option<&str>,
        score: Option<i16>,
    ) -> Result<bool, ReviewsServiceError> {
        if text.is_none() && score.is_none() {
            return Ok(self.find_by_id(id).await?.is_some());
        }
        let mut query = reviews::Entity::update_many().filter(reviews::Column::Id.eq(id));
        if let Some(text) = text {
            query = query.col_expr(reviews::Column::Text, Expr::value(text));
        }
        if let Some(score) = score {
            query = query.col_expr(reviews::Column::Score, Expr::value(score));
        }
        let result = query.exec(&self.db).await.context("update review")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ReviewsServiceError> {
        let result = reviews::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete review")?;
        Ok(result.rows_affected > 0)
    }
}

fn review_from_model(model: reviews::Model) -> Review {
    Review {
        id: model.id,
        title_id: model.title_id,
        author_id: model.author_id,
        text: model.text,
        score: model.score,
        pub_date: model.pub_date,
    }
}

// ── Comment repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCommentRepository {
    pub db: DatabaseConnection,
}

impl CommentRepository for DbCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, ReviewsServiceError> {
        let model = comments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find comment by id")?;
        Ok(model.map(comment_from_model))
    }

    async fn list_for_review(
        &self,
        review_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Comment>, ReviewsServiceError> {
        let (offset, limit) = page.offset_limit();
        let models = comments::Entity::find()
            .filter(comments::Column::ReviewId.eq(review_id))
            .order_by_asc(comments::Column::PubDate)
            .order_by_asc(comments::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list comments for review")?;
        Ok(models.into_iter().map(comment_from_model).collect())
    }

    async fn create(&self, comment: &Comment) -> Result<(), ReviewsServiceError> {
        comments::ActiveModel {
            id: Set(comment.id),
            review_id: Set(comment.review_id),
            author_id: Set(comment.author_id),
            text: Set(comment.text.clone()),
            pub_date: Set(comment.pub_date),
        }
        .insert(&self.db)
        .await
        .context("create comment")?;
        Ok(())
    }

    async fn update_text(&self, id: Uuid, text: &str) -> Result<bool, ReviewsServiceError> {
        let result = comments::Entity::update_many()
            .col_expr(comments::Column::Text, Expr::value(text))
            .filter(comments::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update comment")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ReviewsServiceError> {
        let result = comments::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete comment")?;
        Ok(result.rows_affected > 0)
    }
}

fn comment_from_model(model: comments::Model) -> Comment {
    Comment {
        id: model.id,
        review_id: model.review_id,
        author_id: model.author_id,
        text: model.text,
        pub_date: model.pub_date,
    }
}
