use yamdb_domain::pagination::PageRequest;
use yamdb_domain::validate::ValidationError;
use yamdb_reviews::error::ReviewsServiceError;

use crate::helpers::{seed_lookups, seed_title, setup};

#[tokio::test]
async fn should_reject_duplicate_slug_within_table() {
    let state = setup().await;
    state.categories().create("Film", "film").await.unwrap();

    let result = state.categories().create("Movies", "film").await;
    assert!(matches!(result, Err(ReviewsServiceError::SlugTaken)));

    // Slugs are unique per table, not across tables.
    state.genres().create("Film noir", "film").await.unwrap();
}

#[tokio::test]
async fn should_enforce_configured_slug_length() {
    let mut state = setup().await;
    state.slug_max_len = 4;
    let result = state.genres().create("Drama", "drama").await;
    assert!(matches!(
        result,
        Err(ReviewsServiceError::Validation(ValidationError::SlugTooLong { .. }))
    ));
}

#[tokio::test]
async fn should_list_lookups_by_name() {
    let state = setup().await;
    seed_lookups(&state).await;

    let genres = state.genres().list(PageRequest::default()).await.unwrap();
    let names: Vec<_> = genres.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Comedy", "Drama", "Science fiction"]);

    let categories = state
        .categories()
        .list(PageRequest::default())
        .await
        .unwrap();
    assert_eq!(categories[0].slug, "book");
}

#[tokio::test]
async fn should_keep_titles_when_category_is_deleted() {
    let state = setup().await;
    seed_lookups(&state).await;
    let title = seed_title(&state, "Solaris", 1972, Some("film"), &["drama"]).await;
    assert!(title.category.is_some());

    state.categories().delete_by_slug("film").await.unwrap();

    let title = state.titles().get(title.id).await.unwrap();
    assert_eq!(title.category, None);
    assert_eq!(title.genres.len(), 1);
    assert!(matches!(
        state.categories().get_by_slug("film").await,
        Err(ReviewsServiceError::CategoryNotFound)
    ));
}

#[tokio::test]
async fn should_unlink_deleted_genre() {
    let state = setup().await;
    seed_lookups(&state).await;
    let title = seed_title(&state, "Solaris", 1972, None, &["drama", "sci-fi"]).await;

    state.genres().delete_by_slug("drama").await.unwrap();

    let title = state.titles().get(title.id).await.unwrap();
    let slugs: Vec<_> = title.genres.iter().map(|g| g.slug.as_str()).collect();
    assert_eq!(slugs, vec!["sci-fi"]);
}

#[tokio::test]
async fn should_report_missing_slug_on_delete() {
    let state = setup().await;
    assert!(matches!(
        state.genres().delete_by_slug("nope").await,
        Err(ReviewsServiceError::GenreNotFound)
    ));
}
