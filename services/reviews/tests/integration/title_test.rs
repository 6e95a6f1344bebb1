use yamdb_domain::pagination::PageRequest;
use yamdb_domain::validate::ValidationError;
use yamdb_reviews::domain::types::TitleFilter;
use yamdb_reviews::error::ReviewsServiceError;
use yamdb_reviews::usecase::review::CreateReviewInput;
use yamdb_reviews::usecase::title::{CreateTitleInput, UpdateTitleInput};

use crate::helpers::{seed_lookups, seed_title, seed_user, setup};

#[tokio::test]
async fn should_create_title_with_category_and_sorted_genres() {
    let state = setup().await;
    seed_lookups(&state).await;
    let created = seed_title(&state, "Solaris", 1972, Some("film"), &["sci-fi", "drama"]).await;

    let title = state.titles().get(created.id).await.unwrap();
    assert_eq!(title, created);
    assert_eq!(title.category.unwrap().slug, "film");
    let genres: Vec<_> = title.genres.iter().map(|g| g.slug.as_str()).collect();
    assert_eq!(genres, vec!["drama", "sci-fi"]);
    assert_eq!(title.rating, None);
}

#[tokio::test]
async fn should_reject_future_year_and_unknown_genre() {
    let state = setup().await;
    seed_lookups(&state).await;

    let future = state
        .titles()
        .create(CreateTitleInput {
            name: "Next".into(),
            year: 2027,
            ..Default::default()
        })
        .await;
    assert!(matches!(
        future,
        Err(ReviewsServiceError::Validation(ValidationError::FutureYear { .. }))
    ));

    let unknown_genre = state
        .titles()
        .create(CreateTitleInput {
            name: "Solaris".into(),
            year: 1972,
            genre_slugs: vec!["horror".into()],
            ..Default::default()
        })
        .await;
    assert!(matches!(
        unknown_genre,
        Err(ReviewsServiceError::GenreNotFound)
    ));

    let all = state
        .titles()
        .list(&TitleFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn should_filter_and_order_title_listing() {
    let state = setup().await;
    seed_lookups(&state).await;
    seed_title(&state, "Stalker", 1979, Some("film"), &["sci-fi"]).await;
    seed_title(&state, "Solaris", 1972, Some("film"), &["sci-fi", "drama"]).await;
    seed_title(&state, "Solaris", 1961, Some("book"), &["sci-fi"]).await;
    seed_title(&state, "Playtime", 1967, Some("film"), &["comedy"]).await;

    let list = |filter: TitleFilter| {
        let state = state.clone();
        async move {
            state
                .titles()
                .list(&filter, PageRequest::default())
                .await
                .unwrap()
                .into_iter()
                .map(|t| (t.name, t.year))
                .collect::<Vec<_>>()
        }
    };

    let films = list(TitleFilter {
        category_slug: Some("film".into()),
        ..Default::default()
    })
    .await;
    let film_names: Vec<_> = films.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(film_names, vec!["Playtime", "Solaris", "Stalker"]);

    let drama = list(TitleFilter {
        genre_slug: Some("drama".into()),
        ..Default::default()
    })
    .await;
    assert_eq!(drama, vec![("Solaris".to_owned(), 1972)]);

    let by_year = list(TitleFilter {
        year: Some(1961),
        ..Default::default()
    })
    .await;
    assert_eq!(by_year, vec![("Solaris".to_owned(), 1961)]);

    let by_name = list(TitleFilter {
        name: Some("SOL".into()),
        category_slug: Some("book".into()),
        ..Default::default()
    })
    .await;
    assert_eq!(by_name, vec![("Solaris".to_owned(), 1961)]);
}

#[tokio::test]
async fn should_replace_genres_and_clear_description_on_update() {
    let state = setup().await;
    seed_lookups(&state).await;
    let title = state
        .titles()
        .create(CreateTitleInput {
            name: "Solaris".into(),
            year: 1972,
            description: Some("Ocean planet".into()),
            category_slug: Some("film".into()),
            genre_slugs: vec!["drama".into()],
        })
        .await
        .unwrap();

    let updated = state
        .titles()
        .update(
            title.id,
            UpdateTitleInput {
                description: Some(None),
                genre_slugs: Some(vec!["comedy".into(), "sci-fi".into()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description, None);
    assert_eq!(updated.name, "Solaris");
    let genres: Vec<_> = updated.genres.iter().map(|g| g.slug.as_str()).collect();
    assert_eq!(genres, vec!["comedy", "sci-fi"]);
    assert_eq!(updated.category.unwrap().slug, "film");
}

#[tokio::test]
async fn should_average_review_scores_into_rating() {
    let state = setup().await;
    seed_lookups(&state).await;
    let title = seed_title(&state, "Solaris", 1972, Some("film"), &[]).await;
    for (username, score) in [("alice", 4), ("bob", 9)] {
        let author = seed_user(&state, username).await;
        state
            .reviews()
            .create(CreateReviewInput {
                title_id: title.id,
                author_id: author.id,
                text: "Noted".into(),
                score,
            })
            .await
            .unwrap();
    }

    let title = state.titles().get(title.id).await.unwrap();
    assert_eq!(title.rating, Some(6.5));
}

#[tokio::test]
async fn should_report_missing_title() {
    let state = setup().await;
    let id = uuid::Uuid::now_v7();
    assert!(matches!(
        state.titles().get(id).await,
        Err(ReviewsServiceError::TitleNotFound)
    ));
    assert!(matches!(
        state.titles().delete(id).await,
        Err(ReviewsServiceError::TitleNotFound)
    ));
}

#[tokio::test]
async fn should_match_like_metacharacters_literally_in_name_filter() {
    let state = setup().await;
    seed_lookups(&state).await;
    seed_title(&state, "Solaris", 1972, Some("film"), &[]).await;
    seed_title(&state, "Stalker", 1979, Some("film"), &[]).await;
    seed_title(&state, "100% Wolf", 2020, Some("film"), &[]).await;
    seed_title(&state, "Dr_Who", 1963, Some("film"), &[]).await;

    let names = |needle: &'static str| {
        let state = state.clone();
        async move {
            state
                .titles()
                .list(
                    &TitleFilter {
                        name: Some(needle.into()),
                        ..Default::default()
                    },
                    PageRequest::default(),
                )
                .await
                .unwrap()
                .into_iter()
                .map(|t| t.name)
                .collect::<Vec<_>>()
        }
    };

    assert_eq!(names("_").await, vec!["Dr_Who"]);
    assert_eq!(names("%").await, vec!["100% Wolf"]);
    assert!(names("S_l").await.is_empty());
    assert!(names("\\").await.is_empty());
    assert_eq!(names("sol").await, vec!["Solaris"]);
}
