use yamdb_domain::pagination::PageRequest;
use yamdb_reviews::error::ReviewsServiceError;
use yamdb_reviews::usecase::comment::CreateCommentInput;
use yamdb_reviews::usecase::review::CreateReviewInput;

use crate::helpers::{at, seed_lookups, seed_title, seed_user, setup, with_clock};

#[tokio::test]
async fn should_reject_second_review_for_same_title_and_author() {
    let state = setup().await;
    seed_lookups(&state).await;
    let author = seed_user(&state, "alice").await;
    let title = seed_title(&state, "Solaris", 1972, Some("film"), &[]).await;
    let input = CreateReviewInput {
        title_id: title.id,
        author_id: author.id,
        text: "Haunting".into(),
        score: 9,
    };

    state.reviews().create(input.clone()).await.unwrap();
    let second = state.reviews().create(input).await;
    assert!(matches!(second, Err(ReviewsServiceError::ReviewAlreadyExists)));

    // Another title is fine for the same author.
    let other = seed_title(&state, "Stalker", 1979, Some("film"), &[]).await;
    state
        .reviews()
        .create(CreateReviewInput {
            title_id: other.id,
            author_id: author.id,
            text: "Slow".into(),
            score: 7,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn should_cascade_title_delete_to_reviews_and_comments() {
    let state = setup().await;
    seed_lookups(&state).await;
    let author = seed_user(&state, "alice").await;
    let commenter = seed_user(&state, "bob").await;
    let title = seed_title(&state, "Solaris", 1972, Some("film"), &["drama"]).await;
    let review = state
        .reviews()
        .create(CreateReviewInput {
            title_id: title.id,
            author_id: author.id,
            text: "Haunting".into(),
            score: 9,
        })
        .await
        .unwrap();
    let comment = state
        .comments()
        .create(CreateCommentInput {
            title_id: title.id,
            review_id: review.id,
            author_id: commenter.id,
            text: "Agreed".into(),
        })
        .await
        .unwrap();

    state.titles().delete(title.id).await.unwrap();

    assert!(matches!(
        state.reviews().get(review.id).await,
        Err(ReviewsServiceError::ReviewNotFound)
    ));
    assert!(matches!(
        state.comments().get(comment.id).await,
        Err(ReviewsServiceError::CommentNotFound)
    ));
    // Lookups and users are untouched.
    state.genres().get_by_slug("drama").await.unwrap();
    state.users().get(commenter.id).await.unwrap();
}

#[tokio::test]
async fn should_list_reviews_and_comments_by_pub_date() {
    let state = setup().await;
    seed_lookups(&state).await;
    let title = seed_title(&state, "Solaris", 1972, Some("film"), &[]).await;
    let alice = seed_user(&state, "alice").await;
    let bob = seed_user(&state, "bob").await;

    let later = with_clock(&state, at(5))
        .reviews()
        .create(CreateReviewInput {
            title_id: title.id,
            author_id: alice.id,
            text: "Second look".into(),
            score: 8,
        })
        .await
        .unwrap();
    let earlier = with_clock(&state, at(2))
        .reviews()
        .create(CreateReviewInput {
            title_id: title.id,
            author_id: bob.id,
            text: "First look".into(),
            score: 6,
        })
        .await
        .unwrap();

    let reviews = state
        .reviews()
        .list_for_title(title.id, PageRequest::default())
        .await
        .unwrap();
    let ids: Vec<_> = reviews.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![earlier.id, later.id]);
    assert_eq!(reviews[0].pub_date, at(2));

    for (day, text) in [(9, "late"), (3, "early")] {
        with_clock(&state, at(day))
            .comments()
            .create(CreateCommentInput {
                title_id: title.id,
                review_id: later.id,
                author_id: bob.id,
                text: text.into(),
            })
            .await
            .unwrap();
    }
    let comments = state
        .comments()
        .list_for_review(later.id, PageRequest::default())
        .await
        .unwrap();
    let texts: Vec<_> = comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["early", "late"]);
}

#[tokio::test]
async fn should_keep_pub_date_when_review_is_edited() {
    let state = setup().await;
    seed_lookups(&state).await;
    let title = seed_title(&state, "Solaris", 1972, Some("film"), &[]).await;
    let alice = seed_user(&state, "alice").await;
    let review = state
        .reviews()
        .create(CreateReviewInput {
            title_id: title.id,
            author_id: alice.id,
            text: "Haunting".into(),
            score: 9,
        })
        .await
        .unwrap();

    let edited = with_clock(&state, at(20))
        .reviews()
        .update(review.id, Some("Haunting, still".into()), Some(10))
        .await
        .unwrap();
    assert_eq!(edited.text, "Haunting, still");
    assert_eq!(edited.score, 10);
    assert_eq!(edited.pub_date, review.pub_date);
}

#[tokio::test]
async fn should_reject_comment_on_review_of_other_title() {
    let state = setup().await;
    seed_lookups(&state).await;
    let alice = seed_user(&state, "alice").await;
    let solaris = seed_title(&state, "Solaris", 1972, Some("film"), &[]).await;
    let stalker = seed_title(&state, "Stalker", 1979, Some("film"), &[]).await;
    let review = state
        .reviews()
        .create(CreateReviewInput {
            title_id: solaris.id,
            author_id: alice.id,
            text: "Haunting".into(),
            score: 9,
        })
        .await
        .unwrap();

    let result = state
        .comments()
        .create(CreateCommentInput {
            title_id: stalker.id,
            review_id: review.id,
            author_id: alice.id,
            text: "Wrong place".into(),
        })
        .await;
    assert!(matches!(result, Err(ReviewsServiceError::ReviewNotFound)));
}

#[tokio::test]
async fn should_delete_review_with_its_comments() {
    let state = setup().await;
    seed_lookups(&state).await;
    let alice = seed_user(&state, "alice").await;
    let title = seed_title(&state, "Solaris", 1972, Some("film"), &[]).await;
    let review = state
        .reviews()
        .create(CreateReviewInput {
            title_id: title.id,
            author_id: alice.id,
            text: "Haunting".into(),
            score: 9,
        })
        .await
        .unwrap();
    let comment = state
        .comments()
        .create(CreateCommentInput {
            title_id: title.id,
            review_id: review.id,
            author_id: alice.id,
            text: "Self-reply".into(),
        })
        .await
        .unwrap();

    state.reviews().delete(review.id).await.unwrap();

    assert!(matches!(
        state.comments().get(comment.id).await,
        Err(ReviewsServiceError::CommentNotFound)
    ));
    assert_eq!(state.titles().get(title.id).await.unwrap().rating, None);
}
