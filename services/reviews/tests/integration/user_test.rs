use yamdb_domain::pagination::PageRequest;
use yamdb_domain::user::UserRole;
use yamdb_domain::validate::ValidationError;
use yamdb_reviews::domain::types::{ConfirmationState, UserChanges};
use yamdb_reviews::error::ReviewsServiceError;
use yamdb_reviews::usecase::review::CreateReviewInput;
use yamdb_reviews::usecase::user::CreateUserInput;

use crate::helpers::{at, seed_lookups, seed_title, seed_user, setup};

#[tokio::test]
async fn should_persist_issued_confirmation_code_after_create() {
    let state = setup().await;
    let created = seed_user(&state, "alice").await;

    let stored = state.users().get(created.id).await.unwrap();
    let code = stored.confirmation_code.clone().unwrap();
    assert_ne!(code, "XXXX");
    assert_eq!(stored.confirmation_code, created.confirmation_code);
    assert_eq!(stored.confirmation_state(), ConfirmationState::Issued);
    assert!(state.issuer.verify(&stored, &code, at(2)));
    assert!(
        state
            .users()
            .check_confirmation_code("alice", &code)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn should_reject_duplicate_username_and_email() {
    let state = setup().await;
    seed_user(&state, "alice").await;

    let same_username = state
        .users()
        .create(CreateUserInput {
            username: "alice".into(),
            email: "other@example.com".into(),
            ..Default::default()
        })
        .await;
    assert!(matches!(
        same_username,
        Err(ReviewsServiceError::UsernameTaken)
    ));

    let same_email = state
        .users()
        .create(CreateUserInput {
            username: "alice2".into(),
            email: "alice@example.com".into(),
            ..Default::default()
        })
        .await;
    assert!(matches!(same_email, Err(ReviewsServiceError::EmailTaken)));

    let all = state.users().list(PageRequest::default()).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn should_not_write_anything_for_reserved_username() {
    let state = setup().await;
    let result = state
        .users()
        .create(CreateUserInput {
            username: "ME".into(),
            email: "me@example.com".into(),
            ..Default::default()
        })
        .await;
    assert!(matches!(
        result,
        Err(ReviewsServiceError::Validation(
            ValidationError::ReservedUsername(_)
        ))
    ));
    assert!(
        state
            .users()
            .list(PageRequest::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn should_update_profile_and_role() {
    let state = setup().await;
    let user = seed_user(&state, "alice").await;

    let updated = state
        .users()
        .update(
            user.id,
            UserChanges {
                bio: Some("Film buff".into()),
                role: Some(UserRole::Moderator),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.bio, "Film buff");
    assert!(updated.is_moderator());
    assert_eq!(updated.confirmation_code, user.confirmation_code);
}

#[tokio::test]
async fn should_map_username_conflict_on_update() {
    let state = setup().await;
    seed_user(&state, "alice").await;
    let bob = seed_user(&state, "bob").await;

    let result = state
        .users()
        .update(
            bob.id,
            UserChanges {
                username: Some("alice".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(ReviewsServiceError::UsernameTaken)));
}

#[tokio::test]
async fn should_list_users_in_creation_order() {
    let state = setup().await;
    let first = seed_user(&state, "zed").await;
    let second = seed_user(&state, "amy").await;

    let users = state.users().list(PageRequest::default()).await.unwrap();
    let ids: Vec<_> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);

    let second_page = state.users().list(PageRequest::new(1, 2)).await.unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].id, second.id);
}

#[tokio::test]
async fn should_remove_reviews_of_deleted_user() {
    let state = setup().await;
    seed_lookups(&state).await;
    let user = seed_user(&state, "alice").await;
    let title = seed_title(&state, "Solaris", 1972, Some("film"), &[]).await;
    let review = state
        .reviews()
        .create(CreateReviewInput {
            title_id: title.id,
            author_id: user.id,
            text: "Haunting".into(),
            score: 9,
        })
        .await
        .unwrap();

    state.users().delete(user.id).await.unwrap();

    assert!(matches!(
        state.reviews().get(review.id).await,
        Err(ReviewsServiceError::ReviewNotFound)
    ));
    assert!(matches!(
        state.users().get_by_username("alice").await,
        Err(ReviewsServiceError::UserNotFound)
    ));
}
