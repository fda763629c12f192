//! Integration tests for event registration, the waitlist and promotion.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

use common::{
    body_json, build_test_app, delete_auth, get_auth, post_auth, seed_event, seed_user, seed_venue,
    token_for,
};

#[sqlx::test(migrations = "../db/migrations")]
async fn first_registrant_is_confirmed(pool: PgPool) {
    let organizer = seed_user(&pool, "org@example.edu", "organizer").await;
    let venue_id = seed_venue(&pool, "Main Hall").await;
    let event_id = seed_event(&pool, organizer.id, venue_id, 48, 10).await;

    let student = seed_user(&pool, "s1@example.edu", "student").await;
    let token = token_for(&student);

    let response = post_auth(
        build_test_app(pool),
        &format!("/api/v1/events/{event_id}/registrations"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["registration"]["status"], "confirmed");
    assert_eq!(body["message"], "Registration successful");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn registrations_past_capacity_land_on_the_waitlist(pool: PgPool) {
    let organizer = seed_user(&pool, "org@example.edu", "organizer").await;
    let venue_id = seed_venue(&pool, "Small Room").await;
    let event_id = seed_event(&pool, organizer.id, venue_id, 48, 2).await;

    for (i, expected_status) in [(1, "confirmed"), (2, "confirmed"), (3, "waitlist")] {
        let user = seed_user(&pool, &format!("s{i}@example.edu"), "student").await;
        let response = post_auth(
            build_test_app(pool.clone()),
            &format!("/api/v1/events/{event_id}/registrations"),
            &token_for(&user),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["registration"]["status"], expected_status);
    }

    let overflow = body_json(
        post_auth(
            build_test_app(pool.clone()),
            &format!("/api/v1/events/{event_id}/registrations"),
            &token_for(&seed_user(&pool, "s4@example.edu", "student").await),
        )
        .await,
    )
    .await;
    assert_eq!(
        overflow["message"],
        "Added to waitlist due to full capacity"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_registration_is_a_conflict(pool: PgPool) {
    let organizer = seed_user(&pool, "org@example.edu", "organizer").await;
    let venue_id = seed_venue(&pool, "Main Hall").await;
    let event_id = seed_event(&pool, organizer.id, venue_id, 48, 10).await;
    let student = seed_user(&pool, "s1@example.edu", "student").await;
    let token = token_for(&student);
    let uri = format!("/api/v1/events/{event_id}/registrations");

    let response = post_auth(build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_auth(build_test_app(pool), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn registering_for_a_missing_event_is_404(pool: PgPool) {
    let student = seed_user(&pool, "s1@example.edu", "student").await;
    let response = post_auth(
        build_test_app(pool),
        "/api/v1/events/999999/registrations",
        &token_for(&student),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancelling_without_a_registration_is_404(pool: PgPool) {
    let organizer = seed_user(&pool, "org@example.edu", "organizer").await;
    let venue_id = seed_venue(&pool, "Main Hall").await;
    let event_id = seed_event(&pool, organizer.id, venue_id, 48, 10).await;
    let student = seed_user(&pool, "s1@example.edu", "student").await;

    let response = delete_auth(
        build_test_app(pool),
        &format!("/api/v1/events/{event_id}/registrations"),
        &token_for(&student),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancelling_a_confirmed_seat_promotes_the_oldest_waitlisted(pool: PgPool) {
    let organizer = seed_user(&pool, "org@example.edu", "organizer").await;
    let venue_id = seed_venue(&pool, "Tiny Room").await;
    let event_id = seed_event(&pool, organizer.id, venue_id, 48, 1).await;
    let uri = format!("/api/v1/events/{event_id}/registrations");

    let alice = seed_user(&pool, "alice@example.edu", "student").await;
    let bob = seed_user(&pool, "bob@example.edu", "student").await;
    let carol = seed_user(&pool, "carol@example.edu", "student").await;

    // Alice takes the only seat; Bob and Carol queue up behind her.
    for user in [&alice, &bob, &carol] {
        let response = post_auth(build_test_app(pool.clone()), &uri, &token_for(user)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = delete_auth(build_test_app(pool.clone()), &uri, &token_for(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Registration cancelled");
    assert_eq!(body["promoted_user_id"], bob.id);

    // Bob holds the seat now; Carol is still waiting.
    let status: String = sqlx::query_scalar(
        "SELECT status FROM registrations WHERE event_id = $1 AND user_id = $2",
    )
    .bind(event_id)
    .bind(bob.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(status, "confirmed");

    // Promotion queued both a notification and its outbox email.
    let notification_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND kind = 'REGISTRATION_CONFIRMATION'",
    )
    .bind(bob.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(notification_count, 1);

    let outbox_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM email_outbox WHERE recipient = $1")
            .bind(&bob.email)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(outbox_count, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancelling_a_waitlist_spot_promotes_nobody(pool: PgPool) {
    let organizer = seed_user(&pool, "org@example.edu", "organizer").await;
    let venue_id = seed_venue(&pool, "Tiny Room").await;
    let event_id = seed_event(&pool, organizer.id, venue_id, 48, 1).await;
    let uri = format!("/api/v1/events/{event_id}/registrations");

    let alice = seed_user(&pool, "alice@example.edu", "student").await;
    let bob = seed_user(&pool, "bob@example.edu", "student").await;
    for user in [&alice, &bob] {
        post_auth(build_test_app(pool.clone()), &uri, &token_for(user)).await;
    }

    // Bob leaves the waitlist; Alice's seat is untouched.
    let response = delete_auth(build_test_app(pool.clone()), &uri, &token_for(&bob)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["promoted_user_id"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn my_registrations_lists_event_details(pool: PgPool) {
    let organizer = seed_user(&pool, "org@example.edu", "organizer").await;
    let venue_id = seed_venue(&pool, "Main Hall").await;
    let event_id = seed_event(&pool, organizer.id, venue_id, 48, 10).await;
    let student = seed_user(&pool, "s1@example.edu", "student").await;
    let token = token_for(&student);

    post_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/events/{event_id}/registrations"),
        &token,
    )
    .await;

    let response = get_auth(build_test_app(pool), "/api/v1/registrations/mine", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["event_id"], event_id);
    assert_eq!(rows[0]["title"], "Intro to Databases");
    assert_eq!(rows[0]["venue_name"], "Main Hall");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn attendee_list_is_restricted_to_owner_and_admin(pool: PgPool) {
    let organizer = seed_user(&pool, "org@example.edu", "organizer").await;
    let venue_id = seed_venue(&pool, "Main Hall").await;
    let event_id = seed_event(&pool, organizer.id, venue_id, 48, 10).await;
    let uri = format!("/api/v1/events/{event_id}/registrations");

    let student = seed_user(&pool, "s1@example.edu", "student").await;
    post_auth(build_test_app(pool.clone()), &uri, &token_for(&student)).await;

    // A registered student still cannot see the attendee list.
    let response = get_auth(build_test_app(pool.clone()), &uri, &token_for(&student)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Another organizer cannot either.
    let other = seed_user(&pool, "other-org@example.edu", "organizer").await;
    let response = get_auth(build_test_app(pool.clone()), &uri, &token_for(&other)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owning organizer sees attendee emails.
    let response = get_auth(build_test_app(pool.clone()), &uri, &token_for(&organizer)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["email"], "s1@example.edu");

    // So does an admin.
    let admin = seed_user(&pool, "admin@example.edu", "admin").await;
    let response = get_auth(build_test_app(pool), &uri, &token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
}
