//! Integration tests for venue availability and schedules.
//!
//! Exercises the repository layer against a real database:
//! - Half-open interval conflict detection
//! - Excluding an event's own row during updates
//! - Venue schedule listing with computed end times
//! - Deletion guard for venues with future events

use chrono::{Duration, TimeZone, Utc};
use sqlx::PgPool;

use gather_core::types::Timestamp;
use gather_db::models::event::CreateEvent;
use gather_db::models::user::CreateUser;
use gather_db::models::venue::CreateVenue;
use gather_db::repositories::{EventRepo, UserRepo, VenueRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn at(day: u32, hour: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2030, 6, day, hour, 0, 0).unwrap()
}

async fn seed_organizer(pool: &PgPool) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            name: "organizer".to_string(),
            email: "organizer@test.local".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            role: "organizer".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_venue(pool: &PgPool, name: &str) -> i64 {
    VenueRepo::create(
        pool,
        &CreateVenue {
            name: name.to_string(),
            capacity: 100,
            location: "Campus".to_string(),
            facilities: vec![],
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_event_at(
    pool: &PgPool,
    organizer: i64,
    venue: i64,
    start: Timestamp,
    duration_mins: i32,
) -> i64 {
    EventRepo::create(
        pool,
        organizer,
        &CreateEvent {
            title: "Existing Booking".to_string(),
            description: None,
            category: "other".to_string(),
            venue_id: venue,
            start_time: start,
            duration_mins,
            max_participants: 10,
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Test: conflict detection
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_overlapping_interval_conflicts(pool: PgPool) {
    let organizer = seed_organizer(&pool).await;
    let venue = seed_venue(&pool, "Hall").await;
    // Booked 10:00-12:00.
    seed_event_at(&pool, organizer, venue, at(1, 10), 120).await;

    // 11:00-13:00 overlaps the tail end.
    let available = EventRepo::is_venue_available(&pool, venue, at(1, 11), at(1, 13), None)
        .await
        .unwrap();
    assert!(!available);

    // 09:00-10:30 overlaps the head.
    let available = EventRepo::is_venue_available(
        &pool,
        venue,
        at(1, 9),
        at(1, 10) + Duration::minutes(30),
        None,
    )
    .await
    .unwrap();
    assert!(!available);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_contained_interval_conflicts(pool: PgPool) {
    let organizer = seed_organizer(&pool).await;
    let venue = seed_venue(&pool, "Hall").await;
    // Booked 09:00-17:00.
    seed_event_at(&pool, organizer, venue, at(1, 9), 480).await;

    // 11:00-12:00 sits fully inside the existing booking.
    let available = EventRepo::is_venue_available(&pool, venue, at(1, 11), at(1, 12), None)
        .await
        .unwrap();
    assert!(!available);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_touching_intervals_do_not_conflict(pool: PgPool) {
    let organizer = seed_organizer(&pool).await;
    let venue = seed_venue(&pool, "Hall").await;
    // Booked 10:00-12:00.
    seed_event_at(&pool, organizer, venue, at(1, 10), 120).await;

    // Back to back: 12:00-14:00 starts the instant the other ends.
    let available = EventRepo::is_venue_available(&pool, venue, at(1, 12), at(1, 14), None)
        .await
        .unwrap();
    assert!(available);

    // And 08:00-10:00 ends the instant the other starts.
    let available = EventRepo::is_venue_available(&pool, venue, at(1, 8), at(1, 10), None)
        .await
        .unwrap();
    assert!(available);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_other_venues_do_not_conflict(pool: PgPool) {
    let organizer = seed_organizer(&pool).await;
    let hall = seed_venue(&pool, "Hall").await;
    let lab = seed_venue(&pool, "Lab").await;
    seed_event_at(&pool, organizer, hall, at(1, 10), 120).await;

    let available = EventRepo::is_venue_available(&pool, lab, at(1, 10), at(1, 12), None)
        .await
        .unwrap();
    assert!(available);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_excludes_own_booking(pool: PgPool) {
    let organizer = seed_organizer(&pool).await;
    let venue = seed_venue(&pool, "Hall").await;
    let event = seed_event_at(&pool, organizer, venue, at(1, 10), 120).await;

    // Rescheduling within its own slot conflicts only with itself.
    let available =
        EventRepo::is_venue_available(&pool, venue, at(1, 10), at(1, 11), Some(event))
            .await
            .unwrap();
    assert!(available);

    let available = EventRepo::is_venue_available(&pool, venue, at(1, 10), at(1, 11), None)
        .await
        .unwrap();
    assert!(!available);
}

// ---------------------------------------------------------------------------
// Test: schedule listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_schedule_lists_bookings_with_end_times(pool: PgPool) {
    let organizer = seed_organizer(&pool).await;
    let venue = seed_venue(&pool, "Hall").await;
    seed_event_at(&pool, organizer, venue, at(2, 14), 90).await;
    seed_event_at(&pool, organizer, venue, at(2, 9), 60).await;
    // Outside the queried range.
    seed_event_at(&pool, organizer, venue, at(5, 9), 60).await;

    let schedule = EventRepo::venue_schedule(&pool, venue, at(2, 0), at(3, 0))
        .await
        .unwrap();
    assert_eq!(schedule.len(), 2);
    // Ordered by start time, with the computed end.
    assert_eq!(schedule[0].start_time, at(2, 9));
    assert_eq!(schedule[0].end_time, at(2, 10));
    assert_eq!(schedule[1].start_time, at(2, 14));
    assert_eq!(schedule[1].end_time, at(2, 14) + Duration::minutes(90));
}

// ---------------------------------------------------------------------------
// Test: deletion guard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_future_events_block_deletion(pool: PgPool) {
    let organizer = seed_organizer(&pool).await;
    let venue = seed_venue(&pool, "Hall").await;
    let empty_venue = seed_venue(&pool, "Annex").await;
    seed_event_at(&pool, organizer, venue, Utc::now() + Duration::days(3), 60).await;

    assert!(VenueRepo::has_future_events(&pool, venue).await.unwrap());
    assert!(!VenueRepo::has_future_events(&pool, empty_venue).await.unwrap());

    assert!(VenueRepo::delete(&pool, empty_venue).await.unwrap());
    assert!(!VenueRepo::delete(&pool, empty_venue).await.unwrap());
}
