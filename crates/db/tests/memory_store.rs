//! Behaviour of the in-memory adapter. Runs without a database.

use std::time::Duration;

use assert_matches::assert_matches;
use rust_decimal::Decimal;
use staybook_core::availability::DaySetting;
use staybook_core::booking::{GuestFields, NewReservation, Occupancy, PricingFields};
use staybook_core::day_range::DayRange;
use staybook_core::error::StoreError;
use staybook_core::stay::StayWindow;
use staybook_core::types::{Day, DbId};
use staybook_db::memory::{MemoryStore, RESERVATION_REFERENCE_KEY};
use staybook_db::models::unit::CreateUnit;
use staybook_db::store::{AvailabilityStore, ReservationStore, UnitStore};

fn day(s: &str) -> Day {
    s.parse().unwrap()
}

async fn seed_unit(store: &MemoryStore) -> DbId {
    store
        .create_unit(&CreateUnit {
            name: "  Harbour Loft ".into(),
            nightly_price: Decimal::new(9500, 2),
            currency: "EUR".into(),
            max_guests: 2,
        })
        .await
        .unwrap()
        .id
}

fn block(unit_id: DbId, start: &str, end: &str) -> NewReservation {
    NewReservation {
        unit_id,
        window: StayWindow::new(day(start), day(end)).unwrap(),
        occupancy: Occupancy::Block {
            guest: GuestFields::default(),
            pricing: PricingFields::default(),
        },
        notes: None,
    }
}

fn unavailable() -> DaySetting {
    DaySetting {
        is_available: false,
        custom_price: None,
        notes: Some("renovation".into()),
    }
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

#[tokio::test]
async fn units_are_listed_newest_first() {
    let store = MemoryStore::new();
    let first = seed_unit(&store).await;
    let second = seed_unit(&store).await;

    let ids: Vec<DbId> = store.list_units().await.unwrap().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![second, first]);

    let unit = store.find_unit(first).await.unwrap().unwrap();
    assert_eq!(unit.name, "Harbour Loft");
    assert!(store.unit_exists(first).await.unwrap());
    assert!(!store.unit_exists(999).await.unwrap());
}

// ---------------------------------------------------------------------------
// Unit write sections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn committed_section_makes_writes_visible() {
    let store = MemoryStore::new();
    let unit_id = seed_unit(&store).await;

    let mut section = store.begin_unit_write(unit_id).await.unwrap().unwrap();
    assert_eq!(section.unit_id(), unit_id);
    let row = section
        .insert(&block(unit_id, "2025-01-01", "2025-01-05"), "BK-AAAA0001")
        .await
        .unwrap();
    section.commit().await.unwrap();
    drop(section);

    let stored = store.find_reservation(row.id).await.unwrap().unwrap();
    assert_eq!(stored.reference, "BK-AAAA0001");
    assert!(stored.is_blocked);
}

#[tokio::test]
async fn dropped_section_discards_writes() {
    let store = MemoryStore::new();
    let unit_id = seed_unit(&store).await;

    let mut section = store.begin_unit_write(unit_id).await.unwrap().unwrap();
    let row = section
        .insert(&block(unit_id, "2025-01-01", "2025-01-05"), "BK-AAAA0001")
        .await
        .unwrap();
    drop(section);

    assert!(store.find_reservation(row.id).await.unwrap().is_none());
}

#[tokio::test]
async fn section_reads_its_own_view_of_a_reservation() {
    let store = MemoryStore::new();
    let unit_id = seed_unit(&store).await;

    let mut section = store.begin_unit_write(unit_id).await.unwrap().unwrap();
    let stored = section
        .insert(&block(unit_id, "2025-01-01", "2025-01-05"), "BK-AAAA0001")
        .await
        .unwrap();
    section.commit().await.unwrap();
    drop(section);

    let mut section = store.begin_unit_write(unit_id).await.unwrap().unwrap();
    assert_eq!(section.find(stored.id).await.unwrap(), Some(stored.clone()));
    section
        .update(stored.id, &block(unit_id, "2025-03-01", "2025-03-02"))
        .await
        .unwrap();
    let seen = section.find(stored.id).await.unwrap().unwrap();
    assert_eq!(seen.start_date, day("2025-03-01"));
    assert!(section.find(stored.id + 100).await.unwrap().is_none());
}

#[tokio::test]
async fn section_on_missing_unit_is_none() {
    let store = MemoryStore::new();
    assert!(store.begin_unit_write(42).await.unwrap().is_none());
}

#[tokio::test]
async fn second_section_waits_for_the_first() {
    let store = MemoryStore::new();
    let unit_id = seed_unit(&store).await;

    let section = store.begin_unit_write(unit_id).await.unwrap().unwrap();
    let blocked =
        tokio::time::timeout(Duration::from_millis(50), store.begin_unit_write(unit_id)).await;
    assert!(blocked.is_err(), "second section must wait while the first is open");

    drop(section);
    let second =
        tokio::time::timeout(Duration::from_millis(500), store.begin_unit_write(unit_id)).await;
    assert!(matches!(second, Ok(Ok(Some(_)))));
}

#[tokio::test]
async fn duplicate_reference_is_a_unique_violation() {
    let store = MemoryStore::new();
    let unit_id = seed_unit(&store).await;

    let mut section = store.begin_unit_write(unit_id).await.unwrap().unwrap();
    section
        .insert(&block(unit_id, "2025-01-01", "2025-01-02"), "BK-SAME0000")
        .await
        .unwrap();
    let err = section
        .insert(&block(unit_id, "2025-02-01", "2025-02-02"), "BK-SAME0000")
        .await
        .unwrap_err();
    assert_matches!(
        err,
        StoreError::UniqueViolation { ref constraint } if constraint == RESERVATION_REFERENCE_KEY
    );
}

#[tokio::test]
async fn update_keeps_reference_and_created_at() {
    let store = MemoryStore::new();
    let unit_id = seed_unit(&store).await;

    let mut section = store.begin_unit_write(unit_id).await.unwrap().unwrap();
    let row = section
        .insert(&block(unit_id, "2025-01-01", "2025-01-05"), "BK-KEEP0000")
        .await
        .unwrap();
    let mut moved = block(unit_id, "2025-01-03", "2025-01-09");
    moved.notes = Some("extended".into());
    let updated = section.update(row.id, &moved).await.unwrap().unwrap();
    assert!(section.update(9999, &moved).await.unwrap().is_none());
    section.commit().await.unwrap();

    assert_eq!(updated.reference, row.reference);
    assert_eq!(updated.created_at, row.created_at);
    assert_eq!(updated.end_date, day("2025-01-09"));
    assert_eq!(updated.notes.as_deref(), Some("extended"));
}

#[tokio::test]
async fn booked_windows_skip_excluded_row_and_other_units() {
    let store = MemoryStore::new();
    let unit_a = seed_unit(&store).await;
    let unit_b = seed_unit(&store).await;

    let mut section = store.begin_unit_write(unit_a).await.unwrap().unwrap();
    let kept = section
        .insert(&block(unit_a, "2025-03-10", "2025-03-12"), "BK-A0000001")
        .await
        .unwrap();
    let excluded = section
        .insert(&block(unit_a, "2025-03-01", "2025-03-03"), "BK-A0000002")
        .await
        .unwrap();
    section
        .insert(&block(unit_b, "2025-03-01", "2025-03-03"), "BK-B0000001")
        .await
        .unwrap();
    section.commit().await.unwrap();
    drop(section);

    let windows = store.booked_windows(unit_a, Some(excluded.id)).await.unwrap();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].reservation_id, kept.id);

    let all = store.booked_windows(unit_a, None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].window.start() < all[1].window.start());
}

#[tokio::test]
async fn listing_returns_stays_touching_the_window() {
    let store = MemoryStore::new();
    let unit_id = seed_unit(&store).await;

    let mut section = store.begin_unit_write(unit_id).await.unwrap().unwrap();
    for (start, end, reference) in [
        ("2025-04-01", "2025-04-05", "BK-L0000001"),
        ("2025-04-10", "2025-04-10", "BK-L0000002"),
        ("2025-04-20", "2025-04-25", "BK-L0000003"),
    ] {
        section
            .insert(&block(unit_id, start, end), reference)
            .await
            .unwrap();
    }
    section.commit().await.unwrap();
    drop(section);

    let window = DayRange::new(day("2025-04-05"), day("2025-04-10")).unwrap();
    let refs: Vec<String> = store
        .list_reservations(unit_id, Some(window))
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.reference)
        .collect();
    assert_eq!(refs, vec!["BK-L0000001", "BK-L0000002"]);

    assert_eq!(store.list_reservations(unit_id, None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn deleting_a_reservation_reports_whether_it_existed() {
    let store = MemoryStore::new();
    let unit_id = seed_unit(&store).await;

    let mut section = store.begin_unit_write(unit_id).await.unwrap().unwrap();
    let row = section
        .insert(&block(unit_id, "2025-01-01", "2025-01-02"), "BK-DEL00000")
        .await
        .unwrap();
    section.commit().await.unwrap();
    drop(section);

    assert!(store.delete_reservation(row.id).await.unwrap());
    assert!(!store.delete_reservation(row.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upsert_overwrites_the_same_day() {
    let store = MemoryStore::new();
    let unit_id = seed_unit(&store).await;
    let date = day("2025-02-14");

    let first = store.upsert_override(unit_id, date, &unavailable()).await.unwrap();
    let priced = DaySetting {
        is_available: true,
        custom_price: Some(Decimal::new(15000, 2)),
        notes: None,
    };
    let second = store.upsert_override(unit_id, date, &priced).await.unwrap();

    assert_eq!(first.id, second.id);
    let rows = store
        .list_overrides(unit_id, DayRange::new(date, date).unwrap())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_available);
    assert_eq!(rows[0].custom_price, Some(Decimal::new(15000, 2)));
}

#[tokio::test]
async fn replace_range_twice_leaves_one_row_per_day() {
    let store = MemoryStore::new();
    let unit_id = seed_unit(&store).await;
    let days = DayRange::new(day("2025-02-01"), day("2025-02-05")).unwrap();

    assert_eq!(store.replace_range(unit_id, days, &unavailable()).await.unwrap(), 5);
    assert_eq!(store.replace_range(unit_id, days, &unavailable()).await.unwrap(), 5);

    let rows = store.list_overrides(unit_id, days).await.unwrap();
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|r| !r.is_available));
    assert!(rows.windows(2).all(|w| w[0].date < w[1].date));
}

#[tokio::test]
async fn failed_range_write_leaves_previous_overrides() {
    let store = MemoryStore::new();
    let unit_id = seed_unit(&store).await;
    let days = DayRange::new(day("2025-02-01"), day("2025-02-05")).unwrap();
    let before = store
        .upsert_override(unit_id, day("2025-02-03"), &unavailable())
        .await
        .unwrap();

    store.fail_range_writes_after(2).await;
    let available = DaySetting {
        is_available: true,
        custom_price: None,
        notes: None,
    };
    let err = store.replace_range(unit_id, days, &available).await.unwrap_err();
    assert_matches!(err, StoreError::Backend(_));

    let rows = store.list_overrides(unit_id, days).await.unwrap();
    assert_eq!(rows, vec![before]);

    // The injected failure is one-shot.
    assert_eq!(store.replace_range(unit_id, days, &available).await.unwrap(), 5);
}

#[tokio::test]
async fn overrides_on_other_units_are_untouched_by_range_writes() {
    let store = MemoryStore::new();
    let unit_a = seed_unit(&store).await;
    let unit_b = seed_unit(&store).await;
    let days = DayRange::new(day("2025-02-01"), day("2025-02-03")).unwrap();

    store.replace_range(unit_b, days, &unavailable()).await.unwrap();
    store.replace_range(unit_a, days, &unavailable()).await.unwrap();

    assert_eq!(store.list_overrides(unit_b, days).await.unwrap().len(), 3);
}

#[tokio::test]
async fn deleting_an_absent_day_is_not_an_error() {
    let store = MemoryStore::new();
    let unit_id = seed_unit(&store).await;
    let date = day("2025-05-01");

    assert!(!store.delete_override(unit_id, date).await.unwrap());
    store.upsert_override(unit_id, date, &unavailable()).await.unwrap();
    assert!(store.delete_override(unit_id, date).await.unwrap());
}

#[tokio::test]
async fn writes_to_unknown_unit_fail() {
    let store = MemoryStore::new();
    let err = store
        .upsert_override(77, day("2025-05-01"), &unavailable())
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Backend(_));
}
