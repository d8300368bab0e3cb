//! Record lifecycle tests against an in-memory store
//!
//! Covers creation, overlap rejection under both boundary policies,
//! lookups, partial updates and every delete flavour.

use dogdata_svc::db::BreedRepository;
use dogdata_svc::models::{AgeRange, Gender};
use dogdata_svc::services::{AgeBandService, LifecycleSettings, OverlapPolicy};
use dogdata_svc::Error;
use serde_json::{json, Map, Value};
use std::time::Duration;

async fn service_with(settings: LifecycleSettings) -> AgeBandService {
    let pool = dogdata_common::db::init_memory_database()
        .await
        .expect("in-memory database");
    AgeBandService::new(BreedRepository::new(pool), settings)
}

async fn service() -> AgeBandService {
    service_with(LifecycleSettings::default()).await
}

async fn strict_service() -> AgeBandService {
    service_with(LifecycleSettings {
        overlap_policy: OverlapPolicy::Strict,
        ..LifecycleSettings::default()
    })
    .await
}

fn band(breed: &str, gender: &str, from_age: Value, to_age: Value) -> Map<String, Value> {
    json!({
        "breed_name": breed,
        "gender": gender,
        "from_age": from_age,
        "to_age": to_age,
        "avg_height_min": 1.0,
        "avg_height_max": 1.0,
        "avg_weight_min": 1.0,
        "avg_weight_max": 1.0,
        "avg_drink": 1.0,
        "avg_food": 1.0,
        "pic_url": "x"
    })
    .as_object()
    .cloned()
    .unwrap()
}

fn patch(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

/// No two stored bands in one (breed, gender) scope may conflict
async fn assert_no_overlaps(service: &AgeBandService) {
    let policy = service.overlap_policy();
    let all = service.list_all().await.unwrap();
    for (i, a) in all.iter().enumerate() {
        for b in all.iter().skip(i + 1) {
            let same_scope = BreedRepository::resolve(&a.breed_name)
                == BreedRepository::resolve(&b.breed_name)
                && a.gender == b.gender;
            if same_scope {
                assert!(
                    !policy.conflicts(&a.range(), &b.range()),
                    "{} and {} overlap",
                    a.range(),
                    b.range()
                );
            }
        }
    }
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_created_id_reads_back_same_record() {
    let service = service().await;
    let created = service.create(&band("Poodle", "male", json!(0), json!(2))).await.unwrap();

    let fetched = service.get_by_id(&created.id.to_string()).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.breed_name, "Poodle");
    assert_eq!(fetched.range(), AgeRange::new(0.0, 2.0));
    assert_eq!(fetched.measurements, created.measurements);
}

#[tokio::test]
async fn test_poodle_scenario_inclusive() {
    let service = service().await;

    service.create(&band("Poodle", "male", json!(0), json!(2))).await.unwrap();

    let err = service
        .create(&band("Poodle", "male", json!(1), json!(3)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::OverlapConflict { .. }));

    service
        .create(&band("Poodle", "male", json!(2.01), json!(4)))
        .await
        .expect("2.01..4 does not touch 0..2");

    assert_eq!(service.list_all().await.unwrap().len(), 2);
    assert_no_overlaps(&service).await;
}

#[tokio::test]
async fn test_touching_ranges_depend_on_policy() {
    let inclusive = service().await;
    inclusive.create(&band("Poodle", "male", json!(0), json!(2))).await.unwrap();
    let err = inclusive
        .create(&band("Poodle", "male", json!(2), json!(4)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::OverlapConflict { .. }));

    let strict = strict_service().await;
    strict.create(&band("Poodle", "male", json!(0), json!(2))).await.unwrap();
    strict
        .create(&band("Poodle", "male", json!(2), json!(4)))
        .await
        .expect("strict policy allows touching endpoints");
    assert_no_overlaps(&strict).await;
}

#[tokio::test]
async fn test_overlap_rejection_does_not_mutate_store() {
    let service = service().await;
    service.create(&band("Poodle", "male", json!(0), json!(2))).await.unwrap();
    let before = service.list_all().await.unwrap();

    assert!(service.create(&band("poodle", "male", json!(1), json!(5))).await.is_err());

    assert_eq!(service.list_all().await.unwrap(), before);
}

#[tokio::test]
async fn test_overlap_scope_is_breed_and_gender() {
    let service = service().await;
    service.create(&band("Poodle", "male", json!(0), json!(2))).await.unwrap();

    service.create(&band("Poodle", "female", json!(0), json!(2))).await.unwrap();
    service.create(&band("Beagle", "male", json!(0), json!(2))).await.unwrap();

    // Same breed under a different case is the same collection
    let err = service
        .create(&band("POODLE", "male", json!(1), json!(1.5)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::OverlapConflict { .. }));
}

#[tokio::test]
async fn test_inverted_range_never_reaches_store() {
    let service = service().await;
    let err = service
        .create(&band("Poodle", "male", json!(5), json!(1)))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(service.list_breeds().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_rounds_numeric_fields() {
    let service = service().await;
    let mut raw = band("Poodle", "female", json!("0.004"), json!("1.999"));
    raw.insert("avg_food".into(), json!("3.14159"));

    let created = service.create(&raw).await.unwrap();
    assert_eq!(created.range(), AgeRange::new(0.0, 2.0));
    assert_eq!(created.measurements.avg_food, 3.14);
}

#[tokio::test]
async fn test_huge_measurements_read_back_unchanged() {
    let service = service().await;
    let mut raw = band("Mastiff", "male", json!(0), json!(2));
    raw.insert("avg_food".into(), json!(1e308));
    raw.insert("avg_weight_max".into(), json!("1.7e308"));

    let created = service.create(&raw).await.unwrap();
    let fetched = service.get_by_id(&created.id.to_string()).await.unwrap();

    assert_eq!(fetched.measurements.avg_food, 1e308);
    assert_eq!(fetched.measurements.avg_weight_max, 1.7e308);

    let body = serde_json::to_value(&fetched).unwrap();
    assert_eq!(body["avg_food"].as_f64(), Some(1e308));
    assert_eq!(body["avg_weight_max"].as_f64(), Some(1.7e308));
}

#[tokio::test]
async fn test_records_carry_collection_display_name() {
    let service = service().await;
    service.create(&band("Poodle", "male", json!(0), json!(2))).await.unwrap();
    let second = service
        .create(&band("  POODLE ", "female", json!(0), json!(2)))
        .await
        .unwrap();

    assert_eq!(second.breed_name, "Poodle");
    let fetched = service.get_by_id(&second.id.to_string()).await.unwrap();
    assert_eq!(fetched.breed_name, "Poodle");
    assert_eq!(service.list_breeds().await.unwrap(), vec!["Poodle".to_string()]);
    assert!(service
        .list_all()
        .await
        .unwrap()
        .iter()
        .all(|record| record.breed_name == "Poodle"));
}

#[tokio::test]
async fn test_many_creates_preserve_invariant() {
    let service = service().await;
    let candidates = [
        (0.0, 1.0),
        (0.5, 1.5),
        (1.0, 2.0),
        (1.01, 2.0),
        (3.0, 10.0),
        (4.0, 5.0),
        (2.01, 2.99),
        (10.01, 12.0),
    ];
    for (from_age, to_age) in candidates {
        let _ = service
            .create(&band("Husky", "male", json!(from_age), json!(to_age)))
            .await;
    }

    assert_eq!(service.list_all().await.unwrap().len(), 5);
    assert_no_overlaps(&service).await;
}

// =============================================================================
// Read
// =============================================================================

#[tokio::test]
async fn test_get_by_range_exact_match_only() {
    let service = service().await;
    service.create(&band("Poodle", "male", json!(0), json!(2))).await.unwrap();

    let found = service
        .get_by_range("poodle", Gender::Male, &AgeRange::new(0.0, 2.0))
        .await
        .unwrap();
    assert_eq!(found.breed_name, "Poodle");

    let err = service
        .get_by_range("Poodle", Gender::Male, &AgeRange::new(0.0, 1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = service
        .get_by_range("Poodle", Gender::Female, &AgeRange::new(0.0, 2.0))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_point_age_lookup() {
    let service = service().await;
    let first = service.create(&band("Poodle", "male", json!(0), json!(2))).await.unwrap();
    service.create(&band("Poodle", "male", json!(3), json!(4))).await.unwrap();

    let hit = service.get_by_age("Poodle", Gender::Male, 1.5).await.unwrap();
    assert_eq!(hit.id, first.id);

    let hit = service.get_by_age("Poodle", Gender::Male, 2.0).await.unwrap();
    assert_eq!(hit.id, first.id, "upper bound is inclusive");

    let err = service.get_by_age("Poodle", Gender::Male, 2.5).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_unknown_or_malformed_id_is_not_found() {
    let service = service().await;
    for id in ["not-a-uuid", "00000000-0000-0000-0000-000000000000"] {
        assert!(matches!(
            service.get_by_id(id).await.unwrap_err(),
            Error::NotFound(_)
        ));
    }
}

#[tokio::test]
async fn test_breed_pictures_flatten_across_breeds() {
    let service = service().await;
    let mut raw = band("Poodle", "male", json!(0), json!(2));
    raw.insert("pic_url".into(), json!("poodle.jpg"));
    service.create(&raw).await.unwrap();
    let mut raw = band("Beagle", "female", json!(0), json!(2));
    raw.insert("pic_url".into(), json!("beagle.jpg"));
    service.create(&raw).await.unwrap();

    let pictures = service.list_breed_pictures().await.unwrap();
    let pairs: Vec<(String, String)> = pictures
        .into_iter()
        .map(|p| (p.breed_name, p.pic_url))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Beagle".to_string(), "beagle.jpg".to_string()),
            ("Poodle".to_string(), "poodle.jpg".to_string()),
        ]
    );
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_changes_only_supplied_fields() {
    let service = service().await;
    let created = service.create(&band("Poodle", "male", json!(0), json!(2))).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let updated = service
        .update(
            "Poodle",
            Gender::Male,
            &AgeRange::new(0.0, 2.0),
            &patch(json!({ "avg_drink": "2.567", "description": "Puppy" })),
        )
        .await
        .unwrap();

    assert_eq!(updated.measurements.avg_drink, 2.57);
    assert_eq!(updated.description.as_deref(), Some("Puppy"));
    assert_eq!(updated.measurements.avg_food, created.measurements.avg_food);
    assert_eq!(updated.pic_url, created.pic_url);
    assert!(updated.updated_at > created.updated_at);

    let stored = service.get_by_id(&created.id.to_string()).await.unwrap();
    assert_eq!(stored.measurements, updated.measurements);
    assert_eq!(stored.description.as_deref(), Some("Puppy"));
    assert_eq!(
        stored.created_at.timestamp_micros(),
        created.created_at.timestamp_micros()
    );
}

#[tokio::test]
async fn test_empty_update_refreshes_updated_at() {
    let service = service().await;
    let created = service.create(&band("Poodle", "male", json!(0), json!(2))).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let updated = service
        .update("Poodle", Gender::Male, &AgeRange::new(0.0, 2.0), &Map::new())
        .await
        .unwrap();

    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.measurements, created.measurements);
}

#[tokio::test]
async fn test_update_ignores_key_fields() {
    let service = service().await;
    let created = service.create(&band("Poodle", "male", json!(0), json!(2))).await.unwrap();

    let updated = service
        .update(
            "Poodle",
            Gender::Male,
            &AgeRange::new(0.0, 2.0),
            &patch(json!({ "from_age": 50, "to_age": 60, "gender": "female" })),
        )
        .await
        .unwrap();

    assert_eq!(updated.range(), created.range());
    assert_eq!(updated.gender, Gender::Male);
}

#[tokio::test]
async fn test_update_missing_record_is_not_found() {
    let service = service().await;
    let err = service
        .update(
            "Poodle",
            Gender::Male,
            &AgeRange::new(0.0, 2.0),
            &patch(json!({ "avg_food": 1 })),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_update_revalidates_ordering_by_default() {
    let service = service().await;
    service.create(&band("Poodle", "male", json!(0), json!(2))).await.unwrap();
    let key = AgeRange::new(0.0, 2.0);

    let err = service
        .update("Poodle", Gender::Male, &key, &patch(json!({ "avg_height_min": 5 })))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let stored = service.get_by_range("Poodle", Gender::Male, &key).await.unwrap();
    assert_eq!(stored.measurements.avg_height_min, 1.0, "rejected update must not persist");
}

#[tokio::test]
async fn test_update_without_revalidation_trusts_patch() {
    let service = service_with(LifecycleSettings {
        revalidate_updates: false,
        ..LifecycleSettings::default()
    })
    .await;
    service.create(&band("Poodle", "male", json!(0), json!(2))).await.unwrap();

    let updated = service
        .update(
            "Poodle",
            Gender::Male,
            &AgeRange::new(0.0, 2.0),
            &patch(json!({ "avg_height_min": 5 })),
        )
        .await
        .unwrap();
    assert_eq!(updated.measurements.avg_height_min, 5.0);
    assert!(updated.measurements.avg_height_min > updated.measurements.avg_height_max);
}

#[tokio::test]
async fn test_update_bad_number_is_validation_error() {
    let service = service().await;
    service.create(&band("Poodle", "male", json!(0), json!(2))).await.unwrap();

    let err = service
        .update(
            "Poodle",
            Gender::Male,
            &AgeRange::new(0.0, 2.0),
            &patch(json!({ "avg_food": "plenty" })),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_by_id_then_read_is_not_found() {
    let service = service().await;
    let created = service.create(&band("Poodle", "male", json!(0), json!(2))).await.unwrap();
    let id = created.id.to_string();

    service.delete_by_id(&id).await.unwrap();

    assert!(matches!(service.get_by_id(&id).await.unwrap_err(), Error::NotFound(_)));
    assert!(matches!(service.delete_by_id(&id).await.unwrap_err(), Error::NotFound(_)));
}

#[tokio::test]
async fn test_delete_by_range_frees_the_interval() {
    let service = service().await;
    service.create(&band("Poodle", "male", json!(0), json!(2))).await.unwrap();
    let key = AgeRange::new(0.0, 2.0);

    service.delete_by_range("Poodle", Gender::Male, &key).await.unwrap();
    assert!(matches!(
        service.delete_by_range("Poodle", Gender::Male, &key).await.unwrap_err(),
        Error::NotFound(_)
    ));

    service
        .create(&band("Poodle", "male", json!(1), json!(3)))
        .await
        .expect("interval is free again");
}

#[tokio::test]
async fn test_delete_all_clears_every_breed() {
    let service = service().await;
    for breed in ["Poodle", "Beagle", "Husky"] {
        service.create(&band(breed, "male", json!(0), json!(2))).await.unwrap();
    }
    assert_eq!(service.list_breeds().await.unwrap().len(), 3);

    assert_eq!(service.delete_all().await.unwrap(), 3);
    assert!(service.list_breeds().await.unwrap().is_empty());
    assert!(service.list_all().await.unwrap().is_empty());
}

// =============================================================================
// Store availability
// =============================================================================

#[tokio::test]
async fn test_closed_store_is_dependency_unavailable() {
    let service = service().await;
    service.repository().pool().close().await;

    let err = service.list_breeds().await.unwrap_err();
    assert!(matches!(err, Error::DependencyUnavailable(_)));

    let err = service
        .create(&band("Poodle", "male", json!(0), json!(2)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DependencyUnavailable(_)));
}
