//! Integration tests for the catalog query service.
//!
//! These run the service against a real (in-memory) store and check the
//! listing, filtering, and mutation rules end to end.

use cafe_catalog_core::{AmenityFlag, CafeFilter, CafeForm, CafeId, FilterCriteria};
use cafe_catalog_integration_tests::{
    TEST_API_KEY, TestResult, cafe_form, form_bool, memory_pool, seed, test_settings,
};
use cafe_catalog_server::services::catalog::{CatalogError, CatalogService, LocationSearch};

fn amenity_form(name: &str, location: &str, toilet: bool, wifi: bool, sockets: bool) -> CafeForm {
    CafeForm {
        has_toilet: form_bool(toilet),
        has_wifi: form_bool(wifi),
        has_sockets: form_bool(sockets),
        can_take_calls: form_bool(toilet && wifi),
        ..cafe_form(name, location)
    }
}

/// A small, varied catalog across three locations.
fn varied_catalog() -> Vec<CafeForm> {
    vec![
        amenity_form("Blue Bottle", "Downtown", true, true, false),
        amenity_form("Grind", "Uptown", false, true, true),
        amenity_form("Press", "Downtown", false, false, true),
        amenity_form("Roastery", "Harbour", true, false, false),
        amenity_form("Steam", "Uptown", true, true, true),
        amenity_form("Drip", "Downtown", true, true, true),
    ]
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_default_listing_returns_everything_in_id_order() -> TestResult {
    let pool = memory_pool().await?;
    let ids = seed(&pool, varied_catalog()).await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    let listing = catalog.default_listing().await?;

    let listed: Vec<CafeId> = listing.cafes.iter().map(|cafe| cafe.id).collect();
    assert_eq!(listed, ids);

    let names: Vec<&str> = listing
        .selection
        .locations
        .iter()
        .map(|option| option.name.as_str())
        .collect();
    assert_eq!(names, vec!["Downtown", "Harbour", "Uptown"]);
    assert!(listing.selection.locations.iter().all(|option| option.checked));
    assert_eq!(listing.selection.has_wifi, AmenityFlag::Unspecified);
    Ok(())
}

#[tokio::test]
async fn test_default_listing_on_empty_store() -> TestResult {
    let pool = memory_pool().await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    let listing = catalog.default_listing().await?;

    assert!(listing.cafes.is_empty());
    assert!(listing.selection.locations.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_list_all_matches_default_listing() -> TestResult {
    let pool = memory_pool().await?;
    seed(&pool, varied_catalog()).await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    assert_eq!(catalog.list_all().await?, catalog.default_listing().await?.cafes);
    Ok(())
}

// =============================================================================
// Filtering
// =============================================================================

#[tokio::test]
async fn test_filter_is_sound_and_complete() -> TestResult {
    let pool = memory_pool().await?;
    seed(&pool, varied_catalog()).await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);
    let everything = catalog.list_all().await?;

    let criteria_cases = [
        FilterCriteria::default(),
        FilterCriteria {
            locations: vec!["Downtown".to_string()],
            ..FilterCriteria::default()
        },
        FilterCriteria {
            locations: vec!["Downtown".to_string(), "Uptown".to_string()],
            has_wifi: AmenityFlag::Require(true),
            ..FilterCriteria::default()
        },
        FilterCriteria {
            has_toilet: AmenityFlag::Require(true),
            has_sockets: AmenityFlag::Require(false),
            ..FilterCriteria::default()
        },
        FilterCriteria {
            locations: vec!["Atlantis".to_string()],
            ..FilterCriteria::default()
        },
        FilterCriteria {
            can_take_calls: AmenityFlag::Require(true),
            has_sockets: AmenityFlag::Require(true),
            ..FilterCriteria::default()
        },
    ];

    for criteria in criteria_cases {
        let filter = CafeFilter::from_criteria(&criteria);
        let expected: Vec<_> = everything
            .iter()
            .filter(|cafe| filter.matches(cafe))
            .cloned()
            .collect();

        let listing = catalog.list_filtered(&criteria).await?;
        assert_eq!(listing.cafes, expected, "criteria: {criteria:?}");
    }
    Ok(())
}

#[tokio::test]
async fn test_filter_is_idempotent() -> TestResult {
    let pool = memory_pool().await?;
    seed(&pool, varied_catalog()).await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    let criteria = FilterCriteria {
        locations: vec!["Uptown".to_string()],
        has_sockets: AmenityFlag::Require(true),
        ..FilterCriteria::default()
    };

    let first = catalog.list_filtered(&criteria).await?;
    let second = catalog.list_filtered(&criteria).await?;

    assert_eq!(first.cafes, second.cafes);
    assert_eq!(first.selection, second.selection);
    Ok(())
}

#[tokio::test]
async fn test_filter_form_scenario() -> TestResult {
    let pool = memory_pool().await?;
    seed(
        &pool,
        vec![
            amenity_form("Blue Bottle", "Downtown", false, true, false),
            amenity_form("Quiet Corner", "Uptown", false, false, false),
        ],
    )
    .await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    let criteria = FilterCriteria::from_form_pairs([
        ("location", "Downtown"),
        ("has_wifi", "True"),
    ]);
    let listing = catalog.list_filtered(&criteria).await?;

    let names: Vec<&str> = listing.cafes.iter().map(|cafe| cafe.name.as_str()).collect();
    assert_eq!(names, vec!["Blue Bottle"]);

    let checked: Vec<(&str, bool)> = listing
        .selection
        .locations
        .iter()
        .map(|option| (option.name.as_str(), option.checked))
        .collect();
    assert_eq!(checked, vec![("Downtown", true), ("Uptown", false)]);
    assert_eq!(listing.selection.has_wifi, AmenityFlag::Require(true));
    assert_eq!(listing.selection.has_toilet, AmenityFlag::Unspecified);
    Ok(())
}

#[tokio::test]
async fn test_non_true_flag_requires_false() -> TestResult {
    let pool = memory_pool().await?;
    seed(
        &pool,
        vec![
            amenity_form("With Wifi", "Downtown", false, true, false),
            amenity_form("Without Wifi", "Downtown", false, false, false),
        ],
    )
    .await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    let criteria = FilterCriteria::from_form_pairs([("has_wifi", "yes")]);
    let listing = catalog.list_filtered(&criteria).await?;

    let names: Vec<&str> = listing.cafes.iter().map(|cafe| cafe.name.as_str()).collect();
    assert_eq!(names, vec!["Without Wifi"]);
    Ok(())
}

// =============================================================================
// Random pick and search
// =============================================================================

#[tokio::test]
async fn test_random_pick_single_record() -> TestResult {
    let pool = memory_pool().await?;
    let ids = seed(&pool, vec![cafe_form("Only One", "Downtown")]).await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    for _ in 0..5 {
        assert_eq!(catalog.random_pick().await?.id, ids[0]);
    }
    Ok(())
}

#[tokio::test]
async fn test_random_pick_is_a_member() -> TestResult {
    let pool = memory_pool().await?;
    let ids = seed(&pool, varied_catalog()).await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    for _ in 0..20 {
        assert!(ids.contains(&catalog.random_pick().await?.id));
    }
    Ok(())
}

#[tokio::test]
async fn test_random_pick_empty_store() -> TestResult {
    let pool = memory_pool().await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    assert!(matches!(
        catalog.random_pick().await,
        Err(CatalogError::EmptyCollection)
    ));
    Ok(())
}

#[tokio::test]
async fn test_search_by_location_is_exact() -> TestResult {
    let pool = memory_pool().await?;
    seed(&pool, varied_catalog()).await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    match catalog.search_by_location("Uptown").await? {
        LocationSearch::Found(cafes) => {
            let names: Vec<&str> = cafes.iter().map(|cafe| cafe.name.as_str()).collect();
            assert_eq!(names, vec!["Grind", "Steam"]);
        }
        LocationSearch::NoMatch => panic!("expected cafes in Uptown"),
    }

    assert!(matches!(
        catalog.search_by_location("uptown").await?,
        LocationSearch::NoMatch
    ));
    assert!(matches!(
        catalog.search_by_location("").await?,
        LocationSearch::NoMatch
    ));
    Ok(())
}

// =============================================================================
// Mutations
// =============================================================================

#[tokio::test]
async fn test_create_then_get() -> TestResult {
    let pool = memory_pool().await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    let form = CafeForm {
        has_wifi: Some("on".to_string()),
        coffee_price: Some("£2.80".to_string()),
        ..cafe_form("Blue Bottle", "Downtown")
    };
    let expected = form.clone().validate()?;

    let id = catalog.create(form).await?;
    assert_eq!(catalog.get(id).await?, expected.with_id(id));
    Ok(())
}

#[tokio::test]
async fn test_create_round_trips_surrounding_whitespace() -> TestResult {
    let pool = memory_pool().await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    let padded = CafeForm {
        seats: Some(" 20-30".to_string()),
        coffee_price: Some("£2.80 ".to_string()),
        ..cafe_form("Blue Bottle ", "Downtown")
    };
    let expected = padded.clone().validate()?;

    let id = catalog.create(padded).await?;
    let stored = catalog.get(id).await?;

    assert_eq!(stored.name, "Blue Bottle ");
    assert_eq!(stored.seats, " 20-30");
    assert_eq!(stored.coffee_price.as_deref(), Some("£2.80 "));
    assert_eq!(stored, expected.with_id(id));

    // Names differing only in whitespace are distinct.
    catalog.create(cafe_form("Blue Bottle", "Downtown")).await?;
    assert_eq!(catalog.list_all().await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_create_whitespace_only_name_is_missing() -> TestResult {
    let pool = memory_pool().await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    let result = catalog.create(cafe_form("   ", "Downtown")).await;

    assert!(matches!(result, Err(CatalogError::Validation(_))));
    assert!(catalog.list_all().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_create_duplicate_name_is_conflict() -> TestResult {
    let pool = memory_pool().await?;
    seed(&pool, vec![cafe_form("Blue Bottle", "Downtown")]).await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    let result = catalog.create(cafe_form("Blue Bottle", "Uptown")).await;

    assert!(matches!(result, Err(CatalogError::Conflict(_))));
    assert_eq!(catalog.list_all().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_create_invalid_form_stores_nothing() -> TestResult {
    let pool = memory_pool().await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    let missing_name = CafeForm {
        name: None,
        ..cafe_form("Unnamed", "Downtown")
    };
    let bad_bool = CafeForm {
        has_toilet: Some("maybe".to_string()),
        ..cafe_form("Undecided", "Downtown")
    };

    assert!(matches!(
        catalog.create(missing_name).await,
        Err(CatalogError::Validation(_))
    ));
    assert!(matches!(
        catalog.create(bad_bool).await,
        Err(CatalogError::Validation(_))
    ));
    assert!(catalog.list_all().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_update_price_changes_only_price() -> TestResult {
    let pool = memory_pool().await?;
    let ids = seed(&pool, varied_catalog()).await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);
    let before = catalog.get(ids[1]).await?;

    catalog.update_price(ids[1], Some("£3.10".to_string())).await?;

    let after = catalog.get(ids[1]).await?;
    assert_eq!(after.coffee_price.as_deref(), Some("£3.10"));
    assert_eq!(
        after,
        cafe_catalog_core::Cafe {
            coffee_price: Some("£3.10".to_string()),
            ..before
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_update_price_absent_clears() -> TestResult {
    let pool = memory_pool().await?;
    let form = CafeForm {
        coffee_price: Some("£2.00".to_string()),
        ..cafe_form("Blue Bottle", "Downtown")
    };
    let ids = seed(&pool, vec![form]).await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    catalog.update_price(ids[0], None).await?;

    assert_eq!(catalog.get(ids[0]).await?.coffee_price, None);
    Ok(())
}

#[tokio::test]
async fn test_update_price_blank_clears() -> TestResult {
    let pool = memory_pool().await?;
    let form = CafeForm {
        coffee_price: Some("£2.00".to_string()),
        ..cafe_form("Blue Bottle", "Downtown")
    };
    let ids = seed(&pool, vec![form]).await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    for blank in ["", "  "] {
        catalog.update_price(ids[0], Some(blank.to_string())).await?;
        assert_eq!(catalog.get(ids[0]).await?.coffee_price, None);
    }
    Ok(())
}

#[tokio::test]
async fn test_update_price_missing_id() -> TestResult {
    let pool = memory_pool().await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    let result = catalog
        .update_price(CafeId::new(42), Some("£1".to_string()))
        .await;

    assert!(matches!(result, Err(CatalogError::NotFound(id)) if id == CafeId::new(42)));
    Ok(())
}

#[tokio::test]
async fn test_delete_with_wrong_key_keeps_record() -> TestResult {
    let pool = memory_pool().await?;
    let ids = seed(&pool, vec![cafe_form("Blue Bottle", "Downtown")]).await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    for key in [None, Some("wrong"), Some("")] {
        assert!(matches!(
            catalog.delete(ids[0], key).await,
            Err(CatalogError::Unauthorized)
        ));
    }

    assert_eq!(catalog.get(ids[0]).await?.id, ids[0]);
    Ok(())
}

#[tokio::test]
async fn test_delete_wrong_key_on_missing_id_is_unauthorized() -> TestResult {
    let pool = memory_pool().await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    assert!(matches!(
        catalog.delete(CafeId::new(7), Some("wrong")).await,
        Err(CatalogError::Unauthorized)
    ));
    Ok(())
}

#[tokio::test]
async fn test_delete_then_not_found() -> TestResult {
    let pool = memory_pool().await?;
    let ids = seed(&pool, varied_catalog()).await?;
    let settings = test_settings();
    let catalog = CatalogService::new(&pool, &settings);

    catalog.delete(ids[2], Some(TEST_API_KEY)).await?;

    assert!(matches!(
        catalog.get(ids[2]).await,
        Err(CatalogError::NotFound(_))
    ));
    assert!(matches!(
        catalog.delete(ids[2], Some(TEST_API_KEY)).await,
        Err(CatalogError::NotFound(_))
    ));
    assert_eq!(catalog.list_all().await?.len(), ids.len() - 1);
    Ok(())
}
