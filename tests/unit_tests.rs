// Unit tests for the courtfinder search core's pure functions

use courtfinder::core::postcode::{classify, Region};
use courtfinder::core::strategy::{select, SearchStrategy};
use courtfinder::core::SearchError;
use courtfinder::models::{
    CatchmentMethod, CatchmentType, CourtCatchmentConfig, SearchAction, ServiceAreaConfig,
    ServiceAreaType,
};

fn service_area(
    area_type: ServiceAreaType,
    catchment_method: CatchmentMethod,
) -> ServiceAreaConfig {
    ServiceAreaConfig {
        id: 1,
        name: "Test area".to_string(),
        slug: "test-area".to_string(),
        area_type,
        catchment_method,
        area_of_law: "Test law".to_string(),
    }
}

fn regional_catchment() -> Vec<CourtCatchmentConfig> {
    vec![CourtCatchmentConfig {
        court_id: 1,
        catchment_type: CatchmentType::Regional,
    }]
}

#[test]
fn test_valid_england_wales_postcodes_normalize_with_one_space() {
    let cases = [
        ("sw1a1aa", "SW1A 1AA"),
        ("SW1A  1AA", "SW1A 1AA"),
        (" m1 1ae ", "M1 1AE"),
        ("cr26xh", "CR2 6XH"),
        ("DN55 1PT", "DN55 1PT"),
        ("W1A1HQ", "W1A 1HQ"),
        ("b338th", "B33 8TH"),
    ];

    for (raw, expected) in cases {
        let classified = classify(raw).unwrap();
        assert_eq!(classified.normalized, expected, "input {raw:?}");
        assert_eq!(classified.region, Region::EnglandWales);
        assert_eq!(classified.normalized.matches(' ').count(), 1);
        let space_at = classified.normalized.find(' ').unwrap();
        assert_eq!(space_at, classified.normalized.len() - 4);
    }
}

#[test]
fn test_excluded_regions_get_specific_reasons() {
    let cases = [
        ("AB10 1AA", Region::Scotland),
        ("EH1 1YZ", Region::Scotland),
        ("G1 1XQ", Region::Scotland),
        ("BT1 1AA", Region::NorthernIreland),
        ("BT48 6AA", Region::NorthernIreland),
        ("IM1 1AA", Region::CrownDependencies),
        ("JE2 3AA", Region::CrownDependencies),
        ("GY1 1AA", Region::CrownDependencies),
    ];

    for (raw, expected_region) in cases {
        let classified = classify(raw).unwrap();
        assert_eq!(classified.region, expected_region, "input {raw:?}");

        match classified.ensure_searchable().unwrap_err() {
            SearchError::UnsupportedRegion { region, .. } => {
                assert_eq!(region, expected_region, "input {raw:?}");
            }
            other => panic!("expected UnsupportedRegion for {raw:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_malformed_postcodes_rejected_not_misclassified() {
    for raw in ["", "  ", "123456", "SW!A 1AA", "ABCD 1AA", "SW1A 1A"] {
        assert!(
            matches!(classify(raw), Err(SearchError::InvalidPostcode(_))),
            "input {raw:?}"
        );
    }
}

#[test]
fn test_nearest_action_always_selects_default_distance() {
    let selected = select(
        SearchAction::Nearest,
        Some("Authority Name"),
        &service_area(ServiceAreaType::Family, CatchmentMethod::LocalAuthority),
        &regional_catchment(),
    );
    assert_eq!(selected, SearchStrategy::DefaultAolDistance);
}

#[test]
fn test_civil_area_selects_postcode_preference() {
    // Scenario: "Money Claims" (civil) with DOCUMENTS, whatever the
    // authority resolution produced.
    for authority in [None, Some("Authority Name")] {
        let selected = select(
            SearchAction::Documents,
            authority,
            &service_area(ServiceAreaType::Civil, CatchmentMethod::Distance),
            &[],
        );
        assert_eq!(selected, SearchStrategy::CivilPostcodePreference);
    }
}

#[test]
fn test_family_without_authority_never_family_strategy() {
    let selected = select(
        SearchAction::Documents,
        None,
        &service_area(ServiceAreaType::Family, CatchmentMethod::LocalAuthority),
        &regional_catchment(),
    );
    assert_eq!(selected, SearchStrategy::DefaultAolDistance);
}

#[test]
fn test_family_catchment_splits_regional_and_non_regional() {
    let area = service_area(ServiceAreaType::Family, CatchmentMethod::LocalAuthority);

    let regional = select(
        SearchAction::Update,
        Some("Authority Name"),
        &area,
        &regional_catchment(),
    );
    assert_eq!(regional, SearchStrategy::FamilyRegional);

    let local_only = vec![CourtCatchmentConfig {
        court_id: 1,
        catchment_type: CatchmentType::Local,
    }];
    let non_regional = select(
        SearchAction::Update,
        Some("Authority Name"),
        &area,
        &local_only,
    );
    assert_eq!(non_regional, SearchStrategy::FamilyNonRegional);
}
