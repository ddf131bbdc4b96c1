mod support;

use availabilityGrid::models::grid::{GridCoordinate, GridError, GridSink, HexColor, TimetableGrid};
use availabilityGrid::service::generation_service::{
    ErrorKind, GenerationError, GenerationRequest, GenerationService,
};
use availabilityGrid::service::range_parser::MalformedRangePolicy;
use support::{FakeProvider, record};

fn request(subject_id: &str) -> GenerationRequest {
    GenerationRequest::new(subject_id, HexColor::WHITE)
}

#[tokio::test]
async fn blank_subject_is_rejected_before_fetching() {
    let provider = FakeProvider::with_records(vec![record(2, None)]);
    let mut grid = TimetableGrid::new();

    let err = GenerationService::generate(&provider, &mut grid, &request("   "))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    assert_eq!(provider.call_count(), 0);
    assert_eq!(grid, TimetableGrid::new());
}

#[tokio::test]
async fn provider_failure_maps_to_provider_error() {
    let provider = FakeProvider::failing();
    let mut grid = TimetableGrid::new();

    let err = GenerationService::generate(&provider, &mut grid, &request("170601496"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProviderError);
    assert_eq!(provider.call_count(), 1);
    assert_eq!(grid, TimetableGrid::new());
}

#[tokio::test]
async fn no_records_is_not_found() {
    let provider = FakeProvider::with_records(Vec::new());
    let mut grid = TimetableGrid::new();

    let err = GenerationService::generate(&provider, &mut grid, &request("170601496"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("No schedule available"));
}

#[tokio::test]
async fn subject_id_is_trimmed_before_fetching() {
    let provider = FakeProvider::with_records(vec![record(5, Some("9am-5pm"))]);
    let mut grid = TimetableGrid::new();

    let summary = GenerationService::generate(&provider, &mut grid, &request(" 170601496 "))
        .await
        .unwrap();
    assert_eq!(summary.subject_id, "170601496");
    assert_eq!(provider.calls.lock().unwrap().as_slice(), ["170601496"]);
}

#[tokio::test]
async fn abort_policy_turns_bad_ranges_into_malformed_input() {
    let provider = FakeProvider::with_records(vec![record(3, Some("9am-11am;soonish"))]);
    let mut grid = TimetableGrid::new();
    let request = request("170601496").with_policy(MalformedRangePolicy::AbortDay);

    let err = GenerationService::generate(&provider, &mut grid, &request)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[tokio::test]
async fn skip_policy_renders_the_rest_of_the_day() {
    let provider = FakeProvider::with_records(vec![record(3, Some("9am-11am;soonish"))]);
    let mut grid = TimetableGrid::new();
    let color: HexColor = "ffa07a".parse().unwrap();

    let request = GenerationRequest::new("170601496", color);

    let summary = GenerationService::generate(&provider, &mut grid, &request)
        .await
        .unwrap();
    assert_eq!(summary.busy_slots, 192 - 24);
}

#[tokio::test]
async fn sink_failure_is_internal() {
    struct BrokenSink;

    impl GridSink for BrokenSink {
        fn fill(&mut self, coordinate: GridCoordinate, _color: HexColor) -> Result<(), GridError> {
            Err(GridError::OutOfRange { coordinate })
        }
    }

    let provider = FakeProvider::with_records(vec![record(2, None)]);
    let err = GenerationService::generate(&provider, &mut BrokenSink, &request("170601496"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(matches!(err, GenerationError::Grid(_)));
}
