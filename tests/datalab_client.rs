use std::time::Duration;

use brand_trends::app::pipeline::analyze_fetch;
use brand_trends::data::{ChunkError, Credentials, DataLabClient};
use brand_trends::domain::{BrandGroup, DateRange, TimeUnit};
use brand_trends::error::EXIT_CONFIG;
use chrono::NaiveDate;
use mockito::{Matcher, Server};

const PATH: &str = "/v1/datalab/search";

fn client(server: &Server) -> DataLabClient {
    DataLabClient::new(Credentials::new("id", "secret"), server.url(), Duration::from_secs(5)).unwrap()
}

fn range(unit: TimeUnit) -> DateRange {
    DateRange {
        start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2025, 3, 28).unwrap(),
        unit,
    }
}

fn groups(names: &[&str]) -> Vec<BrandGroup> {
    names.iter().map(|n| BrandGroup::new(*n, [*n])).collect()
}

fn body_for(titles: &[&str]) -> String {
    let results: Vec<String> = titles
        .iter()
        .map(|t| {
            format!(
                r#"{{"title":"{t}","keywords":["{t}"],"data":[{{"period":"2025-03-01","ratio":10.0}},{{"period":"2025-03-08","ratio":20.0}}]}}"#
            )
        })
        .collect();
    format!(
        r#"{{"startDate":"2025-03-01","endDate":"2025-03-28","timeUnit":"week","results":[{}]}}"#,
        results.join(",")
    )
}

#[test]
fn sends_credentials_and_request_shape() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", PATH)
        .match_header("X-Naver-Client-Id", "id")
        .match_header("X-Naver-Client-Secret", "secret")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""startDate":"2025-03-01""#.to_string()),
            Matcher::Regex(r#""endDate":"2025-03-28""#.to_string()),
            Matcher::Regex(r#""timeUnit":"week""#.to_string()),
            Matcher::Regex(r#""groupName":"A""#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body_for(&["A", "B"]))
        .create();

    let outcome = client(&server)
        .fetch_table(&range(TimeUnit::Week), &groups(&["A", "B"]))
        .unwrap();

    mock.assert();
    assert_eq!(outcome.chunks, 1);
    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.table.brands(), vec!["A", "B"]);
    assert_eq!(outcome.table.len(), 4);
}

#[test]
fn failed_chunk_is_skipped_and_recorded() {
    let mut server = Server::new();
    let ok = server
        .mock("POST", PATH)
        .match_body(Matcher::Regex(r#""groupName":"A""#.to_string()))
        .with_status(200)
        .with_body(body_for(&["A", "B", "C", "D", "E"]))
        .create();
    let failing = server
        .mock("POST", PATH)
        .match_body(Matcher::Regex(r#""groupName":"F""#.to_string()))
        .with_status(500)
        .with_body("upstream exploded")
        .create();

    let outcome = client(&server)
        .fetch_table(&range(TimeUnit::Week), &groups(&["A", "B", "C", "D", "E", "F"]))
        .unwrap();

    ok.assert();
    failing.assert();
    assert_eq!(outcome.chunks, 2);
    assert_eq!(outcome.table.brands(), vec!["A", "B", "C", "D", "E"]);
    assert_eq!(outcome.failures.len(), 1);

    let failure = &outcome.failures[0];
    assert_eq!(failure.index, 1);
    assert_eq!(failure.groups, vec!["F"]);
    match &failure.error {
        ChunkError::Status { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_payload_is_a_chunk_failure() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(r#"{"results":[{"title":"A","data":[{"period":"March","ratio":1.0}]}]}"#)
        .create();

    let outcome = client(&server)
        .fetch_table(&range(TimeUnit::Week), &groups(&["A"]))
        .unwrap();

    assert!(outcome.table.is_empty());
    assert!(matches!(outcome.failures[0].error, ChunkError::Malformed(_)));
}

#[test]
fn sweep_continues_past_a_malformed_chunk() {
    let mut server = Server::new();
    let broken = server
        .mock("POST", PATH)
        .match_body(Matcher::Regex(r#""groupName":"A""#.to_string()))
        .with_status(200)
        .with_body(r#"{"results":[{"data":[]}]}"#)
        .create();
    let ok = server
        .mock("POST", PATH)
        .match_body(Matcher::Regex(r#""groupName":"F""#.to_string()))
        .with_status(200)
        .with_body(body_for(&["F", "G"]))
        .create();

    let outcome = client(&server)
        .fetch_table(&range(TimeUnit::Week), &groups(&["A", "B", "C", "D", "E", "F", "G"]))
        .unwrap();

    broken.assert();
    ok.assert();
    assert_eq!(outcome.chunks, 2);
    assert_eq!(outcome.table.brands(), vec!["F", "G"]);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].index, 0);
    assert_eq!(outcome.failures[0].groups, vec!["A", "B", "C", "D", "E"]);
    assert!(matches!(outcome.failures[0].error, ChunkError::Malformed(_)));
}

#[test]
fn unreachable_host_fails_every_chunk_without_aborting() {
    let client = DataLabClient::new(
        Credentials::new("id", "secret"),
        "http://127.0.0.1:9",
        Duration::from_millis(500),
    )
    .unwrap();

    let outcome = client
        .fetch_table(&range(TimeUnit::Day), &groups(&["A", "B", "C", "D", "E", "F", "G"]))
        .unwrap();

    assert_eq!(outcome.chunks, 2);
    assert!(outcome.table.is_empty());
    assert_eq!(outcome.failures.len(), 2);
    assert_eq!(
        outcome.failures.iter().map(|f| f.index).collect::<Vec<_>>(),
        vec![0, 1]
    );
    assert!(
        outcome
            .failures
            .iter()
            .all(|f| matches!(f.error, ChunkError::Transport(_)))
    );
}

#[test]
fn every_chunk_failing_means_no_data() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", PATH)
        .with_status(401)
        .with_body(r#"{"errorMessage":"Authentication failed"}"#)
        .expect(2)
        .create();

    let groups = groups(&["A", "B", "C", "D", "E", "F", "G"]);
    let outcome = client(&server).fetch_table(&range(TimeUnit::Day), &groups).unwrap();
    assert_eq!(outcome.failures.len(), 2);

    let err = analyze_fetch(range(TimeUnit::Day), groups, outcome).unwrap_err();
    assert!(err.is_no_data());
    assert!(err.to_string().contains("2 of 2 request(s) failed"));
    assert!(err.to_string().contains("HTTP 401"));
}

#[test]
fn reversed_range_is_rejected_before_any_request() {
    let mut server = Server::new();
    let mock = server.mock("POST", PATH).expect(0).create();

    let mut reversed = range(TimeUnit::Day);
    std::mem::swap(&mut reversed.start, &mut reversed.end);

    let err = client(&server)
        .fetch_table(&reversed, &groups(&["A"]))
        .unwrap_err();

    mock.assert();
    assert_eq!(err.exit_code(), EXIT_CONFIG);
}
