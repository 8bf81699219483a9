use std::{cell::RefCell, collections::HashMap, rc::Rc};

use anyhow::anyhow;
use googletest::prelude::*;
use test_casing::{TestCases, cases, test_casing};

use super::*;

const ROCHE: &str = "CH0012032048";
const APPLE: &str = "US0378331005";

fn ok_response(body: &str) -> ServiceResponse {
    ServiceResponse {
        status: 200,
        body: body.to_owned(),
    }
}

const ROCHE_BODY: &str = r#"{
    "security": [
        {
            "isin": "CH0012032048",
            "vn": 1203204,
            "institution": "Roche Holding AG",
            "countryName": "Svizzera",
            "currencyName": "CHF"
        }
    ]
}"#;

#[gtest]
fn request_body_matches_service_format() -> anyhow::Result<()> {
    let body = serde_json::to_value(SecurityRequest::new(ROCHE, 2024))?;

    expect_eq!(
        body,
        serde_json::json!({
            "max": 5,
            "fetch": 5,
            "offset": 0,
            "isin": "CH0012032048",
            "year": "2024",
            "lang": "it",
        })
    );
    Ok(())
}

#[gtest]
fn parses_first_security() {
    expect_eq!(
        parse_response(ROCHE, &ok_response(ROCHE_BODY)),
        Ok(Attributes {
            value_number: Some("1203204".to_string()),
            name: Some("Roche Holding AG".to_string()),
            value: None,
            country: Some("Svizzera".to_string()),
            currency: Some("CHF".to_string()),
        })
    );
}

#[gtest]
fn optional_fields_may_be_missing() {
    let body = r#"{"security": [{"isin": "US0378331005", "vn": "908440", "institution": "Apple"}]}"#;

    expect_eq!(
        parse_response(APPLE, &ok_response(body)),
        Ok(Attributes {
            value_number: Some("908440".to_string()),
            name: Some("Apple".to_string()),
            ..Default::default()
        })
    );
}

#[gtest]
fn multiple_securities_use_the_first() {
    let body = r#"{"security": [
        {"isin": "US0378331005", "vn": 1, "institution": "First"},
        {"isin": "US0378331005", "vn": 2, "institution": "Second"}
    ]}"#;

    let attributes = parse_response(APPLE, &ok_response(body));

    expect_eq!(attributes.map(|a| a.name), Ok(Some("First".to_string())));
}

const FAILED_RESPONSE_CASES: TestCases<(ServiceResponse, ResponseError)> = cases! {
    [
        (
            ServiceResponse { status: 500, body: String::new() },
            ResponseError::Status(500),
        ),
        (
            ok_response(r#"{"security": []}"#),
            ResponseError::NoEntries,
        ),
        (
            ok_response(
                r#"{"security": [{"isin": "US0378331005", "vn": 1, "institution": "Apple"}]}"#,
            ),
            ResponseError::IsinMismatch {
                requested: ROCHE.to_string(),
                found: APPLE.to_string(),
            },
        ),
    ]
};

#[test]
fn failed_response_cases_count() {
    assert_eq!(FAILED_RESPONSE_CASES.into_iter().count(), 3);
}

#[test_casing(3, FAILED_RESPONSE_CASES)]
fn rejects_failed_response(response: ServiceResponse, expected: ResponseError) {
    assert_that!(parse_response(ROCHE, &response), eq(&Err(expected)));
}

#[gtest]
fn rejects_missing_required_fields() {
    let body = r#"{"security": [{"isin": "CH0012032048", "vn": 1}]}"#;

    expect_true!(matches!(
        parse_response(ROCHE, &ok_response(body)),
        Err(ResponseError::Malformed(_))
    ));
}

/// Service answering from canned responses keyed by ISIN.
struct FakeService {
    responses: HashMap<String, anyhow::Result<ServiceResponse>>,
    requests: Rc<RefCell<Vec<SecurityRequest>>>,
}

impl SecurityService for FakeService {
    fn query(&self, request: &SecurityRequest) -> anyhow::Result<ServiceResponse> {
        self.requests.borrow_mut().push(request.clone());
        match self.responses.get(&request.isin) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(err)) => Err(anyhow!("{err}")),
            None => Err(anyhow!("no canned response for {}", request.isin)),
        }
    }
}

#[derive(Clone, Default)]
struct RecordedEvents(Rc<RefCell<Vec<LookupEvent>>>);

impl LookupEvents for RecordedEvents {
    fn on_event(&mut self, event: LookupEvent) {
        self.0.borrow_mut().push(event);
    }
}

#[test_log::test]
fn resolve_skips_failed_identifiers() {
    let requests = Rc::new(RefCell::new(Vec::new()));
    let service = FakeService {
        responses: HashMap::from([
            (ROCHE.to_string(), Ok(ok_response(ROCHE_BODY))),
            (
                APPLE.to_string(),
                Ok(ServiceResponse {
                    status: 404,
                    body: String::new(),
                }),
            ),
            ("XS0000000009".to_string(), Err(anyhow!("connection reset"))),
        ]),
        requests: requests.clone(),
    };
    let events = RecordedEvents::default();
    let mut lookup = IctaxLookup::new(service, Duration::ZERO, Box::new(events.clone()));
    let identifiers: BTreeSet<String> = [ROCHE, APPLE, "XS0000000009"]
        .into_iter()
        .map(String::from)
        .collect();

    let resolved = lookup.resolve(&identifiers, 2023);

    assert_eq!(resolved.len(), 1);
    assert_eq!(
        resolved.get(ROCHE).and_then(|a| a.name.clone()),
        Some("Roche Holding AG".to_string())
    );
    assert_eq!(resolved.get(APPLE), None);
    assert!(requests.borrow().iter().all(|request| request.year == "2023"));
    assert_eq!(
        *events.0.borrow(),
        vec![
            LookupEvent::Progress {
                identifier: ROCHE.to_string(),
                resolved: true,
                completed: 1,
                total: 3,
            },
            LookupEvent::Progress {
                identifier: APPLE.to_string(),
                resolved: false,
                completed: 2,
                total: 3,
            },
            LookupEvent::Progress {
                identifier: "XS0000000009".to_string(),
                resolved: false,
                completed: 3,
                total: 3,
            },
            LookupEvent::Completed,
        ]
    );
}
