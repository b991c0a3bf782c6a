use serde_json::json;

use rexy::bridge::background::BackgroundBridge;
use rexy::bridge::relay::{BridgeMessage, MessageBridge, MockBridge, RelayReply};
use rexy::field::field_model::{FieldDescriptor, InputKind};
use rexy::page::context::{PageContext, PageRequest};
use rexy::proposer::ValueProposer;
use rexy::proposer::delegated::{DelegatedProposer, values_from_data};
use rexy::proposer::heuristic::{
    COMPANY_VALUE, DEFAULT_VALUE, EMAIL_VALUE, FIRST_NAME_VALUE, FULL_NAME_VALUE, HeuristicProposer,
    LAST_NAME_VALUE, MESSAGE_VALUE, PHONE_VALUE, WEBSITE_VALUE, ZIP_VALUE, propose_value,
};
use rexy::AutofillError;

mod common;

use crate::common::pages::{BrokenPage, RecordingPage, CONTACT_FORM, contact_page};

fn field(id: &str, kind: InputKind) -> FieldDescriptor {
    FieldDescriptor {
        id: id.into(),
        kind,
        name: String::new(),
        placeholder: String::new(),
        label: String::new(),
        value: String::new(),
        locator: None,
    }
}

// ============================================================================
// Heuristic keyword table
// ============================================================================

#[test]
fn email_keyword_wins_regardless_of_type() {
    let mut f = field("contact", InputKind::Text);
    f.name = "user_email".into();
    assert_eq!(propose_value(&f), EMAIL_VALUE);

    let mut f = field("x", InputKind::Number);
    f.placeholder = "Your E-Mail".into();
    assert_eq!(propose_value(&f), EMAIL_VALUE);
}

#[test]
fn name_parts_are_told_apart() {
    let mut first = field("fname", InputKind::Text);
    first.label = "First name".into();
    let mut last = field("lname", InputKind::Text);
    last.label = "Last name".into();
    let mut full = field("full", InputKind::Text);
    full.name = "name".into();

    assert_eq!(propose_value(&first), FIRST_NAME_VALUE);
    assert_eq!(propose_value(&last), LAST_NAME_VALUE);
    assert_eq!(propose_value(&full), FULL_NAME_VALUE);
}

#[test]
fn matching_is_case_insensitive_over_all_texts() {
    let mut f = field("PHONE_NUMBER", InputKind::Text);
    assert_eq!(propose_value(&f), PHONE_VALUE);

    f = field("a", InputKind::Text);
    f.label = "Postal Code".into();
    assert_eq!(propose_value(&f), ZIP_VALUE);

    f = field("b", InputKind::Text);
    f.placeholder = "Company".into();
    assert_eq!(propose_value(&f), COMPANY_VALUE);
}

#[test]
fn kind_decides_when_no_keyword_matches() {
    assert_eq!(propose_value(&field("a", InputKind::Email)), EMAIL_VALUE);
    assert_eq!(propose_value(&field("b", InputKind::Tel)), PHONE_VALUE);
    assert_eq!(propose_value(&field("c", InputKind::Url)), WEBSITE_VALUE);
    assert_eq!(propose_value(&field("d", InputKind::TextArea)), MESSAGE_VALUE);
}

#[test]
fn unmatched_field_gets_the_default() {
    assert_eq!(propose_value(&field("q", InputKind::Text)), DEFAULT_VALUE);
    assert_eq!(propose_value(&field("", InputKind::Other("week".into()))), DEFAULT_VALUE);
}

#[test]
fn heuristic_proposer_fills_every_field_of_the_contact_form() {
    let mut page = contact_page();
    let mut fields = page.extract_fields().unwrap();
    HeuristicProposer.propose(&mut fields, &mut page).unwrap();

    let values: Vec<(&str, &str)> = fields.iter().map(|f| (f.id.as_str(), f.value.as_str())).collect();
    assert_eq!(
        values,
        [
            ("first_name", FIRST_NAME_VALUE),
            ("last_name", LAST_NAME_VALUE),
            ("user_mail", EMAIL_VALUE),
            ("phone", PHONE_VALUE),
            ("topic", DEFAULT_VALUE),
            ("body", MESSAGE_VALUE),
            ("attachment", DEFAULT_VALUE),
        ]
    );
}

#[test]
fn heuristic_proposer_never_talks_to_the_page() {
    let mut page = BrokenPage;
    let mut fields = vec![field("email", InputKind::Email)];
    HeuristicProposer.propose(&mut fields, &mut page).unwrap();
    assert_eq!(fields[0].value, EMAIL_VALUE);
}

// ============================================================================
// Reply decoding
// ============================================================================

#[test]
fn values_from_array_of_entries() {
    let data = json!([
        { "id": "first_name", "value": "Ada" },
        { "id": "age", "value": 36 },
        { "id": "newsletter", "value": true },
        { "id": "skip", "value": null },
        { "value": "no id" }
    ]);
    let values = values_from_data(&data);

    assert_eq!(values.len(), 3);
    assert_eq!(values["first_name"], "Ada");
    assert_eq!(values["age"], "36");
    assert_eq!(values["newsletter"], "true");
}

#[test]
fn values_from_fields_wrapper_and_plain_map() {
    let wrapped = json!({ "fields": [{ "id": "phone", "value": "555" }] });
    assert_eq!(values_from_data(&wrapped)["phone"], "555");

    let map = json!({ "phone": "555", "city": "Paris", "nested": { "a": 1 } });
    let values = values_from_data(&map);
    assert_eq!(values.len(), 2);
    assert_eq!(values["city"], "Paris");
}

#[test]
fn unusable_data_yields_no_values() {
    assert!(values_from_data(&json!(null)).is_empty());
    assert!(values_from_data(&json!("free text")).is_empty());
}

// ============================================================================
// Delegated proposer
// ============================================================================

struct CapturingBridge {
    seen: std::sync::Mutex<Vec<BridgeMessage>>,
    data: serde_json::Value,
}

impl MessageBridge for CapturingBridge {
    fn send(&self, message: BridgeMessage) -> Result<RelayReply, AutofillError> {
        self.seen.lock().unwrap().push(message);
        Ok(RelayReply {
            data: self.data.clone(),
        })
    }
}

struct FailingBridge;

impl MessageBridge for FailingBridge {
    fn send(&self, _message: BridgeMessage) -> Result<RelayReply, AutofillError> {
        Err(AutofillError::RelayStatus {
            endpoint: "http://127.0.0.1:8000/api/fill".into(),
            status: 503,
        })
    }
}

#[test]
fn delegated_uses_service_values_and_heuristic_for_the_rest() {
    let bridge = MockBridge::with_data(json!([
        { "id": "first_name", "value": "Ada" },
        { "id": "topic", "value": "sales" },
        { "id": "not_on_page", "value": "ignored" }
    ]));
    let proposer = DelegatedProposer::new(Box::new(bridge));
    let mut page = contact_page();
    let mut fields = page.extract_fields().unwrap();

    proposer.propose(&mut fields, &mut page).unwrap();

    assert_eq!(fields[0].value, "Ada");
    assert_eq!(fields[1].value, LAST_NAME_VALUE);
    assert_eq!(fields[4].value, "sales");
    assert_eq!(fields.len(), 7, "unknown ids do not add fields");
}

#[test]
fn delegated_sends_sanitized_markup_as_fetch_data() {
    let bridge = std::sync::Arc::new(CapturingBridge {
        seen: std::sync::Mutex::new(Vec::new()),
        data: json!({}),
    });

    struct Shared(std::sync::Arc<CapturingBridge>);
    impl MessageBridge for Shared {
        fn send(&self, message: BridgeMessage) -> Result<RelayReply, AutofillError> {
            self.0.send(message)
        }
    }

    let proposer = DelegatedProposer::new(Box::new(Shared(bridge.clone())));
    let mut page = RecordingPage::new(CONTACT_FORM);
    let mut fields = page.extract_fields().unwrap();
    proposer.propose(&mut fields, &mut page).unwrap();

    assert!(matches!(page.requests.last(), Some(PageRequest::CaptureMarkup)));

    let seen = bridge.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let BridgeMessage::FetchData(payload) = &seen[0];
    assert!(payload.dom_content.contains("first_name"));
    assert!(!payload.dom_content.contains("<script"));
    assert!(!payload.dom_content.contains("class="));

    // Empty reply: every field keeps the heuristic value.
    assert_eq!(fields[2].value, EMAIL_VALUE);
}

#[test]
fn delegated_propagates_bridge_errors() {
    let proposer = DelegatedProposer::new(Box::new(FailingBridge));
    let mut page = contact_page();
    let mut fields = page.extract_fields().unwrap();

    let err = proposer.propose(&mut fields, &mut page).unwrap_err();
    assert!(matches!(err, AutofillError::RelayStatus { status: 503, .. }));
    assert!(fields.iter().all(|f| f.value.is_empty()), "nothing proposed on failure");
}

#[test]
fn delegated_propagates_page_errors() {
    let proposer = DelegatedProposer::new(Box::new(MockBridge::with_data(json!([]))));
    let mut fields = vec![field("a", InputKind::Text)];
    assert!(proposer.propose(&mut fields, &mut BrokenPage).is_err());
}

// ============================================================================
// Background bridge
// ============================================================================

#[test]
fn background_bridge_round_trips_through_worker() {
    let bridge = BackgroundBridge::spawn(Box::new(MockBridge::with_data(json!({ "phone": "555" })))).unwrap();

    let first = bridge.send(BridgeMessage::fetch_data("<html></html>".into())).unwrap();
    let second = bridge.send(BridgeMessage::fetch_data("<html></html>".into())).unwrap();

    assert_eq!(first.data, json!({ "phone": "555" }));
    assert_eq!(first, second, "worker keeps serving after a reply");
}

#[test]
fn background_bridge_forwards_errors() {
    let bridge = BackgroundBridge::spawn(Box::new(FailingBridge)).unwrap();
    let err = bridge.send(BridgeMessage::fetch_data(String::new())).unwrap_err();
    assert!(matches!(err, AutofillError::RelayStatus { .. }));
}

#[test]
fn delegated_proposer_over_background_bridge() {
    let worker = BackgroundBridge::spawn(Box::new(MockBridge::with_data(json!({
        "fields": [{ "id": "phone", "value": "+44 20 7946 0000" }]
    }))))
    .unwrap();
    let proposer = DelegatedProposer::new(Box::new(worker));
    let mut page = contact_page();
    let mut fields = page.extract_fields().unwrap();

    proposer.propose(&mut fields, &mut page).unwrap();
    assert_eq!(fields[3].value, "+44 20 7946 0000");
    assert_eq!(proposer.name(), "delegated");
}
