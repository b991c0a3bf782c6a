use rexy::field::extractor::extract_fields;
use rexy::field::filler::{FillOutcome, fill_field};
use rexy::page::context::{PageContext, PageRequest, PageResponse};
use rexy::page::document::{Document, EventKind};
use rexy::page::local::LocalPage;
use rexy::page::locator::Locator;

mod common;

use crate::common::pages::{CONTACT_FORM, contact_page, fixture};

// ============================================================================
// fill_field on a document
// ============================================================================

#[test]
fn fill_sets_value_and_focus() {
    let mut doc = Document::parse(CONTACT_FORM);
    let outcome = fill_field(&mut doc, "first_name", None, "John");
    let node = doc.get_element_by_id("first_name").unwrap();

    assert_eq!(outcome, FillOutcome::Filled);
    assert_eq!(doc.value(node), "John");
    assert_eq!(doc.focused(), Some(node));
}

#[test]
fn fill_dispatches_bubbling_input_and_change() {
    let mut doc = Document::parse(CONTACT_FORM);
    let node = doc.get_element_by_id("last_name").unwrap();
    let form = doc.get_element_by_id("contact").unwrap();

    let on_input = doc.listen(node, EventKind::Input);
    let on_change = doc.listen(node, EventKind::Change);
    let form_input = doc.listen(form, EventKind::Input);
    let form_change = doc.listen(form, EventKind::Change);
    let on_focus = doc.listen(node, EventKind::Focus);

    fill_field(&mut doc, "last_name", None, "Doe");

    let input = on_input.try_recv().unwrap();
    assert_eq!(input.target, node);
    assert!(input.bubbles);
    assert!(on_change.try_recv().is_ok());
    assert!(on_focus.try_recv().is_ok());

    let bubbled = form_input.try_recv().unwrap();
    assert_eq!(bubbled.target, node);
    assert_eq!(bubbled.current_target, form);
    assert!(form_change.try_recv().is_ok());

    assert!(on_input.try_recv().is_err(), "exactly one input event");
}

#[test]
fn listeners_see_the_new_value_when_input_fires() {
    let mut doc = Document::parse(CONTACT_FORM);
    let node = doc.get_element_by_id("phone").unwrap();
    let on_input = doc.listen(node, EventKind::Input);

    fill_field(&mut doc, "phone", None, "+1 (555) 123-4567");

    let event = on_input.try_recv().unwrap();
    assert_eq!(doc.value(event.target), "+1 (555) 123-4567");
}

#[test]
fn missing_element_is_skipped_without_touching_the_page() {
    let mut doc = Document::parse(CONTACT_FORM);
    let before = doc.outer_html_with_values(doc.root());

    let outcome = fill_field(&mut doc, "does-not-exist", None, "x");

    assert_eq!(outcome, FillOutcome::Skipped);
    assert_eq!(doc.outer_html_with_values(doc.root()), before);
    assert_eq!(doc.focused(), None);
}

#[test]
fn non_control_element_is_skipped() {
    let mut doc = Document::parse(CONTACT_FORM);
    assert_eq!(fill_field(&mut doc, "contact", None, "x"), FillOutcome::Skipped);
}

#[test]
fn locator_reaches_elements_sharing_an_id() {
    let mut doc = Document::parse(&fixture("duplicate_ids.html"));
    let fields = extract_fields(&doc);
    let confirm = &fields[1];

    let outcome = fill_field(&mut doc, &confirm.id, confirm.locator.as_ref(), "john.doe@example.com");
    assert_eq!(outcome, FillOutcome::Filled);

    let target = confirm.locator.as_ref().unwrap().resolve(&doc).unwrap();
    let first = doc.get_element_by_id("email").unwrap();
    assert_eq!(doc.value(target), "john.doe@example.com");
    assert_eq!(doc.value(first), "", "the first element with the id is untouched");
}

#[test]
fn stale_locator_falls_back_to_id() {
    let mut doc = Document::parse(CONTACT_FORM);
    let stale: Locator = "/html[1]/body[1]/form[9]/input[1]".parse().unwrap();

    let outcome = fill_field(&mut doc, "first_name", Some(&stale), "John");
    assert_eq!(outcome, FillOutcome::Filled);
    assert_eq!(doc.value(doc.get_element_by_id("first_name").unwrap()), "John");
}

#[test]
fn locator_to_non_control_falls_back_to_id() {
    let mut doc = Document::parse("<form><div></div><input id='email'></form>");
    let drifted: Locator = "/html[1]/body[1]/form[1]/div[1]".parse().unwrap();
    assert!(drifted.resolve(&doc).is_some());

    let outcome = fill_field(&mut doc, "email", Some(&drifted), "a@b.c");
    assert_eq!(outcome, FillOutcome::Filled);
    assert_eq!(doc.value(doc.get_element_by_id("email").unwrap()), "a@b.c");
}

#[test]
fn textarea_value_is_written_as_content() {
    let mut doc = Document::parse(CONTACT_FORM);
    fill_field(&mut doc, "body", None, "Hello <team>");

    let node = doc.get_element_by_id("body").unwrap();
    assert_eq!(doc.value(node), "Hello <team>");
    assert!(doc.outer_html_with_values(node).contains(">Hello &lt;team&gt;</textarea>"));
}

#[test]
fn select_takes_matching_option_only() {
    let mut doc = Document::parse(CONTACT_FORM);
    let topic = doc.get_element_by_id("topic").unwrap();

    fill_field(&mut doc, "topic", None, "support");
    assert_eq!(doc.value(topic), "support");
    assert!(doc.outer_html_with_values(topic).contains("<option value=\"support\" selected=\"\">"));

    fill_field(&mut doc, "topic", None, "Sample input");
    assert_eq!(doc.value(topic), "", "no option carries that value");
}

#[test]
fn refill_overwrites_previous_value() {
    let mut doc = Document::parse(CONTACT_FORM);
    fill_field(&mut doc, "first_name", None, "John");
    fill_field(&mut doc, "first_name", None, "Jane");
    assert_eq!(doc.value(doc.get_element_by_id("first_name").unwrap()), "Jane");
}

// ============================================================================
// Document model
// ============================================================================

#[test]
fn parse_keeps_document_order() {
    let doc = Document::parse("<form><input id='a'><textarea id='b'></textarea></form>");
    let tags: Vec<&str> = doc.elements().filter_map(|n| doc.tag(n)).collect();
    assert_eq!(tags, ["html", "head", "body", "form", "input", "textarea"]);
}

#[test]
fn select_value_defaults_to_first_option() {
    let doc = Document::parse("<select id='s'><option>One</option><option value='2'>Two</option></select>");
    let select = doc.get_element_by_id("s").unwrap();
    assert_eq!(doc.value(select), "One");
}

#[test]
fn serialized_markup_escapes_text_and_attributes() {
    let doc = Document::parse("<p id='t' title='say \"hi\" &amp; go'>a&lt;b &amp; c&gt;</p>");
    let p = doc.get_element_by_id("t").unwrap();
    let html = doc.outer_html(p);

    assert!(html.contains(">a&lt;b &amp; c&gt;</p>"), "{}", html);
    assert!(html.contains("title=\"say &quot;hi&quot; &amp; go\""), "{}", html);
}

// ============================================================================
// Filling through the page boundary
// ============================================================================

#[test]
fn local_page_acknowledges_fill_requests() {
    let mut page = contact_page();
    let response = page
        .send(PageRequest::FillField {
            id: "phone".into(),
            locator: None,
            value: "555".into(),
        })
        .unwrap();

    assert_eq!(
        response,
        PageResponse::FillAck {
            id: "phone".into(),
            outcome: FillOutcome::Filled,
        }
    );
}

#[test]
fn fill_field_helper_uses_descriptor_value_and_locator() {
    let mut page = LocalPage::from_html(&fixture("duplicate_ids.html"));
    let mut fields = page.extract_fields().unwrap();
    fields[3].value = "San Francisco".into();

    assert_eq!(page.fill_field(&fields[3]).unwrap(), FillOutcome::Filled);

    let doc = page.document();
    let city = fields[3].locator.as_ref().unwrap().resolve(doc).unwrap();
    assert_eq!(doc.value(city), "San Francisco");
}

#[test]
fn page_requests_serialize_as_tagged_commands() {
    let request = PageRequest::FillField {
        id: "phone".into(),
        locator: Some("//*[@id=\"phone\"]".parse().unwrap()),
        value: "555".into(),
    };
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["cmd"], "fill_field");
    assert_eq!(json["xpath"], "//*[@id=\"phone\"]");

    let ack = PageResponse::FillAck {
        id: "phone".into(),
        outcome: FillOutcome::Skipped,
    };
    let json = serde_json::to_value(&ack).unwrap();
    assert_eq!(json["kind"], "fill_ack");
    assert_eq!(json["outcome"], "skipped");
}
