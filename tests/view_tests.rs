use rexy::page::document::Document;
use rexy::page::sanitize::{markup_fingerprint, sanitized_markup};
use rexy::panel::panel::Panel;
use rexy::panel::panel_model::{PanelState, PanelStatus};
use rexy::panel::view::{MAX_VALUE_PREVIEW, preview_value, render_fields_json, render_panel};

mod common;

use crate::common::pages::{CONTACT_FORM, contact_page};

// ============================================================================
// Panel rendering
// ============================================================================

#[test]
fn empty_idle_panel_says_nothing_detected() {
    let out = render_panel(&PanelState::default());
    assert!(out.starts_with("=== Rexy (0/0 filled) ===\n"));
    assert!(out.contains("[Fill All] [Scan Page]\n"));
    assert!(!out.contains("[Revert All]"));
    assert!(out.contains("No input fields detected on this page."));
}

#[test]
fn scanning_panel_shows_progress() {
    let mut state = PanelState::default();
    state.status = PanelStatus::Scanning;

    let out = render_panel(&state);
    assert!(out.contains("[Scanning...]"));
    assert!(out.contains("Scanning for input fields..."));
}

#[test]
fn scanned_panel_lists_fields_with_badges() {
    let mut page = contact_page();
    let mut panel = Panel::with_heuristic();
    panel.scan(&mut page).unwrap();

    let out = render_panel(panel.state());
    assert!(out.contains("=== Rexy (0/7 filled) ==="));
    assert!(out.contains("* First Name [Text]\n    John\n"));
    assert!(out.contains("* Work email [Text]\n    john.doe@example.com\n"));
    assert!(out.contains("* Phone [Phone]"));
    assert!(out.contains("* topic [Dropdown]"));
    assert!(out.contains("* body [Text Area]"));
    assert!(out.contains("* attachment [File] (not fillable)"));
}

#[test]
fn filled_fields_are_marked_and_revert_appears() {
    let mut page = contact_page();
    let mut panel = Panel::with_heuristic();
    panel.scan(&mut page).unwrap();
    panel.fill_one(&mut page, "phone").unwrap();

    let out = render_panel(panel.state());
    assert!(out.contains("=== Rexy (1/7 filled) ==="));
    assert!(out.contains("* Phone [Phone] (Filled)"));
    assert!(out.contains("[Fill All] [Scan Page] [Revert All]"));
}

#[test]
fn all_filled_swaps_the_fill_caption() {
    let mut page = rexy::page::local::LocalPage::from_html("<input id='a' name='city'>");
    let mut panel = Panel::with_heuristic();
    panel.scan(&mut page).unwrap();
    panel.fill_all(&mut page);

    let out = render_panel(panel.state());
    assert!(out.contains("[Unfill All]"));
}

#[test]
fn disabled_autofill_is_shown() {
    let panel = Panel::with_heuristic().with_autofill(false);
    assert!(render_panel(panel.state()).contains("Auto-fill is disabled"));
}

#[test]
fn long_values_are_cut_in_preview() {
    let long = "x".repeat(MAX_VALUE_PREVIEW + 20);
    let preview = preview_value(&long);
    assert_eq!(preview.len(), MAX_VALUE_PREVIEW + 3);
    assert!(preview.ends_with("..."));

    let exact = "y".repeat(MAX_VALUE_PREVIEW);
    assert_eq!(preview_value(&exact), exact);
}

#[test]
fn fields_json_uses_wire_names() {
    let mut page = contact_page();
    let mut panel = Panel::with_heuristic();
    panel.scan(&mut page).unwrap();

    let json: serde_json::Value = serde_json::from_str(&render_fields_json(panel.fields()).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 7);
    assert_eq!(json[3]["type"], "tel");
    assert_eq!(json[3]["value"], "+1 (555) 123-4567");
}

// ============================================================================
// Sanitized markup
// ============================================================================

#[test]
fn sanitized_markup_drops_noise_but_keeps_form() {
    let doc = Document::parse(CONTACT_FORM);
    let markup = sanitized_markup(&doc);

    for gone in ["<script", "<style", "<link", "<iframe", "<svg", "<path", "class=", "style="] {
        assert!(!markup.contains(gone), "{} should be stripped", gone);
    }
    assert!(markup.contains("<form action=\"/contact\" id=\"contact\" method=\"post\">"));
    assert!(markup.contains("<label for=\"first_name\">First Name</label>"));
    assert!(markup.contains("<textarea id=\"body\" name=\"body\"></textarea>"));
    assert!(markup.contains("<title>Contact us</title>"));
}

#[test]
fn sanitizing_leaves_the_document_intact() {
    let doc = Document::parse(CONTACT_FORM);
    sanitized_markup(&doc);
    assert!(doc.outer_html(doc.root()).contains("<script>"));
}

#[test]
fn sanitized_markup_ignores_filled_values() {
    let mut page = contact_page();
    let before = sanitized_markup(page.document());
    rexy::field::filler::fill_field(page.document_mut(), "first_name", None, "John");
    assert_eq!(sanitized_markup(page.document()), before);
}

#[test]
fn fingerprint_is_stable_sha1_hex() {
    let a = markup_fingerprint("<form></form>");
    assert_eq!(a.len(), 40);
    assert_eq!(a, markup_fingerprint("<form></form>"));
    assert_ne!(a, markup_fingerprint("<form> </form>"));
    assert_eq!(markup_fingerprint(""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
}
