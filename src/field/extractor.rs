use std::collections::HashSet;

use tracing::debug;

use crate::field::field_model::{FieldDescriptor, InputKind};
use crate::page::document::{Document, NodeId, collapse_whitespace};
use crate::page::locator::Locator;

/// Scan the document for data-entry form controls.
///
/// Visits every `input`, `textarea` and `select` in document order and skips
/// hidden inputs and buttons. Identifiers are unique within the result:
/// elements without an id, and later elements repeating an id already used,
/// get `field-<index>` where `index` counts every visited control.
pub fn extract_fields(doc: &Document) -> Vec<FieldDescriptor> {
    let controls: Vec<NodeId> = doc.elements().filter(|n| doc.is_form_control(*n)).collect();
    let mut taken: HashSet<String> = HashSet::new();
    let mut fields = Vec::new();

    for (index, node) in controls.into_iter().enumerate() {
        let kind = input_kind(doc, node);
        if !kind.is_data_entry() {
            continue;
        }

        let kept_id = doc
            .attr(node, "id")
            .filter(|id| !id.is_empty() && taken.insert(id.to_string()));
        let id = match kept_id {
            Some(id) => id.to_string(),
            None => unique_identifier(&format!("field-{}", index), &mut taken),
        };

        fields.push(FieldDescriptor {
            id,
            kind,
            name: doc.attr(node, "name").unwrap_or_default().to_string(),
            placeholder: doc.attr(node, "placeholder").unwrap_or_default().to_string(),
            label: resolve_label(doc, node, kept_id),
            value: String::new(),
            locator: Some(Locator::build(doc, node)),
        });
    }

    debug!(count = fields.len(), "extracted form fields");
    fields
}

/// Kind of a form control element.
pub fn input_kind(doc: &Document, node: NodeId) -> InputKind {
    match doc.tag(node) {
        Some("textarea") => InputKind::TextArea,
        Some("select") if doc.has_attr(node, "multiple") => InputKind::MultiSelect,
        Some("select") => InputKind::Select,
        _ => InputKind::from_type_attr(doc.attr(node, "type").unwrap_or_default()),
    }
}

fn unique_identifier(base: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(base.to_string()) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// `label[for=id]` text first, then the enclosing `label` with the field's
/// own current value removed. Only a kept id is looked up, so a later element
/// repeating an id never takes the first one's label.
fn resolve_label(doc: &Document, node: NodeId, kept_id: Option<&str>) -> String {
    if let Some(id) = kept_id {
        let explicit = doc
            .elements()
            .find(|n| doc.tag(*n) == Some("label") && doc.attr(*n, "for") == Some(id));
        if let Some(label) = explicit {
            let text = collapse_whitespace(&doc.text_content(label));
            if !text.is_empty() {
                return text;
            }
        }
    }

    if let Some(label) = doc.ancestors(node).find(|n| doc.tag(*n) == Some("label")) {
        let text = doc.text_content(label);
        let value = doc.value(node);
        let stripped = if value.is_empty() {
            text
        } else {
            text.replacen(&value, "", 1)
        };
        return collapse_whitespace(&stripped);
    }

    String::new()
}

