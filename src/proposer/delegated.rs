use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::bridge::relay::{BridgeMessage, MessageBridge};
use crate::error::AutofillError;
use crate::field::field_model::FieldDescriptor;
use crate::page::context::PageContext;
use crate::page::sanitize::markup_fingerprint;
use crate::proposer::ValueProposer;
use crate::proposer::heuristic::propose_value;

/// Hands the sanitized page markup to the inference service and takes the
/// values it returns. Fields the service leaves out get the heuristic value.
pub struct DelegatedProposer {
    bridge: Box<dyn MessageBridge>,
}

impl DelegatedProposer {
    pub fn new(bridge: Box<dyn MessageBridge>) -> Self {
        Self { bridge }
    }
}

impl ValueProposer for DelegatedProposer {
    fn name(&self) -> &'static str {
        "delegated"
    }

    fn propose(
        &self,
        fields: &mut [FieldDescriptor],
        page: &mut dyn PageContext,
    ) -> Result<(), AutofillError> {
        let markup = page.capture_markup()?;
        debug!(markup_sha1 = %markup_fingerprint(&markup), bytes = markup.len(), "captured sanitized markup");

        let reply = self.bridge.send(BridgeMessage::fetch_data(markup))?;
        let values = values_from_data(&reply.data);
        if values.is_empty() {
            warn!("inference reply carried no field values, using heuristic values");
        }

        for field in fields.iter_mut() {
            field.value = match values.get(&field.id) {
                Some(v) => v.clone(),
                None => propose_value(field).to_string(),
            };
        }

        let unmatched = values
            .keys()
            .filter(|id| !fields.iter().any(|f| &f.id == *id))
            .count();
        if unmatched > 0 {
            debug!(unmatched, "ignoring values for fields not present on the page");
        }

        Ok(())
    }
}

/// Pull `identifier -> value` pairs out of a reply's `data`.
///
/// Accepts an array of `{id, value}` objects, an object with such an array
/// under `fields`, or a plain object mapping identifiers to values. Entries
/// without an identifier or with a null value are dropped.
pub fn values_from_data(data: &Value) -> HashMap<String, String> {
    match data {
        Value::Array(entries) => values_from_entries(entries),
        Value::Object(map) => match map.get("fields") {
            Some(Value::Array(entries)) => values_from_entries(entries),
            _ => map
                .iter()
                .filter_map(|(id, v)| scalar_to_string(v).map(|s| (id.clone(), s)))
                .collect(),
        },
        _ => HashMap::new(),
    }
}

fn values_from_entries(entries: &[Value]) -> HashMap<String, String> {
    entries
        .iter()
        .filter_map(|entry| {
            let id = entry.get("id")?.as_str()?;
            let value = scalar_to_string(entry.get("value")?)?;
            Some((id.to_string(), value))
        })
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
