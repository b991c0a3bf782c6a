use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::page::document::{Document, EventKind, NodeId};
use crate::page::locator::Locator;

/// Page-side acknowledgement of a fill request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillOutcome {
    Filled,
    /// Element absent (or not a form control); nothing was touched.
    Skipped,
}

/// Write `value` into a form control.
///
/// The element is resolved by locator first, then by the first element with
/// the identifier as id; a candidate that is not a form control is passed
/// over. It is focused, its value slot assigned through the native setter,
/// and bubbling `input` and `change` events are dispatched so listeners on
/// the page recompute their own state.
pub fn fill_field(doc: &mut Document, id: &str, locator: Option<&Locator>, value: &str) -> FillOutcome {
    let view: &Document = doc;
    let is_control = |n: &NodeId| view.is_form_control(*n);
    let target = locator
        .and_then(|l| l.resolve(view))
        .filter(is_control)
        .or_else(|| view.get_element_by_id(id).filter(is_control));

    let Some(node) = target else {
        debug!(field = id, "fill target not found, skipping");
        return FillOutcome::Skipped;
    };

    doc.focus(node);
    doc.set_value(node, value);
    doc.dispatch(node, EventKind::Input, true);
    doc.dispatch(node, EventKind::Change, true);

    debug!(field = id, "filled");
    FillOutcome::Filled
}
