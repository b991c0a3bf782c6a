use crate::error::AutofillError;
use crate::field::field_model::FieldDescriptor;
use crate::panel::panel_model::PanelState;

/// Longest value shown in full; longer ones are cut and end in "...".
pub const MAX_VALUE_PREVIEW: usize = 100;

// ============================================================================
// Console view of the panel
// ============================================================================

/// Render the panel for a terminal.
///
/// ```text
/// === Rexy (1/2 filled) ===
/// [Fill All] [Scan Page] [Revert All]
///
/// * Email Address [Email] (Filled)
///     john.doe@example.com
/// * Resume [File] (not fillable)
///     Sample input
/// ```
pub fn render_panel(state: &PanelState) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== Rexy ({}/{} filled) ===\n",
        state.filled_count(),
        state.fields.len()
    ));

    let fill_caption = if state.all_filled { "Unfill All" } else { "Fill All" };
    let scan_caption = if state.is_scanning() { "Scanning..." } else { "Scan Page" };
    out.push_str(&format!("[{}] [{}]", fill_caption, scan_caption));
    if state.filled_count() > 0 {
        out.push_str(" [Revert All]");
    }
    out.push('\n');

    if !state.autofill_enabled {
        out.push_str("Auto-fill is disabled\n");
    }
    out.push('\n');

    if state.fields.is_empty() {
        if state.is_scanning() {
            out.push_str("Scanning for input fields...\n");
        } else {
            out.push_str("No input fields detected on this page.\n");
        }
        return out;
    }

    for field in &state.fields {
        out.push_str(&render_field(field, state.is_filled(&field.id)));
    }

    out
}

fn render_field(field: &FieldDescriptor, filled: bool) -> String {
    let mut line = format!("* {} [{}]", field.display_label(), field.kind.badge());
    if filled {
        line.push_str(" (Filled)");
    }
    if !field.kind.is_fillable() {
        line.push_str(" (not fillable)");
    }
    line.push('\n');
    line.push_str(&format!("    {}\n", preview_value(&field.value)));
    line
}

/// Value as shown in the list: at most `MAX_VALUE_PREVIEW` characters.
pub fn preview_value(value: &str) -> String {
    if value.chars().count() > MAX_VALUE_PREVIEW {
        let cut: String = value.chars().take(MAX_VALUE_PREVIEW).collect();
        format!("{}...", cut)
    } else {
        value.to_string()
    }
}

/// Field list as pretty JSON, using the wire field names.
pub fn render_fields_json(fields: &[FieldDescriptor]) -> Result<String, AutofillError> {
    serde_json::to_string_pretty(fields).map_err(|source| AutofillError::JsonSerialize {
        context: "field list".into(),
        source,
    })
}
