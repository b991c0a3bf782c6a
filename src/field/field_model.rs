use serde::{Deserialize, Serialize};

use crate::page::locator::Locator;

// ============================================================================
// Input kinds
// ============================================================================

/// Kind of a form control: the lower-cased `type` attribute for `<input>`,
/// or the element itself for `<textarea>` / `<select>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InputKind {
    Text,
    TextArea,
    Email,
    Tel,
    Password,
    Number,
    Date,
    Time,
    Url,
    Select,
    MultiSelect,
    Radio,
    Checkbox,
    File,
    Range,
    Color,
    Hidden,
    Submit,
    Button,
    Other(String),
}

impl InputKind {
    /// Map an `<input type=...>` value. Missing or empty means text.
    pub fn from_type_attr(value: &str) -> InputKind {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "text" => InputKind::Text,
            "textarea" => InputKind::TextArea,
            "email" => InputKind::Email,
            "tel" => InputKind::Tel,
            "password" => InputKind::Password,
            "number" => InputKind::Number,
            "date" => InputKind::Date,
            "time" => InputKind::Time,
            "url" => InputKind::Url,
            "select" | "select-one" => InputKind::Select,
            "multiselect" | "select-multiple" => InputKind::MultiSelect,
            "radio" => InputKind::Radio,
            "checkbox" => InputKind::Checkbox,
            "file" => InputKind::File,
            "range" => InputKind::Range,
            "color" => InputKind::Color,
            "hidden" => InputKind::Hidden,
            "submit" => InputKind::Submit,
            "button" => InputKind::Button,
            other => InputKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            InputKind::Text => "text",
            InputKind::TextArea => "textarea",
            InputKind::Email => "email",
            InputKind::Tel => "tel",
            InputKind::Password => "password",
            InputKind::Number => "number",
            InputKind::Date => "date",
            InputKind::Time => "time",
            InputKind::Url => "url",
            InputKind::Select => "select",
            InputKind::MultiSelect => "multiselect",
            InputKind::Radio => "radio",
            InputKind::Checkbox => "checkbox",
            InputKind::File => "file",
            InputKind::Range => "range",
            InputKind::Color => "color",
            InputKind::Hidden => "hidden",
            InputKind::Submit => "submit",
            InputKind::Button => "button",
            InputKind::Other(s) => s,
        }
    }

    /// Badge text shown next to a field in the panel.
    pub fn badge(&self) -> &'static str {
        match self {
            InputKind::Text => "Text",
            InputKind::TextArea => "Text Area",
            InputKind::Email => "Email",
            InputKind::Tel => "Phone",
            InputKind::Password => "Password",
            InputKind::Number => "Number",
            InputKind::Date => "Date",
            InputKind::Time => "Time",
            InputKind::Url => "URL",
            InputKind::Select => "Dropdown",
            InputKind::MultiSelect => "Multi-Select",
            InputKind::Radio => "Radio",
            InputKind::Checkbox => "Checkbox",
            InputKind::File => "File",
            InputKind::Range => "Range",
            InputKind::Color => "Color",
            _ => "Input",
        }
    }

    /// Hidden inputs and buttons carry no user data and are never scanned.
    pub fn is_data_entry(&self) -> bool {
        !matches!(self, InputKind::Hidden | InputKind::Submit | InputKind::Button)
    }

    /// File inputs cannot take a scripted value.
    pub fn is_fillable(&self) -> bool {
        !matches!(self, InputKind::File)
    }
}

impl From<String> for InputKind {
    fn from(value: String) -> Self {
        InputKind::from_type_attr(&value)
    }
}

impl From<InputKind> for String {
    fn from(kind: InputKind) -> Self {
        kind.as_str().to_string()
    }
}

// ============================================================================
// Field descriptor
// ============================================================================

/// One scanned form control and the value proposed for it.
///
/// Serialized with the field names the page side and the inference service
/// use (`type`, `xpath`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InputKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "xpath", default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<Locator>,
}

impl FieldDescriptor {
    /// Label for display: label, else name, else identifier.
    pub fn display_label(&self) -> &str {
        [&self.label, &self.name, &self.id]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or("Unnamed Field")
    }
}
