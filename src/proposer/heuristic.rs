use crate::error::AutofillError;
use crate::field::field_model::{FieldDescriptor, InputKind};
use crate::page::context::PageContext;
use crate::proposer::ValueProposer;

// ============================================================================
// Canned values
// ============================================================================

pub const EMAIL_VALUE: &str = "john.doe@example.com";
pub const FIRST_NAME_VALUE: &str = "John";
pub const LAST_NAME_VALUE: &str = "Doe";
pub const FULL_NAME_VALUE: &str = "John Doe";
pub const PHONE_VALUE: &str = "+1 (555) 123-4567";
pub const ADDRESS_VALUE: &str = "123 Main Street";
pub const CITY_VALUE: &str = "San Francisco";
pub const STATE_VALUE: &str = "CA";
pub const ZIP_VALUE: &str = "94105";
pub const COUNTRY_VALUE: &str = "United States";
pub const COMPANY_VALUE: &str = "Acme Corporation";
pub const JOB_TITLE_VALUE: &str = "Software Engineer";
pub const WEBSITE_VALUE: &str = "https://example.com";
pub const SUBJECT_VALUE: &str = "General Inquiry";
pub const MESSAGE_VALUE: &str =
    "Hello, I am interested in learning more about your services. Please get in touch at your convenience.";
pub const FEEDBACK_VALUE: &str = "Great experience overall, the process was quick and easy.";
pub const DEFAULT_VALUE: &str = "Sample input";

struct Rule {
    keywords: &'static [&'static str],
    value: &'static str,
}

/// Checked in order; the first rule with a keyword in any of the field's
/// texts wins.
const RULES: &[Rule] = &[
    Rule { keywords: &["email", "e-mail"], value: EMAIL_VALUE },
    Rule { keywords: &["first"], value: FIRST_NAME_VALUE },
    Rule { keywords: &["last", "surname"], value: LAST_NAME_VALUE },
    Rule { keywords: &["name"], value: FULL_NAME_VALUE },
    Rule { keywords: &["phone", "mobile", "tel"], value: PHONE_VALUE },
    Rule { keywords: &["address", "street"], value: ADDRESS_VALUE },
    Rule { keywords: &["city", "town"], value: CITY_VALUE },
    Rule { keywords: &["state", "province", "region"], value: STATE_VALUE },
    Rule { keywords: &["zip", "postal", "postcode"], value: ZIP_VALUE },
    Rule { keywords: &["country"], value: COUNTRY_VALUE },
    Rule { keywords: &["company", "organization", "organisation", "employer"], value: COMPANY_VALUE },
    Rule { keywords: &["title", "job", "position", "role"], value: JOB_TITLE_VALUE },
    Rule { keywords: &["website", "url", "homepage"], value: WEBSITE_VALUE },
    Rule { keywords: &["subject"], value: SUBJECT_VALUE },
    Rule { keywords: &["message", "comment"], value: MESSAGE_VALUE },
    Rule { keywords: &["feedback"], value: FEEDBACK_VALUE },
];

/// Derive a value from the field's name, identifier, placeholder and label,
/// then from its kind, then the generic default.
pub fn propose_value(field: &FieldDescriptor) -> &'static str {
    let texts = [
        field.name.to_lowercase(),
        field.id.to_lowercase(),
        field.placeholder.to_lowercase(),
        field.label.to_lowercase(),
    ];

    for rule in RULES {
        let hit = rule
            .keywords
            .iter()
            .any(|k| texts.iter().any(|t| t.contains(k)));
        if hit {
            return rule.value;
        }
    }

    match field.kind {
        InputKind::Email => EMAIL_VALUE,
        InputKind::Tel => PHONE_VALUE,
        InputKind::Url => WEBSITE_VALUE,
        InputKind::TextArea => MESSAGE_VALUE,
        _ => DEFAULT_VALUE,
    }
}

/// Static keyword table; never touches the page or the network.
pub struct HeuristicProposer;

impl ValueProposer for HeuristicProposer {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn propose(
        &self,
        fields: &mut [FieldDescriptor],
        _page: &mut dyn PageContext,
    ) -> Result<(), AutofillError> {
        for field in fields.iter_mut() {
            field.value = propose_value(field).to_string();
        }
        Ok(())
    }
}
