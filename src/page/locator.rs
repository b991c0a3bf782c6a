use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AutofillError;
use crate::page::document::{Document, NodeId};

/// One `tag[index]` hop of a structural path (index is 1-based among
/// same-tag element siblings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub tag: String,
    pub index: usize,
}

/// Structural address of an element: an optional id anchor followed by
/// `tag[index]` steps.
///
/// Rendered XPath-style, e.g. `/html[1]/body[1]/form[1]/input[2]` or
/// `//*[@id="signup"]/div[1]/input[1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locator {
    pub anchor: Option<String>,
    pub steps: Vec<Step>,
}

impl Locator {
    /// Walk from `node` towards the root, indexing same-tag siblings, and stop
    /// at the first element whose id is unique in the document and can be
    /// written inside the quoted anchor.
    pub fn build(doc: &Document, node: NodeId) -> Locator {
        let mut steps = Vec::new();
        let mut anchor = None;
        let mut current = node;

        loop {
            if let Some(id) = doc.attr(current, "id").filter(|id| anchorable(id)) {
                if doc.count_id(id) == 1 {
                    anchor = Some(id.to_string());
                    break;
                }
            }

            let tag = doc.tag(current).unwrap_or_default().to_string();
            let index = match doc.parent(current) {
                Some(parent) => {
                    doc.element_children(parent)
                        .filter(|c| doc.tag(*c) == Some(tag.as_str()))
                        .position(|c| c == current)
                        .unwrap_or(0)
                        + 1
                }
                None => 1,
            };
            steps.push(Step { tag, index });

            match doc.parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }

        steps.reverse();
        Locator { anchor, steps }
    }

    /// Re-find the element. Id anchors resolve to the first element carrying
    /// the id.
    pub fn resolve(&self, doc: &Document) -> Option<NodeId> {
        let (mut current, rest) = match &self.anchor {
            Some(id) => (doc.get_element_by_id(id)?, self.steps.as_slice()),
            None => {
                let (first, rest) = self.steps.split_first()?;
                let root = doc.root();
                if doc.tag(root) != Some(first.tag.as_str()) || first.index != 1 {
                    return None;
                }
                (root, rest)
            }
        };

        for step in rest {
            let nth = step.index.checked_sub(1)?;
            current = doc
                .element_children(current)
                .filter(|c| doc.tag(*c) == Some(step.tag.as_str()))
                .nth(nth)?;
        }

        Some(current)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = &self.anchor {
            write!(f, "//*[@id=\"{}\"]", id)?;
        }
        for step in &self.steps {
            write!(f, "/{}[{}]", step.tag, step.index)?;
        }
        Ok(())
    }
}

impl FromStr for Locator {
    type Err = AutofillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AutofillError::InvalidLocator(s.to_string());

        let (anchor, path) = match s.strip_prefix("//*[@id=\"") {
            Some(rest) => {
                let end = rest.find("\"]").ok_or_else(invalid)?;
                (Some(rest[..end].to_string()), &rest[end + 2..])
            }
            None => (None, s),
        };

        let steps = if path.is_empty() {
            Vec::new()
        } else {
            path.strip_prefix('/')
                .ok_or_else(invalid)?
                .split('/')
                .map(|segment| parse_step(segment).ok_or_else(invalid))
                .collect::<Result<Vec<_>, _>>()?
        };

        if anchor.is_none() && steps.is_empty() {
            return Err(invalid());
        }

        Ok(Locator { anchor, steps })
    }
}

/// Ids that can sit between the anchor's double quotes.
fn anchorable(id: &str) -> bool {
    !id.is_empty() && !id.contains('"')
}

fn parse_step(segment: &str) -> Option<Step> {
    let open = segment.find('[')?;
    let tag = &segment[..open];
    if tag.is_empty() {
        return None;
    }
    let index = segment[open + 1..]
        .strip_suffix(']')?
        .parse::<usize>()
        .ok()
        .filter(|i| *i >= 1)?;
    Some(Step {
        tag: tag.to_string(),
        index,
    })
}

impl TryFrom<String> for Locator {
    type Error = AutofillError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locator> for String {
    fn from(locator: Locator) -> Self {
        locator.to_string()
    }
}
