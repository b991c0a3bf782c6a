use std::sync::mpsc::{self, Receiver, Sender};

use scraper::{ElementRef, Html, Node as HtmlNode};
use serde::{Deserialize, Serialize};

/// Tags the extractor and filler treat as form controls.
pub const FORM_CONTROL_TAGS: [&str; 3] = ["input", "textarea", "select"];

const VOID_TAGS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

const RAW_TEXT_TAGS: [&str; 2] = ["script", "style"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Focus,
    Input,
    Change,
}

/// An event as seen by one listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    pub kind: EventKind,
    pub target: NodeId,
    pub current_target: NodeId,
    pub bubbles: bool,
}

#[derive(Debug)]
struct Listener {
    node: NodeId,
    kind: EventKind,
    sender: Sender<DomEvent>,
}

#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    attrs: Vec<(String, String)>,
    // Live `value` property once something assigned it.
    dirty_value: Option<String>,
}

#[derive(Debug, Clone)]
enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// Serialization switches shared by `outer_html` and the sanitizer.
#[derive(Debug, Clone, Default)]
pub struct MarkupOptions<'a> {
    /// Elements (with their subtree) left out of the output.
    pub skip_tags: &'a [&'a str],
    /// Attributes left out of every element.
    pub drop_attributes: &'a [&'a str],
    /// Write live values instead of the parsed attributes.
    pub reflect_values: bool,
}

/// In-memory page: element and text nodes in an arena rooted at `<html>`.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    focused: Option<NodeId>,
    listeners: Vec<Listener>,
}

impl Document {
    /// Parse an HTML document. Comments and the doctype are dropped.
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut document = Document {
            nodes: Vec::new(),
            root: NodeId(0),
            focused: None,
            listeners: Vec::new(),
        };
        document.root = document.import_element(parsed.root_element(), None);
        document
    }

    fn import_element(&mut self, element: ElementRef<'_>, parent: Option<NodeId>) -> NodeId {
        let value = element.value();
        let mut attrs: Vec<(String, String)> = value
            .attrs()
            .map(|(name, val)| (name.to_ascii_lowercase(), val.to_string()))
            .collect();
        // Parser attribute order is not stable; serialized markup must be.
        attrs.sort();
        let data = ElementData {
            tag: value.name().to_ascii_lowercase(),
            attrs,
            dirty_value: None,
        };
        let id = self.push(parent, NodeData::Element(data));

        for child in element.children() {
            match child.value() {
                HtmlNode::Text(text) => {
                    let content: &str = text;
                    self.push(Some(id), NodeData::Text(content.to_string()));
                }
                HtmlNode::Element(_) => {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        self.import_element(child_element, Some(id));
                    }
                }
                _ => {}
            }
        }

        id
    }

    fn push(&mut self, parent: Option<NodeId>, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            data,
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        id
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Element(e) => Some(e),
            NodeData::Text(_) => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(node.0)?.data {
            NodeData::Element(e) => Some(e),
            NodeData::Text(_) => None,
        }
    }

    // ---- Tree navigation ----

    /// The `<html>` element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn element_children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(node)
            .iter()
            .copied()
            .filter(move |c| self.is_element(*c))
    }

    /// Parent, grandparent, ... up to the root.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |n| self.parent(*n))
    }

    /// Elements of the subtree in document (preorder) order, `node` included.
    pub fn descendants(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![node];
        std::iter::from_fn(move || {
            let current = stack.pop()?;
            stack.extend(self.children(current).iter().rev().copied());
            Some(current)
        })
        .filter(move |n| self.is_element(*n))
    }

    /// Every element of the document in document order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(self.root)
    }

    /// First element in document order whose `id` attribute equals `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements().find(|n| self.attr(*n, "id") == Some(id))
    }

    pub fn count_id(&self, id: &str) -> usize {
        self.elements()
            .filter(|n| self.attr(*n, "id") == Some(id))
            .count()
    }

    pub fn is_form_control(&self, node: NodeId) -> bool {
        self.tag(node)
            .is_some_and(|t| FORM_CONTROL_TAGS.contains(&t))
    }

    /// Concatenated text of every text node below `node`.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let Some(n) = self.nodes.get(current.0) else {
                continue;
            };
            match &n.data {
                NodeData::Text(t) => out.push_str(t),
                NodeData::Element(_) => stack.extend(n.children.iter().rev().copied()),
            }
        }
        out
    }

    // ---- Value property ----

    fn options(&self, select: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(select)
            .filter(move |n| self.tag(*n) == Some("option"))
    }

    fn option_value(&self, option: NodeId) -> String {
        match self.attr(option, "value") {
            Some(v) => v.to_string(),
            None => collapse_whitespace(&self.text_content(option)),
        }
    }

    /// Current value of a form control, as the DOM `value` property reads it.
    pub fn value(&self, node: NodeId) -> String {
        let Some(element) = self.element(node) else {
            return String::new();
        };
        if let Some(v) = &element.dirty_value {
            return v.clone();
        }
        match element.tag.as_str() {
            "textarea" => self.text_content(node),
            "select" => self
                .options(node)
                .find(|o| self.has_attr(*o, "selected"))
                .or_else(|| self.options(node).next())
                .map(|o| self.option_value(o))
                .unwrap_or_default(),
            _ => self.attr(node, "value").unwrap_or_default().to_string(),
        }
    }

    /// Native value setter: writes the value slot directly.
    ///
    /// A select only takes values one of its options carries; anything else
    /// leaves it with no selection (value "").
    pub fn set_value(&mut self, node: NodeId, value: &str) {
        let stored = if self.tag(node) == Some("select") {
            let matches = self.options(node).any(|o| self.option_value(o) == value);
            if matches { value.to_string() } else { String::new() }
        } else {
            value.to_string()
        };
        if let Some(element) = self.element_mut(node) {
            element.dirty_value = Some(stored);
        }
    }

    // ---- Focus and events ----

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn focus(&mut self, node: NodeId) {
        if !self.is_element(node) || self.focused == Some(node) {
            return;
        }
        self.focused = Some(node);
        self.dispatch(node, EventKind::Focus, false);
    }

    /// Subscribe to events of `kind` arriving at `node` (as target or, for
    /// bubbling events, as an ancestor of the target).
    pub fn listen(&mut self, node: NodeId, kind: EventKind) -> Receiver<DomEvent> {
        let (sender, receiver) = mpsc::channel();
        self.listeners.push(Listener { node, kind, sender });
        receiver
    }

    /// Deliver an event to the target's listeners, then up the ancestor chain
    /// when it bubbles. Returns the number of deliveries.
    pub fn dispatch(&self, target: NodeId, kind: EventKind, bubbles: bool) -> usize {
        let mut path = vec![target];
        if bubbles {
            path.extend(self.ancestors(target));
        }

        let mut delivered = 0;
        for current in path {
            for listener in self
                .listeners
                .iter()
                .filter(|l| l.node == current && l.kind == kind)
            {
                let event = DomEvent {
                    kind,
                    target,
                    current_target: current,
                    bubbles,
                };
                // A dropped receiver just stops listening.
                if listener.sender.send(event).is_ok() {
                    delivered += 1;
                }
            }
        }
        delivered
    }

    // ---- Serialization ----

    /// Markup of `node` from its parsed attributes (live values are not written).
    pub fn outer_html(&self, node: NodeId) -> String {
        self.markup(node, &MarkupOptions::default())
    }

    /// Markup of `node` with live values written into `value` attributes,
    /// textarea content and `selected` options.
    pub fn outer_html_with_values(&self, node: NodeId) -> String {
        self.markup(
            node,
            &MarkupOptions {
                reflect_values: true,
                ..MarkupOptions::default()
            },
        )
    }

    pub fn markup(&self, node: NodeId, options: &MarkupOptions<'_>) -> String {
        let mut out = String::new();
        self.write_node(node, options, None, false, &mut out);
        out
    }

    fn write_node(
        &self,
        node: NodeId,
        options: &MarkupOptions<'_>,
        selected: Option<&str>,
        raw_text: bool,
        out: &mut String,
    ) {
        let Some(n) = self.nodes.get(node.0) else {
            return;
        };
        let element = match &n.data {
            NodeData::Text(t) => {
                if raw_text {
                    out.push_str(t);
                } else {
                    out.push_str(&escape_text(t));
                }
                return;
            }
            NodeData::Element(e) => e,
        };

        if options.skip_tags.contains(&element.tag.as_str()) {
            return;
        }

        let reflected = if options.reflect_values {
            element.dirty_value.as_deref()
        } else {
            None
        };

        out.push('<');
        out.push_str(&element.tag);
        for (name, value) in &element.attrs {
            if options.drop_attributes.contains(&name.as_str()) {
                continue;
            }
            if reflected.is_some() && element.tag == "input" && name == "value" {
                continue;
            }
            if options.reflect_values && element.tag == "option" && name == "selected" && selected.is_some() {
                continue;
            }
            push_attribute(out, name, value);
        }
        if element.tag == "input" {
            if let Some(v) = reflected {
                push_attribute(out, "value", v);
            }
        }
        if element.tag == "option" && options.reflect_values {
            if let Some(sel) = selected {
                if self.option_value(node) == sel {
                    push_attribute(out, "selected", "");
                }
            }
        }
        out.push('>');

        if VOID_TAGS.contains(&element.tag.as_str()) {
            return;
        }

        if element.tag == "textarea" {
            if let Some(v) = reflected {
                out.push_str(&escape_text(v));
                out.push_str("</textarea>");
                return;
            }
        }

        let child_selected = if element.tag == "select" { reflected } else { selected };
        let child_raw = RAW_TEXT_TAGS.contains(&element.tag.as_str());
        for child in &n.children {
            self.write_node(*child, options, child_selected, child_raw, out);
        }

        out.push_str("</");
        out.push_str(&element.tag);
        out.push('>');
    }
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_attribute(value));
    out.push('"');
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Trim and squeeze runs of whitespace into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

