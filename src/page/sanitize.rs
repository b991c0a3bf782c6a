use crate::page::document::{Document, MarkupOptions};

/// Subtrees removed before page markup leaves the page.
pub const STRIPPED_TAGS: [&str; 7] = ["script", "link", "style", "iframe", "svg", "symbol", "path"];

/// Presentation attributes removed from every element.
pub const STRIPPED_ATTRIBUTES: [&str; 2] = ["class", "style"];

/// Serialize the document with scripts, styles, links, iframes and SVG
/// subtrees left out and every `class`/`style` attribute dropped. The
/// document itself is not modified.
pub fn sanitized_markup(doc: &Document) -> String {
    doc.markup(
        doc.root(),
        &MarkupOptions {
            skip_tags: &STRIPPED_TAGS,
            drop_attributes: &STRIPPED_ATTRIBUTES,
            reflect_values: false,
        },
    )
}

/// Stable fingerprint of a markup string, used in logs instead of the markup.
pub fn markup_fingerprint(markup: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(markup.as_bytes());
    format!("{:x}", hasher.finalize())
}
