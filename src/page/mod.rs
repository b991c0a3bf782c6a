pub mod context;
pub mod document;
pub mod local;
pub mod locator;
pub mod sanitize;
