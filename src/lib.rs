pub mod bridge;
pub mod browser;
pub mod cli;
pub mod error;
pub mod field;
pub mod page;
pub mod panel;
pub mod proposer;
pub mod trace;

pub use error::AutofillError;
pub use field::field_model::{FieldDescriptor, InputKind};
pub use page::context::PageContext;
pub use panel::panel::Panel;
