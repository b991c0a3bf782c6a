use crate::error::AutofillError;
use crate::field::field_model::FieldDescriptor;
use crate::page::context::PageContext;

pub mod delegated;
pub mod heuristic;

/// Assigns a proposed value to every scanned field.
///
/// Implementations must not fail on missing field metadata; an error means
/// the strategy itself could not run (page or relay failure).
pub trait ValueProposer {
    fn name(&self) -> &'static str;

    fn propose(
        &self,
        fields: &mut [FieldDescriptor],
        page: &mut dyn PageContext,
    ) -> Result<(), AutofillError>;
}
