//! Raw case data port trait.

use crate::domain::case_row::{CaseKind, CaseRow};
use crate::domain::error::CovidError;

pub trait CaseDataPort {
    /// All rows of the dataset for `kind`. A dataset that is not available
    /// upstream yields no rows rather than an error.
    fn fetch_rows(&self, kind: CaseKind) -> Result<Vec<CaseRow>, CovidError>;
}
