//! Domain types shared by the form, the controller and the host bindings.

mod cohort;
mod fields;
mod session;
mod timepoint;

pub use cohort::Cohort;
pub use fields::{Demographic, Facet, FieldId, ResponseVariable};
pub use session::{SessionHandle, SessionInfo};
pub use timepoint::Timepoint;
