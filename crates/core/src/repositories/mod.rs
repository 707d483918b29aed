//! Resource services.
//!
//! One service per resource family. Each holds a [`SharedDatabase`] handle, takes the lock for
//! the duration of one operation, and returns domain records for the API layer to present.

pub mod appointments;
pub mod attachments;
pub mod cases;
pub mod patients;
pub mod procedures;
pub mod teams;

pub use appointments::AppointmentService;
pub use attachments::AttachmentService;
pub use cases::{CaseIncludes, CaseService};
pub use patients::PatientService;
pub use procedures::ProcedureService;
pub use teams::TeamService;
