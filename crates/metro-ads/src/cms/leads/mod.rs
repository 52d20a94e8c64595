//! Lead capture: the public inquiry form, the contact-message box, and the
//! media-kit notification that follows a successful submission.

pub mod domain;
pub mod notify;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    BuyerType, ContactRecord, ContactSubmission, FamiliarityLevel, LeadDraft, LeadRecord,
    LeadSubmission, RequirementCategory,
};
pub use notify::LeadNotifier;
pub use repository::{ContactRepository, LeadRepository};
pub use router::{contact_router, lead_router};
pub use service::{ContactService, LeadIntakeService, LeadServiceError, LeadSubmissionOutcome};
