use super::domain::{ContactRecord, ContactSubmission, LeadDraft, LeadRecord};
use crate::cms::masters::RepositoryError;

/// Storage abstraction for leads. Implementations assign ids and stamp the
/// creation time; there is deliberately no update method.
pub trait LeadRepository: Send + Sync {
    fn insert(&self, draft: LeadDraft) -> Result<LeadRecord, RepositoryError>;
    fn fetch(&self, id: u64) -> Result<Option<LeadRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<LeadRecord>, RepositoryError>;
    fn remove(&self, id: u64) -> Result<(), RepositoryError>;
}

/// Storage abstraction for contact-form messages.
pub trait ContactRepository: Send + Sync {
    fn insert(&self, submission: ContactSubmission) -> Result<ContactRecord, RepositoryError>;
    fn list(&self) -> Result<Vec<ContactRecord>, RepositoryError>;
    fn remove(&self, id: u64) -> Result<(), RepositoryError>;
}
