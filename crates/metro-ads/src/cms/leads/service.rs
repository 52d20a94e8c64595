use std::sync::Arc;

use super::domain::{
    ContactRecord, ContactSubmission, LeadDraft, LeadRecord, LeadSubmission,
};
use super::notify::LeadNotifier;
use super::repository::{ContactRepository, LeadRepository};
use crate::cms::masters::{
    ProductRecord, ProductRepository, RepositoryError, StationRecord, StationRepository,
};

/// Result of a successful submission. The station and product carried here
/// feed the detached notification; the record alone determines the response.
pub struct LeadSubmissionOutcome {
    pub record: LeadRecord,
    pub station: Option<StationRecord>,
    pub product: Option<ProductRecord>,
}

/// Validates, persists, and opportunistically notifies. Persistence is the
/// only step whose failure reaches the caller.
pub struct LeadIntakeService<L, S, P> {
    leads: Arc<L>,
    stations: Arc<S>,
    products: Arc<P>,
    notifier: Option<Arc<LeadNotifier>>,
}

impl<L, S, P> LeadIntakeService<L, S, P>
where
    L: LeadRepository + 'static,
    S: StationRepository + 'static,
    P: ProductRepository + 'static,
{
    pub fn new(leads: Arc<L>, stations: Arc<S>, products: Arc<P>) -> Self {
        Self {
            leads,
            stations,
            products,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<LeadNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn submit(
        &self,
        submission: LeadSubmission,
    ) -> Result<LeadSubmissionOutcome, LeadServiceError> {
        require_contact_fields(&submission)?;

        // A dangling station id is the one lookup failure that changes the
        // caller-visible outcome.
        let station = match submission.station_id {
            Some(id) => Some(
                self.stations
                    .fetch(id)?
                    .ok_or(LeadServiceError::StationNotFound(id))?,
            ),
            None => None,
        };

        // An unknown product, or one not offered at the station, degrades to
        // "no product snapshot" rather than failing the inquiry.
        let product = match (&station, submission.product_id) {
            (Some(record), Some(product_id)) if record.product_ids.contains(&product_id) => {
                self.products.fetch(product_id)?
            }
            _ => None,
        };

        let draft = LeadDraft::from_submission(submission, station.as_ref(), product.as_ref());
        let record = self.leads.insert(draft)?;

        Ok(LeadSubmissionOutcome {
            record,
            station,
            product,
        })
    }

    /// Launch the media-kit notification without tying its outcome to the
    /// already-sent response. The spawned task is not supervised; its only
    /// trace is a log line.
    pub fn notify_detached(&self, outcome: LeadSubmissionOutcome) {
        let Some(notifier) = self.notifier.clone() else {
            tracing::debug!(
                lead = outcome.record.id,
                "mail delivery disabled, skipping notification"
            );
            return;
        };

        tokio::spawn(async move {
            let lead_id = outcome.record.id;
            let delivered = tokio::task::spawn_blocking(move || {
                notifier.deliver(
                    &outcome.record,
                    outcome.station.as_ref(),
                    outcome.product.as_ref(),
                )
            })
            .await;

            match delivered {
                Ok(Ok(())) => {
                    tracing::info!(lead = lead_id, "media kit notification delivered");
                }
                Ok(Err(err)) => {
                    tracing::warn!(lead = lead_id, error = %err, "media kit notification failed");
                }
                Err(err) => {
                    tracing::warn!(lead = lead_id, error = %err, "notification task aborted");
                }
            }
        });
    }

    pub fn lead(&self, id: u64) -> Result<LeadRecord, LeadServiceError> {
        Ok(self.leads.fetch(id)?.ok_or(RepositoryError::NotFound)?)
    }

    pub fn leads(&self) -> Result<Vec<LeadRecord>, LeadServiceError> {
        Ok(self.leads.list()?)
    }

    pub fn delete_lead(&self, id: u64) -> Result<(), LeadServiceError> {
        Ok(self.leads.remove(id)?)
    }
}

fn require_contact_fields(submission: &LeadSubmission) -> Result<(), LeadServiceError> {
    for (value, field) in [
        (&submission.name, "name"),
        (&submission.phone, "phone"),
        (&submission.email, "email"),
    ] {
        if value.trim().is_empty() {
            return Err(LeadServiceError::Validation(format!(
                "{field} is required"
            )));
        }
    }
    Ok(())
}

/// Error raised by the lead intake service.
#[derive(Debug, thiserror::Error)]
pub enum LeadServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("station {0} not found")]
    StationNotFound(u64),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// CRUD facade for contact-form messages.
pub struct ContactService<C> {
    contacts: Arc<C>,
}

impl<C> ContactService<C>
where
    C: ContactRepository + 'static,
{
    pub fn new(contacts: Arc<C>) -> Self {
        Self { contacts }
    }

    pub fn submit(&self, submission: ContactSubmission) -> Result<ContactRecord, LeadServiceError> {
        for (value, field) in [
            (&submission.name, "name"),
            (&submission.phone, "phone"),
            (&submission.email, "email"),
        ] {
            if value.trim().is_empty() {
                return Err(LeadServiceError::Validation(format!(
                    "{field} is required"
                )));
            }
        }
        let record = self.contacts.insert(submission)?;
        tracing::info!(contact = record.id, "contact message recorded");
        Ok(record)
    }

    pub fn list(&self) -> Result<Vec<ContactRecord>, LeadServiceError> {
        Ok(self.contacts.list()?)
    }

    pub fn delete(&self, id: u64) -> Result<(), LeadServiceError> {
        Ok(self.contacts.remove(id)?)
    }
}
