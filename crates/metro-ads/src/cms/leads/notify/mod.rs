//! Best-effort notification attached to lead submission: a PDF media kit
//! mailed to the requester plus a plain alert to the sales inbox. Runs after
//! the client response and never reports back to the caller.

pub mod mailer;
pub mod mediakit;

pub use mailer::{EmailAttachment, HttpMailClient, MailError, MailGateway, OutboundEmail};
pub use mediakit::{MediaKit, MediaKitRenderer, RateCardPdf, RenderError};

use std::fmt::Write as _;

use super::domain::LeadRecord;
use crate::cms::masters::{ProductRecord, StationRecord};

/// Error raised by the notification pair. Only ever logged.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error(transparent)]
    Mail(#[from] MailError),
}

/// Composes the PDF renderer and mail gateway for the post-submission
/// notification pair.
pub struct LeadNotifier {
    renderer: Box<dyn MediaKitRenderer>,
    mail: Box<dyn MailGateway>,
    sender: String,
    admin_address: String,
}

impl LeadNotifier {
    pub fn new(
        renderer: Box<dyn MediaKitRenderer>,
        mail: Box<dyn MailGateway>,
        sender: impl Into<String>,
        admin_address: impl Into<String>,
    ) -> Self {
        Self {
            renderer,
            mail,
            sender: sender.into(),
            admin_address: admin_address.into(),
        }
    }

    /// Send both emails. A failed PDF render degrades to attachment-less
    /// mail; a failed send surfaces to the caller, which is always a
    /// detached task that logs and drops it.
    pub fn deliver(
        &self,
        lead: &LeadRecord,
        station: Option<&StationRecord>,
        product: Option<&ProductRecord>,
    ) -> Result<(), NotifyError> {
        let attachment = station.and_then(|record| {
            let kit = MediaKit::compose(record, product);
            match self.renderer.render(&kit) {
                Ok(content) => Some(EmailAttachment {
                    filename: format!("{}-media-kit.pdf", slugify(&record.name)),
                    content,
                }),
                Err(err) => {
                    tracing::warn!(lead = lead.id, error = %err, "media kit render failed, mailing without attachment");
                    None
                }
            }
        });

        self.mail.send(OutboundEmail {
            from: self.sender.clone(),
            to: lead.email.clone(),
            subject: requester_subject(lead),
            body: requester_body(lead, station),
            attachment,
        })?;

        self.mail.send(OutboundEmail {
            from: self.sender.clone(),
            to: self.admin_address.clone(),
            subject: format!("New inquiry #{} ({})", lead.id, lead.requirement.label()),
            body: admin_body(lead),
            attachment: None,
        })?;

        Ok(())
    }
}

impl std::fmt::Debug for LeadNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadNotifier")
            .field("sender", &self.sender)
            .field("admin_address", &self.admin_address)
            .finish_non_exhaustive()
    }
}

fn requester_subject(lead: &LeadRecord) -> String {
    match &lead.station_name {
        Some(station) => format!("Your {station} advertising media kit"),
        None => "Thanks for your inquiry".to_string(),
    }
}

fn requester_body(lead: &LeadRecord, station: Option<&StationRecord>) -> String {
    let mut body = String::new();
    writeln!(body, "Hi {},", lead.name).expect("write greeting");
    writeln!(body).expect("write spacing");
    writeln!(
        body,
        "Thanks for reaching out. Your inquiry has been recorded and our sales team will follow up shortly."
    )
    .expect("write acknowledgment");

    if let Some(record) = station {
        writeln!(body).expect("write spacing");
        writeln!(
            body,
            "The attached media kit covers {} with current formats and rates.",
            record.name
        )
        .expect("write media kit note");
    }

    if let Some(format) = &lead.ad_format {
        writeln!(body, "Chosen format: {format}.").expect("write format note");
    }

    writeln!(body).expect("write spacing");
    writeln!(body, "Metro Ads sales team").expect("write signature");
    body
}

fn admin_body(lead: &LeadRecord) -> String {
    let mut body = String::new();
    writeln!(body, "Inquiry #{} received.", lead.id).expect("write headline");
    writeln!(body, "Requirement: {}", lead.requirement.label()).expect("write requirement");
    writeln!(body, "Contact: {} <{}> / {}", lead.name, lead.email, lead.phone)
        .expect("write contact");

    if let Some(company) = &lead.company {
        writeln!(body, "Company: {company}").expect("write company");
    }
    if let Some(station) = &lead.station_name {
        writeln!(body, "Station: {station}").expect("write station");
    }
    if let Some(format) = &lead.ad_format {
        writeln!(body, "Format: {format}").expect("write format");
    }
    if let Some(budget) = &lead.budget_band {
        writeln!(body, "Budget: {budget}").expect("write budget");
    }
    if !lead.target_stations.is_empty() {
        writeln!(body, "Target stations: {}", lead.target_stations.join(", "))
            .expect("write targets");
    }

    body
}

fn slugify(name: &str) -> String {
    let mut slug = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>();
    while slug.contains("--") {
        slug = slug.replace("--", "-");
    }
    let trimmed = slug.trim_matches('-');
    if trimmed.is_empty() {
        "station".to_string()
    } else {
        trimmed.to_string()
    }
}
