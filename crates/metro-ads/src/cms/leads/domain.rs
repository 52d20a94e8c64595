use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cms::masters::{ProductRecord, StationRecord};

/// What the requester wants from us.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCategory {
    /// Buy advertising space at one or more stations.
    #[default]
    Advertise,
    /// Offer inventory (hoardings, panels) for listing on the platform.
    ListInventory,
}

impl RequirementCategory {
    pub const fn label(self) -> &'static str {
        match self {
            RequirementCategory::Advertise => "advertise",
            RequirementCategory::ListInventory => "list_inventory",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyerType {
    Brand,
    Agency,
    Individual,
}

/// How familiar the requester says they are with metro advertising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamiliarityLevel {
    FirstTime,
    Explored,
    Regular,
}

/// Public form payload. Field names are camelCase to match the marketing
/// site's client-side forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    #[serde(default)]
    pub requirement: RequirementCategory,
    #[serde(default)]
    pub buyer_type: Option<BuyerType>,
    #[serde(default)]
    pub familiarity: Option<FamiliarityLevel>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub station_id: Option<u64>,
    #[serde(default)]
    pub product_id: Option<u64>,
    #[serde(default)]
    pub target_stations: Vec<String>,
    #[serde(default)]
    pub ad_format: Option<String>,
    #[serde(default)]
    pub budget_band: Option<String>,
    #[serde(default)]
    pub campaign_goal: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
}

/// Lead fields as handed to storage; the repository assigns the id and the
/// creation timestamp.
#[derive(Debug, Clone)]
pub struct LeadDraft {
    pub requirement: RequirementCategory,
    pub buyer_type: Option<BuyerType>,
    pub familiarity: Option<FamiliarityLevel>,
    pub company: Option<String>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub station_name: Option<String>,
    pub ad_format: Option<String>,
    pub target_stations: Vec<String>,
    pub budget_band: Option<String>,
    pub campaign_goal: Option<String>,
    pub target_audience: Option<String>,
    pub timeline: Option<String>,
}

impl LeadDraft {
    /// Denormalizes the looked-up station and product into name snapshots so
    /// the lead stays meaningful after master data changes. The chosen
    /// product's name wins over the free-text ad format.
    pub fn from_submission(
        submission: LeadSubmission,
        station: Option<&StationRecord>,
        product: Option<&ProductRecord>,
    ) -> Self {
        let station_name = station.map(|record| record.name.clone());
        let ad_format = product
            .map(|record| record.name.clone())
            .or(submission.ad_format);

        Self {
            requirement: submission.requirement,
            buyer_type: submission.buyer_type,
            familiarity: submission.familiarity,
            company: submission.company,
            name: submission.name,
            phone: submission.phone,
            email: submission.email,
            station_name,
            ad_format,
            target_stations: submission.target_stations,
            budget_band: submission.budget_band,
            campaign_goal: submission.campaign_goal,
            target_audience: submission.target_audience,
            timeline: submission.timeline,
        }
    }
}

/// A persisted inquiry. Immutable once created; the only mutation the CMS
/// offers is deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: u64,
    pub requirement: RequirementCategory,
    pub buyer_type: Option<BuyerType>,
    pub familiarity: Option<FamiliarityLevel>,
    pub company: Option<String>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub station_name: Option<String>,
    pub ad_format: Option<String>,
    pub target_stations: Vec<String>,
    pub budget_band: Option<String>,
    pub campaign_goal: Option<String>,
    pub target_audience: Option<String>,
    pub timeline: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Plain contact-form message, kept separate from qualified leads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: u64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}
