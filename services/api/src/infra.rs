use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use metro_ads::cms::leads::notify::{MailError, MailGateway, OutboundEmail};
use metro_ads::cms::leads::{
    ContactRecord, ContactRepository, ContactSubmission, LeadDraft, LeadRecord, LeadRepository,
};
use metro_ads::cms::masters::{
    CatalogEntry, CatalogKind, CatalogRepository, ProductChange, ProductDraft, ProductRecord,
    ProductRepository, RepositoryError, StationChange, StationDraft, StationRecord,
    StationRepository,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
pub(crate) struct InMemoryStationRepository {
    rows: Mutex<HashMap<u64, StationRecord>>,
    sequence: AtomicU64,
}

impl InMemoryStationRepository {
    fn next_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl StationRepository for InMemoryStationRepository {
    fn insert(&self, draft: StationDraft) -> Result<StationRecord, RepositoryError> {
        let mut guard = self.rows.lock().expect("station mutex poisoned");
        if guard.values().any(|row| row.name == draft.name) {
            return Err(RepositoryError::Conflict);
        }
        let record = StationRecord {
            id: self.next_id(),
            name: draft.name,
            address: draft.address,
            images: draft.images,
            line_ids: draft.line_ids,
            audience_ids: draft.audience_ids,
            type_ids: draft.type_ids,
            product_ids: draft.product_ids,
            created_at: Utc::now(),
        };
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&self, id: u64, change: StationChange) -> Result<StationRecord, RepositoryError> {
        let mut guard = self.rows.lock().expect("station mutex poisoned");
        if let Some(name) = &change.name {
            if guard.values().any(|row| row.id != id && row.name == *name) {
                return Err(RepositoryError::Conflict);
            }
        }
        let record = guard.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        change.apply(record);
        Ok(record.clone())
    }

    fn fetch(&self, id: u64) -> Result<Option<StationRecord>, RepositoryError> {
        let guard = self.rows.lock().expect("station mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<StationRecord>, RepositoryError> {
        let guard = self.rows.lock().expect("station mutex poisoned");
        let mut rows: Vec<StationRecord> = guard.values().cloned().collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    fn remove(&self, id: u64) -> Result<(), RepositoryError> {
        let mut guard = self.rows.lock().expect("station mutex poisoned");
        guard.remove(&id).map(drop).ok_or(RepositoryError::NotFound)
    }

    fn unlink_product(&self, product_id: u64) -> Result<(), RepositoryError> {
        let mut guard = self.rows.lock().expect("station mutex poisoned");
        for row in guard.values_mut() {
            row.product_ids.retain(|id| *id != product_id);
        }
        Ok(())
    }

    fn unlink_catalog(&self, kind: CatalogKind, entry_id: u64) -> Result<(), RepositoryError> {
        let mut guard = self.rows.lock().expect("station mutex poisoned");
        for row in guard.values_mut() {
            let ids = match kind {
                CatalogKind::Line => &mut row.line_ids,
                CatalogKind::Audience => &mut row.audience_ids,
                CatalogKind::StationType => &mut row.type_ids,
            };
            ids.retain(|id| *id != entry_id);
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryProductRepository {
    rows: Mutex<HashMap<u64, ProductRecord>>,
    sequence: AtomicU64,
}

impl ProductRepository for InMemoryProductRepository {
    fn insert(&self, draft: ProductDraft) -> Result<ProductRecord, RepositoryError> {
        let mut guard = self.rows.lock().expect("product mutex poisoned");
        if guard.values().any(|row| row.name == draft.name) {
            return Err(RepositoryError::Conflict);
        }
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let record = ProductRecord {
            id,
            name: draft.name,
            format: draft.format,
            rate: draft.rate,
        };
        guard.insert(id, record.clone());
        Ok(record)
    }

    fn update(&self, id: u64, change: ProductChange) -> Result<ProductRecord, RepositoryError> {
        let mut guard = self.rows.lock().expect("product mutex poisoned");
        if let Some(name) = &change.name {
            if guard.values().any(|row| row.id != id && row.name == *name) {
                return Err(RepositoryError::Conflict);
            }
        }
        let record = guard.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        change.apply(record);
        Ok(record.clone())
    }

    fn fetch(&self, id: u64) -> Result<Option<ProductRecord>, RepositoryError> {
        let guard = self.rows.lock().expect("product mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<ProductRecord>, RepositoryError> {
        let guard = self.rows.lock().expect("product mutex poisoned");
        let mut rows: Vec<ProductRecord> = guard.values().cloned().collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    fn remove(&self, id: u64) -> Result<(), RepositoryError> {
        let mut guard = self.rows.lock().expect("product mutex poisoned");
        guard.remove(&id).map(drop).ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default)]
pub(crate) struct InMemoryCatalogRepository {
    tables: Mutex<HashMap<CatalogKind, HashMap<u64, CatalogEntry>>>,
    sequence: AtomicU64,
}

impl CatalogRepository for InMemoryCatalogRepository {
    fn insert(&self, kind: CatalogKind, name: &str) -> Result<CatalogEntry, RepositoryError> {
        let mut guard = self.tables.lock().expect("catalog mutex poisoned");
        let table = guard.entry(kind).or_default();
        if table.values().any(|entry| entry.name == name) {
            return Err(RepositoryError::Conflict);
        }
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let entry = CatalogEntry {
            id,
            name: name.to_string(),
        };
        table.insert(id, entry.clone());
        Ok(entry)
    }

    fn rename(
        &self,
        kind: CatalogKind,
        id: u64,
        name: &str,
    ) -> Result<CatalogEntry, RepositoryError> {
        let mut guard = self.tables.lock().expect("catalog mutex poisoned");
        let table = guard.entry(kind).or_default();
        if table.values().any(|entry| entry.id != id && entry.name == name) {
            return Err(RepositoryError::Conflict);
        }
        let entry = table.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        entry.name = name.to_string();
        Ok(entry.clone())
    }

    fn fetch(&self, kind: CatalogKind, id: u64) -> Result<Option<CatalogEntry>, RepositoryError> {
        let guard = self.tables.lock().expect("catalog mutex poisoned");
        Ok(guard.get(&kind).and_then(|table| table.get(&id)).cloned())
    }

    fn find_by_name(
        &self,
        kind: CatalogKind,
        name: &str,
    ) -> Result<Option<CatalogEntry>, RepositoryError> {
        let guard = self.tables.lock().expect("catalog mutex poisoned");
        Ok(guard
            .get(&kind)
            .and_then(|table| table.values().find(|entry| entry.name == name))
            .cloned())
    }

    fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, RepositoryError> {
        let guard = self.tables.lock().expect("catalog mutex poisoned");
        let mut entries: Vec<CatalogEntry> = guard
            .get(&kind)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default();
        entries.sort_by_key(|entry| entry.id);
        Ok(entries)
    }

    fn remove(&self, kind: CatalogKind, id: u64) -> Result<(), RepositoryError> {
        let mut guard = self.tables.lock().expect("catalog mutex poisoned");
        guard
            .get_mut(&kind)
            .and_then(|table| table.remove(&id))
            .map(drop)
            .ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default)]
pub(crate) struct InMemoryLeadRepository {
    rows: Mutex<HashMap<u64, LeadRecord>>,
    sequence: AtomicU64,
}

impl LeadRepository for InMemoryLeadRepository {
    fn insert(&self, draft: LeadDraft) -> Result<LeadRecord, RepositoryError> {
        let mut guard = self.rows.lock().expect("lead mutex poisoned");
        let record = LeadRecord {
            id: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
            requirement: draft.requirement,
            buyer_type: draft.buyer_type,
            familiarity: draft.familiarity,
            company: draft.company,
            name: draft.name,
            phone: draft.phone,
            email: draft.email,
            station_name: draft.station_name,
            ad_format: draft.ad_format,
            target_stations: draft.target_stations,
            budget_band: draft.budget_band,
            campaign_goal: draft.campaign_goal,
            target_audience: draft.target_audience,
            timeline: draft.timeline,
            created_at: Utc::now(),
        };
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: u64) -> Result<Option<LeadRecord>, RepositoryError> {
        let guard = self.rows.lock().expect("lead mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<LeadRecord>, RepositoryError> {
        let guard = self.rows.lock().expect("lead mutex poisoned");
        let mut rows: Vec<LeadRecord> = guard.values().cloned().collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    fn remove(&self, id: u64) -> Result<(), RepositoryError> {
        let mut guard = self.rows.lock().expect("lead mutex poisoned");
        guard.remove(&id).map(drop).ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default)]
pub(crate) struct InMemoryContactRepository {
    rows: Mutex<HashMap<u64, ContactRecord>>,
    sequence: AtomicU64,
}

impl ContactRepository for InMemoryContactRepository {
    fn insert(&self, submission: ContactSubmission) -> Result<ContactRecord, RepositoryError> {
        let mut guard = self.rows.lock().expect("contact mutex poisoned");
        let record = ContactRecord {
            id: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
            name: submission.name,
            phone: submission.phone,
            email: submission.email,
            message: submission.message,
            created_at: Utc::now(),
        };
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<ContactRecord>, RepositoryError> {
        let guard = self.rows.lock().expect("contact mutex poisoned");
        let mut rows: Vec<ContactRecord> = guard.values().cloned().collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    fn remove(&self, id: u64) -> Result<(), RepositoryError> {
        let mut guard = self.rows.lock().expect("contact mutex poisoned");
        guard.remove(&id).map(drop).ok_or(RepositoryError::NotFound)
    }
}

/// Captures outbound mail so the demo can print what would have been sent.
/// Clones share the same event log.
#[derive(Default, Clone)]
pub(crate) struct RecordingMailGateway {
    events: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl RecordingMailGateway {
    pub(crate) fn events(&self) -> Vec<OutboundEmail> {
        self.events.lock().expect("mail mutex poisoned").clone()
    }
}

impl MailGateway for RecordingMailGateway {
    fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        self.events.lock().expect("mail mutex poisoned").push(email);
        Ok(())
    }
}
