//! Shared doubles and fixtures for the integration suites: in-memory
//! repositories, recording/failing mail gateways, and request helpers.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use metro_ads::cms::leads::notify::{MailError, MailGateway, OutboundEmail};
use metro_ads::cms::leads::{
    ContactRecord, ContactRepository, ContactSubmission, LeadDraft, LeadRecord, LeadRepository,
    LeadSubmission,
};
use metro_ads::cms::masters::{
    CatalogEntry, CatalogKind, CatalogRepository, MasterDataService, ProductChange, ProductDraft,
    ProductRecord, RateCard, RepositoryError, StationChange, StationDraft, StationRecord,
    StationRepository,
};
use metro_ads::cms::masters::ProductRepository;

#[derive(Default)]
pub struct MemoryStations {
    rows: Mutex<HashMap<u64, StationRecord>>,
    sequence: AtomicU64,
}

impl StationRepository for MemoryStations {
    fn insert(&self, draft: StationDraft) -> Result<StationRecord, RepositoryError> {
        let mut guard = self.rows.lock().expect("lock");
        if guard.values().any(|row| row.name == draft.name) {
            return Err(RepositoryError::Conflict);
        }
        let record = StationRecord {
            id: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
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
        let mut guard = self.rows.lock().expect("lock");
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
        Ok(self.rows.lock().expect("lock").get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<StationRecord>, RepositoryError> {
        let guard = self.rows.lock().expect("lock");
        let mut rows: Vec<StationRecord> = guard.values().cloned().collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    fn remove(&self, id: u64) -> Result<(), RepositoryError> {
        self.rows
            .lock()
            .expect("lock")
            .remove(&id)
            .map(drop)
            .ok_or(RepositoryError::NotFound)
    }

    fn unlink_product(&self, product_id: u64) -> Result<(), RepositoryError> {
        for row in self.rows.lock().expect("lock").values_mut() {
            row.product_ids.retain(|id| *id != product_id);
        }
        Ok(())
    }

    fn unlink_catalog(&self, kind: CatalogKind, entry_id: u64) -> Result<(), RepositoryError> {
        for row in self.rows.lock().expect("lock").values_mut() {
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
pub struct MemoryProducts {
    rows: Mutex<HashMap<u64, ProductRecord>>,
    sequence: AtomicU64,
}

impl ProductRepository for MemoryProducts {
    fn insert(&self, draft: ProductDraft) -> Result<ProductRecord, RepositoryError> {
        let mut guard = self.rows.lock().expect("lock");
        if guard.values().any(|row| row.name == draft.name) {
            return Err(RepositoryError::Conflict);
        }
        let record = ProductRecord {
            id: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
            name: draft.name,
            format: draft.format,
            rate: draft.rate,
        };
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&self, id: u64, change: ProductChange) -> Result<ProductRecord, RepositoryError> {
        let mut guard = self.rows.lock().expect("lock");
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
        Ok(self.rows.lock().expect("lock").get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<ProductRecord>, RepositoryError> {
        let guard = self.rows.lock().expect("lock");
        let mut rows: Vec<ProductRecord> = guard.values().cloned().collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    fn remove(&self, id: u64) -> Result<(), RepositoryError> {
        self.rows
            .lock()
            .expect("lock")
            .remove(&id)
            .map(drop)
            .ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default)]
pub struct MemoryCatalogs {
    tables: Mutex<HashMap<CatalogKind, HashMap<u64, CatalogEntry>>>,
    sequence: AtomicU64,
}

impl CatalogRepository for MemoryCatalogs {
    fn insert(&self, kind: CatalogKind, name: &str) -> Result<CatalogEntry, RepositoryError> {
        let mut guard = self.tables.lock().expect("lock");
        let table = guard.entry(kind).or_default();
        if table.values().any(|entry| entry.name == name) {
            return Err(RepositoryError::Conflict);
        }
        let entry = CatalogEntry {
            id: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
            name: name.to_string(),
        };
        table.insert(entry.id, entry.clone());
        Ok(entry)
    }

    fn rename(
        &self,
        kind: CatalogKind,
        id: u64,
        name: &str,
    ) -> Result<CatalogEntry, RepositoryError> {
        let mut guard = self.tables.lock().expect("lock");
        let table = guard.entry(kind).or_default();
        if table.values().any(|entry| entry.id != id && entry.name == name) {
            return Err(RepositoryError::Conflict);
        }
        let entry = table.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        entry.name = name.to_string();
        Ok(entry.clone())
    }

    fn fetch(&self, kind: CatalogKind, id: u64) -> Result<Option<CatalogEntry>, RepositoryError> {
        let guard = self.tables.lock().expect("lock");
        Ok(guard.get(&kind).and_then(|table| table.get(&id)).cloned())
    }

    fn find_by_name(
        &self,
        kind: CatalogKind,
        name: &str,
    ) -> Result<Option<CatalogEntry>, RepositoryError> {
        let guard = self.tables.lock().expect("lock");
        Ok(guard
            .get(&kind)
            .and_then(|table| table.values().find(|entry| entry.name == name))
            .cloned())
    }

    fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, RepositoryError> {
        let guard = self.tables.lock().expect("lock");
        let mut entries: Vec<CatalogEntry> = guard
            .get(&kind)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default();
        entries.sort_by_key(|entry| entry.id);
        Ok(entries)
    }

    fn remove(&self, kind: CatalogKind, id: u64) -> Result<(), RepositoryError> {
        self.tables
            .lock()
            .expect("lock")
            .get_mut(&kind)
            .and_then(|table| table.remove(&id))
            .map(drop)
            .ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default)]
pub struct MemoryLeads {
    rows: Mutex<HashMap<u64, LeadRecord>>,
    sequence: AtomicU64,
}

impl LeadRepository for MemoryLeads {
    fn insert(&self, draft: LeadDraft) -> Result<LeadRecord, RepositoryError> {
        let mut guard = self.rows.lock().expect("lock");
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
        Ok(self.rows.lock().expect("lock").get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<LeadRecord>, RepositoryError> {
        let guard = self.rows.lock().expect("lock");
        let mut rows: Vec<LeadRecord> = guard.values().cloned().collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    fn remove(&self, id: u64) -> Result<(), RepositoryError> {
        self.rows
            .lock()
            .expect("lock")
            .remove(&id)
            .map(drop)
            .ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default)]
pub struct MemoryContacts {
    rows: Mutex<HashMap<u64, ContactRecord>>,
    sequence: AtomicU64,
}

impl ContactRepository for MemoryContacts {
    fn insert(&self, submission: ContactSubmission) -> Result<ContactRecord, RepositoryError> {
        let mut guard = self.rows.lock().expect("lock");
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
        let guard = self.rows.lock().expect("lock");
        let mut rows: Vec<ContactRecord> = guard.values().cloned().collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    fn remove(&self, id: u64) -> Result<(), RepositoryError> {
        self.rows
            .lock()
            .expect("lock")
            .remove(&id)
            .map(drop)
            .ok_or(RepositoryError::NotFound)
    }
}

/// Mail double that records every send. Clones share the event log.
#[derive(Default, Clone)]
pub struct RecordingMail {
    events: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl RecordingMail {
    pub fn events(&self) -> Vec<OutboundEmail> {
        self.events.lock().expect("lock").clone()
    }
}

impl MailGateway for RecordingMail {
    fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        self.events.lock().expect("lock").push(email);
        Ok(())
    }
}

/// Mail double whose every send fails, for proving the lead row survives
/// notification failure.
#[derive(Default, Clone)]
pub struct FailingMail;

impl MailGateway for FailingMail {
    fn send(&self, _email: OutboundEmail) -> Result<(), MailError> {
        Err(MailError::Transport("connection refused".to_string()))
    }
}

pub struct TestBackend {
    pub stations: Arc<MemoryStations>,
    pub products: Arc<MemoryProducts>,
    pub catalogs: Arc<MemoryCatalogs>,
    pub leads: Arc<MemoryLeads>,
    pub contacts: Arc<MemoryContacts>,
}

impl TestBackend {
    pub fn new() -> Self {
        Self {
            stations: Arc::new(MemoryStations::default()),
            products: Arc::new(MemoryProducts::default()),
            catalogs: Arc::new(MemoryCatalogs::default()),
            leads: Arc::new(MemoryLeads::default()),
            contacts: Arc::new(MemoryContacts::default()),
        }
    }

    pub fn master_service(&self) -> MasterDataService<MemoryStations, MemoryProducts, MemoryCatalogs> {
        MasterDataService::new(
            self.stations.clone(),
            self.products.clone(),
            self.catalogs.clone(),
        )
    }
}

/// Seed one fully linked station and return it with its linked product.
pub fn seed_station(backend: &TestBackend) -> (StationRecord, ProductRecord) {
    let masters = backend.master_service();
    let line = masters
        .create_entry(CatalogKind::Line, "Red Line")
        .expect("line seeds");
    let audience = masters
        .create_entry(CatalogKind::Audience, "Office commuters")
        .expect("audience seeds");
    let kind = masters
        .create_entry(CatalogKind::StationType, "Interchange")
        .expect("type seeds");
    let product = masters
        .create_product(ProductDraft {
            name: "Backlit Panel".to_string(),
            format: Some("4ft x 6ft".to_string()),
            rate: Some(RateCard {
                amount: 45_000,
                unit: "per panel per month".to_string(),
            }),
        })
        .expect("product seeds");
    let station = masters
        .create_station(StationDraft {
            name: "Central Plaza".to_string(),
            address: Some("12 Transit Way".to_string()),
            images: Vec::new(),
            line_ids: vec![line.id],
            audience_ids: vec![audience.id],
            type_ids: vec![kind.id],
            product_ids: vec![product.id],
        })
        .expect("station seeds");
    (station, product)
}

/// The documented submission shape: camelCase field names, contact trio,
/// station and product references.
pub fn scenario_submission(station_id: u64, product_id: u64) -> Value {
    serde_json::json!({
        "stationId": station_id,
        "productId": product_id,
        "name": "A",
        "email": "a@b.com",
        "phone": "9999999999",
    })
}

pub fn typed_submission(station_id: u64, product_id: u64) -> LeadSubmission {
    LeadSubmission {
        name: "A".to_string(),
        phone: "9999999999".to_string(),
        email: "a@b.com".to_string(),
        station_id: Some(station_id),
        product_id: Some(product_id),
        ..LeadSubmission::default()
    }
}

/// Dispatch a JSON request through the router and decode the JSON body.
pub async fn request_json(
    router: axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&value).expect("serialize body"),
            ))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = router.oneshot(request).await.expect("router dispatch");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let payload = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, payload)
}

/// Dispatch a bare GET and return the raw body bytes (for CSV downloads).
pub async fn request_bytes(router: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    let response = router.oneshot(request).await.expect("router dispatch");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    (status, bytes.to_vec())
}

pub const MULTIPART_BOUNDARY: &str = "metro-test-boundary";

/// Wrap CSV text as a single-file multipart body the import endpoint accepts.
pub fn multipart_csv(csv: &str) -> Vec<u8> {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"stations.csv\"\r\nContent-Type: text/csv\r\n\r\n{csv}\r\n--{b}--\r\n",
        b = MULTIPART_BOUNDARY,
    )
    .into_bytes()
}
