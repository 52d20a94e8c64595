use std::sync::Arc;

use clap::Args;

use crate::infra::{
    InMemoryCatalogRepository, InMemoryLeadRepository, InMemoryProductRepository,
    InMemoryStationRepository, RecordingMailGateway,
};
use metro_ads::cms::leads::notify::RateCardPdf;
use metro_ads::cms::leads::{
    BuyerType, FamiliarityLevel, LeadIntakeService, LeadNotifier, LeadSubmission,
    RequirementCategory,
};
use metro_ads::cms::masters::{
    CatalogKind, MasterDataService, MasterServiceError, ProductDraft, ProductRecord, RateCard,
    StationDraft, StationRecord,
};
use metro_ads::cms::transfer::StationTransfer;
use metro_ads::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Requester address used for the sample inquiry
    #[arg(long, default_value = "buyer@example.com")]
    pub(crate) email: String,
}

struct SeededMasters {
    station: StationRecord,
    panel: ProductRecord,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Metro Ads lead-capture demo");

    let stations = Arc::new(InMemoryStationRepository::default());
    let products = Arc::new(InMemoryProductRepository::default());
    let catalogs = Arc::new(InMemoryCatalogRepository::default());
    let leads = Arc::new(InMemoryLeadRepository::default());

    let masters = MasterDataService::new(stations.clone(), products.clone(), catalogs.clone());
    let seeded = match seed_master_data(&masters) {
        Ok(seeded) => seeded,
        Err(err) => {
            println!("  Seeding failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- Seeded {} with product {}",
        seeded.station.name, seeded.panel.name
    );

    let intake = LeadIntakeService::new(leads, stations.clone(), products);
    let submission = sample_submission(&args.email, seeded.station.id, seeded.panel.id);
    let outcome = match intake.submit(submission) {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("  Submission rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Lead #{} recorded for {} <{}>",
        outcome.record.id, outcome.record.name, outcome.record.email
    );
    println!(
        "  Snapshots: station={} | format={}",
        outcome.record.station_name.as_deref().unwrap_or("-"),
        outcome.record.ad_format.as_deref().unwrap_or("-"),
    );

    // The server spawns this step detached; the demo runs it inline so the
    // captured mail can be printed deterministically.
    let mail = RecordingMailGateway::default();
    let notifier = LeadNotifier::new(
        Box::new(RateCardPdf),
        Box::new(mail.clone()),
        "no-reply@metro-ads.example",
        "sales@metro-ads.example",
    );
    match notifier.deliver(
        &outcome.record,
        outcome.station.as_ref(),
        outcome.product.as_ref(),
    ) {
        Ok(()) => println!("- Notification pair delivered"),
        Err(err) => println!("- Notification failed (lead is still recorded): {err}"),
    }
    for email in mail.events() {
        let attachment = email
            .attachment
            .as_ref()
            .map(|att| format!("{} ({} bytes)", att.filename, att.content.len()))
            .unwrap_or_else(|| "none".to_string());
        println!("  -> to {} | {} | attachment: {attachment}", email.to, email.subject);
    }

    let transfer = StationTransfer::new(stations, catalogs);
    match transfer.export_csv() {
        Ok(bytes) => println!(
            "- Station export ready: {} bytes of CSV",
            bytes.len()
        ),
        Err(err) => println!("- Station export failed: {err}"),
    }

    Ok(())
}

fn seed_master_data<S, P, C>(
    masters: &MasterDataService<S, P, C>,
) -> Result<SeededMasters, MasterServiceError>
where
    S: metro_ads::cms::masters::StationRepository + 'static,
    P: metro_ads::cms::masters::ProductRepository + 'static,
    C: metro_ads::cms::masters::CatalogRepository + 'static,
{
    let red = masters.create_entry(CatalogKind::Line, "Red Line")?;
    let blue = masters.create_entry(CatalogKind::Line, "Blue Line")?;
    let commuters = masters.create_entry(CatalogKind::Audience, "Office commuters")?;
    let interchange = masters.create_entry(CatalogKind::StationType, "Interchange")?;

    let panel = masters.create_product(ProductDraft {
        name: "Backlit Panel".to_string(),
        format: Some("4ft x 6ft".to_string()),
        rate: Some(RateCard {
            amount: 45_000,
            unit: "per panel per month".to_string(),
        }),
    })?;
    let wrap = masters.create_product(ProductDraft {
        name: "Train Wrap".to_string(),
        format: Some("full exterior".to_string()),
        rate: Some(RateCard {
            amount: 300_000,
            unit: "per train per month".to_string(),
        }),
    })?;

    let station = masters.create_station(StationDraft {
        name: "Central Plaza".to_string(),
        address: Some("12 Transit Way".to_string()),
        images: vec!["central-plaza-concourse.jpg".to_string()],
        line_ids: vec![red.id, blue.id],
        audience_ids: vec![commuters.id],
        type_ids: vec![interchange.id],
        product_ids: vec![panel.id, wrap.id],
    })?;

    Ok(SeededMasters { station, panel })
}

fn sample_submission(email: &str, station_id: u64, product_id: u64) -> LeadSubmission {
    LeadSubmission {
        requirement: RequirementCategory::Advertise,
        buyer_type: Some(BuyerType::Brand),
        familiarity: Some(FamiliarityLevel::FirstTime),
        company: Some("Acme Beverages".to_string()),
        name: "Asha".to_string(),
        phone: "9999999999".to_string(),
        email: email.to_string(),
        station_id: Some(station_id),
        product_id: Some(product_id),
        target_stations: vec!["Central Plaza".to_string()],
        ad_format: None,
        budget_band: Some("1-5 lakh".to_string()),
        campaign_goal: Some("Product launch".to_string()),
        target_audience: Some("Office commuters".to_string()),
        timeline: Some("Next quarter".to_string()),
    }
}
