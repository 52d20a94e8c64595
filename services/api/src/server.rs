use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryCatalogRepository, InMemoryContactRepository, InMemoryLeadRepository,
    InMemoryProductRepository, InMemoryStationRepository,
};
use crate::routes;
use metro_ads::cms::leads::notify::{HttpMailClient, RateCardPdf};
use metro_ads::cms::leads::{ContactService, LeadIntakeService, LeadNotifier};
use metro_ads::cms::masters::MasterDataService;
use metro_ads::cms::transfer::StationTransfer;
use metro_ads::config::AppConfig;
use metro_ads::error::AppError;
use metro_ads::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let stations = Arc::new(InMemoryStationRepository::default());
    let products = Arc::new(InMemoryProductRepository::default());
    let catalogs = Arc::new(InMemoryCatalogRepository::default());
    let leads = Arc::new(InMemoryLeadRepository::default());
    let contacts = Arc::new(InMemoryContactRepository::default());

    let masters = Arc::new(MasterDataService::new(
        stations.clone(),
        products.clone(),
        catalogs.clone(),
    ));
    let transfer = Arc::new(StationTransfer::new(stations.clone(), catalogs.clone()));
    let contact_service = Arc::new(ContactService::new(contacts));

    let mut intake = LeadIntakeService::new(leads, stations, products);
    match &config.mail {
        Some(mail) => {
            let client = HttpMailClient::new(mail.api_url.clone(), mail.api_key.clone())?;
            let notifier = Arc::new(LeadNotifier::new(
                Box::new(RateCardPdf),
                Box::new(client),
                mail.sender.clone(),
                mail.admin_address.clone(),
            ));
            intake = intake.with_notifier(notifier);
        }
        None => info!("APP_MAIL_API_KEY unset, lead notifications disabled"),
    }
    let intake = Arc::new(intake);

    let session_config = Arc::new(config.session.clone());

    let app = routes::build(
        app_state,
        masters,
        transfer,
        intake,
        contact_service,
        session_config,
    )
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "metro ads platform ready");

    axum::serve(listener, app).await?;
    Ok(())
}
