//! Fleet Profile Client - Headless Host
//!
//! Loads the stored session, fetches the profile once and logs what the
//! profile screen would show.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use fleet_profile_lib::{
    auth::Credentials,
    config::Config,
    controller::ActivationOutcome,
    logging,
    navigation::TracingNavigator,
    storage::FileStore,
    sync::ApiClient,
    AppContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;

    logging::init(&config.data_dir);
    info!("Fleet profile client starting against {}", config.api_base_url);

    let store = FileStore::open(config.data_dir.join("secure"))
        .context("failed to open credential storage")?;
    let api = ApiClient::from_config(&config).context("failed to create HTTP client")?;

    let context = AppContext::new(
        Credentials::new(Arc::new(store)),
        api,
        Arc::new(TracingNavigator),
    );

    if context.credentials.get_token().await.is_none() {
        warn!("No stored session token; the backend will reject the request");
    }

    let profile = context.profile_controller();
    match profile.activate().await {
        ActivationOutcome::Loaded { vehicles } => {
            let view = profile.view();
            info!("Signed in as {} ({})", view.user.name, view.user.mobile);
            for vehicle in &view.fleet {
                let marker = if profile.is_selected(vehicle) { "*" } else { " " };
                info!(
                    "{} {} [{}] {} {}",
                    marker, vehicle.name, vehicle.number, vehicle.kind, vehicle.model
                );
            }
            info!("{} vehicle(s) in fleet", vehicles);
        }
        ActivationOutcome::Failed(kind) => warn!("Profile could not be loaded: {:?}", kind),
        ActivationOutcome::Discarded => {}
    }

    Ok(())
}
