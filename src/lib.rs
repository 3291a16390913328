//! Fleet Profile Client Library
//!
//! Keeps the signed-in user's profile, vehicle fleet and active vehicle
//! in sync with the backend.

pub mod auth;
pub mod config;
pub mod controller;
pub mod logging;
pub mod models;
pub mod navigation;
pub mod selection;
pub mod storage;
pub mod sync;

use std::sync::Arc;

use auth::Credentials;
use controller::ProfileController;
use navigation::Navigator;
use selection::SelectionStore;
use sync::ApiClient;

/// Application-wide collaborators, created once by the host and handed
/// to each screen controller.
#[derive(Clone)]
pub struct AppContext {
    pub credentials: Credentials,
    pub api: ApiClient,
    pub selection: SelectionStore,
    pub navigator: Arc<dyn Navigator>,
}

impl AppContext {
    /// Build a context with an empty selection
    pub fn new(credentials: Credentials, api: ApiClient, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            credentials,
            api,
            selection: SelectionStore::new(),
            navigator,
        }
    }

    /// Controller for a freshly entered profile screen
    pub fn profile_controller(&self) -> ProfileController {
        ProfileController::new(
            self.credentials.clone(),
            self.api.clone(),
            self.selection.clone(),
            Arc::clone(&self.navigator),
        )
    }
}
