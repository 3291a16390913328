//! Profile Session Controller
//!
//! Drives the profile screen: loads the user and fleet, runs the
//! add-vehicle form, hands the chosen vehicle to the selection store
//! and signs the user out.
//!
//! Every network call records the session generation it started in.
//! Logout and deactivation bump the generation, so a response that
//! lands afterwards is dropped instead of touching state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info};

use crate::auth::Credentials;
use crate::models::{DraftField, User, Vehicle, VehicleDraft};
use crate::navigation::{Navigator, Route};
use crate::selection::SelectionStore;
use crate::sync::{ApiClient, ApiError, CreateVehicleOutcome, ErrorKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
}

/// Everything the profile screen renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileView {
    pub phase: Phase,
    pub user: User,
    pub fleet: Vec<Vehicle>,
    pub form_open: bool,
    pub draft: VehicleDraft,
    /// Last failure sent to the diagnostic log
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    Loaded { vehicles: usize },
    /// Reported and swallowed; view keeps its previous contents
    Failed(ErrorKind),
    /// Session ended while the request was in flight
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Created(Vehicle),
    Rejected(String),
    Discarded,
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("vehicle form is not open")]
    FormClosed,

    #[error(transparent)]
    Transport(#[from] ApiError),
}

pub struct ProfileController {
    credentials: Credentials,
    api: ApiClient,
    selection: SelectionStore,
    navigator: Arc<dyn Navigator>,
    view: Mutex<ProfileView>,
    generation: AtomicU64,
}

impl ProfileController {
    pub fn new(
        credentials: Credentials,
        api: ApiClient,
        selection: SelectionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            credentials,
            api,
            selection,
            navigator,
            view: Mutex::new(ProfileView::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Load the profile and fleet. Called when the screen is entered,
    /// and again to refresh.
    pub async fn activate(&self) -> ActivationOutcome {
        let generation = self.current_generation();
        let prior_phase = std::mem::replace(&mut self.lock_view().phase, Phase::Loading);

        let token = self.credentials.get_token().await;
        let result = self.api.fetch_profile(token.as_deref()).await;

        if self.current_generation() != generation {
            debug!("Discarding profile response for an ended session");
            let mut view = self.lock_view();
            if view.phase == Phase::Loading {
                view.phase = prior_phase;
            }
            return ActivationOutcome::Discarded;
        }

        let mut view = self.lock_view();
        view.phase = Phase::Ready;
        match result {
            Ok(snapshot) => {
                let vehicles = snapshot.fleet.len();
                view.user = snapshot.user;
                view.fleet = snapshot.fleet;
                view.last_error = None;
                ActivationOutcome::Loaded { vehicles }
            }
            Err(e) => {
                error!("Error fetching user details: {}", e);
                view.last_error = Some(e.to_string());
                ActivationOutcome::Failed(e.kind())
            }
        }
    }

    /// Show the add-vehicle form with a blank draft. No-op if already open.
    pub fn open_form(&self) {
        let mut view = self.lock_view();
        if !view.form_open {
            view.draft = VehicleDraft::default();
            view.form_open = true;
        }
    }

    pub fn edit_draft(&self, field: DraftField, value: impl Into<String>) {
        self.lock_view().draft.set(field, value);
    }

    /// Submit the draft.
    ///
    /// Once the backend answers, the draft is cleared whatever the answer.
    /// The form closes and the fleet grows only when the vehicle was
    /// created. Transport failures return before any of that, leaving
    /// the view untouched.
    pub async fn save_vehicle(&self) -> Result<SaveOutcome, SaveError> {
        let generation = self.current_generation();
        let draft = {
            let view = self.lock_view();
            if !view.form_open {
                return Err(SaveError::FormClosed);
            }
            view.draft.clone()
        };

        debug!("New vehicle: {:?}", draft);

        let token = self.credentials.get_token().await;
        let outcome = match self.api.create_vehicle(token.as_deref(), &draft).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Error saving vehicle: {}", e);
                if self.current_generation() == generation {
                    self.lock_view().last_error = Some(e.to_string());
                }
                return Err(SaveError::Transport(e));
            }
        };

        if self.current_generation() != generation {
            debug!("Discarding vehicle response for an ended session");
            return Ok(SaveOutcome::Discarded);
        }

        let mut view = self.lock_view();
        view.draft = VehicleDraft::default();
        match outcome {
            CreateVehicleOutcome::Created(vehicle) => {
                view.fleet.push(vehicle.clone());
                view.form_open = false;
                view.last_error = None;
                Ok(SaveOutcome::Created(vehicle))
            }
            CreateVehicleOutcome::Rejected(reason) => {
                error!("Error saving vehicle: {}", reason);
                view.last_error = Some(reason.clone());
                Ok(SaveOutcome::Rejected(reason))
            }
        }
    }

    /// Make a listed vehicle the active one and go to the primary tab.
    ///
    /// Returns `false` without side effects if the vehicle is not in the
    /// current fleet.
    pub fn select_vehicle(&self, vehicle: &Vehicle) -> bool {
        let listed = self
            .lock_view()
            .fleet
            .iter()
            .find(|v| v.id == vehicle.id)
            .cloned();

        let Some(listed) = listed else {
            debug!("Ignoring selection of unlisted vehicle {}", vehicle.id);
            return false;
        };

        self.selection.set(listed);
        self.navigator.replace(Route::Home);
        true
    }

    pub fn is_selected(&self, vehicle: &Vehicle) -> bool {
        self.selection.selected_id().as_ref() == Some(&vehicle.id)
    }

    /// Forget the token and return to sign-in. The selection is kept.
    pub async fn logout(&self) {
        info!("Logging out");
        self.end_session();

        if let Err(e) = self.credentials.clear_token().await {
            error!("Failed to clear token: {}", e);
        }

        self.navigator.replace(Route::SignIn);
    }

    /// Screen left; responses still in flight will be ignored
    pub fn deactivate(&self) {
        self.end_session();
    }

    pub fn view(&self) -> ProfileView {
        self.lock_view().clone()
    }

    pub fn phase(&self) -> Phase {
        self.lock_view().phase
    }

    pub fn fleet(&self) -> Vec<Vehicle> {
        self.lock_view().fleet.clone()
    }

    fn end_session(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn lock_view(&self) -> MutexGuard<'_, ProfileView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
