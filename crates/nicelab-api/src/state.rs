//! Shared application state passed to every handler.

use std::sync::Arc;

use nicelab_auth::{AuthGate, LoginService, TokenCache};
use nicelab_core::config::AppConfig;
use nicelab_database::StoreSet;
use nicelab_provision::{CommandExecutor, Provisioner};
use nicelab_service::{ReservationService, UserService};

/// Application state, cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gate: AuthGate,
    pub login: LoginService,
    pub users: UserService,
    pub reservations: ReservationService,
}

impl AppState {
    /// Wire services over `stores` and `executor`.
    ///
    /// The token cache starts empty; call [`AuthGate::warm`] before serving.
    pub fn build(config: AppConfig, stores: StoreSet, executor: Arc<dyn CommandExecutor>) -> Self {
        let cache = Arc::new(TokenCache::new());
        let gate = AuthGate::new(Arc::clone(&cache), Arc::clone(&stores.tokens));
        let login = LoginService::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.tokens),
            cache,
            &config.auth,
        );
        let users = UserService::new(stores.users);
        let provisioner = Provisioner::new(executor, config.provisioning.clone());
        let reservations = ReservationService::new(
            stores.labs,
            stores.sessions,
            provisioner,
            config.provisioning.record_soft_failures,
        );

        Self {
            config: Arc::new(config),
            gate,
            login,
            users,
            reservations,
        }
    }
}
