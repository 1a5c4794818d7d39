pub mod auth;
pub mod config;
pub mod handlers;
pub mod routes;

use storereg_service::RegistryService;

#[derive(Clone)]
pub struct AppState {
    pub service: RegistryService,
}
