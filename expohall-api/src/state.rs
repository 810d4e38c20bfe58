use expohall_catalog::repository::ExpoRepository;
use expohall_core::feedback::FeedbackRepository;
use expohall_core::users::UserRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub expos: Arc<dyn ExpoRepository>,
    pub users: Arc<dyn UserRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
    pub auth: AuthConfig,
}
