pub mod handlers;
pub mod models;
pub mod services;
pub mod config;
pub mod routes;
pub mod errors;
pub mod utils;

use std::sync::Arc;
use config::Config;
use errors::AppResult;
use services::api_client::ApiClient;
use services::auth_service::{AuthService, SessionContext};
use services::course_service::{CourseApi, CourseService};
use services::storage_service::{ImageHost, StorageService};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub config: Config,
    pub api: ApiClient,
    pub courses: Arc<dyn CourseApi>,
    pub images: Arc<dyn ImageHost>,
    pub session: SessionContext,
}

impl AppStateInner {
    pub fn new(config: Config) -> AppResult<Self> {
        let api = ApiClient::new(&config)?;
        let courses: Arc<dyn CourseApi> = Arc::new(CourseService::new(api.clone()));
        let images: Arc<dyn ImageHost> = Arc::new(StorageService::new(&config)?);
        let session = SessionContext::new(Arc::new(AuthService::new(api.clone())));

        Ok(Self {
            config,
            api,
            courses,
            images,
            session,
        })
    }
}
