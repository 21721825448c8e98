use std::sync::Arc;

use storage::Store;
use storage::services::recompute::RecomputeQueue;
use storage::services::rounds::CourseCatalog;

use crate::middleware::auth::CredentialService;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub recompute: RecomputeQueue,
    pub catalog: Arc<dyn CourseCatalog>,
    pub credentials: Arc<dyn CredentialService>,
}
