use crate::routes::{health, sync, updates};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "collegeconnect-server",
    description = "Campus notice board with CampusFlow sync",
    version = "0.1.0"
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(updates::UpdatesApi::openapi());
    root.merge(sync::SyncApi::openapi());
    root.merge(health::HealthApi::openapi());
    root
}
