use crate::routes::{characters, locations, moments};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "lore-server",
    description = "Multi-tenant graph store for narrative moments, characters and locations",
    version = "0.1.0",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(moments::MomentsApi::openapi());
    root.merge(characters::CharactersApi::openapi());
    root.merge(locations::LocationsApi::openapi());
    root
}
