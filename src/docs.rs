use utoipa::OpenApi;

use crate::common::response::ApiResponse;
use crate::modules::compress::dto::{CompressForm, ServiceInfo};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::compress::handler::compress_video,
        crate::modules::compress::handler::service_info,
    ),
    components(
        schemas(CompressForm, ServiceInfo, ApiResponse<ServiceInfo>)
    ),
    tags(
        (name = "Compress", description = "Video resize and compression"),
        (name = "Service", description = "Service status")
    )
)]
pub struct ApiDoc;
