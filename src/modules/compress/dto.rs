use serde::Serialize;
use utoipa::ToSchema;

/// Multipart body accepted by `POST /compress`.
#[derive(ToSchema)]
pub struct CompressForm {
    /// The video to resize and compress.
    #[schema(value_type = String, format = Binary)]
    pub video: Vec<u8>,
}

#[derive(Serialize, ToSchema)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
