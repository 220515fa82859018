mod http_api;

pub use http_api::{HttpProgressApi, TOKEN_STORAGE_KEY};
