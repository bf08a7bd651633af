pub mod model_call;
pub mod params;

pub use model_call::get_model_response;
pub use params::{build_request, CompletionParams, DEFAULT_TEMPERATURE};
