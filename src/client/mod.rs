pub mod headers;
pub mod transport;

pub use headers::build_request_headers;
pub use transport::{HttpTransport, Transport};
