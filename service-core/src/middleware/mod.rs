pub mod metrics;
pub mod panic;
pub mod tracing;

pub use self::metrics::metrics_middleware;
pub use self::panic::panic_boundary;
pub use self::tracing::{REQUEST_ID_HEADER, request_id_middleware};
