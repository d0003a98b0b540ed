//! Tracing/logging setup shared by the workshop binaries.

/// Subscriber configuration (filters, output format).
pub mod subscriber;

pub use subscriber::{LOG_FORMAT_VAR, LogFormat, UnknownLogFormat};

/// Initialize process-wide logging.
///
/// The filter comes from `RUST_LOG` (default `info`), the output format from
/// `WORKSHOP_LOG_FORMAT`. Safe to call multiple times; later calls are no-ops.
pub fn init() {
    subscriber::init(LogFormat::from_env());
}
