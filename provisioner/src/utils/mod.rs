pub mod logging;
pub mod redact;
