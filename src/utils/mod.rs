mod errors;
mod clock;

pub use errors::{AmlError, Result};
pub use clock::{unix_now, unix_now_ms};
