pub mod config;
pub mod hdiutil;
pub mod kernel_option;
pub mod multi_error;
pub mod retry;
pub mod transient;

pub use hdiutil::DiskUtility;
pub use kernel_option::{KernelOptionPattern, read_line};
pub use multi_error::{CombinedError, MultiError};
pub use retry::{RetryPolicy, Sleeper, ThreadSleeper, retry_after, retry_after_with};
pub use transient::{AttemptError, Transience};
