pub mod config;
pub mod error;
pub mod retry;
pub mod session;
pub mod smoke;

pub use config::{Browser, SmokeConfig};
pub use error::{Error, Result};
pub use retry::RetryPolicy;
pub use session::{Driver, Session};
