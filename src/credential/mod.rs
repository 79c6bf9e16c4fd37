//! Credential module: pooled secrets, rotation under quota exhaustion, daily reset
pub mod clock;
pub mod pool;

pub use self::clock::{Clock, ManualClock, SystemClock};
pub use self::pool::{Credential, CredentialPool, PoolStatus};
