mod config;
mod lock;
mod mutex;
mod status;

pub use config::*;
pub use lock::*;
pub(crate) use mutex::*;
pub use status::*;
