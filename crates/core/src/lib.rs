// Jobwire Core - Job instantiation and configuration binding
// NO infrastructure dependencies: the scheduler and the message bus are ports

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{FactoryError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
