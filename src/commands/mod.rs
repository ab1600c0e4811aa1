//! CLI command implementations.

pub mod lookup;
pub mod relay;
pub mod serve;

pub use lookup::LookupCommand;
pub use relay::{RelayCommand, StdoutReplies};
pub use serve::ServeCommand;
