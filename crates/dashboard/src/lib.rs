mod commands;
mod dashboard;
mod domains;
mod filters;
mod gateway;
mod transport;
mod utils;

pub use commands::*;
pub use dashboard::*;
pub use domains::*;
pub use filters::*;
pub use gateway::*;
pub use transport::*;
pub use utils::*;
