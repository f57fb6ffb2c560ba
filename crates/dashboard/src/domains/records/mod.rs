mod filtered_view;
mod record;
mod record_store;

pub use filtered_view::*;
pub use record::*;
pub use record_store::*;
