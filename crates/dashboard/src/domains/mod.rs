mod charts;
mod kpis;
mod records;
mod search;

pub use charts::*;
pub use kpis::*;
pub use records::*;
pub use search::*;
