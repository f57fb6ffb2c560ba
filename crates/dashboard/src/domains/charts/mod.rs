mod consumption;
mod price_evolution;

pub use consumption::*;
pub use price_evolution::*;
