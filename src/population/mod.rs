pub mod hall_of_fame;
pub mod individual;
#[allow(clippy::module_inception)]
pub mod population;

pub use hall_of_fame::{HallEntry, HallOfFame};
pub use individual::Individual;
pub use population::Population;
