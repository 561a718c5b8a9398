pub mod fuel;
pub mod listing;
pub mod property;
pub mod rate;
pub mod retail;
pub mod snapshot;
pub mod vehicle;

pub use fuel::*;
pub use listing::*;
pub use property::*;
pub use rate::*;
pub use retail::*;
pub use snapshot::*;
pub use vehicle::*;
