pub mod handle;
pub mod postgres;

pub use handle::*;
pub use postgres::*;
