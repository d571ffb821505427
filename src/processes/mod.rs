pub mod balance;
pub mod report;

pub use balance::*;
pub use report::*;
