pub mod page;
pub mod ranking;
pub mod shuffle;
