pub mod item;
pub mod serve;
