pub mod adapter;
pub mod journal;
pub mod memory;
