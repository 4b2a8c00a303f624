#![cfg(not(tarpaulin_include))]

mod batch;
mod files;
mod throughput;

pub use batch::*;
pub use files::*;
pub use throughput::*;
