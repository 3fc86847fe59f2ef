#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod config;
pub mod core;
pub mod demo;
pub mod event;
pub mod index;
pub mod listener;
pub mod stats;
pub mod storage;
