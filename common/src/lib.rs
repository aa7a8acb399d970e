pub mod config;
pub mod games;
pub mod logger;
pub mod storage;
