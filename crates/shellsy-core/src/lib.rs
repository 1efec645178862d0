pub mod config;
pub mod logging;

pub mod checksum;
pub mod download;
pub mod exchange_rate;
pub mod filename;
pub mod http;
pub mod retry;
pub mod storage;
pub mod version;
