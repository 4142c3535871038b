pub mod config;
pub mod logging;

pub mod associate;
pub mod credentials;
pub mod granule;
pub mod http;
pub mod listing;
pub mod product;
pub mod retry;
pub mod storage;
pub mod url_model;
