pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod model;
pub mod paginate;
pub mod quiz;
pub mod search;
pub mod service;
pub mod store;
