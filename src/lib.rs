pub mod audit;
pub mod catalog;
pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod reactive;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
