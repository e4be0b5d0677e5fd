pub mod domain;
pub mod forms;
pub mod pagination;
pub mod repository;

#[cfg(feature = "server")]
mod app;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod session;

#[cfg(feature = "server")]
pub use app::{configure, run};
