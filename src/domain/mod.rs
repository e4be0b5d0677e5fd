//! Domain types shared by the dashboard's forms, services and API layer.

pub mod auth;
pub mod filter;
pub mod lead;
pub mod lead_list;
pub mod types;
