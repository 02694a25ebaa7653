// src/admin/mod.rs

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;


pub use routes::admin_routes;
