//! HTTP handlers

pub mod contact;
pub mod feed;
pub mod health;
pub mod routes;
