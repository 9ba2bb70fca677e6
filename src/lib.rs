// src/lib.rs

// Biblioteca com todo o domínio; o binário (main.rs) só monta o servidor.
pub mod common;
pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
