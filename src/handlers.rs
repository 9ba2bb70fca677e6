pub mod auth;
pub mod cart;
pub mod catalog;
pub mod customers;
pub mod employees;
pub mod offices;
pub mod orders;
pub mod reports;
