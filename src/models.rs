pub mod auth;
pub mod cart;
pub mod customer;
pub mod employee;
pub mod office;
pub mod order;
pub mod payment;
pub mod product;
pub mod report;
