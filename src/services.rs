pub mod account_service;
pub mod auth;
pub mod balance_service;
pub mod cart_service;
pub mod catalog_service;
pub mod customer_service;
pub mod employee_service;
pub mod office_service;
pub mod order_service;
pub mod report_service;

pub use account_service::AccountService;
pub use auth::AuthService;
pub use balance_service::BalanceService;
pub use cart_service::{CartService, CartStore};
pub use catalog_service::CatalogService;
pub use customer_service::CustomerService;
pub use employee_service::EmployeeService;
pub use office_service::OfficeService;
pub use order_service::OrderService;
pub use report_service::ReportService;
