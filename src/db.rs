pub mod auth_repo;
pub use auth_repo::AuthRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod employee_repo;
pub use employee_repo::EmployeeRepository;
pub mod office_repo;
pub use office_repo::OfficeRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
