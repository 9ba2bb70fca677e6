// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use classicmodels_backend::{
    common::db_utils::sync_id_sequences,
    config::{AppState, Config},
    handlers,
    middleware::auth::auth_guard,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Inicializa o logger (RUST_LOG, padrão "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Sequências à frente dos dados históricos importados
    sync_id_sequences(&app_state.db_pool).await?;

    let app = router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(app_state: AppState) -> Router {
    // Rotas públicas: login, cadastro e vitrine
    let public_routes = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/customers/signup", post(handlers::customers::signup))
        .route("/api/product-lines", get(handlers::catalog::list_product_lines))
        .route("/api/product-lines/{line}/products", get(handlers::catalog::products_by_line))
        .route("/api/product-lines/{line}/popular", get(handlers::catalog::popular_products))
        .route("/api/products/{code}", get(handlers::catalog::get_product))
        .route("/api/offices", get(handlers::offices::list_offices))
        .route("/api/offices/{code}", get(handlers::offices::get_office));

    // Rotas protegidas pelo middleware
    let protected_routes = Router::new()
        // Sessão
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/change-password", post(handlers::auth::change_password))
        .route("/api/auth/me", get(handlers::auth::get_me))
        // Carrinho
        .route("/api/cart", get(handlers::cart::view_cart))
        .route("/api/cart/items", post(handlers::cart::add_item))
        .route(
            "/api/cart/items/{code}",
            put(handlers::cart::update_item).delete(handlers::cart::remove_item),
        )
        .route("/api/cart/checkout", post(handlers::cart::checkout))
        // Pedidos
        .route("/api/orders", get(handlers::orders::list_orders))
        .route("/api/orders/{number}", get(handlers::orders::get_order))
        .route("/api/orders/{number}/cancel", post(handlers::orders::cancel_order))
        .route("/api/orders/{number}/comment", put(handlers::orders::update_comment))
        .route(
            "/api/order-items/{id}",
            put(handlers::orders::update_item).delete(handlers::orders::delete_item),
        )
        // Minha conta (cliente)
        .route(
            "/api/customers/me",
            get(handlers::customers::get_my_profile)
                .put(handlers::customers::update_my_profile)
                .delete(handlers::customers::delete_my_account),
        )
        .route("/api/customers/me/balance", get(handlers::customers::get_my_balance))
        .route("/api/customers/me/deletion", get(handlers::customers::get_deletion_eligibility))
        .route(
            "/api/payments",
            post(handlers::customers::record_payment).get(handlers::customers::list_payments),
        )
        // Equipe
        .route("/api/customers", get(handlers::customers::list_customers))
        .route("/api/customers/{number}", get(handlers::customers::get_customer))
        .route("/api/customers/{number}/orders", get(handlers::orders::list_customer_orders))
        .route("/api/employees", post(handlers::employees::create_employee))
        .route("/api/employees/dashboard", get(handlers::employees::dashboard))
        .route("/api/employees/reports", post(handlers::employees::create_report))
        .route("/api/employees/{id}/terminate", post(handlers::employees::terminate))
        // Administração
        .route(
            "/api/admin/products",
            get(handlers::catalog::list_products).post(handlers::catalog::create_product),
        )
        .route(
            "/api/admin/products/{code}",
            put(handlers::catalog::update_product).delete(handlers::catalog::delete_product),
        )
        .route("/api/admin/offices", post(handlers::offices::create_office))
        .route(
            "/api/admin/offices/{code}",
            put(handlers::offices::update_office).delete(handlers::offices::delete_office),
        )
        // Relatórios
        .route("/api/reports/sales-by-office", get(handlers::reports::sales_by_office))
        .route("/api/reports/sales-by-product-line", get(handlers::reports::sales_by_product_line))
        .route("/api/reports/employee-performance", get(handlers::reports::employee_performance))
        .route("/api/reports/offices-without-orders", get(handlers::reports::offices_without_orders))
        .route("/api/reports/employees-without-orders", get(handlers::reports::employees_without_orders))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Combina tudo no router principal
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}
