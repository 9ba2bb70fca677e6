// build.rs

// Os testes de integração usam um Postgres real. Com DATABASE_URL definida
// eles rodam no `cargo test` normal; sem ela ficam marcados como ignorados.
fn main() {
    println!("cargo::rerun-if-changed=build.rs");
    println!("cargo::rerun-if-env-changed=DATABASE_URL");
    println!("cargo::rustc-check-cfg=cfg(database_tests)");

    let has_database = std::env::var("DATABASE_URL").is_ok_and(|url| !url.trim().is_empty());
    if has_database {
        println!("cargo::rustc-cfg=database_tests");
    }
}
