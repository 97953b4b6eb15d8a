use once_cell::sync::Lazy;
use surrealdb::{
    Surreal,
    engine::remote::ws::{Client, Ws},
    opt::auth::Root,
};
use tracing::info;

pub static DB: Lazy<Surreal<Client>> = Lazy::new(Surreal::init);

pub(crate) async fn init_db() -> Result<(), surrealdb::Error> {
    let db_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| String::from("localhost:8000"));
    let username = std::env::var("DATABASE_USER").unwrap_or_else(|_| String::from("root"));
    let password = std::env::var("DATABASE_PASS").unwrap_or_else(|_| String::from("root"));

    DB.connect::<Ws>(db_url.as_str()).await?;
    DB.signin(Root {
        username: &username,
        password: &password,
    })
    .await?;
    DB.use_ns("pilot").use_db("pilot").await?;

    info!(url = %db_url, "connected to SurrealDB");
    Ok(())
}
