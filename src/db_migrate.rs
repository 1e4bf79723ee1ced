use color_eyre::eyre::{Result, WrapErr};
use courtside_api::middleware::auth::hash_password;
use courtside_core::models::user::Role;
use courtside_db::{
    create_pool,
    repositories::user::{self, NewUser},
    schema::initialize_database,
};
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL environment variable must be set")?;

    println!("Connecting to database...");
    let db_pool = create_pool(&database_url).await?;

    println!("Initializing database schema...");
    initialize_database(&db_pool).await?;
    println!("Database schema initialized successfully.");

    // First administrator, only when both credentials are given
    let (Ok(email), Ok(password)) = (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD"))
    else {
        return Ok(());
    };

    if user::get_user_by_email(&db_pool, &email).await?.is_some() {
        println!("Administrator {} already exists, skipping.", email);
        return Ok(());
    }

    let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string());
    let password_hash = hash_password(&password)?;
    let admin = user::create_user(
        &db_pool,
        &NewUser {
            name: &name,
            email: &email,
            password_hash: &password_hash,
            phone: None,
            role: Role::Admin,
        },
        None,
    )
    .await?;
    println!("Created administrator {} ({}).", admin.email, admin.id);

    Ok(())
}
