use actix_cors::Cors;
use actix_files::Files;
use actix_web::{middleware, web, App, HttpServer};

use promibol::{config::Config, configure_app, db, state::AppState, uploads::PUBLIC_PREFIX};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = run().await {
        eprintln!("Startup error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let config = Config::from_env()?;
    if config.uses_default_secret() {
        log::warn!("JWT_SECRET is not set; using the development secret");
    }

    db::ensure_upload_dir(&config.uploads.dir)?;
    let pool = db::connect(&config.database).await?;
    db::run_migrations(&pool).await?;
    if config.seed_demo_data {
        db::seed_demo_data(&pool).await?;
    }

    let state = AppState::new(pool, &config.auth.jwt_secret, config.uploads.clone());
    let address = config.bind_address();
    let cors_origin = config.server.cors_origin.clone();
    let upload_dir = config.uploads.dir.clone();
    log::info!("Starting Promibol on http://{address}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .service(Files::new(PUBLIC_PREFIX, upload_dir.clone()))
            .configure(configure_app)
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
