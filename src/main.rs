use actix_files::Files;
use actix_multipart::form::MultipartFormConfig;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use tera::Tera;
use validator::Validate;

use storefront::cache::PageCache;
use storefront::db::establish_connection_pool;
use storefront::files::FileStore;
use storefront::models::config::ServerConfig;
use storefront::payments::StripeClient;
use storefront::repository::DieselRepository;
use storefront::routes::{admin, main as storefront_pages, purchase};

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("STOREFRONT").separator("__"))
        .build()?
        .try_deserialize()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        log::error!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection pool: {e}");
            std::process::exit(1);
        }
    };

    let mut tera = match Tera::new("templates/**/*.html") {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to load templates: {e}");
            std::process::exit(1);
        }
    };
    tera.register_filter("money", storefront::routes::money_filter);

    let repo = DieselRepository::new(pool);
    let file_store = FileStore::new(&config.media.files_dir, &config.media.public_dir);
    let image_root = file_store.image_serve_root();
    let stripe = StripeClient::new(&config.payments);
    let page_cache = web::Data::new(PageCache::default());

    let secret_key = Key::derive_from(config.secret_key.as_bytes());
    let message_store = CookieMessageStore::builder(secret_key).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let bind_address = config.bind_address.clone();
    log::info!("Starting storefront server at http://{bind_address}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(message_framework.clone())
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(file_store.clone()))
            .app_data(web::Data::new(stripe.clone()))
            .app_data(web::Data::new(tera.clone()))
            .app_data(page_cache.clone())
            .app_data(MultipartFormConfig::default().total_limit(120 * 1024 * 1024))
            .service(storefront_pages::home)
            .service(storefront_pages::show_products)
            .service(storefront_pages::my_orders)
            .service(purchase::purchase)
            .service(admin::dashboard)
            .service(admin::list_products)
            .service(admin::new_product_form)
            .service(admin::add_product)
            .service(admin::edit_product_form)
            .service(admin::update_product)
            .service(admin::toggle_product_availability)
            .service(admin::delete_product)
            .service(admin::download_product_file)
            .service(admin::list_customers)
            .service(admin::list_sales)
            .service(Files::new("/products", image_root.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
