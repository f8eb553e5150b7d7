use actix_web::{HttpResponse, Responder, get, web};
use tera::{Context, Tera};

use crate::cache::PageCache;
use crate::repository::DieselRepository;
use crate::routes::{html_response, no_store, render_template};
use crate::services::products::{
    show_catalog as show_catalog_service, show_featured as show_featured_service,
};

/// Render a customer listing page through the page cache.
fn cached_listing(
    cache: &PageCache,
    tera: &Tera,
    path: &str,
    template: &str,
    context: &Context,
) -> HttpResponse {
    if let Some(html) = cache.get(path) {
        return html_response(html);
    }

    let html = match tera.render(template, context) {
        Ok(html) => html,
        Err(e) => {
            log::error!("Failed to render template '{template}': {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    cache.store(path, html.clone());
    html_response(html)
}

#[get("/")]
pub async fn home(
    repo: web::Data<DieselRepository>,
    cache: web::Data<PageCache>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_featured_service(repo.get_ref()) {
        Ok(products) => {
            let mut context = Context::new();
            context.insert("current_page", "home");
            context.insert("products", &products);
            cached_listing(&cache, &tera, "/", "main/index.html", &context)
        }
        Err(e) => {
            log::error!("Failed to render home page: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/products")]
pub async fn show_products(
    repo: web::Data<DieselRepository>,
    cache: web::Data<PageCache>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_catalog_service(repo.get_ref()) {
        Ok(products) => {
            let mut context = Context::new();
            context.insert("current_page", "products");
            context.insert("products", &products);
            cached_listing(&cache, &tera, "/products", "main/products.html", &context)
        }
        Err(e) => {
            log::error!("Failed to render products page: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/orders")]
pub async fn my_orders(tera: web::Data<Tera>) -> impl Responder {
    let mut context = Context::new();
    context.insert("current_page", "orders");
    no_store(render_template(&tera, "main/orders.html", &context))
}
