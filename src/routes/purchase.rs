use actix_web::{HttpResponse, Responder, get, web};
use tera::{Context, Tera};

use crate::domain::types::ProductId;
use crate::payments::StripeClient;
use crate::repository::DieselRepository;
use crate::routes::{no_store, render_template};
use crate::services::ServiceError;
use crate::services::checkout::purchase_page as purchase_page_service;

#[get("/products/{product_id}/purchase")]
pub async fn purchase(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    payments: web::Data<StripeClient>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let id = match ProductId::new(product_id.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    match purchase_page_service(id, repo.get_ref(), payments.get_ref()).await {
        Ok((product, client_secret)) => {
            let mut context = Context::new();
            context.insert("current_page", "products");
            context.insert("product", &product);
            context.insert("client_secret", &client_secret);
            context.insert("publishable_key", payments.publishable_key());
            no_store(render_template(&tera, "main/purchase.html", &context))
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render purchase page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
