use actix_multipart::form::MultipartForm;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::{Context, Tera};

use crate::cache::PageCache;
use crate::domain::types::ProductId;
use crate::files::FileStore;
use crate::forms::FieldErrors;
use crate::forms::products::{ProductForm, ProductFormValues};
use crate::repository::DieselRepository;
use crate::routes::{base_context, no_store, redirect, redirect_back, render_template};
use crate::services::ServiceError;
use crate::services::admin::{
    dashboard_stats as dashboard_stats_service, list_customers as list_customers_service,
    list_sales as list_sales_service,
};
use crate::services::products::{
    create_product as create_product_service, delete_product as delete_product_service,
    download_product_file as download_product_file_service, get_product as get_product_service,
    list_products as list_products_service,
    toggle_product_availability as toggle_product_availability_service,
    update_product as update_product_service,
};

#[derive(Deserialize)]
struct ToggleAvailabilityForm {
    available: bool,
}

/// Re-render the product form with validation errors and the entered values.
fn product_form_page(
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
    action: &str,
    values: &ProductFormValues,
    errors: &FieldErrors,
) -> HttpResponse {
    let mut context = base_context(flash_messages, "products");
    context.insert("action", action);
    context.insert("values", values);
    context.insert("errors", errors);
    no_store(render_template(tera, "admin/products/form.html", &context))
}

#[get("/admin")]
pub async fn dashboard(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match dashboard_stats_service(repo.get_ref()) {
        Ok(stats) => {
            let mut context = base_context(&flash_messages, "dashboard");
            context.insert("stats", &stats);
            no_store(render_template(&tera, "admin/index.html", &context))
        }
        Err(err) => {
            log::error!("Failed to render admin dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/products")]
pub async fn list_products(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match list_products_service(repo.get_ref()) {
        Ok(products) => {
            let mut context = base_context(&flash_messages, "products");
            context.insert("products", &products);
            no_store(render_template(&tera, "admin/products/index.html", &context))
        }
        Err(err) => {
            log::error!("Failed to render admin product list: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/products/new")]
pub async fn new_product_form(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    product_form_page(
        &flash_messages,
        &tera,
        "/admin/products/new",
        &ProductFormValues::default(),
        &FieldErrors::new(),
    )
}

#[post("/admin/products/new")]
pub async fn add_product(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    files: web::Data<FileStore>,
    cache: web::Data<PageCache>,
    tera: web::Data<Tera>,
    MultipartForm(form): MultipartForm<ProductForm>,
) -> impl Responder {
    let values = form.values();
    let payload = match form.into_create_payload() {
        Ok(payload) => payload,
        Err(errors) => {
            return product_form_page(
                &flash_messages,
                &tera,
                "/admin/products/new",
                &values,
                &errors,
            );
        }
    };

    match create_product_service(payload, repo.get_ref(), files.get_ref(), cache.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Product created.").send();
            redirect("/admin/products")
        }
        Err(err) => {
            log::error!("Failed to create product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/products/{product_id}/edit")]
pub async fn edit_product_form(
    product_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let id = match ProductId::new(product_id.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    match get_product_service(id, repo.get_ref()) {
        Ok(product) => {
            let values = ProductFormValues {
                name: product.name.clone(),
                description: product.description.clone(),
                price_in_cents: product.price_in_cents.to_string(),
            };
            let mut context = base_context(&flash_messages, "products");
            context.insert("action", &format!("/admin/products/{id}/edit"));
            context.insert("values", &values);
            context.insert("errors", &FieldErrors::new());
            context.insert("product", &product);
            no_store(render_template(&tera, "admin/products/form.html", &context))
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render product edit page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/products/{product_id}/edit")]
pub async fn update_product(
    product_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    files: web::Data<FileStore>,
    cache: web::Data<PageCache>,
    tera: web::Data<Tera>,
    MultipartForm(form): MultipartForm<ProductForm>,
) -> impl Responder {
    let id = match ProductId::new(product_id.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    let values = form.values();
    let payload = match form.into_update_payload() {
        Ok(payload) => payload,
        Err(errors) => {
            return product_form_page(
                &flash_messages,
                &tera,
                &format!("/admin/products/{id}/edit"),
                &values,
                &errors,
            );
        }
    };

    match update_product_service(id, payload, repo.get_ref(), files.get_ref(), cache.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Product updated.").send();
            redirect("/admin/products")
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to update product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/products/{product_id}/toggle")]
pub async fn toggle_product_availability(
    request: HttpRequest,
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<PageCache>,
    web::Form(form): web::Form<ToggleAvailabilityForm>,
) -> impl Responder {
    let id = match ProductId::new(product_id.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    match toggle_product_availability_service(id, form.available, repo.get_ref(), cache.get_ref())
    {
        Ok(()) => {
            if form.available {
                FlashMessage::success("Product activated.").send();
            } else {
                FlashMessage::success("Product deactivated.").send();
            }
            redirect_back(&request, "/admin/products")
        }
        Err(err) => {
            log::error!("Failed to toggle product availability: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/products/{product_id}/delete")]
pub async fn delete_product(
    request: HttpRequest,
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    files: web::Data<FileStore>,
    cache: web::Data<PageCache>,
) -> impl Responder {
    let id = match ProductId::new(product_id.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    match delete_product_service(id, repo.get_ref(), files.get_ref(), cache.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Product deleted.").send();
            redirect_back(&request, "/admin/products")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect_back(&request, "/admin/products")
        }
        Err(err) => {
            log::error!("Failed to delete product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/products/{product_id}/download")]
pub async fn download_product_file(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    files: web::Data<FileStore>,
) -> impl Responder {
    let id = match ProductId::new(product_id.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    match download_product_file_service(id, repo.get_ref(), files.get_ref()) {
        Ok(file) => HttpResponse::Ok()
            .append_header(("Content-Type", "application/octet-stream"))
            .append_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", file.file_name),
            ))
            .body(file.bytes),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to download product file: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/users")]
pub async fn list_customers(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match list_customers_service(repo.get_ref()) {
        Ok(customers) => {
            let mut context = base_context(&flash_messages, "customers");
            context.insert("customers", &customers);
            no_store(render_template(&tera, "admin/users/index.html", &context))
        }
        Err(err) => {
            log::error!("Failed to render customers page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/orders")]
pub async fn list_sales(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match list_sales_service(repo.get_ref()) {
        Ok(sales) => {
            let mut context = base_context(&flash_messages, "sales");
            context.insert("sales", &sales);
            no_store(render_template(&tera, "admin/orders/index.html", &context))
        }
        Err(err) => {
            log::error!("Failed to render sales page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
