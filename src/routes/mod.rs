use std::collections::HashMap;

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera, Value};

pub mod admin;
pub mod main;
pub mod purchase;

/// Tera filter rendering an amount of cents as dollars, e.g. `500` -> `$5.00`.
pub fn money_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let cents = value
        .as_i64()
        .ok_or_else(|| tera::Error::msg("money filter expects an amount in cents"))?;
    Ok(Value::String(format!("${}.{:02}", cents / 100, cents % 100)))
}

/// Map a flash message level onto the alert class used by the templates.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Debug => "secondary",
        Level::Info => "info",
        Level::Success => "success",
        Level::Warning => "warning",
        Level::Error => "danger",
    }
}

/// Seed a template context with flash alerts and the current page name.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}

/// Wrap rendered HTML in a response.
pub fn html_response(html: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    html_response(tera.render(template, context).unwrap_or_else(|e| {
        log::error!("Failed to render template '{template}': {e}");
        String::new()
    }))
}

/// Mark a response as uncacheable so every navigation reflects fresh data.
pub fn no_store(mut response: HttpResponse) -> HttpResponse {
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, header::HeaderValue::from_static("no-store"));
    response
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Redirect back to the page the request came from.
pub fn redirect_back(request: &HttpRequest, fallback: &str) -> HttpResponse {
    let location = request
        .headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(fallback);
    redirect(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_filter_formats_cents_as_dollars() {
        let args = HashMap::new();
        assert_eq!(
            money_filter(&Value::from(500), &args).unwrap(),
            Value::String("$5.00".to_string())
        );
        assert_eq!(
            money_filter(&Value::from(1234567), &args).unwrap(),
            Value::String("$12345.67".to_string())
        );
        assert_eq!(
            money_filter(&Value::from(1), &args).unwrap(),
            Value::String("$0.01".to_string())
        );
        assert!(money_filter(&Value::String("abc".to_string()), &args).is_err());
    }
}
