use crate::domain::product::Product;
use crate::domain::types::ProductId;
use crate::payments::{CreatePaymentIntent, PaymentClient};
use crate::repository::ProductReader;

use super::{ServiceError, ServiceResult};

/// Core business logic for rendering the purchase page.
///
/// Fetches the product and creates a payment intent scoped to its price. The
/// gateway is only called once the product is known to exist. A response
/// without a client secret is unusable by the hosted checkout UI and is
/// treated as fatal.
pub async fn purchase_page<R, P>(
    id: ProductId,
    repo: &R,
    payments: &P,
) -> ServiceResult<(Product, String)>
where
    R: ProductReader,
    P: PaymentClient + ?Sized,
{
    let product = match repo.get_product_by_id(id) {
        Ok(Some(product)) => product,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let request = CreatePaymentIntent {
        amount: i64::from(product.price_in_cents.get()),
        currency: payments.currency().to_string(),
        product_id: product.id,
    };

    let intent = match payments.create_payment_intent(request).await {
        Ok(intent) => intent,
        Err(e) => {
            log::error!("Failed to create payment intent: {e}");
            return Err(ServiceError::Payment(e.to_string()));
        }
    };

    let Some(client_secret) = intent.client_secret else {
        log::error!("Payment gateway returned no client secret for product {id}");
        return Err(ServiceError::Payment(
            "payment gateway returned no client secret".to_string(),
        ));
    };

    Ok((product, client_secret))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::DateTime;
    use parking_lot::Mutex;

    use super::*;
    use crate::payments::{PaymentError, PaymentIntent};
    use crate::repository::test::TestRepository;

    struct RecordingPaymentClient {
        calls: Mutex<Vec<CreatePaymentIntent>>,
        client_secret: Option<String>,
    }

    impl RecordingPaymentClient {
        fn new(client_secret: Option<&str>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                client_secret: client_secret.map(str::to_string),
            }
        }
    }

    #[async_trait]
    impl PaymentClient for RecordingPaymentClient {
        fn currency(&self) -> &str {
            "aud"
        }

        async fn create_payment_intent(
            &self,
            request: CreatePaymentIntent,
        ) -> Result<PaymentIntent, PaymentError> {
            let intent = PaymentIntent {
                id: "pi_test".to_string(),
                amount: request.amount,
                currency: request.currency.clone(),
                client_secret: self.client_secret.clone(),
            };
            self.calls.lock().push(request);
            Ok(intent)
        }
    }

    fn sample_product(id: i32, price_in_cents: i32) -> Product {
        let epoch = DateTime::from_timestamp(0, 0)
            .expect("valid timestamp")
            .naive_utc();
        Product {
            id: id.try_into().expect("valid id"),
            name: "Widget".to_string(),
            description: "A fine widget".to_string(),
            price_in_cents: price_in_cents.try_into().expect("valid price"),
            file_path: "products/x-guide.pdf".to_string(),
            image_path: "/products/x-cover.png".to_string(),
            is_available_for_purchase: true,
            created_at: epoch,
            updated_at: epoch,
        }
    }

    #[actix_web::test]
    async fn unknown_product_makes_no_gateway_call() {
        let repo = TestRepository::new();
        let payments = RecordingPaymentClient::new(Some("cs_test"));

        let err = purchase_page(7.try_into().expect("valid id"), &repo, &payments)
            .await
            .expect_err("missing product");

        assert_eq!(err, ServiceError::NotFound);
        assert!(payments.calls.lock().is_empty());
    }

    #[actix_web::test]
    async fn intent_is_scoped_to_the_product_price() {
        let repo = TestRepository::new().with_products(vec![sample_product(7, 500)]);
        let payments = RecordingPaymentClient::new(Some("cs_test"));

        let (product, client_secret) =
            purchase_page(7.try_into().expect("valid id"), &repo, &payments)
                .await
                .expect("purchase page");

        assert_eq!(product.id.get(), 7);
        assert_eq!(client_secret, "cs_test");

        let calls = payments.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].amount, 500);
        assert_eq!(calls[0].currency, "aud");
        assert_eq!(calls[0].product_id.get(), 7);
    }

    #[actix_web::test]
    async fn missing_client_secret_is_fatal() {
        let repo = TestRepository::new().with_products(vec![sample_product(7, 500)]);
        let payments = RecordingPaymentClient::new(None);

        let err = purchase_page(7.try_into().expect("valid id"), &repo, &payments)
            .await
            .expect_err("no client secret");

        assert!(matches!(err, ServiceError::Payment(_)));
    }
}
