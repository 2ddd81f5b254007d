//! # HTTP Backend
//!
//! [`SalesBackend`] over the shop's REST API using reqwest.
//!
//! ## Request Flow
//! ```text
//! ┌────────────┐   JSON    ┌──────────────┐  status  ┌──────────────────┐
//! │  wire.rs   │ ────────► │   reqwest    │ ───────► │ handle_response  │
//! │  requests  │           │  (+ bearer)  │          │  non-2xx → Status│
//! └────────────┘           └──────────────┘          └────────┬─────────┘
//!                                                             │ body
//!                                                             ▼
//!                                                   ┌──────────────────┐
//!                                                   │  envelope.rs     │
//!                                                   │  bare | {data}   │
//!                                                   └────────┬─────────┘
//!                                                            ▼
//!                                                   wire.rs decoders
//! ```
//!
//! No retries happen here. Sale and payment writes are not idempotent.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use torque_core::{Payment, Sale, SaleId};
use tracing::{debug, warn};

use crate::backend::SalesBackend;
use crate::config::{join, BackendConfig};
use crate::envelope::{status_message, unwrap_body};
use crate::error::{RemoteError, RemoteResult};
use crate::wire::{
    list_items, payment_from_value, sale_from_value, CreatePaymentRequest, CreateSaleRequest,
    CreatedSale,
};

/// REST implementation of [`SalesBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    sales_url: String,
    payments_url: String,
    token: Option<String>,
}

impl HttpBackend {
    /// Builds a client from validated configuration.
    pub fn new(config: &BackendConfig) -> RemoteResult<Self> {
        let base = config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(HttpBackend {
            client,
            sales_url: join(base.as_str(), &config.sales_path),
            payments_url: join(base.as_str(), &config.payments_path),
            token: config.token().map(str::to_string),
        })
    }

    /// URL of the sales collection.
    pub fn sales_url(&self) -> &str {
        &self.sales_url
    }

    /// URL of the payments collection.
    pub fn payments_url(&self) -> &str {
        &self.payments_url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a request and returns the unwrapped payload.
    async fn send(&self, request: RequestBuilder) -> RemoteResult<Value> {
        let response = self.authorized(request).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response(&self, response: reqwest::Response) -> RemoteResult<Value> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message: status_message(&text),
            });
        }

        unwrap_body(&text)
    }
}

#[async_trait]
impl SalesBackend for HttpBackend {
    async fn create_sale(&self, request: &CreateSaleRequest) -> RemoteResult<CreatedSale> {
        debug!(
            url = %self.sales_url,
            lines = request.items.len(),
            "Creating sale"
        );
        let payload = self.send(self.client.post(&self.sales_url).json(request)).await?;
        Ok(CreatedSale::from_value(&payload))
    }

    async fn create_payment(&self, request: &CreatePaymentRequest) -> RemoteResult<()> {
        debug!(
            url = %self.payments_url,
            sale_id = %request.sale_id,
            method = %request.payment_method,
            amount = %request.amount,
            reference = %request.reference,
            "Creating payment"
        );
        self.send(self.client.post(&self.payments_url).json(request))
            .await
            .map(|_| ())
    }

    async fn list_payments(&self, sale_id: &SaleId) -> RemoteResult<Vec<Payment>> {
        let request = self
            .client
            .get(&self.payments_url)
            .query(&[("saleId", sale_id.as_str())]);
        let payload = self.send(request).await?;

        let mut payments = Vec::new();
        for item in list_items(payload) {
            match payment_from_value(&item) {
                // Filter client-side too: older backends ignore the query
                Ok(payment) if payment.sale_id.as_ref().is_some_and(|id| id != sale_id) => {}
                Ok(payment) => payments.push(payment),
                Err(err) => warn!(sale_id = %sale_id, error = %err, "Skipping undecodable payment"),
            }
        }

        debug!(sale_id = %sale_id, count = payments.len(), "Fetched payments");
        Ok(payments)
    }

    async fn get_sale(&self, sale_id: &SaleId) -> RemoteResult<Sale> {
        let url = join(&self.sales_url, sale_id.as_str());
        let payload = self.send(self.client.get(&url)).await?;
        sale_from_value(&payload)
    }

    async fn list_sales(&self) -> RemoteResult<Vec<Sale>> {
        let payload = self.send(self.client.get(&self.sales_url)).await?;

        let mut sales = Vec::new();
        for item in list_items(payload) {
            match sale_from_value(&item) {
                Ok(sale) => sales.push(sale),
                Err(err) => warn!(error = %err, "Skipping undecodable sale"),
            }
        }

        debug!(count = sales.len(), "Fetched sales");
        Ok(sales)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let backend = HttpBackend::new(&BackendConfig {
            base_url: "https://pos.example.com/api/v2/".to_string(),
            sales_path: "/sales".to_string(),
            payments_path: "sale-payments".to_string(),
            api_token: Some("secret".to_string()),
            request_timeout_secs: Some(10),
        })
        .unwrap();

        assert_eq!(backend.sales_url(), "https://pos.example.com/api/v2/sales");
        assert_eq!(backend.payments_url(), "https://pos.example.com/api/v2/sale-payments");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = HttpBackend::new(&BackendConfig {
            base_url: "localhost".to_string(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, RemoteError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let backend = HttpBackend::new(&BackendConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: Some(2),
            ..Default::default()
        })
        .unwrap();

        let err = backend.list_sales().await.unwrap_err();
        assert!(err.is_transport());
    }
}
