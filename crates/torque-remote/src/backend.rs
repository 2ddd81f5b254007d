//! Backend trait: the five calls checkout needs from the REST service.

use async_trait::async_trait;
use torque_core::{Payment, Sale, SaleId};

use crate::error::RemoteResult;
use crate::wire::{CreatePaymentRequest, CreateSaleRequest, CreatedSale};

/// Remote sales service.
///
/// Implemented by [`crate::HttpBackend`] in production and by scripted
/// fakes in tests. Shared as `Arc<dyn SalesBackend>`.
#[async_trait]
pub trait SalesBackend: Send + Sync {
    /// Creates a sale. Not idempotent.
    async fn create_sale(&self, request: &CreateSaleRequest) -> RemoteResult<CreatedSale>;

    /// Records a payment against a sale. Not idempotent.
    async fn create_payment(&self, request: &CreatePaymentRequest) -> RemoteResult<()>;

    /// Payments recorded for one sale.
    async fn list_payments(&self, sale_id: &SaleId) -> RemoteResult<Vec<Payment>>;

    /// Authoritative copy of one sale.
    async fn get_sale(&self, sale_id: &SaleId) -> RemoteResult<Sale>;

    /// All sales visible to this register.
    async fn list_sales(&self) -> RemoteResult<Vec<Sale>>;
}
