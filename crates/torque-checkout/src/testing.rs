//! Scripted in-memory backend for pipeline tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use torque_core::{Money, Payment, PaymentMethod, Sale, SaleId};
use torque_remote::{
    CreatePaymentRequest, CreateSaleRequest, CreatedSale, RemoteError, RemoteResult, SalesBackend,
};

/// Number of times each endpoint was hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calls {
    pub create_sale: usize,
    pub create_payment: usize,
    pub list_payments: usize,
    pub get_sale: usize,
    pub list_sales: usize,
}

impl Calls {
    pub fn total(&self) -> usize {
        self.create_sale + self.create_payment + self.list_payments + self.get_sale + self.list_sales
    }
}

#[derive(Default)]
struct State {
    created: Option<CreatedSale>,
    fail_sale_creation: bool,
    fail_payments: bool,
    lose_payment_responses: bool,
    fail_payment_reads: bool,
    fail_sale_reads: bool,
    sales: HashMap<SaleId, Sale>,
    payments: Vec<Payment>,
    payment_requests: Vec<CreatePaymentRequest>,
    sale_requests: Vec<CreateSaleRequest>,
    calls: Calls,
}

#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
    hold_sale_creation: Option<Arc<Notify>>,
}

fn server_error() -> RemoteError {
    RemoteError::Status {
        status: 502,
        message: "Bad gateway".to_string(),
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Response to the next sale creation. The sale becomes readable.
    pub fn with_created_sale(self, created: CreatedSale) -> Self {
        self.state.lock().unwrap().created = Some(created);
        self
    }

    pub fn failing_sale_creation(self) -> Self {
        self.state.lock().unwrap().fail_sale_creation = true;
        self
    }

    /// Payment writes fail and are not recorded.
    pub fn failing_payments(self) -> Self {
        self.state.lock().unwrap().fail_payments = true;
        self
    }

    /// Payment writes are recorded but the response reports failure.
    pub fn losing_payment_responses(self) -> Self {
        self.state.lock().unwrap().lose_payment_responses = true;
        self
    }

    pub fn failing_payment_reads(self) -> Self {
        self.state.lock().unwrap().fail_payment_reads = true;
        self
    }

    pub fn failing_sale_reads(self) -> Self {
        self.state.lock().unwrap().fail_sale_reads = true;
        self
    }

    pub fn with_sale(self, sale: Sale) -> Self {
        self.state.lock().unwrap().sales.insert(sale.id.clone(), sale);
        self
    }

    pub fn with_payment(self, payment: Payment) -> Self {
        self.state.lock().unwrap().payments.push(payment);
        self
    }

    /// Sale creation waits until `release` is notified.
    pub fn holding_sale_creation(mut self, release: Arc<Notify>) -> Self {
        self.hold_sale_creation = Some(release);
        self
    }

    pub fn calls(&self) -> Calls {
        self.state.lock().unwrap().calls
    }

    pub fn payment_requests(&self) -> Vec<CreatePaymentRequest> {
        self.state.lock().unwrap().payment_requests.clone()
    }

    pub fn sale_requests(&self) -> Vec<CreateSaleRequest> {
        self.state.lock().unwrap().sale_requests.clone()
    }
}

#[async_trait]
impl SalesBackend for FakeBackend {
    async fn create_sale(&self, request: &CreateSaleRequest) -> RemoteResult<CreatedSale> {
        if let Some(release) = &self.hold_sale_creation {
            release.notified().await;
        }

        let mut state = self.state.lock().unwrap();
        state.calls.create_sale += 1;
        state.sale_requests.push(request.clone());

        if state.fail_sale_creation {
            return Err(server_error());
        }

        let created = state.created.clone().unwrap_or(CreatedSale {
            id: None,
            total: None,
            status: None,
        });

        if let Some(id) = &created.id {
            let total = created.total.unwrap_or_else(|| {
                request
                    .items
                    .iter()
                    .filter_map(|item| item.unit_price.multiply_quantity(item.quantity))
                    .sum()
            });
            state
                .sales
                .entry(id.clone())
                .or_insert_with(|| sale(id.as_str(), "", total.cents()));
        }

        Ok(created)
    }

    async fn create_payment(&self, request: &CreatePaymentRequest) -> RemoteResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.create_payment += 1;
        state.payment_requests.push(request.clone());

        if state.fail_payments {
            return Err(server_error());
        }

        let payment_id = format!("P{}", state.payments.len() + 1);
        state.payments.push(Payment {
            id: Some(payment_id),
            sale_id: Some(request.sale_id.clone()),
            method: request.payment_method.clone(),
            amount: request.amount,
            reference: Some(request.reference.clone()),
            paid_at: None,
        });

        if state.lose_payment_responses {
            return Err(server_error());
        }
        Ok(())
    }

    async fn list_payments(&self, sale_id: &SaleId) -> RemoteResult<Vec<Payment>> {
        let mut state = self.state.lock().unwrap();
        state.calls.list_payments += 1;

        if state.fail_payment_reads {
            return Err(server_error());
        }

        Ok(state
            .payments
            .iter()
            .filter(|p| p.sale_id.as_ref() == Some(sale_id))
            .cloned()
            .collect())
    }

    async fn get_sale(&self, sale_id: &SaleId) -> RemoteResult<Sale> {
        let mut state = self.state.lock().unwrap();
        state.calls.get_sale += 1;

        if state.fail_sale_reads {
            return Err(server_error());
        }

        state.sales.get(sale_id).cloned().ok_or(RemoteError::Status {
            status: 404,
            message: "Sale not found".to_string(),
        })
    }

    async fn list_sales(&self) -> RemoteResult<Vec<Sale>> {
        let mut state = self.state.lock().unwrap();
        state.calls.list_sales += 1;

        if state.fail_sale_reads {
            return Err(server_error());
        }

        let mut sales: Vec<Sale> = state.sales.values().cloned().collect();
        sales.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(sales)
    }
}

pub fn sale(id: &str, status: &str, total_cents: i64) -> Sale {
    Sale {
        id: SaleId::from(id),
        number: None,
        customer_phone: "0712345678".to_string(),
        customer_name: None,
        total_amount: Money::from_cents(total_cents),
        payment_status: status.to_string(),
        items: Vec::new(),
        created_at: None,
    }
}

pub fn payment(sale_id: &str, method: PaymentMethod, cents: i64) -> Payment {
    Payment {
        id: None,
        sale_id: Some(SaleId::from(sale_id)),
        method,
        amount: Money::from_cents(cents),
        reference: None,
        paid_at: None,
    }
}

pub fn created(id: &str, total_cents: i64) -> CreatedSale {
    CreatedSale {
        id: Some(SaleId::from(id)),
        total: Some(Money::from_cents(total_cents)),
        status: None,
    }
}
