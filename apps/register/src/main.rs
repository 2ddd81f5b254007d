//! # Torque Register
//!
//! Command-line register for the parts counter.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize Logging                                                  │
//! │     • tracing-subscriber with env filter (RUST_LOG)                     │
//! │                                                                         │
//! │  2. Load Configuration                                                  │
//! │     • register.toml + TORQUE_* environment overrides                    │
//! │                                                                         │
//! │  3. Build Services                                                      │
//! │     • HttpBackend, SaleBook, Checkout / CreditPaymentUpdater            │
//! │                                                                         │
//! │  4. Run the Command                                                     │
//! │     • checkout | sales | settle                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cli;
mod config;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use torque_checkout::{BookEntry, Checkout, CheckoutRequest, CreditPaymentUpdater, SaleBook};
use torque_core::{Cart, SaleId};
use torque_remote::{HttpBackend, SalesBackend};

use crate::cli::{CheckoutArgs, Cli, Command, SalesView};
use crate::config::RegisterConfig;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let config = RegisterConfig::load(cli.config.clone()).context("loading configuration")?;
    info!(
        store = %config.store.name,
        backend = %config.backend.base_url,
        "Register starting"
    );

    let backend: Arc<dyn SalesBackend> =
        Arc::new(HttpBackend::new(&config.backend).context("building backend client")?);
    let book = SaleBook::new();

    match cli.command {
        Command::Checkout(args) => run_checkout(&config, backend, book, args, cli.json).await,
        Command::Sales { view } => list_sales(&config, backend, book, view, cli.json).await,
        Command::Settle {
            sale_id,
            amount,
            receipt_email,
        } => {
            let sale_id = SaleId::new(sale_id);
            load_sale(backend.as_ref(), &book, &sale_id).await?;

            let updater = CreditPaymentUpdater::new(backend, book);
            let settlement = updater
                .settle(&sale_id, amount, receipt_email.as_deref())
                .await?;

            if cli.json {
                print_json(&settlement)?;
            } else {
                println!("{}", settlement.message());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Initializes the tracing subscriber.
///
/// - `RUST_LOG=debug` - everything at debug
/// - `RUST_LOG=torque=trace` - trace for torque crates only
/// - Default: info, debug for torque crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,torque=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_checkout(
    config: &RegisterConfig,
    backend: Arc<dyn SalesBackend>,
    book: SaleBook,
    args: CheckoutArgs,
    json: bool,
) -> Result<ExitCode> {
    let mut cart = Cart::new();
    for line in &args.lines {
        cart.add_line(&line.product, line.floor_price, line.unit_price, line.quantity)
            .with_context(|| format!("adding {} to the cart", line.product.id))?;
    }

    let totals = cart.totals();
    info!(
        lines = totals.line_count,
        quantity = totals.total_quantity,
        total = %config.format_money(totals.total),
        "Cart ready"
    );

    let mut request = CheckoutRequest::new(args.phone, args.method.into());
    request.customer_name = args.name;
    request.receipt_requested = args.receipt_email.is_some();
    request.receipt_email = args.receipt_email;

    let checkout = Checkout::new(backend, book);
    let outcome = checkout.run(&mut cart, &request).await?;

    if json {
        print_json(&outcome)?;
    } else {
        println!("{}", outcome.message());
    }

    Ok(if outcome.needs_attention() {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}

async fn list_sales(
    config: &RegisterConfig,
    backend: Arc<dyn SalesBackend>,
    book: SaleBook,
    view: SalesView,
    json: bool,
) -> Result<ExitCode> {
    book.load_all(backend.as_ref())
        .await
        .context("loading sales")?;

    let entries = match view {
        SalesView::Paid => book.paid().await,
        SalesView::Credit => book.credit().await,
        SalesView::All => {
            let mut all = book.credit().await;
            all.extend(book.paid().await);
            all
        }
    };

    if json {
        print_json(&entries)?;
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", config.store.name);
    println!("{:<12} {:<10} {:>16} {:>16}  {}", "SALE", "CLASS", "TOTAL", "OUTSTANDING", "STATUS");
    for entry in &entries {
        print_entry(config, entry);
    }
    println!("{} sale(s)", entries.len());
    Ok(ExitCode::SUCCESS)
}

fn print_entry(config: &RegisterConfig, entry: &BookEntry) {
    println!(
        "{:<12} {:<10} {:>16} {:>16}  {}",
        entry.sale.id.to_string(),
        entry.classification.to_string(),
        config.format_money(entry.sale.total_amount),
        config.format_money(entry.outstanding()),
        entry.sale.payment_status
    );
}

/// Reads one sale and its payments into the book.
async fn load_sale(backend: &dyn SalesBackend, book: &SaleBook, sale_id: &SaleId) -> Result<()> {
    let sale = backend
        .get_sale(sale_id)
        .await
        .with_context(|| format!("fetching sale {sale_id}"))?;
    let payments = backend
        .list_payments(sale_id)
        .await
        .with_context(|| format!("fetching payments for sale {sale_id}"))?;
    book.record(sale, payments).await;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
