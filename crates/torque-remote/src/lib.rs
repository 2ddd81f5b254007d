//! # torque-remote: REST Backend Client for Torque POS
//!
//! The contract with the shop's sales service, and the only place that
//! knows what its JSON looks like.
//!
//! ## Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  torque-checkout                                                        │
//! │      │  Arc<dyn SalesBackend>                                           │
//! │      ▼                                                                  │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐                 │
//! │  │  backend.rs  │   │  client.rs   │   │  config.rs   │                 │
//! │  │  trait       │◄──│  HttpBackend │◄──│  [backend]   │                 │
//! │  └──────────────┘   └──────┬───────┘   └──────────────┘                 │
//! │                            │                                            │
//! │              ┌─────────────┴─────────────┐                              │
//! │              ▼                           ▼                              │
//! │       ┌──────────────┐           ┌──────────────┐                       │
//! │       │ envelope.rs  │──payload─►│   wire.rs    │──► torque-core types  │
//! │       └──────────────┘           └──────────────┘                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod backend;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod wire;

pub use backend::SalesBackend;
pub use client::HttpBackend;
pub use config::BackendConfig;
pub use error::{RemoteError, RemoteResult};
pub use wire::{CreatePaymentRequest, CreateSaleRequest, CreatedSale, SaleLineRequest};
