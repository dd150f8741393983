//! # rfe-service
//!
//! Query service for the RFE antibioprophylaxis dataset, plus a gRPC
//! binding.
//!
//! [`QueryService`] answers read-only questions against one immutable
//! [`Dataset`](rfe_loader::Dataset). [`DatasetHandle`] holds the active
//! dataset behind an atomically swappable reference so that a server can
//! hot-reload the document without blocking readers. [`RfeServer`] maps
//! both onto the `ProphylaxisService` and `AdminService` gRPC services.
//!
//! ```rust
//! use rfe_loader::{load_from_str, LoadConfig};
//! use rfe_service::DatasetHandle;
//!
//! let handle = DatasetHandle::new();
//! assert!(handle.query().is_err());
//!
//! let json = r#"{
//!     "metadata": {"source": "SFAR", "version": "2.0", "date_extraction": "2024-11-05"},
//!     "recommandations_generales": {"timing": "30 min avant incision"},
//!     "data": [{"specialite": "Urologie", "acte": "Néphrectomie"}]
//! }"#;
//! handle.install(load_from_str(json, LoadConfig::default()).unwrap());
//!
//! let query = handle.query().unwrap();
//! assert_eq!(query.search_by_procedure("nephrectomie").len(), 1);
//! ```

#![warn(missing_docs)]

#[allow(missing_docs)]
pub mod proto {
    //! Generated protobuf types.
    tonic::include_proto!("rfe");
}

mod handle;
mod query;
mod server;

pub use handle::{DatasetHandle, ServiceError};
pub use query::{DatasetInfo, QueryService, SpecialtySummary};
pub use server::RfeServer;
