//! Rust SDK for ApplyPilot
//!
//! This SDK provides two usage modes:
//!
//! # HTTP Client (default feature)
//!
//! Talk to a running server over its JSON API:
//!
//! ```rust,no_run
//! use applypilot_sdk::{Client, FileTokenStore, StartSessionRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("http://localhost:8000/api/")?
//!         .with_token_store(FileTokenStore::new(".applypilot-token"));
//!     client.login("demo", "demo-password").await?;
//!
//!     for application in client.fetch_my_applications().await? {
//!         println!("{} at {}: {}", application.job_title, application.company_name, application.status);
//!     }
//!
//!     let session = client
//!         .automation()
//!         .start(&StartSessionRequest {
//!             platform_ids: vec!["internshala".into()],
//!             settings: Default::default(),
//!         })
//!         .await?;
//!     println!("session {} is {}", session.id, session.status);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Embedded Runtime (feature = "embedded")
//!
//! Run the whole server inside another Rust application:
//!
//! ```rust,ignore
//! use applypilot_sdk::Runtime;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = Runtime::builder()
//!         .config_path("config.yaml")
//!         .build()
//!         .await?;
//!
//!     runtime.start().await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod token;
pub mod types;

#[cfg(feature = "http-client")]
pub mod client;

#[cfg(feature = "embedded")]
pub mod runtime;

// Re-exports
pub use error::Error;
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::*;

#[cfg(feature = "http-client")]
pub use client::{Client, DEFAULT_BASE_URL};

#[cfg(feature = "embedded")]
pub use runtime::Runtime;
