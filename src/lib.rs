//! `deadlink_finder` locates the hyperlinks referenced in a project's
//! documentation and checks, for each, whether the target is still
//! reachable. The main struct of this crate is [`ClientBuilder`], which
//! configures the shared HTTP client used for all probes.
//!
//! Checking one project's README end to end:
//!
//! ```no_run
//! use deadlink_finder::{collector, ClientBuilder, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = ClientBuilder::default().build()?;
//!     let links = collector::collect_links(
//!         &client,
//!         "https://github.com/rust-lang/rust",
//!         "master",
//!     )
//!     .await?;
//!     let results = client.check_links(&links).await?;
//!     for (target, status) in &results {
//!         println!("{} {} [{}]", status.icon(), target, status);
//!     }
//!     Ok(())
//! }
//! ```

#[macro_use]
extern crate log;

mod client;
mod error;
mod retry;

pub mod collector;
pub mod extract;
pub mod stats;
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use client::{Client, ClientBuilder};
pub use error::{ErrorKind, Result};
pub use types::{CheckResult, Status};
