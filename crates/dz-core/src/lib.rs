//! DataZen workspace service.
//!
//! Wires the table cache to the parser and the filter, sort, combine and
//! summary engines. Create one [`Workspace`] per process (or clone it; the
//! cache is shared) and hand it to whatever serves requests.
//!
//! # Example
//!
//! ```ignore
//! use dz_core::Workspace;
//! use dz_ingest::ImportOptions;
//!
//! let workspace = Workspace::default();
//! let (key, _) = workspace.try_import("sales.csv", &bytes, &ImportOptions::default())?;
//! let view = workspace.open_view(&key)?;
//! let rendered = workspace.render(&view)?;
//! ```

mod error;
mod export;
mod workspace;

pub use error::{CoreError, Result};
pub use export::write_csv;
pub use workspace::{CombineOutcome, RenderedView, Workspace};
