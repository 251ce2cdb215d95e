//! gettsim-personas - Example households for GETTSIM
//!
//! Personas are small, versioned households with known inputs and a list of
//! quantities (targets) to compute for them. They are used to exercise and
//! demonstrate tax-and-transfer calculations at a given policy date.
//!
//! ```no_run
//! use gettsim_personas::persona::PersonaRegistry;
//!
//! # fn main() -> gettsim_personas::Result<()> {
//! let registry = PersonaRegistry::bundled()?;
//! let persona = registry
//!     .get("einkommensteuer_sozialabgaben.couple_1_child")?
//!     .instantiate("2025-01-01", None, None)?;
//! println!("{}", serde_json::to_string_pretty(&persona)?);
//! # Ok(())
//! # }
//! ```

pub mod broadcast;
pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod persona;
pub mod version;

pub use error::{Error, ErrorCode, Result};
