// src/config/mod.rs

//! Declaration loading and validation for dagrun.
//!
//! Responsibilities:
//! - Define the TOML-backed declaration model (`model.rs`).
//! - Load a declaration from disk (`loader.rs`).
//! - Run the ordered structural checks and the cycle check (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{declaration_dir, load_and_validate, load_from_path, parse_str};
pub use model::{RawDag, TaskDecl};
pub use validate::{check_cycles, validate};
