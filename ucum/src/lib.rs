//! # UCUM Engine
//!
//! **Units of measure that mean business**
//!
//! Validation, canonicalization and conversion of expressions in the
//! Unified Code for Units of Measure, with exact decimal arithmetic.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ucum::{Decimal, Engine, UcumResult};
//!
//! fn main() -> UcumResult<()> {
//!     let engine = Engine::new();
//!
//!     let inch = engine.validate("[in_i]")?;
//!     let meter = engine.validate("m")?;
//!
//!     let converted = engine.convert(&Decimal::one(), &inch, &meter)?;
//!     assert_eq!(converted.value.to_string(), "0.0254");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Terms
//! A term is a parsed unit expression such as `kg.m/s2`. Terms built only
//! from base units are canonical; anything else is mixed.
//!
//! ### Canonical form
//! Canonicalizing replaces every unit by its definition down to the seven
//! base units and collects the scale in one magnitude. Special units such
//! as `Cel` or `[pH]` carry a conversion function instead.
//!
//! ### Decimals
//! Measured values track whether they are exact or limited by the digits
//! they were written with, and results keep the precision of their inputs.

pub mod canonicalizer;
pub mod config;
pub mod converter;
pub mod decimal;
pub mod dimension;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod flattener;
pub mod parser;
pub mod persistence;
pub mod printer;
pub mod registry;
pub mod relation;
pub mod resource_limits;
pub mod special;
pub mod term;
pub mod validator;

pub use canonicalizer::{CanonicalStep, Canonicalizer, Direction};
pub use config::{Configuration, ConfigurationBuilder, FeatureFlags};
pub use converter::{Conversion, Converted, Converter};
pub use decimal::Decimal;
pub use dimension::{Dimension, DimensionVector};
pub use engine::{Canonicalized, Engine, MolarMassProvider};
pub use error::UcumError;
pub use flattener::{flatten, flatten_and_cancel, AlphabeticalSorter, FlatTerm, Sorter};
pub use parser::parse;
pub use persistence::{InMemoryPersistence, PersistenceError, PersistenceProvider, PersistenceRegistry};
pub use printer::PrintStyle;
pub use registry::{EssenceRegistry, Registry};
pub use relation::Relation;
pub use resource_limits::ResourceLimits;
pub use special::{ConversionFunction, SpecialFunctions};
pub use term::{CanonicalTerm, CombineTermBuilder, MixedTerm, Operator, SoloTermBuilder, Term};
pub use validator::Validator;

/// Result type for UCUM operations
pub type UcumResult<T> = Result<T, UcumError>;

#[cfg(test)]
mod tests;
