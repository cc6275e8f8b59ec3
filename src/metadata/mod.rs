//! ECMA-335 metadata primitives.
//!
//! # Key Components
//!
//! - [`token`] - Metadata table row references used throughout .NET
//! - [`tables`] - Table identifiers, coded indices, index widths and the row types of
//!   every table the builder populates
//! - [`signatures`] - Signature model and blob encoders
//!
//! # References
//!
//! - [ECMA-335 Standard](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Partition II

pub mod signatures;
pub mod tables;
pub mod token;
