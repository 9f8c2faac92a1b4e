//! # The Core Types Library
//!
//! This Library provides the essential types for building CKB transactions.
//!
//! Every entity serializes through the codecs compiled from the embedded blockchain schema, see
//! [`packed`].

pub mod prelude;

pub use bytes;
pub use ckb_molecule_compiler as molecule;

pub mod conversion;
pub mod core;
pub mod packed;
pub mod utilities;
