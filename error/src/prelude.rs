//! Re-exports of the derives and macros used to define ckb-ccc errors.

pub use crate::{def_error_base_on_kind, impl_error_conversion_with_kind};
pub use thiserror::Error;
