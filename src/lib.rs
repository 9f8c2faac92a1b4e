//! Client-side CKB transaction building.
//!
//! Re-exports the workspace crates under one roof:
//!
//! * [`molecule`]: the schema compiler producing the binary codecs;
//! * [`types`]: scripts, cells and transactions with their wire layout and hashes;
//! * [`traits`]: the collaborators providing cells, fee rates and witness placeholders;
//! * [`tx_builder`]: input selection and fee completion.

pub use ckb_epoch as epoch;
pub use ckb_error as error;
pub use ckb_hash as hash;
pub use ckb_molecule_compiler as molecule;
pub use ckb_occupied_capacity as occupied_capacity;
pub use ckb_traits as traits;
pub use ckb_tx_builder as tx_builder;
pub use ckb_tx_builder_config as tx_builder_config;
pub use ckb_types as types;
