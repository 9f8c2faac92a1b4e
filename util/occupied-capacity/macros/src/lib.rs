//! Compile-time capacity literals.
extern crate proc_macro;

use quote::quote;
use syn::{parse_macro_input, Error as SynError, LitInt};

use ckb_occupied_capacity_core::Capacity;

/// Expands a byte count literal into the `Capacity` needed to occupy that many bytes.
///
/// `capacity_bytes!(61)` expands to `Capacity::shannons(6100000000)`, so `Capacity` must be in
/// scope at the call site.
#[proc_macro]
pub fn capacity_bytes(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as LitInt);
    expand(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

fn expand(input: &LitInt) -> Result<proc_macro2::TokenStream, SynError> {
    if !input.suffix().is_empty() {
        return Err(SynError::new(
            input.span(),
            "the input should be an integer literal without any suffix",
        ));
    }
    let bytes = input.base10_parse::<usize>().map_err(|_| {
        SynError::new(
            input.span(),
            "the input should be a positive integer literal",
        )
    })?;
    let capacity = Capacity::bytes(bytes)
        .map_err(|_| SynError::new(input.span(), "the input capacity is overflow"))?;
    let shannons = LitInt::new(&capacity.as_u64().to_string(), input.span());
    Ok(quote!(Capacity::shannons(#shannons)))
}
