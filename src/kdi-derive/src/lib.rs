mod attrs;
mod impls;
mod inject;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::{DeriveInput, Result as SynResult};

/// Implements `kdi::provider::component::Component` for the self type of an
/// `impl` block.
///
/// The constructor is picked among the associated functions marked with
/// `#[inject]`, or among every associated function returning `Self` or
/// `Result<Self, E>` if none is marked. The first candidate with parameters
/// wins; a candidate without parameters is used only if no other exists.
///
/// Accepted arguments, in any combination:
///
/// - `scope = Singleton | Activity | Fragment`,
/// - `OutputType, post_processor`, e.g. `Arc<dyn Trait>, Arc::new`.
#[proc_macro_attribute]
pub fn component(attr: TokenStream, item: TokenStream) -> TokenStream {
    match component_impl(attr, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn component_impl(attr: TokenStream, item: TokenStream) -> SynResult<TokenStream2> {
    let attr_data = attrs::parse_attributes(attr)?;
    let expanded = impls::expand_implementation(item, attr_data)?;
    Ok(expanded)
}

/// Implements `kdi::field::Inject` for a struct with named fields. Every
/// field marked with `#[inject]` is resolved and assigned in declaration
/// order.
#[proc_macro_derive(Inject, attributes(inject))]
pub fn derive_inject(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match inject::expand_inject(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
