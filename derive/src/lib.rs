use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod from_document;

#[proc_macro_derive(FromDocument, attributes(field))]
pub fn derive_from_document(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match from_document::expand_from_document(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}
