use std::collections::HashMap;

use proc_macro::{Span, TokenStream};
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    Data, DeriveInput, Error, ExprClosure, Field, Fields, GenericArgument, Ident, LitStr, Pat,
    PathArguments, Result, Token, Type,
    parse::{Parse, ParseStream},
    spanned::Spanned,
};

pub(crate) fn expand_from_document(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`FromDocument` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new(
            input.span(),
            "`FromDocument` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .map(Result::transpose)
        .flatten() // Skip fields without an attribute.
        .collect::<Result<Vec<_>>>()?;

    type Case = (Ident, Option<(Type, ExprClosure)>);
    let mut field_methods: HashMap<Primitive, HashMap<String, (LitStr, Case)>> = HashMap::new();
    let mut class_method: Option<Case> = None;

    for field in fields {
        let assignment = (field.name, field.handler);

        match field.identifier {
            FieldIdentifier::Name(name) => {
                let existing = field_methods
                    .entry(field.primitive)
                    .or_default()
                    .insert(name.value(), (name.clone(), assignment));

                if !existing.is_none() {
                    Err(Error::new(name.span(), "Field names must be unique."))?
                }
            }
            FieldIdentifier::Class => {
                if field.primitive != Primitive::Str {
                    Err(Error::new(
                        field.span.into(),
                        "The class name is text; expected `Option<String>` or a `&str` handler.",
                    ))?;
                }

                let existing = class_method.replace(assignment);

                if !existing.is_none() {
                    Err(Error::new(
                        field.span.into(),
                        "Only one field may receive the class name.",
                    ))?;
                }
            }
        }
    }

    let field_methods = field_methods.into_iter().map(|(primitive, fields)| {
        let cases = fields.into_values().map(|(name, (ident, handler))| {
            let assignment = assign(&ident, handler, quote! { value });
            quote! { #name => { #assignment } }
        });

        let method = format_ident!("add_{}", primitive.suffix());
        let value_type = primitive.value_type();

        quote! {
            fn #method(&mut self, field: &str, value: #value_type) {
                match field {
                    #(#cases)*
                    _ => {}
                };
            }
        }
    });

    let class_method = class_method.map(|(ident, handler)| {
        let assignment = assign(&ident, handler, quote! { class });

        quote! {
            fn add_class(&mut self, class: &str) {
                #assignment;
            }
        }
    });

    let name = &input.ident;

    let expanded = quote! {
        impl ::orecord::avec::FromDocument for #name {
            #(#field_methods)*
            #class_method
        }
    };

    Ok(expanded.into())
}

/// Store a received value in a struct field, through its handler if present.
fn assign(ident: &Ident, handler: Option<(Type, ExprClosure)>, value: TokenStream2) -> TokenStream2 {
    if let Some((field_type, handler)) = handler {
        let body = handler.body;
        let acc = handler.inputs.iter().nth(0).unwrap();
        let val = handler.inputs.iter().nth(1).unwrap();

        quote! {
            (|#acc: &mut #field_type, #val| {#body})(&mut self.#ident, #value)
        }
    } else {
        quote! {
            self.#ident = Some(::core::convert::Into::into(#value))
        }
    }
}

/// The Rust types values are published as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Primitive {
    Bool,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Str,
    Bytes,
    Link,
}

impl Primitive {
    fn from_type(ty: &Type) -> Result<Self> {
        let unsupported = || {
            Error::new_spanned(
                ty,
                "Unsupported value type; expected `bool`, `i8`, `i16`, `i32`, `i64`, `f32`, \
                 `f64`, `String`, `&str`, `Vec<u8>`, `&[u8]` or `Link`.",
            )
        };

        match ty {
            Type::Reference(reference) => match &*reference.elem {
                Type::Path(path) if path.path.is_ident("str") => Ok(Self::Str),
                Type::Slice(slice) => match &*slice.elem {
                    Type::Path(path) if path.path.is_ident("u8") => Ok(Self::Bytes),
                    _ => Err(unsupported()),
                },
                _ => Err(unsupported()),
            },
            Type::Path(path) => {
                let Some(segment) = path.path.segments.last() else {
                    Err(unsupported())?
                };

                Ok(match segment.ident.to_string().as_str() {
                    "bool" => Self::Bool,
                    "i8" => Self::I8,
                    "i16" => Self::I16,
                    "i32" => Self::I32,
                    "i64" => Self::I64,
                    "f32" => Self::F32,
                    "f64" => Self::F64,
                    "String" => Self::Str,
                    "Vec" => Self::Bytes,
                    "Link" => Self::Link,
                    _ => Err(unsupported())?,
                })
            }
            _ => Err(unsupported()),
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Str => "str",
            Self::Bytes => "bytes",
            Self::Link => "link",
        }
    }

    fn value_type(self) -> TokenStream2 {
        match self {
            Self::Bool => quote! { bool },
            Self::I8 => quote! { i8 },
            Self::I16 => quote! { i16 },
            Self::I32 => quote! { i32 },
            Self::I64 => quote! { i64 },
            Self::F32 => quote! { f32 },
            Self::F64 => quote! { f64 },
            Self::Str => quote! { &str },
            Self::Bytes => quote! { &[u8] },
            Self::Link => quote! { ::orecord::sans::Link },
        }
    }
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    primitive: Primitive,
    identifier: FieldIdentifier,
    handler: Option<(Type, ExprClosure)>,
    span: Span,
}

#[derive(Debug)]
enum FieldIdentifier {
    Name(LitStr),
    Class,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let name = field.ident.clone().unwrap();

        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("field")) else {
            return Ok(None);
        };

        let span = attr.span().unwrap();

        let FieldAttribute {
            identifier,
            handler,
        } = attr.meta.require_list()?.parse_args()?;

        let primitive = if let Some(handler) = &handler {
            let Some(parameter) = handler.inputs.iter().nth(1) else {
                Err(Error::new_spanned(
                    handler,
                    "Handler closure must have two parameters.",
                ))?
            };

            let Pat::Type(pat_type) = parameter else {
                Err(Error::new_spanned(
                    parameter,
                    "Handler closure's second parameter must be annotated with the expected value type.",
                ))?
            };

            Primitive::from_type(&pat_type.ty)?
        } else {
            Primitive::from_type(option_inner(&field.ty)?)?
        };

        let handler = handler.map(|h| (field.ty.clone(), h));

        Ok(Some(Self {
            name,
            primitive,
            identifier,
            handler,
            span,
        }))
    }
}

/// The `T` of a field typed `Option<T>`.
fn option_inner(ty: &Type) -> Result<&Type> {
    let not_option = || Error::new_spanned(ty, "Field without a handler must have type `Option<T>`.");

    let Type::Path(path) = ty else {
        Err(not_option())?
    };

    let segment = path
        .path
        .segments
        .last()
        .filter(|s| s.ident == "Option")
        .ok_or_else(not_option)?;

    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        Err(not_option())?
    };

    match arguments.args.first() {
        Some(GenericArgument::Type(inner)) => Ok(inner),
        _ => Err(not_option()),
    }
}

#[derive(Debug)]
struct FieldAttribute {
    identifier: FieldIdentifier,
    handler: Option<ExprClosure>,
}

impl Parse for FieldAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let identifier = if let Ok(ident) = input.parse::<Ident>() {
            if ident == "class" {
                FieldIdentifier::Class
            } else {
                Err(Error::new_spanned(
                    ident,
                    "Field identifier must be a string literal or `class`.",
                ))?
            }
        } else {
            FieldIdentifier::Name(input.parse::<LitStr>()?)
        };

        let handler = if !input.is_empty() {
            input.parse::<Token![,]>()?;
            Some(input.parse::<ExprClosure>()?)
        } else {
            None
        };

        Ok(Self {
            identifier,
            handler,
        })
    }
}
