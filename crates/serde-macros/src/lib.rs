// Copyright (C) 2022-present The NetGauze Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Derive macros that remove the boilerplate of error types used by the wire
//! (de)serializers.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Expr, Lit};

/// A field of an enum variant that is decorated with a given attribute
struct MarkedField<'a> {
    variant: &'a syn::Ident,
    ty: &'a syn::TypePath,
    attr: &'a syn::Attribute,
}

fn marked_fields<'a>(
    enum_data: &'a syn::DataEnum,
    attr_name: &str,
) -> syn::Result<Vec<MarkedField<'a>>> {
    let mut ret = vec![];
    for variant in &enum_data.variants {
        for field in &variant.fields {
            for attr in field.attrs.iter().filter(|attr| attr.path().is_ident(attr_name)) {
                let syn::Type::Path(ty) = &field.ty else {
                    return Err(syn::Error::new(
                        field.ty.span(),
                        format!("#[{attr_name}] expects a plain type path"),
                    ));
                };
                ret.push(MarkedField {
                    variant: &variant.ident,
                    ty,
                    attr,
                });
            }
        }
    }
    Ok(ret)
}

/// Read the `module = "path::to::module"` argument of `#[from_located(..)]`
fn located_module(attr: &syn::Attribute) -> syn::Result<Vec<syn::Ident>> {
    let missing = || syn::Error::new(attr.span(), "expected #[from_located(module = \"...\")]");
    let Expr::Assign(assign) = attr.parse_args::<Expr>().map_err(|_| missing())? else {
        return Err(missing());
    };
    let (Expr::Path(left), Expr::Lit(right)) = (assign.left.as_ref(), assign.right.as_ref())
    else {
        return Err(missing());
    };
    if !left.path.is_ident("module") {
        return Err(syn::Error::new(
            left.span(),
            "only the 'module' argument is accepted",
        ));
    }
    let Lit::Str(module) = &right.lit else {
        return Err(missing());
    };
    Ok(module
        .value()
        .split("::")
        .filter(|part| !part.is_empty())
        .map(|part| format_ident!("{}", part))
        .collect())
}

/// Path of the `Located{Name}` struct generated for the error type of a
/// `#[from_located]` field
fn located_path(field: &MarkedField<'_>) -> syn::Result<TokenStream> {
    let mut module = located_module(field.attr)?;
    let segments = &field.ty.path.segments;
    let Some(last) = segments.last() else {
        return Err(syn::Error::new(field.ty.span(), "empty type path"));
    };
    module.extend(
        segments
            .iter()
            .take(segments.len() - 1)
            .map(|seg| seg.ident.clone()),
    );
    if module.is_empty() {
        return Err(syn::Error::new(
            field.attr.span(),
            "'module' of the located error must not be empty",
        ));
    }
    let located = format_ident!("Located{}", last.ident);
    Ok(quote! { #(#module)::*::#located })
}

fn located_error(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let syn::Data::Enum(en) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "Works only with enum error types",
        ));
    };
    let ident = &input.ident;
    let located = format_ident!("Located{}", ident);

    let mut output = quote! {
        #[derive(PartialEq, Clone, Debug)]
        #[automatically_derived]
        pub struct #located<'a> {
            span: netgauze_parse_utils::Span<'a>,
            error: #ident,
        }

        #[automatically_derived]
        impl<'a> #located<'a> {
            pub const fn new(span: netgauze_parse_utils::Span<'a>, error: #ident) -> Self {
                Self { span, error }
            }
        }

        #[automatically_derived]
        impl<'a> From<#located<'a>> for (netgauze_parse_utils::Span<'a>, #ident) {
            fn from(input: #located<'a>) -> Self {
                (input.span, input.error)
            }
        }

        #[automatically_derived]
        impl<'a> netgauze_parse_utils::LocatedParsingError for #located<'a> {
            type Span = netgauze_parse_utils::Span<'a>;
            type Error = #ident;

            fn span(&self) -> &Self::Span {
                &self.span
            }

            fn error(&self) -> &Self::Error {
                &self.error
            }
        }

        #[automatically_derived]
        impl<'a> nom::error::FromExternalError<netgauze_parse_utils::Span<'a>, #ident> for #located<'a> {
            fn from_external_error(input: netgauze_parse_utils::Span<'a>, _kind: nom::error::ErrorKind, error: #ident) -> Self {
                #located::new(input, error)
            }
        }
    };

    let from_nom = marked_fields(en, "from_nom")?;
    if from_nom.len() > 1 {
        return Err(syn::Error::new(
            from_nom[1].attr.span(),
            "#[from_nom] can be used only once per enum",
        ));
    }
    for field in &from_nom {
        let variant = field.variant;
        output.extend(quote! {
            #[automatically_derived]
            impl<'a> nom::error::ParseError<netgauze_parse_utils::Span<'a>> for #located<'a> {
                fn from_error_kind(input: netgauze_parse_utils::Span<'a>, kind: nom::error::ErrorKind) -> Self {
                    #located::new(input, #ident::#variant(kind))
                }

                fn append(_input: netgauze_parse_utils::Span<'a>, _kind: nom::error::ErrorKind, other: Self) -> Self {
                    other
                }
            }
        });
    }

    for field in marked_fields(en, "from_external")? {
        let variant = field.variant;
        let ty = field.ty;
        output.extend(quote! {
            #[automatically_derived]
            impl<'a> nom::error::FromExternalError<netgauze_parse_utils::Span<'a>, #ty> for #located<'a> {
                fn from_external_error(input: netgauze_parse_utils::Span<'a>, _kind: nom::error::ErrorKind, error: #ty) -> Self {
                    #located::new(input, #ident::#variant(error))
                }
            }
        });
    }

    for field in marked_fields(en, "from_located")? {
        let variant = field.variant;
        let inner = located_path(&field)?;
        output.extend(quote! {
            #[automatically_derived]
            impl<'a> From<#inner<'a>> for #located<'a> {
                fn from(input: #inner<'a>) -> Self {
                    let (span, error) = input.into();
                    #located::new(span, #ident::#variant(error))
                }
            }
        });
    }
    Ok(output)
}

/// For a given error enum `{Name}` generate a struct called `Located{Name}`
/// that carries the `Span` (the error location in the input stream) next to
/// the error. The fields of the enum can be decorated with:
///
/// 1. `#[from_nom]`: at most once, the variant wrapping [`nom::error::ErrorKind`].
/// 2. `#[from_external]`: implement `nom::error::FromExternalError` for the
///    field's type, used with `nom::combinator::map_res`.
/// 3. `#[from_located(module = "...")]`: implement [`From`] for the located
///    error of a nested PDU.
///
/// Example:
/// ```no_compile
/// use netgauze_serde_macros::LocatedError;
///
/// #[derive(LocatedError, PartialEq, Clone, Debug)]
/// pub enum FlowSpecComponentParsingError {
///     NomError(#[from_nom] nom::error::ErrorKind),
///     UnknownComponentType(#[from_external] UndefinedFlowSpecComponentType),
///     NumericValueError(#[from_located(module = "self")] NumericValueParsingError),
/// }
/// ```
#[proc_macro_derive(LocatedError, attributes(from_nom, from_external, from_located))]
pub fn derive_located_error(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = syn::parse_macro_input!(input as syn::DeriveInput);
    located_error(&ast)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

fn writing_error(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let syn::Data::Enum(en) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "Works only with enum error types",
        ));
    };
    let ident = &input.ident;
    let mut output = TokenStream::new();
    for field in marked_fields(en, "from_std_io_error")? {
        let variant = field.variant;
        output.extend(quote! {
            #[automatically_derived]
            impl From<std::io::Error> for #ident {
                fn from(err: std::io::Error) -> Self {
                    #ident::#variant(err.to_string())
                }
            }
        });
    }
    for field in marked_fields(en, "from")? {
        let variant = field.variant;
        let ty = field.ty;
        output.extend(quote! {
            #[automatically_derived]
            impl From<#ty> for #ident {
                fn from(err: #ty) -> Self {
                    #ident::#variant(err)
                }
            }
        });
    }
    Ok(output)
}

/// Decorate an `enum` used as the error of a wire serializer.
///
/// 1. `#[from_std_io_error]` generates [`From`] for [`std::io::Error`],
///    storing its string representation.
/// 2. `#[from]` generates [`From`] for the field's type.
///
/// Example:
/// ```no_compile
/// use netgauze_serde_macros::WritingError;
///
/// #[derive(WritingError, PartialEq, Clone, Debug)]
/// pub enum FlowWritingError {
///     StdIOError(#[from_std_io_error] String),
///     ComponentError(#[from] FlowSpecComponentWritingError),
/// }
/// ```
#[proc_macro_derive(WritingError, attributes(from_std_io_error, from))]
pub fn derive_writing_error(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = syn::parse_macro_input!(input as syn::DeriveInput);
    writing_error(&ast)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
