//! Derive macro for form models.
//!
//! This crate provides `#[derive(Model)]`, which describes a struct as an
//! `oxide_autoform::ModelSchema` so it can be rendered as a form, converted
//! and validated.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, ExprLit, ExprUnary, Fields, Lit, Meta,
    Path, UnOp,
};

/// Derives `Model` and `FieldType` for a struct with named fields.
///
/// The struct must also derive serde's `Serialize` and `Deserialize`.
///
/// # Attributes
///
/// - `#[model(name = "Name")]` - Schema name (defaults to the struct name)
/// - `#[model(title = "Title")]` - Display title
/// - `#[model(description = "...")]` - Model description
/// - `#[model(validate = "path::to::fn")]` - Model-level check, called as
///   `fn(&Self) -> Result<(), ValidationErrors>` after construction
///
/// # Field Attributes
///
/// - `#[field(description = "...")]` - Shown in the label (defaults to the
///   field's doc comment)
/// - `#[field(default = expr)]` - Default value, used to seed the control
///   and when no input is submitted
/// - `#[field(ge = 0, gt = 0, le = 100, lt = 100)]` - Numeric bounds
/// - `#[field(min_length = 1, max_length = 50)]` - Length bounds for text,
///   lists and mappings
/// - `#[field(pattern = "^[a-z]+$")]` - Regular expression the text must match
/// - `#[field(email)]`, `#[field(url)]` - Format checks
/// - `#[field(required)]` - Rejects blank text and empty optionals
/// - `#[field(opaque)]` - Treats the field as free text regardless of its type
///
/// Every field type must implement `FieldType` unless it is marked `opaque`.
/// Deriving `Model` also implements `FieldType`, so models nest, and the
/// `validate` checks of nested models run along with the outer one. A model
/// must not contain itself (`struct Node { children: Vec<Node> }`): its
/// schema would never finish building.
#[proc_macro_derive(Model, attributes(model, field))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_model_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_model_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let model_attrs = parse_model_attrs(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Model derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Model derive only supports structs",
            ));
        }
    };

    let mut field_specs: Vec<TokenStream2> = Vec::new();
    let mut nested_checks: Vec<TokenStream2> = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let field_name = ident.unraw().to_string();
        let field_type = &field.ty;
        let attrs = parse_field_attrs(&field.attrs)?;

        let mut spec = if attrs.opaque {
            quote! {
                ::oxide_autoform::FieldSpec::new(#field_name, ::oxide_autoform::TypeTag::Other)
            }
        } else {
            nested_checks.push(quote! {
                errors.merge(
                    #field_name,
                    ::oxide_autoform::FieldType::validate_value(&self.#ident),
                );
            });
            quote! {
                ::oxide_autoform::FieldSpec::of::<#field_type>(#field_name)
            }
        };

        if let Some(description) = attrs.description.or_else(|| doc_comment(&field.attrs)) {
            spec = quote! { #spec.description(#description) };
        }
        if let Some(default) = &attrs.default {
            spec = quote! { #spec.default(#default) };
        }
        for constraint in &attrs.constraints {
            spec = quote! { #spec.constraint(::oxide_autoform::Constraint::#constraint) };
        }

        field_specs.push(spec);
    }

    let schema_name = model_attrs
        .name
        .unwrap_or_else(|| struct_name.to_string());
    let title = model_attrs.title.map(|t| quote! { .title(#t) });
    let description = model_attrs
        .description
        .or_else(|| doc_comment(&input.attrs))
        .map(|d| quote! { .description(#d) });

    let validate = model_attrs.validate.map(|path| {
        quote! {
            fn validate(
                &self,
            ) -> ::std::result::Result<(), ::oxide_autoform::ValidationErrors> {
                #path(self)
            }
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::oxide_autoform::Model for #struct_name #ty_generics #where_clause {
            fn schema() -> ::oxide_autoform::ModelSchema {
                ::oxide_autoform::ModelSchema::new(#schema_name)
                    #title
                    #description
                    #(.field(#field_specs))*
            }

            #validate

            fn validate_all(
                &self,
            ) -> ::std::result::Result<(), ::oxide_autoform::ValidationErrors> {
                let mut errors = ::oxide_autoform::ValidationErrors::new();
                #(#nested_checks)*
                if let ::std::result::Result::Err(own) =
                    <Self as ::oxide_autoform::Model>::validate(self)
                {
                    errors.merge("", own);
                }
                if errors.is_empty() {
                    ::std::result::Result::Ok(())
                } else {
                    ::std::result::Result::Err(errors)
                }
            }
        }

        impl #impl_generics ::oxide_autoform::FieldType for #struct_name #ty_generics #where_clause {
            fn type_tag() -> ::oxide_autoform::TypeTag {
                ::oxide_autoform::TypeTag::Model(
                    <Self as ::oxide_autoform::Model>::schema(),
                )
            }

            fn validate_value(&self) -> ::oxide_autoform::ValidationErrors {
                <Self as ::oxide_autoform::Model>::validate_all(self)
                    .err()
                    .unwrap_or_default()
            }
        }
    };

    Ok(expanded)
}

#[derive(Default)]
struct ModelAttrs {
    name: Option<String>,
    title: Option<String>,
    description: Option<String>,
    validate: Option<Path>,
}

#[derive(Default)]
struct FieldAttrs {
    description: Option<String>,
    default: Option<Expr>,
    constraints: Vec<TokenStream2>,
    opaque: bool,
}

fn parse_model_attrs(attrs: &[Attribute]) -> syn::Result<ModelAttrs> {
    let mut result = ModelAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("model") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                result.name = Some(parse_str_value(&meta)?);
            } else if meta.path.is_ident("title") {
                result.title = Some(parse_str_value(&meta)?);
            } else if meta.path.is_ident("description") {
                result.description = Some(parse_str_value(&meta)?);
            } else if meta.path.is_ident("validate") {
                let path = parse_str_value(&meta)?;
                result.validate = Some(syn::parse_str(&path).map_err(|_| {
                    meta.error(format!("`{path}` is not a valid function path"))
                })?);
            } else {
                return Err(meta.error("unknown model attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("field") {
            continue;
        }
        // Handle empty attribute like #[field]
        if matches!(attr.meta, Meta::Path(_)) {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let path = &meta.path;
            if path.is_ident("description") {
                result.description = Some(parse_str_value(&meta)?);
            } else if path.is_ident("default") {
                result.default = Some(meta.value()?.parse()?);
            } else if path.is_ident("opaque") {
                result.opaque = true;
            } else if path.is_ident("required") {
                result.constraints.push(quote! { Required });
            } else if path.is_ident("email") {
                result.constraints.push(quote! { Email });
            } else if path.is_ident("url") {
                result.constraints.push(quote! { Url });
            } else if path.is_ident("pattern") {
                let pattern = parse_str_value(&meta)?;
                result.constraints.push(quote! { pattern(#pattern) });
            } else if path.is_ident("min_length") {
                let n = parse_usize_value(&meta)?;
                result.constraints.push(quote! { MinLength(#n) });
            } else if path.is_ident("max_length") {
                let n = parse_usize_value(&meta)?;
                result.constraints.push(quote! { MaxLength(#n) });
            } else if path.is_ident("ge") {
                let bound = parse_number_value(&meta)?;
                result.constraints.push(quote! { Ge(#bound) });
            } else if path.is_ident("gt") {
                let bound = parse_number_value(&meta)?;
                result.constraints.push(quote! { Gt(#bound) });
            } else if path.is_ident("le") {
                let bound = parse_number_value(&meta)?;
                result.constraints.push(quote! { Le(#bound) });
            } else if path.is_ident("lt") {
                let bound = parse_number_value(&meta)?;
                result.constraints.push(quote! { Lt(#bound) });
            } else {
                return Err(meta.error("unknown field attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

fn parse_str_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<String> {
    let value: Expr = meta.value()?.parse()?;
    match value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}

fn parse_usize_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<usize> {
    let value: Expr = meta.value()?.parse()?;
    match value {
        Expr::Lit(ExprLit {
            lit: Lit::Int(n), ..
        }) => n.base10_parse(),
        other => Err(syn::Error::new_spanned(other, "expected an integer literal")),
    }
}

fn parse_number_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<f64> {
    let value: Expr = meta.value()?.parse()?;
    number_literal(&value)
}

fn number_literal(expr: &Expr) -> syn::Result<f64> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(n), ..
        }) => n.base10_parse(),
        Expr::Lit(ExprLit {
            lit: Lit::Float(f), ..
        }) => f.base10_parse(),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => number_literal(expr).map(|n| -n),
        other => Err(syn::Error::new_spanned(other, "expected a number literal")),
    }
}

/// Joins `///` lines into a single description.
fn doc_comment(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => Some(s.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" "))
    }
}
