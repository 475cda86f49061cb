// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! This crate provides procedural macros for vigil.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, FnArg, GenericArgument, Ident, ItemFn, Pat, PathArguments, ReturnType, Type,
};

/// An attribute macro that turns a free function into a `vigil_sdk` target.
///
/// The function is kept as written. Alongside it, a unit struct named after the
/// function in `CamelCase` with a `Target` suffix implements
/// `vigil_core::Target`:
///
/// - every parameter becomes a parameter of the signature, declared with the
///   type of its Rust type (`Value` parameters stay undeclared),
/// - a `Result<T, E>` return type is mapped to `anyhow::Result<T>`, any other
///   return type `T` is wrapped in `Ok`.
///
/// ```ignore
/// #[vigil_sdk::target]
/// fn add(a: i64, b: i64) -> i64 {
///     a + b
/// }
///
/// let add = Instrument::new(AddTarget).bind();
/// ```
#[proc_macro_attribute]
pub fn target(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            Span::call_site(),
            "`#[target]` does not take any arguments",
        )
        .to_compile_error()
        .into();
    }

    let function = parse_macro_input!(item as ItemFn);
    match expand_target(&function) {
        Ok(target) => TokenStream::from(quote! {
            #function
            #target
        }),
        Err(e) => {
            let error = e.to_compile_error();
            TokenStream::from(quote! {
                #function
                #error
            })
        }
    }
}

struct Parameter<'a> {
    ident: &'a Ident,
    ty: &'a Type,
}

fn expand_target(function: &ItemFn) -> syn::Result<TokenStream2> {
    let sig = &function.sig;
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "`#[target]` cannot be applied to async functions",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "`#[target]` cannot be applied to generic functions",
        ));
    }

    let mut parameters = Vec::with_capacity(sig.inputs.len());
    for input in &sig.inputs {
        let typed = match input {
            FnArg::Receiver(receiver) => {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "`#[target]` cannot be applied to methods",
                ))
            }
            FnArg::Typed(typed) => typed,
        };
        let ident = match typed.pat.as_ref() {
            Pat::Ident(pat) => &pat.ident,
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "target parameters must be plain identifiers",
                ))
            }
        };
        if let Type::Reference(reference) = typed.ty.as_ref() {
            return Err(syn::Error::new_spanned(
                reference,
                "target parameters must be owned types",
            ));
        }
        parameters.push(Parameter {
            ident,
            ty: &typed.ty,
        });
    }

    let vis = &function.vis;
    let fn_ident = &sig.ident;
    let fn_name = fn_ident.to_string();
    let struct_ident = format_ident!("{}Target", camel_case(&fn_name));
    let doc = format!("Instrumentable target calling [`{fn_name}`].");
    let private = quote!(::vigil_sdk::__private);

    let params = parameters.iter().map(|p| {
        let name = p.ident.to_string();
        let ty = p.ty;
        quote! {
            .param(match <#ty as #private::FromValue>::VALUE_TYPE {
                #private::ValueType::Any => #private::Param::untyped(#name),
                declared => #private::Param::typed(#name, declared),
            })
        }
    });

    let extractions = parameters.iter().map(|p| {
        let name = p.ident.to_string();
        let ident = p.ident;
        let ty = p.ty;
        quote! {
            let #ident = __vigil_args.extract::<#ty>(#name)?;
        }
    });
    let idents = parameters.iter().map(|p| p.ident);
    let call = quote!(#fn_ident(#(#idents),*));

    let (output, body) = match &sig.output {
        ReturnType::Default => (quote!(()), quote!(#call; Ok(()))),
        ReturnType::Type(_, ty) => match result_ok_type(ty) {
            Some(ok) => (
                quote!(#ok),
                quote!(#call.map_err(::core::convert::Into::into)),
            ),
            None => (quote!(#ty), quote!(Ok(#call))),
        },
    };

    Ok(quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Copy, Default)]
        #vis struct #struct_ident;

        impl #private::Target for #struct_ident {
            type Output = #output;

            fn signature(&self) -> #private::Signature {
                #private::Signature::new(#fn_name) #(#params)*
            }

            #[allow(unused_variables)]
            fn call(
                &self,
                __vigil_args: &#private::BoundArguments,
            ) -> #private::anyhow::Result<Self::Output> {
                #(#extractions)*
                #body
            }
        }
    })
}

/// Returns `T` when `ty` is spelled `Result<T, ..>` (with any path prefix).
fn result_ok_type(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let last = path.path.segments.last()?;
    if last.ident != "Result" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(ok) => Some(ok),
        _ => None,
    }
}

fn camel_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}
