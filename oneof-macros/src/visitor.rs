use proc_macro2::Span;
use quote::{format_ident, quote};
use syn::{parse::ParseStream, spanned::Spanned, Token};

use crate::parse::*;

#[derive(Debug, Clone)]
struct Arm {
    closure: syn::ExprClosure,
    // The `T` in the parameter's `&T` or `&mut T`.
    target: syn::Type,
    mutable: bool,
}

impl Arm {
    fn from_closure(closure: syn::ExprClosure) -> syn::Result<Self> {
        let mut inputs = closure.inputs.iter();
        let (Some(param), None) = (inputs.next(), inputs.next()) else {
            return Err(syn::Error::new(
                closure.span(),
                "visitor closures take exactly one parameter",
            ));
        };

        let syn::Pat::Type(typed) = param else {
            return Err(syn::Error::new(
                param.span(),
                "parameter needs a type annotation such as `&T` or `&mut T`",
            ));
        };

        let syn::Type::Reference(reference) = &*typed.ty else {
            return Err(syn::Error::new(
                typed.ty.span(),
                "expected a reference type `&T` or `&mut T`",
            ));
        };

        if let Some(lifetime) = &reference.lifetime {
            return Err(syn::Error::new(
                lifetime.span(),
                "visited references cannot name a lifetime",
            ));
        }

        Ok(Self {
            target: (*reference.elem).clone(),
            mutable: reference.mutability.is_some(),
            closure,
        })
    }
}

#[derive(Debug, Clone)]
struct Input {
    arms: Vec<Arm>,
}

impl Input {
    fn parse(buffer: ParseStream, ctx: &mut ParseContext) -> Result<Self, AlreadyReported> {
        let mut errored = false;
        let mut arms = Vec::new();

        while !buffer.is_empty() {
            let Ok(closure) = buffer
                .parse::<syn::ExprClosure>()
                .report_in_and_set(ctx, &mut errored)
            else {
                advance_past_punct(buffer, ',');
                continue;
            };

            if let Ok(arm) = Arm::from_closure(closure).report_in_and_set(ctx, &mut errored) {
                arms.push(arm);
            }

            if !buffer.is_empty() {
                errored |= buffer.parse::<Token![,]>().report_in(ctx).is_err();
            }
        }

        if arms.is_empty() && !errored {
            ctx.report(syn::Error::new(
                Span::call_site(),
                "a visitor needs at least one closure",
            ));
            errored = true;
        }

        if errored {
            Err(AlreadyReported)
        } else {
            Ok(Self { arms })
        }
    }
}

pub fn visitor_impl(ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = {
        let mut parse_ctx = ParseContext::new();
        let Ok(input) = parse_ctx.parse2(Input::parse, ts.into()) else {
            return parse_ctx.into_error_stream().into();
        };
        input
    };

    let fn_params = (0..input.arms.len())
        .map(|i| format_ident!("__F{i}"))
        .collect::<Vec<_>>();

    let bounds = input.arms.iter().zip(&fn_params).map(|(arm, param)| {
        let target = &arm.target;
        let mutability = arm.mutable.then(|| quote!(mut));
        quote! { #param: ::core::ops::FnMut(& #mutability #target) -> __R }
    });
    let where_clause = quote! { where #(#bounds),* };

    let mut impls = TokenStream2::new();
    for (i, arm) in input.arms.iter().enumerate() {
        let target = &arm.target;
        let field = syn::Index::from(i);

        impls.extend(if arm.mutable {
            quote! {
                impl<__R, #(#fn_params),*> ::oneof::VisitMut<#target> for __OneofVisitor<#(#fn_params),*>
                #where_clause
                {
                    #[inline]
                    fn visit_mut(&mut self, value: &mut #target) -> __R {
                        (self.#field)(value)
                    }
                }
            }
        } else {
            quote! {
                impl<__R, #(#fn_params),*> ::oneof::Visit<#target> for __OneofVisitor<#(#fn_params),*>
                #where_clause
                {
                    #[inline]
                    fn visit(&mut self, value: &#target) -> __R {
                        (self.#field)(value)
                    }
                }
            }
        });
    }

    let closures = input.arms.iter().map(|arm| &arm.closure);

    quote! {{
        struct __OneofVisitor<#(#fn_params),*>(#(#fn_params),*);

        impl<__R, #(#fn_params),*> ::oneof::Visitor for __OneofVisitor<#(#fn_params),*>
        #where_clause
        {
            type Output = __R;
        }

        #impls

        __OneofVisitor(#(#closures),*)
    }}
    .into()
}
