use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{quote, ToTokens};
use syn::spanned::Spanned;
use syn::visit_mut::{self, VisitMut};
use syn::{
    AngleBracketedGenericArguments, Attribute, Error as SynError, FnArg, GenericArgument, Ident,
    ImplItem, ImplItemFn, ItemImpl, Meta, PathArguments, Result as SynResult, ReturnType,
    Signature, Type,
};

use crate::attrs::AttributeData;

struct ConstructorData {
    identifier: Ident,
    arguments: Vec<Span>,
    return_type: ReturnTypeData,
}

enum ReturnTypeData {
    Infallible,
    Result { error_type: Type },
}

struct AttributeRemovalVisitor;

impl VisitMut for AttributeRemovalVisitor {
    fn visit_impl_item_fn_mut(&mut self, item_fn: &mut ImplItemFn) {
        item_fn.attrs.retain(|attr| !is_inject_attribute(attr));
        visit_mut::visit_impl_item_fn_mut(self, item_fn);
    }
}

pub fn expand_implementation(
    impls: TokenStream,
    attr_data: AttributeData,
) -> SynResult<TokenStream2> {
    let mut impls = match syn::parse::<ItemImpl>(impls) {
        Ok(impls) => impls,
        Err(err) => {
            return Err(SynError::new(
                err.span(),
                "`#[component]` should be annotated on the `impl` block",
            ))
        }
    };
    if let Some((_, path, _)) = &impls.trait_ {
        return Err(SynError::new(
            path.span(),
            "`#[component]` should be annotated on an inherent `impl` block",
        ));
    }

    let ctor_data = select_constructor(&impls)?;
    let expanded = expand_component_implementation(&impls, ctor_data, attr_data);

    let mut visitor = AttributeRemovalVisitor;
    visitor.visit_item_impl_mut(&mut impls);

    Ok(quote! {
        #impls
        #expanded
    })
}

fn is_inject_attribute(attr: &Attribute) -> bool {
    attr.path().is_ident("inject")
}

fn select_constructor(impls: &ItemImpl) -> SynResult<ConstructorData> {
    let fns: Vec<&ImplItemFn> = impls.items.iter().filter_map(filter_and_map_item_fn).collect();
    let annotated: Vec<&ImplItemFn> = fns
        .iter()
        .copied()
        .filter(|item_fn| item_fn.attrs.iter().any(is_inject_attribute))
        .collect();

    let candidates = if annotated.is_empty() {
        fns.iter()
            .filter(|item_fn| is_constructor_like(&item_fn.sig, &impls.self_ty))
            .map(|item_fn| parse_constructor(&item_fn.sig, &impls.self_ty))
            .collect::<SynResult<Vec<_>>>()?
    } else {
        annotated
            .iter()
            .map(|item_fn| check_annotated(item_fn).and_then(|sig| parse_constructor(sig, &impls.self_ty)))
            .collect::<SynResult<Vec<_>>>()?
    };

    let mut candidates = candidates.into_iter();
    let first = candidates.next().ok_or_else(|| {
        SynError::new(
            impls.self_ty.span(),
            "no constructor is found, expects an associated function returning `Self` or `Result<Self, E>`",
        )
    })?;
    if !first.arguments.is_empty() {
        return Ok(first);
    }
    Ok(candidates
        .find(|ctor| !ctor.arguments.is_empty())
        .unwrap_or(first))
}

fn filter_and_map_item_fn(item: &ImplItem) -> Option<&ImplItemFn> {
    if let ImplItem::Fn(impl_fn) = item {
        Some(impl_fn)
    } else {
        None
    }
}

fn check_annotated(item_fn: &ImplItemFn) -> SynResult<&Signature> {
    if let Some(attr) = item_fn
        .attrs
        .iter()
        .find(|attr| is_inject_attribute(attr) && !matches!(attr.meta, Meta::Path(_)))
    {
        return Err(SynError::new(attr.span(), "expects `#[inject]` without arguments"));
    }
    if let Some(FnArg::Receiver(rec)) = item_fn.sig.inputs.first() {
        return Err(SynError::new(
            rec.span(),
            "method is not allowed to be annotated with `#[inject]`",
        ));
    }
    if !item_fn.sig.generics.params.is_empty() {
        return Err(SynError::new(
            item_fn.sig.generics.span(),
            "generic function is not allowed to be annotated with `#[inject]`",
        ));
    }
    Ok(&item_fn.sig)
}

fn is_constructor_like(signature: &Signature, self_type: &Type) -> bool {
    let has_receiver = matches!(signature.inputs.first(), Some(FnArg::Receiver(_)));
    !has_receiver
        && signature.generics.params.is_empty()
        && parse_constructor_return_type(&signature.output, self_type).is_ok()
}

fn parse_constructor(signature: &Signature, self_type: &Type) -> SynResult<ConstructorData> {
    let arguments = signature.inputs.iter().map(|arg| arg.span()).collect();
    let return_type = parse_constructor_return_type(&signature.output, self_type)?;

    Ok(ConstructorData {
        identifier: signature.ident.clone(),
        arguments,
        return_type,
    })
}

fn return_type_error(span: Span) -> SynError {
    SynError::new(
        span,
        "a constructor's return type should be `Self` or `Result<Self, E>`",
    )
}

fn is_self_type(ty: &Type, self_type: &Type) -> bool {
    match ty {
        Type::Path(path) if path.qself.is_none() && path.path.is_ident("Self") => true,
        _ => ty.to_token_stream().to_string() == self_type.to_token_stream().to_string(),
    }
}

fn parse_constructor_return_type(
    output: &ReturnType,
    self_type: &Type,
) -> SynResult<ReturnTypeData> {
    let ReturnType::Type(_, return_type) = output else {
        return Err(return_type_error(output.span()));
    };
    if is_self_type(return_type, self_type) {
        return Ok(ReturnTypeData::Infallible);
    }

    let Type::Path(return_path) = return_type.as_ref() else {
        return Err(return_type_error(return_type.span()));
    };
    let segments: Vec<String> = return_path
        .path
        .segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect();
    let is_result = matches!(
        segments.iter().map(String::as_str).collect::<Vec<_>>().as_slice(),
        ["Result"] | ["std", "result", "Result"] | ["core", "result", "Result"]
    );
    let Some(last) = return_path.path.segments.last().filter(|_| is_result) else {
        return Err(return_type_error(return_type.span()));
    };

    let PathArguments::AngleBracketed(AngleBracketedGenericArguments { args, .. }) =
        &last.arguments
    else {
        return Err(return_type_error(last.span()));
    };
    match (args.first(), args.get(1), args.len()) {
        (Some(GenericArgument::Type(ok)), Some(GenericArgument::Type(err)), 2)
            if is_self_type(ok, self_type) =>
        {
            Ok(ReturnTypeData::Result {
                error_type: err.clone(),
            })
        }
        _ => Err(return_type_error(args.span())),
    }
}

fn expand_component_implementation(
    impls: &ItemImpl,
    ctor_data: ConstructorData,
    attr_data: AttributeData,
) -> TokenStream2 {
    let self_type = &impls.self_ty;
    let (impl_generics, _, where_clause) = impls.generics.split_for_impl();
    let constructor = &ctor_data.identifier;

    let (associated_type_constructed, post_process_body) = match &attr_data.output {
        Some(output) => {
            let output_type = &output.output_type;
            let post_processor = &output.post_processor;
            (
                quote! { type Constructed = #output_type; },
                quote! { #post_processor(self) },
            )
        }
        None => (
            quote! { type Constructed = ::std::sync::Arc<Self>; },
            quote! { ::std::sync::Arc::new(self) },
        ),
    };

    let associated_type_error = match &ctor_data.return_type {
        ReturnTypeData::Result { error_type } => quote! { type Error = #error_type; },
        ReturnTypeData::Infallible => quote! { type Error = ::std::convert::Infallible; },
    };

    let associated_const_scope = attr_data.scope.as_ref().map(|scope| {
        quote! { const SCOPE: kdi::scope::Scope = kdi::scope::Scope::#scope; }
    });

    let deps: Vec<Ident> = ctor_data
        .arguments
        .iter()
        .enumerate()
        .map(|(i, span)| Ident::new(&format!("dep{i}"), *span))
        .collect();

    let wire_deps = match &ctor_data.return_type {
        ReturnTypeData::Infallible => quote! { Ok(Ok(Self::#constructor(#(#deps,)*))) },
        ReturnTypeData::Result { .. } => quote! { Ok(Self::#constructor(#(#deps,)*)) },
    };

    quote! {
        impl #impl_generics kdi::provider::component::Component for #self_type #where_clause {
            #associated_type_constructed
            #associated_type_error
            #associated_const_scope

            fn construct<I>(injector: &I) -> ::std::result::Result<
                ::std::result::Result<Self, Self::Error>,
                kdi::container::injector::InjectorError
            >
            where
                I: kdi::container::injector::TypedInjector + ?Sized
            {
                #(let #deps = injector.get()?;)*
                #wire_deps
            }

            fn post_process(self) -> Self::Constructed {
                #post_process_body
            }
        }
    }
}
