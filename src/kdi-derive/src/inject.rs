use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;
use syn::{
    Data, DeriveInput, Error as SynError, Field, Fields, GenericArgument, Meta, PathArguments,
    Result as SynResult, Type,
};

pub fn expand_inject(input: DeriveInput) -> SynResult<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(SynError::new(
            input.ident.span(),
            "`#[derive(Inject)]` only supports structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(SynError::new(
            data.fields.span(),
            "`#[derive(Inject)]` only supports structs with named fields",
        ));
    };

    let mut assignments = Vec::new();
    for field in &fields.named {
        if let Some(assignment) = expand_field(field)? {
            assignments.push(assignment);
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let unused_injector = assignments.is_empty().then(|| quote! { let _ = injector; });

    Ok(quote! {
        impl #impl_generics kdi::field::Inject for #name #ty_generics #where_clause {
            fn inject_fields<I>(&mut self, injector: &I) -> ::std::result::Result<
                (),
                kdi::container::injector::InjectorError
            >
            where
                I: kdi::container::injector::TypedInjector + ?Sized
            {
                #unused_injector
                #(#assignments)*
                Ok(())
            }
        }
    })
}

fn expand_field(field: &Field) -> SynResult<Option<TokenStream2>> {
    let Some(attr) = field.attrs.iter().find(|attr| attr.path().is_ident("inject")) else {
        return Ok(None);
    };
    if !matches!(attr.meta, Meta::Path(_)) {
        return Err(SynError::new(attr.span(), "expects `#[inject]` without arguments"));
    }

    let Some(ident) = &field.ident else {
        unreachable!("named fields should have identifiers")
    };
    let assignment = if is_option(&field.ty) {
        quote! { self.#ident = ::std::option::Option::Some(injector.get()?); }
    } else {
        quote! { self.#ident = injector.get()?; }
    };
    Ok(Some(assignment))
}

fn is_option(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    let Some(last) = path.path.segments.last() else {
        return false;
    };
    if last.ident != "Option" {
        return false;
    }
    matches!(
        &last.arguments,
        PathArguments::AngleBracketed(args)
            if args.args.len() == 1 && matches!(args.args.first(), Some(GenericArgument::Type(_)))
    )
}
