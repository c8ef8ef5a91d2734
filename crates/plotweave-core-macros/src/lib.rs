use proc_macro::TokenStream;
use quote::{ToTokens, TokenStreamExt};
use syn::ext::IdentExt;

struct SyncField {
    ident: syn::Ident,
    skip: bool,
}

struct SyncPropsDerive {
    name: syn::Ident,
    generics: syn::Generics,
    fields: Vec<SyncField>,
}

fn parse_skip(attrs: &[syn::Attribute]) -> syn::Result<bool> {
    let mut skip = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("sync")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported sync attribute, expected `skip`"))
            }
        })?;
    }
    Ok(skip)
}

impl syn::parse::Parse for SyncPropsDerive {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let input: syn::DeriveInput = input.parse()?;

        let syn::Data::Struct(struc) = input.data else {
            return Err(syn::Error::new_spanned(input.ident, "expected a struct"));
        };

        let mut fields = Vec::with_capacity(struc.fields.len());
        for field in struc.fields {
            let skip = parse_skip(&field.attrs)?;
            match field.ident {
                Some(ident) => fields.push(SyncField { ident, skip }),
                None => return Err(syn::Error::new_spanned(field, "expected a named field")),
            }
        }

        Ok(SyncPropsDerive {
            name: input.ident,
            generics: input.generics,
            fields,
        })
    }
}

fn core_path() -> proc_macro2::TokenStream {
    match proc_macro_crate::crate_name("plotweave-core") {
        Ok(proc_macro_crate::FoundCrate::Itself) => quote::quote! { crate },
        Ok(proc_macro_crate::FoundCrate::Name(name)) => {
            let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
            quote::quote!( ::#ident )
        }
        Err(_) => quote::quote! { ::plotweave_core },
    }
}

impl quote::ToTokens for SyncPropsDerive {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        let cr = core_path();

        let merges = self.fields.iter().filter(|f| !f.skip).map(|field| {
            let ident = &field.ident;
            let label = ident.unraw().to_string();
            quote::quote! {
                log.enter(#label);
                changed |= #cr::sync::SyncProps::sync_props(&mut self.#ident, &source.#ident, log);
                log.leave();
            }
        });

        let name = &self.name;
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        tokens.append_all(quote::quote! {
            impl #impl_generics #cr::sync::SyncProps for #name #ty_generics #where_clause {
                fn sync_props(&mut self, source: &Self, log: &mut #cr::sync::ChangeLog) -> bool {
                    let mut changed = false;
                    #(#merges)*
                    changed
                }
            }
        });
    }
}

/// Derive a field-by-field `SyncProps` merge.
///
/// Fields annotated with `#[sync(skip)]` are left untouched by the merge.
#[proc_macro_derive(SyncProps, attributes(sync))]
pub fn derive_sync_props(item: TokenStream) -> TokenStream {
    match syn::parse::<SyncPropsDerive>(item) {
        Ok(derive) => derive.to_token_stream().into(),
        Err(err) => err.to_compile_error().into(),
    }
}
