use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Field, Fields, FieldsNamed, Ident, parse_macro_input, spanned::Spanned,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Role {
    State,
    Weight,
}

impl Role {
    fn name(self) -> &'static str {
        match self {
            Role::State => "state",
            Role::Weight => "weight",
        }
    }
}

/// Field attribute: #[particle(state)] / #[particle(weight)]
///
/// Untagged structs use the fields literally named `state` and `weight`.
#[proc_macro_derive(Particle, attributes(particle))]
pub fn derive_particle(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_ident = &input.ident;

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new(
            struct_ident.span(),
            "Particle can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new(
            data.fields.span(),
            "Particle only supports structs with named fields",
        ));
    };

    // Tagged fields win; otherwise fall back to the conventional names.
    let mut state: Option<&Field> = None;
    let mut weight: Option<&Field> = None;
    for field in &fields.named {
        let Some(role) = role_of(field)? else {
            continue;
        };
        let slot = match role {
            Role::State => &mut state,
            Role::Weight => &mut weight,
        };
        if slot.is_some() {
            return Err(syn::Error::new(
                field.span(),
                format!("more than one field tagged #[particle({})]", role.name()),
            ));
        }
        *slot = Some(field);
    }
    let state = resolve(Role::State, state, fields, struct_ident)?;
    let weight = resolve(Role::Weight, weight, fields, struct_ident)?;
    if state.ident == weight.ident {
        return Err(syn::Error::new(
            state.span(),
            "one field cannot be both state and weight",
        ));
    }

    let state_ident = &state.ident;
    let state_ty = &state.ty;
    let weight_ident = &weight.ident;
    let weight_ty = &weight.ty;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::resampling::Particle for #struct_ident #ty_generics #where_clause {
            type State = #state_ty;
            type Weight = #weight_ty;

            #[inline]
            fn state(&self) -> &Self::State {
                &self.#state_ident
            }

            #[inline]
            fn weight(&self) -> Self::Weight {
                self.#weight_ident
            }
        }

        impl #impl_generics ::resampling::ParticleMut for #struct_ident #ty_generics #where_clause {
            #[inline]
            fn state_mut(&mut self) -> &mut Self::State {
                &mut self.#state_ident
            }

            #[inline]
            fn set_weight(&mut self, weight: Self::Weight) {
                self.#weight_ident = weight;
            }
        }
    })
}

fn resolve<'a>(
    role: Role,
    tagged: Option<&'a Field>,
    fields: &'a FieldsNamed,
    struct_ident: &Ident,
) -> syn::Result<&'a Field> {
    tagged
        .or_else(|| {
            fields
                .named
                .iter()
                .find(|f| f.ident.as_ref().is_some_and(|i| i == role.name()))
        })
        .ok_or_else(|| {
            syn::Error::new(
                struct_ident.span(),
                format!(
                    "missing `{0}` field; name one `{0}` or tag it with #[particle({0})]",
                    role.name()
                ),
            )
        })
}

/// Reads `#[particle(...)]` off a field, if present.
fn role_of(field: &Field) -> syn::Result<Option<Role>> {
    let mut role = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("particle") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("state") {
                role = Some(Role::State);
                Ok(())
            } else if meta.path.is_ident("weight") {
                role = Some(Role::Weight);
                Ok(())
            } else {
                Err(meta.error("use #[particle(state)] or #[particle(weight)]"))
            }
        })?;
    }
    Ok(role)
}
