use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Expr, ExprLit, Ident, Lit, LitStr, Meta};

/// Generates a `SignalGroup` implementation for a struct of model signals.
///
/// ```ignore
/// #[derive(Signals)]
/// #[signals(kind = "input")]
/// pub struct MagnetorquerInputs {
///     /// Magnetic field vector.
///     #[signal(name = "B")]
///     pub b: CartesianVector3,
/// }
/// ```
///
/// `kind` is one of `parameter`, `input` or `output`. A field's signal name
/// defaults to the field identifier and its description is taken from its
/// doc comment. The generated code refers to `crate::signal`, so the derive
/// is meant for the crate that defines those types.
#[proc_macro_derive(Signals, attributes(signals, signal))]
pub fn derive_signals(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens,
        Err(e) => e
            .to_compile_error()
            .into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data_struct) => &data_struct.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "#[derive(Signals)] only works on structs",
            ));
        }
    };

    let kind = parse_kind(input)?;

    let mut spec_lines = vec![];
    let mut get_arms = vec![];
    let mut set_arms = vec![];

    for field in fields.iter() {
        let Some(ident) = field
            .ident
            .as_ref()
        else {
            return Err(syn::Error::new_spanned(
                field,
                "#[derive(Signals)] requires named fields",
            ));
        };
        let ty = &field.ty;

        let mut name = ident.to_string();
        let mut doc = vec![];

        for attr in &field.attrs {
            if attr
                .path()
                .is_ident("signal")
            {
                attr.parse_nested_meta(|meta| {
                    if meta
                        .path
                        .is_ident("name")
                    {
                        name = meta
                            .value()?
                            .parse::<LitStr>()?
                            .value();
                        Ok(())
                    } else {
                        Err(meta.error("expected `name = \"...\"`"))
                    }
                })?;
            } else if attr
                .path()
                .is_ident("doc")
            {
                if let Meta::NameValue(nv) = &attr.meta {
                    if let Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) = &nv.value {
                        doc.push(
                            s.value()
                                .trim()
                                .to_string(),
                        );
                    }
                }
            }
        }
        let description = doc.join(" ");

        spec_lines.push(quote! {
            crate::signal::SignalSpec {
                name: #name,
                kind: crate::signal::SignalKind::#kind,
                signal_type: <#ty as crate::signal::SignalField>::SIGNAL_TYPE,
                default: crate::signal::SignalField::to_value(
                    &<#ty as crate::signal::SignalField>::ZERO,
                ),
                description: #description,
            }
        });
        get_arms.push(quote! {
            #name => Some(crate::signal::SignalField::to_value(&self.#ident)),
        });
        set_arms.push(quote! {
            #name => {
                self.#ident = <#ty as crate::signal::SignalField>::from_value(#name, value)?;
                Ok(())
            }
        });
    }

    let expanded = quote! {
        impl crate::signal::SignalGroup for #struct_name {
            fn specs() -> Vec<crate::signal::SignalSpec> {
                vec![#(#spec_lines),*]
            }

            #[allow(unused_variables)]
            fn get(&self, name: &str) -> Option<crate::signal::SignalValue> {
                match name {
                    #(#get_arms)*
                    _ => None,
                }
            }

            #[allow(unused_variables)]
            fn set(
                &mut self,
                name: &str,
                value: crate::signal::SignalValue,
            ) -> Result<(), crate::signal::SignalErrors> {
                match name {
                    #(#set_arms)*
                    _ => Err(crate::signal::SignalErrors::UnknownSignal(name.to_string())),
                }
            }
        }
    };

    Ok(TokenStream::from(expanded))
}

fn parse_kind(input: &DeriveInput) -> syn::Result<Ident> {
    let mut kind = None;
    for attr in &input.attrs {
        if attr
            .path()
            .is_ident("signals")
        {
            attr.parse_nested_meta(|meta| {
                if meta
                    .path
                    .is_ident("kind")
                {
                    let lit = meta
                        .value()?
                        .parse::<LitStr>()?;
                    let variant = match lit
                        .value()
                        .as_str()
                    {
                        "parameter" => "Parameter",
                        "input" => "Input",
                        "output" => "Output",
                        _ => {
                            return Err(syn::Error::new(
                                lit.span(),
                                "kind must be `parameter`, `input` or `output`",
                            ));
                        }
                    };
                    kind = Some(Ident::new(variant, lit.span()));
                    Ok(())
                } else {
                    Err(meta.error("expected `kind = \"...\"`"))
                }
            })?;
        }
    }
    kind.ok_or_else(|| {
        syn::Error::new_spanned(
            &input.ident,
            "#[derive(Signals)] requires #[signals(kind = \"...\")]",
        )
    })
}
