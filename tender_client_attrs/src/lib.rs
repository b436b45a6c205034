use inflector::Inflector;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, parse_quote, spanned::Spanned, Attribute, FnArg, Ident, ItemTrait, Pat,
    PatIdent, PatType, ReturnType, TraitItem, TraitItemMethod, Type,
};

/// Turns an `async` trait into a remote service.
///
/// For `trait FooService` this generates `FooServiceClient<T>`, a module
/// `foo_service` with one `Operation` per method plus `interface()`, and the
/// provided methods `dispatch`, `handle_next_request` and `serve` on the
/// trait itself.
#[proc_macro_attribute]
pub fn service(_args: TokenStream, item: TokenStream) -> TokenStream {
    let service_trait = parse_macro_input!(item as ItemTrait);
    expand(service_trait)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

struct RemoteOperation {
    method: TraitItemMethod,
    op_ident: Ident,
    name: String,
    arg_idents: Vec<Ident>,
    arg_types: Vec<Type>,
    output: Type,
}

fn expand(mut service_trait: ItemTrait) -> syn::Result<TokenStream2> {
    if !service_trait.generics.params.is_empty() {
        return Err(syn::Error::new(
            service_trait.generics.span(),
            "generic service traits are not supported",
        ));
    }

    let operations = trait_methods(&service_trait)
        .map(remote_operation)
        .collect::<syn::Result<Vec<_>>>()?;

    let vis = service_trait.vis.clone();
    let service_trait_ident = service_trait.ident.clone();
    let service_name = service_trait_ident.to_string().to_snake_case();
    let ops_mod_ident = Ident::new(&service_name, service_trait_ident.span());
    let client_struct_ident = format_ident!("{}Client", service_trait_ident);

    let op_structs = operations.iter().map(|op| {
        let RemoteOperation {
            op_ident,
            name,
            arg_types,
            output,
            ..
        } = op;
        let doc = format!("Remote `{name}` operation.");
        quote! {
            #[doc = #doc]
            #[derive(Clone, Copy, Debug)]
            pub struct #op_ident;

            impl ::tender_client::Operation for #op_ident {
                const NAME: &'static str = #name;
                type Args = ( #(#arg_types,)* );
                type Output = #output;
            }
        }
    });

    let interface_entries = operations.iter().map(|op| {
        let name = &op.name;
        let args = op.arg_types.iter().map(type_name);
        let output = type_name(&op.output);
        quote! {
            .with_operation(#name, ::tender_client::Signature::new(&[#(#args),*], #output))
        }
    });

    let client_methods = operations.iter().map(|op| {
        let RemoteOperation {
            method,
            op_ident,
            arg_idents,
            arg_types,
            output,
            ..
        } = op;
        let docs = doc_attrs(&method.attrs);
        let method_ident = &method.sig.ident;
        quote! {
            #(#docs)*
            pub async fn #method_ident(&self, #(#arg_idents: #arg_types),*)
                -> ::core::result::Result<#output, ::tender_client::Error>
            {
                self.client
                    .call::<#ops_mod_ident::#op_ident>(( #(#arg_idents,)* ))
                    .await
            }
        }
    });

    let dispatch_arms = operations.iter().map(|op| {
        let RemoteOperation {
            method,
            op_ident,
            name,
            arg_idents,
            ..
        } = op;
        let method_ident = &method.sig.ident;
        quote! {
            #name => match request.args::<
                <#ops_mod_ident::#op_ident as ::tender_client::Operation>::Args
            >() {
                ::core::result::Result::Ok(( #(#arg_idents,)* )) => {
                    ::tender_client::operation::encode_reply(
                        &self.#method_ident(#(#arg_idents),*).await
                    )
                }
                ::core::result::Result::Err(reject) => ::core::result::Result::Err(reject),
            },
        }
    });

    let dispatch: TraitItem = parse_quote! {
        /// Runs the method named by `request`, or returns `None` when this
        /// service has no such method.
        async fn dispatch(
            &self,
            request: &::tender_client::Request,
        ) -> ::core::option::Option<::tender_client::Reply> {
            let reply = match request.method() {
                #(#dispatch_arms)*
                _ => return ::core::option::Option::None,
            };
            ::core::option::Option::Some(reply)
        }
    };

    let handle_next_request: TraitItem = parse_quote! {
        /// Reads one request from `transport`, runs the matching method and
        /// writes its reply back.
        async fn handle_next_request<T>(
            &self,
            transport: &mut T,
        ) -> ::core::result::Result<(), ::tender_client::Error>
        where
            T: ::tender_client::Transport + Send,
        {
            let request: ::tender_client::Request = transport.receive().await?;
            let reply = match self.dispatch(&request).await {
                ::core::option::Option::Some(reply) => reply,
                ::core::option::Option::None => ::core::result::Result::Err(
                    ::tender_client::Reject::unknown_method(request.method()),
                ),
            };
            transport.send(&reply).await
        }
    };

    let serve: TraitItem = parse_quote! {
        /// Answers requests until the peer disconnects.
        async fn serve<T>(
            &self,
            transport: &mut T,
        ) -> ::core::result::Result<(), ::tender_client::Error>
        where
            T: ::tender_client::Transport + Send,
        {
            loop {
                match self.handle_next_request(&mut *transport).await {
                    ::core::result::Result::Ok(()) => {}
                    ::core::result::Result::Err(err) if err.is_disconnect() => {
                        return ::core::result::Result::Ok(());
                    }
                    ::core::result::Result::Err(err) => return ::core::result::Result::Err(err),
                }
            }
        }
    };

    service_trait.items.push(dispatch);
    service_trait.items.push(handle_next_request);
    service_trait.items.push(serve);

    let client_doc = format!("Typed client for the remote `{service_name}` operations.");

    Ok(quote! {
        #[::tender_client::async_trait]
        #service_trait

        #vis mod #ops_mod_ident {
            #[allow(unused_imports)]
            use super::*;

            #(#op_structs)*

            /// Operations of this service as an interface description.
            pub fn interface() -> ::tender_client::Interface {
                ::tender_client::Interface::new(#service_name)
                    #(#interface_entries)*
            }
        }

        #[doc = #client_doc]
        #vis struct #client_struct_ident<T> {
            client: ::tender_client::Client<T>,
        }

        impl<T> ::core::clone::Clone for #client_struct_ident<T> {
            fn clone(&self) -> Self {
                Self {
                    client: ::core::clone::Clone::clone(&self.client),
                }
            }
        }

        impl<T> #client_struct_ident<T>
        where
            T: ::tender_client::Transport + Send + 'static,
        {
            pub fn new(client: ::tender_client::Client<T>) -> Self {
                Self { client }
            }

            pub fn client(&self) -> &::tender_client::Client<T> {
                &self.client
            }

            #(#client_methods)*
        }
    })
}

fn remote_operation(method: &TraitItemMethod) -> syn::Result<RemoteOperation> {
    let sig = &method.sig;
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(
            sig.fn_token.span(),
            "service methods must be `async fn`",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new(
            sig.generics.span(),
            "service methods cannot be generic",
        ));
    }
    match sig.inputs.first() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => {
            return Err(syn::Error::new(
                sig.ident.span(),
                "service methods must take `&self`",
            ))
        }
    }

    let mut arg_idents = Vec::new();
    let mut arg_types = Vec::new();
    for arg in sig.inputs.iter().skip(1) {
        let (pat_type, pat_ident) = typed_ident_arg(arg)?;
        arg_idents.push(pat_ident.ident.clone());
        arg_types.push(*pat_type.ty.clone());
    }

    let output = match &sig.output {
        ReturnType::Default => parse_quote!(()),
        ReturnType::Type(_, ty) => *ty.clone(),
    };

    Ok(RemoteOperation {
        method: method.clone(),
        op_ident: Ident::new(&sig.ident.to_string().to_pascal_case(), sig.ident.span()),
        name: sig.ident.to_string(),
        arg_idents,
        arg_types,
        output,
    })
}

fn trait_methods(item_trait: &ItemTrait) -> impl Iterator<Item = &TraitItemMethod> {
    item_trait.items.iter().filter_map(|item| match item {
        TraitItem::Method(method) => Some(method),
        _ => None,
    })
}

fn typed_ident_arg(arg: &FnArg) -> syn::Result<(&PatType, &PatIdent)> {
    match arg {
        FnArg::Typed(pat_type) => match pat_type.pat.as_ref() {
            Pat::Ident(pat_ident) => Ok((pat_type, pat_ident)),
            other => Err(syn::Error::new(
                other.span(),
                "service method arguments must be plain identifiers",
            )),
        },
        FnArg::Receiver(receiver) => Err(syn::Error::new(
            receiver.span(),
            "unexpected receiver",
        )),
    }
}

fn doc_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path.is_ident("doc"))
}

fn type_name(ty: &Type) -> String {
    quote!(#ty).to_string()
}
