//! `#[derive(Injectable)]` 实现

use crate::utils::{extract_arc_inner, extract_generic_type, field_has_attribute, is_type_named};
use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::{
    punctuated::Punctuated, spanned::Spanned, Data, DeriveInput, Error, Field, Fields, Meta,
    Result, Token,
};

/// 结构体级生命周期参数
#[derive(Debug, Clone, Copy, PartialEq)]
enum InjectableLifetime {
    Singleton,
    Scoped,
    Transient,
}

/// 字段的注入方式
enum Injection<'a> {
    Required(&'a syn::Type),
    Optional(&'a syn::Type),
    All(&'a syn::Type),
    Factory(&'a syn::Type),
    Default,
}

pub fn derive_injectable_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(
            &input.ident,
            "Injectable 只能用于结构体",
        ));
    };

    let construct = match &data.fields {
        Fields::Named(fields) => {
            let values = fields
                .named
                .iter()
                .map(|field| {
                    let ident = &field.ident;
                    let value = field_value(field)?;
                    Ok(quote! { #ident: #value })
                })
                .collect::<Result<Vec<_>>>()?;
            quote! { Self { #(#values),* } }
        }
        Fields::Unnamed(fields) => {
            let values = fields
                .unnamed
                .iter()
                .map(field_value)
                .collect::<Result<Vec<_>>>()?;
            quote! { Self( #(#values),* ) }
        }
        Fields::Unit => quote! { Self },
    };

    let descriptor = parse_lifetime(&input)?.map(|lifetime| {
        let variant = match lifetime {
            InjectableLifetime::Singleton => quote! { Singleton },
            InjectableLifetime::Scoped => quote! { Scoped },
            InjectableLifetime::Transient => quote! { Transient },
        };
        quote! {
            impl #impl_generics #name #ty_generics #where_clause {
                /// 按声明的生命周期生成服务描述符
                pub fn service_descriptor() -> ::di_abstractions::ServiceDescriptor {
                    ::di_abstractions::ServiceDescriptor::of_type::<Self>(
                        ::di_abstractions::Lifetime::#variant,
                    )
                }
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::di_abstractions::Injectable for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn create(
                provider: &dyn ::di_abstractions::ServiceProvider,
            ) -> ::di_abstractions::DependencyResult<Self> {
                #[allow(unused_imports)]
                use ::di_abstractions::ServiceProviderExt as _;
                ::std::result::Result::Ok(#construct)
            }
        }

        #descriptor
    })
}

fn field_value(field: &Field) -> Result<TokenStream> {
    let span = field.ty.span();
    let value = match classify(field)? {
        Injection::Required(service) => {
            quote_spanned! { span=> provider.get_required::<#service>()? }
        }
        Injection::Optional(service) => quote_spanned! { span=> provider.get::<#service>()? },
        Injection::All(service) => quote_spanned! { span=> provider.get_all::<#service>()? },
        Injection::Factory(service) => {
            quote_spanned! { span=> provider.get_factory::<#service>()? }
        }
        Injection::Default => quote_spanned! { span=> ::std::default::Default::default() },
    };
    Ok(value)
}

fn classify(field: &Field) -> Result<Injection<'_>> {
    if is_default_field(field)? {
        return Ok(Injection::Default);
    }

    let ty = &field.ty;
    if is_type_named(ty, "Arc") {
        if let Some(service) = extract_generic_type(ty) {
            return Ok(Injection::Required(service));
        }
    }
    if let Some(service) = extract_arc_inner(ty, "Option") {
        return Ok(Injection::Optional(service));
    }
    if let Some(service) = extract_arc_inner(ty, "Vec") {
        return Ok(Injection::All(service));
    }
    if is_type_named(ty, "ServiceFactory") {
        if let Some(service) = extract_generic_type(ty) {
            return Ok(Injection::Factory(service));
        }
    }

    Err(Error::new_spanned(
        ty,
        "不支持的注入字段类型: 需要 Arc<T>、Option<Arc<T>>、Vec<Arc<T>>、ServiceFactory<T> 或 #[inject(default)]",
    ))
}

/// 解析字段上的 `#[inject(default)]`
fn is_default_field(field: &Field) -> Result<bool> {
    if !field_has_attribute(field, "inject") {
        return Ok(false);
    }

    let mut default = false;
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("inject")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                default = true;
                Ok(())
            } else {
                Err(meta.error("未知的 inject 参数"))
            }
        })?;
    }
    Ok(default)
}

/// 解析结构体上的 `#[injectable(singleton | scoped | transient)]`
fn parse_lifetime(input: &DeriveInput) -> Result<Option<InjectableLifetime>> {
    let mut lifetime = None;

    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("injectable")) {
        let parsed = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        for meta in parsed {
            let path = match &meta {
                Meta::Path(path) => path,
                other => return Err(Error::new_spanned(other, "injectable 参数只能是生命周期")),
            };
            lifetime = Some(if path.is_ident("singleton") {
                InjectableLifetime::Singleton
            } else if path.is_ident("scoped") {
                InjectableLifetime::Scoped
            } else if path.is_ident("transient") {
                InjectableLifetime::Transient
            } else {
                return Err(Error::new_spanned(path, "未知的生命周期"));
            });
        }
    }

    Ok(lifetime)
}
