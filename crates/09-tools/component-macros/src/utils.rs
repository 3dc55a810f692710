//! 宏工具函数

use syn::{Field, GenericArgument, PathArguments, Type};

/// 类型路径最后一段的名称是否为 `name`
pub fn is_type_named(ty: &Type, name: &str) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == name),
        _ => false,
    }
}

/// 从类型中提取第一个泛型参数
pub fn extract_generic_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner_type) => Some(inner_type),
        _ => None,
    }
}

/// 提取 `Wrapper<Arc<T>>` 中的 `T`
pub fn extract_arc_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    if !is_type_named(ty, wrapper) {
        return None;
    }
    let arc = extract_generic_type(ty)?;
    if !is_type_named(arc, "Arc") {
        return None;
    }
    extract_generic_type(arc)
}

/// 检查字段是否有特定属性
pub fn field_has_attribute(field: &Field, attr_name: &str) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident(attr_name))
}
