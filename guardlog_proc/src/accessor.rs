//SPDX-License-Identifier: MIT OR Apache-2.0
use crate::parser::{AccessorDecl, compile_error, parse_accessor};
use proc_macro::TokenStream;

fn raw_place(path: &[String], leaf: Option<&str>) -> String {
    let mut place = String::from("raw");
    for segment in path.iter().map(String::as_str).chain(leaf) {
        place.push('.');
        place.push_str(segment);
    }
    place
}

pub fn guarded_field_impl(input: TokenStream) -> TokenStream {
    let decl = match parse_accessor(input) {
        Ok(decl) => decl,
        Err(e) => return e,
    };
    if decl.delegate.is_some() {
        return compile_error("guarded_field! does not take a delegate; use deep_guarded_field!");
    }
    let AccessorDecl {
        attrs,
        vis,
        name,
        ty,
        guard,
        path,
        ..
    } = decl;
    let place = raw_place(&path, Some(&name));
    let src = format!(
        r#"
        {ATTRS}
        {VIS} fn {NAME}(&self) -> {TY} {{
            self.{GUARD}.synchronize(|raw| ::core::clone::Clone::clone(&{PLACE}))
        }}

        #[doc = "Sets `{NAME}` while holding the guard."]
        {VIS} fn set_{NAME}(&self, value: {TY}) {{
            self.{GUARD}.synchronize(|raw| {PLACE} = value)
        }}
    "#,
        ATTRS = attrs,
        VIS = vis,
        NAME = name,
        TY = ty,
        GUARD = guard,
        PLACE = place,
    );
    src.parse().unwrap()
}

pub fn deep_guarded_field_impl(input: TokenStream) -> TokenStream {
    let decl = match parse_accessor(input) {
        Ok(decl) => decl,
        Err(e) => return e,
    };
    if decl.path.is_empty() {
        return compile_error(
            "deep_guarded_field! needs the owned object, e.g. `=> guard.owned`",
        );
    }
    let AccessorDecl {
        attrs,
        vis,
        name,
        ty,
        guard,
        path,
        delegate,
    } = decl;
    let delegate = delegate.unwrap_or_else(|| name.clone());
    let owned = raw_place(&path, None);
    let src = format!(
        r#"
        {ATTRS}
        {VIS} fn {NAME}(&self) -> {TY} {{
            self.{GUARD}.synchronize(|raw| {OWNED}.{DELEGATE}())
        }}

        #[doc = "Sets `{NAME}` on the owned object while holding the guard."]
        {VIS} fn set_{NAME}(&self, value: {TY}) {{
            self.{GUARD}.synchronize(|raw| {OWNED}.set_{DELEGATE}(value))
        }}
    "#,
        ATTRS = attrs,
        VIS = vis,
        NAME = name,
        TY = ty,
        GUARD = guard,
        OWNED = owned,
        DELEGATE = delegate,
    );
    src.parse().unwrap()
}
