//SPDX-License-Identifier: MIT OR Apache-2.0

use proc_macro::{Delimiter, TokenStream, TokenTree};
use std::collections::VecDeque;

/// A parsed accessor declaration.
///
/// Both accessor macros share one grammar:
///
/// ```text
/// #[attrs]* vis? name: Type => guard(.segment)* (, delegate)?
/// ```
#[derive(Debug)]
pub struct AccessorDecl {
    /// Outer attributes (including `///` docs), forwarded to the getter.
    pub attrs: String,
    pub vis: String,
    pub name: String,
    pub ty: String,
    /// The field on `self` holding the `Guard`.
    pub guard: String,
    /// Segments inside the guarded state, after `guard`.
    pub path: Vec<String>,
    pub delegate: Option<String>,
}

/// Builds a `compile_error!` invocation carrying `message`.
pub fn compile_error(message: &str) -> TokenStream {
    format!("compile_error!({:?});", message).parse().unwrap()
}

fn is_punct(tree: Option<&TokenTree>, c: char) -> bool {
    matches!(tree, Some(TokenTree::Punct(p)) if p.as_char() == c)
}

fn stringify(trees: Vec<TokenTree>) -> String {
    TokenStream::from_iter(trees).to_string()
}

/// Consumes leading `#[...]` attributes.
fn parse_attrs(input: &mut VecDeque<TokenTree>) -> Result<String, TokenStream> {
    let mut attrs = Vec::new();
    while is_punct(input.front(), '#') {
        let hash = input.pop_front().unwrap();
        match input.pop_front() {
            Some(TokenTree::Group(g)) if g.delimiter() == Delimiter::Bracket => {
                attrs.push(hash);
                attrs.push(TokenTree::Group(g));
            }
            _ => return Err(compile_error("Expected `[` after `#`")),
        }
    }
    Ok(stringify(attrs))
}

/// Consumes `pub`, `pub(crate)`, `pub(super)` and friends, if present.
fn parse_vis(input: &mut VecDeque<TokenTree>) -> String {
    let mut vis = Vec::new();
    if matches!(input.front(), Some(TokenTree::Ident(i)) if i.to_string() == "pub") {
        vis.push(input.pop_front().unwrap());
        if matches!(input.front(), Some(TokenTree::Group(g)) if g.delimiter() == Delimiter::Parenthesis)
        {
            vis.push(input.pop_front().unwrap());
        }
    }
    stringify(vis)
}

fn parse_ident(input: &mut VecDeque<TokenTree>, what: &str) -> Result<String, TokenStream> {
    match input.pop_front() {
        Some(TokenTree::Ident(i)) => Ok(i.to_string()),
        _ => Err(compile_error(&format!("Expected {what}"))),
    }
}

/// Consumes the type up to and including the `=>` separator.
fn parse_type(input: &mut VecDeque<TokenTree>) -> Result<String, TokenStream> {
    let mut ty = Vec::new();
    loop {
        match input.pop_front() {
            Some(TokenTree::Punct(p)) if p.as_char() == '=' && is_punct(input.front(), '>') => {
                input.pop_front();
                if ty.is_empty() {
                    return Err(compile_error("Expected a type before `=>`"));
                }
                return Ok(stringify(ty));
            }
            Some(other) => ty.push(other),
            None => return Err(compile_error("Expected `=> guard` after the field type")),
        }
    }
}

pub fn parse_accessor(input: TokenStream) -> Result<AccessorDecl, TokenStream> {
    let mut input: VecDeque<_> = input.into_iter().collect();
    let attrs = parse_attrs(&mut input)?;
    let vis = parse_vis(&mut input);
    let name = parse_ident(&mut input, "a field name")?;
    if !is_punct(input.front(), ':') {
        return Err(compile_error("Expected ':' after the field name"));
    }
    input.pop_front();
    let ty = parse_type(&mut input)?;

    let guard = parse_ident(&mut input, "the guard field after `=>`")?;
    let mut path = Vec::new();
    while is_punct(input.front(), '.') {
        input.pop_front();
        path.push(parse_ident(&mut input, "a field name after '.'")?);
    }

    let mut delegate = None;
    if is_punct(input.front(), ',') {
        input.pop_front();
        //trailing comma is fine
        if !input.is_empty() {
            delegate = Some(parse_ident(&mut input, "a delegate name after ','")?);
        }
    }
    if is_punct(input.front(), ',') {
        input.pop_front();
    }
    if !input.is_empty() {
        return Err(compile_error("Unexpected tokens after accessor declaration"));
    }

    Ok(AccessorDecl {
        attrs,
        vis,
        name,
        ty,
        guard,
        path,
        delegate,
    })
}
