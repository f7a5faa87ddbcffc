use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, Ident, LitStr, Result, Token, Visibility, bracketed, token};

use proc_macro_crate::{FoundCrate, crate_name};

/// Token variant names, with the compact notation character for each.
const TOKENS: &[(&str, &[char])] = &[
    ("Neutral", &['5', '•']),
    ("Up", &['8', '↑']),
    ("Down", &['2', '↓']),
    ("Left", &['4', '←']),
    ("Right", &['6', '→']),
    ("UpLeft", &['7', '↖']),
    ("UpRight", &['9', '↗']),
    ("DownLeft", &['1', '↙']),
    ("DownRight", &['3', '↘']),
    ("Punch", &['P', 'p']),
    ("Kick", &['K', 'k']),
    ("Grab", &['G', 'g']),
];

/// Right-hand side of a move: `[Down, DownRight, Right, Punch]` or `"236P"`.
enum Sequence {
    Idents(Span, Vec<Ident>),
    Notation(LitStr),
}

struct MoveSpec {
    name: LitStr,
    sequence: Sequence,
}

struct MovesInput {
    attrs: Vec<Attribute>,
    vis: Visibility,
    ident: Ident,
    moves: Vec<MoveSpec>,
}

impl Parse for MovesInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis: Visibility = input.parse()?;
        input.parse::<Token![const]>()?;
        let ident: Ident = input.parse()?;
        input.parse::<Token![=]>()?;

        let content;
        syn::braced!(content in input);
        let moves = Punctuated::<MoveSpec, Token![,]>::parse_terminated(&content)?
            .into_iter()
            .collect();

        if input.peek(Token![;]) {
            input.parse::<Token![;]>()?;
        }
        Ok(Self {
            attrs,
            vis,
            ident,
            moves,
        })
    }
}

impl Parse for MoveSpec {
    fn parse(input: ParseStream) -> Result<Self> {
        let name: LitStr = input.parse()?;
        input.parse::<Token![=>]>()?;

        let sequence = if input.peek(token::Bracket) {
            let content;
            let bracket = bracketed!(content in input);
            let idents = Punctuated::<Ident, Token![,]>::parse_terminated(&content)?
                .into_iter()
                .collect();
            Sequence::Idents(bracket.span.join(), idents)
        } else {
            Sequence::Notation(input.parse()?)
        };

        Ok(Self { name, sequence })
    }
}

// =============================================================================
// Validation (runs at macro expansion time)
// =============================================================================

/// Resolve a sequence to variant names, rejecting unknown and empty input.
fn resolve_sequence(spec: &MoveSpec) -> Result<Vec<&'static str>> {
    let resolved: Vec<&'static str> = match &spec.sequence {
        Sequence::Idents(span, idents) => {
            let mut out = Vec::with_capacity(idents.len());
            for ident in idents {
                let name = ident.to_string();
                let variant = TOKENS
                    .iter()
                    .map(|(variant, _)| *variant)
                    .find(|variant| *variant == name)
                    .ok_or_else(|| {
                        syn::Error::new(ident.span(), format!("unknown input token `{}`", name))
                    })?;
                out.push(variant);
            }
            if out.is_empty() {
                return Err(empty_error(*span, spec));
            }
            out
        }
        Sequence::Notation(lit) => {
            let mut out = Vec::new();
            for c in lit.value().chars().filter(|c| !c.is_whitespace()) {
                let variant = TOKENS
                    .iter()
                    .find(|(_, chars)| chars.contains(&c))
                    .map(|(variant, _)| *variant)
                    .ok_or_else(|| {
                        syn::Error::new(lit.span(), format!("unknown input token `{}`", c))
                    })?;
                out.push(variant);
            }
            if out.is_empty() {
                return Err(empty_error(lit.span(), spec));
            }
            out
        }
    };
    Ok(resolved)
}

fn empty_error(span: Span, spec: &MoveSpec) -> syn::Error {
    syn::Error::new(
        span,
        format!("move \"{}\" has an empty input sequence", spec.name.value()),
    )
}

// =============================================================================
// Crate path resolution
// =============================================================================

fn motion_crate_path() -> TokenStream2 {
    match crate_name("bevy-motion") {
        Ok(FoundCrate::Itself) => {
            quote!(::bevy_motion)
        }
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Err(_) => quote!(::bevy_motion),
    }
}

// =============================================================================
// Code generation
// =============================================================================

fn generate(input: &MovesInput, krate: &TokenStream2) -> Result<TokenStream2> {
    let mut defs = Vec::with_capacity(input.moves.len());
    for spec in &input.moves {
        let tokens = resolve_sequence(spec)?.into_iter().map(|v| {
            let variant = Ident::new(v, spec.name.span());
            quote!(#krate::Token::#variant)
        });
        let name = &spec.name;
        defs.push(quote! {
            #krate::MoveDef::new(#name, &[#(#tokens),*]),
        });
    }

    let attrs = &input.attrs;
    let vis = &input.vis;
    let ident = &input.ident;
    Ok(quote! {
        #(#attrs)*
        #vis const #ident: &'static [#krate::MoveDef] = &[
            #(#defs)*
        ];
    })
}

// =============================================================================
// Entry point
// =============================================================================

/// Declare a static move table for `CommandTrie::build`.
///
/// Sequences are written as a list of token names or as a notation string
/// (numpad digits, arrow glyphs, `P`/`K`/`G`). Later entries overwrite
/// earlier ones with the same sequence when the trie is built.
///
/// ```ignore
/// moves! {
///     pub const MOVES = {
///         "Fireball" => [Down, DownRight, Right, Punch],
///         "Shoryu" => "623P",
///         "Tatsu" => "↓↙←K",
///     };
/// }
///
/// let trie = CommandTrie::build(MOVES)?;
/// ```
///
/// Unknown tokens and empty sequences are compile errors.
#[proc_macro]
pub fn moves(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as MovesInput);
    let krate = motion_crate_path();

    match generate(&input, &krate) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
