use proc_macro::TokenStream;
use syn::parse::{Parse, ParseStream};
use syn::{Error as SynError, Ident, Path, Result as SynResult, Token, Type};

const SCOPES: [&str; 3] = ["Singleton", "Activity", "Fragment"];

#[derive(Default)]
pub struct AttributeData {
    pub output: Option<OutputData>,
    pub scope: Option<Ident>,
}

pub struct OutputData {
    pub output_type: Type,
    pub post_processor: Path,
}

pub fn parse_attributes(attr: TokenStream) -> SynResult<AttributeData> {
    if attr.is_empty() {
        return Ok(AttributeData::default());
    }
    syn::parse::<AttributeData>(attr)
}

impl Parse for AttributeData {
    fn parse(input: ParseStream) -> SynResult<Self> {
        let mut data = AttributeData::default();

        while !input.is_empty() {
            if input.peek(Ident) && input.peek2(Token![=]) {
                let name: Ident = input.parse()?;
                if name != "scope" {
                    return Err(SynError::new(name.span(), "unknown option, expects `scope`"));
                }
                input.parse::<Token![=]>()?;
                let scope: Ident = input.parse()?;
                if !SCOPES.iter().any(|s| scope == s) {
                    return Err(SynError::new(
                        scope.span(),
                        "expects `Singleton`, `Activity` or `Fragment`",
                    ));
                }
                if data.scope.replace(scope).is_some() {
                    return Err(SynError::new(name.span(), "duplicated `scope` option"));
                }
            } else {
                let output_type: Type = input.parse()?;
                if !input.peek(Token![,]) {
                    return Err(input.error(
                        "expects an output type and a post-processor function, separated by a comma",
                    ));
                }
                input.parse::<Token![,]>()?;
                let post_processor: Path = input.parse()?;
                let output = OutputData {
                    output_type,
                    post_processor,
                };
                if data.output.replace(output).is_some() {
                    return Err(input.error("duplicated output type"));
                }
            }

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        Ok(data)
    }
}
