use convert_case::{Case, Casing};
use syn::{ext::IdentExt, Attribute, Data, DeriveInput, Fields, Ident, LitStr, Token, Type};

/// Everything the derive needs to know about a record struct
pub struct RecordDescription {
    ident: Ident,
    name: String,
    members: Vec<Member>,
    indexer: Option<Member>,
}

/// A struct field exposed to rules, under `name`
pub struct Member {
    pub ident: Ident,
    pub name: String,
    pub ty: Type,
}

#[derive(Clone, Copy, Default)]
enum RenameRule {
    #[default]
    None,
    Pascal,
    Camel,
    Snake,
}

#[derive(Default)]
struct ContainerAttrs {
    name: Option<String>,
    rename_all: RenameRule,
}

#[derive(Default)]
struct FieldAttrs {
    rename: Option<String>,
    skip: bool,
    indexer: Option<String>,
}

const DEFAULT_INDEXER: &str = "Item";

impl RecordDescription {
    pub fn parse(input: &DeriveInput) -> syn::Result<Self> {
        if !input.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(&input.generics, "Record cannot be derived for generic structs"));
        }
        let fields = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(fields) => &fields.named,
                fields => return Err(syn::Error::new_spanned(fields, "Only named fields are supported")),
            },
            _ => return Err(syn::Error::new_spanned(&input.ident, "Only structs are supported")),
        };

        let container = ContainerAttrs::parse(&input.attrs)?;
        let name = container.name.unwrap_or_else(|| input.ident.unraw().to_string());

        let mut members: Vec<Member> = Vec::new();
        let mut indexer: Option<Member> = None;
        for field in fields {
            let Some(ident) = field.ident.clone() else { continue };
            let attrs = FieldAttrs::parse(&field.attrs)?;

            if let Some(indexer_name) = attrs.indexer {
                if indexer.is_some() {
                    return Err(syn::Error::new_spanned(&ident, "Only one member can be the indexer"));
                }
                indexer = Some(Member { ident: ident.clone(), name: indexer_name, ty: field.ty.clone() });
            }
            if attrs.skip {
                continue;
            }

            let member_name = attrs.rename.unwrap_or_else(|| container.rename_all.apply(&ident.unraw().to_string()));
            if members.iter().any(|m| m.name == member_name) {
                return Err(syn::Error::new_spanned(&ident, format!("Duplicate member name '{}'", member_name)));
            }
            members.push(Member { ident, name: member_name, ty: field.ty.clone() });
        }

        Ok(Self { ident: input.ident.clone(), name, members, indexer })
    }

    pub fn ident(&self) -> &Ident { &self.ident }
    pub fn name(&self) -> &str { &self.name }
    pub fn members(&self) -> &[Member] { &self.members }
    pub fn indexer(&self) -> Option<&Member> { self.indexer.as_ref() }
}

impl RenameRule {
    fn parse(lit: &LitStr) -> syn::Result<Self> {
        match lit.value().as_str() {
            "PascalCase" => Ok(RenameRule::Pascal),
            "camelCase" => Ok(RenameRule::Camel),
            "snake_case" => Ok(RenameRule::Snake),
            other => Err(syn::Error::new_spanned(lit, format!("Unknown rename rule '{}', expected PascalCase, camelCase or snake_case", other))),
        }
    }

    fn apply(self, name: &str) -> String {
        match self {
            RenameRule::None => name.to_string(),
            RenameRule::Pascal => name.to_case(Case::Pascal),
            RenameRule::Camel => name.to_case(Case::Camel),
            RenameRule::Snake => name.to_case(Case::Snake),
        }
    }
}

impl ContainerAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("record")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    parsed.name = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("rename_all") {
                    parsed.rename_all = RenameRule::parse(&meta.value()?.parse::<LitStr>()?)?;
                } else {
                    return Err(meta.error("unsupported record attribute, expected `name` or `rename_all`"));
                }
                Ok(())
            })?;
        }
        Ok(parsed)
    }
}

impl FieldAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("record")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    parsed.rename = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("skip") {
                    parsed.skip = true;
                } else if meta.path.is_ident("indexer") {
                    parsed.indexer = Some(if meta.input.peek(Token![=]) {
                        meta.value()?.parse::<LitStr>()?.value()
                    } else {
                        DEFAULT_INDEXER.to_string()
                    });
                } else {
                    return Err(meta.error("unsupported record attribute, expected `rename`, `skip` or `indexer`"));
                }
                Ok(())
            })?;
        }
        Ok(parsed)
    }
}
