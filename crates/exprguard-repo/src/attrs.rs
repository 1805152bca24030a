use exprguard_types::{AttributeToScan, ExpressionSite, ExpressionSlot, RepoPath};
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ExprLit, ImplItem, Item, Lit, LitStr, Meta, Token, TraitItem, Type};

/// Parse one Rust source file and report every configured attribute carrying an expression.
///
/// Sites come out in source order. Attributes whose arguments have no string in the
/// configured slot (`#[pre_authorize(role = "ADMIN")]`) are ignored.
pub(crate) fn scan_source(
    path: &RepoPath,
    text: &str,
    attributes: &[AttributeToScan],
) -> syn::Result<Vec<ExpressionSite>> {
    let file = syn::parse_file(text)?;
    let mut walker = Walker {
        path,
        attributes,
        module: module_path(path),
        sites: Vec::new(),
    };
    walker.items(&file.items);
    Ok(walker.sites)
}

/// `src/handlers/admin.rs` is `handlers::admin`; `src/lib.rs` and `src/main.rs` are the crate root.
fn module_path(path: &RepoPath) -> Vec<String> {
    let segments = path.stem_segments();
    let after_src = match segments.iter().rposition(|s| *s == "src") {
        Some(i) => &segments[i + 1..],
        None => &segments[..],
    };
    let mut module: Vec<String> = after_src.iter().map(|s| s.to_string()).collect();
    if module
        .last()
        .is_some_and(|last| matches!(last.as_str(), "lib" | "main" | "mod"))
    {
        module.pop();
    }
    module
}

struct Walker<'a> {
    path: &'a RepoPath,
    attributes: &'a [AttributeToScan],
    module: Vec<String>,
    sites: Vec<ExpressionSite>,
}

impl Walker<'_> {
    fn items(&mut self, items: &[Item]) {
        for item in items {
            self.item(item);
        }
    }

    fn item(&mut self, item: &Item) {
        match item {
            Item::Fn(f) => {
                let owner = self.module_owner();
                self.collect(&f.attrs, &owner, Some(f.sig.ident.to_string().as_str()));
            }
            Item::Impl(imp) => {
                let owner = type_name(&imp.self_ty);
                self.collect(&imp.attrs, &owner, None);
                for inner in &imp.items {
                    if let ImplItem::Fn(method) = inner {
                        self.collect(&method.attrs, &owner, Some(method.sig.ident.to_string().as_str()));
                    }
                }
            }
            Item::Trait(tr) => {
                let owner = tr.ident.to_string();
                self.collect(&tr.attrs, &owner, None);
                for inner in &tr.items {
                    if let TraitItem::Fn(method) = inner {
                        self.collect(&method.attrs, &owner, Some(method.sig.ident.to_string().as_str()));
                    }
                }
            }
            Item::Struct(s) => self.collect(&s.attrs, &s.ident.to_string(), None),
            Item::Enum(e) => self.collect(&e.attrs, &e.ident.to_string(), None),
            Item::Mod(m) => {
                if let Some((_, items)) = &m.content {
                    self.module.push(m.ident.to_string());
                    self.items(items);
                    self.module.pop();
                }
            }
            _ => {}
        }
    }

    fn module_owner(&self) -> String {
        if self.module.is_empty() {
            "crate".to_string()
        } else {
            self.module.join("::")
        }
    }

    fn collect(&mut self, attrs: &[Attribute], owner: &str, member: Option<&str>) {
        for attr in attrs {
            let segments: Vec<String> = attr
                .path()
                .segments
                .iter()
                .map(|s| s.ident.to_string())
                .collect();

            // Two configured names may match the same attribute; report each slot once.
            let mut seen: Vec<&ExpressionSlot> = Vec::new();
            let attributes = self.attributes;
            for wanted in attributes.iter().filter(|a| a.matches_path(&segments)) {
                if seen.contains(&&wanted.slot) {
                    continue;
                }
                seen.push(&wanted.slot);

                if let Some(lit) = expression_literal(attr, &wanted.slot) {
                    let line = u32::try_from(lit.span().start().line).ok();
                    self.sites.push(
                        ExpressionSite::new(owner, member, lit.value())
                            .with_location(self.path.clone(), line),
                    );
                }
            }
        }
    }
}

fn type_name(ty: &Type) -> String {
    match ty {
        Type::Path(p) => p
            .path
            .segments
            .last()
            .map(|s| s.ident.to_string())
            .unwrap_or_default(),
        Type::Reference(r) => type_name(&r.elem),
        Type::Paren(p) => type_name(&p.elem),
        Type::Group(g) => type_name(&g.elem),
        _ => "impl".to_string(),
    }
}

fn expression_literal(attr: &Attribute, slot: &ExpressionSlot) -> Option<LitStr> {
    let Meta::List(list) = &attr.meta else {
        return None;
    };
    let args = list
        .parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)
        .ok()?;

    match slot {
        ExpressionSlot::Positional => args.iter().find_map(|arg| match arg {
            Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) => Some(s.clone()),
            Expr::Assign(assign) if is_key(&assign.left, "value") => string_literal(&assign.right),
            _ => None,
        }),
        ExpressionSlot::Named(key) => args.iter().find_map(|arg| match arg {
            Expr::Assign(assign) if is_key(&assign.left, key) => string_literal(&assign.right),
            _ => None,
        }),
    }
}

fn is_key(expr: &Expr, key: &str) -> bool {
    matches!(expr, Expr::Path(p) if p.path.is_ident(key))
}

fn string_literal(expr: &Expr) -> Option<LitStr> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Some(s.clone()),
        _ => None,
    }
}
