//! Design-token and style-variant extraction.
//!
//! Tokens come from three places:
//! - utility class strings (`"bg-primary px-4 rounded-md"`), classified by
//!   prefix
//! - CSS custom property names and `var(--name)` references, in source
//!   strings and in style files next to the component
//! - variant factory calls (`cva`, `tv`), whose `variants` and
//!   `defaultVariants` objects become the component's variant axes

use crate::config::ExtractorConfig;
use crate::functions::{callee_name, strip_parens};
use crate::structural::prop_name;
use component_registry::{TokenCategory, TokenUsage, VariantMap};
use indexmap::IndexMap;
use swc_common::Spanned;
use swc_ecma_ast::{CallExpr, Expr, Lit, ObjectLit, Prop, PropOrSpread, Str, TplElement};
use swc_ecma_visit::{Visit, VisitWith};
use tsx_parser::ParsedFile;

/// Tokens and variants found under one syntax node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenScan {
    /// Design tokens by category.
    pub usage: TokenUsage,
    /// Variant axes from factory calls.
    pub variants: VariantMap,
    /// `defaultVariants` entries: axis to option source text.
    pub default_variants: IndexMap<String, String>,
}

impl TokenScan {
    /// Adds `other`, letting its variant options win.
    pub fn merge(&mut self, other: &TokenScan) {
        self.usage.merge(&other.usage);
        for (axis, options) in &other.variants {
            let entry = self.variants.entry(axis.clone()).or_default();
            for (option, style) in options {
                entry.insert(option.clone(), style.clone());
            }
        }
        for (axis, value) in &other.default_variants {
            self.default_variants.insert(axis.clone(), value.clone());
        }
    }
}

/// Scans a whole file.
pub fn scan_module(file: &ParsedFile, config: &ExtractorConfig) -> TokenScan {
    scan_node(file.module(), file, config)
}

/// Scans one top-level item of a file.
pub fn scan_item(file: &ParsedFile, item: usize, config: &ExtractorConfig) -> TokenScan {
    match file.item(item) {
        Some(item) => scan_node(item, file, config),
        None => TokenScan::default(),
    }
}

fn scan_node<'a, N>(node: &N, file: &'a ParsedFile, config: &'a ExtractorConfig) -> TokenScan
where
    N: VisitWith<TokenCollector<'a>> + ?Sized,
{
    let mut collector = TokenCollector {
        file,
        config,
        scan: TokenScan::default(),
    };
    node.visit_with(&mut collector);
    collector.scan
}

pub(crate) struct TokenCollector<'a> {
    file: &'a ParsedFile,
    config: &'a ExtractorConfig,
    scan: TokenScan,
}

impl Visit for TokenCollector<'_> {
    fn visit_str(&mut self, value: &Str) {
        if let Some(text) = value.value.as_str() {
            scan_class_list(text, &mut self.scan.usage);
        }
    }

    fn visit_tpl_element(&mut self, element: &TplElement) {
        scan_class_list(element.raw.as_str(), &mut self.scan.usage);
    }

    fn visit_call_expr(&mut self, call: &CallExpr) {
        let is_factory = callee_name(&call.callee)
            .is_some_and(|name| self.config.is_variant_factory(&name));
        if is_factory {
            for arg in &call.args {
                if let Expr::Object(object) = strip_parens(&arg.expr) {
                    if self.read_variant_config(object) {
                        break;
                    }
                }
            }
        }
        call.visit_children_with(self);
    }
}

impl TokenCollector<'_> {
    /// Reads `variants` and `defaultVariants`; returns true if either exists.
    fn read_variant_config(&mut self, object: &ObjectLit) -> bool {
        let mut found = false;
        for (key, value) in key_values(object) {
            match (key.as_str(), value) {
                ("variants", Expr::Object(axes)) => {
                    found = true;
                    for (axis, options) in key_values(axes) {
                        let Expr::Object(options) = options else {
                            continue;
                        };
                        let entry = self.scan.variants.entry(axis).or_default();
                        for (option, style) in key_values(options) {
                            entry.insert(option, style_text(self.file, style));
                        }
                    }
                }
                ("defaultVariants", Expr::Object(defaults)) => {
                    found = true;
                    for (axis, value) in key_values(defaults) {
                        if let Some(text) = self.file.signature(value.span()) {
                            self.scan.default_variants.insert(axis, text);
                        }
                    }
                }
                _ => {}
            }
        }
        found
    }
}

fn key_values(object: &ObjectLit) -> impl Iterator<Item = (String, &Expr)> {
    object.props.iter().filter_map(|prop| match prop {
        PropOrSpread::Prop(prop) => match &**prop {
            Prop::KeyValue(kv) => Some((prop_name(&kv.key)?, &*kv.value)),
            _ => None,
        },
        PropOrSpread::Spread(_) => None,
    })
}

/// The class string of a variant option.
fn style_text(file: &ParsedFile, expr: &Expr) -> String {
    match strip_parens(expr) {
        Expr::Lit(Lit::Str(value)) => value.value.as_str().unwrap_or_default().to_string(),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .iter()
            .map(|quasi| quasi.raw.as_str())
            .collect::<String>(),
        Expr::Array(array) => array
            .elems
            .iter()
            .flatten()
            .map(|elem| style_text(file, &elem.expr))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        Expr::Object(object) => key_values(object)
            .map(|(_, value)| style_text(file, value))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        other => file.signature(other.span()).unwrap_or_default(),
    }
}

/// Records the tokens of one string if it reads as a class list.
///
/// `var(--name)` references are recorded from any string.
pub fn scan_class_list(text: &str, usage: &mut TokenUsage) {
    if text.contains("var(--") || text.trim_start().starts_with("--") {
        for name in custom_property_names(text) {
            usage.insert(TokenCategory::CustomProperty, name);
        }
    }
    if text.trim().is_empty() || !text.split_whitespace().all(is_class_like) {
        return;
    }
    for token in text.split_whitespace() {
        if let Some((category, name)) = classify_token(token) {
            usage.insert(category, name);
        }
    }
}

/// Records the custom properties declared or referenced in a style sheet.
pub fn scan_css(text: &str, usage: &mut TokenUsage) {
    for name in custom_property_names(text) {
        usage.insert(TokenCategory::CustomProperty, name);
    }
}

/// Every `--name` in `text` whose name starts with a letter.
fn custom_property_names(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut names = Vec::new();
    let mut i = 0;
    while let Some(found) = text[i..].find("--") {
        let start = i + found;
        let preceded_by_word = start > 0
            && (bytes[start - 1].is_ascii_alphanumeric() || bytes[start - 1] == b'-');
        let name_end = text[start + 2..]
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .map_or(text.len(), |end| start + 2 + end);
        let starts_with_letter = bytes
            .get(start + 2)
            .is_some_and(|b| b.is_ascii_alphabetic());
        if !preceded_by_word && starts_with_letter {
            names.push(text[start..name_end].to_string());
        }
        i = name_end.max(start + 2);
    }
    names
}

fn is_class_like(token: &str) -> bool {
    token.chars().all(|c| {
        c.is_ascii_alphanumeric()
            || matches!(
                c,
                '-' | ':' | '/' | '[' | ']' | '.' | '%' | '#' | '!' | '_' | '(' | ')' | ',' | '@' | '&' | '>' | '*' | '='
            )
    })
}

const SPACING_PREFIXES: [&str; 17] = [
    "p", "px", "py", "pt", "pr", "pb", "pl", "ps", "pe", "m", "mx", "my", "mt", "mr", "mb", "ml",
    "gap",
];

const COLOR_PREFIXES: [&str; 16] = [
    "ring-offset-",
    "placeholder-",
    "decoration-",
    "outline-",
    "divide-",
    "border-",
    "accent-",
    "stroke-",
    "caret-",
    "fill-",
    "ring-",
    "text-",
    "from-",
    "via-",
    "bg-",
    "to-",
];

const TEXT_SIZES: [&str; 5] = ["xs", "sm", "base", "lg", "xl"];

const NON_COLOR_VALUES: [&str; 36] = [
    "left", "center", "right", "justify", "start", "end", "wrap", "nowrap", "balance", "pretty",
    "ellipsis", "clip", "cover", "contain", "fixed", "local", "scroll", "repeat", "none", "auto",
    "solid", "dashed", "dotted", "double", "hidden", "collapse", "separate", "inset", "underline",
    "t", "b", "l", "r", "x", "y", "px",
];

/// Classifies one utility class, returning its category and the recorded
/// token (variant prefixes and `!`/`-` modifiers removed).
pub fn classify_token(token: &str) -> Option<(TokenCategory, String)> {
    let base = strip_variants(token);
    let base = base.trim_start_matches('!').trim_start_matches('-');
    if base.is_empty() {
        return None;
    }

    if base == "rounded" || base.starts_with("rounded-") {
        return Some((TokenCategory::Radius, base.to_string()));
    }
    if base == "shadow" || base.starts_with("shadow-") {
        return Some((TokenCategory::Shadow, base.to_string()));
    }
    if let Some((head, rest)) = base.split_once('-') {
        let spacing = SPACING_PREFIXES.contains(&head)
            || (head == "space" && (rest.starts_with("x-") || rest.starts_with("y-")));
        if spacing && !rest.is_empty() {
            return Some((TokenCategory::Spacing, base.to_string()));
        }
        if matches!(head, "font" | "leading" | "tracking") && !rest.is_empty() {
            return Some((TokenCategory::Typography, base.to_string()));
        }
        if head == "text" && is_text_size(rest) {
            return Some((TokenCategory::Typography, base.to_string()));
        }
    }

    let prefix = COLOR_PREFIXES.iter().find(|prefix| base.starts_with(**prefix))?;
    let mut value = &base[prefix.len()..];
    if matches!(*prefix, "border-" | "divide-") {
        for side in ["x-", "y-", "t-", "b-", "l-", "r-", "s-", "e-"] {
            if let Some(rest) = value.strip_prefix(side) {
                value = rest;
                break;
            }
        }
    }
    let color = value.split('/').next().unwrap_or(value);
    if !is_color_value(color) {
        return None;
    }
    let recorded = base.split('/').next().unwrap_or(base);
    Some((TokenCategory::Color, recorded.to_string()))
}

fn is_text_size(value: &str) -> bool {
    TEXT_SIZES.contains(&value)
        || value
            .strip_suffix("xl")
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

fn is_color_value(value: &str) -> bool {
    if value.is_empty() || NON_COLOR_VALUES.contains(&value) {
        return false;
    }
    if let Some(arbitrary) = value.strip_prefix('[') {
        return arbitrary.starts_with('#')
            || arbitrary.contains("var(")
            || arbitrary.starts_with("rgb")
            || arbitrary.starts_with("hsl")
            || arbitrary.starts_with("color:");
    }
    if value.starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }
    !["opacity-", "gradient-", "clip-", "origin-", "no-", "offset-", "spacing-"]
        .iter()
        .any(|prefix| value.starts_with(prefix))
}

/// Drops responsive and state prefixes: `md:hover:bg-primary` gives
/// `bg-primary`. Colons inside `[...]` are kept.
fn strip_variants(token: &str) -> &str {
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in token.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => start = i + 1,
            _ => {}
        }
    }
    &token[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use pretty_assertions::assert_eq;
    use tsx_parser::parse;

    fn usage_of(text: &str) -> TokenUsage {
        let mut usage = TokenUsage::new();
        scan_class_list(text, &mut usage);
        usage
    }

    fn set(values: &[&str]) -> std::collections::BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_classifies_utility_classes() {
        let usage = usage_of(
            "inline-flex items-center rounded-md bg-primary px-4 py-2 text-sm font-medium text-primary-foreground shadow hover:bg-primary/90 focus-visible:ring-2 ring-ring",
        );
        assert_eq!(usage.colors, set(&["bg-primary", "ring-ring", "text-primary-foreground"]));
        assert_eq!(usage.spacing, set(&["px-4", "py-2"]));
        assert_eq!(usage.typography, set(&["font-medium", "text-sm"]));
        assert_eq!(usage.radii, set(&["rounded-md"]));
        assert_eq!(usage.shadows, set(&["shadow"]));
    }

    #[test]
    fn test_ignores_non_color_values() {
        let usage = usage_of("text-center border border-2 border-t bg-cover ring-offset-2 text-2xl -mt-1");
        assert!(usage.colors.is_empty());
        assert_eq!(usage.typography, set(&["text-2xl"]));
        assert_eq!(usage.spacing, set(&["mt-1"]));
    }

    #[test]
    fn test_prose_is_not_a_class_list() {
        assert!(usage_of("Save changes? p-4").is_empty());
        assert!(usage_of("").is_empty());
    }

    #[test]
    fn test_reads_custom_properties() {
        let usage = usage_of("bg-[var(--brand)] text-white");
        assert_eq!(usage.custom_properties, set(&["--brand"]));
        assert_eq!(usage.colors, set(&["bg-[var(--brand)]", "text-white"]));

        let mut usage = TokenUsage::new();
        scan_css(
            ":root { --radius: 0.5rem; }\n.card { border-radius: var(--radius); color: var(--card-fg); }",
            &mut usage,
        );
        assert_eq!(usage.custom_properties, set(&["--card-fg", "--radius"]));
    }

    #[test]
    fn test_reads_variant_factories() {
        let file = parse(
            Utf8Path::new("src/button.tsx"),
            r#"const buttonVariants = cva("inline-flex rounded-md", {
  variants: {
    variant: { default: "bg-primary", outline: ["border", "border-input"] },
    size: { sm: `h-8 px-3`, lg: "h-10 px-8" },
  },
  defaultVariants: { variant: "default", size: "sm" },
});"#,
        )
        .unwrap();
        let scan = scan_module(&file, &ExtractorConfig::default());

        assert_eq!(scan.variants["variant"]["default"], "bg-primary");
        assert_eq!(scan.variants["variant"]["outline"], "border border-input");
        assert_eq!(scan.variants["size"]["sm"], "h-8 px-3");
        assert_eq!(scan.default_variants["size"], "\"sm\"");
        assert!(scan.usage.radii.contains("rounded-md"));
        assert!(scan.usage.colors.contains("bg-primary"));
    }

    #[test]
    fn test_tv_slots_are_joined() {
        let file = parse(
            Utf8Path::new("src/alert.tsx"),
            r#"const alert = tv({ variants: { tone: { info: { base: "bg-blue-50", icon: "text-blue-500" } } } });"#,
        )
        .unwrap();
        let scan = scan_module(&file, &ExtractorConfig::default());
        assert_eq!(scan.variants["tone"]["info"], "bg-blue-50 text-blue-500");
    }

    #[test]
    fn test_merge_prefers_incoming_options() {
        let mut base = TokenScan::default();
        base.variants
            .entry("size".into())
            .or_default()
            .insert("sm".into(), "h-8".into());
        let mut other = TokenScan::default();
        other
            .variants
            .entry("size".into())
            .or_default()
            .insert("sm".into(), "h-7".into());
        base.merge(&other);
        assert_eq!(base.variants["size"]["sm"], "h-7");
    }
}
