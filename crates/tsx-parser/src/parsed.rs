//! Parsed source files.

use crate::comments::{leading_doc, DocComment};
use crate::error::{ParseError, ParseErrorKind};
use crate::line_index::{LineCol, LineIndex};
use crate::module_index::{ModuleIndex, TypeSite, ValueKind, ValueSite};
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;
use swc_common::{BytePos, FileName, SourceMap, Span, Spanned};
use swc_ecma_ast::{
    Decl, DefaultDecl, FnDecl, FnExpr, Module, ModuleDecl, ModuleItem, Stmt, TsInterfaceDecl,
    TsTypeAliasDecl, VarDeclarator,
};
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

/// The dialect of a source file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `.tsx`
    Tsx,
    /// `.ts` / `.mts` / `.cts`
    Ts,
    /// `.d.ts`
    Dts,
    /// `.jsx`
    Jsx,
    /// `.js` / `.mjs` / `.cjs`
    Js,
}

impl SourceKind {
    /// Detects the dialect from a path.
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        if path.as_str().ends_with(".d.ts") {
            return Some(Self::Dts);
        }
        match path.extension()? {
            "tsx" => Some(Self::Tsx),
            "ts" | "mts" | "cts" => Some(Self::Ts),
            "jsx" => Some(Self::Jsx),
            "js" | "mjs" | "cjs" => Some(Self::Js),
            _ => None,
        }
    }

    /// Returns the swc syntax for this dialect.
    pub fn syntax(self) -> Syntax {
        match self {
            Self::Tsx => Syntax::Typescript(TsSyntax {
                tsx: true,
                ..Default::default()
            }),
            Self::Ts => Syntax::Typescript(TsSyntax {
                tsx: false,
                ..Default::default()
            }),
            Self::Dts => Syntax::Typescript(TsSyntax {
                tsx: false,
                dts: true,
                ..Default::default()
            }),
            Self::Jsx | Self::Js => Syntax::Es(EsSyntax {
                jsx: true,
                ..Default::default()
            }),
        }
    }

    /// Returns true for TypeScript dialects.
    pub fn is_typescript(self) -> bool {
        matches!(self, Self::Tsx | Self::Ts | Self::Dts)
    }
}

/// A value declaration, borrowed from its module.
#[derive(Debug, Clone, Copy)]
pub enum ValueDecl<'a> {
    /// `function Name() {}`
    Function(&'a FnDecl),
    /// `export default function Name() {}`
    DefaultFunction(&'a FnExpr),
    /// One declarator of a variable statement.
    Variable(&'a VarDeclarator),
    /// `class Name {}`
    Class,
}

/// A type declaration, borrowed from its module.
#[derive(Debug, Clone, Copy)]
pub enum TypeDecl<'a> {
    /// `interface Name {}`
    Interface(&'a TsInterfaceDecl),
    /// `type Name = …`
    Alias(&'a TsTypeAliasDecl),
}

/// One parsed source file: the syntax tree plus everything needed to read
/// text, positions and documentation back out of it.
#[derive(Debug)]
pub struct ParsedFile {
    path: Utf8PathBuf,
    kind: SourceKind,
    source: String,
    module: Module,
    file_start: BytePos,
    line_index: LineIndex,
    index: ModuleIndex,
}

/// Parses one source file.
pub fn parse(path: &Utf8Path, source: &str) -> Result<ParsedFile, ParseError> {
    let kind = SourceKind::from_path(path).ok_or_else(|| {
        ParseError::new(
            ParseErrorKind::UnsupportedExtension {
                extension: path.extension().unwrap_or_default().to_string(),
            },
            None,
        )
    })?;

    let cm: Arc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        FileName::Custom(path.to_string()).into(),
        source.to_string(),
    );
    let file_start = fm.start_pos;
    let line_index = LineIndex::new(source);

    let mut parser = Parser::new(kind.syntax(), StringInput::from(&*fm), None);
    let module = parser.parse_module().map_err(|err| {
        let offset = err.span().lo.0.saturating_sub(file_start.0) as usize;
        ParseError::new(
            ParseErrorKind::Syntax {
                message: err.kind().msg().into_owned(),
            },
            Some(line_index.line_col(offset)),
        )
    })?;
    let index = ModuleIndex::build(&module);

    Ok(ParsedFile {
        path: path.to_owned(),
        kind,
        source: source.to_string(),
        module,
        file_start,
        line_index,
        index,
    })
}

impl ParsedFile {
    /// The path the file was parsed from.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// The file's dialect.
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// The full source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The syntax tree.
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// The top-level binding index.
    pub fn index(&self) -> &ModuleIndex {
        &self.index
    }

    /// Converts an swc position into a byte offset into [`Self::source`].
    #[inline]
    pub fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.file_start.0) as usize
    }

    /// Returns the source text covered by `span`.
    pub fn text(&self, span: Span) -> Option<&str> {
        self.source.get(self.offset(span.lo)..self.offset(span.hi))
    }

    /// Returns the text covered by `span` with whitespace runs collapsed to a
    /// single space. Used as the textual signature of type nodes.
    pub fn signature(&self, span: Span) -> Option<String> {
        self.text(span).map(normalize_whitespace)
    }

    /// Returns the documentation comment directly preceding `span`.
    pub fn leading_doc(&self, span: Span) -> Option<DocComment> {
        leading_doc(&self.source, self.offset(span.lo))
    }

    /// Returns the 1-indexed position of `pos`.
    pub fn line_col(&self, pos: BytePos) -> LineCol {
        self.line_index.line_col(self.offset(pos))
    }

    /// Resolves a value declaration by local name.
    pub fn value_decl(&self, name: &str) -> Option<ValueDecl<'_>> {
        let site = self.index.value(name)?;
        self.value_decl_at(site)
    }

    /// Resolves a value declaration from its site.
    pub fn value_decl_at(&self, site: ValueSite) -> Option<ValueDecl<'_>> {
        let item = self.module.body.get(site.item)?;
        if let ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(default_decl)) = item {
            return match &default_decl.decl {
                DefaultDecl::Fn(fn_expr) => Some(ValueDecl::DefaultFunction(fn_expr)),
                _ => None,
            };
        }
        match (item_decl(item), site.kind) {
            (Some(Decl::Fn(fn_decl)), ValueKind::Function) => Some(ValueDecl::Function(fn_decl)),
            (Some(Decl::Var(var_decl)), ValueKind::Variable { declarator }) => {
                var_decl.decls.get(declarator).map(ValueDecl::Variable)
            }
            (Some(Decl::Class(_)), ValueKind::Class) => Some(ValueDecl::Class),
            _ => None,
        }
    }

    /// Resolves a type declaration by name.
    pub fn type_decl(&self, name: &str) -> Option<TypeDecl<'_>> {
        let TypeSite { item, .. } = self.index.type_site(name)?;
        match item_decl(self.module.body.get(item)?)? {
            Decl::TsInterface(interface) => Some(TypeDecl::Interface(interface)),
            Decl::TsTypeAlias(alias) => Some(TypeDecl::Alias(alias)),
            _ => None,
        }
    }

    /// Returns the module item at `index`.
    pub fn item(&self, index: usize) -> Option<&ModuleItem> {
        self.module.body.get(index)
    }
}

/// Returns the declaration carried by a statement or `export` declaration.
pub fn item_decl(item: &ModuleItem) -> Option<&Decl> {
    match item {
        ModuleItem::Stmt(Stmt::Decl(decl)) => Some(decl),
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export_decl)) => Some(&export_decl.decl),
        _ => None,
    }
}

/// Collapses every whitespace run into one space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parses_tsx() {
        let file = parse(
            Utf8Path::new("src/Button.tsx"),
            "export const Button = () => <button>hi</button>;",
        )
        .unwrap();
        assert_eq!(file.kind(), SourceKind::Tsx);
        assert_eq!(file.module().body.len(), 1);
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let err = parse(Utf8Path::new("Button.vue"), "<template />").unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::UnsupportedExtension { .. }
        ));
    }

    #[test]
    fn test_reports_syntax_error_position() {
        let err = parse(Utf8Path::new("Broken.tsx"), "const a = 1;\nconst = ;").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::Syntax { .. }));
        assert_eq!(err.position.map(|p| p.line), Some(2));
    }

    #[test]
    fn test_reads_text_and_signature() {
        let source = "type Props = {\n  label:   string;\n};";
        let file = parse(Utf8Path::new("types.ts"), source).unwrap();
        let TypeDecl::Alias(alias) = file.type_decl("Props").unwrap() else {
            panic!("expected alias");
        };
        assert_eq!(
            file.signature(alias.type_ann.span()).as_deref(),
            Some("{ label: string; }")
        );
    }

    #[test]
    fn test_resolves_value_declarations() {
        let file = parse(
            Utf8Path::new("a.tsx"),
            "function Card() { return <div />; }\nexport const A = 1, B = 2;",
        )
        .unwrap();
        assert!(matches!(file.value_decl("Card"), Some(ValueDecl::Function(_))));
        assert!(matches!(file.value_decl("B"), Some(ValueDecl::Variable(_))));
        assert!(file.value_decl("Missing").is_none());
    }

    #[test]
    fn test_line_col_is_one_based() {
        let file = parse(Utf8Path::new("a.ts"), "const a = 1;\nconst b = 2;").unwrap();
        let second = file.module().body[1].span();
        assert_eq!(file.line_col(second.lo), LineCol::new(2, 1));
    }
}
