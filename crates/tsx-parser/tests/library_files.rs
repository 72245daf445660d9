//! Parsing realistic component library files.

use camino::Utf8Path;
use pretty_assertions::assert_eq;
use tsx_parser::{parse, ExportBinding, ImportedName, ParseErrorKind, SourceKind, TypeDecl, ValueDecl};

const BUTTON: &str = r#"import * as React from "react";
import { cva, type VariantProps } from "class-variance-authority";
import Spinner from "./spinner";

const buttonVariants = cva("inline-flex", {
  variants: { size: { sm: "h-8", lg: "h-10" } },
});

export interface ButtonProps
  extends React.ButtonHTMLAttributes<HTMLButtonElement>,
    VariantProps<typeof buttonVariants> {
  /**
   * Shows a spinner.
   * @default false
   */
  loading?: boolean;
}

/** Primary action. */
const Button = React.forwardRef<HTMLButtonElement, ButtonProps>(
  ({ loading = false, ...props }, ref) => <button ref={ref} {...props} />,
);
Button.displayName = "Button";

export { Button, buttonVariants };
export type { ButtonProps as Props };
"#;

#[test]
fn test_indexes_a_component_module() {
    let file = parse(Utf8Path::new("src/ui/button.tsx"), BUTTON).unwrap();
    assert_eq!(file.kind(), SourceKind::Tsx);

    let index = file.index();
    assert_eq!(
        index.import("Spinner").map(|binding| &binding.imported),
        Some(&ImportedName::Default)
    );
    assert!(index.import("VariantProps").unwrap().type_only);
    assert_eq!(index.export("Button"), Some(&ExportBinding::Local("Button".into())));
    assert!(index.export("Props").is_none());
    assert!(index.is_type_export("ButtonProps"));
    assert!(!index.is_type_export("Button"));

    assert!(matches!(file.value_decl("Button"), Some(ValueDecl::Variable(_))));
    assert!(matches!(file.type_decl("ButtonProps"), Some(TypeDecl::Interface(_))));
}

#[test]
fn test_reads_docs_through_spans() {
    use swc_common::Spanned;

    let file = parse(Utf8Path::new("src/ui/button.tsx"), BUTTON).unwrap();
    let site = file.index().value("Button").unwrap();
    let item = file.item(site.item).unwrap();
    let doc = file.leading_doc(item.span()).unwrap();
    assert_eq!(doc.description, "Primary action.");

    let Some(TypeDecl::Interface(interface)) = file.type_decl("ButtonProps") else {
        panic!("expected interface");
    };
    let member = &interface.body.body[0];
    let doc = file.leading_doc(member.span()).unwrap();
    assert_eq!(doc.description, "Shows a spinner.");
    assert_eq!(doc.default_value.as_deref(), Some("false"));
}

#[test]
fn test_plain_typescript_rejects_jsx() {
    let err = parse(Utf8Path::new("src/util.ts"), "export const a = <div />;").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::Syntax { .. }));
    assert!(err.position.is_some());
}
