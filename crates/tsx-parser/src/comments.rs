//! Leading documentation comments.
//!
//! swc's comment store is single-threaded, and parsed files are shared
//! between worker threads, so documentation is recovered straight from the
//! source text instead: the comment block immediately preceding a node
//! (separated only by whitespace) is its documentation.

/// A parsed JSDoc-style comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    /// Free text before the first block tag.
    pub description: String,
    /// Bodies of `@example` tags, in order.
    pub examples: Vec<String>,
    /// The `@default` / `@defaultValue` tag, if present.
    pub default_value: Option<String>,
    /// Whether a `@deprecated` tag is present.
    pub deprecated: bool,
}

impl DocComment {
    /// Returns true when the comment carries no information.
    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
            && self.examples.is_empty()
            && self.default_value.is_none()
            && !self.deprecated
    }
}

/// Finds and parses the comment that ends right before `offset`.
pub fn leading_doc(source: &str, offset: usize) -> Option<DocComment> {
    let before = source.get(..offset)?.trim_end();

    let lines = if let Some(body) = before.strip_suffix("*/") {
        let start = body.rfind("/*")?;
        let inner = &body[start + 2..];
        let inner = inner.strip_prefix('*').unwrap_or(inner);
        inner
            .lines()
            .map(|line| {
                let line = line.trim();
                line.strip_prefix('*').unwrap_or(line).to_string()
            })
            .collect::<Vec<_>>()
    } else {
        let mut lines: Vec<String> = before
            .lines()
            .rev()
            .map(str::trim)
            .take_while(|line| line.starts_with("//"))
            .map(|line| line.trim_start_matches('/').to_string())
            .collect();
        if lines.is_empty() {
            return None;
        }
        lines.reverse();
        lines
    };

    let doc = parse_doc_lines(&lines);
    (!doc.is_empty()).then_some(doc)
}

enum Section {
    Description,
    Example,
    Default,
    Other,
}

fn parse_doc_lines(lines: &[String]) -> DocComment {
    let mut doc = DocComment::default();
    let mut description = Vec::new();
    let mut example = Vec::new();
    let mut section = Section::Description;

    for raw in lines {
        let line = raw.strip_prefix(' ').unwrap_or(raw);
        let trimmed = line.trim();

        if let Some(tag_line) = trimmed.strip_prefix('@') {
            if matches!(section, Section::Example) {
                flush_example(&mut example, &mut doc);
            }
            let (tag, rest) = tag_line
                .split_once(char::is_whitespace)
                .map(|(tag, rest)| (tag, rest.trim()))
                .unwrap_or((tag_line, ""));
            section = match tag {
                "example" => {
                    if !rest.is_empty() {
                        example.push(rest.to_string());
                    }
                    Section::Example
                }
                "default" | "defaultValue" => {
                    if !rest.is_empty() {
                        doc.default_value = Some(rest.to_string());
                    }
                    Section::Default
                }
                "deprecated" => {
                    doc.deprecated = true;
                    Section::Other
                }
                _ => Section::Other,
            };
            continue;
        }

        match section {
            Section::Description => description.push(trimmed.to_string()),
            Section::Example => example.push(line.trim_end().to_string()),
            Section::Default => {
                if doc.default_value.is_none() && !trimmed.is_empty() {
                    doc.default_value = Some(trimmed.to_string());
                }
            }
            Section::Other => {}
        }
    }
    if matches!(section, Section::Example) {
        flush_example(&mut example, &mut doc);
    }

    doc.description = description
        .iter()
        .map(String::as_str)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    doc
}

fn flush_example(example: &mut Vec<String>, doc: &mut DocComment) {
    let body = example.join("\n").trim().to_string();
    if !body.is_empty() {
        doc.examples.push(body);
    }
    example.clear();
}
