//! Source file outlining: tree-sitter parsing into named declaration trees.

use std::path::Path;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::Error;
use crate::grammar;
use crate::types::{OutlineNode, SymbolSpan};

/// Maximum source file size (16 MiB).
const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Produces the declaration outline of a source file. The registry and the
/// resolver speak to source files only through this seam.
pub trait SymbolSource {
    /// The outline of `path`: named declarations in document order, with
    /// member declarations nested one level down.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or outlined.
    fn outline(&self, path: &Path) -> Result<Vec<OutlineNode>, Error>;
}

/// The production symbol source: reads files from disk and parses them
/// with the bundled tree-sitter grammars.
#[derive(Default)]
pub struct TreeSitterSource;

impl SymbolSource for TreeSitterSource {
    /// Read `path` and outline its contents.
    fn outline(&self, path: &Path) -> Result<Vec<OutlineNode>, Error> {
        let source = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::FileNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(s) => s,
        };
        outline_source(path, &source)
    }
}

/// Outline in-memory source for `path`, choosing the grammar by extension.
///
/// # Errors
///
/// Returns `Error::UnsupportedLanguage` for unknown extensions,
/// `Error::FileTooLarge` if the source exceeds the size limit,
/// or `Error::ParseFailed` if tree-sitter cannot parse the source.
pub fn outline_source(path: &Path, source: &str) -> Result<Vec<OutlineNode>, Error> {
    let language = grammar::language_for_path(path)?;

    let source_len: u64 = source.len().try_into().unwrap_or(u64::MAX);
    if source_len > MAX_FILE_SIZE {
        return Err(Error::FileTooLarge {
            file: path.to_path_buf(),
            max_bytes: MAX_FILE_SIZE,
            size_bytes: source_len,
        });
    }

    let tree = parse_source(path, source, &language)?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    Ok(collect_outline(tree.root_node(), source, ext))
}

/// Parse source into a tree-sitter tree.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if the language cannot be set or parsing fails.
fn parse_source(path: &Path, source: &str, language: &Language) -> Result<Tree, Error> {
    let mut parser = Parser::new();
    parser.set_language(language).map_err(|e| Error::ParseFailed {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    parser.parse(source, None).ok_or_else(|| Error::ParseFailed {
        file: path.to_path_buf(),
        reason: "tree-sitter returned None".to_string(),
    })
}

/// Dispatch to the correct collector based on file extension.
fn collect_outline(root: Node<'_>, source: &str, ext: &str) -> Vec<OutlineNode> {
    match ext {
        "bash" | "sh" => collect_bash_outline(root, source),
        "go" => collect_go_outline(root, source),
        "js" | "jsx" | "ts" | "tsx" => collect_ts_outline(root, source),
        "md" | "markdown" => collect_md_outline(root, source),
        "py" => collect_python_outline(root, source),
        "rs" => collect_rust_outline(root, source),
        _ => Vec::new(),
    }
}

// ── Rust ───────────────────────────────────────────────────────────────

/// Walk the tree and collect named Rust declarations. Impl blocks become
/// entries named after the implemented type, with their functions as
/// children; trait and mod bodies contribute children the same way.
fn collect_rust_outline(root: Node<'_>, source: &str) -> Vec<OutlineNode> {
    let mut outline = Vec::new();
    let mut cursor = root.walk();

    for node in root.children(&mut cursor) {
        if node.kind() == "impl_item" {
            if let Some(entry) = rust_impl_node(node, source) {
                outline.push(entry);
            }
            continue;
        }
        if let Some(mut entry) = rust_named_node(node, source) {
            if node.kind() == "mod_item" || node.kind() == "trait_item" {
                entry.children = rust_body_members(node, source);
            }
            outline.push(entry);
        }
    }

    outline
}

/// Try to extract a named Rust declaration from a CST node.
fn rust_named_node(node: Node<'_>, source: &str) -> Option<OutlineNode> {
    match node.kind() {
        "const_item" | "enum_item" | "function_item" | "function_signature_item"
        | "mod_item" | "static_item" | "struct_item" | "trait_item" | "type_item" => {},
        _ => return None,
    }
    named_leaf(node, source)
}

/// Turn an impl block into an entry named after the implemented type.
fn rust_impl_node(node: Node<'_>, source: &str) -> Option<OutlineNode> {
    let type_node = node.child_by_field_name("type")?;
    let name = type_node.utf8_text(source.as_bytes()).ok()?.to_string();

    Some(OutlineNode {
        children: rust_body_members(node, source),
        name,
        span: span_of(node),
    })
}

/// Collect named members from an impl, trait, or mod body.
fn rust_body_members(node: Node<'_>, source: &str) -> Vec<OutlineNode> {
    let Some(body) = node.child_by_field_name("body") else {
        return Vec::new();
    };

    let mut members = Vec::new();
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        if let Some(member) = rust_named_node(child, source) {
            members.push(member);
        }
    }
    members
}

// ── TypeScript / JavaScript ────────────────────────────────────────────

/// Walk the tree and collect named TypeScript or JavaScript declarations.
/// Classes carry their methods as children.
fn collect_ts_outline(root: Node<'_>, source: &str) -> Vec<OutlineNode> {
    let mut outline = Vec::new();
    let mut cursor = root.walk();

    for child in root.children(&mut cursor) {
        // Exported declarations wrap the real declaration one level down.
        let node = unwrap_export(child);
        if node.kind() == "lexical_declaration" || node.kind() == "variable_declaration" {
            collect_ts_variable_declarators(node, source, &mut outline);
            continue;
        }
        if let Some(mut entry) = ts_named_node(node, source) {
            if node.kind() == "class_declaration" {
                entry.children = ts_class_members(node, source);
            }
            outline.push(entry);
        }
    }

    outline
}

/// Unwrap an `export_statement` to the declaration it exports.
fn unwrap_export(node: Node<'_>) -> Node<'_> {
    if node.kind() != "export_statement" {
        return node;
    }
    node.child_by_field_name("declaration").unwrap_or(node)
}

/// Try to extract a named TypeScript declaration with a direct "name" field.
fn ts_named_node(node: Node<'_>, source: &str) -> Option<OutlineNode> {
    match node.kind() {
        "class_declaration" | "enum_declaration" | "function_declaration"
        | "interface_declaration" | "type_alias_declaration" => {},
        _ => return None,
    }
    named_leaf(node, source)
}

/// Collect method definitions from a class body.
fn ts_class_members(class: Node<'_>, source: &str) -> Vec<OutlineNode> {
    let Some(body) = class.child_by_field_name("body") else {
        return Vec::new();
    };

    let mut members = Vec::new();
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        if child.kind() != "method_definition" {
            continue;
        }
        if let Some(member) = named_leaf(child, source) {
            members.push(member);
        }
    }
    members
}

/// Extract variable names from a `lexical_declaration` (const/let) or a
/// `variable_declaration` (var). Spans cover the full statement.
fn collect_ts_variable_declarators(
    node: Node<'_>,
    source: &str,
    outline: &mut Vec<OutlineNode>,
) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "variable_declarator" {
            continue;
        }
        let Some(name_node) = child.child_by_field_name("name") else {
            continue;
        };
        let Ok(name) = name_node.utf8_text(source.as_bytes()) else {
            continue;
        };
        outline.push(OutlineNode {
            children: Vec::new(),
            name: name.to_string(),
            span: span_of(node),
        });
    }
}

// ── Python ─────────────────────────────────────────────────────────────

/// Walk the tree and collect Python functions and classes. Classes carry
/// their methods and nested classes as children.
fn collect_python_outline(root: Node<'_>, source: &str) -> Vec<OutlineNode> {
    let mut outline = Vec::new();
    let mut cursor = root.walk();

    for node in root.children(&mut cursor) {
        if let Some(entry) = python_definition(node, source) {
            outline.push(entry);
        }
    }

    outline
}

/// Extract a function or class definition, unwrapping decorators.
fn python_definition(node: Node<'_>, source: &str) -> Option<OutlineNode> {
    // A decorated definition wraps the real def one level down.
    let node = if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition")?
    } else {
        node
    };

    match node.kind() {
        "class_definition" => {
            let mut entry = named_leaf(node, source)?;
            entry.children = python_class_members(node, source);
            Some(entry)
        },
        "function_definition" => named_leaf(node, source),
        _ => None,
    }
}

/// Collect member definitions from a class body block.
fn python_class_members(class: Node<'_>, source: &str) -> Vec<OutlineNode> {
    let Some(body) = class.child_by_field_name("body") else {
        return Vec::new();
    };

    let mut members = Vec::new();
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        if let Some(member) = python_definition(child, source) {
            members.push(member);
        }
    }
    members
}

// ── Go ─────────────────────────────────────────────────────────────────

/// Walk the tree and collect Go declarations. Methods attach as children
/// of their receiver's type entry when the type is declared in the same
/// file, and stay top-level otherwise.
fn collect_go_outline(root: Node<'_>, source: &str) -> Vec<OutlineNode> {
    let mut outline = Vec::new();

    // Types and plain functions first, so methods can find their parent.
    let mut decl_cursor = root.walk();
    for node in root.children(&mut decl_cursor) {
        match node.kind() {
            "function_declaration" => {
                if let Some(entry) = named_leaf(node, source) {
                    outline.push(entry);
                }
            },
            "type_declaration" => collect_go_type_specs(node, source, &mut outline),
            _ => {},
        }
    }

    let mut method_cursor = root.walk();
    for node in root.children(&mut method_cursor) {
        if node.kind() == "method_declaration" {
            attach_go_method(node, source, &mut outline);
        }
    }

    outline
}

/// Collect named `type_spec` entries from a `type_declaration`.
fn collect_go_type_specs(node: Node<'_>, source: &str, outline: &mut Vec<OutlineNode>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "type_spec" {
            continue;
        }
        if let Some(entry) = named_leaf(child, source) {
            outline.push(entry);
        }
    }
}

/// Attach a method to its receiver type's entry, or push it top-level
/// when the receiver type has no entry of its own.
fn attach_go_method(node: Node<'_>, source: &str, outline: &mut Vec<OutlineNode>) {
    let Some(method) = named_leaf(node, source) else {
        return;
    };

    let parent_index = go_receiver_type_name(node, source)
        .and_then(|name| outline.iter().position(|entry| entry.name == name));
    match parent_index {
        None => outline.push(method),
        Some(index) => {
            if let Some(parent) = outline.get_mut(index) {
                parent.children.push(method);
            }
        },
    }
}

/// The receiver type name of a Go method, with any pointer stripped.
fn go_receiver_type_name(node: Node<'_>, source: &str) -> Option<String> {
    let receiver = node.child_by_field_name("receiver")?;
    let mut cursor = receiver.walk();
    for child in receiver.children(&mut cursor) {
        if child.kind() != "parameter_declaration" {
            continue;
        }
        let type_node = child.child_by_field_name("type")?;
        let text = type_node.utf8_text(source.as_bytes()).ok()?;
        return Some(text.trim_start_matches('*').to_string());
    }
    None
}

// ── Bash ───────────────────────────────────────────────────────────────

/// Walk the tree and collect shell function definitions.
fn collect_bash_outline(root: Node<'_>, source: &str) -> Vec<OutlineNode> {
    let mut outline = Vec::new();
    let mut cursor = root.walk();

    for node in root.children(&mut cursor) {
        if node.kind() != "function_definition" {
            continue;
        }
        if let Some(entry) = named_leaf(node, source) {
            outline.push(entry);
        }
    }

    outline
}

// ── Markdown ───────────────────────────────────────────────────────────

/// Walk section nodes and use heading text as entry names. Top-level
/// sections become parents and their immediate subsections children;
/// deeper heading levels are not represented.
fn collect_md_outline(root: Node<'_>, source: &str) -> Vec<OutlineNode> {
    let mut outline = Vec::new();
    let mut cursor = root.walk();

    for child in root.children(&mut cursor) {
        if child.kind() != "section" {
            continue;
        }
        if let Some(mut entry) = markdown_section_node(child, source) {
            entry.children = markdown_subsections(child, source);
            outline.push(entry);
        }
    }

    outline
}

/// Build an outline entry for one section from its heading text.
fn markdown_section_node(section: Node<'_>, source: &str) -> Option<OutlineNode> {
    let heading = find_section_heading(section)?;
    let text = extract_heading_text(heading, source)?;
    if text.is_empty() {
        return None;
    }

    Some(OutlineNode {
        children: Vec::new(),
        name: text,
        span: span_of(section),
    })
}

/// Collect immediate child sections as outline children.
fn markdown_subsections(section: Node<'_>, source: &str) -> Vec<OutlineNode> {
    let mut children = Vec::new();
    let mut cursor = section.walk();
    for child in section.children(&mut cursor) {
        if child.kind() != "section" {
            continue;
        }
        if let Some(entry) = markdown_section_node(child, source) {
            children.push(entry);
        }
    }
    children
}

/// Find the ATX heading node of a section.
fn find_section_heading(section: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = section.walk();
    section
        .children(&mut cursor)
        .find(|child| child.kind() == "atx_heading")
}

/// Extract heading text from the inline content, falling back to the raw
/// heading line with markers stripped.
fn extract_heading_text(heading: Node<'_>, source: &str) -> Option<String> {
    let mut cursor = heading.walk();
    for child in heading.children(&mut cursor) {
        if child.kind() == "heading_content" || child.kind() == "inline" {
            let text = child.utf8_text(source.as_bytes()).ok()?;
            return Some(text.trim().to_string());
        }
    }
    let text = heading.utf8_text(source.as_bytes()).ok()?;
    Some(text.trim_start_matches('#').trim().to_string())
}

// ── Shared ─────────────────────────────────────────────────────────────

/// Build a leaf entry from any node carrying a `name` field.
fn named_leaf(node: Node<'_>, source: &str) -> Option<OutlineNode> {
    let name_node = node.child_by_field_name("name")?;
    let name = name_node.utf8_text(source.as_bytes()).ok()?.to_string();

    Some(OutlineNode {
        children: Vec::new(),
        name,
        span: span_of(node),
    })
}

/// Convert a node's zero-based position to a one-based span.
fn span_of(node: Node<'_>) -> SymbolSpan {
    let start = node.start_position();
    let end = node.end_position();

    SymbolSpan {
        end_line: u32::try_from(end.row).unwrap_or(u32::MAX).saturating_add(1),
        start_col: u32::try_from(start.column).unwrap_or(u32::MAX).saturating_add(1),
        start_line: u32::try_from(start.row).unwrap_or(u32::MAX).saturating_add(1),
    }
}
