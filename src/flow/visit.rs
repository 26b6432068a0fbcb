use anyhow::{bail, Result};
use indextree::NodeId;
use tracing::debug;
use tree_sitter::Node;

use crate::flow::tree::FlowTree;
use crate::flow::types::{NodeData, NodeStyle};
use crate::parser::python::{render_source, PythonParser};

/// Walks a parsed Python syntax tree and builds the display tree: one labeled
/// node per recognized construct, nested the way the source nests.
pub struct FlowBuilder<'a> {
    source: &'a str,
    tree: FlowTree,
}

impl<'a> FlowBuilder<'a> {
    /// Parse `source` and build the display tree, rooted at a node labeled
    /// with `display_name`.
    pub fn generate(source: &'a str, display_name: &str) -> Result<FlowTree> {
        let parser = PythonParser::new();
        let parsed = parser.parse(source)?;

        let mut builder = Self {
            source,
            tree: FlowTree::new(),
        };
        let root = builder
            .tree
            .add_node(None, NodeData::new(display_name, NodeStyle::Root));
        builder.visit(parsed.root_node(), root)?;
        Ok(builder.tree)
    }

    /// Classifier/dispatcher. Recognized kinds get a composer; everything
    /// else descends into its named children under the same parent, so
    /// unmodeled constructs are structurally transparent.
    fn visit(&mut self, node: Node, parent: NodeId) -> Result<()> {
        debug!(kind = node.kind(), "dispatching syntax node");
        match node.kind() {
            "module" => self.visit_module(node, parent),
            "function_definition" => self.visit_function(node, parent),
            "if_statement" => self.visit_if(node, parent),
            "for_statement" => self.visit_for(node, parent),
            "while_statement" => self.visit_while(node, parent),
            "try_statement" => self.visit_try(node, parent),
            "class_definition" => self.visit_class(node, parent),
            "lambda" => self.visit_lambda(node, parent),
            "expression_statement" => self.visit_expression_statement(node, parent),
            "return_statement" => self.visit_return(node, parent),
            "call" => self.visit_call(node, parent),
            "with_statement" => self.visit_with(node, parent),
            "import_statement" => {
                self.add_leaf(parent, format!("Import: {}", self.render(node)), NodeStyle::Import);
                Ok(())
            }
            "import_from_statement" => {
                self.add_leaf(
                    parent,
                    format!("From Import: {}", self.render(node)),
                    NodeStyle::Import,
                );
                Ok(())
            }
            // Transparent wrapper: show the definition, skip its decorators.
            "decorated_definition" => match node.child_by_field_name("definition") {
                Some(definition) => self.visit(definition, parent),
                None => self.generic_visit(node, parent),
            },
            _ => self.generic_visit(node, parent),
        }
    }

    /// Fallback for unrecognized kinds: visit every named child in source
    /// order, keeping the same parent.
    fn generic_visit(&mut self, node: Node, parent: NodeId) -> Result<()> {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            self.visit(child, parent)?;
        }
        Ok(())
    }

    fn visit_module(&mut self, node: Node, parent: NodeId) -> Result<()> {
        let module_id = self.add_leaf(parent, "Module", NodeStyle::Module);
        self.generic_visit(node, module_id)
    }

    fn visit_function(&mut self, node: Node, parent: NodeId) -> Result<()> {
        let name = self.field_text(node, "name");
        let (label, style) = if has_async_marker(node) {
            (format!("Async Function: {name}()"), NodeStyle::AsyncFunction)
        } else {
            (format!("Function: {name}()"), NodeStyle::Function)
        };
        let func_id = self.add_leaf(parent, label, style);
        self.visit_body(node, func_id)
    }

    fn visit_if(&mut self, node: Node, parent: NodeId) -> Result<()> {
        let if_id = self.add_leaf(parent, "If Condition", NodeStyle::Conditional);
        if let Some(consequence) = node.child_by_field_name("consequence") {
            self.generic_visit(consequence, if_id)?;
        }

        let mut cursor = node.walk();
        let alternatives: Vec<Node> = node.children_by_field_name("alternative", &mut cursor).collect();
        self.visit_alternatives(&alternatives, parent)
    }

    /// Compose an elif/else chain. The grammar flattens the clauses into
    /// siblings; the output nests them instead, so each elif shows up as an
    /// "If Condition" inside the enclosing "Else Condition" and any later
    /// clauses open a deeper "Else Condition" of their own.
    fn visit_alternatives(&mut self, alternatives: &[Node], parent: NodeId) -> Result<()> {
        let Some((first, rest)) = alternatives.split_first() else {
            return Ok(());
        };
        let else_id = self.add_leaf(parent, "Else Condition", NodeStyle::Alternative);
        match first.kind() {
            "elif_clause" => {
                let if_id = self.add_leaf(else_id, "If Condition", NodeStyle::Conditional);
                if let Some(consequence) = first.child_by_field_name("consequence") {
                    self.generic_visit(consequence, if_id)?;
                }
                self.visit_alternatives(rest, else_id)
            }
            _ => {
                if let Some(body) = first.child_by_field_name("body") {
                    self.generic_visit(body, else_id)?;
                }
                Ok(())
            }
        }
    }

    fn visit_for(&mut self, node: Node, parent: NodeId) -> Result<()> {
        let (label, style) = if has_async_marker(node) {
            ("Async For Loop", NodeStyle::AsyncLoop)
        } else {
            ("For Loop", NodeStyle::Loop)
        };
        let for_id = self.add_leaf(parent, label, style);
        // The loop's own else clause is never visited; its statements are
        // dropped from the output.
        self.visit_body(node, for_id)
    }

    fn visit_while(&mut self, node: Node, parent: NodeId) -> Result<()> {
        let while_id = self.add_leaf(parent, "While Loop", NodeStyle::While);
        self.visit_body(node, while_id)
    }

    fn visit_try(&mut self, node: Node, parent: NodeId) -> Result<()> {
        let try_id = self.add_leaf(parent, "Try Block", NodeStyle::Try);
        self.visit_body(node, try_id)?;

        let mut cursor = node.walk();
        let clauses: Vec<Node> = node.named_children(&mut cursor).collect();
        for clause in clauses {
            match clause.kind() {
                "except_clause" => {
                    let type_text = self
                        .handler_type(clause)
                        .unwrap_or_else(|| "None".to_string());
                    let except_id =
                        self.add_leaf(parent, format!("Except: {type_text}"), NodeStyle::Except);
                    // The handler node itself has no composer, so this
                    // descends generically into its block.
                    self.visit(clause, except_id)?;
                }
                "finally_clause" => {
                    let finally_id = self.add_leaf(parent, "Finally Block", NodeStyle::Finally);
                    let mut clause_cursor = clause.walk();
                    let blocks: Vec<Node> = clause
                        .named_children(&mut clause_cursor)
                        .filter(|child| child.kind() == "block")
                        .collect();
                    for block in blocks {
                        self.generic_visit(block, finally_id)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Exception type text of an except clause: the first named child before
    /// the handler block. A bare `except:` has none.
    fn handler_type(&self, clause: Node) -> Option<String> {
        let mut cursor = clause.walk();
        let type_node = clause
            .named_children(&mut cursor)
            .find(|child| child.kind() != "block")?;
        // `except E as e` arrives as an as_pattern; only the type is shown
        let type_node = if type_node.kind() == "as_pattern" {
            type_node.named_child(0).unwrap_or(type_node)
        } else {
            type_node
        };
        Some(self.render(type_node))
    }

    fn visit_class(&mut self, node: Node, parent: NodeId) -> Result<()> {
        let name = self.field_text(node, "name");
        let class_id = self.add_leaf(parent, format!("Class: {name}"), NodeStyle::Class);
        self.visit_body(node, class_id)
    }

    fn visit_lambda(&mut self, node: Node, parent: NodeId) -> Result<()> {
        // Rendered flat; the body expression is never decomposed.
        self.add_leaf(parent, format!("Lambda: {}", self.render(node)), NodeStyle::Lambda);
        Ok(())
    }

    fn visit_expression_statement(&mut self, node: Node, parent: NodeId) -> Result<()> {
        let Some(value) = node.named_child(0) else {
            return Ok(());
        };
        match value.kind() {
            "call" => {
                self.add_leaf(
                    parent,
                    format!("Function Call: {}", self.render(value)),
                    NodeStyle::Call,
                );
                Ok(())
            }
            "assignment" => {
                // Annotated assignments have no composer; descend instead.
                if value.child_by_field_name("type").is_some() {
                    return self.generic_visit(value, parent);
                }
                let left = value
                    .child_by_field_name("left")
                    .map(|n| self.render(n))
                    .unwrap_or_default();
                // Chained assignments nest on the right in the grammar; the
                // label shows the first target and the final value
                let mut rhs = value.child_by_field_name("right");
                while let Some(node) = rhs {
                    if node.kind() != "assignment" {
                        break;
                    }
                    rhs = node.child_by_field_name("right");
                }
                let right = rhs.map(|n| self.render(n)).unwrap_or_default();
                self.add_leaf(
                    parent,
                    format!("Assignment: {left} = {right}"),
                    NodeStyle::Assignment,
                );
                Ok(())
            }
            "augmented_assignment" => self.generic_visit(value, parent),
            _ => {
                self.add_leaf(
                    parent,
                    format!("Expression: {}", self.render(node)),
                    NodeStyle::Expression,
                );
                Ok(())
            }
        }
    }

    fn visit_return(&mut self, node: Node, parent: NodeId) -> Result<()> {
        let Some(value) = node.named_child(0) else {
            bail!(
                "return statement without a value at line {}",
                node.start_position().row + 1
            );
        };
        self.add_leaf(parent, format!("Return: {}", self.render(value)), NodeStyle::Return);
        Ok(())
    }

    fn visit_call(&mut self, node: Node, parent: NodeId) -> Result<()> {
        self.add_leaf(
            parent,
            format!("Function Call: {}", self.render(node)),
            NodeStyle::Call,
        );
        Ok(())
    }

    fn visit_with(&mut self, node: Node, parent: NodeId) -> Result<()> {
        // `async with` has no composer of its own and stays transparent.
        if has_async_marker(node) {
            return self.generic_visit(node, parent);
        }
        let with_id = self.add_leaf(parent, "With Statement", NodeStyle::With);
        self.visit_body(node, with_id)
    }

    /// Visit the statements of a construct's `body` field under `parent`.
    fn visit_body(&mut self, node: Node, parent: NodeId) -> Result<()> {
        if let Some(body) = node.child_by_field_name("body") {
            self.generic_visit(body, parent)?;
        }
        Ok(())
    }

    fn add_leaf(&mut self, parent: NodeId, label: impl Into<String>, style: NodeStyle) -> NodeId {
        let data = NodeData::new(label, style);
        debug!(label = data.label.as_str(), "appending display node");
        self.tree.add_node(Some(parent), data)
    }

    fn field_text(&self, node: Node, field: &str) -> String {
        node.child_by_field_name(field)
            .map(|n| self.render(n))
            .unwrap_or_default()
    }

    fn render(&self, node: Node) -> String {
        render_source(node, self.source)
    }
}

/// True when the construct carries the `async` keyword (async def,
/// async for, async with). The grammar exposes it as a direct child token.
fn has_async_marker(node: Node) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "async" {
            return true;
        }
    }
    false
}
