use std::fs;

use flowtree::flow::tree::FlowTree;
use flowtree::flow::visit::FlowBuilder;
use indextree::NodeId;
use tempfile::TempDir;

fn child_labels(tree: &FlowTree, node_id: NodeId) -> Vec<String> {
    tree.get_children(node_id)
        .into_iter()
        .map(|id| tree.get_node(id).unwrap().label.clone())
        .collect()
}

fn find_child(tree: &FlowTree, node_id: NodeId, label: &str) -> NodeId {
    tree.get_children(node_id)
        .into_iter()
        .find(|&id| tree.get_node(id).unwrap().label == label)
        .unwrap_or_else(|| panic!("no child labeled {label:?}"))
}

#[test]
fn integration_full_script() {
    // A realistic script exercising most construct kinds at once
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.py");
    fs::write(
        &path,
        r#"import os
from pathlib import Path

class Loader:
    def __init__(self, root):
        self.root = root

    def load(self, name):
        full = os.path.join(self.root, name)
        try:
            with open(full) as f:
                return f.read()
        except OSError as e:
            log(e)
        finally:
            close_all()

async def main():
    loader = Loader(".")
    for name in names():
        if loader.load(name):
            count = count + 1
        else:
            skip(name)
    while pending():
        drain()
"#,
    )
    .unwrap();

    let source = fs::read_to_string(&path).unwrap();
    let display_name = path.to_string_lossy().to_string();
    let tree = FlowBuilder::generate(&source, &display_name).unwrap();

    let root = tree.root().unwrap();
    assert_eq!(tree.get_node(root).unwrap().label, display_name);

    let module = find_child(&tree, root, "Module");
    assert_eq!(
        child_labels(&tree, module),
        vec![
            "Import: import os",
            "From Import: from pathlib import Path",
            "Class: Loader",
            "Async Function: main()",
        ]
    );

    let class_id = find_child(&tree, module, "Class: Loader");
    assert_eq!(
        child_labels(&tree, class_id),
        vec!["Function: __init__()", "Function: load()"]
    );

    let init_id = find_child(&tree, class_id, "Function: __init__()");
    assert_eq!(child_labels(&tree, init_id), vec!["Assignment: self.root = root"]);

    let load_id = find_child(&tree, class_id, "Function: load()");
    assert_eq!(
        child_labels(&tree, load_id),
        vec![
            "Assignment: full = os.path.join(self.root, name)",
            "Try Block",
            "Except: OSError",
            "Finally Block",
        ]
    );

    let try_id = find_child(&tree, load_id, "Try Block");
    let with_id = find_child(&tree, try_id, "With Statement");
    assert_eq!(child_labels(&tree, with_id), vec!["Return: f.read()"]);

    let except_id = find_child(&tree, load_id, "Except: OSError");
    assert_eq!(child_labels(&tree, except_id), vec!["Function Call: log(e)"]);

    let finally_id = find_child(&tree, load_id, "Finally Block");
    assert_eq!(child_labels(&tree, finally_id), vec!["Function Call: close_all()"]);

    let main_id = find_child(&tree, module, "Async Function: main()");
    assert_eq!(
        child_labels(&tree, main_id),
        vec![
            "Assignment: loader = Loader(\".\")",
            "For Loop",
            "While Loop",
        ]
    );

    let for_id = find_child(&tree, main_id, "For Loop");
    assert_eq!(
        child_labels(&tree, for_id),
        vec!["If Condition", "Else Condition"]
    );
    let if_id = find_child(&tree, for_id, "If Condition");
    assert_eq!(child_labels(&tree, if_id), vec!["Assignment: count = count + 1"]);
    let else_id = find_child(&tree, for_id, "Else Condition");
    assert_eq!(child_labels(&tree, else_id), vec!["Function Call: skip(name)"]);

    let while_id = find_child(&tree, main_id, "While Loop");
    assert_eq!(child_labels(&tree, while_id), vec!["Function Call: drain()"]);
}

#[test]
fn integration_malformed_source_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.py");
    fs::write(&path, "def broken(:\n    pass\n").unwrap();

    let source = fs::read_to_string(&path).unwrap();
    let result = FlowBuilder::generate(&source, "broken.py");
    assert!(result.is_err());
}

#[test]
fn integration_walk_terminates_on_deep_nesting() {
    // Moderately deep lexical nesting; one display node per level, in order
    let mut source = String::new();
    let depth = 30;
    for level in 0..depth {
        source.push_str(&"    ".repeat(level));
        source.push_str(&format!("if x{level}:\n"));
    }
    source.push_str(&"    ".repeat(depth));
    source.push_str("done()\n");

    let tree = FlowBuilder::generate(&source, "deep.py").unwrap();
    let root = tree.root().unwrap();
    let module = find_child(&tree, root, "Module");

    let mut current = module;
    for _ in 0..depth {
        current = find_child(&tree, current, "If Condition");
    }
    assert_eq!(child_labels(&tree, current), vec!["Function Call: done()"]);
}
