// Shared fixtures for document integration tests.
#![allow(dead_code)]

use std::collections::HashMap;

use jsonfile::api::Shared;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Age")]
    pub age: u32,
}

pub fn ada() -> Person {
    Person {
        name: "Ada".to_string(),
        age: 36,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: u32 },
    Square { side: u32 },
    Polygon(Vec<(i32, i32)>),
}

/// Layer assignments keyed by structured shapes; plain JSON cannot key a map this way.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub name: String,
    pub layers: HashMap<Shape, String>,
    pub focus: Option<Shape>,
}

pub fn canvas() -> Canvas {
    let mut layers = HashMap::new();
    layers.insert(Shape::Circle { radius: 4 }, "background".to_string());
    layers.insert(Shape::Square { side: 2 }, "overlay".to_string());
    layers.insert(
        Shape::Polygon(vec![(0, 0), (3, 0), (0, 4)]),
        "guides".to_string(),
    );
    Canvas {
        name: "board".to_string(),
        layers,
        focus: Some(Shape::Square { side: 2 }),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub children: Vec<Shared<TreeNode>>,
}

pub fn tree_node(name: &str) -> Shared<TreeNode> {
    Shared::new(TreeNode {
        name: name.to_string(),
        children: Vec::new(),
    })
}

/// root -> (a -> root), b
pub fn cyclic_tree() -> Shared<TreeNode> {
    let root = tree_node("root");
    let a = tree_node("a");
    a.borrow_mut().children.push(root.clone());
    root.borrow_mut().children.push(a);
    root.borrow_mut().children.push(tree_node("b"));
    root
}

/// Same nodes as `cyclic_tree` without the back edge.
pub fn acyclic_tree() -> Shared<TreeNode> {
    let root = tree_node("root");
    root.borrow_mut().children.push(tree_node("a"));
    root.borrow_mut().children.push(tree_node("b"));
    root
}
