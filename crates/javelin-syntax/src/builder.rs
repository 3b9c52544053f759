use crate::node::NodeData;
use crate::span::TextRange;
use crate::tree::{Node, NodeId, SyntaxTree};

/// Bottom-up tree construction: children are allocated first and handed to
/// their parent. Parent links are fixed up in [`TreeBuilder::build`].
///
/// External parsers and the test fixtures are the only producers; the
/// checker itself never constructs trees.
#[derive(Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder::default()
    }

    pub fn leaf(&mut self, data: NodeData, range: TextRange) -> NodeId {
        self.node(data, range, Vec::new())
    }

    pub fn node(&mut self, data: NodeData, range: TextRange, children: Vec<NodeId>) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Node {
            data,
            range,
            parent: None,
            children,
            synthetic: false,
        });
        id
    }

    pub fn synthetic(&mut self, data: NodeData, range: TextRange, children: Vec<NodeId>) -> NodeId {
        let id = self.node(data, range, children);
        self.nodes[id.as_u32() as usize].synthetic = true;
        id
    }

    pub fn mark_synthetic(&mut self, id: NodeId) {
        self.nodes[id.as_u32() as usize].synthetic = true;
    }

    pub fn build(mut self, root: NodeId) -> SyntaxTree {
        let mut links: Vec<(NodeId, NodeId)> = Vec::new();
        for (index, node) in self.nodes.iter().enumerate() {
            let parent = NodeId::new(index as u32);
            for &child in &node.children {
                links.push((child, parent));
            }
        }
        for (child, parent) in links {
            self.nodes[child.as_u32() as usize].parent = Some(parent);
        }
        SyntaxTree::from_parts(self.nodes, root)
    }
}
