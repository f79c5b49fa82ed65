//! Identity-stable, parent-aware navigation over a parsed document
//!
//! Nodes live in a flat arena owned by the `Tree`; a parent is an index
//! into that arena, never a pointer, so splicing sub-documents cannot
//! create cycles or dangling references. Shape is immutable once built;
//! scalar content can be overwritten in place during resolution.

use crate::inject::UUID_FIELD_NAME;
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

/// Index of a node within its owning tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Structural kind of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    Scalar,
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    field_name: Option<String>,
    // identity for object/array nodes; scalar leaves carry none
    uuid: Option<String>,
    scalar: Option<JsonValue>,
    children: Vec<NodeId>,
    identifier: Option<String>,
    name: Option<String>,
    key: Option<String>,
}

/// Arena-backed document tree
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    /// Wrap a parsed document. Every object/array node is assigned an
    /// identity: the document's own `__uuid` field when present, a fresh
    /// one otherwise.
    pub fn from_document(document: &JsonValue) -> Self {
        let mut tree = Tree { nodes: Vec::new() };
        tree.wrap(document, None, None);
        tree
    }

    fn wrap(
        &mut self,
        value: &JsonValue,
        parent: Option<NodeId>,
        field_name: Option<String>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        match value {
            JsonValue::Object(map) => {
                self.nodes.push(NodeData {
                    kind: NodeKind::Object,
                    parent,
                    field_name,
                    uuid: Some(object_uuid(map)),
                    scalar: None,
                    children: Vec::new(),
                    identifier: scalar_string(map, "identifier"),
                    name: scalar_string(map, "name"),
                    key: scalar_string(map, "key"),
                });
                for (child_name, child_value) in map {
                    let child = self.wrap(child_value, Some(id), Some(child_name.clone()));
                    self.nodes[id.0].children.push(child);
                }
            }
            JsonValue::Array(items) => {
                self.nodes.push(NodeData {
                    kind: NodeKind::Array,
                    parent,
                    field_name,
                    uuid: Some(Uuid::new_v4().to_string()),
                    scalar: None,
                    children: Vec::new(),
                    identifier: None,
                    name: None,
                    key: None,
                });
                for item in items {
                    let child = self.wrap(item, Some(id), None);
                    self.nodes[id.0].children.push(child);
                }
            }
            scalar => {
                self.nodes.push(NodeData {
                    kind: NodeKind::Scalar,
                    parent,
                    field_name,
                    uuid: None,
                    scalar: Some(scalar.clone()),
                    children: Vec::new(),
                    identifier: None,
                    name: None,
                    key: None,
                });
            }
        }
        id
    }

    pub fn root(&self) -> Node<'_> {
        Node {
            tree: self,
            id: NodeId(0),
        }
    }

    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node { tree: self, id }
    }

    /// All node ids in creation order: a parent always precedes its
    /// children, siblings keep document order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Overwrite a scalar leaf's content in place; the tree's shape never
    /// changes. Returns false when the node is not a scalar.
    pub fn set_scalar(&mut self, id: NodeId, value: JsonValue) -> bool {
        let data = &mut self.nodes[id.0];
        if data.kind != NodeKind::Scalar {
            return false;
        }
        data.scalar = Some(value);
        true
    }

    /// Rebuild the generic document from the arena
    pub fn to_value(&self) -> JsonValue {
        if self.nodes.is_empty() {
            return JsonValue::Null;
        }
        self.value_of(NodeId(0))
    }

    fn value_of(&self, id: NodeId) -> JsonValue {
        let data = &self.nodes[id.0];
        match data.kind {
            NodeKind::Scalar => data.scalar.clone().unwrap_or(JsonValue::Null),
            NodeKind::Object => {
                let mut map = Map::new();
                for child in &data.children {
                    let child_data = &self.nodes[child.0];
                    let name = child_data.field_name.clone().unwrap_or_default();
                    map.insert(name, self.value_of(*child));
                }
                JsonValue::Object(map)
            }
            NodeKind::Array => JsonValue::Array(
                data.children.iter().map(|c| self.value_of(*c)).collect(),
            ),
        }
    }

    /// Locate a node by its identity
    pub fn find_by_uuid(&self, uuid: &str) -> Option<Node<'_>> {
        self.node_ids()
            .find(|id| self.nodes[id.0].uuid.as_deref() == Some(uuid))
            .map(|id| self.node(id))
    }
}

fn object_uuid(map: &Map<String, JsonValue>) -> String {
    match map.get(UUID_FIELD_NAME).and_then(JsonValue::as_str) {
        Some(existing) => existing.to_string(),
        None => Uuid::new_v4().to_string(),
    }
}

fn scalar_string(map: &Map<String, JsonValue>, field: &str) -> Option<String> {
    map.get(field).and_then(JsonValue::as_str).map(str::to_string)
}

/// Cheap navigable view of one node
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    tree: &'a Tree,
    id: NodeId,
}

/// Named edge from an object node to one of its children
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    pub name: &'a str,
    pub node: Node<'a>,
}

impl<'a> Node<'a> {
    fn data(&self) -> &'a NodeData {
        &self.tree.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    pub fn is_object(&self) -> bool {
        self.kind() == NodeKind::Object
    }

    pub fn is_array(&self) -> bool {
        self.kind() == NodeKind::Array
    }

    pub fn is_scalar(&self) -> bool {
        self.kind() == NodeKind::Scalar
    }

    pub fn uuid(&self) -> Option<&'a str> {
        self.data().uuid.as_deref()
    }

    /// Key under which this node hangs in its parent object
    pub fn field_name(&self) -> Option<&'a str> {
        self.data().field_name.as_deref()
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.data().parent.map(|id| self.tree.node(id))
    }

    /// Direct child lookup by key; `None` on non-object nodes
    pub fn field(&self, name: &str) -> Option<Field<'a>> {
        self.fields().into_iter().find(|f| f.name == name)
    }

    /// Named children in document order; empty on non-object nodes
    pub fn fields(&self) -> Vec<Field<'a>> {
        if self.data().kind != NodeKind::Object {
            return Vec::new();
        }
        self.data()
            .children
            .iter()
            .map(|c| {
                let node = self.tree.node(*c);
                Field {
                    name: node.field_name().unwrap_or_default(),
                    node,
                }
            })
            .collect()
    }

    /// Element nodes of an array, each parented to the array node itself;
    /// empty on non-array nodes
    pub fn as_array(&self) -> Vec<Node<'a>> {
        if self.data().kind != NodeKind::Array {
            return Vec::new();
        }
        self.data()
            .children
            .iter()
            .map(|c| self.tree.node(*c))
            .collect()
    }

    /// Raw scalar content of a leaf
    pub fn scalar(&self) -> Option<&'a JsonValue> {
        self.data().scalar.as_ref()
    }

    /// Scalar string content, if this is a string leaf
    pub fn as_str(&self) -> Option<&'a str> {
        self.scalar().and_then(JsonValue::as_str)
    }

    /// Own `identifier` field, read for disambiguation only
    pub fn identifier(&self) -> Option<&'a str> {
        self.data().identifier.as_deref()
    }

    /// Own `name` field, read for disambiguation only
    pub fn name(&self) -> Option<&'a str> {
        self.data().name.as_deref()
    }

    /// Own `key` field, read for disambiguation only
    pub fn key(&self) -> Option<&'a str> {
        self.data().key.as_deref()
    }

    /// Scalar disambiguator for elements whose value doubles as a key:
    /// `identifier`, then `name`, then `key`
    pub fn array_unique_identifier(&self) -> Option<&'a str> {
        self.identifier().or_else(|| self.name()).or_else(|| self.key())
    }
}
