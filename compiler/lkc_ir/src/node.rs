//! Node-type registry.
//!
//! Node types form a single-inheritance taxonomy. Each type declares its own
//! parse fields; a concrete type's full field list is its ancestors' fields
//! followed by its own, in declaration order.
//!
//! List types record their element type. The list type registered through
//! [`NodeTypes::list_of`] is the *base list* of that element: the front-end
//! creates it automatically, so users cannot mark it abstract.

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{FieldId, NodeTypeId};

bitflags! {
    /// Static properties of a node type.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
    pub struct NodeFlags: u8 {
        /// Never instantiated directly.
        const ABSTRACT = 1 << 0;
        /// Built by the compiler, never by a parser.
        const SYNTHETIC = 1 << 1;
        /// Homogeneous list of element nodes.
        const LIST = 1 << 2;
        /// Wraps exactly one token; has no parse fields.
        const TOKEN_NODE = 1 << 3;
    }
}

/// A node type declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeTypeDef {
    pub name: String,
    pub flags: NodeFlags,
    pub base: Option<NodeTypeId>,
    /// Parse fields declared on this type (not inherited ones).
    pub own_fields: Vec<FieldId>,
    /// Element type, for list types.
    pub element: Option<NodeTypeId>,
}

/// A parse field declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDef {
    /// Type that declares the field.
    pub owner: NodeTypeId,
    pub name: String,
}

/// Registry of node types and their fields, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct NodeTypes {
    types: Vec<NodeTypeDef>,
    fields: Vec<FieldDef>,
    by_name: FxHashMap<String, NodeTypeId>,
    /// Element type -> automatically derived list type.
    base_lists: FxHashMap<NodeTypeId, NodeTypeId>,
}

impl NodeTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a node type.
    pub fn declare(&mut self, name: &str, base: Option<NodeTypeId>, flags: NodeFlags) -> NodeTypeId {
        let id = NodeTypeId::from_len(self.types.len());
        self.types.push(NodeTypeDef {
            name: name.to_owned(),
            flags,
            base,
            own_fields: Vec::new(),
            element: None,
        });
        self.by_name.insert(name.to_owned(), id);
        id
    }

    /// Declare a parse field on `owner`, after the fields already declared.
    pub fn add_field(&mut self, owner: NodeTypeId, name: &str) -> FieldId {
        let id = FieldId::from_len(self.fields.len());
        self.fields.push(FieldDef {
            owner,
            name: name.to_owned(),
        });
        self.types[owner.index()].own_fields.push(id);
        id
    }

    /// Declare a list type of `element` nodes.
    pub fn declare_list(&mut self, name: &str, element: NodeTypeId, flags: NodeFlags) -> NodeTypeId {
        let id = self.declare(name, None, flags | NodeFlags::LIST);
        self.types[id.index()].element = Some(element);
        id
    }

    /// The base list type of `element`, created on first request.
    pub fn list_of(&mut self, element: NodeTypeId) -> NodeTypeId {
        if let Some(&list) = self.base_lists.get(&element) {
            return list;
        }
        let name = format!("{}.list", self.types[element.index()].name);
        let list = self.declare_list(&name, element, NodeFlags::empty());
        self.base_lists.insert(element, list);
        list
    }

    #[inline]
    pub fn get(&self, id: NodeTypeId) -> &NodeTypeDef {
        &self.types[id.index()]
    }

    #[inline]
    pub fn name(&self, id: NodeTypeId) -> &str {
        &self.get(id).name
    }

    pub fn lookup(&self, name: &str) -> Option<NodeTypeId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn field(&self, id: FieldId) -> &FieldDef {
        &self.fields[id.index()]
    }

    /// `Owner.field`, as used in diagnostics and dumps.
    pub fn qualname(&self, id: FieldId) -> String {
        let field = self.field(id);
        format!("{}.{}", self.name(field.owner), field.name)
    }

    #[inline]
    pub fn flags(&self, id: NodeTypeId) -> NodeFlags {
        self.get(id).flags
    }

    pub fn is_abstract(&self, id: NodeTypeId) -> bool {
        self.flags(id).contains(NodeFlags::ABSTRACT)
    }

    pub fn is_synthetic(&self, id: NodeTypeId) -> bool {
        self.flags(id).contains(NodeFlags::SYNTHETIC)
    }

    pub fn is_list(&self, id: NodeTypeId) -> bool {
        self.flags(id).contains(NodeFlags::LIST)
    }

    pub fn is_token_node(&self, id: NodeTypeId) -> bool {
        self.flags(id).contains(NodeFlags::TOKEN_NODE)
    }

    /// Whether `id` is the list type automatically derived for its element.
    pub fn is_base_list(&self, id: NodeTypeId) -> bool {
        self.get(id)
            .element
            .is_some_and(|element| self.base_lists.get(&element) == Some(&id))
    }

    /// `id` followed by its ancestors, innermost first.
    pub fn ancestry(&self, id: NodeTypeId) -> SmallVec<[NodeTypeId; 8]> {
        let mut chain = SmallVec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            chain.push(node);
            current = self.get(node).base;
        }
        chain
    }

    /// All parse fields of `id`: inherited ones first, in declaration order.
    pub fn parse_fields(&self, id: NodeTypeId) -> Vec<FieldId> {
        self.ancestry(id)
            .iter()
            .rev()
            .flat_map(|&node| self.get(node).own_fields.iter().copied())
            .collect()
    }

    /// Closest type that both `a` and `b` derive from (or are).
    pub fn common_ancestor(&self, a: NodeTypeId, b: NodeTypeId) -> Option<NodeTypeId> {
        let b_chain = self.ancestry(b);
        self.ancestry(a)
            .into_iter()
            .find(|node| b_chain.contains(node))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Node types in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeTypeId, &NodeTypeDef)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, def)| (NodeTypeId::from_len(i), def))
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeTypeId> + '_ {
        (0..self.types.len()).map(NodeTypeId::from_len)
    }
}

#[cfg(test)]
mod tests;
