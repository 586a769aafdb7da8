//! The resolved syntax descriptors and the arena they live in.
//!
//! Nodes are addressed by [`NodeId`]. The resolver reserves a node's slot
//! before recursing into its children, so a cyclic type graph resolves its
//! back-edges to an already-stable index instead of recursing forever.

use std::collections::BTreeMap;

use xylem_model::{MetadataType, Name};

/// Stable index of a resolved element descriptor within one resolver's
/// arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// How one model element is represented in the DSL.
///
/// Child and generic slots hold [`NodeId`]s rather than nested descriptors;
/// traverse them through [`SyntaxView`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DslElementSyntax {
    pub(crate) element_name: String,
    pub(crate) prefix: Name,
    pub(crate) namespace: String,
    pub(crate) attribute_name: String,

    pub(crate) is_wrapped: bool,
    pub(crate) supports_child_declaration: bool,
    pub(crate) supports_top_level_declaration: bool,
    pub(crate) requires_config: bool,

    /// Generic type slots: array item type, dictionary key/value types,
    /// delegated object-type syntax. Keyed by the generic type's identity.
    pub(crate) generics: BTreeMap<String, NodeId>,

    /// Child element descriptors keyed by field name.
    pub(crate) children: BTreeMap<Name, NodeId>,
}

impl DslElementSyntax {
    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    pub fn prefix(&self) -> &Name {
        &self.prefix
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    pub fn is_wrapped(&self) -> bool {
        self.is_wrapped
    }

    pub fn supports_child_declaration(&self) -> bool {
        self.supports_child_declaration
    }

    pub fn supports_top_level_declaration(&self) -> bool {
        self.supports_top_level_declaration
    }

    pub fn requires_config(&self) -> bool {
        self.requires_config
    }
}

#[derive(Debug, Default)]
pub struct SyntaxArena {
    nodes: Vec<DslElementSyntax>,
}

impl SyntaxArena {
    /// Reserves a slot and hands back its index. The slot holds a default
    /// node until the resolver fills it; the index is already valid as a
    /// back-edge target.
    pub(crate) fn reserve(&mut self) -> NodeId {
        self.nodes.push(DslElementSyntax::default());
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn node_mut(
        &mut self,
        id: NodeId,
    ) -> &mut DslElementSyntax {
        &mut self.nodes[id.0]
    }

    pub fn node(
        &self,
        id: NodeId,
    ) -> &DslElementSyntax {
        &self.nodes[id.0]
    }

    pub fn view(
        &self,
        id: NodeId,
    ) -> SyntaxView<'_> {
        SyntaxView { arena: self, id }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Read access to one descriptor plus traversal into its children and
/// generic slots. This is the query surface downstream tooling consumes.
#[derive(Clone, Copy)]
pub struct SyntaxView<'a> {
    arena: &'a SyntaxArena,
    id: NodeId,
}

impl<'a> SyntaxView<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn node(&self) -> &'a DslElementSyntax {
        self.arena.node(self.id)
    }

    pub fn element_name(&self) -> &'a str {
        &self.node().element_name
    }

    pub fn prefix(&self) -> &'a Name {
        &self.node().prefix
    }

    pub fn namespace(&self) -> &'a str {
        &self.node().namespace
    }

    pub fn attribute_name(&self) -> &'a str {
        &self.node().attribute_name
    }

    pub fn is_wrapped(&self) -> bool {
        self.node().is_wrapped
    }

    pub fn supports_child_declaration(&self) -> bool {
        self.node().supports_child_declaration
    }

    pub fn supports_top_level_declaration(&self) -> bool {
        self.node().supports_top_level_declaration
    }

    pub fn requires_config(&self) -> bool {
        self.node().requires_config
    }

    pub fn child(
        &self,
        name: &str,
    ) -> Option<SyntaxView<'a>> {
        self.node()
            .children
            .get(&Name::from(name))
            .map(|id| self.arena.view(*id))
    }

    pub fn generic(
        &self,
        ty: &MetadataType,
    ) -> Option<SyntaxView<'a>> {
        self.generic_slot(&ty.type_key())
    }

    /// Generic lookup by raw slot key, for slots that are not keyed by a
    /// type identity (e.g. a dictionary's `key` slot).
    pub fn generic_slot(
        &self,
        key: &str,
    ) -> Option<SyntaxView<'a>> {
        self.node()
            .generics
            .get(key)
            .map(|id| self.arena.view(*id))
    }

    pub fn children(&self) -> impl Iterator<Item = (&'a Name, SyntaxView<'a>)> {
        self.node()
            .children
            .iter()
            .map(|(name, id)| (name, self.arena.view(*id)))
    }

    pub fn generics(&self) -> impl Iterator<Item = (&'a str, SyntaxView<'a>)> {
        self.node()
            .generics
            .iter()
            .map(|(key, id)| (key.as_str(), self.arena.view(*id)))
    }
}

#[cfg(test)]
mod test {
    use super::SyntaxArena;

    #[test]
    fn reserved_slots_are_stable_back_edge_targets() {
        let mut arena = SyntaxArena::default();

        let outer = arena.reserve();
        let inner = arena.reserve();
        assert_ne!(outer, inner);

        arena.node_mut(inner).element_name = "inner".into();
        arena
            .node_mut(outer)
            .children
            .insert("inner".into(), inner);
        arena.node_mut(outer).element_name = "outer".into();

        let view = arena.view(outer);
        assert_eq!(view.element_name(), "outer");
        assert_eq!(view.child("inner").unwrap().element_name(), "inner");
        assert!(view.child("ghost").is_none());
    }
}
