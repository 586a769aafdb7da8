//! The recursive syntax tree builder.
//!
//! One resolver instance is built per (extension model, resolving context)
//! pair. Resolution is pure computation over already-loaded metadata;
//! termination on cyclic type graphs is guaranteed by memoizing a type's
//! reserved arena slot *before* walking its fields, never by a depth bound.
//!
//! Resolution methods take `&mut self` (the memo table and arena mutate),
//! which makes the single-threaded usage contract structural: concurrent
//! resolution against one instance does not compile.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;
use xylem_model::{
    ComponentModel, DslResolvingContext, ExpressionSupport, ExtensionModel, MetadataType, Name,
    ObjectType, ParameterDsl, ParameterModel, XmlDslProperties,
};

use crate::{
    catalog::{ImportedTypesCatalog, SubTypesCatalog, TypeLookup},
    classify, naming,
    syntax::{NodeId, SyntaxArena, SyntaxView},
};

/// Generics-map slot reserved for a dictionary's key. The key is a plain
/// attribute with no type-specific shape, so it is slot-named rather than
/// keyed by its declared type.
pub const KEY_SLOT: &str = "key";

/// Memo key: (type identity, prefix, namespace uri). The same type imported
/// under two namespaces resolves to two descriptors.
type MemoKey = (String, Name, String);

#[derive(Debug)]
pub struct DslSyntaxResolver<'a> {
    extension: &'a ExtensionModel,
    xml: XmlDslProperties,
    sub_types: SubTypesCatalog,
    imports: ImportedTypesCatalog,
    arena: SyntaxArena,
    memo: BTreeMap<MemoKey, NodeId>,
    building: BTreeSet<MemoKey>,
}

impl<'a> DslSyntaxResolver<'a> {
    /// Fails fast when the extension declares no XML DSL properties (there
    /// is no namespace to default to) or when its imports cannot be
    /// resolved against the context.
    pub fn new(
        extension: &'a ExtensionModel,
        context: &dyn DslResolvingContext,
    ) -> crate::Result<Self> {
        let xml = extension.xml.clone().ok_or_else(|| {
            crate::Error::MissingXmlProperties {
                extension: extension.name.clone(),
            }
        })?;
        let imports = ImportedTypesCatalog::build(extension, context)?;

        Ok(Self {
            extension,
            xml,
            sub_types: SubTypesCatalog::build(extension),
            imports,
            arena: SyntaxArena::default(),
            memo: BTreeMap::new(),
            building: BTreeSet::new(),
        })
    }

    pub fn arena(&self) -> &SyntaxArena {
        &self.arena
    }

    pub fn syntax(
        &self,
        id: NodeId,
    ) -> SyntaxView<'_> {
        self.arena.view(id)
    }

    /// Element syntax for a named component: hyphenated name in the
    /// extension's own namespace.
    pub fn resolve_component(
        &mut self,
        component: &ComponentModel,
    ) -> NodeId {
        let element_name = naming::hyphenize(component.name.as_str());
        let prefix = self.xml.prefix.clone();
        let namespace = self.xml.namespace.clone();

        let id = self.arena.reserve();
        let node = self.arena.node_mut(id);
        node.element_name = element_name;
        node.prefix = prefix;
        node.namespace = namespace;
        node.requires_config = component.requires_config;
        id
    }

    /// Element syntax for a parameter, dispatching on its declared type.
    pub fn resolve_parameter(
        &mut self,
        parameter: &ParameterModel,
    ) -> crate::Result<NodeId> {
        let owner = self.xml.clone();
        let id = self.arena.reserve();
        self.resolve_value_into(
            id,
            parameter.name.as_str(),
            &parameter.ty,
            parameter.expression_support,
            &parameter.dsl,
            parameter.role.is_content(),
            &owner,
        )?;
        Ok(id)
    }

    /// Standalone element syntax for a type. Only object-like types have
    /// one; `None` when the type supports neither inline, top-level, nor
    /// wrapped declaration.
    pub fn resolve_type(
        &mut self,
        ty: &MetadataType,
    ) -> crate::Result<Option<NodeId>> {
        let Some(obj) = self.lookup().object_of(ty)?.cloned() else {
            return Ok(None);
        };
        let owner = self.xml.clone();
        Ok(self
            .resolve_object_type(ty, &obj, &owner)?
            .map(|(id, _)| id))
    }

    fn lookup(&self) -> TypeLookup<'a> {
        TypeLookup::new(self.extension)
    }

    /// The effective namespace for a type: the origin extension's when the
    /// type was imported, the caller's default otherwise.
    fn resolve_namespace(
        &self,
        ty: &MetadataType,
        default: &XmlDslProperties,
    ) -> XmlDslProperties {
        match self.imports.namespace_of(ty) {
            Some(origin) => {
                trace!(
                    "namespace override for '{}': {} -> {}",
                    ty.type_key(),
                    default.prefix,
                    origin.prefix
                );
                origin.clone()
            },
            None => default.clone(),
        }
    }

    /// Memoized object-type resolution. The `bool` is false while the
    /// returned slot is still being built higher up the stack, in which
    /// case its children must not be copied yet.
    fn resolve_object_type(
        &mut self,
        ty: &MetadataType,
        obj: &ObjectType,
        default_ns: &XmlDslProperties,
    ) -> crate::Result<Option<(NodeId, bool)>> {
        let ns = self.resolve_namespace(ty, default_ns);
        let key: MemoKey = (obj.key(), ns.prefix.clone(), ns.namespace.clone());

        if let Some(id) = self.memo.get(&key) {
            trace!("syntax memo hit for '{}'", key.0);
            return Ok(Some((*id, !self.building.contains(&key))));
        }

        let wrapped = classify::requires_wrapper_element(ty, &self.sub_types, &self.lookup())?;
        let inline = obj.dsl.allows_inline_definition && classify::is_valid_bean(obj);
        let top_level = obj.dsl.allows_references
            && obj.dsl.allows_top_level_definition
            && classify::is_valid_bean(obj);

        if !(wrapped || inline || top_level) {
            return Ok(None);
        }

        let name = obj
            .name()
            .ok_or_else(|| {
                crate::Error::UnnamedType { ty: ty.to_string() }
            })?
            .to_string();

        // memoize before walking fields: a re-entrant visit of this type
        // lands on the reserved slot instead of recursing
        let id = self.arena.reserve();
        self.memo.insert(key.clone(), id);
        self.building.insert(key.clone());

        let mut children = BTreeMap::new();
        self.declare_fields_as_children(&mut children, obj, &ns)?;

        self.building.remove(&key);

        let node = self.arena.node_mut(id);
        node.element_name = naming::hyphenize(&name);
        node.prefix = ns.prefix;
        node.namespace = ns.namespace;
        node.is_wrapped = wrapped;
        node.supports_child_declaration = inline || wrapped;
        node.supports_top_level_declaration = top_level;
        node.children = children;

        Ok(Some((id, true)))
    }

    /// Shared per-kind dispatch for parameters and object fields. Flags are
    /// only ever raised, never reset, so union members folding into the
    /// same node accumulate.
    #[allow(clippy::too_many_arguments)]
    fn resolve_value_into(
        &mut self,
        id: NodeId,
        name: &str,
        ty: &MetadataType,
        expression_support: ExpressionSupport,
        dsl: &ParameterDsl,
        is_content: bool,
        owner: &XmlDslProperties,
    ) -> crate::Result<()> {
        match ty {
            MetadataType::Union { members } => {
                for member in members.clone() {
                    if !self.arena.node(id).element_name().is_empty() {
                        // last-write-wins in declaration order; see DESIGN.md
                        trace!(
                            "union member '{}' overwrites resolved syntax for '{name}'",
                            member.type_key()
                        );
                    }
                    self.resolve_value_into(
                        id,
                        name,
                        &member,
                        expression_support,
                        dsl,
                        is_content,
                        owner,
                    )?;
                }
                Ok(())
            },

            MetadataType::Array { item } => {
                let item = item.as_ref().clone();
                let inline = classify::supports_inline_declaration(
                    &item,
                    expression_support,
                    dsl.allows_inline_definition,
                    is_content,
                    &self.lookup(),
                )?;
                let wrapped =
                    classify::requires_wrapper_element(&item, &self.sub_types, &self.lookup())?;

                {
                    let element_name = naming::hyphenize(name);
                    let ns = owner.clone();
                    let node = self.arena.node_mut(id);
                    node.attribute_name = name.to_string();
                    node.element_name = element_name;
                    node.prefix = ns.prefix;
                    node.namespace = ns.namespace;
                }

                if inline || wrapped {
                    self.arena.node_mut(id).supports_child_declaration = true;
                    let gid = self.resolve_array_item(
                        &item,
                        &naming::item_name(name),
                        expression_support,
                        dsl,
                        owner,
                    )?;
                    self.arena
                        .node_mut(id)
                        .generics
                        .insert(item.type_key(), gid);
                }
                Ok(())
            },

            MetadataType::Object(..) | MetadataType::Reference { .. } => {
                self.resolve_object_value_into(
                    id,
                    ty,
                    &naming::hyphenize(name),
                    Some(name),
                    expression_support,
                    dsl,
                    is_content,
                    owner,
                )
            },

            MetadataType::Dictionary { value, .. } => {
                let value_ty = value.as_ref().clone();
                let inline = classify::supports_inline_declaration(
                    ty,
                    expression_support,
                    dsl.allows_inline_definition,
                    is_content,
                    &self.lookup(),
                )?;

                {
                    let element_name = naming::hyphenize(&naming::pluralize(name));
                    let ns = owner.clone();
                    let node = self.arena.node_mut(id);
                    node.attribute_name = name.to_string();
                    node.element_name = element_name;
                    node.prefix = ns.prefix;
                    node.namespace = ns.namespace;
                }

                if inline {
                    self.arena.node_mut(id).supports_child_declaration = true;

                    // the entry key is always a plain attribute slot
                    let key_id = self.arena.reserve();
                    {
                        let ns = owner.clone();
                        let node = self.arena.node_mut(key_id);
                        node.attribute_name = KEY_SLOT.to_string();
                        node.prefix = ns.prefix;
                        node.namespace = ns.namespace;
                    }
                    self.arena
                        .node_mut(id)
                        .generics
                        .insert(KEY_SLOT.to_string(), key_id);

                    let value_element = naming::hyphenize(&naming::singularize(name));
                    let value_id = self.resolve_dictionary_value(
                        &value_ty,
                        &value_element,
                        expression_support,
                        dsl,
                        owner,
                    )?;
                    self.arena
                        .node_mut(id)
                        .generics
                        .insert(value_ty.type_key(), value_id);
                }
                Ok(())
            },

            // scalars and Any: attribute first, element text only for
            // content or explicitly text-hinted parameters
            _scalar_or_any => {
                let supports_child = is_content
                    || (dsl.is_text && expression_support != ExpressionSupport::Required);

                let element_name = naming::hyphenize(name);
                let ns = owner.clone();
                let node = self.arena.node_mut(id);
                node.attribute_name = name.to_string();
                node.element_name = element_name;
                node.prefix = ns.prefix;
                node.namespace = ns.namespace;
                if supports_child {
                    node.supports_child_declaration = true;
                }
                Ok(())
            },
        }
    }

    /// Object-valued slot: parameter, field, array item, or dictionary
    /// value. Wrapped types keep their own namespace; inline types switch
    /// to the owning extension's.
    #[allow(clippy::too_many_arguments)]
    fn resolve_object_value_into(
        &mut self,
        id: NodeId,
        ty: &MetadataType,
        element_name: &str,
        attribute: Option<&str>,
        expression_support: ExpressionSupport,
        dsl: &ParameterDsl,
        is_content: bool,
        owner: &XmlDslProperties,
    ) -> crate::Result<()> {
        let Some(obj) = self.lookup().object_of(ty)?.cloned() else {
            return Ok(());
        };

        let wrapped = classify::requires_wrapper_element(ty, &self.sub_types, &self.lookup())?;
        let inline = classify::supports_inline_declaration(
            ty,
            expression_support,
            dsl.allows_inline_definition,
            is_content,
            &self.lookup(),
        )?;
        let top_level =
            classify::supports_top_level_declaration(ty, dsl.allows_references, &self.lookup())?;

        let ns = if wrapped {
            // the wrapper keeps the type's own namespace so concrete
            // sub-types from the declaring extension can substitute
            self.resolve_namespace(ty, owner)
        } else {
            owner.clone()
        };

        {
            let node = self.arena.node_mut(id);
            if let Some(attr) = attribute {
                node.attribute_name = attr.to_string();
            }
            node.element_name = element_name.to_string();
            node.prefix = ns.prefix.clone();
            node.namespace = ns.namespace.clone();
            if wrapped {
                node.is_wrapped = true;
                node.supports_child_declaration = true;
            }
            if inline {
                node.supports_child_declaration = true;
            }
            if top_level {
                node.supports_top_level_declaration = true;
            }
        }

        if inline && !wrapped {
            if obj.name().is_some() {
                // named types resolve once through the memo table; the
                // canonical syntax is linked as a generic slot and its
                // children are shared when already complete
                if let Some((tid, ready)) = self.resolve_object_type(ty, &obj, owner)? {
                    self.arena
                        .node_mut(id)
                        .generics
                        .insert(ty.type_key(), tid);
                    if ready {
                        let type_children = self.arena.node(tid).children.clone();
                        self.arena
                            .node_mut(id)
                            .children
                            .extend(type_children);
                    }
                } else {
                    let mut children = BTreeMap::new();
                    self.declare_fields_as_children(&mut children, &obj, &ns)?;
                    self.arena.node_mut(id).children.extend(children);
                }
            } else {
                // anonymous objects cannot be referenced, so no cycle can
                // pass through them; their fields inline directly
                let mut children = BTreeMap::new();
                self.declare_fields_as_children(&mut children, &obj, &ns)?;
                self.arena.node_mut(id).children.extend(children);
            }
        }

        Ok(())
    }

    fn resolve_array_item(
        &mut self,
        item: &MetadataType,
        item_element_name: &str,
        expression_support: ExpressionSupport,
        dsl: &ParameterDsl,
        owner: &XmlDslProperties,
    ) -> crate::Result<NodeId> {
        let id = self.arena.reserve();
        self.resolve_item_into(id, item, item_element_name, expression_support, dsl, owner)?;
        Ok(id)
    }

    fn resolve_item_into(
        &mut self,
        id: NodeId,
        item: &MetadataType,
        item_element_name: &str,
        expression_support: ExpressionSupport,
        dsl: &ParameterDsl,
        owner: &XmlDslProperties,
    ) -> crate::Result<()> {
        match item {
            MetadataType::Union { members } => {
                for member in members.clone() {
                    self.resolve_item_into(
                        id,
                        &member,
                        item_element_name,
                        expression_support,
                        dsl,
                        owner,
                    )?;
                }
                Ok(())
            },

            MetadataType::Array { item: inner } => {
                // list of lists: itemize one level further
                let inner = inner.as_ref().clone();
                {
                    let ns = owner.clone();
                    let node = self.arena.node_mut(id);
                    node.element_name = item_element_name.to_string();
                    node.prefix = ns.prefix;
                    node.namespace = ns.namespace;
                    node.supports_child_declaration = true;
                }
                let gid = self.resolve_array_item(
                    &inner,
                    &naming::item_name(item_element_name),
                    expression_support,
                    dsl,
                    owner,
                )?;
                self.arena
                    .node_mut(id)
                    .generics
                    .insert(inner.type_key(), gid);
                Ok(())
            },

            MetadataType::Object(..) | MetadataType::Reference { .. } => {
                self.resolve_object_value_into(
                    id,
                    item,
                    item_element_name,
                    None,
                    expression_support,
                    dsl,
                    false,
                    owner,
                )
            },

            // a map nested in a list is not representable; the slot stays
            // inert
            MetadataType::Dictionary { .. } => {
                let ns = owner.clone();
                let node = self.arena.node_mut(id);
                node.element_name = item_element_name.to_string();
                node.prefix = ns.prefix;
                node.namespace = ns.namespace;
                Ok(())
            },

            _scalar_or_any => {
                let ns = owner.clone();
                let node = self.arena.node_mut(id);
                node.element_name = item_element_name.to_string();
                node.prefix = ns.prefix;
                node.namespace = ns.namespace;
                node.supports_child_declaration = true;
                Ok(())
            },
        }
    }

    fn resolve_dictionary_value(
        &mut self,
        value: &MetadataType,
        value_element_name: &str,
        expression_support: ExpressionSupport,
        dsl: &ParameterDsl,
        owner: &XmlDslProperties,
    ) -> crate::Result<NodeId> {
        let id = self.arena.reserve();
        self.resolve_dictionary_value_into(
            id,
            value,
            value_element_name,
            expression_support,
            dsl,
            owner,
        )?;
        Ok(id)
    }

    fn resolve_dictionary_value_into(
        &mut self,
        id: NodeId,
        value: &MetadataType,
        value_element_name: &str,
        expression_support: ExpressionSupport,
        dsl: &ParameterDsl,
        owner: &XmlDslProperties,
    ) -> crate::Result<()> {
        match value {
            MetadataType::Union { members } => {
                for member in members.clone() {
                    self.resolve_dictionary_value_into(
                        id,
                        &member,
                        value_element_name,
                        expression_support,
                        dsl,
                        owner,
                    )?;
                }
                Ok(())
            },

            MetadataType::Object(..) | MetadataType::Reference { .. } => {
                self.resolve_object_value_into(
                    id,
                    value,
                    value_element_name,
                    Some("value"),
                    expression_support,
                    dsl,
                    false,
                    owner,
                )
            },

            MetadataType::Array { item } => {
                let item = item.as_ref().clone();
                {
                    let ns = owner.clone();
                    let node = self.arena.node_mut(id);
                    node.attribute_name = "value".to_string();
                    node.element_name = value_element_name.to_string();
                    node.prefix = ns.prefix;
                    node.namespace = ns.namespace;
                    node.supports_child_declaration = true;
                }
                let gid = self.resolve_array_item(
                    &item,
                    &naming::item_name(value_element_name),
                    expression_support,
                    dsl,
                    owner,
                )?;
                self.arena
                    .node_mut(id)
                    .generics
                    .insert(item.type_key(), gid);
                Ok(())
            },

            // nested maps are not representable as DSL children
            MetadataType::Dictionary { .. } => {
                let ns = owner.clone();
                let node = self.arena.node_mut(id);
                node.element_name = value_element_name.to_string();
                node.prefix = ns.prefix;
                node.namespace = ns.namespace;
                Ok(())
            },

            _scalar_or_any => {
                let ns = owner.clone();
                let node = self.arena.node_mut(id);
                node.attribute_name = "value".to_string();
                node.element_name = value_element_name.to_string();
                node.prefix = ns.prefix;
                node.namespace = ns.namespace;
                Ok(())
            },
        }
    }

    /// Declares one named child per field. Flattened object fields expand
    /// their sub-fields into the parent's children instead; a flattened
    /// type already on the expansion stack is skipped, so self-referencing
    /// and mutually flattened types terminate at the flattening step
    /// (deeper, non-flattened cycles are broken by the type memo).
    fn declare_fields_as_children(
        &mut self,
        children: &mut BTreeMap<Name, NodeId>,
        obj: &ObjectType,
        owner: &XmlDslProperties,
    ) -> crate::Result<()> {
        self.expand_fields(children, obj, owner, &mut BTreeSet::new())
    }

    fn expand_fields(
        &mut self,
        children: &mut BTreeMap<Name, NodeId>,
        obj: &ObjectType,
        owner: &XmlDslProperties,
        expanding: &mut BTreeSet<String>,
    ) -> crate::Result<()> {
        expanding.insert(obj.key());
        for field in obj.fields.clone() {
            if field.flattened && field.ty.is_object_like() {
                if expanding.contains(&field.ty.type_key()) {
                    continue;
                }
                if let Some(nested) = self.lookup().object_of(&field.ty)?.cloned() {
                    self.expand_fields(children, &nested, owner, expanding)?;
                }
                continue;
            }

            let cid = self.arena.reserve();
            self.resolve_value_into(
                cid,
                field.name.as_str(),
                &field.ty,
                ExpressionSupport::default(),
                &ParameterDsl::default(),
                false,
                owner,
            )?;
            children.insert(field.name.clone(), cid);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::DslSyntaxResolver;
    use xylem_model::{
        ComponentModel, ExtensionCatalog, ImportedTypeDeclaration, MetadataType, ObjectField,
        ParameterModel, ParameterRole,
    };
    use xylem_testing::{bean, extension, logging};

    fn resolver(ext: &xylem_model::ExtensionModel) -> DslSyntaxResolver<'_> {
        logging();
        DslSyntaxResolver::new(ext, &ExtensionCatalog::new()).unwrap()
    }

    fn param(
        name: &str,
        ty: MetadataType,
    ) -> ParameterModel {
        ParameterModel::builder()
            .name(name.into())
            .ty(ty)
            .build()
    }

    #[test]
    fn missing_xml_properties_fails_construction() {
        let ext = xylem_model::ExtensionModel::new("http");
        let err = DslSyntaxResolver::new(&ext, &ExtensionCatalog::new()).unwrap_err();
        assert!(matches!(err, crate::Error::MissingXmlProperties { .. }));
    }

    #[test]
    fn component_syntax_uses_own_namespace() {
        let ext = extension("http");
        let mut resolver = resolver(&ext);

        let id = resolver.resolve_component(
            &ComponentModel::builder()
                .name("listenerConfig".into())
                .requires_config(true)
                .build(),
        );

        let view = resolver.syntax(id);
        assert_eq!(view.element_name(), "listener-config");
        assert_eq!(view.prefix(), &"http".into());
        assert_eq!(view.namespace(), "http://www.example.org/schema/http");
        assert!(view.requires_config());
    }

    #[test]
    fn scalar_parameter_is_attribute_only() {
        let ext = extension("http");
        let mut resolver = resolver(&ext);

        let id = resolver
            .resolve_parameter(&param("followRedirects", MetadataType::Boolean))
            .unwrap();

        let view = resolver.syntax(id);
        assert_eq!(view.attribute_name(), "followRedirects");
        assert_eq!(view.element_name(), "follow-redirects");
        assert!(!view.supports_child_declaration());
        assert!(!view.is_wrapped());
    }

    #[test]
    fn content_parameter_supports_child_declaration() {
        let ext = extension("http");
        let mut resolver = resolver(&ext);

        let mut body = param("body", MetadataType::Any);
        body.role = ParameterRole::Content;
        let id = resolver.resolve_parameter(&body).unwrap();

        assert!(resolver.syntax(id).supports_child_declaration());
    }

    #[test]
    fn object_parameter_resolves_fields_as_children() {
        let mut ext = extension("db");
        ext.with_type("pool", bean("org.db.Pool", &["maxActive", "maxWait"]))
            .unwrap();
        let mut resolver = resolver(&ext);

        let id = resolver
            .resolve_parameter(&param("poolingProfile", MetadataType::reference("pool")))
            .unwrap();

        let view = resolver.syntax(id);
        assert_eq!(view.attribute_name(), "poolingProfile");
        assert_eq!(view.element_name(), "pooling-profile");
        assert!(view.supports_child_declaration());
        assert!(view.supports_top_level_declaration());

        let max_active = view.child("maxActive").unwrap();
        assert_eq!(max_active.attribute_name(), "maxActive");

        // the canonical type syntax hangs off the generic slot
        let canonical = view
            .generic(&MetadataType::reference("pool"))
            .unwrap();
        assert_eq!(canonical.element_name(), "pool");
        assert!(canonical.child("maxWait").is_some());
    }

    #[test]
    fn type_resolution_is_idempotent() {
        let mut ext = extension("db");
        ext.with_type("pool", bean("org.db.Pool", &["maxActive"]))
            .unwrap();
        let mut resolver = resolver(&ext);

        let ty = MetadataType::reference("pool");
        let first = resolver.resolve_type(&ty).unwrap().unwrap();
        let second = resolver.resolve_type(&ty).unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn cyclic_type_back_edge_lands_on_memoized_node() {
        let mut node_ty = bean("org.tree.Node", &["value"]);
        node_ty.fields.push(
            ObjectField::builder()
                .name("next".into())
                .ty(MetadataType::reference("node"))
                .build(),
        );

        let mut ext = extension("tree");
        ext.with_type("node", node_ty).unwrap();
        let mut resolver = resolver(&ext);

        let ty = MetadataType::reference("node");
        let root = resolver.resolve_type(&ty).unwrap().unwrap();

        let view = resolver.syntax(root);
        let next = view.child("next").unwrap();
        // the recursive field resolves to the very node being built
        assert_eq!(next.generic(&ty).unwrap().id(), root);
    }

    #[test]
    fn wrapped_imported_type_keeps_origin_namespace() {
        let mut sockets = extension("sockets");
        sockets
            .with_type("tcp-settings", {
                let mut obj = bean("org.sockets.TcpSettings", &["host", "port"]);
                obj.extensible = true;
                obj
            })
            .unwrap();

        let mut context = ExtensionCatalog::new();
        context.register(sockets);

        let mut ext = extension("http");
        ext.with_type("tcp-settings", {
            let mut obj = bean("org.sockets.TcpSettings", &["host", "port"]);
            obj.extensible = true;
            obj
        })
        .unwrap();
        ext.imported_types.push(ImportedTypeDeclaration {
            ty: MetadataType::reference("tcp-settings"),
            origin: "sockets".into(),
        });

        logging();
        let mut resolver = DslSyntaxResolver::new(&ext, &context).unwrap();
        let id = resolver
            .resolve_parameter(&param("connection", MetadataType::reference("tcp-settings")))
            .unwrap();

        let view = resolver.syntax(id);
        assert!(view.is_wrapped());
        assert!(view.supports_child_declaration());
        assert_eq!(view.prefix(), &"sockets".into());
        assert_eq!(
            view.namespace(),
            "http://www.example.org/schema/sockets"
        );
    }

    #[test]
    fn dictionary_parameter_declares_key_and_value_slots() {
        let ext = extension("http");
        let mut resolver = resolver(&ext);

        let id = resolver
            .resolve_parameter(&param(
                "headers",
                MetadataType::dictionary_of(MetadataType::String, MetadataType::String),
            ))
            .unwrap();

        let view = resolver.syntax(id);
        assert_eq!(view.attribute_name(), "headers");
        assert_eq!(view.element_name(), "headers");
        assert!(view.supports_child_declaration());

        let key = view.generic_slot(super::KEY_SLOT).unwrap();
        assert_eq!(key.attribute_name(), "key");

        let value = view.generic(&MetadataType::String).unwrap();
        assert_eq!(value.attribute_name(), "value");
        assert_eq!(value.element_name(), "header");
    }

    #[test]
    fn exotic_keyed_dictionary_stays_attribute_only() {
        let ext = extension("http");
        let mut resolver = resolver(&ext);

        let id = resolver
            .resolve_parameter(&param(
                "weights",
                MetadataType::dictionary_of(MetadataType::Binary, MetadataType::Number),
            ))
            .unwrap();

        let view = resolver.syntax(id);
        assert!(!view.supports_child_declaration());
        assert!(view.generic_slot(super::KEY_SLOT).is_none());
    }

    #[test]
    fn array_parameter_itemizes_the_element_name() {
        let ext = extension("http");
        let mut resolver = resolver(&ext);

        let id = resolver
            .resolve_parameter(&param(
                "values",
                MetadataType::array_of(MetadataType::String),
            ))
            .unwrap();

        let view = resolver.syntax(id);
        assert_eq!(view.attribute_name(), "values");
        assert_eq!(view.element_name(), "values");
        assert!(view.supports_child_declaration());

        let item = view.generic(&MetadataType::String).unwrap();
        assert_eq!(item.element_name(), "value");
        assert!(item.supports_child_declaration());
    }

    #[test]
    fn array_of_beans_gets_singularized_item_element() {
        let mut ext = extension("db");
        ext.with_type("column", bean("org.db.Column", &["name"]))
            .unwrap();
        let mut resolver = resolver(&ext);

        let id = resolver
            .resolve_parameter(&param(
                "columns",
                MetadataType::array_of(MetadataType::reference("column")),
            ))
            .unwrap();

        let view = resolver.syntax(id);
        assert!(view.supports_child_declaration());

        let item = view.generic(&MetadataType::reference("column")).unwrap();
        assert_eq!(item.element_name(), "column");
        assert!(item.supports_child_declaration());
        assert!(item.child("name").is_some());
    }

    #[test]
    fn nested_array_items_fall_back_to_item_suffix() {
        let ext = extension("http");
        let mut resolver = resolver(&ext);

        let inner = MetadataType::array_of(MetadataType::String);
        let id = resolver
            .resolve_parameter(&param("batch", MetadataType::array_of(inner.clone())))
            .unwrap();

        let view = resolver.syntax(id);
        let outer_item = view.generic(&inner).unwrap();
        // "batch" singularizes to itself, so items take the -item suffix
        assert_eq!(outer_item.element_name(), "batch-item");
        assert_eq!(
            outer_item
                .generic(&MetadataType::String)
                .unwrap()
                .element_name(),
            "batch-item-item"
        );
    }

    #[test]
    fn union_members_fold_into_one_descriptor() {
        let mut ext = extension("db");
        ext.with_type("pool", bean("org.db.Pool", &["maxActive"]))
            .unwrap();
        let mut resolver = resolver(&ext);

        let id = resolver
            .resolve_parameter(&param(
                "poolOrSize",
                MetadataType::Union {
                    members: vec![MetadataType::Number, MetadataType::reference("pool")],
                },
            ))
            .unwrap();

        // scalar member sets the attribute, the object member raises the
        // declaration flags on the same node
        let view = resolver.syntax(id);
        assert_eq!(view.attribute_name(), "poolOrSize");
        assert!(view.supports_child_declaration());
        assert!(view.supports_top_level_declaration());
    }

    #[test]
    fn expression_required_object_stays_attribute_only() {
        let mut ext = extension("db");
        ext.with_type("pool", bean("org.db.Pool", &["maxActive"]))
            .unwrap();
        let mut resolver = resolver(&ext);

        let mut p = param("poolingProfile", MetadataType::reference("pool"));
        p.expression_support = xylem_model::ExpressionSupport::Required;
        let id = resolver.resolve_parameter(&p).unwrap();

        let view = resolver.syntax(id);
        assert_eq!(view.attribute_name(), "poolingProfile");
        assert!(!view.supports_child_declaration());
    }

    #[test]
    fn flattened_fields_merge_into_parent_children() {
        let mut outer = bean("org.http.RequestSettings", &["path"]);
        outer.fields.push(
            ObjectField::builder()
                .name("tls".into())
                .ty(MetadataType::reference("tls-context"))
                .flattened(true)
                .build(),
        );

        let mut ext = extension("http");
        ext.with_type("tls-context", bean("org.http.TlsContext", &["keystore"]))
            .unwrap();
        ext.with_type("request-settings", outer).unwrap();
        let mut resolver = resolver(&ext);

        let root = resolver
            .resolve_type(&MetadataType::reference("request-settings"))
            .unwrap()
            .unwrap();

        let view = resolver.syntax(root);
        assert!(view.child("path").is_some());
        // the flattened field's own sub-fields surface directly
        assert!(view.child("keystore").is_some());
        assert!(view.child("tls").is_none());
    }

    #[test]
    fn self_referential_flattened_field_is_skipped() {
        let mut node = bean("org.rec.Node", &["value"]);
        node.fields.push(
            ObjectField::builder()
                .name("parent".into())
                .ty(MetadataType::reference("node"))
                .flattened(true)
                .build(),
        );

        let mut ext = extension("rec");
        ext.with_type("node", node).unwrap();
        let mut resolver = resolver(&ext);

        let root = resolver
            .resolve_type(&MetadataType::reference("node"))
            .unwrap()
            .unwrap();

        let view = resolver.syntax(root);
        assert!(view.child("value").is_some());
        assert!(view.child("parent").is_none());
        assert_eq!(view.children().count(), 1);
    }

    #[test]
    fn mutually_flattened_types_terminate() {
        let mut a = bean("org.rec.A", &["alpha"]);
        a.fields.push(
            ObjectField::builder()
                .name("nested".into())
                .ty(MetadataType::reference("b"))
                .flattened(true)
                .build(),
        );
        let mut b = bean("org.rec.B", &["beta"]);
        b.fields.push(
            ObjectField::builder()
                .name("back".into())
                .ty(MetadataType::reference("a"))
                .flattened(true)
                .build(),
        );

        let mut ext = extension("rec");
        ext.with_type("a", a).unwrap();
        ext.with_type("b", b).unwrap();
        let mut resolver = resolver(&ext);

        let root = resolver
            .resolve_type(&MetadataType::reference("a"))
            .unwrap()
            .unwrap();

        // both types' declared fields surface once; the flattened back
        // edge does not recurse
        let view = resolver.syntax(root);
        assert!(view.child("alpha").is_some());
        assert!(view.child("beta").is_some());
        assert!(view.child("nested").is_none());
        assert!(view.child("back").is_none());
        assert_eq!(view.children().count(), 2);
    }

    #[test]
    fn anonymous_object_inlines_without_a_type_node() {
        let anon = xylem_model::ObjectType::builder()
            .fields(vec![
                ObjectField::builder()
                    .name("size".into())
                    .ty(MetadataType::Number)
                    .build(),
            ])
            .build();

        let ext = extension("http");
        let mut resolver = resolver(&ext);

        let id = resolver
            .resolve_parameter(&param("buffer", MetadataType::Object(anon)))
            .unwrap();

        let view = resolver.syntax(id);
        assert!(view.supports_child_declaration());
        assert!(view.child("size").is_some());
        assert!(view.generics().next().is_none());
    }
}
