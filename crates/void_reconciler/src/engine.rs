//! Reconciliation engine
//!
//! Drives a [`HostConfig`] from successive element trees. The engine keeps
//! one fiber per mounted node, matches new children against old ones by
//! key (or position when unkeyed) and emits host callbacks in this order
//! for every parent:
//!
//! 1. new subtrees are created bottom-up while still detached
//! 2. removed children are detached and released
//! 3. kept children are updated recursively
//! 4. new and moved children are placed
//! 5. the parent's own update is committed

use crate::element::{Element, Node};
use crate::error::Result;
use crate::host::{HostConfig, SceneHost};
use crate::value::Props;
use std::collections::HashMap;
use void_scene::Container;

/// What a fiber was built from
#[derive(Debug)]
enum FiberKind {
    Element { type_name: String, props: Props },
    Text(String),
}

/// A mounted node and its retained instance
#[derive(Debug)]
struct Fiber<I> {
    key: Option<String>,
    kind: FiberKind,
    instance: I,
    children: Vec<Fiber<I>>,
}

impl<I> Fiber<I> {
    /// Whether `node` can reuse this fiber's instance
    fn same_type(&self, node: &Node) -> bool {
        match (&self.kind, node) {
            (FiberKind::Element { type_name, .. }, Node::Element(element)) => {
                *type_name == element.type_name
            }
            (FiberKind::Text(_), Node::Text(_)) => true,
            _ => false,
        }
    }
}

/// Sibling identity used to match old and new children
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Identity {
    Key(String),
    Index(usize),
}

impl Identity {
    fn of(key: Option<&str>, index: usize) -> Self {
        match key {
            Some(key) => Self::Key(key.to_string()),
            None => Self::Index(index),
        }
    }
}

/// Where a list of children lives
enum Parent<'a, H: HostConfig> {
    Container(&'a mut H::Container),
    Instance(&'a mut H::Instance),
}

impl<H: HostConfig> Parent<'_, H> {
    fn append(&mut self, host: &mut H, child: &H::Instance) -> Result<()> {
        match self {
            Self::Container(container) => host.append_child_to_container(container, child),
            Self::Instance(parent) => host.append_child(parent, child),
        }
    }

    fn insert_before(
        &mut self,
        host: &mut H,
        child: &H::Instance,
        before: &H::Instance,
    ) -> Result<()> {
        match self {
            Self::Container(container) => {
                host.insert_in_container_before(container, child, before)
            }
            Self::Instance(parent) => host.insert_before(parent, child, before),
        }
    }

    fn remove(&mut self, host: &mut H, child: &H::Instance) -> Result<()> {
        match self {
            Self::Container(container) => host.remove_child_from_container(container, child),
            Self::Instance(parent) => host.remove_child(parent, child),
        }
    }
}

/// A child slot after matching
struct Entry<I> {
    fiber: Fiber<I>,
    /// Position among the old children when the fiber was kept
    old_index: Option<usize>,
    /// Whether the instance is currently related to the parent
    attached: bool,
}

/// Keeps a host in sync with successive element trees
pub struct Reconciler<H: HostConfig> {
    host: H,
    roots: Vec<Fiber<H::Instance>>,
}

impl<H: HostConfig> Reconciler<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            roots: Vec::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn is_mounted(&self) -> bool {
        !self.roots.is_empty()
    }

    /// Instance of the first top-level node
    pub fn root_instance(&self) -> Option<&H::Instance> {
        self.roots.first().map(|root| &root.instance)
    }

    /// Instances of every top-level node, in container order
    pub fn root_instances(&self) -> impl Iterator<Item = &H::Instance> {
        self.roots.iter().map(|root| &root.instance)
    }

    /// Initial render of `tree` into `container`.
    ///
    /// Mounting over an existing tree reconciles against it.
    pub fn mount(&mut self, tree: &Node, container: &mut H::Container) -> Result<()> {
        self.render(std::slice::from_ref(tree), container)
    }

    /// Bring the mounted tree in line with `tree`
    pub fn update(&mut self, tree: &Node, container: &mut H::Container) -> Result<()> {
        self.render(std::slice::from_ref(tree), container)
    }

    /// Remove and release everything mounted
    pub fn unmount(&mut self, container: &mut H::Container) -> Result<()> {
        self.render(&[], container)
    }

    /// Reconcile the container's top-level nodes against `roots`
    pub fn render(&mut self, roots: &[Node], container: &mut H::Container) -> Result<()> {
        let context = self.host.root_host_context(container);
        self.host.prepare_for_commit(container);
        let result = reconcile_children(
            &mut self.host,
            &mut Parent::Container(&mut *container),
            &mut self.roots,
            roots,
            &context,
        );
        self.host.reset_after_commit(container);
        result
    }
}

/// Mount `tree` with a default [`SceneHost`]
pub fn mount(tree: &Node, container: &mut Container) -> Result<Reconciler<SceneHost>> {
    let mut reconciler = Reconciler::new(SceneHost::default());
    reconciler.mount(tree, container)?;
    Ok(reconciler)
}

/// Create a detached subtree, children before parents
fn build<H: HostConfig>(
    host: &mut H,
    node: &Node,
    context: &H::HostContext,
) -> Result<Fiber<H::Instance>> {
    match node {
        Node::Text(text) => Ok(Fiber {
            key: None,
            kind: FiberKind::Text(text.clone()),
            instance: host.create_text_instance(text, context)?,
            children: Vec::new(),
        }),
        Node::Element(element) => {
            let mut fiber = Fiber {
                key: element.key.clone(),
                kind: FiberKind::Element {
                    type_name: element.type_name.clone(),
                    props: element.props.clone(),
                },
                instance: host.create_instance(&element.type_name, &element.props, context)?,
                children: Vec::new(),
            };
            if let Err(err) = build_children(host, &mut fiber, element, context) {
                dispose(host, &fiber);
                return Err(err);
            }
            Ok(fiber)
        }
    }
}

fn build_children<H: HostConfig>(
    host: &mut H,
    fiber: &mut Fiber<H::Instance>,
    element: &Element,
    context: &H::HostContext,
) -> Result<()> {
    if !host.should_set_text_content(&element.type_name, &element.props) {
        let child_context = host.child_host_context(context, &element.type_name);
        for node in &element.children {
            let child = build(host, node, &child_context)?;
            let attached = host.append_initial_child(&mut fiber.instance, &child.instance);
            fiber.children.push(child);
            attached?;
        }
    }
    host.finalize_initial_children(&mut fiber.instance, &element.type_name, &element.props)?;
    Ok(())
}

/// Release a subtree, children before parents
fn dispose<H: HostConfig>(host: &mut H, fiber: &Fiber<H::Instance>) {
    for child in &fiber.children {
        dispose(host, child);
    }
    if let Err(err) = host.detach_deleted_instance(&fiber.instance) {
        log::warn!("Failed to release {:?}: {}", fiber.instance, err);
    }
}

/// Bring a kept fiber in line with `node`
fn update_fiber<H: HostConfig>(
    host: &mut H,
    fiber: &mut Fiber<H::Instance>,
    node: &Node,
    context: &H::HostContext,
) -> Result<()> {
    match (&mut fiber.kind, node) {
        (FiberKind::Text(old), Node::Text(new)) => {
            if old != new {
                host.commit_text_update(&mut fiber.instance, old.as_str(), new)?;
                *old = new.clone();
            }
        }
        (FiberKind::Element { type_name, props }, Node::Element(element)) => {
            let payload = if *props != element.props {
                host.prepare_update(&fiber.instance, type_name, props, &element.props)?
            } else {
                None
            };

            let child_context = host.child_host_context(context, type_name);
            reconcile_children(
                host,
                &mut Parent::Instance(&mut fiber.instance),
                &mut fiber.children,
                &element.children,
                &child_context,
            )?;

            if let Some(payload) = payload {
                host.commit_update(&mut fiber.instance, payload, type_name, props, &element.props)?;
            }
            *props = element.props.clone();
        }
        (kind, node) => log::warn!("Fiber {:?} cannot take node {:?}", kind, node),
    }
    Ok(())
}

/// Match `nodes` against the existing `children` of `parent` and apply the difference
fn reconcile_children<H: HostConfig>(
    host: &mut H,
    parent: &mut Parent<'_, H>,
    children: &mut Vec<Fiber<H::Instance>>,
    nodes: &[Node],
    context: &H::HostContext,
) -> Result<()> {
    let mut old: Vec<Option<Fiber<H::Instance>>> =
        std::mem::take(children).into_iter().map(Some).collect();
    let mut by_identity: HashMap<Identity, usize> = old
        .iter()
        .enumerate()
        .filter_map(|(i, fiber)| fiber.as_ref().map(|f| (Identity::of(f.key.as_deref(), i), i)))
        .collect();

    let matches: Vec<Option<usize>> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            by_identity
                .remove(&Identity::of(node.key(), i))
                .filter(|&j| old[j].as_ref().is_some_and(|fiber| fiber.same_type(node)))
        })
        .collect();

    // Create new subtrees before touching the live tree
    let mut created: Vec<Option<Fiber<H::Instance>>> = Vec::with_capacity(nodes.len());
    for (node, matched) in nodes.iter().zip(&matches) {
        if matched.is_some() {
            created.push(None);
            continue;
        }
        match build(host, node, context) {
            Ok(fiber) => created.push(Some(fiber)),
            Err(err) => {
                for fiber in created.iter().flatten() {
                    dispose(host, fiber);
                }
                *children = old.into_iter().flatten().collect();
                return Err(err);
            }
        }
    }

    let mut entries: Vec<Entry<H::Instance>> = Vec::with_capacity(nodes.len());
    for (matched, fresh) in matches.iter().zip(created) {
        let fiber = match matched {
            Some(j) => old[*j].take(),
            None => fresh,
        };
        if let Some(fiber) = fiber {
            entries.push(Entry {
                fiber,
                old_index: *matched,
                attached: matched.is_some(),
            });
        }
    }
    let stale: Vec<Fiber<H::Instance>> = old.into_iter().flatten().collect();

    let result = commit_children(host, parent, &mut entries, stale, nodes, context);
    if result.is_err() {
        // Unplaced new subtrees are released so the next render builds them again
        for entry in entries.iter().filter(|entry| !entry.attached) {
            dispose(host, &entry.fiber);
        }
        entries.retain(|entry| entry.attached);
    }
    *children = entries.into_iter().map(|entry| entry.fiber).collect();
    result
}

fn commit_children<H: HostConfig>(
    host: &mut H,
    parent: &mut Parent<'_, H>,
    entries: &mut [Entry<H::Instance>],
    stale: Vec<Fiber<H::Instance>>,
    nodes: &[Node],
    context: &H::HostContext,
) -> Result<()> {
    for fiber in stale {
        let removed = parent.remove(host, &fiber.instance);
        dispose(host, &fiber);
        removed?;
    }

    for (entry, node) in entries.iter_mut().zip(nodes) {
        if entry.old_index.is_some() {
            update_fiber(host, &mut entry.fiber, node, context)?;
        }
    }

    // Kept children that stay in increasing old order need no move
    let mut last_placed = 0;
    let placed: Vec<bool> = entries
        .iter()
        .map(|entry| match entry.old_index {
            Some(j) if j >= last_placed => {
                last_placed = j;
                false
            }
            _ => true,
        })
        .collect();

    for i in (0..entries.len()).filter(|&i| placed[i]) {
        match (i + 1..entries.len()).find(|&k| !placed[k]) {
            Some(k) => {
                let before = &entries[k].fiber.instance;
                parent.insert_before(host, &entries[i].fiber.instance, before)?
            }
            None => parent.append(host, &entries[i].fiber.instance)?,
        }
        entries[i].attached = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReconcileError;
    use crate::value::Value;

    /// Host that records every callback as a string
    #[derive(Default)]
    struct RecordingHost {
        next_id: usize,
        log: Vec<String>,
        released: Vec<usize>,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Named {
        id: usize,
        name: String,
    }

    impl RecordingHost {
        fn take_log(&mut self) -> Vec<String> {
            std::mem::take(&mut self.log)
        }
    }

    impl HostConfig for RecordingHost {
        type Instance = Named;
        type Container = Vec<String>;
        type UpdatePayload = ();
        type HostContext = ();

        fn root_host_context(&self, _container: &Vec<String>) {}

        fn child_host_context(&self, _parent: &(), _type_name: &str) {}

        fn create_instance(
            &mut self,
            type_name: &str,
            props: &Props,
            _context: &(),
        ) -> Result<Named> {
            self.next_id += 1;
            let name = props
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(type_name)
                .to_string();
            self.log.push(format!("create {}", name));
            Ok(Named { id: self.next_id, name })
        }

        fn create_text_instance(&mut self, text: &str, _context: &()) -> Result<Named> {
            self.next_id += 1;
            Ok(Named {
                id: self.next_id,
                name: format!("'{}'", text),
            })
        }

        fn append_initial_child(&mut self, parent: &mut Named, child: &Named) -> Result<()> {
            self.log.push(format!("initial {} <- {}", parent.name, child.name));
            Ok(())
        }

        fn append_child(&mut self, parent: &mut Named, child: &Named) -> Result<()> {
            self.log.push(format!("append {} <- {}", parent.name, child.name));
            Ok(())
        }

        fn insert_before(
            &mut self,
            parent: &mut Named,
            child: &Named,
            before: &Named,
        ) -> Result<()> {
            self.log
                .push(format!("insert {} <- {} before {}", parent.name, child.name, before.name));
            Ok(())
        }

        fn remove_child(&mut self, parent: &mut Named, child: &Named) -> Result<()> {
            self.log.push(format!("remove {} -/- {}", parent.name, child.name));
            Ok(())
        }

        fn append_child_to_container(
            &mut self,
            container: &mut Vec<String>,
            child: &Named,
        ) -> Result<()> {
            container.push(child.name.clone());
            self.log.push(format!("mount {}", child.name));
            Ok(())
        }

        fn insert_in_container_before(
            &mut self,
            container: &mut Vec<String>,
            child: &Named,
            before: &Named,
        ) -> Result<()> {
            let at = container.iter().position(|n| *n == before.name).unwrap_or(container.len());
            container.insert(at, child.name.clone());
            self.log.push(format!("mount {} before {}", child.name, before.name));
            Ok(())
        }

        fn remove_child_from_container(
            &mut self,
            container: &mut Vec<String>,
            child: &Named,
        ) -> Result<()> {
            container.retain(|n| *n != child.name);
            self.log.push(format!("unmount {}", child.name));
            Ok(())
        }

        fn prepare_update(
            &mut self,
            instance: &Named,
            _type_name: &str,
            _old: &Props,
            new: &Props,
        ) -> Result<Option<()>> {
            self.log.push(format!("prepare {}", instance.name));
            if new.contains_key("fail") {
                return Err(ReconcileError::PayloadMismatch(instance.name.clone()));
            }
            Ok(Some(()))
        }

        fn commit_update(
            &mut self,
            instance: &mut Named,
            _payload: (),
            _type_name: &str,
            _old: &Props,
            _new: &Props,
        ) -> Result<()> {
            self.log.push(format!("commit {}", instance.name));
            Ok(())
        }

        fn detach_deleted_instance(&mut self, instance: &Named) -> Result<()> {
            self.released.push(instance.id);
            self.log.push(format!("release {}", instance.name));
            Ok(())
        }
    }

    fn named(type_name: &str, name: &str) -> Element {
        Element::new(type_name).key(name).prop("name", name)
    }

    fn list(names: &[&str]) -> Node {
        names
            .iter()
            .fold(named("list", "root"), |list, name| list.child(named("item", name)))
            .into()
    }

    #[test]
    fn test_mount_builds_bottom_up() {
        let mut reconciler = Reconciler::new(RecordingHost::default());
        let mut container = Vec::new();
        let tree: Node = named("a", "a").child(named("b", "b").child(named("c", "c"))).into();
        reconciler.mount(&tree, &mut container).unwrap();

        assert_eq!(
            reconciler.host_mut().take_log(),
            vec![
                "create a",
                "create b",
                "create c",
                "initial b <- c",
                "initial a <- b",
                "mount a",
            ]
        );
        assert_eq!(container, vec!["a"]);
    }

    #[test]
    fn test_identical_props_skip_prepare() {
        let mut reconciler = Reconciler::new(RecordingHost::default());
        let mut container = Vec::new();
        reconciler.mount(&list(&["x"]), &mut container).unwrap();
        reconciler.host_mut().take_log();

        reconciler.update(&list(&["x"]), &mut container).unwrap();
        assert!(reconciler.host_mut().take_log().is_empty());
    }

    #[test]
    fn test_changed_props_prepare_then_commit() {
        let mut reconciler = Reconciler::new(RecordingHost::default());
        let mut container = Vec::new();
        let tree = |size: i64| -> Node { named("box", "box").prop("size", size).into() };
        reconciler.mount(&tree(1), &mut container).unwrap();
        reconciler.host_mut().take_log();

        reconciler.update(&tree(2), &mut container).unwrap();
        assert_eq!(reconciler.host_mut().take_log(), vec!["prepare box", "commit box"]);
    }

    #[test]
    fn test_deletions_before_placements() {
        let mut reconciler = Reconciler::new(RecordingHost::default());
        let mut container = Vec::new();
        reconciler.mount(&list(&["a", "b"]), &mut container).unwrap();
        reconciler.host_mut().take_log();

        reconciler.update(&list(&["a", "c"]), &mut container).unwrap();
        assert_eq!(
            reconciler.host_mut().take_log(),
            vec!["create c", "remove root -/- b", "release b", "append root <- c"]
        );
    }

    #[test]
    fn test_insert_before_next_stable_sibling() {
        let mut reconciler = Reconciler::new(RecordingHost::default());
        let mut container = Vec::new();
        reconciler.mount(&list(&["a", "c"]), &mut container).unwrap();
        reconciler.host_mut().take_log();

        reconciler.update(&list(&["a", "b", "c"]), &mut container).unwrap();
        assert_eq!(
            reconciler.host_mut().take_log(),
            vec!["create b", "insert root <- b before c"]
        );
    }

    #[test]
    fn test_keyed_reorder_moves_only_displaced() {
        let mut reconciler = Reconciler::new(RecordingHost::default());
        let mut container = Vec::new();
        reconciler.mount(&list(&["a", "b", "c"]), &mut container).unwrap();
        reconciler.host_mut().take_log();

        reconciler.update(&list(&["c", "a", "b"]), &mut container).unwrap();
        assert_eq!(
            reconciler.host_mut().take_log(),
            vec!["append root <- a", "append root <- b"]
        );
        assert!(reconciler.host().released.is_empty());
    }

    #[test]
    fn test_failed_update_releases_unplaced_siblings() {
        let mut reconciler = Reconciler::new(RecordingHost::default());
        let mut container = Vec::new();
        reconciler.mount(&list(&["a"]), &mut container).unwrap();
        reconciler.host_mut().take_log();

        let failing: Node = named("list", "root")
            .child(named("item", "a").prop("fail", true))
            .child(named("item", "b"))
            .into();
        let err = reconciler.update(&failing, &mut container).unwrap_err();
        assert_eq!(err, ReconcileError::PayloadMismatch("a".into()));
        assert_eq!(
            reconciler.host_mut().take_log(),
            vec!["create b", "prepare a", "release b"]
        );

        reconciler.update(&list(&["a", "b"]), &mut container).unwrap();
        assert_eq!(
            reconciler.host_mut().take_log(),
            vec!["create b", "append root <- b"]
        );
    }

    #[test]
    fn test_type_change_replaces_instance() {
        let mut reconciler = Reconciler::new(RecordingHost::default());
        let mut container = Vec::new();
        reconciler.mount(&named("a", "old").into(), &mut container).unwrap();
        reconciler.host_mut().take_log();

        reconciler.update(&named("b", "old").into(), &mut container).unwrap();
        assert_eq!(
            reconciler.host_mut().take_log(),
            vec!["create old", "unmount old", "release old", "mount old"]
        );
        assert_eq!(container, vec!["old"]);
    }

    #[test]
    fn test_container_roots_use_container_callbacks() {
        let mut reconciler = Reconciler::new(RecordingHost::default());
        let mut container = Vec::new();
        reconciler.render(&[named("r", "two").into()], &mut container).unwrap();
        reconciler
            .render(&[named("r", "one").into(), named("r", "two").into()], &mut container)
            .unwrap();
        assert_eq!(container, vec!["one", "two"]);
    }

    #[test]
    fn test_unmount_releases_children_first() {
        let mut reconciler = Reconciler::new(RecordingHost::default());
        let mut container = Vec::new();
        reconciler.mount(&list(&["a"]), &mut container).unwrap();
        reconciler.host_mut().take_log();

        reconciler.unmount(&mut container).unwrap();
        assert_eq!(
            reconciler.host_mut().take_log(),
            vec!["unmount root", "release a", "release root"]
        );
        assert!(container.is_empty());
        assert!(!reconciler.is_mounted());
    }

    #[test]
    fn test_text_children_get_text_instances() {
        let mut reconciler = Reconciler::new(RecordingHost::default());
        let mut container = Vec::new();
        let tree: Node = named("label", "label").child("hello").into();
        reconciler.mount(&tree, &mut container).unwrap();

        let log = reconciler.host_mut().take_log();
        assert!(log.contains(&"initial label <- 'hello'".to_string()));
    }
}
