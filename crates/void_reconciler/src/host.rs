//! Host protocol
//!
//! [`HostConfig`] is the callback surface a reconciliation engine drives.
//! The engine owns identity, ordering and scheduling; the host owns what
//! instances are and how they relate. [`SceneHost`] is the implementation
//! over a [`void_scene::ObjectStore`].

use crate::attach::{attach, attach_to_container, detach, detach_from_container};
use crate::commit::commit;
use crate::config::{Callback, ReconcilerConfig, UnsupportedTypePolicy};
use crate::diff::{diff, UpdatePayload};
use crate::error::{ReconcileError, Result};
use crate::factory::create_instance;
use crate::instance::Instance;
use crate::tag::TypeTag;
use crate::value::Props;
use std::fmt;
use void_scene::{Container, ObjectStore};

/// Callbacks a host environment provides to the engine.
///
/// Creation and `append_initial_child` run while a new subtree is still
/// detached. The remaining mutation callbacks run against the live tree.
pub trait HostConfig {
    /// Retained counterpart of an element
    type Instance: fmt::Debug;
    /// Top-level mount point
    type Container;
    /// Result of [`HostConfig::prepare_update`]
    type UpdatePayload: fmt::Debug;
    /// Context threaded from parents to children during creation
    type HostContext;

    fn root_host_context(&self, container: &Self::Container) -> Self::HostContext;

    fn child_host_context(&self, parent: &Self::HostContext, type_name: &str) -> Self::HostContext;

    /// Construct the instance for an element
    fn create_instance(
        &mut self,
        type_name: &str,
        props: &Props,
        context: &Self::HostContext,
    ) -> Result<Self::Instance>;

    /// Construct the instance for a raw text child
    fn create_text_instance(
        &mut self,
        text: &str,
        context: &Self::HostContext,
    ) -> Result<Self::Instance>;

    /// Whether the element renders its children as text content
    fn should_set_text_content(&self, _type_name: &str, _props: &Props) -> bool {
        false
    }

    /// Relate a child to its parent while both are still detached
    fn append_initial_child(
        &mut self,
        parent: &mut Self::Instance,
        child: &Self::Instance,
    ) -> Result<()>;

    /// Called once all initial children are appended.
    ///
    /// Returning `true` asks for a post-mount commit; this engine has none
    /// and ignores it.
    fn finalize_initial_children(
        &mut self,
        _instance: &mut Self::Instance,
        _type_name: &str,
        _props: &Props,
    ) -> Result<bool> {
        Ok(false)
    }

    fn append_child(&mut self, parent: &mut Self::Instance, child: &Self::Instance) -> Result<()>;

    fn insert_before(
        &mut self,
        parent: &mut Self::Instance,
        child: &Self::Instance,
        before: &Self::Instance,
    ) -> Result<()>;

    fn remove_child(&mut self, parent: &mut Self::Instance, child: &Self::Instance) -> Result<()>;

    fn append_child_to_container(
        &mut self,
        container: &mut Self::Container,
        child: &Self::Instance,
    ) -> Result<()>;

    fn insert_in_container_before(
        &mut self,
        container: &mut Self::Container,
        child: &Self::Instance,
        before: &Self::Instance,
    ) -> Result<()>;

    fn remove_child_from_container(
        &mut self,
        container: &mut Self::Container,
        child: &Self::Instance,
    ) -> Result<()>;

    /// Decide what must change between two prop sets; `None` means nothing
    fn prepare_update(
        &mut self,
        instance: &Self::Instance,
        type_name: &str,
        old_props: &Props,
        new_props: &Props,
    ) -> Result<Option<Self::UpdatePayload>>;

    /// Apply a payload produced by [`HostConfig::prepare_update`]
    fn commit_update(
        &mut self,
        instance: &mut Self::Instance,
        payload: Self::UpdatePayload,
        type_name: &str,
        old_props: &Props,
        new_props: &Props,
    ) -> Result<()>;

    fn commit_text_update(
        &mut self,
        _instance: &mut Self::Instance,
        _old: &str,
        _new: &str,
    ) -> Result<()> {
        Ok(())
    }

    /// Release an instance that left the tree. It is never used again.
    fn detach_deleted_instance(&mut self, instance: &Self::Instance) -> Result<()>;

    fn prepare_for_commit(&mut self, _container: &mut Self::Container) {}

    fn reset_after_commit(&mut self, _container: &mut Self::Container) {}
}

/// Reconciler context for the retained scene library.
///
/// Owns every object it creates; nothing is global, so independent hosts
/// can live side by side.
#[derive(Debug, Default)]
pub struct SceneHost {
    store: ObjectStore,
    config: ReconcilerConfig,
}

impl SceneHost {
    pub fn new(config: ReconcilerConfig) -> Self {
        Self {
            store: ObjectStore::new(),
            config,
        }
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ObjectStore {
        &mut self.store
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    fn trace(&self, callback: Callback, detail: fmt::Arguments<'_>) {
        if self.config.trace.enabled(callback) {
            log::debug!("*** {} *** {}", callback.name(), detail);
        }
    }
}

impl HostConfig for SceneHost {
    type Instance = Instance;
    type Container = Container;
    type UpdatePayload = UpdatePayload;
    type HostContext = ();

    fn root_host_context(&self, _container: &Container) {}

    fn child_host_context(&self, _parent: &(), _type_name: &str) {}

    fn create_instance(
        &mut self,
        type_name: &str,
        props: &Props,
        _context: &(),
    ) -> Result<Instance> {
        let Some(tag) = TypeTag::from_name(type_name) else {
            return match self.config.unsupported_types {
                UnsupportedTypePolicy::NullInstance => {
                    log::warn!("Unsupported element type '{}', mounting nothing", type_name);
                    Ok(Instance::Null)
                }
                UnsupportedTypePolicy::Reject => {
                    Err(ReconcileError::UnsupportedType(type_name.to_string()))
                }
            };
        };
        let instance = create_instance(&mut self.store, tag, props)?;
        self.trace(Callback::CreateInstance, format_args!("{} {:?}", tag, instance.object_id()));
        Ok(instance)
    }

    fn create_text_instance(&mut self, text: &str, _context: &()) -> Result<Instance> {
        log::debug!("Text child {:?} has no scene counterpart", text);
        Ok(Instance::Null)
    }

    fn append_initial_child(&mut self, parent: &mut Instance, child: &Instance) -> Result<()> {
        let attachment = attach(&mut self.store, parent, child, None)?;
        self.trace(
            Callback::AppendInitialChild,
            format_args!("{:?} <- {:?}: {:?}", parent.tag(), child.tag(), attachment),
        );
        Ok(())
    }

    fn append_child(&mut self, parent: &mut Instance, child: &Instance) -> Result<()> {
        let attachment = attach(&mut self.store, parent, child, None)?;
        self.trace(
            Callback::AppendChild,
            format_args!("{:?} <- {:?}: {:?}", parent.tag(), child.tag(), attachment),
        );
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: &mut Instance,
        child: &Instance,
        before: &Instance,
    ) -> Result<()> {
        let attachment = attach(&mut self.store, parent, child, Some(before))?;
        self.trace(
            Callback::InsertBefore,
            format_args!(
                "{:?} <- {:?} before {:?}: {:?}",
                parent.tag(),
                child.tag(),
                before.tag(),
                attachment
            ),
        );
        Ok(())
    }

    fn remove_child(&mut self, parent: &mut Instance, child: &Instance) -> Result<()> {
        let attachment = detach(&mut self.store, parent, child)?;
        self.trace(
            Callback::RemoveChild,
            format_args!("{:?} -/- {:?}: {:?}", parent.tag(), child.tag(), attachment),
        );
        Ok(())
    }

    fn append_child_to_container(
        &mut self,
        container: &mut Container,
        child: &Instance,
    ) -> Result<()> {
        attach_to_container(container, child, None)?;
        self.trace(Callback::AppendChildToContainer, format_args!("{:?}", child.surface()));
        Ok(())
    }

    fn insert_in_container_before(
        &mut self,
        container: &mut Container,
        child: &Instance,
        before: &Instance,
    ) -> Result<()> {
        attach_to_container(container, child, Some(before))?;
        self.trace(
            Callback::InsertInContainerBefore,
            format_args!("{:?} before {:?}", child.surface(), before.surface()),
        );
        Ok(())
    }

    fn remove_child_from_container(
        &mut self,
        container: &mut Container,
        child: &Instance,
    ) -> Result<()> {
        detach_from_container(container, child)?;
        self.trace(Callback::RemoveChildFromContainer, format_args!("{:?}", child.surface()));
        Ok(())
    }

    fn prepare_update(
        &mut self,
        instance: &Instance,
        _type_name: &str,
        old_props: &Props,
        new_props: &Props,
    ) -> Result<Option<UpdatePayload>> {
        let Some(tag) = instance.tag() else {
            return Ok(None);
        };
        let payload = diff(tag, old_props, new_props)?;
        self.trace(Callback::PrepareUpdate, format_args!("{} {:?}", tag, payload));
        Ok((!payload.is_no_change()).then_some(payload))
    }

    fn commit_update(
        &mut self,
        instance: &mut Instance,
        payload: UpdatePayload,
        _type_name: &str,
        _old_props: &Props,
        _new_props: &Props,
    ) -> Result<()> {
        commit(&mut self.store, instance, &payload)?;
        self.trace(Callback::CommitUpdate, format_args!("{:?} {:?}", instance.tag(), payload));
        Ok(())
    }

    fn detach_deleted_instance(&mut self, instance: &Instance) -> Result<()> {
        if let Some(id) = instance.object_id() {
            self.store.remove(id)?;
            self.trace(Callback::DetachDeletedInstance, format_args!("{:?}", id));
        }
        Ok(())
    }
}
