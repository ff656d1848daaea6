//! `RelationRegistry`: declared relation facts and the model accessor map.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use compact_str::CompactString;
use hashbrown::HashMap;

use crate::error::{RelataError, Result};
use crate::model::{TableAccessor, TableCatalog, convention_path};

use super::fact::{DirectRelation, RelationFact};
use super::key::RelationKey;

/// In-memory lookup table of relation facts and model accessors.
///
/// Declarations go through `&mut self` and are expected to happen while the
/// data-access layer is being configured. Once shared (typically behind an
/// `Arc`), the registry is only read; the one exception is the accessor cache
/// filled by [`resolve_model_class`](Self::resolve_model_class), which sits
/// behind its own lock.
#[derive(Default)]
pub struct RelationRegistry {
    relations: HashMap<RelationKey, RelationFact>,
    classes: RwLock<HashMap<CompactString, Arc<dyn TableAccessor>>>,
    namespace: CompactString,
    catalog: Option<Arc<dyn TableCatalog>>,
}

impl RelationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace used to derive conventional accessor paths.
    pub fn with_namespace(mut self, namespace: impl Into<CompactString>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the catalog searched for accessors that were never registered.
    pub fn with_catalog(mut self, catalog: impl TableCatalog + 'static) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    pub fn set_namespace(&mut self, namespace: impl Into<CompactString>) {
        self.namespace = namespace.into();
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    // =========================================================================
    // Relation facts
    // =========================================================================

    /// Declares that `model_a.column_a` joins `model_b.column_b`.
    ///
    /// Redeclaring a pair replaces the previous fact, in either order.
    pub fn declare_relation(
        &mut self,
        model_a: &str,
        column_a: &str,
        model_b: &str,
        column_b: &str,
    ) {
        self.declare_relations(
            model_a,
            model_b,
            DirectRelation::new(model_a, column_a, model_b, column_b).into(),
        );
    }

    /// Stores `fact` under the canonical key of `(model_a, model_b)`.
    ///
    /// The fact is stored as given; its shape is checked when it is resolved.
    pub fn declare_relations(&mut self, model_a: &str, model_b: &str, fact: RelationFact) {
        self.relations.insert(RelationKey::new(model_a, model_b), fact);
    }

    /// Declares that `model_a` and `model_b` relate only through `junction`.
    pub fn declare_through(&mut self, model_a: &str, model_b: &str, junction: &str) {
        self.declare_relations(model_a, model_b, RelationFact::through(junction));
    }

    pub fn lookup_relation(&self, model_a: &str, model_b: &str) -> Option<&RelationFact> {
        self.relations.get(&RelationKey::new(model_a, model_b))
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    // =========================================================================
    // Model accessors
    // =========================================================================

    /// Registers the accessor for `model`, replacing any previous one.
    pub fn register_model_class(&mut self, model: &str, accessor: impl TableAccessor + 'static) {
        self.register_shared_model_class(model, Arc::new(accessor));
    }

    pub fn register_shared_model_class(&mut self, model: &str, accessor: Arc<dyn TableAccessor>) {
        self.classes
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(model.into(), accessor);
    }

    /// Returns the accessor for `model`.
    ///
    /// Unregistered models are looked up in the catalog at
    /// `{namespace}::{model}::Table`; a hit is cached so later calls skip the
    /// catalog. The empty model name never resolves.
    pub fn resolve_model_class(&self, model: &str) -> Result<Arc<dyn TableAccessor>> {
        if model.is_empty() {
            return Err(RelataError::ModelClassNotFound {
                model: CompactString::default(),
                path: CompactString::default(),
            });
        }

        if let Some(accessor) = self.read_classes().get(model) {
            return Ok(Arc::clone(accessor));
        }

        let path = convention_path(&self.namespace, model);
        let located = self
            .catalog
            .as_ref()
            .and_then(|catalog| catalog.locate(&path))
            .ok_or_else(|| RelataError::ModelClassNotFound {
                model: model.into(),
                path: path.clone(),
            })?;
        crate::relata_trace_materialize!(convention model, path);

        // Another reader may have filled the slot in the meantime; keep the first.
        let mut classes = self.write_classes();
        let cached = classes.entry(model.into()).or_insert(located);
        Ok(Arc::clone(cached))
    }

    /// Whether an accessor for `model` is registered or already cached.
    pub fn is_model_cached(&self, model: &str) -> bool {
        self.read_classes().contains_key(model)
    }

    fn read_classes(&self) -> RwLockReadGuard<'_, HashMap<CompactString, Arc<dyn TableAccessor>>> {
        self.classes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_classes(&self) -> RwLockWriteGuard<'_, HashMap<CompactString, Arc<dyn TableAccessor>>> {
        self.classes.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for RelationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationRegistry")
            .field("relations", &self.relations)
            .field("classes", &self.read_classes().len())
            .field("namespace", &self.namespace)
            .field("catalog", &self.catalog.is_some())
            .finish()
    }
}
