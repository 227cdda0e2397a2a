//! Per-type annotation storage and the reader used to query it.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use super::{check_target, Annotation, AnnotationRef, Inject, Target, INJECT};
use crate::error::DiResult;
use crate::service::Constructible;

type Bucket = Vec<AnnotationRef>;
type NamedBuckets = Vec<(String, Bucket)>;

/// Annotations of a single type. Named buckets keep insertion order.
#[derive(Default)]
struct TypeMetadata {
    class: Bucket,
    methods: NamedBuckets,
    properties: NamedBuckets,
    declared: bool,
}

/// Targets that carry named buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Member {
    Method,
    Property,
}

impl Member {
    fn target(self) -> Target {
        match self {
            Member::Method => Target::Method,
            Member::Property => Target::Property,
        }
    }
}

impl TypeMetadata {
    fn members(&self, member: Member) -> &NamedBuckets {
        match member {
            Member::Method => &self.methods,
            Member::Property => &self.properties,
        }
    }

    fn members_mut(&mut self, member: Member) -> &mut NamedBuckets {
        match member {
            Member::Method => &mut self.methods,
            Member::Property => &mut self.properties,
        }
    }
}

fn find_bucket<'m>(buckets: &'m NamedBuckets, member: &str) -> Option<&'m Bucket> {
    buckets.iter().find(|(name, _)| name == member).map(|(_, bucket)| bucket)
}

/// Materializes the bucket for `member` on first touch.
fn boot<'m>(buckets: &'m mut NamedBuckets, member: &str) -> &'m mut Bucket {
    let index = match buckets.iter().position(|(name, _)| name == member) {
        Some(index) => index,
        None => {
            buckets.push((member.to_string(), Vec::new()));
            buckets.len() - 1
        }
    };
    &mut buckets[index].1
}

fn first_named(bucket: &[AnnotationRef], name: &str) -> Option<AnnotationRef> {
    bucket.iter().find(|a| a.name() == name).cloned()
}

/// Annotation metadata for every type known to a container, keyed by stable
/// type identifier.
///
/// Metadata is additive: annotations can be appended but are never removed
/// or edited in place. Every read hands out a snapshot.
#[derive(Default)]
pub struct MetadataStore {
    types: RwLock<HashMap<String, TypeMetadata>>,
    declaring: Mutex<()>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reader over the metadata of `type_key`.
    pub fn reader(&self, type_key: impl Into<String>) -> Reader<'_> {
        Reader {
            store: self,
            type_key: type_key.into(),
        }
    }

    /// Runs the annotation hook of `constructible` the first time its type is
    /// seen. Later calls are no-ops, so annotations are never duplicated.
    ///
    /// Concurrent callers for the same type wait until the hook has finished,
    /// so nobody reads a half-annotated type. A failing hook is not retried.
    pub fn declare(&self, constructible: &Constructible) -> DiResult<()> {
        let (Some(type_key), Some(annotate)) = (constructible.type_key(), constructible.annotate_hook())
        else {
            return Ok(());
        };
        if self.is_declared(type_key) {
            return Ok(());
        }

        let _declaring = self.declaring.lock();
        if self.is_declared(type_key) {
            return Ok(());
        }

        debug!(type_key, "declaring annotations");
        let result = annotate(&self.reader(type_key));
        self.with_metadata(type_key, |m| m.declared = true);
        result
    }

    fn is_declared(&self, type_key: &str) -> bool {
        self.types.read().get(type_key).map_or(false, |m| m.declared)
    }

    /// Type identifiers that have metadata.
    pub fn type_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.types.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn with_metadata<R>(&self, type_key: &str, f: impl FnOnce(&mut TypeMetadata) -> R) -> R {
        let mut types = self.types.write();
        f(types.entry(type_key.to_string()).or_default())
    }

    /// Reads under the shared lock. Falls back to the exclusive lock, which
    /// creates missing entries, only when `read` finds nothing to read yet.
    fn read_or_boot<R>(
        &self,
        type_key: &str,
        read: impl FnOnce(&TypeMetadata) -> Option<R>,
        boot: impl FnOnce(&mut TypeMetadata) -> R,
    ) -> R {
        let found = self.types.read().get(type_key).and_then(read);
        match found {
            Some(found) => found,
            None => self.with_metadata(type_key, boot),
        }
    }
}

impl std::fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataStore")
            .field("types", &self.types.read().len())
            .finish()
    }
}

/// Annotation reader for a single type.
///
/// Querying a type that was never annotated is always safe: the relevant
/// bucket is created empty and `None` (or an empty list) comes back.
///
/// ```rust
/// use anno_di::{Inject, MetadataStore};
///
/// let store = MetadataStore::new();
/// let reader = store.reader("app::Engine");
/// assert!(reader.inject().is_none());
///
/// reader.add_class_annotation(Inject::new(["Wheels", "Fuel"])).unwrap();
/// let inject = reader.inject().unwrap();
/// assert_eq!(inject.len(), 2);
///
/// // Snapshots: mutating the returned list leaves storage untouched.
/// let mut snapshot = reader.class_annotations();
/// snapshot.clear();
/// assert_eq!(reader.class_annotations().len(), 1);
/// ```
pub struct Reader<'a> {
    store: &'a MetadataStore,
    type_key: String,
}

impl<'a> Reader<'a> {
    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    // ----- Class -----

    pub fn class_annotations(&self) -> Vec<AnnotationRef> {
        self.store
            .read_or_boot(&self.type_key, |m| Some(m.class.clone()), |m| m.class.clone())
    }

    /// First class annotation called `name`.
    pub fn class_annotation(&self, name: &str) -> Option<AnnotationRef> {
        self.store.read_or_boot(
            &self.type_key,
            |m| Some(first_named(&m.class, name)),
            |m| first_named(&m.class, name),
        )
    }

    /// First class annotation of concrete type `A`.
    pub fn class_annotation_as<A: Annotation + Clone>(&self) -> Option<A> {
        self.class_annotations()
            .iter()
            .find_map(|a| a.as_any().downcast_ref::<A>().cloned())
    }

    pub fn add_class_annotation(&self, annotation: impl Annotation) -> DiResult<&Self> {
        self.add_class_annotation_ref(Arc::new(annotation))
    }

    pub fn add_class_annotation_ref(&self, annotation: AnnotationRef) -> DiResult<&Self> {
        check_target(annotation.as_ref(), Target::Class)?;
        self.store
            .with_metadata(&self.type_key, |m| m.class.push(annotation));
        Ok(self)
    }

    /// The `Inject` annotation, if one was declared.
    pub fn inject(&self) -> Option<Inject> {
        self.class_annotation(INJECT)
            .and_then(|a| a.as_any().downcast_ref::<Inject>().cloned())
    }

    // ----- Methods -----

    /// Annotations of `method`.
    pub fn method_annotations(&self, method: &str) -> Vec<AnnotationRef> {
        self.member_annotations(Member::Method, method)
    }

    /// Annotations of every annotated method, in first-touch order.
    pub fn all_method_annotations(&self) -> Vec<(String, Vec<AnnotationRef>)> {
        self.all_member_annotations(Member::Method)
    }

    /// First annotation called `name` on `method`, or on any method when
    /// `method` is `None`.
    pub fn method_annotation(&self, name: &str, method: Option<&str>) -> Option<AnnotationRef> {
        self.member_annotation(Member::Method, name, method)
    }

    pub fn add_method_annotation(&self, method: &str, annotation: impl Annotation) -> DiResult<&Self> {
        self.add_member_annotation(Member::Method, method, Arc::new(annotation))
    }

    pub fn method_names(&self) -> Vec<String> {
        self.member_names(Member::Method)
    }

    // ----- Properties -----

    pub fn property_annotations(&self, property: &str) -> Vec<AnnotationRef> {
        self.member_annotations(Member::Property, property)
    }

    pub fn all_property_annotations(&self) -> Vec<(String, Vec<AnnotationRef>)> {
        self.all_member_annotations(Member::Property)
    }

    pub fn property_annotation(&self, name: &str, property: Option<&str>) -> Option<AnnotationRef> {
        self.member_annotation(Member::Property, name, property)
    }

    pub fn add_property_annotation(&self, property: &str, annotation: impl Annotation) -> DiResult<&Self> {
        self.add_member_annotation(Member::Property, property, Arc::new(annotation))
    }

    pub fn property_names(&self) -> Vec<String> {
        self.member_names(Member::Property)
    }

    // ----- Shared member handling -----

    fn member_annotations(&self, kind: Member, member: &str) -> Vec<AnnotationRef> {
        self.store.read_or_boot(
            &self.type_key,
            |m| find_bucket(m.members(kind), member).cloned(),
            |m| boot(m.members_mut(kind), member).clone(),
        )
    }

    fn all_member_annotations(&self, kind: Member) -> Vec<(String, Vec<AnnotationRef>)> {
        self.store.read_or_boot(
            &self.type_key,
            |m| Some(m.members(kind).clone()),
            |m| m.members(kind).clone(),
        )
    }

    fn member_annotation(&self, kind: Member, name: &str, member: Option<&str>) -> Option<AnnotationRef> {
        match member {
            Some(member) => self.store.read_or_boot(
                &self.type_key,
                |m| find_bucket(m.members(kind), member).map(|bucket| first_named(bucket, name)),
                |m| first_named(boot(m.members_mut(kind), member), name),
            ),
            None => {
                let scan = |m: &TypeMetadata| {
                    m.members(kind)
                        .iter()
                        .find_map(|(_, bucket)| first_named(bucket, name))
                };
                self.store
                    .read_or_boot(&self.type_key, |m| Some(scan(m)), |m| scan(m))
            }
        }
    }

    fn add_member_annotation(&self, kind: Member, member: &str, annotation: AnnotationRef) -> DiResult<&Self> {
        check_target(annotation.as_ref(), kind.target())?;
        self.store
            .with_metadata(&self.type_key, |m| boot(m.members_mut(kind), member).push(annotation));
        Ok(self)
    }

    fn member_names(&self, kind: Member) -> Vec<String> {
        let names = |m: &TypeMetadata| m.members(kind).iter().map(|(name, _)| name.clone()).collect::<Vec<_>>();
        self.store
            .read_or_boot(&self.type_key, |m| Some(names(m)), |m| names(m))
    }
}
