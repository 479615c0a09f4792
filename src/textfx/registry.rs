//! Tag registry
//!
//!     The processing core never decides which tag names exist. It asks a [TagRegistry]:
//!     is `(prefix, name)` known, what [TagType] does it have, and do these parameters pass
//!     validation. Concrete behaviors (what a `wave` actually does) live behind the
//!     registry and are out of reach of the core.
//!
//!     [StaticRegistry] is the registry built from configuration: per-family tables of
//!     [TagSpec]s, plus "open" families that accept any name (events, by default).

use crate::textfx::parameters::{ParamKind, ParameterMap};
use crate::textfx::tags::{TagPrefix, TagType};
use std::collections::{HashMap, HashSet};

/// Lookup of known tags. See the module docs.
pub trait TagRegistry {
    fn tag_type(&self, prefix: TagPrefix, name: &str) -> Option<TagType>;

    fn is_known(&self, prefix: TagPrefix, name: &str) -> bool {
        self.tag_type(prefix, name).is_some()
    }

    fn validate(&self, prefix: TagPrefix, name: &str, parameters: &ParameterMap) -> bool;
}

impl<R: TagRegistry + ?Sized> TagRegistry for &R {
    fn tag_type(&self, prefix: TagPrefix, name: &str) -> Option<TagType> {
        (**self).tag_type(prefix, name)
    }

    fn validate(&self, prefix: TagPrefix, name: &str, parameters: &ParameterMap) -> bool {
        (**self).validate(prefix, name, parameters)
    }
}

/// Declared shape of one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    pub tag_type: TagType,
    pub params: Vec<(String, ParamKind)>,
    pub required: Vec<String>,
}

impl TagSpec {
    pub fn new(tag_type: TagType) -> Self {
        Self {
            tag_type,
            params: Vec::new(),
            required: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(TagType::Empty)
    }

    pub fn container() -> Self {
        Self::new(TagType::Container)
    }

    pub fn either() -> Self {
        Self::new(TagType::Either)
    }

    /// Declare a parameter. Use `""` for the bare leading value.
    pub fn param(mut self, key: impl Into<String>, kind: ParamKind) -> Self {
        self.params.push((key.into(), kind));
        self
    }

    pub fn require(mut self, key: impl Into<String>) -> Self {
        self.required.push(key.into());
        self
    }

    /// Required keys must be present; declared keys that are present must parse.
    /// Undeclared keys are accepted.
    pub fn validate(&self, parameters: &ParameterMap) -> bool {
        let has_required = self
            .required
            .iter()
            .all(|key| parameters.contains_key(key));
        has_required
            && self.params.iter().all(|(key, kind)| match parameters.get(key) {
                Some(value) => kind.accepts(value),
                None => true,
            })
    }
}

/// Registry backed by in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    specs: HashMap<(TagPrefix, String), TagSpec>,
    open_families: HashSet<TagPrefix>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, prefix: TagPrefix, name: impl Into<String>, spec: TagSpec) -> Self {
        self.insert(prefix, name, spec);
        self
    }

    pub fn insert(&mut self, prefix: TagPrefix, name: impl Into<String>, spec: TagSpec) {
        self.specs.insert((prefix, name.into()), spec);
    }

    /// Accept every name in `prefix`'s family as an [TagType::Empty] tag with any
    /// parameters. Explicit specs still take precedence.
    pub fn with_open_family(mut self, prefix: TagPrefix) -> Self {
        self.open_families.insert(prefix);
        self
    }

    pub fn spec(&self, prefix: TagPrefix, name: &str) -> Option<&TagSpec> {
        self.specs.get(&(prefix, name.to_string()))
    }

    /// Declared tags ordered by family, then name.
    pub fn tags(&self) -> Vec<(TagPrefix, &str, &TagSpec)> {
        let mut tags: Vec<_> = self
            .specs
            .iter()
            .map(|((prefix, name), spec)| (*prefix, name.as_str(), spec))
            .collect();
        tags.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        tags
    }

    pub fn is_open(&self, prefix: TagPrefix) -> bool {
        self.open_families.contains(&prefix)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty() && self.open_families.is_empty()
    }
}

impl TagRegistry for StaticRegistry {
    fn tag_type(&self, prefix: TagPrefix, name: &str) -> Option<TagType> {
        match self.spec(prefix, name) {
            Some(spec) => Some(spec.tag_type),
            None if self.open_families.contains(&prefix) => Some(TagType::Empty),
            None => None,
        }
    }

    fn validate(&self, prefix: TagPrefix, name: &str, parameters: &ParameterMap) -> bool {
        match self.spec(prefix, name) {
            Some(spec) => spec.validate(parameters),
            None => self.open_families.contains(&prefix),
        }
    }
}
