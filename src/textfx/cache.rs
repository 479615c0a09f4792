//! Tag cache
//!
//!     Finalized spans become cached tags through a per-family [CachedTagFactory]. The
//!     [TagCache] owns them in a flat table; everyone else holds a [CachedTagId] and reads
//!     through the cache, so updates made by reconciliation are visible to all holders.
//!
//!     Lookup by character index goes through buckets: for every index, the ids of the tags
//!     covering it, sorted by `(start, order_at_index)`. Buckets are rebuilt whenever the
//!     cache is told about a new document length (see [TagCache::set_document_len]). After
//!     [TagCache::spans_mut] and before the next rebuild, lookups fall back to a scan.

use crate::textfx::tags::{EffectTag, EffectTagIndices};
use crate::textfx::wave::{OffsetKind, Wave, WaveConfig};

/// Capability shared by all cached tags.
pub trait CachedTag {
    fn tag(&self) -> &EffectTag;
    fn indices(&self) -> &EffectTagIndices;
    fn indices_mut(&mut self) -> &mut EffectTagIndices;
}

/// Builds the cached form of a finalized tag.
pub trait CachedTagFactory {
    type Output: CachedTag;

    fn create(&self, tag: EffectTag, indices: EffectTagIndices) -> Self::Output;
}

impl<F, T> CachedTagFactory for F
where
    F: Fn(EffectTag, EffectTagIndices) -> T,
    T: CachedTag,
{
    type Output = T;

    fn create(&self, tag: EffectTag, indices: EffectTagIndices) -> T {
        self(tag, indices)
    }
}

/// A cached tag with no family-specific state. Used for commands and events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicTag {
    tag: EffectTag,
    indices: EffectTagIndices,
}

impl BasicTag {
    pub fn new(tag: EffectTag, indices: EffectTagIndices) -> Self {
        Self { tag, indices }
    }
}

impl CachedTag for BasicTag {
    fn tag(&self) -> &EffectTag {
        &self.tag
    }

    fn indices(&self) -> &EffectTagIndices {
        &self.indices
    }

    fn indices_mut(&mut self) -> &mut EffectTagIndices {
        &mut self.indices
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BasicTagFactory;

impl CachedTagFactory for BasicTagFactory {
    type Output = BasicTag;

    fn create(&self, tag: EffectTag, indices: EffectTagIndices) -> BasicTag {
        BasicTag::new(tag, indices)
    }
}

/// An animation tag with its wave resolved from the tag's parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedAnimation {
    tag: EffectTag,
    indices: EffectTagIndices,
    wave: Wave,
    offset: OffsetKind,
    uniformity: f32,
}

impl CachedAnimation {
    pub fn wave(&self) -> &Wave {
        &self.wave
    }

    pub fn offset(&self) -> OffsetKind {
        self.offset
    }

    pub fn uniformity(&self) -> f32 {
        self.uniformity
    }
}

impl CachedTag for CachedAnimation {
    fn tag(&self) -> &EffectTag {
        &self.tag
    }

    fn indices(&self) -> &EffectTagIndices {
        &self.indices
    }

    fn indices_mut(&mut self) -> &mut EffectTagIndices {
        &mut self.indices
    }
}

/// Resolves waves over a base configuration. Tags whose wave parameters do not form a
/// valid wave fall back to the base wave.
#[derive(Debug, Clone)]
pub struct AnimationFactory {
    base: Wave,
}

impl AnimationFactory {
    pub fn new(base: Wave) -> Self {
        Self { base }
    }
}

impl Default for AnimationFactory {
    fn default() -> Self {
        Self::new(Wave::default())
    }
}

impl CachedTagFactory for AnimationFactory {
    type Output = CachedAnimation;

    fn create(&self, tag: EffectTag, indices: EffectTagIndices) -> CachedAnimation {
        let parameters = tag.parameters();
        let wave = WaveConfig::from_parameters(parameters, "", self.base.config())
            .map_err(crate::textfx::Error::from)
            .and_then(|config| Ok(Wave::new(config)?))
            .unwrap_or_else(|error| {
                tracing::warn!(
                    target: "textfx::cache",
                    tag = tag.name(),
                    %error,
                    "invalid wave parameters, using the base wave"
                );
                self.base
            });
        let offset = parameters
            .get_any(&["offset", "off"])
            .and_then(|(_, value)| value.parse().ok())
            .unwrap_or_default();
        let uniformity = parameters
            .f32_of(&["uniformity", "uni"])
            .ok()
            .flatten()
            .unwrap_or(1.0);
        CachedAnimation {
            tag,
            indices,
            wave,
            offset,
            uniformity,
        }
    }
}

/// Handle to a cached tag. Only meaningful for the cache that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CachedTagId(usize);

impl CachedTagId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct TagCache<T> {
    tags: Vec<T>,
    buckets: Vec<Vec<CachedTagId>>,
    document_len: usize,
    stale: bool,
}

impl<T> Default for TagCache<T> {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            buckets: Vec::new(),
            document_len: 0,
            stale: false,
        }
    }
}

impl<T: CachedTag> TagCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document_len(document_len: usize) -> Self {
        Self {
            document_len,
            ..Self::default()
        }
    }

    pub fn add<F>(
        &mut self,
        factory: &F,
        tag: EffectTag,
        indices: EffectTagIndices,
    ) -> CachedTagId
    where
        F: CachedTagFactory<Output = T> + ?Sized,
    {
        let id = CachedTagId(self.tags.len());
        let mut cached = factory.create(tag, indices);
        cached.indices_mut().resolve_open_end(self.document_len);
        self.tags.push(cached);
        if !self.stale {
            self.insert_into_buckets(id);
        }
        id
    }

    pub fn get(&self, id: CachedTagId) -> Option<&T> {
        self.tags.get(id.0)
    }

    pub fn get_mut(&mut self, id: CachedTagId) -> Option<&mut T> {
        self.tags.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn document_len(&self) -> usize {
        self.document_len
    }

    pub fn iter(&self) -> impl Iterator<Item = (CachedTagId, &T)> {
        self.tags
            .iter()
            .enumerate()
            .map(|(i, tag)| (CachedTagId(i), tag))
    }

    /// Live indices of every cached tag, for reconciliation. Lookups scan until the next
    /// [TagCache::set_document_len].
    pub fn spans_mut(&mut self) -> impl Iterator<Item = &mut EffectTagIndices> {
        self.stale = true;
        self.tags.iter_mut().map(|tag| tag.indices_mut())
    }

    /// Re-resolve open-ended spans against the new length and rebuild the index.
    pub fn set_document_len(&mut self, document_len: usize) {
        self.document_len = document_len;
        for tag in &mut self.tags {
            tag.indices_mut().resolve_open_end(document_len);
        }
        self.rebuild();
    }

    /// Tags covering `index`, sorted by `(start, order_at_index)`.
    pub fn active_at(&self, index: usize) -> impl Iterator<Item = &T> {
        self.active_ids_at(index)
            .into_iter()
            .filter_map(move |id| self.tags.get(id.0))
    }

    pub fn active_ids_at(&self, index: usize) -> Vec<CachedTagId> {
        if !self.stale {
            return self.buckets.get(index).cloned().unwrap_or_default();
        }
        let mut ids: Vec<CachedTagId> = self
            .iter()
            .filter(|(_, tag)| tag.indices().contains(index))
            .map(|(id, _)| id)
            .collect();
        self.sort_ids(&mut ids);
        ids
    }

    /// Tags starting exactly at `index`, sorted by order at index.
    pub fn starting_at(&self, index: usize) -> impl Iterator<Item = (CachedTagId, &T)> {
        self.active_ids_at(index)
            .into_iter()
            .filter_map(move |id| self.tags.get(id.0).map(|tag| (id, tag)))
            .filter(move |(_, tag)| tag.indices().start == index)
    }

    pub fn clear(&mut self) {
        self.tags.clear();
        self.buckets.clear();
        self.stale = false;
    }

    fn rebuild(&mut self) {
        self.buckets.clear();
        self.stale = false;
        for i in 0..self.tags.len() {
            self.insert_into_buckets(CachedTagId(i));
        }
    }

    fn insert_into_buckets(&mut self, id: CachedTagId) {
        let indices = *self.tags[id.0].indices();
        if indices.end > self.buckets.len() {
            self.buckets.resize_with(indices.end, Vec::new);
        }
        for index in indices.start..indices.end {
            let bucket = &self.buckets[index];
            let position = bucket
                .binary_search_by(|other| {
                    self.tags[other.0]
                        .indices()
                        .cmp_order(&indices)
                        .then(other.cmp(&id))
                })
                .unwrap_or_else(|position| position);
            self.buckets[index].insert(position, id);
        }
    }

    fn sort_ids(&self, ids: &mut [CachedTagId]) {
        ids.sort_by(|a, b| {
            self.tags[a.0]
                .indices()
                .cmp_order(self.tags[b.0].indices())
                .then(a.cmp(b))
        });
    }
}
