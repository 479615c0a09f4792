//! End-to-end pipeline
//!
//!     [EffectPipeline] owns everything one animated text component needs:
//!
//!         set_text(source)      preprocess, then fill one cache per family
//!         reconcile(map)        shift every cached span after the host's layout pass
//!         *_at(index)           per-character queries during reveal
//!
//!     Animations, show and hide animations are cached as [CachedAnimation]s with their
//!     waves resolved; commands and events as [BasicTag]s. The caches are rebuilt on every
//!     `set_text` and updated in place by `reconcile`.

use crate::textfx::cache::{
    AnimationFactory, BasicTag, BasicTagFactory, CachedAnimation, CachedTag, TagCache,
};
use crate::textfx::config::TextFxConfig;
use crate::textfx::processing::{
    DocumentPreprocessor, PreprocessOptions, ProcessedDocument, StyleSheet,
};
use crate::textfx::reconcile::{reconcile, ReconcileReport};
use crate::textfx::registry::{StaticRegistry, TagRegistry};
use crate::textfx::tags::TagPrefix;
use crate::textfx::wave::offset::CharacterPosition;
use crate::textfx::wave::Wave;
use crate::textfx::writer::Script;
use crate::textfx::Result;

/// Value of one animation at one character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSample<'a> {
    pub animation: &'a CachedAnimation,
    pub value: f32,
    pub direction: i32,
}

#[derive(Debug)]
pub struct EffectPipeline<R: TagRegistry> {
    registry: R,
    styles: Option<StyleSheet>,
    options: PreprocessOptions,
    animation_factory: AnimationFactory,
    text: String,
    chars: Vec<char>,
    len: usize,
    animations: TagCache<CachedAnimation>,
    show: TagCache<CachedAnimation>,
    hide: TagCache<CachedAnimation>,
    commands: TagCache<BasicTag>,
    events: TagCache<BasicTag>,
}

impl<R: TagRegistry> EffectPipeline<R> {
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            styles: None,
            options: PreprocessOptions::default(),
            animation_factory: AnimationFactory::default(),
            text: String::new(),
            chars: Vec::new(),
            len: 0,
            animations: TagCache::new(),
            show: TagCache::new(),
            hide: TagCache::new(),
            commands: TagCache::new(),
            events: TagCache::new(),
        }
    }

    pub fn with_styles(mut self, styles: StyleSheet) -> Self {
        self.styles = Some(styles);
        self
    }

    pub fn with_options(mut self, options: PreprocessOptions) -> Self {
        self.options = options;
        self
    }

    /// Wave used by animations that do not set their own parameters.
    pub fn with_base_wave(mut self, wave: Wave) -> Self {
        self.animation_factory = AnimationFactory::new(wave);
        self
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Preprocess `source` and rebuild every cache. Returns the processed document.
    pub fn set_text(&mut self, source: &str) -> ProcessedDocument {
        let mut preprocessor =
            DocumentPreprocessor::new(&self.registry).with_options(self.options.clone());
        if let Some(styles) = &self.styles {
            preprocessor = preprocessor.with_styles(styles);
        }
        let document = preprocessor.preprocess(source);

        self.text = document.text.clone();
        self.chars = document.text.chars().collect();
        self.len = document.text_len;

        self.animations = TagCache::with_document_len(self.len);
        self.show = TagCache::with_document_len(self.len);
        self.hide = TagCache::with_document_len(self.len);
        self.commands = TagCache::with_document_len(self.len);
        self.events = TagCache::with_document_len(self.len);

        for span in &document.spans {
            let tag = span.tag.clone();
            let indices = span.indices;
            match span.tag.prefix() {
                TagPrefix::None => {
                    self.animations.add(&self.animation_factory, tag, indices);
                }
                TagPrefix::Show => {
                    self.show.add(&self.animation_factory, tag, indices);
                }
                TagPrefix::Hide => {
                    self.hide.add(&self.animation_factory, tag, indices);
                }
                TagPrefix::Command => {
                    self.commands.add(&BasicTagFactory, tag, indices);
                }
                TagPrefix::Event => {
                    self.events.add(&BasicTagFactory, tag, indices);
                }
            }
        }
        document
    }

    /// Display text, tags stripped. Replaced by [EffectPipeline::set_rendered_text].
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current document length in characters.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Shift every cached span to match the host's index map, see
    /// [reconcile](crate::textfx::reconcile). On failure nothing changes.
    pub fn reconcile<M>(&mut self, index_map: M) -> Result<ReconcileReport>
    where
        M: IntoIterator<Item = (usize, usize)>,
    {
        let spans = self
            .animations
            .spans_mut()
            .chain(self.show.spans_mut())
            .chain(self.hide.spans_mut())
            .chain(self.commands.spans_mut())
            .chain(self.events.spans_mut());
        let result = reconcile(spans, index_map, self.len);
        if let Ok(report) = &result {
            self.len = report.rendered_len;
        }
        self.resolve_document_len();
        Ok(result?)
    }

    /// Text the host actually renders, used for word offsets after reconciliation.
    pub fn set_rendered_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.chars = text.chars().collect();
    }

    pub fn animations(&self) -> &TagCache<CachedAnimation> {
        &self.animations
    }

    pub fn show_animations(&self) -> &TagCache<CachedAnimation> {
        &self.show
    }

    pub fn hide_animations(&self) -> &TagCache<CachedAnimation> {
        &self.hide
    }

    pub fn commands(&self) -> &TagCache<BasicTag> {
        &self.commands
    }

    pub fn events(&self) -> &TagCache<BasicTag> {
        &self.events
    }

    pub fn animations_at(&self, index: usize) -> impl Iterator<Item = &CachedAnimation> {
        self.animations.active_at(index)
    }

    pub fn show_at(&self, index: usize) -> impl Iterator<Item = &CachedAnimation> {
        self.show.active_at(index)
    }

    pub fn hide_at(&self, index: usize) -> impl Iterator<Item = &CachedAnimation> {
        self.hide.active_at(index)
    }

    pub fn commands_at(&self, index: usize) -> impl Iterator<Item = &BasicTag> {
        self.commands.active_at(index)
    }

    pub fn events_at(&self, index: usize) -> impl Iterator<Item = &BasicTag> {
        self.events.active_at(index)
    }

    /// Every animation active at `index`, evaluated at `time` with the character's offset.
    pub fn sample_animations(&self, index: usize, time: f32) -> Vec<AnimationSample<'_>> {
        self.animations
            .active_at(index)
            .map(|animation| {
                let position = CharacterPosition::within(&self.chars, animation.indices(), index);
                let offset = animation.offset().offset(&position, animation.uniformity());
                let (value, direction) = animation.wave().evaluate(time, offset);
                AnimationSample {
                    animation,
                    value,
                    direction,
                }
            })
            .collect()
    }

    /// Command and event caches, for a [Writer](crate::textfx::writer::Writer).
    pub fn script(&self) -> Script<'_> {
        Script {
            commands: &self.commands,
            events: &self.events,
        }
    }

    fn resolve_document_len(&mut self) {
        self.animations.set_document_len(self.len);
        self.show.set_document_len(self.len);
        self.hide.set_document_len(self.len);
        self.commands.set_document_len(self.len);
        self.events.set_document_len(self.len);
    }
}

impl EffectPipeline<StaticRegistry> {
    /// Registry, styles, options and base wave as configured.
    pub fn from_config(config: &TextFxConfig) -> Result<Self> {
        let wave = config.base_wave()?;
        Ok(Self::new(config.registry()?)
            .with_styles(config.style_sheet())
            .with_options(config.preprocess.clone())
            .with_base_wave(wave))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textfx::registry::TagSpec;

    fn pipeline() -> EffectPipeline<StaticRegistry> {
        EffectPipeline::new(
            StaticRegistry::new()
                .with_tag(TagPrefix::None, "wave", TagSpec::container())
                .with_tag(TagPrefix::Show, "fade", TagSpec::container())
                .with_tag(TagPrefix::Command, "wait", TagSpec::empty())
                .with_open_family(TagPrefix::Event),
        )
    }

    fn names<'a, T: CachedTag + 'a>(tags: impl Iterator<Item = &'a T>) -> Vec<&'a str> {
        tags.map(|t| t.tag().name()).collect()
    }

    #[test]
    fn test_set_text_fills_family_caches() {
        let mut pipeline = pipeline();
        let document = pipeline.set_text("<wave>ab<!wait=1>c</wave><+fade>d<?ping>");
        assert_eq!(document.text, "abcd");
        assert_eq!(pipeline.text(), "abcd");
        assert_eq!(names(pipeline.animations_at(1)), vec!["wave"]);
        assert_eq!(names(pipeline.commands_at(2)), vec!["wait"]);
        assert_eq!(names(pipeline.show_at(3)), vec!["fade"]);
        assert_eq!(names(pipeline.events_at(4)), vec!["ping"]);
        assert!(pipeline.hide_at(0).next().is_none());
    }

    #[test]
    fn test_reconcile_updates_all_caches() {
        let mut pipeline = pipeline();
        pipeline.set_text("a<wave>bc</wave>d<?ping>");
        // Host inserts one character after "a"
        let report = pipeline
            .reconcile([(0, 0), (1, 0), (2, 1), (3, 2), (4, 3)])
            .unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(pipeline.len(), 5);
        assert_eq!(pipeline.animations().iter().next().unwrap().1.indices().start, 2);
        assert_eq!(names(pipeline.animations_at(3)), vec!["wave"]);
        assert!(pipeline.animations_at(4).next().is_none());
        assert_eq!(names(pipeline.events_at(5)), vec!["ping"]);
    }

    #[test]
    fn test_failed_reconcile_changes_nothing() {
        let mut pipeline = pipeline();
        pipeline.set_text("<wave>abc");
        assert!(pipeline.reconcile([(0, 1), (1, 0)]).is_err());
        assert_eq!(pipeline.len(), 3);
        assert_eq!(names(pipeline.animations_at(2)), vec!["wave"]);
    }

    #[test]
    fn test_open_ended_span_follows_reconciled_length() {
        let mut pipeline = pipeline();
        pipeline.set_text("<wave>abc");
        pipeline
            .reconcile([(0, 0), (1, 1), (2, 2), (3, 2)])
            .unwrap();
        assert_eq!(names(pipeline.animations_at(3)), vec!["wave"]);
    }

    #[test]
    fn test_sample_animations_uses_offsets() {
        let mut pipeline = pipeline();
        pipeline.set_text("<wave up=1 down=1 upcurve=linear uni=0.5>abc</wave>");
        let first = pipeline.sample_animations(0, 0.5);
        let second = pipeline.sample_animations(1, 0.5);
        assert_eq!(first.len(), 1);
        assert!((first[0].value - 0.5).abs() < 1e-5);
        // Offset -0.5 moves the second character back to the start of the rise
        assert!(second[0].value.abs() < 1e-5);
        assert_eq!(second[0].direction, 1);
    }
}
