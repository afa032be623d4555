use crate::ids::SectionId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a card section.
///
/// The kind only biases defaults (span, priority, base height); the packer
/// never branches on it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    Info,
    Overview,
    Analytics,
    Chart,
    List,
    Contact,
    Map,
    Event,
    News,
    Product,
    Financials,
    Other,
}

impl SectionKind {
    pub const ALL: [SectionKind; 12] = [
        SectionKind::Info,
        SectionKind::Overview,
        SectionKind::Analytics,
        SectionKind::Chart,
        SectionKind::List,
        SectionKind::Contact,
        SectionKind::Map,
        SectionKind::Event,
        SectionKind::News,
        SectionKind::Product,
        SectionKind::Financials,
        SectionKind::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            SectionKind::Info => "info",
            SectionKind::Overview => "overview",
            SectionKind::Analytics => "analytics",
            SectionKind::Chart => "chart",
            SectionKind::List => "list",
            SectionKind::Contact => "contact",
            SectionKind::Map => "map",
            SectionKind::Event => "event",
            SectionKind::News => "news",
            SectionKind::Product => "product",
            SectionKind::Financials => "financials",
            SectionKind::Other => "other",
        }
    }

    /// Column-units a section of this kind asks for when the caller does not say.
    pub const fn default_span(self) -> usize {
        match self {
            SectionKind::Overview | SectionKind::Analytics | SectionKind::Chart | SectionKind::Map => 2,
            _ => 1,
        }
    }

    /// Lower values sort earlier among sections of equal height.
    pub const fn default_priority(self) -> i32 {
        match self {
            SectionKind::Overview => 0,
            SectionKind::Info | SectionKind::Analytics => 1,
            SectionKind::Chart | SectionKind::Financials | SectionKind::Map => 2,
            SectionKind::Contact | SectionKind::List | SectionKind::Product => 3,
            SectionKind::Event | SectionKind::News => 4,
            SectionKind::Other => 5,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Content volume of a section, used for height estimation before render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetrics {
    /// Number of label/value fields.
    pub field_count: u32,
    /// Number of list items, events, products, etc.
    pub item_count: u32,
    /// Length of free-text description in characters.
    pub description_len: u32,
}

impl ContentMetrics {
    pub fn new(field_count: u32, item_count: u32, description_len: u32) -> Self {
        Self {
            field_count,
            item_count,
            description_len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.field_count == 0 && self.item_count == 0 && self.description_len == 0
    }
}

/// Input unit of the packer. Created by the caller for every render cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDescriptor {
    pub id: SectionId,
    pub kind: SectionKind,
    pub estimated_height: Option<f32>,
    pub observed_height: Option<f32>,
    pub preferred_span: usize,
    pub priority: i32,
    #[serde(default)]
    pub content: ContentMetrics,
}

impl SectionDescriptor {
    /// Creates a descriptor with the span and priority defaults of `kind`.
    pub fn new(id: impl Into<SectionId>, kind: SectionKind) -> Self {
        Self {
            id: id.into(),
            kind,
            estimated_height: None,
            observed_height: None,
            preferred_span: kind.default_span(),
            priority: kind.default_priority(),
            content: ContentMetrics::default(),
        }
    }

    pub fn with_estimated_height(mut self, height: f32) -> Self {
        self.estimated_height = Some(height);
        self
    }

    pub fn with_observed_height(mut self, height: f32) -> Self {
        self.observed_height = Some(height);
        self
    }

    /// Sets the preferred span. Zero is raised to one.
    pub fn with_span(mut self, span: usize) -> Self {
        self.preferred_span = span.max(1);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_content(mut self, content: ContentMetrics) -> Self {
        self.content = content;
        self
    }

    /// The observed height, if one was recorded and it is usable.
    pub fn usable_observed_height(&self) -> Option<f32> {
        self.observed_height.filter(|h| is_usable_height(*h))
    }

    /// The caller's estimate, if present and usable.
    pub fn usable_estimated_height(&self) -> Option<f32> {
        self.estimated_height.filter(|h| is_usable_height(*h))
    }

    /// Span clamped to `[1, column_count]`.
    pub fn span_for(&self, column_count: usize) -> usize {
        self.preferred_span.max(1).min(column_count.max(1))
    }
}

/// A height is usable when it is finite and strictly positive.
pub fn is_usable_height(height: f32) -> bool {
    height.is_finite() && height > 0.0
}
