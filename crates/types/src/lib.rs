pub mod ids;
pub mod placement;
pub mod section;

pub use ids::{Generation, SectionId};
pub use placement::{EPSILON, LayoutResult, PlacedSection, QualityRating, QualityReport};
pub use section::{ContentMetrics, SectionDescriptor, SectionKind, is_usable_height};
