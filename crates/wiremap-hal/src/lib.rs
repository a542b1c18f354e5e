//! # wiremap-hal
//!
//! HAL mapping on top of the wiremap combinator core: RFC 6570 level 1 URI
//! templates, `_links` and `_embedded` containers, and self links as object
//! identity. A resource's self link is written on push and resolved back
//! into the identified domain object when reading, while linked and embedded
//! resources compose out of the same accessor/mapper/syncer pieces as plain
//! properties.

pub mod link;
pub mod resource;
pub mod self_link;
pub mod template;

pub use link::{EmbeddedAccessor, LinkAccessor, LinkMapper, LinkParams};
pub use resource::{Embedded, EmbeddedFilter, Embeddeds, HalMapper, HalSyncer, HalSyncerBuilder};
pub use self_link::{SelfLinkMapper, TemplateParamsAccessor, TemplateParamsMapper};
pub use template::{TemplateError, UriTemplate};
