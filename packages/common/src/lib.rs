pub mod analytics;
pub mod catalog;
pub mod format;
pub mod playback;
pub mod roku;
pub mod search;
pub mod seo;
pub mod storage;
pub mod validation;
pub mod video;

pub use catalog::{Catalog, CatalogError, CatalogStats, ListQuery, Page, SortField, SortOrder};
pub use video::{Category, Commercial, Video, VideoDraft, VideoPatch};
