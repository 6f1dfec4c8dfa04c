//! Batch transforms that turn vendor spreadsheets and exports into the static
//! JSON lookup files used by the website's product pages.
//!
//! Each job reads one primary input fully into memory, builds its indexes and
//! writes a JSON artifact. Jobs are independent of each other.

pub mod chassis;
pub mod error;
pub mod hotspot;
pub mod lookbook;
pub mod ordered;
pub mod output;
pub mod settings;
pub mod sku;
pub mod video;

pub use chassis::{ChassisJob, ChassisRow, ChassisTable, ModelYears, YearChassis};
pub use error::DataError;
pub use hotspot::HotspotIndex;
pub use lookbook::{
    ImageMap, Lookbook, LookbookCsvJob, LookbookMetadata, LookbookProductsJob, LookbookRow,
    LookbookSet, Product, ProductsOutcome,
};
pub use ordered::OrderedIndex;
pub use settings::Settings;
pub use video::{VideoEntry, VideoIndex, VideoJob};
