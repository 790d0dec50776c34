pub mod catalog;
pub mod cities;
pub mod common;
pub mod config;
pub mod domain;
pub mod filter;
pub mod formatter;
pub mod loader;
pub mod logging;
pub mod metrics;
pub mod modality;
pub mod server;
pub mod text;

pub use catalog::{Catalog, CatalogStats};
pub use common::error::{CatalogError, Result};
pub use config::Config;
pub use domain::{FormattedCourse, FormattedInstitution, RawCourse, RawInstitution};
pub use filter::{QueryFilter, SearchCriteria};
pub use formatter::RecordFormatter;
pub use modality::{Modality, ModalityClassifier};
