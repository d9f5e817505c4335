mod database;
mod error;
mod package;
mod source;

pub use database::PackageDatabase;
pub use error::DepsError;
pub use package::{DependencyTier, PackageDependencies, PackageRecord};
pub use source::{has_recognized_extension, source_file_name, DEFAULT_SOURCE_EXTENSIONS};
