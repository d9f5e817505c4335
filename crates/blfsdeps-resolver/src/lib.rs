mod resolve;
mod types;

pub use resolve::resolve_dependencies;
pub use types::ResolvedPackages;

#[cfg(test)]
mod tests;
