use anyhow::{anyhow, Result};

/// Archive and patch suffixes fetched by default. Anything else in a
/// package's URL list (homepages, errata pages) is ignored.
pub const DEFAULT_SOURCE_EXTENSIONS: [&str; 6] =
    [".bz2", ".tar.xz", ".zip", ".tar.gz", ".patch", ".tgz"];

fn url_path(url: &str) -> &str {
    let without_fragment = url.split('#').next().unwrap_or(url);
    without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment)
}

pub fn has_recognized_extension<S: AsRef<str>>(url: &str, extensions: &[S]) -> bool {
    let lower = url_path(url).to_ascii_lowercase();
    extensions
        .iter()
        .any(|extension| lower.ends_with(&extension.as_ref().to_ascii_lowercase()))
}

/// Base name a source is stored under in the staging directory.
pub fn source_file_name(url: &str) -> Result<&str> {
    let path = url_path(url).trim_end_matches('/');
    let file_name = path.rsplit('/').next().unwrap_or("");
    if file_name.is_empty() || file_name == ".." || file_name == "." || path.ends_with(':') {
        return Err(anyhow!("could not derive a file name from source URL '{url}'"));
    }
    Ok(file_name)
}
