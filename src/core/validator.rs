//! Directory/catalog name matching.
//!
//! Before touching a directory, its last path segment must resemble the
//! catalog's display title. The score is the Sørensen-Dice coefficient over
//! character bigrams with whitespace removed, so spacing and punctuation
//! changes made for file-system safety still pass while unrelated names fail.

use std::path::Path;

use super::safety::{SafetyLimits, SafetyViolation};

/// Last path segment of `directory`, ignoring trailing separators
pub fn directory_name(directory: &Path) -> String {
    directory
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| directory.to_string_lossy().into_owned())
}

/// Similarity between two names, 0.0 to 1.0
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::sorensen_dice(a, b)
}

/// Check that `directory` looks like `catalog_title`; returns the score
pub fn validate(
    limits: &SafetyLimits,
    directory: &Path,
    catalog_title: &str,
) -> Result<f64, SafetyViolation> {
    let name = directory_name(directory);
    let score = similarity(catalog_title, &name);
    limits.check_similarity(&name, catalog_title, score)?;
    Ok(score)
}

/// Directory name to use for a catalog title under a root
pub fn directory_for_title(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}
