//! Tag list helpers.
//!
//! Tags are free-form strings. Matching ignores case and surrounding space,
//! and a tag may carry `:`-separated sub-tags that match independently
//! (`"Mental: Quirk"` matches both `mental` and `quirk`).

/// Returns true if `tag` is present in `tags`, either whole or as a sub-tag.
pub fn has_tag(tag: &str, tags: &[String]) -> bool {
    let tag = tag.trim().to_lowercase();
    tags.iter()
        .flat_map(|one| one.split(':'))
        .any(|part| part.trim().to_lowercase() == tag)
}

/// Joins tags for display in a single cell.
pub fn combine_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Splits a combined tag string back into its trimmed, non-empty parts.
pub fn extract_tags(combined: &str) -> Vec<String> {
    combined
        .split(',')
        .map(str::trim)
        .filter(|one| !one.is_empty())
        .map(str::to_string)
        .collect()
}

/// Appends `tag` unless an identical tag is already present.
pub fn add_tag_once(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|one| one == tag) {
        tags.push(tag.to_string());
    }
}

/// Folds the `categories` list of older files into the tag list.
pub fn convert_old_categories_to_tags(tags: &[String], categories: &[String]) -> Vec<String> {
    let mut result = tags.to_vec();
    for category in categories {
        let category = category.trim();
        if !category.is_empty() {
            add_tag_once(&mut result, category);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn tag_matching_ignores_case_and_splits_sub_tags() {
        let tags = strings(&["Advantage", "Mental: Quirk"]);
        assert!(has_tag("advantage", &tags));
        assert!(has_tag(" MENTAL ", &tags));
        assert!(has_tag("quirk", &tags));
        assert!(!has_tag("Physical", &tags));
        assert!(!has_tag("Mental: Quirk", &tags));
        assert!(!has_tag("quirk", &[]));
    }

    #[test]
    fn combine_and_extract() {
        let tags = strings(&["Exotic", "Physical"]);
        assert_eq!(combine_tags(&tags), "Exotic, Physical");
        assert_eq!(extract_tags(" Exotic ,, Physical,"), tags);
        assert!(extract_tags("").is_empty());
    }

    #[test]
    fn categories_become_tags_without_duplicates() {
        let tags = strings(&["Mental"]);
        let merged = convert_old_categories_to_tags(&tags, &strings(&["Mental", " Social ", ""]));
        assert_eq!(merged, strings(&["Mental", "Social"]));
    }
}
