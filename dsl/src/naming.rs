//! Element-naming rules: kebab-casing, English inflection, and the
//! itemized fallback for collection item elements.

use convert_case::{Case, Casing};

pub fn hyphenize(name: &str) -> String {
    name.to_case(Case::Kebab)
}

/// Plural form of a name. Names already ending in `s` pass through
/// unchanged, so plural inputs are stable.
pub fn pluralize(name: &str) -> String {
    if name.is_empty() || name.ends_with('s') {
        return name.to_string();
    }
    if let Some(stem) = name.strip_suffix('y') {
        if !stem.is_empty() && !ends_with_vowel(stem) {
            return format!("{stem}ies");
        }
    }
    if ["x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| name.ends_with(suffix))
    {
        return format!("{name}es");
    }
    format!("{name}s")
}

/// Singular form of a name. Singular inputs pass through unchanged.
pub fn singularize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }
    for suffix in ["ses", "xes", "zes", "ches", "shes"] {
        if let Some(stem) = name.strip_suffix("es")
            && name.ends_with(suffix)
        {
            return stem.to_string();
        }
    }
    if name.ends_with('s') && !name.ends_with("ss") && name.len() > 1 {
        return name[..name.len() - 1].to_string();
    }
    name.to_string()
}

/// Element name for the items of a collection named `container_name`.
///
/// The singularized, hyphenized container name; when singularization is a
/// fixpoint (the container is already singular, or nested one level deep
/// into a list of lists), the `<name>-item` disambiguator avoids an item
/// element shadowing its container.
pub fn item_name(container_name: &str) -> String {
    let hyphenized = hyphenize(container_name);
    let singular = singularize(&hyphenized);
    if singular == hyphenized {
        format!("{singular}-item")
    } else {
        singular
    }
}

fn ends_with_vowel(s: &str) -> bool {
    s.chars()
        .next_back()
        .map(|c| "aeiou".contains(c))
        .unwrap_or(false)
}
