//! Method-name derivation from attribute names and role prototypes.
//!
//! A role prototype is a name pattern containing the placeholder word
//! `attribute` (or `Attribute`), for example `appendAttribute`. Deriving the
//! concrete name keeps the attribute's leading underscores in front and, when
//! the attribute starts with a capital letter, capitalizes the result so that
//! class-scope attributes produce class-scope looking methods.

const PLACEHOLDER_LOWER: &str = "attribute";
const PLACEHOLDER_UPPER: &str = "Attribute";

/// Split `attribute` into its leading underscore run and the remaining letters.
///
/// # Examples
///
/// ```
/// use translucent::naming::split_attribute;
/// assert_eq!(split_attribute("__name"), (2, "name"));
/// assert_eq!(split_attribute("Name"), (0, "Name"));
/// ```
#[must_use]
pub fn split_attribute(attribute: &str) -> (usize, &str) {
    let letters = attribute.trim_start_matches('_');
    (attribute.len() - letters.len(), letters)
}

/// Returns `true` when `prototype` contains the role placeholder.
#[must_use]
pub fn has_placeholder(prototype: &str) -> bool {
    prototype.contains(PLACEHOLDER_LOWER) || prototype.contains(PLACEHOLDER_UPPER)
}

/// Derive the concrete method name for `attribute` under `prototype`.
///
/// Every `attribute`/`Attribute` token in the prototype is replaced by the
/// attribute's letters verbatim. If those letters start with an uppercase
/// character, the first character of the result is uppercased. Finally the
/// attribute's leading underscores are re-prepended.
///
/// # Examples
///
/// ```
/// use translucent::naming::method_name;
/// assert_eq!(method_name("name", "pushAttribute"), "pushname");
/// assert_eq!(method_name("__name", "attribute"), "__name");
/// assert_eq!(method_name("Name", "getAttribute"), "GetName");
/// assert_eq!(method_name("_Name", "setAttribute"), "_SetName");
/// ```
#[must_use]
pub fn method_name(attribute: &str, prototype: &str) -> String {
    let (underscores, letters) = split_attribute(attribute);
    let substituted = substitute(prototype, letters);
    let body = if letters.starts_with(|c: char| c.is_uppercase()) {
        uppercase_first(&substituted)
    } else {
        substituted
    };
    let mut name = "_".repeat(underscores);
    name.push_str(&body);
    name
}

/// Returns `true` when `name` can serve as a method identifier.
///
/// Identifiers are non-empty, start with a letter or underscore and contain
/// only alphanumerics and underscores.
#[must_use]
pub fn is_method_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

// Single pass so letters containing the placeholder word are never rewritten.
fn substitute(prototype: &str, letters: &str) -> String {
    let mut out = String::with_capacity(prototype.len() + letters.len());
    let mut rest = prototype;
    while let Some(c) = rest.chars().next() {
        if let Some(tail) = rest
            .strip_prefix(PLACEHOLDER_LOWER)
            .or_else(|| rest.strip_prefix(PLACEHOLDER_UPPER))
        {
            out.push_str(letters);
            rest = tail;
        } else {
            out.push(c);
            rest = rest.get(c.len_utf8()..).unwrap_or_default();
        }
    }
    out
}

fn uppercase_first(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
