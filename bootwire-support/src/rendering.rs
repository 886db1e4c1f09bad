//! Text rendering utilities for human-friendly bootstrap messages.
//!
//! Provides helpers to shorten type names, render parameter lists,
//! and compute "did you mean?" suggestions for unresolved types.

/// Renders a list of names separated by commas.
///
/// Used for method parameter lists and for listing every unresolved
/// parameter of a method in one message.
///
/// # Examples
/// ```
/// use bootwire_support::rendering::render_list;
///
/// let params = vec!["HealthService", "WeaponService"];
/// assert_eq!(render_list(&params), "HealthService, WeaponService");
/// ```
pub fn render_list(items: &[impl AsRef<str>]) -> String {
    items
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders a method signature from its name and parameter type names.
///
/// ```
/// use bootwire_support::rendering::render_signature;
///
/// let sig = render_signature("construct", &["game::Health", "game::Weapon"]);
/// assert_eq!(sig, "construct(Health, Weapon)");
/// ```
pub fn render_signature(method: &str, params: &[impl AsRef<str>]) -> String {
    let short: Vec<String> = params
        .iter()
        .map(|p| shorten_type_name(p.as_ref()))
        .collect();
    format!("{method}({})", render_list(&short))
}

/// Shortens a fully qualified type name for display.
///
/// ```
/// use bootwire_support::rendering::shorten_type_name;
///
/// let short = shorten_type_name("game::services::HealthService");
/// assert_eq!(short, "HealthService");
///
/// let short = shorten_type_name("alloc::sync::Arc<dyn game::traits::Weapon>");
/// assert_eq!(short, "Arc<dyn Weapon>");
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    // "game::services::HealthService" → "HealthService"
    // "Arc<dyn game::Weapon>" → "Arc<dyn Weapon>"
    let mut result = String::with_capacity(full_name.len());
    let mut chars = full_name.chars().peekable();
    let mut current_segment = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                current_segment.clear();
            }
            '<' | '>' | ',' | ' ' | '(' | ')' | '&' | '[' | ']' | ';' => {
                result.push_str(&current_segment);
                result.push(ch);
                current_segment.clear();
            }
            _ => current_segment.push(ch),
        }
    }

    result.push_str(&current_segment);
    result
}

/// Suggests registered type names close to a requested one.
///
/// Compares the requested type name against available types
/// and returns up to `max_suggestions` close matches, best first.
pub fn suggest_similar(
    requested: &str,
    available: &[&str],
    max_suggestions: usize,
) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    let requested_short = shorten_type_name(requested).to_lowercase();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter(|&&name| name != requested)
        .filter_map(|&name| {
            let name_lower = name.to_lowercase();
            let name_short = shorten_type_name(name).to_lowercase();

            if name_lower.contains(&requested_lower) || requested_lower.contains(&name_lower) {
                return Some((name, 100));
            }

            if name_short.contains(&requested_short) || requested_short.contains(&name_short) {
                return Some((name, 80));
            }

            let common = name_short
                .chars()
                .zip(requested_short.chars())
                .take_while(|(a, b)| a == b)
                .count();

            if common >= 3 {
                return Some((name, common * 10));
            }

            None
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}
