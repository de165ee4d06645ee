//! Room-name → target-index mapping.
//!
//! The physical installation drives five independently addressable targets.
//! The mapping is fixed configuration, not logic: an unknown room name fans
//! out to every target rather than failing.

/// Number of physical targets in the installation.
pub const TARGET_COUNT: usize = 5;

/// Every target index.
#[must_use]
pub fn all_targets() -> Vec<usize> {
    (0..TARGET_COUNT).collect()
}

/// Normalize a room name: lowercase, spaces and hyphens folded to underscores.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.to_lowercase().replace([' ', '-'], "_")
}

/// Resolve a target to the set of indices it addresses.
///
/// `None`, `"all"` (any case), and unknown names all map to every target.
#[must_use]
pub fn indices_for(target: Option<&str>) -> Vec<usize> {
    let Some(target) = target else {
        return all_targets();
    };
    if target.eq_ignore_ascii_case("all") {
        return all_targets();
    }

    match normalize(target).as_str() {
        "kitchen" => vec![0],
        "bedroom" => vec![1],
        "bathroom" | "bath" => vec![2],
        "hallway" => vec![3],
        "living_room" | "living" => vec![4],
        _ => all_targets(),
    }
}
