// src/slug.rs

//! Conversion between category display names and URL path segments.
//!
//! Spaces become underscores on the way out and underscores become spaces on
//! the way back. A name that already contains an underscore does not survive
//! the round trip: `"snake_case"` decodes to `"snake case"`. Lookups by slug
//! rely on that being the only transformation, so no escaping is applied.

/// Turns a display name into a URL segment.
pub fn encode(name: &str) -> String {
    name.replace(' ', "_")
}

/// Turns a URL segment back into a display name.
pub fn decode(slug: &str) -> String {
    slug.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_replaces_every_space() {
        assert_eq!(encode("Other Frameworks"), "Other_Frameworks");
        assert_eq!(encode("  a  b "), "__a__b_");
        assert_eq!(encode("Python"), "Python");
    }

    #[test]
    fn decode_replaces_every_underscore() {
        assert_eq!(decode("My_Topic"), "My Topic");
        assert_eq!(decode("__"), "  ");
    }

    #[test]
    fn round_trip_without_underscores() {
        for name in ["", "Django", "Other Frameworks", " leading", "trailing ", "ünï cödé"] {
            assert_eq!(decode(&encode(name)), name);
        }
    }

    #[test]
    fn underscores_in_names_are_lost() {
        assert_eq!(decode(&encode("snake_case")), "snake case");
    }

    #[test]
    fn no_escaping_is_applied() {
        assert_eq!(encode("C++ & Rust?"), "C++_&_Rust?");
        assert_eq!(decode("100%_sure"), "100% sure");
    }
}
