//! Static catalog of the ISA extensions this backend recognizes.

/// Single-letter standard extensions in the order an ISA string must list them.
pub const CANONICAL_ORDER: &str = "mafdqlcbjtpvn";

/// Members of the `g` shorthand after the implied `i`. Stops before `q`.
pub const G_BUNDLE: &str = "mafd";

/// Prefix-class order for multi-letter extensions.
pub const PREFIX_ORDER: [ExtClass; 3] = [ExtClass::Supervisor, ExtClass::Z, ExtClass::NonStandard];

/// Recognized `z`-class names.
pub const Z_EXTENSIONS: &[&str] = &[
    "zba",
    "zbb",
    "zbc",
    "zbs",
    "zicsr",
    "zifencei",
    "zihintpause",
];

/// Recognized `s`-class names.
pub const S_EXTENSIONS: &[&str] = &["sscofpmf", "svinval", "svnapot", "svpbmt"];

/// Classification of an extension name by its leading letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExtClass {
    /// Single-letter standard extension.
    Standard,
    /// `s`-prefixed supervisor extension.
    Supervisor,
    /// `z`-prefixed standard extension.
    Z,
    /// `x`-prefixed vendor extension.
    NonStandard,
}

impl ExtClass {
    /// Classify a subset name.
    pub fn of(name: &str) -> ExtClass {
        if name.len() > 1 {
            match name.as_bytes()[0] {
                b's' => return ExtClass::Supervisor,
                b'z' => return ExtClass::Z,
                b'x' => return ExtClass::NonStandard,
                _ => {}
            }
        }
        ExtClass::Standard
    }

    /// The leading letter of names in a prefixed class.
    pub fn prefix(self) -> Option<char> {
        match self {
            ExtClass::Standard => None,
            ExtClass::Supervisor => Some('s'),
            ExtClass::Z => Some('z'),
            ExtClass::NonStandard => Some('x'),
        }
    }

    /// Human-readable class name for diagnostics.
    pub fn description(self) -> &'static str {
        match self {
            ExtClass::Standard => "standard",
            ExtClass::Supervisor => "supervisor",
            ExtClass::Z => "standard non-single-letter",
            ExtClass::NonStandard => "non-standard",
        }
    }

    /// Whether `name` is acceptable for this prefixed class.
    ///
    /// Vendor names accept any spelling except the bare prefix letter.
    pub fn accepts(self, name: &str) -> bool {
        match self {
            ExtClass::Standard => is_standard_letter(name),
            ExtClass::Supervisor => S_EXTENSIONS.contains(&name),
            ExtClass::Z => Z_EXTENSIONS.contains(&name),
            ExtClass::NonStandard => name.len() > 1 && name.starts_with('x'),
        }
    }
}

/// Position of a standard letter in [`CANONICAL_ORDER`].
pub fn canonical_rank(letter: char) -> Option<usize> {
    CANONICAL_ORDER.find(letter)
}

fn is_standard_letter(name: &str) -> bool {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => matches!(c, 'i' | 'e') || canonical_rank(c).is_some(),
        _ => false,
    }
}

/// Default `(major, minor)` version for a subset given without one.
pub fn default_version(name: &str) -> Option<(u32, u32)> {
    match name {
        "e" => Some((1, 9)),
        "i" | "m" | "a" | "f" | "d" | "q" | "c" => Some((2, 0)),
        "zicsr" | "zifencei" => Some((2, 0)),
        "zihintpause" => Some((2, 0)),
        "zba" | "zbb" | "zbc" | "zbs" => Some((1, 0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_names() {
        assert_eq!(ExtClass::of("m"), ExtClass::Standard);
        assert_eq!(ExtClass::of("zicsr"), ExtClass::Z);
        assert_eq!(ExtClass::of("svinval"), ExtClass::Supervisor);
        assert_eq!(ExtClass::of("xfoo"), ExtClass::NonStandard);
        // a lone prefix letter is a standard-letter lookup, not a class
        assert_eq!(ExtClass::of("x"), ExtClass::Standard);
    }

    #[test]
    fn g_bundle_is_canonical_prefix() {
        assert!(CANONICAL_ORDER.starts_with(G_BUNDLE));
        assert!(!G_BUNDLE.contains('q'));
    }

    #[test]
    fn vendor_names() {
        assert!(ExtClass::NonStandard.accepts("xventana"));
        assert!(!ExtClass::NonStandard.accepts("x"));
        assert!(ExtClass::Z.accepts("zifencei"));
        assert!(!ExtClass::Z.accepts("zfoo"));
    }

    #[test]
    fn default_versions() {
        assert_eq!(default_version("i"), Some((2, 0)));
        assert_eq!(default_version("e"), Some((1, 9)));
        assert_eq!(default_version("xfoo"), None);
    }

    #[test]
    fn rank_follows_order() {
        assert!(canonical_rank('m') < canonical_rank('c'));
        assert_eq!(canonical_rank('z'), None);
    }
}
