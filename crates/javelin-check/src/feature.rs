use serde::Serialize;

/// Source-language version the file is checked against. Ordered; feature
/// sufficiency is a monotonic threshold over this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageVersion {
    V5,
    V6,
    V7,
    V8,
    V9,
    V10,
    V11,
    V12,
    V13,
    V14,
    V15,
    V16,
    V17,
    V18,
    V19,
    V20,
    V21,
}

impl LanguageVersion {
    pub const LATEST: LanguageVersion = LanguageVersion::V21;

    pub const ALL: [LanguageVersion; 17] = [
        LanguageVersion::V5,
        LanguageVersion::V6,
        LanguageVersion::V7,
        LanguageVersion::V8,
        LanguageVersion::V9,
        LanguageVersion::V10,
        LanguageVersion::V11,
        LanguageVersion::V12,
        LanguageVersion::V13,
        LanguageVersion::V14,
        LanguageVersion::V15,
        LanguageVersion::V16,
        LanguageVersion::V17,
        LanguageVersion::V18,
        LanguageVersion::V19,
        LanguageVersion::V20,
        LanguageVersion::V21,
    ];

    pub fn from_major(major: u32) -> LanguageVersion {
        match major {
            0..=5 => LanguageVersion::V5,
            6 => LanguageVersion::V6,
            7 => LanguageVersion::V7,
            8 => LanguageVersion::V8,
            9 => LanguageVersion::V9,
            10 => LanguageVersion::V10,
            11 => LanguageVersion::V11,
            12 => LanguageVersion::V12,
            13 => LanguageVersion::V13,
            14 => LanguageVersion::V14,
            15 => LanguageVersion::V15,
            16 => LanguageVersion::V16,
            17 => LanguageVersion::V17,
            18 => LanguageVersion::V18,
            19 => LanguageVersion::V19,
            20 => LanguageVersion::V20,
            _ => LanguageVersion::V21,
        }
    }
}

/// Installed SDK version, consulted only when the caller supplies no
/// explicit [`LanguageVersion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdkVersion {
    major: u32,
}

impl SdkVersion {
    pub fn new(major: u32) -> Self {
        SdkVersion { major }
    }

    pub fn language_version(self) -> LanguageVersion {
        LanguageVersion::from_major(self.major)
    }
}

/// A version-gated syntax or semantic capability. The single source of
/// truth for "is this construct allowed here".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Generics,
    Varargs,
    ForEach,
    StaticImports,
    Annotations,
    MultiCatch,
    TryWithResources,
    Diamond,
    ExtensionMethods,
    MethodReferences,
    ReceiverParameters,
    DiamondWithAnonymous,
    TextBlocks,
    Records,
    SealedClasses,
    PatternsInSwitch,
}

impl Feature {
    /// First version at which the feature is available. Monotonic by
    /// construction: sufficiency at V implies sufficiency at every later
    /// version.
    pub fn since(self) -> LanguageVersion {
        match self {
            Feature::Generics
            | Feature::Varargs
            | Feature::ForEach
            | Feature::StaticImports
            | Feature::Annotations => LanguageVersion::V5,
            Feature::MultiCatch | Feature::TryWithResources | Feature::Diamond => {
                LanguageVersion::V7
            }
            Feature::ExtensionMethods
            | Feature::MethodReferences
            | Feature::ReceiverParameters => LanguageVersion::V8,
            Feature::DiamondWithAnonymous => LanguageVersion::V9,
            Feature::TextBlocks => LanguageVersion::V15,
            Feature::Records => LanguageVersion::V16,
            Feature::SealedClasses => LanguageVersion::V17,
            Feature::PatternsInSwitch => LanguageVersion::V21,
        }
    }

    pub fn is_sufficient(self, version: LanguageVersion) -> bool {
        version >= self.since()
    }

    pub fn display(self) -> &'static str {
        match self {
            Feature::Generics => "generics",
            Feature::Varargs => "variable arity methods",
            Feature::ForEach => "for-each loops",
            Feature::StaticImports => "static imports",
            Feature::Annotations => "annotations",
            Feature::MultiCatch => "multi-catches",
            Feature::TryWithResources => "try-with-resources",
            Feature::Diamond => "diamond type arguments",
            Feature::ExtensionMethods => "extension methods",
            Feature::MethodReferences => "method references",
            Feature::ReceiverParameters => "receiver parameters",
            Feature::DiamondWithAnonymous => "diamond with anonymous classes",
            Feature::TextBlocks => "text blocks",
            Feature::Records => "records",
            Feature::SealedClasses => "sealed classes",
            Feature::PatternsInSwitch => "patterns in switch",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds() {
        assert!(Feature::Generics.is_sufficient(LanguageVersion::V5));
        assert!(!Feature::Diamond.is_sufficient(LanguageVersion::V6));
        assert!(Feature::Diamond.is_sufficient(LanguageVersion::V7));
        assert!(!Feature::Records.is_sufficient(LanguageVersion::V15));
        assert!(Feature::Records.is_sufficient(LanguageVersion::V16));
        assert!(Feature::PatternsInSwitch.is_sufficient(LanguageVersion::LATEST));
    }

    #[test]
    fn sdk_fallback_clamps() {
        assert_eq!(SdkVersion::new(4).language_version(), LanguageVersion::V5);
        assert_eq!(SdkVersion::new(17).language_version(), LanguageVersion::V17);
        assert_eq!(SdkVersion::new(99).language_version(), LanguageVersion::V21);
    }
}
