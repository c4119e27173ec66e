//! Versioned product catalog
//!
//! The catalog is the lookup table the engine queries and never writes:
//! per product generation it maps edition names to setup product ids,
//! service-pack levels to build numbers, and carries the defaults a spec
//! may omit. A built-in table covers all supported generations; callers
//! may replace it wholesale with an external TOML file.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Supported product generations
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum ProductVersion {
    Office2003,
    Office2007,
    Office2010,
    Office2013,
}

impl ProductVersion {
    /// All supported generations, oldest first
    pub const ALL: [Self; 4] = [
        Self::Office2003,
        Self::Office2007,
        Self::Office2010,
        Self::Office2013,
    ];

    /// The year string used in specs and catalog keys
    pub fn year(self) -> &'static str {
        match self {
            Self::Office2003 => "2003",
            Self::Office2007 => "2007",
            Self::Office2010 => "2010",
            Self::Office2013 => "2013",
        }
    }
}

impl fmt::Display for ProductVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.year())
    }
}

impl FromStr for ProductVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2003" => Ok(Self::Office2003),
            "2007" => Ok(Self::Office2007),
            "2010" => Ok(Self::Office2010),
            "2013" => Ok(Self::Office2013),
            other => Err(format!("unsupported version '{other}'")),
        }
    }
}

impl TryFrom<String> for ProductVersion {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ProductVersion> for String {
    fn from(v: ProductVersion) -> Self {
        v.year().to_string()
    }
}

/// A dotted build number like `14.0.6029.1000`, ordered numerically per segment
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Build(Vec<u32>);

impl Build {
    pub fn segments(&self) -> &[u32] {
        &self.0
    }
}

impl fmt::Display for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl FromStr for Build {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Result<Vec<u32>, _> = s.split('.').map(str::parse).collect();
        match segments {
            Ok(segments) if !segments.is_empty() => Ok(Self(segments)),
            _ => Err(format!("invalid build number '{s}'")),
        }
    }
}

impl TryFrom<String> for Build {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Build> for String {
    fn from(b: Build) -> Self {
        b.to_string()
    }
}

/// Catalog data for one product generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VersionEntry {
    /// Numeric version tag (11 for 2003, 12 for 2007, ...)
    pub tag: u16,
    /// MSI product code used for direct removal
    pub default_product_code: String,
    /// Build number of the base install (service pack 0)
    pub base_build: Build,
    /// Edition name -> setup product identifier
    pub editions: BTreeMap<String, String>,
    /// Build numbers for service pack levels 1..=N, in level order
    pub service_packs: Vec<Build>,
    /// Language installed by the base media; installing its pack is a no-op
    pub default_language: String,
    /// Component set used when the spec supplies none
    pub default_products: BTreeSet<String>,
}

impl VersionEntry {
    /// Build number for a service pack level; level 0 is the base build
    pub fn build_for_level(&self, level: u8) -> Option<&Build> {
        if level == 0 {
            Some(&self.base_build)
        } else {
            self.service_packs.get(usize::from(level) - 1)
        }
    }

    /// Highest service pack level this generation has
    pub fn max_service_pack(&self) -> u8 {
        self.service_packs.len() as u8
    }
}

/// Immutable lookup table over product generations and languages
///
/// Supplied at startup and only ever read; no engine component mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub versions: BTreeMap<ProductVersion, VersionEntry>,
    /// Language code -> Windows locale identifier (LCID)
    pub languages: BTreeMap<String, u32>,
}

/// Default catalog shipped with the binary
const BUILTIN: &str = include_str!("../data/catalog.toml");

impl Catalog {
    /// The built-in table covering every supported generation
    pub fn builtin() -> Self {
        toml::from_str(BUILTIN).expect("built-in catalog is valid TOML")
    }

    /// Parse an externally supplied catalog
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn version(&self, version: ProductVersion) -> Option<&VersionEntry> {
        self.versions.get(&version)
    }

    /// Locale identifier for a language code, if known
    pub fn lcid(&self, language: &str) -> Option<u32> {
        self.languages.get(language).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_parses_and_displays() {
        let build: Build = "14.0.6029.1000".parse().unwrap();
        assert_eq!(build.segments(), &[14, 0, 6029, 1000]);
        assert_eq!(build.to_string(), "14.0.6029.1000");
    }

    #[test]
    fn test_build_orders_numerically() {
        let older: Build = "11.0.5614.0".parse().unwrap();
        let newer: Build = "11.0.8173.0".parse().unwrap();
        assert!(older < newer);

        // 14.0.10xx > 14.0.9xx even though "10" < "9" lexically
        let a: Build = "14.0.900.0".parse().unwrap();
        let b: Build = "14.0.1000.0".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_build_rejects_garbage() {
        assert!("".parse::<Build>().is_err());
        assert!("14.0.x".parse::<Build>().is_err());
    }

    #[test]
    fn test_version_round_trips() {
        for version in ProductVersion::ALL {
            assert_eq!(version.year().parse::<ProductVersion>(), Ok(version));
        }
        assert!("2016".parse::<ProductVersion>().is_err());
    }

    #[test]
    fn test_builtin_covers_all_generations() {
        let catalog = Catalog::builtin();
        for version in ProductVersion::ALL {
            let entry = catalog
                .version(version)
                .unwrap_or_else(|| panic!("missing {version}"));
            assert!(!entry.editions.is_empty());
            assert_eq!(entry.max_service_pack(), 3);
            assert!(catalog.lcid(&entry.default_language).is_some());
            assert!(!entry.default_products.is_empty());
        }
    }

    #[test]
    fn test_build_for_level() {
        let catalog = Catalog::builtin();
        let entry = catalog.version(ProductVersion::Office2010).unwrap();
        assert_eq!(entry.build_for_level(0), Some(&entry.base_build));
        assert!(entry.build_for_level(1).unwrap() > &entry.base_build);
        assert_eq!(entry.build_for_level(4), None);
    }
}
