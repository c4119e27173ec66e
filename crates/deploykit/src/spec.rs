//! Declarative install spec and its validator
//!
//! [`RawSpec`] is whatever the front-end collected: stringly typed, mostly
//! optional. [`validate`] checks every field against the catalog and the
//! fixed grammar and produces an internally consistent [`InstallSpec`], or
//! an aggregated [`ValidationError`] naming every violated constraint.

use crate::catalog::{Catalog, ProductVersion};
use crate::error::{ValidationError, Violation};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

/// Five hyphen-separated groups of five alphanumerics, case-insensitive
static LICENSE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9]{5}-){4}[A-Za-z0-9]{5}$").expect("license key pattern is valid")
});

/// Target architecture of the install media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    X86,
    X64,
}

impl Architecture {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X64 => "x64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x86" => Ok(Self::X86),
            "x64" => Ok(Self::X64),
            other => Err(format!("invalid architecture '{other}'")),
        }
    }
}

/// Desired end-state the engine converges the machine toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    Present,
    Absent,
}

impl FromStr for Ensure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(format!("invalid ensure state '{other}'")),
        }
    }
}

/// Optional per-run overrides that flow into the generated config content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Overrides {
    pub company_name: Option<String>,
    pub user_name: Option<String>,
    /// Ownership attributes for files the run writes (config files, logs)
    pub file_owner: Option<String>,
    pub file_group: Option<String>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        self.company_name.is_none()
            && self.user_name.is_none()
            && self.file_owner.is_none()
            && self.file_group.is_none()
    }
}

/// A raw request as collected by the front-end, before validation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawSpec {
    pub version: String,
    pub edition: String,
    #[serde(default)]
    pub service_pack: i64,
    pub license_key: Option<String>,
    #[serde(default = "default_arch")]
    pub arch: String,
    /// Empty means "use the catalog default set for this version"
    #[serde(default)]
    pub products: Vec<String>,
    /// Defaults to the catalog's base language for this version
    pub language: Option<String>,
    #[serde(default = "default_ensure")]
    pub ensure: String,
    pub deployment_root: String,
    /// Setup product identifier; defaults from the catalog editions map
    pub setup_id: Option<String>,
    #[serde(default)]
    pub auto_activate: bool,
    #[serde(flatten)]
    pub overrides: Overrides,
}

fn default_arch() -> String {
    "x86".to_string()
}

fn default_ensure() -> String {
    "present".to_string()
}

/// A validated, immutable install spec
///
/// Every catalog-referencing field is guaranteed to resolve: the version
/// is supported, the edition and language exist under it, and the setup
/// id has been filled in from the editions map when it was not supplied.
#[derive(Debug, Clone, Serialize)]
pub struct InstallSpec {
    pub version: ProductVersion,
    pub edition: String,
    pub service_pack: u8,
    pub license_key: Option<String>,
    pub arch: Architecture,
    pub products: BTreeSet<String>,
    pub language: String,
    pub ensure: Ensure,
    pub deployment_root: PathBuf,
    pub setup_id: String,
    pub auto_activate: bool,
    pub overrides: Overrides,
}

/// Validate a raw request against the catalog
///
/// Pure function over the input and a catalog snapshot. Collects every
/// violation rather than failing on the first.
pub fn validate(raw: &RawSpec, catalog: &Catalog) -> Result<InstallSpec, ValidationError> {
    let mut violations = Vec::new();

    let version = match raw.version.parse::<ProductVersion>() {
        Ok(v) => Some(v),
        Err(_) => {
            violations.push(Violation::InvalidVersion(raw.version.clone()));
            None
        }
    };
    let entry = version.and_then(|v| catalog.version(v));
    if version.is_some() && entry.is_none() {
        // Supported generation, but the supplied catalog has no table for it
        violations.push(Violation::InvalidVersion(raw.version.clone()));
    }

    // Edition and the setup-id default both come from the editions map
    let setup_id = match entry {
        Some(entry) => match entry.editions.get(&raw.edition) {
            Some(default_id) => Some(
                raw.setup_id
                    .clone()
                    .unwrap_or_else(|| default_id.clone()),
            ),
            None => {
                violations.push(Violation::InvalidEdition {
                    version: raw.version.clone(),
                    edition: raw.edition.clone(),
                });
                None
            }
        },
        None => None,
    };

    let service_pack = if (0..=3).contains(&raw.service_pack) {
        let level = raw.service_pack as u8;
        match entry {
            Some(entry) if level > entry.max_service_pack() => {
                violations.push(Violation::InvalidServicePack(raw.service_pack));
                None
            }
            _ => Some(level),
        }
    } else {
        violations.push(Violation::InvalidServicePack(raw.service_pack));
        None
    };

    let ensure = match raw.ensure.parse::<Ensure>() {
        Ok(e) => Some(e),
        Err(_) => {
            violations.push(Violation::InvalidEnsureState(raw.ensure.clone()));
            None
        }
    };

    // License key is only required, and only checked, when installing
    let license_key = match (ensure, &raw.license_key) {
        (Some(Ensure::Absent), key) => key.clone(),
        (_, Some(key)) if LICENSE_KEY.is_match(key) => Some(key.clone()),
        (_, _) => {
            violations.push(Violation::InvalidLicenseKey);
            None
        }
    };

    let arch = match raw.arch.parse::<Architecture>() {
        Ok(a) => Some(a),
        Err(_) => {
            violations.push(Violation::InvalidArchitecture(raw.arch.clone()));
            None
        }
    };

    let language = match (&raw.language, entry) {
        (Some(code), _) => {
            if catalog.lcid(code).is_some() {
                Some(code.clone())
            } else {
                violations.push(Violation::InvalidLanguage(code.clone()));
                None
            }
        }
        (None, Some(entry)) => Some(entry.default_language.clone()),
        // Version unknown and no explicit language: nothing to default from,
        // and the version violation is already recorded.
        (None, None) => None,
    };

    // Duplicates collapse; an empty set means the catalog default applies
    let mut products: BTreeSet<String> = raw.products.iter().cloned().collect();
    if products.is_empty()
        && let Some(entry) = entry
    {
        products = entry.default_products.clone();
    }

    if raw.deployment_root.trim().is_empty() {
        violations.push(Violation::MissingDeploymentRoot);
    }

    if !violations.is_empty() {
        return Err(ValidationError { violations });
    }

    // Violations are empty, so every gated field above was filled in
    let (Some(version), Some(setup_id), Some(service_pack), Some(ensure), Some(arch), Some(language)) =
        (version, setup_id, service_pack, ensure, arch, language)
    else {
        return Err(ValidationError { violations });
    };

    Ok(InstallSpec {
        version,
        edition: raw.edition.clone(),
        service_pack,
        license_key,
        arch,
        products,
        language,
        ensure,
        deployment_root: PathBuf::from(raw.deployment_root.trim()),
        setup_id,
        auto_activate: raw.auto_activate,
        overrides: raw.overrides.clone(),
    })
}
