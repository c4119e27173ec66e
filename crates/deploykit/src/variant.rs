//! Variant resolution
//!
//! Per-generation divergence (media layout, config format, uninstall
//! shape) is a table of strategy descriptors selected once per resolved
//! spec, never scattered conditionals. Everything downstream reads the
//! concrete values off the [`ResolvedVariant`].

use crate::catalog::{Build, Catalog, ProductVersion};
use crate::error::{Error, Result};
use crate::spec::{Architecture, InstallSpec};
use serde::Serialize;
use std::path::PathBuf;

/// Config file format a generation's setup tool understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigKind {
    /// Flat key/value settings file (2003)
    Ini,
    /// Structured markup configuration (2007 and later)
    Xml,
}

/// Shape of the removal command a generation requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UninstallShape {
    /// Direct MSI removal against the product code (2003)
    MsiExec,
    /// Setup tool `/uninstall` against the setup product id (2007 and later)
    SetupUninstall,
}

/// How post-base updates (service packs, language packs) are delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateShape {
    /// MSI patches and packages applied directly (2003)
    Msi,
    /// The generation's setup tool driven by a config file (2007 and later)
    SetupTool,
}

/// Strategy descriptor for one product generation
struct GenerationProfile {
    media_dir: &'static str,
    /// Only 2010 media embeds the architecture as a path segment
    arch_in_path: bool,
    setup_exe: &'static str,
    config_kind: ConfigKind,
    update_shape: UpdateShape,
    uninstall_shape: UninstallShape,
}

fn profile(version: ProductVersion) -> &'static GenerationProfile {
    match version {
        ProductVersion::Office2003 => &GenerationProfile {
            media_dir: "OFFICE11",
            arch_in_path: false,
            setup_exe: "SETUP.EXE",
            config_kind: ConfigKind::Ini,
            update_shape: UpdateShape::Msi,
            uninstall_shape: UninstallShape::MsiExec,
        },
        ProductVersion::Office2007 => &GenerationProfile {
            media_dir: "Office2007",
            arch_in_path: false,
            setup_exe: "setup.exe",
            config_kind: ConfigKind::Xml,
            update_shape: UpdateShape::SetupTool,
            uninstall_shape: UninstallShape::SetupUninstall,
        },
        ProductVersion::Office2010 => &GenerationProfile {
            media_dir: "Office2010",
            arch_in_path: true,
            setup_exe: "setup.exe",
            config_kind: ConfigKind::Xml,
            update_shape: UpdateShape::SetupTool,
            uninstall_shape: UninstallShape::SetupUninstall,
        },
        ProductVersion::Office2013 => &GenerationProfile {
            media_dir: "Office2013",
            arch_in_path: false,
            setup_exe: "setup.exe",
            config_kind: ConfigKind::Xml,
            update_shape: UpdateShape::SetupTool,
            uninstall_shape: UninstallShape::SetupUninstall,
        },
    }
}

/// Concrete, version-specific realization of one install spec
///
/// Computed once per spec, consumed by the planner, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedVariant {
    pub version: ProductVersion,
    pub arch: Architecture,
    /// Root of the install media for this generation (and arch, for 2010)
    pub install_root: PathBuf,
    /// Setup executable inside the install root
    pub setup_exe: PathBuf,
    /// Setup product identifier (from the spec / editions map)
    pub setup_id: String,
    /// MSI product code for direct removal
    pub product_code: String,
    /// Registry value holding the installed build number
    pub probe_key: String,
    /// Build of the base install
    pub base_build: Build,
    /// Build the requested service-pack level should reach
    pub target_build: Build,
    /// Locale identifier for the requested language
    pub lcid: u32,
    pub language: String,
    /// True when the requested language is the media's base language
    pub is_default_language: bool,
    /// Filesystem marker that exists once the language pack is installed
    pub language_marker: PathBuf,
    pub config_kind: ConfigKind,
    pub update_shape: UpdateShape,
    pub uninstall_shape: UninstallShape,
}

/// Derive the concrete variant for a validated spec
///
/// # Errors
///
/// `UnresolvedInstallRoot` when the deployment root is empty, and
/// `CatalogMiss` when a lookup validation vouched for is gone (a
/// different catalog snapshot than the one used to validate).
pub fn resolve(spec: &InstallSpec, catalog: &Catalog) -> Result<ResolvedVariant> {
    let entry = catalog
        .version(spec.version)
        .ok_or_else(|| Error::CatalogMiss(format!("version {}", spec.version)))?;
    let profile = profile(spec.version);

    if spec.deployment_root.as_os_str().is_empty() {
        return Err(Error::UnresolvedInstallRoot {
            root: String::new(),
        });
    }

    let mut install_root = spec.deployment_root.join(profile.media_dir);
    if profile.arch_in_path {
        install_root.push(spec.arch.as_str());
    }
    let setup_exe = install_root.join(profile.setup_exe);

    let target_build = entry
        .build_for_level(spec.service_pack)
        .ok_or_else(|| {
            Error::CatalogMiss(format!(
                "service pack {} for version {}",
                spec.service_pack, spec.version
            ))
        })?
        .clone();

    let lcid = catalog
        .lcid(&spec.language)
        .ok_or_else(|| Error::CatalogMiss(format!("language {}", spec.language)))?;

    let probe_key = format!(
        r"HKLM\SOFTWARE\Microsoft\Office\{}.0\Common\ProductVersion",
        entry.tag
    );
    let language_marker = PathBuf::from(format!(
        r"C:\Program Files\Microsoft Office\Office{}\{}",
        entry.tag, lcid
    ));

    Ok(ResolvedVariant {
        version: spec.version,
        arch: spec.arch,
        install_root,
        setup_exe,
        setup_id: spec.setup_id.clone(),
        product_code: entry.default_product_code.clone(),
        probe_key,
        base_build: entry.base_build.clone(),
        target_build,
        lcid,
        language: spec.language.clone(),
        is_default_language: spec.language == entry.default_language,
        language_marker,
        config_kind: profile.config_kind,
        update_shape: profile.update_shape,
        uninstall_shape: profile.uninstall_shape,
    })
}
