//! Logical config-file content
//!
//! The engine produces the fields a setup config file must carry; turning
//! a [`ConfigDocument`] into literal bytes on disk is the renderer's job
//! (an external collaborator, outside this crate).

use crate::spec::{Ensure, InstallSpec};
use crate::variant::{ConfigKind, ResolvedVariant};
use serde::Serialize;

/// Structured fields of a modern (xml-style) setup configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct XmlConfig {
    /// Setup product identifier this configuration applies to
    pub product_id: String,
    /// Components selected for install; empty for uninstall configs
    pub products: Vec<String>,
    pub license_key: Option<String>,
    /// Display language (LCID) for the installed product
    pub display_lcid: Option<u32>,
    /// Additional display language to install (language pack configs)
    pub add_language: Option<String>,
    pub auto_activate: bool,
    pub company_name: Option<String>,
    pub user_name: Option<String>,
    /// Quiet, unattended run
    pub silent: bool,
}

/// Logical content of a setup config file, per generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigDocument {
    /// Flat key/value settings (2003)
    Ini { settings: Vec<(String, String)> },
    /// Structured markup configuration (2007 and later)
    Xml(XmlConfig),
}

impl ConfigDocument {
    pub fn kind(&self) -> ConfigKind {
        match self {
            Self::Ini { .. } => ConfigKind::Ini,
            Self::Xml(_) => ConfigKind::Xml,
        }
    }

    /// Content for the base install of a spec
    pub fn install(spec: &InstallSpec, variant: &ResolvedVariant) -> Self {
        debug_assert_eq!(spec.ensure, Ensure::Present);
        match variant.config_kind {
            ConfigKind::Ini => {
                let mut settings = vec![("DISPLAY".to_string(), "NONE".to_string())];
                if let Some(key) = &spec.license_key {
                    settings.push(("PIDKEY".to_string(), dehyphenate(key)));
                }
                if let Some(company) = &spec.overrides.company_name {
                    settings.push(("COMPANYNAME".to_string(), company.clone()));
                }
                if let Some(user) = &spec.overrides.user_name {
                    settings.push(("USERNAME".to_string(), user.clone()));
                }
                for product in &spec.products {
                    settings.push(("ADDLOCAL".to_string(), product.clone()));
                }
                Self::Ini { settings }
            }
            ConfigKind::Xml => Self::Xml(XmlConfig {
                product_id: variant.setup_id.clone(),
                products: spec.products.iter().cloned().collect(),
                license_key: spec.license_key.as_deref().map(dehyphenate),
                display_lcid: Some(variant.lcid),
                add_language: None,
                auto_activate: spec.auto_activate,
                company_name: spec.overrides.company_name.clone(),
                user_name: spec.overrides.user_name.clone(),
                silent: true,
            }),
        }
    }

    /// Content for a modern service-pack (`/modify`) run
    pub fn modify(variant: &ResolvedVariant) -> Self {
        Self::Xml(XmlConfig {
            product_id: variant.setup_id.clone(),
            silent: true,
            ..XmlConfig::default()
        })
    }

    /// Content for installing the language interface pack
    pub fn language_pack(variant: &ResolvedVariant) -> Self {
        Self::Xml(XmlConfig {
            product_id: variant.setup_id.clone(),
            add_language: Some(variant.language.clone()),
            display_lcid: Some(variant.lcid),
            silent: true,
            ..XmlConfig::default()
        })
    }

    /// Content for a modern setup `/uninstall` run
    pub fn uninstall(variant: &ResolvedVariant) -> Self {
        Self::Xml(XmlConfig {
            product_id: variant.setup_id.clone(),
            silent: true,
            ..XmlConfig::default()
        })
    }
}

/// Setup tools want the 25-character key without group separators
fn dehyphenate(key: &str) -> String {
    key.chars().filter(|c| *c != '-').collect()
}
