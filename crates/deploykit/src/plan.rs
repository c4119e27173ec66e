//! Operation planning
//!
//! Expands one validated spec plus its resolved variant into the ordered
//! list of idempotent operations that converge the machine. Pure: no
//! probing, no execution, no filesystem access.

use crate::catalog::Build;
use crate::configfile::ConfigDocument;
use crate::spec::{Ensure, InstallSpec};
use crate::variant::{ResolvedVariant, UninstallShape, UpdateShape};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of planned work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    InstallBase,
    ApplyServicePack,
    ApplyLanguagePack,
    Uninstall,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InstallBase => "install base package",
            Self::ApplyServicePack => "apply service pack",
            Self::ApplyLanguagePack => "apply language pack",
            Self::Uninstall => "uninstall",
        };
        f.write_str(name)
    }
}

/// Concrete command for the executor collaborator
///
/// When `config_flag` is set, the executor appends it plus the path of
/// the rendered config document before spawning.
#[derive(Debug, Clone, Serialize)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub config_flag: Option<String>,
}

impl CommandSpec {
    fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            config_flag: None,
        }
    }

    fn with_config_flag(mut self, flag: &str) -> Self {
        self.config_flag = Some(flag.to_string());
        self
    }

    /// Final argument list, given where the config document was rendered
    pub fn resolved_args(&self, config_path: Option<&Path>) -> Vec<String> {
        let mut args = self.args.clone();
        if let (Some(flag), Some(path)) = (&self.config_flag, config_path) {
            args.push(flag.clone());
            args.push(path.display().to_string());
        }
        args
    }
}

/// External condition that, if already true, means an operation is a no-op
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdempotencyProbe {
    /// Skip when the installed build at `key` is at or past `build`
    BuildAtLeast { key: String, build: Build },
    /// Skip when no build is recorded at `key` at all
    BuildAbsent { key: String },
    /// Skip when the marker path exists
    FileExists { path: PathBuf },
}

/// One unit of planned work, produced fresh per run and never persisted
#[derive(Debug, Clone, Serialize)]
pub struct Operation {
    pub kind: OperationKind,
    pub command: CommandSpec,
    /// Config content the executor renders next to the command, if any
    pub config: Option<ConfigDocument>,
    /// Kinds that must have completed before this operation runs
    pub prerequisites: Vec<OperationKind>,
    pub probe: IdempotencyProbe,
}

/// Expand a spec into its ordered operation sequence
///
/// Present: base install, then service pack (level > 0) and language
/// pack (non-default language), both gated only on the base install.
/// Absent: exactly one uninstall in the generation's removal shape.
pub fn plan(spec: &InstallSpec, variant: &ResolvedVariant) -> Vec<Operation> {
    match spec.ensure {
        Ensure::Present => plan_present(spec, variant),
        Ensure::Absent => vec![plan_uninstall(variant)],
    }
}

fn plan_present(spec: &InstallSpec, variant: &ResolvedVariant) -> Vec<Operation> {
    let mut operations = vec![Operation {
        kind: OperationKind::InstallBase,
        command: CommandSpec::new(&variant.setup_exe, Vec::new())
            .with_config_flag(install_config_flag(variant)),
        config: Some(ConfigDocument::install(spec, variant)),
        prerequisites: Vec::new(),
        probe: IdempotencyProbe::BuildAtLeast {
            key: variant.probe_key.clone(),
            build: variant.base_build.clone(),
        },
    }];

    if spec.service_pack > 0 {
        operations.push(service_pack_operation(spec, variant));
    }

    // Installing the pack for the media's own language is a no-op by
    // definition, not merely an idempotency skip.
    if !variant.is_default_language {
        operations.push(language_pack_operation(variant));
    }

    operations
}

fn service_pack_operation(spec: &InstallSpec, variant: &ResolvedVariant) -> Operation {
    let command = match variant.update_shape {
        // 2003 has no /modify shape; the service pack is an MSP patch
        UpdateShape::Msi => {
            let msp = variant
                .install_root
                .join(format!("SP{}.msp", spec.service_pack));
            CommandSpec::new(
                "msiexec",
                vec!["/p".to_string(), msp.display().to_string(), "/qb-".to_string()],
            )
        }
        UpdateShape::SetupTool => CommandSpec::new(
            &variant.setup_exe,
            vec!["/modify".to_string(), variant.setup_id.clone()],
        )
        .with_config_flag("/config"),
    };

    Operation {
        kind: OperationKind::ApplyServicePack,
        command,
        config: matches!(variant.update_shape, UpdateShape::SetupTool)
            .then(|| ConfigDocument::modify(variant)),
        prerequisites: vec![OperationKind::InstallBase],
        probe: IdempotencyProbe::BuildAtLeast {
            key: variant.probe_key.clone(),
            build: variant.target_build.clone(),
        },
    }
}

fn language_pack_operation(variant: &ResolvedVariant) -> Operation {
    let command = match variant.update_shape {
        UpdateShape::Msi => {
            let msi = variant
                .install_root
                .join("MUI")
                .join(variant.lcid.to_string())
                .join("MUI11.msi");
            CommandSpec::new(
                "msiexec",
                vec!["/i".to_string(), msi.display().to_string(), "/qb-".to_string()],
            )
        }
        UpdateShape::SetupTool => {
            let lip_setup = variant
                .install_root
                .join(format!("OMUI.{}", variant.language))
                .join("setup.exe");
            CommandSpec::new(lip_setup, Vec::new()).with_config_flag("/config")
        }
    };

    Operation {
        kind: OperationKind::ApplyLanguagePack,
        command,
        config: matches!(variant.update_shape, UpdateShape::SetupTool)
            .then(|| ConfigDocument::language_pack(variant)),
        // Sibling of the service pack: both gate only on the base install
        prerequisites: vec![OperationKind::InstallBase],
        probe: IdempotencyProbe::FileExists {
            path: variant.language_marker.clone(),
        },
    }
}

fn plan_uninstall(variant: &ResolvedVariant) -> Operation {
    let (command, config) = match variant.uninstall_shape {
        UninstallShape::MsiExec => (
            CommandSpec::new(
                "msiexec",
                vec![
                    "/x".to_string(),
                    variant.product_code.clone(),
                    "/qb-".to_string(),
                ],
            ),
            None,
        ),
        UninstallShape::SetupUninstall => (
            CommandSpec::new(
                &variant.setup_exe,
                vec!["/uninstall".to_string(), variant.setup_id.clone()],
            )
            .with_config_flag("/config"),
            Some(ConfigDocument::uninstall(variant)),
        ),
    };

    Operation {
        kind: OperationKind::Uninstall,
        command,
        config,
        prerequisites: Vec::new(),
        probe: IdempotencyProbe::BuildAbsent {
            key: variant.probe_key.clone(),
        },
    }
}

fn install_config_flag(variant: &ResolvedVariant) -> &'static str {
    match variant.config_kind {
        crate::variant::ConfigKind::Ini => "/settings",
        crate::variant::ConfigKind::Xml => "/config",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::spec::tests::raw_2010;
    use crate::spec::{RawSpec, validate};
    use crate::variant::resolve;

    fn plan_for(raw: &RawSpec) -> Vec<Operation> {
        let catalog = Catalog::builtin();
        let spec = validate(raw, &catalog).unwrap();
        let variant = resolve(&spec, &catalog).unwrap();
        plan(&spec, &variant)
    }

    fn kinds(operations: &[Operation]) -> Vec<OperationKind> {
        operations.iter().map(|op| op.kind).collect()
    }

    /// Every declared prerequisite occurs strictly earlier in the sequence
    fn assert_ordered(operations: &[Operation]) {
        for (i, op) in operations.iter().enumerate() {
            for prereq in &op.prerequisites {
                let position = operations.iter().position(|o| o.kind == *prereq);
                assert!(
                    position.is_some_and(|p| p < i),
                    "{:?} must precede {:?}",
                    prereq,
                    op.kind
                );
            }
        }
    }

    #[test]
    fn test_present_with_service_pack_default_language() {
        let operations = plan_for(&raw_2010());
        assert_eq!(
            kinds(&operations),
            vec![OperationKind::InstallBase, OperationKind::ApplyServicePack]
        );
        assert_ordered(&operations);
    }

    #[test]
    fn test_no_service_pack_operation_at_level_zero() {
        let mut raw = raw_2010();
        raw.service_pack = 0;
        let operations = plan_for(&raw);
        assert_eq!(kinds(&operations), vec![OperationKind::InstallBase]);
    }

    #[test]
    fn test_language_pack_emitted_for_non_default_language() {
        let mut raw = raw_2010();
        raw.language = Some("de-de".to_string());
        let operations = plan_for(&raw);
        assert_eq!(
            kinds(&operations),
            vec![
                OperationKind::InstallBase,
                OperationKind::ApplyServicePack,
                OperationKind::ApplyLanguagePack,
            ]
        );
        assert_ordered(&operations);

        // Sibling steps both gate on the base install only
        let lip = &operations[2];
        assert_eq!(lip.prerequisites, vec![OperationKind::InstallBase]);
    }

    #[test]
    fn test_absent_is_exactly_one_uninstall() {
        let mut raw = raw_2010();
        raw.ensure = "absent".to_string();
        raw.language = Some("de-de".to_string());
        raw.service_pack = 3;
        let operations = plan_for(&raw);
        assert_eq!(kinds(&operations), vec![OperationKind::Uninstall]);

        let op = &operations[0];
        assert_eq!(op.command.args[0], "/uninstall");
        assert_eq!(op.command.args[1], "ProPlus");
        assert_eq!(op.command.config_flag.as_deref(), Some("/config"));
    }

    #[test]
    fn test_2003_uninstall_is_direct_msi_removal() {
        let mut raw = raw_2010();
        raw.version = "2003".to_string();
        raw.edition = "Professional".to_string();
        raw.ensure = "absent".to_string();
        let operations = plan_for(&raw);
        let op = &operations[0];
        assert_eq!(op.command.program, PathBuf::from("msiexec"));
        assert_eq!(op.command.args[0], "/x");
        assert!(op.command.args[1].starts_with('{'));
        assert!(op.config.is_none());
    }

    #[test]
    fn test_service_pack_targets_catalog_build() {
        let operations = plan_for(&raw_2010());
        let IdempotencyProbe::BuildAtLeast { build, .. } = &operations[1].probe else {
            panic!("service pack probes the installed build");
        };
        assert_eq!(build.to_string(), "14.0.6029.1000");
    }

    #[test]
    fn test_install_command_references_config() {
        let operations = plan_for(&raw_2010());
        let install = &operations[0];
        assert!(install.config.is_some());
        let args = install
            .command
            .resolved_args(Some(Path::new(r"C:\temp\install.xml")));
        assert_eq!(args, vec!["/config", r"C:\temp\install.xml"]);
    }

    #[test]
    fn test_2003_service_pack_is_an_msp_patch() {
        let mut raw = raw_2010();
        raw.version = "2003".to_string();
        raw.edition = "Professional".to_string();
        raw.service_pack = 2;
        let operations = plan_for(&raw);
        let op = &operations[1];
        assert_eq!(op.kind, OperationKind::ApplyServicePack);
        assert_eq!(op.command.program, PathBuf::from("msiexec"));
        assert_eq!(op.command.args[0], "/p");
        assert!(op.command.args[1].ends_with("SP2.msp"));
        assert!(op.config.is_none());
    }

    #[test]
    fn test_2003_language_pack_is_a_direct_msi_install() {
        let mut raw = raw_2010();
        raw.version = "2003".to_string();
        raw.edition = "Professional".to_string();
        raw.language = Some("de-de".to_string());
        let operations = plan_for(&raw);
        let op = operations.last().unwrap();
        assert_eq!(op.kind, OperationKind::ApplyLanguagePack);
        assert_eq!(op.command.program, PathBuf::from("msiexec"));
        assert_eq!(op.command.args[0], "/i");
        assert!(op.config.is_none());
    }

    #[test]
    fn test_legacy_install_uses_settings_flag() {
        let mut raw = raw_2010();
        raw.version = "2003".to_string();
        raw.edition = "Professional".to_string();
        let operations = plan_for(&raw);
        assert_eq!(
            operations[0].command.config_flag.as_deref(),
            Some("/settings")
        );
    }
}
