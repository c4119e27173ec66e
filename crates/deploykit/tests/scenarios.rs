//! End-to-end scenarios through validate -> resolve -> plan -> guard

use deploykit::{
    Build, Catalog, ConfigDocument, ConfigKind, Decision, IdempotencyProbe, OperationKind,
    Overrides, RawSpec, StateProbe, UninstallShape, plan, resolve, should_apply, validate,
};
use std::path::Path;

fn office_2010_request() -> RawSpec {
    RawSpec {
        version: "2010".to_string(),
        edition: "Professional Pro".to_string(),
        service_pack: 1,
        license_key: Some("ABCDE-FGHIJ-KLMNO-PQRST-UVWXY".to_string()),
        arch: "x86".to_string(),
        products: vec!["Word".to_string(), "Excel".to_string()],
        language: Some("en-us".to_string()),
        ensure: "present".to_string(),
        deployment_root: r"\\deploy\media".to_string(),
        setup_id: None,
        auto_activate: false,
        overrides: Overrides::default(),
    }
}

struct InstalledAt(Option<Build>);

impl StateProbe for InstalledAt {
    fn installed_build(&self, _key: &str) -> deploykit::Result<Option<Build>> {
        Ok(self.0.clone())
    }

    fn file_exists(&self, _path: &Path) -> deploykit::Result<bool> {
        Ok(false)
    }
}

#[test]
fn office_2010_present_plans_install_then_service_pack() {
    let catalog = Catalog::builtin();
    let spec = validate(&office_2010_request(), &catalog).expect("request is valid");
    let variant = resolve(&spec, &catalog).expect("variant resolves");

    // Modern generation: xml config, architecture embedded in the media path
    assert_eq!(variant.config_kind, ConfigKind::Xml);
    assert!(variant.install_root.to_string_lossy().contains("x86"));

    let operations = plan(&spec, &variant);
    let kinds: Vec<_> = operations.iter().map(|op| op.kind).collect();
    // en-us is the catalog default language, so no language pack step
    assert_eq!(
        kinds,
        vec![OperationKind::InstallBase, OperationKind::ApplyServicePack]
    );
}

#[test]
fn office_2010_absent_plans_modern_uninstall_only() {
    let catalog = Catalog::builtin();
    let mut raw = office_2010_request();
    raw.ensure = "absent".to_string();
    let spec = validate(&raw, &catalog).unwrap();
    let variant = resolve(&spec, &catalog).unwrap();
    assert_eq!(variant.uninstall_shape, UninstallShape::SetupUninstall);

    let operations = plan(&spec, &variant);
    assert_eq!(operations.len(), 1);
    let op = &operations[0];
    assert_eq!(op.kind, OperationKind::Uninstall);
    assert_eq!(op.command.args, vec!["/uninstall", "ProPlus"]);
    assert!(matches!(op.config, Some(ConfigDocument::Xml(_))));
}

#[test]
fn office_2003_absent_uses_direct_msi_removal() {
    let catalog = Catalog::builtin();
    let mut raw = office_2010_request();
    raw.version = "2003".to_string();
    raw.edition = "Professional Enterprise".to_string();
    raw.ensure = "absent".to_string();
    let spec = validate(&raw, &catalog).unwrap();
    let variant = resolve(&spec, &catalog).unwrap();
    assert_eq!(variant.uninstall_shape, UninstallShape::MsiExec);

    let operations = plan(&spec, &variant);
    assert_eq!(operations.len(), 1);
    let op = &operations[0];
    assert_eq!(op.command.program, Path::new("msiexec"));
    assert_eq!(op.command.args[0], "/x");
    assert!(op.command.args[1].contains('-'), "msi product code is a guid");
}

#[test]
fn machine_already_at_service_pack_skips_the_whole_plan() {
    let catalog = Catalog::builtin();
    let spec = validate(&office_2010_request(), &catalog).unwrap();
    let variant = resolve(&spec, &catalog).unwrap();
    let operations = plan(&spec, &variant);

    let probe = InstalledAt(Some("14.0.7015.1000".parse().unwrap()));
    for op in &operations {
        assert!(
            should_apply(op, &probe).is_skip(),
            "{:?} should be satisfied",
            op.kind
        );
    }
}

#[test]
fn absent_machine_skips_uninstall() {
    let catalog = Catalog::builtin();
    let mut raw = office_2010_request();
    raw.ensure = "absent".to_string();
    let spec = validate(&raw, &catalog).unwrap();
    let variant = resolve(&spec, &catalog).unwrap();
    let operations = plan(&spec, &variant);

    let probe = InstalledAt(None);
    assert_eq!(
        should_apply(&operations[0], &probe),
        Decision::Skip {
            reason: "no installed build recorded, nothing to remove".to_string()
        }
    );
}

#[test]
fn every_probe_references_the_resolved_key() {
    let catalog = Catalog::builtin();
    let mut raw = office_2010_request();
    raw.language = Some("ja-jp".to_string());
    let spec = validate(&raw, &catalog).unwrap();
    let variant = resolve(&spec, &catalog).unwrap();

    for op in plan(&spec, &variant) {
        match op.probe {
            IdempotencyProbe::BuildAtLeast { ref key, .. }
            | IdempotencyProbe::BuildAbsent { ref key } => {
                assert_eq!(*key, variant.probe_key);
            }
            IdempotencyProbe::FileExists { ref path } => {
                assert_eq!(*path, variant.language_marker);
            }
        }
    }
}
