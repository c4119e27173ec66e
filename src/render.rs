//! Config-file rendering
//!
//! Turns the engine's logical [`ConfigDocument`] into literal file bytes
//! in a working directory. The engine decides the fields; this module
//! decides the syntax.

use anyhow::{Context, Result};
use deploykit::{ConfigDocument, XmlConfig};
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Render a config document into `dir`, returning the file path
pub fn write_config(document: &ConfigDocument, dir: &Path, stem: &str) -> Result<PathBuf> {
    let (content, extension) = match document {
        ConfigDocument::Ini { settings } => (render_ini(settings), "ini"),
        ConfigDocument::Xml(xml) => (render_xml(xml), "xml"),
    };

    let path = dir.join(format!("{stem}.{extension}"));
    std::fs::write(&path, content)
        .with_context(|| format!("could not write config file: {}", path.display()))?;
    Ok(path)
}

fn render_ini(settings: &[(String, String)]) -> String {
    let mut output = String::from("[Options]\n");
    for (key, value) in settings {
        writeln!(output, "{key}={value}").expect("writing to string cannot fail");
    }
    output
}

fn render_xml(xml: &XmlConfig) -> String {
    let mut output = String::new();
    writeln!(
        output,
        r#"<Configuration Product="{}">"#,
        escape(&xml.product_id)
    )
    .expect("writing to string cannot fail");

    let mut line = |s: String| {
        output.push_str("  ");
        output.push_str(&s);
        output.push('\n');
    };

    if xml.silent {
        line(r#"<Display Level="none" CompletionNotice="no" SuppressModal="yes" AcceptEula="yes" />"#.to_string());
    }
    if let Some(key) = &xml.license_key {
        line(format!(r#"<PIDKEY Value="{}" />"#, escape(key)));
    }
    if let Some(lcid) = xml.display_lcid {
        line(format!(r#"<Display.Language LCID="{lcid}" />"#));
    }
    if let Some(language) = &xml.add_language {
        line(format!(r#"<AddLanguage Id="{}" />"#, escape(language)));
    }
    for product in &xml.products {
        line(format!(
            r#"<OptionState Id="{}" State="local" Children="force" />"#,
            escape(product)
        ));
    }
    if let Some(company) = &xml.company_name {
        line(format!(r#"<COMPANYNAME Value="{}" />"#, escape(company)));
    }
    if let Some(user) = &xml.user_name {
        line(format!(r#"<USERNAME Value="{}" />"#, escape(user)));
    }
    if xml.auto_activate {
        line(r#"<Setting Id="AUTO_ACTIVATE" Value="1" />"#.to_string());
    }

    output.push_str("</Configuration>\n");
    output
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xml_config() -> XmlConfig {
        XmlConfig {
            product_id: "ProPlus".to_string(),
            products: vec!["Word".to_string(), "Excel".to_string()],
            license_key: Some("ABCDEFGHIJKLMNOPQRSTUVWXY".to_string()),
            display_lcid: Some(1033),
            add_language: None,
            auto_activate: true,
            company_name: Some("Contoso & Sons".to_string()),
            user_name: None,
            silent: true,
        }
    }

    #[test]
    fn test_render_xml() {
        let content = render_xml(&xml_config());
        assert!(content.starts_with(r#"<Configuration Product="ProPlus">"#));
        assert!(content.contains(r#"<PIDKEY Value="ABCDEFGHIJKLMNOPQRSTUVWXY" />"#));
        assert!(content.contains(r#"<OptionState Id="Word""#));
        assert!(content.contains("Contoso &amp; Sons"));
        assert!(content.contains(r#"<Setting Id="AUTO_ACTIVATE" Value="1" />"#));
        assert!(content.ends_with("</Configuration>\n"));
    }

    #[test]
    fn test_render_ini() {
        let settings = vec![
            ("DISPLAY".to_string(), "NONE".to_string()),
            ("PIDKEY".to_string(), "ABCDE".to_string()),
        ];
        let content = render_ini(&settings);
        assert!(content.starts_with("[Options]\n"));
        assert!(content.contains("DISPLAY=NONE\n"));
        assert!(content.contains("PIDKEY=ABCDE\n"));
    }

    #[test]
    fn test_write_config_picks_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &ConfigDocument::Xml(xml_config()),
            dir.path(),
            "install-config",
        )
        .unwrap();
        assert_eq!(path.extension().unwrap(), "xml");
        assert!(path.exists());

        let path = write_config(
            &ConfigDocument::Ini {
                settings: vec![("DISPLAY".to_string(), "NONE".to_string())],
            },
            dir.path(),
            "settings",
        )
        .unwrap();
        assert_eq!(path.extension().unwrap(), "ini");
    }
}
