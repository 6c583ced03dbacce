//! Action-configuration export.
//!
//! Writes a whole [`ActionConfig`] as a self-describing text
//! artifact: a file-version stamp, the nested-literal data, and an
//! optional self-import bootstrap footer for scripting hosts. The
//! artifact is UTF-8, human-editable, and re-importable through
//! [`crate::import`].

use crate::float::repr_f32_from;
use crate::literal::quote_single;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;
use xrbind_domain::{
    ActionConfig, ActionMap, ActionMapItem, AmiBinding, FileVersion, PropertyGroup, PropertySlot,
    PropertyValue,
};

/// Oldest file version whose importer understands the
/// `actionconfig_version` keyword; the bootstrap footer gates on it
/// so old environments can still execute exported files.
const VERSION_STAMP_MIN: FileVersion = FileVersion::new(3, 0, 0);

/// Export error type.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A property value has a shape the format cannot represent.
    #[error("can't write property '{path}': unsupported value kind")]
    UnsupportedValue {
        /// Property path of the offending value.
        path: String,
    },
    /// IO operation failed; propagated to the caller unchanged.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Export options.
///
/// Both selection knobs affect only which maps appear and in what
/// order, never how a map or item is encoded.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ExportOptions {
    /// Host file-format version stamped into the artifact.
    pub file_version: FileVersion,
    /// Include every map (`true`) or only user-modified ones.
    pub all_actionmaps: bool,
    /// Order maps alphabetically by name instead of creation order.
    pub sort: bool,
    /// Append the self-import bootstrap footer.
    pub bootstrap: bool,
}

impl ExportOptions {
    /// Default options for the given host file version.
    #[must_use]
    pub const fn new(file_version: FileVersion) -> Self {
        Self {
            file_version,
            all_actionmaps: true,
            sort: false,
            bootstrap: true,
        }
    }
}

fn indent(levels: usize) -> String {
    " ".repeat(levels)
}

/// Encode an action map's scalar attributes as a mapping literal.
#[must_use]
pub fn am_args_as_data(am: &ActionMap) -> String {
    format!("{{\"profile\": {}}}", quote_single(&am.profile))
}

/// Encode an item's scalar attributes as a mapping literal.
///
/// Shared path attributes come first; type-conditional fields follow
/// the discriminant. Every value is a quoted string on the wire.
#[must_use]
pub fn ami_args_as_data(ami: &ActionMapItem) -> String {
    let mut s = vec![
        format!("\"type\": {}", quote_single(ami.binding.type_tag())),
        format!("\"user_path0\": {}", quote_single(&ami.user_path0)),
        format!("\"component_path0\": {}", quote_single(&ami.component_path0)),
        format!("\"user_path1\": {}", quote_single(&ami.user_path1)),
        format!("\"component_path1\": {}", quote_single(&ami.component_path1)),
    ];

    match &ami.binding {
        AmiBinding::Button {
            threshold,
            op,
            op_flag,
        }
        | AmiBinding::Axis {
            threshold,
            op,
            op_flag,
        } => {
            s.push(format!("\"threshold\": '{}'", repr_f32_from(*threshold)));
            s.push(format!("\"op\": {}", quote_single(op)));
            s.push(format!("\"op_flag\": {}", quote_single(op_flag)));
        }
        AmiBinding::Pose {
            is_controller,
            location,
            rotation,
        } => {
            s.push(format!(
                "\"pose_is_controller\": '{}'",
                if *is_controller { "True" } else { "False" }
            ));
            s.push(format!("\"pose_location\": '{}'", vec3_as_data(*location)));
            s.push(format!("\"pose_rotation\": '{}'", vec3_as_data(*rotation)));
        }
        AmiBinding::Haptic {
            duration,
            frequency,
            amplitude,
        } => {
            s.push(format!("\"haptic_duration\": '{}'", repr_f32_from(*duration)));
            s.push(format!("\"haptic_frequency\": '{}'", repr_f32_from(*frequency)));
            s.push(format!("\"haptic_amplitude\": '{}'", repr_f32_from(*amplitude)));
        }
        AmiBinding::Other(_) => {}
    }

    format!("{{{}}}", s.join(", "))
}

fn vec3_as_data(v: [f32; 3]) -> String {
    format!(
        "({}, {}, {})",
        repr_f32_from(v[0]),
        repr_f32_from(v[1]),
        repr_f32_from(v[2])
    )
}

fn property_value_repr(value: &PropertyValue, path: &str) -> Result<String, ExportError> {
    match value {
        PropertyValue::Str(text) => Ok(quote_single(text)),
        PropertyValue::Bool(true) => Ok("True".to_string()),
        PropertyValue::Bool(false) => Ok("False".to_string()),
        PropertyValue::Int(number) => Ok(number.to_string()),
        PropertyValue::Float(number) => Ok(repr_f32_from(*number)),
        PropertyValue::Set(items) => {
            if items.is_empty() {
                return Ok("set()".to_string());
            }
            let inner: Vec<String> = items.iter().map(|item| quote_single(item)).collect();
            Ok(format!("{{{}}}", inner.join(", ")))
        }
        PropertyValue::Seq(items) => {
            let mut inner = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    PropertyValue::Set(_) | PropertyValue::Seq(_) => {
                        return Err(ExportError::UnsupportedValue {
                            path: path.to_string(),
                        });
                    }
                    scalar => inner.push(property_value_repr(scalar, path)?),
                }
            }
            if inner.len() == 1 {
                Ok(format!("({},)", inner[0]))
            } else {
                Ok(format!("({})", inner.join(", ")))
            }
        }
    }
}

fn ami_properties_to_lines_recursive(
    level: usize,
    properties: &PropertyGroup,
    lines: &mut Vec<String>,
    path: &str,
) -> Result<(), ExportError> {
    for entry in properties.entries() {
        let pname = entry.name();
        match entry.slot() {
            PropertySlot::Group(group) => {
                let sub_path = format!("{path}.{pname}");
                let mut lines_test = Vec::new();
                ami_properties_to_lines_recursive(level + 2, group, &mut lines_test, &sub_path)?;
                if !lines_test.is_empty() {
                    lines.push("(".to_string());
                    lines.push(format!("\"{pname}\",\n"));
                    lines.push(format!("{}[", indent(level + 3)));
                    lines.extend(lines_test);
                    lines.push("],\n".to_string());
                    lines.push(format!("{}),\n{}", indent(level + 3), indent(level + 2)));
                }
            }
            PropertySlot::Value { value, is_set } => {
                if *is_set {
                    let sub_path = format!("{path}.{pname}");
                    let value = property_value_repr(value, &sub_path)?;
                    lines.push(format!(
                        "(\"{pname}\", {value}),\n{}",
                        indent(level + 2)
                    ));
                }
            }
        }
    }
    Ok(())
}

fn ami_properties_to_lines(
    level: usize,
    ami_props: &PropertyGroup,
    lines: &mut Vec<String>,
    path: &str,
) -> Result<(), ExportError> {
    let mut lines_test = vec![format!("\"op_properties\":\n{}[", indent(level + 1))];
    ami_properties_to_lines_recursive(level, ami_props, &mut lines_test, path)?;
    if lines_test.len() > 1 {
        lines_test.push("],\n".to_string());
        lines.append(&mut lines_test);
    }
    Ok(())
}

/// Properties block text for an item, or `None` when every property
/// is unset (the pruning that keeps exports minimal).
fn ami_attrs_or_none(level: usize, ami: &ActionMapItem) -> Result<Option<String>, ExportError> {
    let mut lines = Vec::new();
    ami_properties_to_lines(level + 1, &ami.op_properties, &mut lines, &ami.name)?;
    if lines.is_empty() {
        return Ok(None);
    }
    Ok(Some(lines.concat()))
}

/// Write a whole configuration to `writer` as a text artifact.
///
/// # Errors
///
/// Returns an error if a property value cannot be represented, or if
/// writing fails (the underlying `io::Error` is propagated
/// unchanged).
pub fn actionconfig_export_as_data<W: Write>(
    ac: &ActionConfig,
    writer: &mut W,
    options: &ExportOptions,
) -> Result<(), ExportError> {
    let mut export_actionmaps: Vec<&ActionMap> = ac
        .maps
        .iter()
        .filter(|am| options.all_actionmaps || am.user_modified)
        .collect();

    if options.sort {
        export_actionmaps.sort_by(|a, b| a.name.cmp(&b.name));
    }

    tracing::debug!(
        config = %ac.name,
        maps = export_actionmaps.len(),
        "exporting action configuration"
    );

    // The file version includes the patch component, which can be
    // bumped multiple times between releases.
    writeln!(writer, "actionconfig_version = {}", options.file_version)?;

    write!(writer, "actionconfig_data = \\\n[")?;

    for am in export_actionmaps {
        write!(writer, "(\"{}\",\n{}", am.name, indent(2))?;
        write!(writer, "{},\n", am_args_as_data(am))?;
        write!(writer, "{}{{\"items\":\n{}[", indent(2), indent(3))?;
        for ami in &am.items {
            let ami_args = ami_args_as_data(ami);
            let ami_data = ami_attrs_or_none(4, ami)?;
            write!(writer, "(\"{}\"", ami.name)?;
            match ami_data {
                None => {
                    write!(writer, ", {ami_args}, None),\n")?;
                }
                Some(data) => {
                    write!(writer, ",\n{}{ami_args},\n", indent(5))?;
                    write!(writer, "{}{{{}{}", indent(5), data, indent(6))?;
                    write!(writer, "}},\n{}),\n", indent(5))?;
                }
            }
            write!(writer, "{}", indent(4))?;
        }
        write!(writer, "],\n{}}},\n{}),\n{}", indent(3), indent(2), indent(1))?;
    }

    writeln!(writer, "]")?;

    if options.bootstrap {
        write_bootstrap_footer(writer)?;
    }

    Ok(())
}

/// The trailing snippet that re-imports the data it accompanies when
/// the artifact itself is executed by a scripting host. Importers
/// ignore everything from the `if` onward; the embedded version gate
/// keeps the stamp keyword away from environments too old to accept
/// it.
fn write_bootstrap_footer<W: Write>(writer: &mut W) -> io::Result<()> {
    write!(writer, "\n\n")?;
    writeln!(writer, "if __name__ == \"__main__\":")?;
    writeln!(writer, "    # Only add keywords that are supported.")?;
    writeln!(writer, "    from xrbind import app_version")?;
    writeln!(writer, "    keywords = {{}}")?;
    writeln!(writer, "    if app_version >= {VERSION_STAMP_MIN}:")?;
    writeln!(
        writer,
        "        keywords[\"actionconfig_version\"] = actionconfig_version"
    )?;
    writeln!(writer, "    import os")?;
    writeln!(
        writer,
        "    from xrbind.io import actionconfig_import_from_data"
    )?;
    writeln!(writer, "    actionconfig_import_from_data(")?;
    writeln!(
        writer,
        "        os.path.splitext(os.path.basename(__file__))[0],"
    )?;
    writeln!(writer, "        actionconfig_data,")?;
    writeln!(writer, "        **keywords,")?;
    writeln!(writer, "    )")?;
    Ok(())
}

/// Export to a file path, creating or truncating the file.
///
/// # Errors
///
/// Propagates open/write failures unchanged.
pub fn actionconfig_export_to_file(
    ac: &ActionConfig,
    filepath: &Path,
    options: &ExportOptions,
) -> Result<(), ExportError> {
    let file = std::fs::File::create(filepath)?;
    let mut writer = io::BufWriter::new(file);
    actionconfig_export_as_data(ac, &mut writer, options)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn haptic_item() -> ActionMapItem {
        let mut item = ActionMapItem::new("haptic");
        item.user_path0 = "/user/hand/left".to_string();
        item.component_path0 = "/output/haptic".to_string();
        item.binding = AmiBinding::Haptic {
            duration: 0.5,
            frequency: 60.0,
            amplitude: 1.0,
        };
        item
    }

    #[test]
    fn test_am_args() {
        let mut am = ActionMap::new("controllers");
        am.profile = "/interaction_profiles/oculus/touch_controller".to_string();
        assert_eq!(
            am_args_as_data(&am),
            "{\"profile\": '/interaction_profiles/oculus/touch_controller'}"
        );
    }

    #[test]
    fn test_ami_args_haptic() {
        let args = ami_args_as_data(&haptic_item());
        assert_eq!(
            args,
            "{\"type\": 'HAPTIC', \"user_path0\": '/user/hand/left', \
             \"component_path0\": '/output/haptic', \"user_path1\": '', \
             \"component_path1\": '', \"haptic_duration\": '0.5', \
             \"haptic_frequency\": '60', \"haptic_amplitude\": '1'}"
        );
    }

    #[test]
    fn test_ami_args_pose_vectors() {
        let mut item = ActionMapItem::new("grip");
        item.binding = AmiBinding::Pose {
            is_controller: true,
            location: [0.0, 0.1, -0.25],
            rotation: [0.0, 0.0, 0.0],
        };
        let args = ami_args_as_data(&item);
        assert!(args.contains("\"pose_is_controller\": 'True'"));
        assert!(args.contains("\"pose_location\": '(0, 0.1, -0.25)'"));
    }

    #[test]
    fn test_unset_properties_are_pruned() {
        let mut item = haptic_item();
        item.op_properties.define("value", PropertyValue::Float(0.0));
        let data = ami_attrs_or_none(4, &item).expect("encodable");
        assert_eq!(data, None);
    }

    #[test]
    fn test_set_property_emits_block() {
        let mut item = ActionMapItem::new("teleport");
        item.op_properties.define("value", PropertyValue::Float(0.0));
        item.op_properties
            .set("value", PropertyValue::Float(0.5))
            .expect("declared leaf");
        let data = ami_attrs_or_none(4, &item)
            .expect("encodable")
            .expect("non-empty");
        assert!(data.starts_with("\"op_properties\":"));
        assert!(data.contains("(\"value\", 0.5),"));
    }

    #[test]
    fn test_nested_seq_is_an_encoding_error() {
        let mut item = ActionMapItem::new("teleport");
        item.op_properties
            .set(
                "matrix",
                PropertyValue::Seq(vec![PropertyValue::Seq(vec![PropertyValue::Float(1.0)])]),
            )
            .expect("open group");
        let err = ami_attrs_or_none(4, &item).expect_err("unsupported");
        assert!(matches!(err, ExportError::UnsupportedValue { .. }));
    }

    #[test]
    fn test_export_selects_and_sorts() {
        let mut ac = ActionConfig::new("default_vr");
        ac.add_map("zebra").user_modified = true;
        ac.add_map("alpha");

        let mut options = ExportOptions::new(FileVersion::new(3, 0, 22));
        options.all_actionmaps = false;
        options.bootstrap = false;
        let mut out = Vec::new();
        actionconfig_export_as_data(&ac, &mut out, &options).expect("exports");
        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.contains("\"zebra\""));
        assert!(!text.contains("\"alpha\""));

        options.all_actionmaps = true;
        options.sort = true;
        let mut out = Vec::new();
        actionconfig_export_as_data(&ac, &mut out, &options).expect("exports");
        let text = String::from_utf8(out).expect("utf-8");
        let alpha = text.find("\"alpha\"").expect("alpha exported");
        let zebra = text.find("\"zebra\"").expect("zebra exported");
        assert!(alpha < zebra);
    }

    #[test]
    fn test_version_stamp_and_footer() {
        let ac = ActionConfig::new("default_vr");
        let options = ExportOptions::new(FileVersion::new(3, 0, 22));
        let mut out = Vec::new();
        actionconfig_export_as_data(&ac, &mut out, &options).expect("exports");
        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.starts_with("actionconfig_version = (3, 0, 22)\n"));
        assert!(text.contains("if __name__ == \"__main__\":"));
        assert!(text.contains("if app_version >= (3, 0, 0):"));

        let mut options = options;
        options.bootstrap = false;
        let mut out = Vec::new();
        actionconfig_export_as_data(&ac, &mut out, &options).expect("exports");
        let text = String::from_utf8(out).expect("utf-8");
        assert!(!text.contains("__main__"));
    }
}
