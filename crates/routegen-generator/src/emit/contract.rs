//! The marker contract artifact.

use routegen_core::GeneratorOptions;

use super::writer::SourceWriter;
use super::{AUTO_GENERATED_HEADER, global};

/// Source of the marker contract: one interface with one operation taking
/// the route builder.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn emit_contract(options: &GeneratorOptions) -> String {
    let mut writer = SourceWriter::new();
    for line in AUTO_GENERATED_HEADER {
        writer.line(line);
    }
    writer
        .blank()
        .line(&format!("namespace {};", options.contract_namespace()))
        .blank()
        .open(&format!("public interface {}", options.contract_name()))
        .line(&format!(
            "void {}({} endpoints);",
            options.contract_method(),
            global(options.route_builder_type())
        ))
        .close();
    writer.finish()
}
