pub mod enums;

pub use enums::EnumGenerator;

use crate::ast::{Decl, TranslationUnit};
use crate::error::CodegenError;
use crate::selector::SelectedDecl;
pub use crate::writer::GeneratedFile;

/// Produces output files for the declarations it accepts.
///
/// `generate` must not touch the filesystem: the pipeline writes the files of
/// a translation unit only once every generator of that unit succeeded.
pub trait Generator {
    fn name(&self) -> &str;

    /// Capability test, typically on the declaration kind.
    fn need_to_generate(&self, decl: &Decl) -> bool;

    fn generate(
        &self,
        unit: &SelectedDecl<'_>,
        tu: &TranslationUnit,
    ) -> Result<Vec<GeneratedFile>, CodegenError>;
}
