//! Font provisioning for the document emitter.
//!
//! The report is set entirely in Helvetica, which every PDF viewer ships as
//! a built-in, so no font assets need to be bundled or discovered on disk.

use printpdf::{BuiltinFont, IndirectFontRef, PdfDocumentReference};

use crate::layout::FontKind;
use crate::render::RenderError;

/// The font references registered with one output document.
pub(crate) struct FontSet {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl FontSet {
    /// Returns the font reference for the requested weight.
    pub(crate) fn for_kind(&self, kind: FontKind) -> &IndirectFontRef {
        match kind {
            FontKind::Regular => &self.regular,
            FontKind::Bold => &self.bold,
        }
    }
}

/// Registers the built-in Helvetica family with `doc`.
pub(crate) fn install_builtin_fonts(doc: &PdfDocumentReference) -> Result<FontSet, RenderError> {
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| RenderError::Pdf(err.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| RenderError::Pdf(err.to_string()))?;
    Ok(FontSet { regular, bold })
}
