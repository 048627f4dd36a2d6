//! Wire-format constants for the database and text-file layouts.
//!
//! Every marker string and the wrap width live in a [`WireFormat`] value that
//! is passed explicitly into the store, importer, exporter and browser, so
//! the framing rules a component applies are always visible at the call site.

/// Markers and layout constants shared by the on-disk formats.
///
/// The defaults match the format the tool has always written; construct a
/// custom value only when working with foreign files that use different
/// markers.
#[derive(Debug, Clone)]
pub struct WireFormat {
    /// Line delimiting art blocks inside a text import/export file.
    pub separator: String,

    /// First line of a line-wrapped base64 database file.
    pub b64_header: String,

    /// Last line of a line-wrapped base64 database file.
    pub b64_footer: String,

    /// Column at which base64 bodies are wrapped.
    pub wrap_width: usize,
}

impl Default for WireFormat {
    fn default() -> Self {
        Self {
            separator: "----------------------------ASCII ART ITEM--------------------------"
                .to_string(),
            b64_header:
                "----------------------BEGIN OF ASCIIART OBJECT----------------------------------"
                    .to_string(),
            b64_footer:
                "-----------------------END OF ASCIIART OBJECT-----------------------------------"
                    .to_string(),
            wrap_width: 80,
        }
    }
}
