use unicode_normalization::UnicodeNormalization;

/// Normalises a filename to NFKC before any pattern matching.
///
/// Names typed on different keyboards or stored by different filesystems
/// (macOS keeps decomposed forms, IMEs emit full-width ASCII) would otherwise
/// fail to match the conventions even though they look identical.
pub fn normalize(file_name: &str) -> String {
    file_name.nfkc().collect()
}
