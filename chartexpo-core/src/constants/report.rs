//! Report Format Identifiers

/// Value of the `META;Format` line.
pub const FORMAT_ID: &str = "EXPO_CAPTEUR_V1";

/// Pipeline version tag written to `META;ScriptVersion`.
pub const SCRIPT_VERSION: &str = concat!("CHARTEXPO_", env!("CARGO_PKG_VERSION"));

/// Decimal separator used unless configured otherwise.
pub const DEFAULT_DECIMAL_SEPARATOR: char = ',';

/// Field delimiter. Never valid as a decimal separator.
pub const FIELD_DELIMITER: char = ';';

/// `FIELD_DELIMITER` as a string, for joining fields.
pub const FIELD_DELIMITER_STR: &str = ";";

/// Metadata line tag.
pub const TAG_META: &str = "META";
/// Measurement line tag.
pub const TAG_DATA: &str = "DATA";
/// Audit line tag.
pub const TAG_AUDIT: &str = "AUDIT";
/// Archived raw sample line tag.
pub const TAG_PIXELS: &str = "PIXELS";

/// DATA header, time column.
pub const DATA_HEADER_TIME: &str = "DateHeure";
/// DATA header, value column.
pub const DATA_HEADER_VALUE: &str = "Exposition_Vm";

/// Fallback reference used when naming an artifact with no usable reference.
pub const DEFAULT_ARTIFACT_STEM: &str = "Capteur";

/// Longest sanitized reference kept in an artifact name.
pub const MAX_ARTIFACT_STEM_LEN: usize = 120;

/// Extension of rendered reports.
pub const ARTIFACT_EXTENSION: &str = "csv";
