//! Table-name validation and quoting for DDL statements.
//!
//! Table names cannot be bound as parameters, so every name interpolated into
//! SQL goes through [`quote_identifier`].

use msclone_core::defaults::MAX_IDENTIFIER_LEN;
use msclone_core::{Error, Result};

/// Check that MySQL can hold `name` as a table name.
///
/// Any character is allowed except NUL; quoting takes care of the rest. The
/// name may not be empty, end in a space, or be longer than 64 characters.
///
/// # Examples
///
/// ```
/// use msclone_db::validate_table_name;
///
/// assert!(validate_table_name("wp_7_options").is_ok());
/// assert!(validate_table_name("wp_7_wc-orders").is_ok());
/// assert!(validate_table_name("").is_err());
/// assert!(validate_table_name(&"t".repeat(65)).is_err());
/// ```
pub fn validate_table_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput(
            "Table name cannot be empty".to_string(),
        ));
    }

    let len = name.chars().count();
    if len > MAX_IDENTIFIER_LEN {
        return Err(Error::InvalidInput(format!(
            "Table name '{}' exceeds {} character limit: {} characters",
            name, MAX_IDENTIFIER_LEN, len
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidInput(format!(
            "Table name '{}' contains a NUL character",
            name.escape_debug()
        )));
    }

    if name.ends_with(' ') {
        return Err(Error::InvalidInput(format!(
            "Table name '{}' ends with a space",
            name
        )));
    }

    Ok(())
}

/// Validate a table prefix.
///
/// Stricter than a table name: ASCII alphanumerics and `_` only, because the
/// prefix is also embedded in LIKE patterns and platform CLI table globs.
pub fn validate_table_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(Error::Config("Table prefix cannot be empty".to_string()));
    }
    if prefix.len() > MAX_IDENTIFIER_LEN {
        return Err(Error::Config(format!(
            "Table prefix exceeds {} character limit",
            MAX_IDENTIFIER_LEN
        )));
    }
    if let Some(ch) = prefix
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '_')
    {
        return Err(Error::Config(format!(
            "Table prefix '{}' contains invalid character: '{}'",
            prefix, ch
        )));
    }
    Ok(())
}

/// Validate and backtick-quote a table name. Embedded backticks are doubled.
pub fn quote_identifier(name: &str) -> Result<String> {
    validate_table_name(name)?;
    Ok(format!("`{}`", name.replace('`', "``")))
}

/// Escape LIKE wildcard characters (`%`, `_`, `\`) so input matches literally.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
