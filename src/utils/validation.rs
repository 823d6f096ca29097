use crate::utils::error::{EtlError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 報表檔名只能是單一檔名，不可帶目錄
pub fn validate_file_name(field_name: &str, name: &str) -> Result<()> {
    validate_path(field_name, name)?;

    if name.contains('/') || name.contains('\\') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "File name must not contain path separators".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_distinct(first_field: &str, first: &str, second_field: &str, second: &str) -> Result<()> {
    if first == second {
        return Err(EtlError::ConfigValidationError {
            field: second_field.to_string(),
            message: format!("must differ from '{}' (both are '{}')", first_field, first),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("report.output_path", "./output").is_ok());
        assert!(validate_path("report.output_path", "").is_err());
        assert!(validate_path("report.output_path", "out\0put").is_err());
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("report.detail_filename", "MCTS_articles.csv").is_ok());
        assert!(validate_file_name("report.detail_filename", "reports/MCTS_articles.csv").is_err());
        assert!(validate_file_name("report.detail_filename", "").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("report.keyword", "mcts").is_ok());
        assert!(validate_non_empty_string("report.keyword", "   ").is_err());
    }

    #[test]
    fn test_validate_distinct() {
        assert!(validate_distinct("a", "x.csv", "b", "y.csv").is_ok());
        assert!(validate_distinct("a", "x.csv", "b", "x.csv").is_err());
    }
}
