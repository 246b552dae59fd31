use serde_json::Value;
use std::{fs, path::PathBuf};

/// # Errors
///
/// Will return `Err` if the file is not readable or does not hold json
pub fn check_readable_file_and_json(file: &str) -> Result<Value, String> {
    let path = PathBuf::from(file);
    if !path.is_file() || fs::metadata(&path).is_err() {
        return Err(format!("The json file '{file}' is not readable."));
    }
    let contents =
        fs::read_to_string(&path).map_err(|e| format!("The json file '{file}': {e}"))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("The json file '{file}' is not valid json: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_rejected() {
        let err = check_readable_file_and_json("/definitely/not/here.json").unwrap_err();
        assert!(err.contains("is not readable"));
    }

    #[test]
    fn invalid_json_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = check_readable_file_and_json(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.contains("is not valid json"));
    }

    #[test]
    fn json_file_is_parsed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"holeNumber": 1}}"#).unwrap();
        let value = check_readable_file_and_json(file.path().to_str().unwrap()).unwrap();
        assert_eq!(value["holeNumber"], 1);
    }
}
