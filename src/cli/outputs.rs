//! Action outputs in the GitHub Actions `GITHUB_OUTPUT` format

use crate::error::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

const HEREDOC_DELIMITER: &str = "GIT_RELEASE_EOF";

/// Values exposed to later pipeline steps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutputs {
    pub base_tag: String,
    pub changes: Vec<String>,
    pub tasks: Vec<String>,
    pub pull_requests: Vec<String>,
    pub change_type: String,
    pub previous_tag: String,
    pub previous_version: String,
    pub new_tag: String,
    pub new_version: String,
    pub release_type: String,
    pub release_tag: String,
    pub release_name: String,
}

impl ActionOutputs {
    /// Output names and values; list values are JSON arrays.
    pub fn entries(&self) -> Result<Vec<(&'static str, String)>> {
        Ok(vec![
            ("base_tag", self.base_tag.clone()),
            ("changes", serde_json::to_string(&self.changes)?),
            ("tasks", serde_json::to_string(&self.tasks)?),
            ("pull_requests", serde_json::to_string(&self.pull_requests)?),
            ("change_type", self.change_type.clone()),
            ("previous_tag", self.previous_tag.clone()),
            ("previous_version", self.previous_version.clone()),
            ("new_tag", self.new_tag.clone()),
            ("new_version", self.new_version.clone()),
            ("release_type", self.release_type.clone()),
            ("release_tag", self.release_tag.clone()),
            ("release_name", self.release_name.clone()),
        ])
    }

    /// Write `key=value` lines, switching to heredoc syntax for multi-line values.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        for (key, value) in self.entries()? {
            if value.contains('\n') {
                let delimiter = heredoc_delimiter(&value);
                writeln!(writer, "{}<<{}", key, delimiter)?;
                writeln!(writer, "{}", value)?;
                writeln!(writer, "{}", delimiter)?;
            } else {
                writeln!(writer, "{}={}", key, value)?;
            }
        }
        Ok(())
    }

    /// Append to the `GITHUB_OUTPUT` file, or print to stdout without one.
    pub fn publish(&self, output_file: Option<&Path>) -> Result<()> {
        match output_file {
            Some(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                self.write_to(&mut file)
            }
            None => self.write_to(&mut std::io::stdout().lock()),
        }
    }
}

/// A delimiter that does not occur in `value`
fn heredoc_delimiter(value: &str) -> String {
    let mut delimiter = HEREDOC_DELIMITER.to_string();
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    delimiter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_are_json() {
        let outputs = ActionOutputs {
            changes: vec!["abc".to_string(), "abc".to_string()],
            pull_requests: vec!["12".to_string()],
            ..Default::default()
        };
        let entries = outputs.entries().unwrap();
        assert!(entries.contains(&("changes", r#"["abc","abc"]"#.to_string())));
        assert!(entries.contains(&("tasks", "[]".to_string())));
        assert!(entries.contains(&("pull_requests", r#"["12"]"#.to_string())));
    }

    #[test]
    fn test_write_key_values() {
        let outputs = ActionOutputs {
            new_tag: "v1.0.0".to_string(),
            release_name: "1.0.0".to_string(),
            ..Default::default()
        };
        let mut buffer = Vec::new();
        outputs.write_to(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("new_tag=v1.0.0\n"));
        assert!(text.contains("base_tag=\n"));
        assert_eq!(text.lines().count(), 12);
    }

    #[test]
    fn test_multiline_values_use_heredoc() {
        let outputs = ActionOutputs {
            release_name: "line one\nline two".to_string(),
            ..Default::default()
        };
        let mut buffer = Vec::new();
        outputs.write_to(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("release_name<<GIT_RELEASE_EOF\nline one\nline two\nGIT_RELEASE_EOF\n"));
    }

    #[test]
    fn test_heredoc_delimiter_avoids_collisions() {
        assert_eq!(heredoc_delimiter("plain"), "GIT_RELEASE_EOF");
        assert_eq!(heredoc_delimiter("x GIT_RELEASE_EOF y"), "GIT_RELEASE_EOF_");
    }

    #[test]
    fn test_publish_appends_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "existing=1\n").unwrap();

        ActionOutputs::default().publish(Some(&path)).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("existing=1\n"));
        assert!(text.contains("release_tag=\n"));
    }
}
