use std::path::Path;

/// Label order used when no label file ships with the model
const FALLBACK_LABELS: [&str; 5] = ["electricity", "garbage", "other", "road", "water"];

/// Class labels in model output order
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            labels: FALLBACK_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl LabelSet {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Load a JSON array of labels, falling back to the built-in order when the
    /// file is missing, unreadable or empty
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "Label file not readable ({}), using built-in labels",
                    e
                );
                return Self::default();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(labels) if !labels.is_empty() => {
                tracing::info!(count = labels.len(), path = %path.display(), "loaded class labels");
                Self::new(labels)
            }
            Ok(_) => {
                tracing::warn!(path = %path.display(), "Label file is empty, using built-in labels");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "Label file is not a JSON array of strings ({}), using built-in labels",
                    e
                );
                Self::default()
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", uuid::Uuid::new_v4(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_missing_file_uses_fallback() {
        let labels = LabelSet::load(Path::new("/nonexistent/class_labels.json"));
        assert_eq!(labels, LabelSet::default());
        assert_eq!(labels.get(0), Some("electricity"));
        assert_eq!(labels.get(4), Some("water"));
        assert_eq!(labels.get(5), None);
    }

    #[test]
    fn test_loads_labels_in_order() {
        let path = temp_file("labels.json", r#"["road", "water", "other"]"#);
        let labels = LabelSet::load(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(labels.get(0), Some("road"));
        assert_eq!(labels.get(2), Some("other"));
        assert_eq!(labels.get(3), None);
    }

    #[test]
    fn test_malformed_or_empty_file_uses_fallback() {
        let malformed = temp_file("bad.json", r#"{"0": "road"}"#);
        let empty = temp_file("empty.json", "[]");

        assert_eq!(LabelSet::load(&malformed), LabelSet::default());
        assert_eq!(LabelSet::load(&empty), LabelSet::default());

        std::fs::remove_file(&malformed).ok();
        std::fs::remove_file(&empty).ok();
    }
}
