use std::fmt;

/// Identifies an aggregate text file: `<language>/<stem>.txt`, where the stem is
/// `<owner>_<repo>` for files written by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AggregateKey {
    pub language: String,
    pub stem: String,
}

impl AggregateKey {
    pub fn new(language: &str, stem: impl Into<String>) -> Self {
        Self {
            language: language.to_string(),
            stem: stem.into(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.txt", self.stem)
    }

    pub fn classification_file_name(&self) -> String {
        format!("{}.json", self.stem)
    }
}

impl fmt::Display for AggregateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.language, self.file_name())
    }
}

/// Concatenation of the matched root files of one repository, each framed by
/// start/end marker lines naming the source file.
#[derive(Debug, Clone, Default)]
pub struct AggregateText {
    text: String,
    files: Vec<String>,
}

impl AggregateText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_file(&mut self, file_name: &str, content: &str) {
        self.text.push_str(&start_marker(file_name));
        self.text.push_str(content);
        self.text.push_str(&end_marker(file_name));
        self.files.push(file_name.to_string());
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

pub fn start_marker(file_name: &str) -> String {
    format!("\n--- Start file: {} ---\n", file_name)
}

pub fn end_marker(file_name: &str) -> String {
    format!("\n--- End file: {} ---\n", file_name)
}
