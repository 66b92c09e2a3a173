//! [`TestWorkspace`] builder for storyline test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use story_fs::{NormalizedPath, StoryPath};
use story_meta::{PathOverrides, Workspace};
use tempfile::TempDir;

/// A temporary base directory laid out with the default paths.
///
/// # Example
///
/// ```rust,no_run
/// use story_test_utils::TestWorkspace;
///
/// let ws = TestWorkspace::new()
///     .with_ledger("development_status:\n  epic-1: in-progress\n")
///     .with_story("1-a-foo", "# Foo\n\nStatus: done\n");
/// ws.assert_file_contains(ws.ledger_path(), "epic-1");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create a base directory with an empty story directory.
    pub fn new() -> Self {
        let ws = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(ws.story_dir()).unwrap();
        ws
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn story_dir(&self) -> PathBuf {
        self.root().join(StoryPath::StoryDir.as_str())
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.root().join(StoryPath::SprintStatus.as_str())
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.root().join(StoryPath::BackupDir.as_str())
    }

    /// Path of the story document `<id>.md`.
    pub fn story_path(&self, id: &str) -> PathBuf {
        self.story_dir().join(format!("{id}.md"))
    }

    /// Write `sprint-status.yaml`.
    pub fn with_ledger(self, content: &str) -> Self {
        fs::write(self.ledger_path(), content).unwrap();
        self
    }

    /// Write the story document `<id>.md`.
    pub fn with_story(self, id: &str, content: &str) -> Self {
        fs::write(self.story_path(id), content).unwrap();
        self
    }

    /// Write a story document declaring `Status: <status>`.
    pub fn with_status_story(self, id: &str, status: &str) -> Self {
        let content = story_document(id, Some(status));
        self.with_story(id, &content)
    }

    /// Write `.storyline/config.toml`.
    pub fn with_config(self, content: &str) -> Self {
        fs::create_dir_all(self.root().join(StoryPath::ConfigDir.as_str())).unwrap();
        fs::write(self.root().join(StoryPath::ConfigFile.as_str()), content).unwrap();
        self
    }

    /// Resolve the workspace the way the command line does.
    pub fn workspace(&self) -> Workspace {
        Workspace::load(NormalizedPath::new(self.root()), &PathOverrides::default()).unwrap()
    }

    pub fn read(&self, path: impl AsRef<Path>) -> String {
        let path = path.as_ref();
        fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    pub fn ledger(&self) -> String {
        self.read(self.ledger_path())
    }

    /// Files in the backup directory, sorted.
    pub fn backups(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(self.backup_dir()) else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = entries.map(|e| e.unwrap().path()).collect();
        paths.sort();
        paths
    }

    /// Assert that the file at `path` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: impl AsRef<Path>, content: &str) {
        let path = path.as_ref();
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path.display(),
            content,
            file_content
        );
    }
}

/// A small story document, with a status marker when `status` is given.
pub fn story_document(id: &str, status: Option<&str>) -> String {
    let mut doc = format!("# Story {id}\n\n");
    if let Some(status) = status {
        doc.push_str(&format!("Status: {status}\n\n"));
    }
    doc.push_str("## Story\n\nAs a user I want this story done.\n\n## Tasks\n\n- [ ] first\n");
    doc
}
