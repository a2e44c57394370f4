use std::fs;
use std::path::{Path, PathBuf};

use alpha_tourney::domain::competition::CompetitionConfig;
use tempfile::TempDir;

/// A scratch directory holding a config file that points every store into it.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.path("archive")
    }

    pub fn competitions_file(&self) -> PathBuf {
        self.path("competitions.json")
    }

    /// Write `config.toml` with a `[storage]` section for this workspace and
    /// `extra` appended verbatim.
    pub fn write_config(&self, extra: &str) -> PathBuf {
        let contents = format!(
            "[storage]\narchive_dir = {:?}\ncompetitions_file = {:?}\n\n{extra}",
            display(&self.archive_dir()),
            display(&self.competitions_file()),
        );
        let path = self.path("config.toml");
        fs::write(&path, contents).expect("write config");
        path
    }

    pub fn write_competitions(&self, configs: &[CompetitionConfig]) {
        let json = serde_json::to_string_pretty(configs).expect("encode competitions");
        fs::write(self.competitions_file(), json).expect("write competitions");
    }

    pub fn write_archive(&self, key: &str, value: &serde_json::Value) {
        fs::create_dir_all(self.archive_dir()).expect("create archive dir");
        let json = serde_json::to_string_pretty(value).expect("encode archive");
        fs::write(self.archive_dir().join(format!("{key}.json")), json).expect("write archive");
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
