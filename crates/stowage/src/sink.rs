//! Directory sink for fetched artifacts.

use std::path::{Component, Path, PathBuf};
use stowage_common::remote::ArtifactLoader;
use stowage_core::{DEFAULT_KEY_SUFFIX, MaterializedArtifact, to_object_key};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Refusing to write {name} outside the output directory")]
    Escape { name: String },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes each artifact to `<root>/<object key>`, creating parent directories.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
    key_suffix: String,
}

impl DirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            key_suffix: DEFAULT_KEY_SUFFIX.to_string(),
        }
    }

    pub fn with_key_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.key_suffix = suffix.into();
        self
    }

    /// Destination path for the artifact called `name`.
    pub fn target_path(&self, name: &str) -> Result<PathBuf, SinkError> {
        let key = to_object_key(name, &self.key_suffix);
        let relative = Path::new(&key);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(SinkError::Escape {
                name: name.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl ArtifactLoader for DirectoryLoader {
    type Output = PathBuf;
    type Error = SinkError;

    fn load(&self, artifact: MaterializedArtifact) -> Result<PathBuf, SinkError> {
        let path = self.target_path(artifact.name())?;
        let io_err = |source| SinkError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&path, artifact.bytes()).map_err(io_err)?;

        info!("Wrote {} ({} bytes) to {}", artifact.name(), artifact.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_core::CodeOrigin;

    #[test]
    fn test_writes_at_object_key() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DirectoryLoader::new(dir.path());

        let artifact = MaterializedArtifact::new("com.example.Foo", vec![0xca, 0xfe], CodeOrigin::unknown());
        let path = loader.load(artifact).unwrap();

        assert_eq!(path, dir.path().join("com/example/Foo.class"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![0xca, 0xfe]);
    }

    #[test]
    fn test_custom_suffix() {
        let loader = DirectoryLoader::new("out").with_key_suffix(".wasm");
        assert_eq!(
            loader.target_path("app.Main").unwrap(),
            PathBuf::from("out").join("app/Main.wasm")
        );
    }

    #[test]
    fn test_rejects_escaping_keys() {
        let loader = DirectoryLoader::new("out").with_key_suffix("/../../etc/passwd");
        assert!(matches!(
            loader.target_path("a"),
            Err(SinkError::Escape { .. })
        ));
    }
}
