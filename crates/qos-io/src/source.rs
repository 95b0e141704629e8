use std::io;
use std::path::PathBuf;

use qos_core::{InputFile, Source, StoreError};

/// The default discovery pattern, matching `qos_dsr_<N>node_speed<V>_<M>client.txt`.
pub const DEFAULT_PATTERN: &str = "qos_dsr_*node_speed*_*client.txt";

/// A [`Source`] reading result files from a directory.
#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct DirSource {
    /// The directory holding the result files. It is not searched recursively.
    #[builder(setter(into))]
    pub input_dir: PathBuf,
    /// A glob pattern for file names, relative to `input_dir`.
    #[builder(default = DEFAULT_PATTERN.into(), setter(into))]
    pub pattern: String,
}

impl Source for DirSource {
    fn discover(&self) -> Result<Vec<InputFile>, StoreError> {
        if !self.input_dir.is_dir() {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("input directory {} does not exist", self.input_dir.display()),
            )));
        }
        let dir = glob::Pattern::escape(&self.input_dir.to_string_lossy());
        let pattern = format!("{dir}/{}", self.pattern);
        let mut paths = glob::glob(&pattern)
            .map_err(|e| StoreError::Other(anyhow::anyhow!("bad pattern `{pattern}`: {e}")))?
            .filter_map(|entry| match entry {
                Ok(path) if path.is_file() => Some(path),
                Ok(_) => None,
                Err(e) => {
                    log::warn!("Unreadable entry {}: {}", e.path().display(), e.error());
                    None
                }
            })
            .collect::<Vec<_>>();
        paths.sort();
        Ok(paths.into_iter().map(InputFile::new).collect())
    }

    fn read(&self, file: &InputFile) -> Result<String, StoreError> {
        Ok(std::fs::read_to_string(file.path())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_matching_files_in_path_order() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        for name in [
            "qos_dsr_20node_speed5_10client.txt",
            "qos_dsr_20node_speed10_10client.txt",
            "qos_dsr_20node_speed0_10client.txt",
            "qos_dsr_20node_speed5_10client_flows.csv",
            "notes.txt",
        ] {
            std::fs::write(dir.path().join(name), "")?;
        }
        std::fs::create_dir(dir.path().join("qos_dsr_1node_speed1_1client.txt"))?;

        let source = DirSource::builder().input_dir(dir.path()).build();
        let names = source
            .discover()?
            .iter()
            .map(InputFile::name)
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            [
                "qos_dsr_20node_speed0_10client.txt",
                "qos_dsr_20node_speed10_10client.txt",
                "qos_dsr_20node_speed5_10client.txt",
            ]
        );
        Ok(())
    }

    #[test]
    fn missing_directory_is_an_error() {
        let source = DirSource::builder()
            .input_dir("/nonexistent/qos/results")
            .build();
        assert!(matches!(source.discover(), Err(StoreError::Io(_))));
    }
}
