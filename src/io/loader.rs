use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use log::debug;

use super::Format;
use crate::error::{Error, Location, ReferenceKind, Result};
use crate::forge::ForgeConfig;
use crate::model::node::{Map, Node, Value};

/// Environment variable holding extra data directories.
pub const DATA_PATH_ENV: &str = "THERMO_FORGE_DATA";

/// A resolved top-level section, either in the caller's document or in a
/// document loaded from another file.
#[derive(Debug, Clone)]
pub enum Section<'a> {
    Local(&'a Node),
    External { doc: Arc<Map>, index: usize },
}

impl Section<'_> {
    pub fn node(&self) -> &Node {
        match self {
            Section::Local(node) => node,
            Section::External { doc, index } => doc.value_at(*index),
        }
    }
}

/// Finds, parses and caches input documents.
#[derive(Debug)]
pub struct DocumentLoader {
    data_dirs: Vec<PathBuf>,
    use_env_data_path: bool,
    cache: Mutex<HashMap<PathBuf, Arc<Map>>>,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new(&ForgeConfig::default())
    }
}

impl DocumentLoader {
    pub fn new(config: &ForgeConfig) -> Self {
        Self {
            data_dirs: config.data_dirs.clone(),
            use_env_data_path: config.use_env_data_path,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Directories searched for a relative file name, in order.
    fn search_dirs(&self, relative_to: Option<&Path>) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Some(dir) = relative_to.and_then(Path::parent) {
            dirs.push(dir.to_path_buf());
        }
        dirs.push(PathBuf::from("."));
        dirs.extend(self.data_dirs.iter().cloned());
        if self.use_env_data_path {
            if let Some(paths) = env::var_os(DATA_PATH_ENV) {
                dirs.extend(env::split_paths(&paths));
            }
        }
        dirs
    }

    /// Locates `name`, relative to the file `relative_to` when given.
    ///
    /// Legacy formats are rejected before the filesystem is touched.
    pub fn find_file(
        &self,
        candidate: &Path,
        relative_to: Option<&Path>,
        location: &Location,
    ) -> Result<PathBuf> {
        Format::ensure_supported(candidate)?;

        let found = if candidate.is_absolute() {
            candidate.is_file().then(|| candidate.to_path_buf())
        } else {
            self.search_dirs(relative_to)
                .into_iter()
                .map(|dir| dir.join(candidate))
                .find(|path| path.is_file())
        };

        let path = found.ok_or_else(|| {
            Error::not_found(
                ReferenceKind::File,
                candidate.display().to_string(),
                "the data search path",
                location,
            )
        })?;
        fs::canonicalize(&path).map_err(|source| Error::Io { path, source })
    }

    /// Parses the document at `path`, reusing a cached copy if present.
    pub fn load(&self, path: &Path) -> Result<Arc<Map>> {
        Format::ensure_supported(path)?;
        let canonical = fs::canonicalize(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(doc) = self.cached(&canonical) {
            return Ok(doc);
        }

        let text = fs::read_to_string(&canonical).map_err(|source| Error::Io {
            path: canonical.clone(),
            source,
        })?;
        let doc = Arc::new(Map::from_yaml_str(&text, Some(&canonical))?);
        debug!("parsed {}", canonical.display());

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(canonical).or_insert(doc)))
    }

    /// Locates and loads a top-level input file.
    pub fn load_file(&self, name: &Path) -> Result<Arc<Map>> {
        let path = self.find_file(name, None, &Location::default())?;
        self.load(&path)
    }

    /// Number of distinct documents parsed so far.
    pub fn cached_documents(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn cached(&self, canonical: &Path) -> Option<Arc<Map>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(canonical)
            .cloned()
    }

    /// Resolves a section reference against `root`.
    ///
    /// A reference containing `/` names `path/section` in another file;
    /// anything else is a top-level key of `root`. Sections whose value is a
    /// `path/section` string are followed until a real section is reached.
    pub fn section<'a>(
        &self,
        root: &'a Map,
        reference: &str,
        location: &Location,
    ) -> Result<Section<'a>> {
        let mut chain = Vec::new();
        let mut section = if reference.contains('/') {
            self.external(reference, root.file(), location, &mut chain)?
        } else {
            let index = root.position(reference).ok_or_else(|| {
                Error::not_found(
                    ReferenceKind::Section,
                    reference,
                    describe(root.file()),
                    location,
                )
            })?;
            chain.push(hop(root.file(), reference));
            Section::Local(root.value_at(index))
        };

        loop {
            let (target, at) = match section.node().value() {
                Value::String(target) if target.contains('/') => {
                    (target.clone(), section.node().location().clone())
                }
                _ => return Ok(section),
            };
            debug!("following section redirect '{}' at {}", target, at);
            section = self.external(&target, at.file(), &at, &mut chain)?;
        }
    }

    fn external<'a>(
        &self,
        reference: &str,
        relative_to: Option<&Path>,
        location: &Location,
        chain: &mut Vec<String>,
    ) -> Result<Section<'a>> {
        let Some((file, name)) = reference.rsplit_once('/') else {
            return Err(Error::structural(
                location,
                format!("'{}' is not a file/section reference", reference),
            ));
        };

        let path = self.find_file(Path::new(file), relative_to, location)?;
        let step = hop(Some(path.as_path()), name);
        if chain.contains(&step) {
            chain.push(step);
            return Err(Error::CircularReference {
                chain: std::mem::take(chain),
            });
        }
        chain.push(step);

        let doc = self.load(&path)?;
        let index = doc.position(name).ok_or_else(|| {
            Error::not_found(
                ReferenceKind::Section,
                name,
                path.display().to_string(),
                location,
            )
        })?;
        Ok(Section::External { doc, index })
    }
}

fn describe(file: Option<&Path>) -> String {
    match file {
        Some(path) => path.display().to_string(),
        None => "the input document".to_string(),
    }
}

fn hop(file: Option<&Path>, section: &str) -> String {
    let file = file
        .map(|p| fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf()))
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<input>".to_string());
    format!("{}#{}", file, section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, text).unwrap();
        path
    }

    fn loader() -> DocumentLoader {
        DocumentLoader::new(&ForgeConfig {
            use_env_data_path: false,
            ..ForgeConfig::default()
        })
    }

    #[test]
    fn files_resolve_relative_to_the_referencing_file() {
        let dir = TempDir::new().unwrap();
        let main = write(&dir, "main.yaml", "species: [A]\n");
        write(&dir, "data/more.yaml", "species:\n- name: A\n  composition: {H: 1}\n");

        let loader = loader();
        let root = loader.load(&main).unwrap();
        let section = loader
            .section(&root, "data/more.yaml/species", &Location::default())
            .unwrap();
        assert!(matches!(section, Section::External { .. }));
        assert!(section.node().is_map_list());
    }

    #[test]
    fn documents_are_parsed_once() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.yaml", "x: 1\n");
        let loader = loader();
        let first = loader.load(&path).unwrap();
        let second = loader.load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.cached_documents(), 1);
    }

    #[test]
    fn configured_data_dirs_are_searched() {
        let dir = TempDir::new().unwrap();
        write(&dir, "lib/thermo.yaml", "elements: []\n");
        let loader = DocumentLoader::new(&ForgeConfig {
            data_dirs: vec![dir.path().join("lib")],
            use_env_data_path: false,
            ..ForgeConfig::default()
        });
        assert!(loader.load_file(Path::new("thermo.yaml")).is_ok());

        let err = loader.load_file(Path::new("missing-file.yaml")).unwrap_err();
        assert!(matches!(
            err,
            Error::ReferenceNotFound { kind: ReferenceKind::File, .. }
        ));
    }

    #[test]
    fn missing_local_section_is_reported() {
        let root = Map::from_yaml_str("phases: []\n", None).unwrap();
        let err = loader()
            .section(&root, "species", &Location::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ReferenceNotFound { kind: ReferenceKind::Section, .. }
        ));
    }

    #[test]
    fn redirect_cycles_are_rejected() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.yaml", "species: b.yaml/species\n");
        write(&dir, "b.yaml", "species: a.yaml/species\n");

        let loader = loader();
        let root = loader.load(&a).unwrap();
        let err = loader
            .section(&root, "species", &Location::default())
            .unwrap_err();
        match err {
            Error::CircularReference { chain } => {
                assert_eq!(chain.len(), 3);
                assert_eq!(chain.first(), chain.last());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn redirects_are_followed() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.yaml", "species: nested/b.yaml/gas-species\n");
        write(&dir, "nested/b.yaml", "gas-species: c.yaml/all\n");
        write(&dir, "nested/c.yaml", "all:\n- name: H2\n  composition: {H: 2}\n");

        let loader = loader();
        let root = loader.load(&a).unwrap();
        let section = loader
            .section(&root, "species", &Location::default())
            .unwrap();
        assert_eq!(section.node().as_map_list().unwrap().len(), 1);
    }

    #[test]
    fn legacy_references_fail_before_io() {
        let root = Map::from_yaml_str("x: 1\n", None).unwrap();
        let err = loader()
            .section(&root, "does-not-exist.cti/species", &Location::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }
}
