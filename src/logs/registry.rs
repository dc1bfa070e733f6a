use crate::config::ServiceConfig;
use crate::error::{LogtailError, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::{Component, Path, PathBuf};

/// Fixed mapping from service identifiers to log files in one directory
///
/// Built once at startup and never mutated, so it can be shared across
/// request handlers without locking.
#[derive(Debug, Clone)]
pub struct LogRegistry {
    /// Directory where all log files live
    log_dir: PathBuf,
    /// Lowercased identifier -> log file path
    entries: BTreeMap<String, PathBuf>,
}

impl LogRegistry {
    /// Create the registry, making sure the log directory exists and is usable
    ///
    /// # Arguments
    /// * `log_dir` - Directory where the log files live
    /// * `services` - Pairs of identifier and bare file name
    ///
    /// # Returns
    /// * `Ok(LogRegistry)` - Directory is ready and the table is valid
    /// * `Err(LogtailError)` - Directory unusable or table invalid
    pub fn initialize<P, I, S, F>(log_dir: P, services: I) -> Result<Self>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = (S, F)>,
        S: AsRef<str>,
        F: AsRef<str>,
    {
        let log_dir = log_dir.as_ref().to_path_buf();

        let services: Vec<(S, F)> = services.into_iter().collect();
        validate_services(
            services
                .iter()
                .map(|(id, file)| (AsRef::<str>::as_ref(id), AsRef::<str>::as_ref(file))),
        )?;

        let entries: BTreeMap<String, PathBuf> = services
            .iter()
            .map(|(id, file)| {
                let id: &str = id.as_ref();
                let file: &str = file.as_ref();
                (id.trim().to_lowercase(), log_dir.join(file))
            })
            .collect();

        ensure_log_dir(&log_dir)?;

        tracing::info!(
            "Log registry ready at {} with {} services",
            log_dir.display(),
            entries.len()
        );

        Ok(Self { log_dir, entries })
    }

    /// Create the registry from a loaded configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::initialize(&config.log_dir, &config.services)
    }

    /// All known identifiers in sorted order
    pub fn list_identifiers(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Resolve an identifier (case-insensitive) to its log file path
    ///
    /// Only identifiers in the fixed table are accepted; the request text is
    /// never joined onto the log directory. The returned file may not exist.
    pub fn resolve(&self, identifier: &str) -> Result<&Path> {
        self.entries
            .get(&identifier.to_lowercase())
            .map(PathBuf::as_path)
            .ok_or_else(|| LogtailError::UnknownService {
                requested: identifier.to_string(),
                available: self.list_identifiers(),
            })
    }

    /// Get the log directory path
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Iterate over identifier and path pairs in sorted order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(id, path)| (id.as_str(), path.as_path()))
    }

    /// Get the number of registered services
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Check a service table: non-empty identifiers that are unique ignoring case,
/// and distinct plain file names that stay inside the log directory
pub(crate) fn validate_services<'a, I>(services: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut identifiers = HashSet::new();
    let mut file_names = HashSet::new();

    for (identifier, file_name) in services {
        let normalized = identifier.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(LogtailError::ConfigValidationError(
                "service identifier cannot be empty".to_string(),
            ));
        }

        if !identifiers.insert(normalized) {
            return Err(LogtailError::ConfigValidationError(format!(
                "duplicate service identifier (case-insensitive): {}",
                identifier
            )));
        }

        if !is_bare_file_name(file_name) {
            return Err(LogtailError::ConfigValidationError(format!(
                "log file for '{}' must be a plain file name, got '{}'",
                identifier, file_name
            )));
        }

        if !file_names.insert(file_name) {
            return Err(LogtailError::ConfigValidationError(format!(
                "log file '{}' is used by more than one service",
                file_name
            )));
        }
    }

    Ok(())
}

/// A file name with exactly one normal component (no separators, no `..`)
fn is_bare_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// Create the log directory if needed and check that files can be created in it
///
/// Writability is checked with an anonymous temporary file, so no named
/// entry in the directory (and no service log) is ever touched.
fn ensure_log_dir(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir).map_err(|e| {
        LogtailError::LogDirError(format!(
            "Failed to create log directory {}: {}",
            log_dir.display(),
            e
        ))
    })?;

    if !log_dir.is_dir() {
        return Err(LogtailError::LogDirError(format!(
            "{} is not a directory",
            log_dir.display()
        )));
    }

    tempfile::tempfile_in(log_dir).map_err(|e| {
        LogtailError::LogDirError(format!(
            "Log directory {} is not writable: {}",
            log_dir.display(),
            e
        ))
    })?;

    Ok(())
}
