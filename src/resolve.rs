// src/resolve.rs

//! Executable resolution.
//!
//! Windows cannot launch `foo` when the file on disk is `foo.cmd` or
//! `foo.bat`; the caller has to name the extension. [`ExecutableResolver`]
//! bridges that gap with a `which` lookup (which applies `PATHEXT`), and
//! remembers each hit for the rest of the process lifetime.
//!
//! On every other platform the resolver is the identity function.
//!
//! The cache is never invalidated: a command that resolved to a path keeps
//! resolving to that path. Misses are not cached, and an unresolved command is
//! returned unchanged so the launcher gets the final word (usually a spawn
//! failure).

use std::collections::HashMap;
use std::ffi::OsString;
use std::sync::RwLock;

use tracing::{debug, trace};

/// Resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Return the command unchanged.
    Passthrough,
    /// Look the command up on the search path, trying each executable
    /// extension.
    ExtensionSearch,
}

impl ResolveMode {
    pub fn for_current_platform() -> Self {
        if cfg!(windows) {
            ResolveMode::ExtensionSearch
        } else {
            ResolveMode::Passthrough
        }
    }
}

/// Hits are keyed by the command and by the child `PATH` override it was
/// looked up under, so a per-invocation `PATH` never leaks into other lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    command: String,
    child_path: Option<String>,
}

impl CacheKey {
    fn new(command: &str, child_path: Option<&str>) -> Self {
        Self {
            command: command.to_string(),
            child_path: child_path.map(str::to_string),
        }
    }
}

/// Resolves command names to executable paths, caching hits.
#[derive(Debug)]
pub struct ExecutableResolver {
    mode: ResolveMode,
    search_path: Option<OsString>,
    cache: RwLock<HashMap<CacheKey, String>>,
}

impl ExecutableResolver {
    /// Resolver for the running platform; the search path is the parent's
    /// `PATH` at lookup time.
    pub fn new() -> Self {
        Self::with_mode(ResolveMode::for_current_platform())
    }

    pub fn with_mode(mode: ResolveMode) -> Self {
        Self {
            mode,
            search_path: None,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Extension-searching resolver over a fixed `PATH`-style list, used in
    /// place of the parent's `PATH`.
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            mode: ResolveMode::ExtensionSearch,
            search_path: Some(search_path.into()),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn mode(&self) -> ResolveMode {
        self.mode
    }

    /// Resolve `command`, returning it unchanged when nothing is found.
    pub fn resolve(&self, command: &str) -> String {
        self.resolve_with_path(command, None)
    }

    /// Resolve `command` against `child_path` when the child gets its own
    /// `PATH`, otherwise against the resolver's search path.
    pub fn resolve_with_path(&self, command: &str, child_path: Option<&str>) -> String {
        if self.mode == ResolveMode::Passthrough {
            return command.to_string();
        }

        let key = CacheKey::new(command, child_path);
        if let Some(hit) = self.lookup(&key) {
            trace!(command, resolved = %hit, "executable resolved from cache");
            return hit;
        }

        let search_path = match child_path {
            Some(path) => Some(OsString::from(path)),
            None => self
                .search_path
                .clone()
                .or_else(|| std::env::var_os("PATH")),
        };

        let cwd = match std::env::current_dir() {
            Ok(cwd) => cwd,
            Err(e) => {
                debug!(command, error = %e, "no current directory; leaving command unchanged");
                return command.to_string();
            }
        };

        match which::which_in(command, search_path, &cwd) {
            Ok(path) => {
                let resolved = path.to_string_lossy().into_owned();
                debug!(command, resolved = %resolved, "executable resolved");
                // Racing lookups insert the same value; last write wins.
                if let Ok(mut cache) = self.cache.write() {
                    cache.insert(key, resolved.clone());
                }
                resolved
            }
            Err(e) => {
                debug!(command, error = %e, "executable not found; leaving command unchanged");
                command.to_string()
            }
        }
    }

    /// Cached resolution for `command` under the resolver's own search path.
    pub fn cached(&self, command: &str) -> Option<String> {
        self.lookup(&CacheKey::new(command, None))
    }

    /// Cached resolution for `command` under a child `PATH` override.
    pub fn cached_with_path(&self, command: &str, child_path: &str) -> Option<String> {
        self.lookup(&CacheKey::new(command, Some(child_path)))
    }

    pub fn cache_len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    fn lookup(&self, key: &CacheKey) -> Option<String> {
        self.cache
            .read()
            .ok()
            .and_then(|cache| cache.get(key).cloned())
    }
}

impl Default for ExecutableResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Create an executable named `stem` plus the platform's executable
    /// suffix, so `which` accepts it on every OS.
    fn make_executable(dir: &Path, stem: &str) -> PathBuf {
        let path = dir.join(format!("{stem}{}", std::env::consts::EXE_SUFFIX));
        fs::write(&path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    fn path_str(dir: &Path) -> &str {
        dir.to_str().unwrap()
    }

    #[test]
    fn passthrough_is_identity() {
        let resolver = ExecutableResolver::with_mode(ResolveMode::Passthrough);
        assert_eq!(resolver.resolve("foo"), "foo");
        assert_eq!(resolver.resolve_with_path("foo", Some("/nowhere")), "foo");
        assert_eq!(resolver.cache_len(), 0);
    }

    #[test]
    fn finds_bare_name_on_search_path_and_caches_it() {
        let dir = tempfile::tempdir().unwrap();
        let tool = make_executable(dir.path(), "foo");

        let resolver = ExecutableResolver::with_search_path(dir.path());
        let resolved = resolver.resolve("foo");

        assert_eq!(PathBuf::from(&resolved), tool);
        assert_eq!(resolver.cached("foo"), Some(resolved.clone()));

        // Cache is never invalidated, even when the file disappears.
        fs::remove_file(&tool).unwrap();
        assert_eq!(resolver.resolve("foo"), resolved);
    }

    #[test]
    fn miss_returns_command_unchanged_and_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ExecutableResolver::with_search_path(dir.path());

        assert_eq!(resolver.resolve("missing"), "missing");
        assert_eq!(resolver.resolve(""), "");
        assert_eq!(resolver.cache_len(), 0);
    }

    #[test]
    fn path_commands_are_not_searched_on_path() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        make_executable(other.path(), "tool");
        let explicit = make_executable(dir.path(), "tool");

        let resolver = ExecutableResolver::with_search_path(other.path());
        let resolved = resolver.resolve(explicit.to_str().unwrap());
        assert_eq!(PathBuf::from(resolved), explicit);

        let missing = dir.path().join("absent");
        let resolved = resolver.resolve(missing.to_str().unwrap());
        assert_eq!(PathBuf::from(resolved), missing);
    }

    #[test]
    fn child_path_overrides_search_path() {
        let parent = tempfile::tempdir().unwrap();
        let child = tempfile::tempdir().unwrap();
        let tool = make_executable(child.path(), "only-in-child");

        let resolver = ExecutableResolver::with_search_path(parent.path());
        assert_eq!(resolver.resolve("only-in-child"), "only-in-child");

        let child_path = path_str(child.path());
        let resolved = resolver.resolve_with_path("only-in-child", Some(child_path));
        assert_eq!(PathBuf::from(&resolved), tool);

        assert_eq!(
            resolver.cached_with_path("only-in-child", child_path),
            Some(resolved)
        );
        assert_eq!(resolver.cached("only-in-child"), None);
    }

    #[test]
    fn concurrent_population_is_consistent() {
        let dir = tempfile::tempdir().unwrap();
        make_executable(dir.path(), "x");
        let resolver = std::sync::Arc::new(ExecutableResolver::with_search_path(dir.path()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let r = std::sync::Arc::clone(&resolver);
                std::thread::spawn(move || r.resolve("x"))
            })
            .collect();

        let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_ne!(results[0], "x");
        assert_eq!(resolver.cache_len(), 1);
    }
}
