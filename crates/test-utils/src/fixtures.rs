use std::path::PathBuf;

use buffspawn::{Invocation, SpawnOptions};

/// Directory holding the shell fixtures used by the integration tests.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
}

/// Absolute path of fixture `name` (e.g. `"simple.sh"`).
pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// `sh <fixture> [args..]` with default options.
pub fn sh_fixture(name: &str) -> Invocation {
    Invocation::new("sh").arg(fixture(name).to_string_lossy())
}

/// `sh <fixture>` run from inside the fixtures directory, by relative name.
pub fn sh_fixture_in_dir(name: &str, options: SpawnOptions) -> Invocation {
    Invocation::new("sh")
        .arg(name)
        .options(options.cwd(fixtures_dir()))
}
