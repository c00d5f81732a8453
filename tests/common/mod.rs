//! Shared test constants and helpers for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

/// A small database exercising every rule at once.
///
/// - `long`: four authors, `pages` and `note` on an article
/// - `three`: three authors, kept as is
/// - `tool`: a `misc` entry whose note survives
/// - `site`: an `online` entry, collapsed only with `--collapse-online`
pub const SAMPLE_BIB: &str = r#"@article{long,
  author = {Smith, John and Doe, Jane and Lee, Kim and Park, Sam},
  title  = {Long Author List},
  pages  = {1--10},
  note   = {In press},
}

@article{three,
  author  = {Last1, First1 and Last2, First2 and Last3, First3},
  title   = {Three Authors},
  address = {Paris},
}

@misc{tool,
  title = {Some Tool},
  note  = {Version 2},
}

@online{site,
  title = {A Website},
  url   = {http://x},
}
"#;

/// Writes `content` to `name` inside `dir` and returns the full path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
