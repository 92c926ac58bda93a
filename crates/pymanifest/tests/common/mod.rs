//! Shared fixtures: the `built-by-uv` project used across integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub const BUILT_BY_UV: &str = r#"[project]
name = "built-by-uv"
version = "0.1.0"
description = "A package to be built with the uv build backend that uses all features exposed by the build backend"
readme = "README.md"
requires-python = ">=3.12"
dependencies = ["anyio>=4,<5"]
license-files = ["LICENSE*", "third-party-licenses/*"]

[project.scripts]
say-hi = "built_by_uv.cli:hello"

[tool.uv.build-backend]
source-include = ["data/build-script.py"]
source-exclude = ["/src/built_by_uv/not-packaged.txt"]
wheel-exclude = ["build-*.h"]

[tool.uv.build-backend.data]
scripts = "scripts"
data = "assets"
headers = "header"

[build-system]
requires = ["uv_build>=0.7,<10000"]
build-backend = "uv_build"
"#;

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Write a complete `built-by-uv` project into `root`.
pub fn write_built_by_uv(root: &Path) {
    write(&root.join("pyproject.toml"), BUILT_BY_UV);
    write(&root.join("README.md"), "# built-by-uv\n");
    write(&root.join("LICENSE-APACHE"), "Apache-2.0\n");
    write(&root.join("LICENSE-MIT"), "MIT\n");
    write(&root.join("third-party-licenses/PEP-401.txt"), "no\n");
    write(&root.join("src/built_by_uv/__init__.py"), "");
    write(&root.join("src/built_by_uv/cli.py"), "def hello():\n    print('Hi!')\n");
    write(&root.join("data/build-script.py"), "");
    write(&root.join("scripts/whoami.sh"), "#!/bin/sh\nwhoami\n");
    write(&root.join("assets/data.csv"), "a,b\n");
    write(&root.join("header/built_by_uv.h"), "");
}
