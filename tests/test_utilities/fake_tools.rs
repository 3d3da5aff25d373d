use std::fs;
use std::path::{Path, PathBuf};

pub const GO_MOD: &str = "module github.com/acme/app\n\ngo 1.21\n\nrequire (\n\tgithub.com/foo/bar v1.0.0\n\tgithub.com/google/uuid v1.3.0 // exhortignore\n)\n";

/// Writes a `go` stand-in that answers `go version` and `go mod graph`
#[cfg(unix)]
pub fn write_fake_go(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = r#"#!/bin/sh
case "$1 $2" in
  "version "*) echo "go version go1.21.4 linux/amd64" ;;
  "mod graph")
    echo "github.com/acme/app github.com/foo/bar@v1.0.0"
    echo "github.com/acme/app github.com/google/uuid@v1.3.0"
    echo "github.com/foo/bar@v1.0.0 golang.org/x/text@v0.13.0"
    ;;
  *) echo "unexpected invocation: $*" >&2; exit 1 ;;
esac
"#;
    let path = dir.join("fake-go");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Creates `<dir>/project/go.mod`
pub fn write_go_project(dir: &Path) -> PathBuf {
    let project = dir.join("project");
    fs::create_dir_all(&project).unwrap();
    let manifest = project.join("go.mod");
    fs::write(&manifest, GO_MOD).unwrap();
    manifest
}
