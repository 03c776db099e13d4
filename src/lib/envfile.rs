//! Line-oriented rewriting of `KEY=value` environment files.

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use tempfile::NamedTempFile;

/// Result of substituting a key in file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub contents: Vec<u8>,
    pub replaced_lines: usize,
}

/// Replace every line starting with `key=` by `key=value`.
///
/// Works on raw bytes, so files that are not valid UTF-8 are handled too. Line
/// terminators (`\n` or `\r\n`) and the presence of a trailing newline are
/// preserved; every other line is left untouched.
pub fn replace_key_lines(contents: &[u8], key: &str, value: &str) -> Substitution {
    let prefix = format!("{key}=").into_bytes();
    let mut output = Vec::with_capacity(contents.len() + value.len());
    let mut replaced_lines = 0;

    for line in contents.split_inclusive(|&byte| byte == b'\n') {
        let (body, terminator) = split_terminator(line);
        if body.starts_with(&prefix) {
            output.extend_from_slice(&prefix);
            output.extend_from_slice(value.as_bytes());
            output.extend_from_slice(terminator);
            replaced_lines += 1;
        } else {
            output.extend_from_slice(line);
        }
    }

    Substitution {
        contents: output,
        replaced_lines,
    }
}

fn split_terminator(line: &[u8]) -> (&[u8], &[u8]) {
    if let Some(body) = line.strip_suffix(b"\r\n") {
        (body, &b"\r\n"[..])
    } else if let Some(body) = line.strip_suffix(b"\n") {
        (body, &b"\n"[..])
    } else {
        (line, &b""[..])
    }
}

/// Replace `path` with `contents` through a sibling temporary file.
///
/// The original file's permissions are carried over to the replacement.
pub fn write_in_place(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path).map(|meta| meta.permissions()).ok();

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    if let Some(permissions) = permissions {
        fs::set_permissions(temp.path(), permissions)?;
    }
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
