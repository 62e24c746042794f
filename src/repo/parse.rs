//! Parsers for git plumbing output

use crate::types::RepoStatus;

/// Undo git's C-style quoting of a path (`"my notes.txt"`, `"caf\303\251"`)
///
/// Paths git did not quote come back unchanged.
pub fn unquote_path(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => bytes.push(b'\n'),
            Some('t') => bytes.push(b'\t'),
            Some('r') => bytes.push(b'\r'),
            Some('a') => bytes.push(0x07),
            Some('b') => bytes.push(0x08),
            Some('f') => bytes.push(0x0c),
            Some('v') => bytes.push(0x0b),
            Some(d @ '0'..='7') => {
                let mut value = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|n| n.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                bytes.push(u8::try_from(value).unwrap_or(b'?'));
            }
            Some(other) => {
                let mut buf = [0; 4];
                bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
            None => bytes.push(b'\\'),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// File part of a porcelain line; renames and copies keep `old -> new`
fn porcelain_file(code: &str, file: &str) -> String {
    if code.contains(['R', 'C']) {
        if let Some((from, to)) = file.split_once(" -> ") {
            return format!("{} -> {}", unquote_path(from), unquote_path(to));
        }
    }
    unquote_path(file)
}

/// Parse `git status --porcelain` (v1) lines into a [`RepoStatus`]
///
/// Each line is a two-character `XY` code, a space, and the file name. `??`
/// marks an untracked file; a non-blank `X` means staged and a non-blank `Y`
/// means unstaged, so a partially staged file lands in both lists. Quoted
/// names are unquoted.
pub fn parse_porcelain_status(branch: &str, output: &str) -> RepoStatus {
    let mut status = RepoStatus {
        branch: branch.to_string(),
        ..RepoStatus::default()
    };

    for line in output.lines() {
        let Some(code) = line.get(..2) else {
            continue;
        };
        let Some(file) = line.get(3..).filter(|f| !f.is_empty()) else {
            continue;
        };
        let file = porcelain_file(code, file);

        if code == "??" {
            status.untracked.push(file);
            continue;
        }

        let mut chars = code.chars();
        let index = chars.next().unwrap_or(' ');
        let worktree = chars.next().unwrap_or(' ');
        if index != ' ' {
            status.staged.push(file.clone());
        }
        if worktree != ' ' {
            status.unstaged.push(file);
        }
    }

    status
}

/// Parse `git config --file .gitmodules --get-regexp path` output
///
/// Lines look like `submodule.<name>.path <path>`.
pub fn parse_submodule_paths(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let (key, value) = line.trim().split_once(char::is_whitespace)?;
            (key.starts_with("submodule.") && key.ends_with(".path"))
                .then(|| value.trim().to_string())
        })
        .filter(|path| !path.is_empty())
        .collect()
}
