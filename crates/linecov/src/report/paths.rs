//! Project root detection and report file naming

/// Longest common directory prefix of `files`, `/`-terminated.
///
/// Empty when the files share no directory or the list is empty.
#[must_use]
pub fn detect_project_root(files: &[String]) -> String {
    let Some(first) = files.first() else {
        return String::new();
    };
    let mut root = match first.rfind('/') {
        Some(pos) => first[..=pos].to_string(),
        None => return String::new(),
    };
    for file in files {
        while !file.starts_with(&root) {
            root.pop();
            match root.rfind('/') {
                Some(pos) => root.truncate(pos + 1),
                None => return String::new(),
            }
        }
    }
    root
}

/// Normalise a user-supplied project root to end in `/`
#[must_use]
pub fn normalize_root(root: &str) -> String {
    if root.is_empty() || root.ends_with('/') {
        root.to_string()
    } else {
        format!("{root}/")
    }
}

/// Display name and HTML page name of one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNames {
    /// Name shown in headers and the index, `[...]/rel/path` inside the root
    pub pretty_name: String,
    /// File name of the per-file page, relative to the target directory
    pub page: String,
}

/// Names used for `file` in a report rooted at `root`
#[must_use]
pub fn page_names(file: &str, root: &str) -> PageNames {
    let (pretty, page) = match relative_to_root(file, root) {
        Some(rel) => (format!("[...]/{rel}"), rel),
        None => (file.to_string(), file.trim_start_matches('/')),
    };
    PageNames {
        pretty_name: pretty.replace("/./", "/"),
        page: format!("{}.html", page.replace('/', "_")),
    }
}

/// Whether `file` lies below one of `exclude_dirs` (relative to `root`)
#[must_use]
pub fn is_excluded_dir(file: &str, root: &str, exclude_dirs: &[String]) -> bool {
    relative_to_root(file, root).is_some_and(|rel| {
        exclude_dirs
            .iter()
            .any(|dir| !dir.is_empty() && rel.starts_with(dir.as_str()))
    })
}

/// Split a comma separated `--exclude-dir` value
#[must_use]
pub fn split_exclude_dirs(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|dir| !dir.is_empty())
        .map(String::from)
        .collect()
}

fn relative_to_root<'a>(file: &'a str, root: &str) -> Option<&'a str> {
    if root.is_empty() {
        None
    } else {
        file.strip_prefix(root)
    }
}
