//! Relative ES module specifiers.

use std::path::{Component, Path};

/// Specifier importing `target` from a module inside `from_dir`.
///
/// Always `/`-separated and prefixed with `./` or `../`, as bundlers treat
/// bare specifiers as packages. Both paths must be absolute.
///
/// ```ignore
/// import_specifier(Path::new("/p/.tmp/fn-0"), Path::new("/p/build/server/index.js"))
///     == "../../build/server/index.js"
/// ```
pub fn import_specifier(from_dir: &Path, target: &Path) -> String {
    let from: Vec<Component> = from_dir.components().collect();
    let to: Vec<Component> = target.components().collect();

    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = std::iter::repeat_n("..".to_string(), from.len() - common).collect();
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    let joined = parts.join("/");
    if joined.starts_with("..") {
        joined
    } else {
        format!("./{joined}")
    }
}
