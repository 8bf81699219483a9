use std::path::PathBuf;

/// Returns a possible path to the Tabula JAR file, assuming that the process
/// is running as part of a distribution.
pub fn tabula_jar() -> Option<PathBuf> {
    form_path("tabula.jar").filter(|path| path.is_file())
}

/// Returns a possible path to the directory of bundled specifications,
/// assuming that the process is running as part of a distribution.
pub fn specs_dir() -> Option<PathBuf> {
    form_path("specs").filter(|path| path.is_dir())
}

fn form_path(file_name: &str) -> Option<PathBuf> {
    let mut exec_path = std::env::current_exe().ok()?;
    exec_path.set_file_name(file_name);
    Some(exec_path)
}
