//! Конвейер: файл проекта -> модель -> MSPDI XML.

use crate::{
    error::Result,
    formats::mspdi::Mspdi,
    reader::read_project,
    traits::WriteFormat,
};
use std::io::Write;
use std::path::Path;

/// Документ целиком собирается в памяти: при ошибке в приёмник не попадает ни байта.
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let mut project = read_project(path)?;

    if project.properties.name.is_none() && project.properties.title.is_none() {
        project.properties.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned());
    }

    let mut out = Vec::new();
    Mspdi::write(&mut out, &project)?;
    tracing::debug!(
        source = project.properties.file_type.as_deref().unwrap_or("unknown"),
        bytes = out.len(),
        "rendered MSPDI document"
    );
    Ok(out)
}

pub fn convert_to<P: AsRef<Path>, W: Write>(path: P, mut w: W) -> Result<()> {
    let xml = convert_file(path)?;
    w.write_all(&xml)?;
    w.flush()?;
    Ok(())
}
