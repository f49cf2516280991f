//! Выбор читателя по содержимому файла, а не по расширению.

use crate::{
    error::{ProjError, Result},
    formats::{
        mpp::{Mpp, OLE_SIGNATURE},
        mspdi::Mspdi,
    },
    model::ProjectFile,
    traits::ReadFormat,
};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;

const XML_SNIFF_LEN: usize = 4096;
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Mpp,
    Mspdi,
}

impl FileFormat {
    /// Определяет формат по первым байтам файла.
    pub fn detect(header: &[u8]) -> Option<FileFormat> {
        if header.starts_with(&OLE_SIGNATURE) {
            return Some(FileFormat::Mpp);
        }

        let body = header.strip_prefix(UTF8_BOM).unwrap_or(header);
        let start = body.iter().position(|b| !b.is_ascii_whitespace())?;
        let body = &body[start..];
        if !body.starts_with(b"<") {
            return None;
        }
        let window = &body[..body.len().min(XML_SNIFF_LEN)];
        window
            .windows(b"<Project".len())
            .enumerate()
            .any(|(i, w)| {
                // `<Project>`, `<Project xmlns=…>`, но не `<ProjectX>`
                w == b"<Project"
                    && window
                        .get(i + w.len())
                        .map_or(true, |&c| c == b'>' || c == b'/' || c.is_ascii_whitespace())
            })
            .then_some(FileFormat::Mspdi)
    }

    pub fn read<R: BufRead + Seek>(self, r: R) -> Result<ProjectFile> {
        match self {
            FileFormat::Mpp => Mpp::read(r),
            FileFormat::Mspdi => Mspdi::read(r),
        }
    }
}

/// Открывает файл, определяет формат и читает проект.
pub fn read_project<P: AsRef<Path>>(path: P) -> Result<ProjectFile> {
    let path = path.as_ref();
    let mut br = BufReader::with_capacity(64 * 1024, File::open(path)?);

    let format = FileFormat::detect(br.fill_buf()?)
        .ok_or_else(|| ProjError::UnsupportedFormat(path.to_path_buf()))?;
    tracing::debug!(path = %path.display(), ?format, "selected reader");

    format.read(br)
}
