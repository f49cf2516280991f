//! Унифицированные трэйты чтения/записи на основе std::io::{BufRead, Seek, Write}.

use crate::{error::Result, model::ProjectFile};
use std::io::{BufRead, Seek, Write};

/// Seek нужен контейнерным форматам (MPP хранится как OLE2 compound file).
pub trait ReadFormat {
    fn read<R: BufRead + Seek>(r: R) -> Result<ProjectFile>;
}

pub trait WriteFormat {
    fn write<W: Write>(w: W, project: &ProjectFile) -> Result<()>;
}
