//! mppconvlib — модель расписания проекта, чтение MPP/MSPDI и запись MSPDI XML.

pub mod convert;
pub mod error;
pub mod model;
pub mod reader;
pub mod traits;

pub mod formats {
    pub mod datatypes;
    pub mod mpp;
    pub mod mspdi;
    pub mod propset;
}

pub use convert::{convert_file, convert_to};
pub use error::{ProjError, Result};
pub use model::ProjectFile;
pub use reader::{read_project, FileFormat};
