//! MPP: контейнер OLE2 (compound file) Microsoft Project.
//!
//! Разбирается уровень контейнера: версия файла (`\x01CompObj` или имена
//! корневых хранилищ) и свойства документа. Таблицы задач, ресурсов и
//! назначений — проприетарный формат, здесь не декодируются.

use crate::{
    error::{ProjError, Result},
    formats::propset::PropertySet,
    model::{Calendar, ProjectFile},
    traits::ReadFormat,
};
use cfb::CompoundFile;
use std::io::{BufRead, Read, Seek};

pub const OLE_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

const COMP_OBJ: &str = "/\u{1}CompObj";
const SUMMARY_INFORMATION: &str = "/\u{5}SummaryInformation";
const DOC_SUMMARY_INFORMATION: &str = "/\u{5}DocumentSummaryInformation";

const COMP_OBJ_HEADER_LEN: usize = 28;
const FILE_FORMAT_PREFIX: &str = "MSProject.";

// SummaryInformation
const PID_TITLE: u32 = 2;
const PID_SUBJECT: u32 = 3;
const PID_AUTHOR: u32 = 4;
const PID_REVISION: u32 = 9;
const PID_CREATED: u32 = 12;
const PID_LAST_SAVED: u32 = 13;

// DocumentSummaryInformation
const PID_CATEGORY: u32 = 2;
const PID_MANAGER: u32 = 14;
const PID_COMPANY: u32 = 15;

/// Сведения из `\x01CompObj`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompObj {
    pub user_type: Option<String>,
    /// Например `MSProject.MPP14`.
    pub file_format: Option<String>,
}

impl CompObj {
    pub fn parse(data: &[u8]) -> CompObj {
        let mut out = CompObj::default();
        let mut pos = COMP_OBJ_HEADER_LEN;

        for index in 0..3 {
            let Some(len) = read_u32(data, pos) else { break };
            pos += 4;
            // маркеры формата буфера обмена: дальше 4 байта id, не строка
            if len == 0xFFFF_FFFF || len == 0xFFFF_FFFE {
                pos += 4;
                continue;
            }
            let len = len as usize;
            let Some(bytes) = pos.checked_add(len).and_then(|end| data.get(pos..end)) else {
                break;
            };
            pos += len;

            let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
            let text: String = bytes[..end].iter().map(|&b| b as char).collect();
            if text.is_empty() {
                continue;
            }
            if text.starts_with(FILE_FORMAT_PREFIX) {
                if out.file_format.is_none() {
                    out.file_format = Some(text);
                }
            } else if index == 0 {
                out.user_type = Some(text);
            }
        }
        out
    }

    /// `MSProject.MPP14` -> `MPP14`.
    pub fn file_type(&self) -> Option<String> {
        self.file_format
            .as_deref()
            .and_then(|f| f.strip_prefix(FILE_FORMAT_PREFIX))
            .map(str::to_string)
    }
}

pub struct Mpp;

impl ReadFormat for Mpp {
    fn read<R: BufRead + Seek>(r: R) -> Result<ProjectFile> {
        let mut comp = CompoundFile::open(r)
            .map_err(|e| ProjError::NotAProjectFile(format!("OLE2 container: {e}")))?;

        let comp_obj = match read_stream(&mut comp, COMP_OBJ)? {
            Some(data) => CompObj::parse(&data),
            None => CompObj::default(),
        };

        let file_type = match comp_obj.file_type() {
            Some(t) => t,
            None => file_type_from_storages(&comp).ok_or_else(|| {
                ProjError::NotAProjectFile("no MSProject CompObj entry or project storage".into())
            })?,
        };
        tracing::debug!(
            %file_type,
            application = comp_obj.user_type.as_deref().unwrap_or("unknown"),
            "detected MPP container"
        );

        let mut project = ProjectFile::default();
        let props = &mut project.properties;
        props.file_type = Some(file_type.clone());

        if let Some(data) = read_stream(&mut comp, SUMMARY_INFORMATION)? {
            let set = PropertySet::parse(&data)?;
            tracing::debug!(properties = set.len(), "SummaryInformation");
            props.title = set.string(PID_TITLE);
            props.subject = set.string(PID_SUBJECT);
            props.author = set.string(PID_AUTHOR);
            props.revision = set
                .string(PID_REVISION)
                .and_then(|r| r.trim().parse().ok());
            props.creation_date = set.datetime(PID_CREATED);
            props.last_saved = set.datetime(PID_LAST_SAVED);
        }

        if let Some(data) = read_stream(&mut comp, DOC_SUMMARY_INFORMATION)? {
            let set = PropertySet::parse(&data)?;
            props.category = set.string(PID_CATEGORY);
            props.manager = set.string(PID_MANAGER);
            props.company = set.string(PID_COMPANY);
        }

        project.calendars.push(Calendar::standard(1));
        project.properties.calendar_uid = Some(1);

        tracing::info!(
            %file_type,
            "task, resource and assignment tables of MPP files are not decoded"
        );
        Ok(project)
    }
}

fn read_stream<F: Read + Seek>(comp: &mut CompoundFile<F>, path: &str) -> Result<Option<Vec<u8>>> {
    if !comp.is_stream(path) {
        return Ok(None);
    }
    let mut stream = comp.open_stream(path)?;
    let mut data = Vec::new();
    stream.read_to_end(&mut data)?;
    Ok(Some(data))
}

/// Корневые хранилища `   19`, `   112`, `   114` (и `   1` для MPP8).
fn file_type_from_storages<F: Read + Seek>(comp: &CompoundFile<F>) -> Option<String> {
    comp.read_root_storage()
        .filter(|e| e.is_storage())
        .filter_map(|e| {
            let name = e.name();
            let version = name.strip_prefix("   1")?;
            if !version.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            Some(match version {
                "" => "MPP8".to_string(),
                v => format!("MPP{v}"),
            })
        })
        .next()
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    let b = data.get(at..at.checked_add(4)?)?;
    Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}
