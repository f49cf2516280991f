//! OLE property sets (`\x05SummaryInformation`, `\x05DocumentSummaryInformation`).
//!
//! Читается только первая секция каждого потока и только типы,
//! которые встречаются в свойствах документа.

use crate::error::{ProjError, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::collections::HashMap;

const BYTE_ORDER_MARK: u16 = 0xFFFE;
const HEADER_LEN: usize = 28;
const FMTID_OFFSET_LEN: usize = 20;

const VT_I2: u32 = 0x0002;
const VT_I4: u32 = 0x0003;
const VT_LPSTR: u32 = 0x001E;
const VT_LPWSTR: u32 = 0x001F;
const VT_FILETIME: u32 = 0x0040;

const PID_CODEPAGE: u32 = 1;
const CP_UTF8: i32 = 65001;

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Int(i32),
    Text(String),
    FileTime(Option<NaiveDateTime>),
}

/// Значения первой секции набора свойств, по идентификатору свойства.
#[derive(Debug, Clone, Default)]
pub struct PropertySet {
    values: HashMap<u32, PropertyValue>,
}

impl PropertySet {
    pub fn parse(data: &[u8]) -> Result<PropertySet> {
        if data.len() < HEADER_LEN + FMTID_OFFSET_LEN || read_u16(data, 0)? != BYTE_ORDER_MARK {
            return Err(ProjError::Parse("property set: bad header".into()));
        }
        let sections = read_u32(data, 24)?;
        if sections == 0 {
            return Ok(PropertySet::default());
        }

        let section = read_u32(data, HEADER_LEN + 16)? as usize;
        let count = read_u32(data, section.saturating_add(4))? as usize;
        // таблица (id, offset) должна целиком лежать в потоке
        count
            .checked_mul(8)
            .and_then(|len| len.checked_add(section + 8))
            .filter(|&end| end <= data.len())
            .ok_or_else(|| {
                ProjError::Parse(format!("property set: {count} entries do not fit the stream"))
            })?;

        // Кодовая страница нужна до разбора строк.
        let mut entries = Vec::with_capacity(count);
        for i in 0..count {
            let at = section + 8 + i * 8;
            let id = read_u32(data, at)?;
            let offset = read_u32(data, at + 4)? as usize;
            entries.push((id, section + offset));
        }

        let mut codepage = 1252;
        if let Some(&(_, at)) = entries.iter().find(|(id, _)| *id == PID_CODEPAGE) {
            if let Some(PropertyValue::Int(cp)) = read_value(data, at, codepage)? {
                // VT_I2 1200..65535 хранится как отрицательное i16
                codepage = cp & 0xFFFF;
            }
        }

        let mut values = HashMap::with_capacity(count);
        for (id, at) in entries {
            if id == 0 {
                continue; // словарь имён
            }
            match read_value(data, at, codepage) {
                Ok(Some(value)) => {
                    values.insert(id, value);
                }
                Ok(None) => {}
                Err(e) => tracing::debug!(id, error = %e, "skipping unreadable property"),
            }
        }

        Ok(PropertySet { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn string(&self, id: u32) -> Option<String> {
        match self.values.get(&id)? {
            PropertyValue::Text(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    pub fn datetime(&self, id: u32) -> Option<NaiveDateTime> {
        match self.values.get(&id)? {
            PropertyValue::FileTime(dt) => *dt,
            _ => None,
        }
    }
}

fn read_value(data: &[u8], at: usize, codepage: i32) -> Result<Option<PropertyValue>> {
    let vt = read_u32(data, at)? & 0xFFFF;
    let body = at + 4;
    let value = match vt {
        VT_I2 => PropertyValue::Int(read_u16(data, body)? as i16 as i32),
        VT_I4 => PropertyValue::Int(read_u32(data, body)? as i32),
        VT_LPSTR => {
            let len = read_u32(data, body)? as usize;
            let bytes = slice(data, body + 4, len)?;
            PropertyValue::Text(decode_ansi(bytes, codepage))
        }
        VT_LPWSTR => {
            let chars = read_u32(data, body)? as usize;
            let bytes = slice(data, body + 4, chars * 2)?;
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .take_while(|&u| u != 0)
                .collect();
            PropertyValue::Text(String::from_utf16_lossy(&units))
        }
        VT_FILETIME => {
            let low = read_u32(data, body)? as u64;
            let high = read_u32(data, body + 4)? as u64;
            PropertyValue::FileTime(filetime_to_datetime((high << 32) | low))
        }
        _ => return Ok(None),
    };
    Ok(Some(value))
}

/// FILETIME: сотни наносекунд от 1601-01-01. Ноль — «не задано».
pub fn filetime_to_datetime(ticks: u64) -> Option<NaiveDateTime> {
    if ticks == 0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1601, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let micros = i64::try_from(ticks / 10).ok()?;
    epoch.checked_add_signed(TimeDelta::microseconds(micros))
}

fn decode_ansi(bytes: &[u8], codepage: i32) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let bytes = &bytes[..end];
    if codepage == CP_UTF8 {
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

fn slice(data: &[u8], at: usize, len: usize) -> Result<&[u8]> {
    at.checked_add(len)
        .and_then(|end| data.get(at..end))
        .ok_or_else(|| ProjError::Parse(format!("property set: truncated at {at}")))
}

fn read_u16(data: &[u8], at: usize) -> Result<u16> {
    let b = slice(data, at, 2)?;
    Ok(u16::from_le_bytes([b[0], b[1]]))
}

fn read_u32(data: &[u8], at: usize) -> Result<u32> {
    let b = slice(data, at, 4)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filetime_epoch_offsets() {
        assert_eq!(filetime_to_datetime(0), None);
        // 1970-01-01 = 116444736000000000 тиков
        let dt = filetime_to_datetime(116_444_736_000_000_000).unwrap();
        assert_eq!(dt.to_string(), "1970-01-01 00:00:00");
    }

    #[test]
    fn rejects_short_stream() {
        assert!(PropertySet::parse(&[0xFE, 0xFF, 0, 0]).is_err());
    }

    #[test]
    fn rejects_entry_count_past_end_of_stream() {
        let mut data = vec![0u8; 56];
        data[0..2].copy_from_slice(&BYTE_ORDER_MARK.to_le_bytes());
        data[24..28].copy_from_slice(&1u32.to_le_bytes());
        data[44..48].copy_from_slice(&48u32.to_le_bytes());
        data[52..56].copy_from_slice(&0xFFFF_FFF0u32.to_le_bytes());

        let err = PropertySet::parse(&data).unwrap_err();
        assert!(matches!(err, ProjError::Parse(_)), "{err}");
    }
}
