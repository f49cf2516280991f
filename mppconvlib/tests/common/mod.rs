#![allow(dead_code)]

use std::io::{Cursor, Write};

pub enum Prop {
    Str(&'static str),
    I2(i16),
    FileTime(u64),
}

/// Набор свойств OLE с одной секцией.
pub fn property_set(props: &[(u32, Prop)]) -> Vec<u8> {
    let mut values = Vec::new();
    let mut offsets = Vec::new();
    let table_len = 8 + props.len() * 8;

    for (id, prop) in props {
        offsets.push((*id, (table_len + values.len()) as u32));
        match prop {
            Prop::Str(s) => {
                values.extend_from_slice(&0x1Eu32.to_le_bytes());
                values.extend_from_slice(&((s.len() + 1) as u32).to_le_bytes());
                values.extend_from_slice(s.as_bytes());
                values.push(0);
            }
            Prop::I2(v) => {
                values.extend_from_slice(&0x02u32.to_le_bytes());
                values.extend_from_slice(&v.to_le_bytes());
            }
            Prop::FileTime(t) => {
                values.extend_from_slice(&0x40u32.to_le_bytes());
                values.extend_from_slice(&t.to_le_bytes());
            }
        }
        while values.len() % 4 != 0 {
            values.push(0);
        }
    }

    let mut out = Vec::new();
    out.extend_from_slice(&0xFFFEu16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0x0002_0006u32.to_le_bytes());
    out.extend_from_slice(&[0u8; 16]);
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&[0xE0u8; 16]);
    out.extend_from_slice(&48u32.to_le_bytes());

    out.extend_from_slice(&((table_len + values.len()) as u32).to_le_bytes());
    out.extend_from_slice(&(props.len() as u32).to_le_bytes());
    for (id, offset) in offsets {
        out.extend_from_slice(&id.to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());
    }
    out.extend_from_slice(&values);
    out
}

/// Поток `\x01CompObj`: заголовок и три строки с длиной.
pub fn comp_obj(strings: &[&str]) -> Vec<u8> {
    let mut out = vec![0u8; 28];
    for s in strings {
        out.extend_from_slice(&((s.len() + 1) as u32).to_le_bytes());
        out.extend_from_slice(s.as_bytes());
        out.push(0);
    }
    out
}

/// Compound file из пар (путь потока, данные) и списка корневых хранилищ.
pub fn compound_file(streams: &[(&str, Vec<u8>)], storages: &[&str]) -> Vec<u8> {
    let mut comp = cfb::CompoundFile::create(Cursor::new(Vec::new())).expect("create cfb");
    for storage in storages {
        comp.create_storage(storage).expect("create storage");
    }
    for (path, data) in streams {
        let mut stream = comp.create_stream(path).expect("create stream");
        stream.write_all(data).expect("write stream");
    }
    comp.flush().expect("flush cfb");
    comp.into_inner().into_inner()
}

pub fn filetime(unix_secs: i64) -> u64 {
    (unix_secs as u64 + 11_644_473_600) * 10_000_000
}

pub const SAMPLE_MSPDI: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Project xmlns="http://schemas.microsoft.com/project">
  <SaveVersion>14</SaveVersion>
  <Name>Office move</Name>
  <Title>Office move &amp; setup</Title>
  <Author>J. Doe</Author>
  <CreationDate>2024-01-10T09:00:00</CreationDate>
  <ScheduleFromStart>1</ScheduleFromStart>
  <StartDate>2024-02-01T08:00:00</StartDate>
  <CurrencyCode>EUR</CurrencyCode>
  <CalendarUID>1</CalendarUID>
  <MinutesPerDay>480</MinutesPerDay>
  <ExtendedAttributes>
    <ExtendedAttribute>
      <FieldID>188743731</FieldID>
      <Name>Ignored</Name>
    </ExtendedAttribute>
  </ExtendedAttributes>
  <Calendars>
    <Calendar>
      <UID>1</UID>
      <Name>Standard</Name>
      <IsBaseCalendar>1</IsBaseCalendar>
      <BaseCalendarUID>-1</BaseCalendarUID>
      <WeekDays>
        <WeekDay>
          <DayType>1</DayType>
          <DayWorking>0</DayWorking>
        </WeekDay>
        <WeekDay>
          <DayType>2</DayType>
          <DayWorking>1</DayWorking>
          <WorkingTimes>
            <WorkingTime>
              <FromTime>08:00:00</FromTime>
              <ToTime>12:00:00</ToTime>
            </WorkingTime>
            <WorkingTime>
              <FromTime>13:00:00</FromTime>
              <ToTime>17:00:00</ToTime>
            </WorkingTime>
          </WorkingTimes>
        </WeekDay>
        <WeekDay>
          <DayType>0</DayType>
          <DayWorking>0</DayWorking>
        </WeekDay>
      </WeekDays>
      <WorkWeeks>
        <WorkWeek>
          <TimePeriod>
            <FromDate>2024-07-01T00:00:00</FromDate>
            <ToDate>2024-08-31T23:59:00</ToDate>
          </TimePeriod>
          <Name>Summer hours</Name>
          <WeekDays>
            <WeekDay>
              <DayType>1</DayType>
              <DayWorking>1</DayWorking>
              <WorkingTimes>
                <WorkingTime>
                  <FromTime>08:00:00</FromTime>
                  <ToTime>12:00:00</ToTime>
                </WorkingTime>
              </WorkingTimes>
            </WeekDay>
          </WeekDays>
        </WorkWeek>
      </WorkWeeks>
    </Calendar>
  </Calendars>
  <Tasks>
    <Task>
      <UID>1</UID>
      <ID>1</ID>
      <Name>Planning</Name>
      <OutlineNumber>1</OutlineNumber>
      <OutlineLevel>1</OutlineLevel>
      <Start>2024-02-01T08:00:00</Start>
      <Finish>2024-02-05T17:00:00</Finish>
      <Duration>PT24H0M0S</Duration>
      <DurationFormat>7</DurationFormat>
      <Summary>1</Summary>
      <Baseline>
        <Start>2023-12-01T08:00:00</Start>
      </Baseline>
    </Task>
    <Task>
      <UID>2</UID>
      <ID>2</ID>
      <Name>Pack boxes</Name>
      <OutlineNumber>1.1</OutlineNumber>
      <OutlineLevel>2</OutlineLevel>
      <Priority>700</Priority>
      <Start>2024-02-01T08:00:00</Start>
      <Finish>2024-02-02T17:00:00</Finish>
      <Duration>PT16H0M0S</Duration>
      <DurationFormat>7</DurationFormat>
      <PercentComplete>50</PercentComplete>
      <Cost>120000</Cost>
      <Notes>Fragile items first</Notes>
    </Task>
    <Task>
      <UID>3</UID>
      <ID>3</ID>
      <Name>Move</Name>
      <OutlineNumber>1.2</OutlineNumber>
      <OutlineLevel>2</OutlineLevel>
      <Start>2024-02-05T08:00:00</Start>
      <Finish>2024-02-05T17:00:00</Finish>
      <Duration>PT8H0M0S</Duration>
      <DurationFormat>5</DurationFormat>
      <Milestone>0</Milestone>
      <ConstraintType>4</ConstraintType>
      <ConstraintDate>2024-02-05T08:00:00</ConstraintDate>
      <PredecessorLink>
        <PredecessorUID>2</PredecessorUID>
        <Type>1</Type>
        <LinkLag>4800</LinkLag>
        <LagFormat>7</LagFormat>
      </PredecessorLink>
      <PredecessorLink>
        <PredecessorUID>99</PredecessorUID>
        <Type>3</Type>
      </PredecessorLink>
    </Task>
  </Tasks>
  <Resources>
    <Resource>
      <UID>1</UID>
      <ID>1</ID>
      <Name>Movers Ltd</Name>
      <Type>1</Type>
      <Initials>ML</Initials>
      <EmailAddress>ops@movers.example</EmailAddress>
      <MaxUnits>2.00</MaxUnits>
      <StandardRate>45.5</StandardRate>
      <StandardRateFormat>2</StandardRateFormat>
    </Resource>
    <Resource>
      <UID>2</UID>
      <ID>2</ID>
      <Name>Boxes</Name>
      <Type>0</Type>
    </Resource>
  </Resources>
  <Assignments>
    <Assignment>
      <UID>1</UID>
      <TaskUID>3</TaskUID>
      <ResourceUID>1</ResourceUID>
      <Units>0.5</Units>
      <Work>PT8H0M0S</Work>
      <TimephasedData>
        <Start>2024-02-05T08:00:00</Start>
      </TimephasedData>
    </Assignment>
    <Assignment>
      <UID>2</UID>
      <TaskUID>1</TaskUID>
      <ResourceUID>-65535</ResourceUID>
    </Assignment>
    <Assignment>
      <UID>3</UID>
      <TaskUID>42</TaskUID>
      <ResourceUID>2</ResourceUID>
    </Assignment>
  </Assignments>
</Project>
"#;
