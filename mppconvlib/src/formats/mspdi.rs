//! MSPDI (Microsoft Project Data Interchange) XML: чтение и запись.

use crate::{
    error::{ProjError, Result},
    formats::datatypes::*,
    model::{
        Assignment, Calendar, ConstraintType, Duration, ProjectFile, Relation, RelationType,
        Resource, ResourceType, Task, TimeUnit, WeekDay, WorkingTime,
    },
    traits::{ReadFormat, WriteFormat},
};
use chrono::NaiveTime;
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Reader, Writer,
};
use std::borrow::Cow;
use std::io::{BufRead, Seek, Write};

pub const NAMESPACE: &str = "http://schemas.microsoft.com/project";
pub const SAVE_VERSION: u32 = 14;
pub const DEFAULT_PROJECT_NAME: &str = "Imported project";

/// UID «пустого» ресурса, которым MS Project помечает назначения без ресурса.
const NULL_RESOURCE_UID: i32 = -65535;
/// Ставка за час.
const RATE_FORMAT_PER_HOUR: u32 = 2;

pub struct Mspdi;

/* ------------------------------- WRITE ---------------------------------- */

impl WriteFormat for Mspdi {
    fn write<W: Write>(mut w: W, project: &ProjectFile) -> Result<()> {
        let mut wr = Writer::new_with_indent(&mut w, b' ', 2);
        let props = &project.properties;

        wr.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml)?;
        wr.write_event(Event::Start(
            BytesStart::new("Project").with_attributes([("xmlns", NAMESPACE)]),
        ))
        .map_err(xml)?;

        elem(&mut wr, "SaveVersion", &SAVE_VERSION.to_string())?;
        let name = props
            .name
            .as_deref()
            .or(props.title.as_deref())
            .unwrap_or(DEFAULT_PROJECT_NAME);
        elem(&mut wr, "Name", name)?;
        opt_elem(&mut wr, "Title", props.title.as_deref())?;
        opt_elem(&mut wr, "Subject", props.subject.as_deref())?;
        opt_elem(&mut wr, "Category", props.category.as_deref())?;
        opt_elem(&mut wr, "Company", props.company.as_deref())?;
        opt_elem(&mut wr, "Manager", props.manager.as_deref())?;
        opt_elem(&mut wr, "Author", props.author.as_deref())?;
        opt_elem(&mut wr, "CreationDate", props.creation_date.as_ref().map(print_datetime))?;
        opt_elem(&mut wr, "Revision", props.revision.map(|r| r.to_string()))?;
        opt_elem(&mut wr, "LastSaved", props.last_saved.as_ref().map(print_datetime))?;
        elem(&mut wr, "ScheduleFromStart", print_bool(props.schedule_from_start))?;
        opt_elem(&mut wr, "StartDate", project.start_date().as_ref().map(print_datetime))?;
        opt_elem(&mut wr, "FinishDate", project.finish_date().as_ref().map(print_datetime))?;
        opt_elem(&mut wr, "CurrencySymbol", props.currency_symbol.as_deref())?;
        opt_elem(&mut wr, "CurrencyCode", props.currency_code.as_deref())?;

        let calendars: Cow<[Calendar]> = if project.calendars.is_empty() {
            Cow::Owned(vec![Calendar::standard(1)])
        } else {
            Cow::Borrowed(project.calendars.as_slice())
        };
        let calendar_uid = props.calendar_uid.or_else(|| calendars.first().map(|c| c.uid));
        opt_elem(&mut wr, "CalendarUID", calendar_uid.map(|u| u.to_string()))?;

        elem(&mut wr, "DefaultStartTime", &print_time(&props.default_start_time))?;
        elem(&mut wr, "DefaultFinishTime", &print_time(&props.default_finish_time))?;
        elem(&mut wr, "MinutesPerDay", &props.minutes_per_day.to_string())?;
        elem(&mut wr, "MinutesPerWeek", &props.minutes_per_week.to_string())?;
        elem(&mut wr, "DaysPerMonth", &props.days_per_month.to_string())?;

        start(&mut wr, "Calendars")?;
        for c in calendars.iter() {
            write_calendar(&mut wr, c)?;
        }
        end(&mut wr, "Calendars")?;

        start(&mut wr, "Tasks")?;
        for t in &project.tasks {
            write_task(&mut wr, t)?;
        }
        end(&mut wr, "Tasks")?;

        start(&mut wr, "Resources")?;
        for r in &project.resources {
            write_resource(&mut wr, r)?;
        }
        end(&mut wr, "Resources")?;

        start(&mut wr, "Assignments")?;
        for a in &project.assignments {
            write_assignment(&mut wr, a)?;
        }
        end(&mut wr, "Assignments")?;

        end(&mut wr, "Project")?;
        w.write_all(b"\n")?;
        Ok(())
    }
}

fn write_calendar<W: Write>(wr: &mut Writer<W>, c: &Calendar) -> Result<()> {
    start(wr, "Calendar")?;
    elem(wr, "UID", &c.uid.to_string())?;
    opt_elem(wr, "Name", c.name.as_deref())?;
    elem(wr, "IsBaseCalendar", print_bool(c.is_base_calendar))?;
    elem(wr, "BaseCalendarUID", &c.base_calendar_uid.unwrap_or(-1).to_string())?;

    if !c.week_days.is_empty() {
        start(wr, "WeekDays")?;
        for day in &c.week_days {
            start(wr, "WeekDay")?;
            elem(wr, "DayType", &day.day_type.to_string())?;
            elem(wr, "DayWorking", print_bool(day.working))?;
            if day.working && !day.times.is_empty() {
                start(wr, "WorkingTimes")?;
                for t in &day.times {
                    start(wr, "WorkingTime")?;
                    elem(wr, "FromTime", &print_time(&t.from))?;
                    elem(wr, "ToTime", &print_time(&t.to))?;
                    end(wr, "WorkingTime")?;
                }
                end(wr, "WorkingTimes")?;
            }
            end(wr, "WeekDay")?;
        }
        end(wr, "WeekDays")?;
    }
    end(wr, "Calendar")
}

fn write_task<W: Write>(wr: &mut Writer<W>, t: &Task) -> Result<()> {
    start(wr, "Task")?;
    elem(wr, "UID", &t.uid.to_string())?;
    opt_elem(wr, "ID", t.id.map(|v| v.to_string()))?;
    opt_elem(wr, "Name", t.name.as_deref())?;
    opt_elem(wr, "WBS", t.wbs.as_deref())?;
    opt_elem(wr, "OutlineNumber", t.outline_number.as_deref())?;
    opt_elem(wr, "OutlineLevel", t.outline_level.map(|v| v.to_string()))?;
    opt_elem(wr, "Priority", t.priority.map(|v| v.to_string()))?;
    opt_elem(wr, "Start", t.start.as_ref().map(print_datetime))?;
    opt_elem(wr, "Finish", t.finish.as_ref().map(print_datetime))?;
    if let Some(d) = &t.duration {
        elem(wr, "Duration", &print_duration(d))?;
        elem(wr, "DurationFormat", &d.format.code().to_string())?;
    }
    opt_elem(wr, "Work", t.work.as_ref().map(print_duration))?;
    elem(wr, "Milestone", print_bool(t.milestone))?;
    elem(wr, "Summary", print_bool(t.summary))?;
    opt_elem(wr, "PercentComplete", t.percent_complete.map(print_number))?;
    opt_elem(wr, "Cost", t.cost.as_ref().map(print_currency))?;
    opt_elem(wr, "ConstraintType", t.constraint_type.map(|c| c.code().to_string()))?;
    opt_elem(wr, "ConstraintDate", t.constraint_date.as_ref().map(print_datetime))?;
    opt_elem(wr, "Notes", t.notes.as_deref())?;

    for link in &t.predecessors {
        start(wr, "PredecessorLink")?;
        elem(wr, "PredecessorUID", &link.predecessor_uid.to_string())?;
        elem(wr, "Type", &link.kind.code().to_string())?;
        elem(wr, "CrossProject", "0")?;
        elem(wr, "LinkLag", &print_lag(&link.lag))?;
        elem(wr, "LagFormat", &link.lag.format.code().to_string())?;
        end(wr, "PredecessorLink")?;
    }
    end(wr, "Task")
}

fn write_resource<W: Write>(wr: &mut Writer<W>, r: &Resource) -> Result<()> {
    start(wr, "Resource")?;
    elem(wr, "UID", &r.uid.to_string())?;
    opt_elem(wr, "ID", r.id.map(|v| v.to_string()))?;
    opt_elem(wr, "Name", r.name.as_deref())?;
    elem(wr, "Type", &r.kind.code().to_string())?;
    opt_elem(wr, "Initials", r.initials.as_deref())?;
    opt_elem(wr, "Group", r.group.as_deref())?;
    opt_elem(wr, "EmailAddress", r.email.as_deref())?;
    opt_elem(wr, "MaxUnits", r.max_units.map(print_units))?;
    if let Some(rate) = &r.standard_rate {
        elem(wr, "StandardRate", &print_rate(rate))?;
        elem(wr, "StandardRateFormat", &RATE_FORMAT_PER_HOUR.to_string())?;
    }
    opt_elem(wr, "Cost", r.cost.as_ref().map(print_currency))?;
    if let Some(rate) = &r.overtime_rate {
        elem(wr, "OvertimeRate", &print_rate(rate))?;
        elem(wr, "OvertimeRateFormat", &RATE_FORMAT_PER_HOUR.to_string())?;
    }
    opt_elem(wr, "Notes", r.notes.as_deref())?;
    end(wr, "Resource")
}

fn write_assignment<W: Write>(wr: &mut Writer<W>, a: &Assignment) -> Result<()> {
    start(wr, "Assignment")?;
    elem(wr, "UID", &a.uid.to_string())?;
    elem(wr, "TaskUID", &a.task_uid.to_string())?;
    elem(wr, "ResourceUID", &a.resource_uid.to_string())?;
    opt_elem(wr, "Cost", a.cost.as_ref().map(print_currency))?;
    opt_elem(wr, "Finish", a.finish.as_ref().map(print_datetime))?;
    opt_elem(wr, "Start", a.start.as_ref().map(print_datetime))?;
    elem(wr, "Units", &print_units(a.units.unwrap_or(100.0)))?;
    opt_elem(wr, "Work", a.work.as_ref().map(print_duration))?;
    end(wr, "Assignment")
}

fn start<W: Write>(wr: &mut Writer<W>, name: &str) -> Result<()> {
    wr.write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml)
}

fn end<W: Write>(wr: &mut Writer<W>, name: &str) -> Result<()> {
    wr.write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml)
}

fn elem<W: Write>(wr: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    start(wr, name)?;
    wr.write_event(Event::Text(BytesText::new(text)))
        .map_err(xml)?;
    end(wr, name)
}

fn opt_elem<W: Write, S: AsRef<str>>(wr: &mut Writer<W>, name: &str, value: Option<S>) -> Result<()> {
    match value {
        Some(v) => elem(wr, name, v.as_ref()),
        None => Ok(()),
    }
}

fn xml<E: std::fmt::Display>(e: E) -> ProjError {
    ProjError::Xml(e.to_string())
}

/* ------------------------------- READ ----------------------------------- */

impl ReadFormat for Mspdi {
    fn read<R: BufRead + Seek>(r: R) -> Result<ProjectFile> {
        let mut reader = Reader::from_reader(r);
        reader.trim_text(true);

        let mut parser = MspdiParser::default();
        let mut path: Vec<String> = Vec::new();
        let mut text = String::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = local_name(&e);
                    check_root(&path, &name)?;
                    parser.open(&path, &name);
                    path.push(name);
                    text.clear();
                }
                Ok(Event::Empty(e)) => {
                    let name = local_name(&e);
                    check_root(&path, &name)?;
                    parser.open(&path, &name);
                    parser.close(&path, &name, "")?;
                }
                Ok(Event::Text(t)) => {
                    text.push_str(&t.unescape().map_err(xml)?);
                }
                Ok(Event::CData(c)) => {
                    text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
                Ok(Event::End(_)) => {
                    let name = path.pop().unwrap_or_default();
                    parser.close(&path, &name, text.trim())?;
                    text.clear();
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml(e)),
                _ => {}
            }
            buf.clear();
        }

        if !parser.seen_root {
            return Err(ProjError::Parse("missing <Project> root element".into()));
        }

        let mut project = parser.project;
        project.properties.file_type = Some("MSPDI".into());
        let dropped = project.prune_dangling();
        tracing::debug!(
            tasks = project.tasks.len(),
            resources = project.resources.len(),
            assignments = project.assignments.len(),
            dropped,
            "parsed MSPDI document"
        );
        Ok(project)
    }
}

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn check_root(path: &[String], name: &str) -> Result<()> {
    if path.is_empty() && name != "Project" {
        return Err(ProjError::Parse(format!(
            "expected <Project> root element, found <{name}>"
        )));
    }
    Ok(())
}

#[derive(Default)]
struct PendingLink {
    predecessor_uid: Option<i32>,
    kind: RelationType,
    lag: Duration,
    lag_format: Option<TimeUnit>,
}

#[derive(Default)]
struct PendingTime {
    from: Option<NaiveTime>,
    to: Option<NaiveTime>,
}

/// Состояние разбора: открытые сейчас объекты (задача, связь, ресурс …).
#[derive(Default)]
struct MspdiParser {
    project: ProjectFile,
    seen_root: bool,
    task: Option<Task>,
    duration_format: Option<TimeUnit>,
    link: Option<PendingLink>,
    resource: Option<Resource>,
    assignment: Option<Assignment>,
    calendar: Option<Calendar>,
    week_day: Option<WeekDay>,
    working_time: Option<PendingTime>,
}

impl MspdiParser {
    fn open(&mut self, path: &[String], name: &str) {
        let parent = path.last().map(String::as_str);
        let grandparent = path.len().checked_sub(2).map(|i| path[i].as_str());
        match (parent, name) {
            (None, "Project") => self.seen_root = true,
            (Some("Tasks"), "Task") => {
                self.task = Some(Task::default());
                self.duration_format = None;
            }
            (Some("Task"), "PredecessorLink") if self.task.is_some() => {
                self.link = Some(PendingLink::default());
            }
            (Some("Resources"), "Resource") => self.resource = Some(Resource::default()),
            (Some("Assignments"), "Assignment") => self.assignment = Some(Assignment::default()),
            (Some("Calendars"), "Calendar") => self.calendar = Some(Calendar::default()),
            // WorkWeeks/WorkWeek/WeekDays пропускаются, как и исключения
            (Some("WeekDays"), "WeekDay")
                if grandparent == Some("Calendar") && self.calendar.is_some() =>
            {
                self.week_day = Some(WeekDay::default());
            }
            (Some("WorkingTimes"), "WorkingTime")
                if grandparent == Some("WeekDay") && self.week_day.is_some() =>
            {
                self.working_time = Some(PendingTime::default());
            }
            _ => {}
        }
    }

    fn close(&mut self, path: &[String], name: &str, text: &str) -> Result<()> {
        let parent = path.last().map(String::as_str);
        let grandparent = path.len().checked_sub(2).map(|i| path[i].as_str());
        let closed = match (parent, name) {
            (Some("Tasks"), "Task") => self.finish_task(),
            (Some("Task"), "PredecessorLink") => self.finish_link(),
            (Some("Resources"), "Resource") => self.finish_resource(),
            (Some("Assignments"), "Assignment") => self.finish_assignment(),
            (Some("Calendars"), "Calendar") => self.finish_calendar(),
            (Some("WeekDays"), "WeekDay") if grandparent == Some("Calendar") => {
                self.finish_week_day()
            }
            (Some("WorkingTimes"), "WorkingTime") => self.finish_working_time(),
            _ => false,
        };
        if closed {
            return Ok(());
        }

        if text.is_empty() {
            return Ok(());
        }

        match parent {
            Some("Project") => self.project_field(name, text),
            Some("Task") => self.task_field(name, text),
            Some("PredecessorLink") => self.link_field(name, text),
            Some("Resource") => self.resource_field(name, text),
            Some("Assignment") => self.assignment_field(name, text),
            Some("Calendar") => self.calendar_field(name, text),
            Some("WeekDay") => self.week_day_field(name, text),
            Some("WorkingTime") => self.working_time_field(name, text),
            _ => Ok(()),
        }
    }

    fn project_field(&mut self, name: &str, text: &str) -> Result<()> {
        let p = &mut self.project.properties;
        let owned = || Some(text.to_string());
        match name {
            "Name" => p.name = owned(),
            "Title" => p.title = owned(),
            "Subject" => p.subject = owned(),
            "Category" => p.category = owned(),
            "Company" => p.company = owned(),
            "Manager" => p.manager = owned(),
            "Author" => p.author = owned(),
            "Revision" => p.revision = Some(parse_int(name, text)?),
            "CreationDate" => p.creation_date = Some(parse_datetime(text)?),
            "LastSaved" => p.last_saved = Some(parse_datetime(text)?),
            "ScheduleFromStart" => p.schedule_from_start = parse_bool(text),
            "StartDate" => p.start_date = Some(parse_datetime(text)?),
            "FinishDate" => p.finish_date = Some(parse_datetime(text)?),
            "CurrencyCode" => p.currency_code = owned(),
            "CurrencySymbol" => p.currency_symbol = owned(),
            "MinutesPerDay" => p.minutes_per_day = parse_int(name, text)?,
            "MinutesPerWeek" => p.minutes_per_week = parse_int(name, text)?,
            "DaysPerMonth" => p.days_per_month = parse_int(name, text)?,
            "DefaultStartTime" => p.default_start_time = parse_time(text)?,
            "DefaultFinishTime" => p.default_finish_time = parse_time(text)?,
            "CalendarUID" => p.calendar_uid = Some(parse_int(name, text)?),
            _ => {}
        }
        Ok(())
    }

    fn task_field(&mut self, name: &str, text: &str) -> Result<()> {
        let Some(t) = self.task.as_mut() else {
            return Ok(());
        };
        match name {
            "UID" => t.uid = parse_int(name, text)?,
            "ID" => t.id = Some(parse_int(name, text)?),
            "Name" => t.name = Some(text.to_string()),
            "WBS" => t.wbs = Some(text.to_string()),
            "OutlineNumber" => t.outline_number = Some(text.to_string()),
            "OutlineLevel" => t.outline_level = Some(parse_int(name, text)?),
            "Priority" => t.priority = Some(parse_int(name, text)?),
            "Start" => t.start = Some(parse_datetime(text)?),
            "Finish" => t.finish = Some(parse_datetime(text)?),
            "Duration" => t.duration = Some(parse_duration(text, TimeUnit::Days)?),
            "DurationFormat" => {
                self.duration_format = TimeUnit::from_code(parse_int(name, text)?);
            }
            "Work" => t.work = Some(parse_duration(text, TimeUnit::Hours)?),
            "Milestone" => t.milestone = parse_bool(text),
            "Summary" => t.summary = parse_bool(text),
            "PercentComplete" => t.percent_complete = Some(parse_f64(name, text)?),
            "Cost" => t.cost = Some(parse_currency(text)?),
            "ConstraintType" => t.constraint_type = ConstraintType::from_code(parse_int(name, text)?),
            "ConstraintDate" => t.constraint_date = Some(parse_datetime(text)?),
            "Notes" => t.notes = Some(text.to_string()),
            _ => {}
        }
        Ok(())
    }

    fn link_field(&mut self, name: &str, text: &str) -> Result<()> {
        let Some(l) = self.link.as_mut() else {
            return Ok(());
        };
        match name {
            "PredecessorUID" => l.predecessor_uid = Some(parse_int(name, text)?),
            "Type" => l.kind = RelationType::from_code(parse_int(name, text)?),
            "LinkLag" => l.lag = parse_lag(text, TimeUnit::Days)?,
            "LagFormat" => l.lag_format = TimeUnit::from_code(parse_int(name, text)?),
            _ => {}
        }
        Ok(())
    }

    fn resource_field(&mut self, name: &str, text: &str) -> Result<()> {
        let Some(r) = self.resource.as_mut() else {
            return Ok(());
        };
        match name {
            "UID" => r.uid = parse_int(name, text)?,
            "ID" => r.id = Some(parse_int(name, text)?),
            "Name" => r.name = Some(text.to_string()),
            "Type" => r.kind = ResourceType::from_code(parse_int(name, text)?),
            "Initials" => r.initials = Some(text.to_string()),
            "Group" => r.group = Some(text.to_string()),
            "EmailAddress" => r.email = Some(text.to_string()),
            "MaxUnits" => r.max_units = Some(parse_units(text)?),
            "StandardRate" => r.standard_rate = Some(parse_rate(text)?),
            "OvertimeRate" => r.overtime_rate = Some(parse_rate(text)?),
            "Cost" => r.cost = Some(parse_currency(text)?),
            "Notes" => r.notes = Some(text.to_string()),
            _ => {}
        }
        Ok(())
    }

    fn assignment_field(&mut self, name: &str, text: &str) -> Result<()> {
        let Some(a) = self.assignment.as_mut() else {
            return Ok(());
        };
        match name {
            "UID" => a.uid = parse_int(name, text)?,
            "TaskUID" => a.task_uid = parse_int(name, text)?,
            "ResourceUID" => a.resource_uid = parse_int(name, text)?,
            "Units" => a.units = Some(parse_units(text)?),
            "Work" => a.work = Some(parse_duration(text, TimeUnit::Hours)?),
            "Start" => a.start = Some(parse_datetime(text)?),
            "Finish" => a.finish = Some(parse_datetime(text)?),
            "Cost" => a.cost = Some(parse_currency(text)?),
            _ => {}
        }
        Ok(())
    }

    fn calendar_field(&mut self, name: &str, text: &str) -> Result<()> {
        let Some(c) = self.calendar.as_mut() else {
            return Ok(());
        };
        match name {
            "UID" => c.uid = parse_int(name, text)?,
            "Name" => c.name = Some(text.to_string()),
            "IsBaseCalendar" => c.is_base_calendar = parse_bool(text),
            "BaseCalendarUID" => {
                let uid: i32 = parse_int(name, text)?;
                c.base_calendar_uid = (uid >= 0).then_some(uid);
            }
            _ => {}
        }
        Ok(())
    }

    fn week_day_field(&mut self, name: &str, text: &str) -> Result<()> {
        let Some(d) = self.week_day.as_mut() else {
            return Ok(());
        };
        match name {
            "DayType" => d.day_type = parse_int(name, text)?,
            "DayWorking" => d.working = parse_bool(text),
            _ => {}
        }
        Ok(())
    }

    fn working_time_field(&mut self, name: &str, text: &str) -> Result<()> {
        let Some(t) = self.working_time.as_mut() else {
            return Ok(());
        };
        match name {
            "FromTime" => t.from = Some(parse_time(text)?),
            "ToTime" => t.to = Some(parse_time(text)?),
            _ => {}
        }
        Ok(())
    }

    fn finish_task(&mut self) -> bool {
        let Some(mut t) = self.task.take() else {
            return false;
        };
        if let (Some(format), Some(d)) = (self.duration_format.take(), t.duration.as_mut()) {
            d.format = format;
        }
        self.project.tasks.push(t);
        true
    }

    fn finish_resource(&mut self) -> bool {
        let Some(r) = self.resource.take() else {
            return false;
        };
        self.project.resources.push(r);
        true
    }

    fn finish_calendar(&mut self) -> bool {
        let Some(c) = self.calendar.take() else {
            return false;
        };
        self.project.calendars.push(c);
        true
    }

    fn finish_link(&mut self) -> bool {
        let (Some(link), Some(task)) = (self.link.take(), self.task.as_mut()) else {
            return false;
        };
        let Some(predecessor_uid) = link.predecessor_uid else {
            tracing::debug!(task = task.uid, "predecessor link without PredecessorUID");
            return true;
        };
        let mut lag = link.lag;
        if let Some(format) = link.lag_format {
            lag.format = format;
        }
        task.predecessors.push(Relation {
            predecessor_uid,
            kind: link.kind,
            lag,
        });
        true
    }

    fn finish_assignment(&mut self) -> bool {
        let Some(a) = self.assignment.take() else {
            return false;
        };
        if a.resource_uid == NULL_RESOURCE_UID {
            tracing::debug!(assignment = a.uid, "skipping assignment without resource");
        } else {
            self.project.assignments.push(a);
        }
        true
    }

    fn finish_week_day(&mut self) -> bool {
        let Some(day) = self.week_day.take() else {
            return false;
        };
        // DayType 0: исключения, не поддерживаются
        if let (1..=7, Some(c)) = (day.day_type, self.calendar.as_mut()) {
            c.week_days.push(day);
        }
        true
    }

    fn finish_working_time(&mut self) -> bool {
        let Some(time) = self.working_time.take() else {
            return false;
        };
        if let (Some(from), Some(to), Some(day)) = (time.from, time.to, self.week_day.as_mut()) {
            day.times.push(WorkingTime { from, to });
        }
        true
    }
}
