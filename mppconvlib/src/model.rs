//! Модель расписания: свойства проекта, календари, задачи, ресурсы, назначения.

use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_MINUTES_PER_DAY: u32 = 480;
pub const DEFAULT_MINUTES_PER_WEEK: u32 = 2400;
pub const DEFAULT_DAYS_PER_MONTH: u32 = 20;

/// Единицы отображения длительности (коды DurationFormat/LagFormat из MSPDI).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TimeUnit {
    Minutes,
    ElapsedMinutes,
    Hours,
    ElapsedHours,
    #[default]
    Days,
    ElapsedDays,
    Weeks,
    ElapsedWeeks,
    Months,
    ElapsedMonths,
    Percent,
    ElapsedPercent,
}

impl TimeUnit {
    pub fn code(self) -> u32 {
        match self {
            TimeUnit::Minutes => 3,
            TimeUnit::ElapsedMinutes => 4,
            TimeUnit::Hours => 5,
            TimeUnit::ElapsedHours => 6,
            TimeUnit::Days => 7,
            TimeUnit::ElapsedDays => 8,
            TimeUnit::Weeks => 9,
            TimeUnit::ElapsedWeeks => 10,
            TimeUnit::Months => 11,
            TimeUnit::ElapsedMonths => 12,
            TimeUnit::Percent => 19,
            TimeUnit::ElapsedPercent => 20,
        }
    }

    /// Коды 35..=52 — «оценочные» (m?, d? …), смещены на 32 относительно базовых.
    pub fn from_code(code: u32) -> Option<TimeUnit> {
        let base = if (35..=52).contains(&code) { code - 32 } else { code };
        Some(match base {
            3 => TimeUnit::Minutes,
            4 => TimeUnit::ElapsedMinutes,
            5 => TimeUnit::Hours,
            6 => TimeUnit::ElapsedHours,
            7 => TimeUnit::Days,
            8 => TimeUnit::ElapsedDays,
            9 => TimeUnit::Weeks,
            10 => TimeUnit::ElapsedWeeks,
            11 => TimeUnit::Months,
            12 => TimeUnit::ElapsedMonths,
            19 => TimeUnit::Percent,
            20 => TimeUnit::ElapsedPercent,
            _ => return None,
        })
    }
}

/// Рабочее время в минутах плюс единица, в которой его показывать.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Duration {
    pub minutes: f64,
    pub format: TimeUnit,
}

impl Duration {
    pub fn new(minutes: f64, format: TimeUnit) -> Self {
        Self { minutes, format }
    }

    pub fn as_hours(&self) -> f64 {
        self.minutes / 60.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RelationType {
    FinishFinish,
    #[default]
    FinishStart,
    StartFinish,
    StartStart,
}

impl RelationType {
    pub fn code(self) -> u32 {
        match self {
            RelationType::FinishFinish => 0,
            RelationType::FinishStart => 1,
            RelationType::StartFinish => 2,
            RelationType::StartStart => 3,
        }
    }

    /// Неизвестные коды трактуются как FS.
    pub fn from_code(code: u32) -> RelationType {
        match code {
            0 => RelationType::FinishFinish,
            2 => RelationType::StartFinish,
            3 => RelationType::StartStart,
            _ => RelationType::FinishStart,
        }
    }
}

/// Связь с предшественником; хранится у задачи-последователя.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relation {
    pub predecessor_uid: i32,
    pub kind: RelationType,
    pub lag: Duration,
}

impl Relation {
    /// Задержка в целых часах.
    pub fn lag_hours(&self) -> i64 {
        self.lag.as_hours().round() as i64
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ConstraintType {
    #[default]
    AsSoonAsPossible,
    AsLateAsPossible,
    MustStartOn,
    MustFinishOn,
    StartNoEarlierThan,
    StartNoLaterThan,
    FinishNoEarlierThan,
    FinishNoLaterThan,
}

impl ConstraintType {
    pub fn code(self) -> u32 {
        match self {
            ConstraintType::AsSoonAsPossible => 0,
            ConstraintType::AsLateAsPossible => 1,
            ConstraintType::MustStartOn => 2,
            ConstraintType::MustFinishOn => 3,
            ConstraintType::StartNoEarlierThan => 4,
            ConstraintType::StartNoLaterThan => 5,
            ConstraintType::FinishNoEarlierThan => 6,
            ConstraintType::FinishNoLaterThan => 7,
        }
    }

    pub fn from_code(code: u32) -> Option<ConstraintType> {
        Some(match code {
            0 => ConstraintType::AsSoonAsPossible,
            1 => ConstraintType::AsLateAsPossible,
            2 => ConstraintType::MustStartOn,
            3 => ConstraintType::MustFinishOn,
            4 => ConstraintType::StartNoEarlierThan,
            5 => ConstraintType::StartNoLaterThan,
            6 => ConstraintType::FinishNoEarlierThan,
            7 => ConstraintType::FinishNoLaterThan,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ResourceType {
    Material,
    #[default]
    Work,
    Cost,
}

impl ResourceType {
    pub fn code(self) -> u32 {
        match self {
            ResourceType::Material => 0,
            ResourceType::Work => 1,
            ResourceType::Cost => 2,
        }
    }

    pub fn from_code(code: u32) -> ResourceType {
        match code {
            0 => ResourceType::Material,
            2 => ResourceType::Cost,
            _ => ResourceType::Work,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectProperties {
    pub name: Option<String>,
    pub title: Option<String>,
    pub subject: Option<String>,
    pub category: Option<String>,
    pub company: Option<String>,
    pub manager: Option<String>,
    pub author: Option<String>,
    pub revision: Option<u32>,
    pub creation_date: Option<NaiveDateTime>,
    pub last_saved: Option<NaiveDateTime>,
    pub start_date: Option<NaiveDateTime>,
    pub finish_date: Option<NaiveDateTime>,
    pub schedule_from_start: bool,
    pub currency_code: Option<String>,
    pub currency_symbol: Option<String>,
    pub minutes_per_day: u32,
    pub minutes_per_week: u32,
    pub days_per_month: u32,
    pub default_start_time: NaiveTime,
    pub default_finish_time: NaiveTime,
    pub calendar_uid: Option<i32>,
    /// Тип исходного файла, например `MPP14` или `MSPDI`.
    pub file_type: Option<String>,
}

impl Default for ProjectProperties {
    fn default() -> Self {
        Self {
            name: None,
            title: None,
            subject: None,
            category: None,
            company: None,
            manager: None,
            author: None,
            revision: None,
            creation_date: None,
            last_saved: None,
            start_date: None,
            finish_date: None,
            schedule_from_start: true,
            currency_code: None,
            currency_symbol: None,
            minutes_per_day: DEFAULT_MINUTES_PER_DAY,
            minutes_per_week: DEFAULT_MINUTES_PER_WEEK,
            days_per_month: DEFAULT_DAYS_PER_MONTH,
            default_start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            default_finish_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
            calendar_uid: None,
            file_type: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkingTime {
    pub from: NaiveTime,
    pub to: NaiveTime,
}

/// `day_type`: 1 = воскресенье … 7 = суббота.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct WeekDay {
    pub day_type: u8,
    pub working: bool,
    pub times: Vec<WorkingTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Calendar {
    pub uid: i32,
    pub name: Option<String>,
    pub is_base_calendar: bool,
    pub base_calendar_uid: Option<i32>,
    pub week_days: Vec<WeekDay>,
}

impl Calendar {
    /// Стандартный календарь: пн–пт, 08:00–12:00 и 13:00–17:00.
    pub fn standard(uid: i32) -> Calendar {
        let hm = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or_default();
        let shifts = vec![
            WorkingTime { from: hm(8), to: hm(12) },
            WorkingTime { from: hm(13), to: hm(17) },
        ];
        let week_days = (1..=7u8)
            .map(|day_type| {
                let working = (2..=6).contains(&day_type);
                WeekDay {
                    day_type,
                    working,
                    times: if working { shifts.clone() } else { Vec::new() },
                }
            })
            .collect();

        Calendar {
            uid,
            name: Some("Standard".into()),
            is_base_calendar: true,
            base_calendar_uid: None,
            week_days,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Task {
    pub uid: i32,
    pub id: Option<i32>,
    pub name: Option<String>,
    pub wbs: Option<String>,
    pub outline_number: Option<String>,
    pub outline_level: Option<u32>,
    pub priority: Option<u32>,
    pub start: Option<NaiveDateTime>,
    pub finish: Option<NaiveDateTime>,
    pub duration: Option<Duration>,
    pub work: Option<Duration>,
    pub milestone: bool,
    pub summary: bool,
    pub percent_complete: Option<f64>,
    pub cost: Option<Decimal>,
    pub constraint_type: Option<ConstraintType>,
    pub constraint_date: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub predecessors: Vec<Relation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Resource {
    pub uid: i32,
    pub id: Option<i32>,
    pub name: Option<String>,
    pub kind: ResourceType,
    pub initials: Option<String>,
    pub group: Option<String>,
    pub email: Option<String>,
    /// Проценты: 100.0 = один полный ресурс.
    pub max_units: Option<f64>,
    /// Ставки за час.
    pub standard_rate: Option<Decimal>,
    pub overtime_rate: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Assignment {
    pub uid: i32,
    pub task_uid: i32,
    pub resource_uid: i32,
    /// Проценты, как у `Resource::max_units`.
    pub units: Option<f64>,
    pub work: Option<Duration>,
    pub start: Option<NaiveDateTime>,
    pub finish: Option<NaiveDateTime>,
    pub cost: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProjectFile {
    pub properties: ProjectProperties,
    pub calendars: Vec<Calendar>,
    pub tasks: Vec<Task>,
    pub resources: Vec<Resource>,
    pub assignments: Vec<Assignment>,
}

impl ProjectFile {
    pub fn task(&self, uid: i32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.uid == uid)
    }

    pub fn resource(&self, uid: i32) -> Option<&Resource> {
        self.resources.iter().find(|r| r.uid == uid)
    }

    pub fn calendar(&self, uid: i32) -> Option<&Calendar> {
        self.calendars.iter().find(|c| c.uid == uid)
    }

    /// Родитель по номеру структуры: "1.2.3" -> задача с номером "1.2".
    pub fn parent_task_uid(&self, task: &Task) -> Option<i32> {
        let number = task.outline_number.as_deref()?;
        let (parent, _) = number.rsplit_once('.')?;
        self.tasks
            .iter()
            .find(|t| t.outline_number.as_deref() == Some(parent))
            .map(|t| t.uid)
    }

    pub fn start_date(&self) -> Option<NaiveDateTime> {
        self.properties
            .start_date
            .or_else(|| self.tasks.iter().filter_map(|t| t.start).min())
    }

    pub fn finish_date(&self) -> Option<NaiveDateTime> {
        self.properties
            .finish_date
            .or_else(|| self.tasks.iter().filter_map(|t| t.finish).max())
    }

    /// Удаляет связи на несуществующие задачи и назначения без задачи/ресурса.
    /// Возвращает число удалённых элементов.
    pub fn prune_dangling(&mut self) -> usize {
        let task_uids: HashSet<i32> = self.tasks.iter().map(|t| t.uid).collect();
        let resource_uids: HashSet<i32> = self.resources.iter().map(|r| r.uid).collect();
        let mut dropped = 0;

        for task in &mut self.tasks {
            let successor = task.uid;
            task.predecessors.retain(|rel| {
                let keep = task_uids.contains(&rel.predecessor_uid);
                if !keep {
                    tracing::warn!(
                        successor,
                        predecessor = rel.predecessor_uid,
                        "dropping link to unknown predecessor task"
                    );
                    dropped += 1;
                }
                keep
            });
        }

        self.assignments.retain(|a| {
            let keep = task_uids.contains(&a.task_uid) && resource_uids.contains(&a.resource_uid);
            if !keep {
                tracing::warn!(
                    assignment = a.uid,
                    task = a.task_uid,
                    resource = a.resource_uid,
                    "dropping assignment with missing task or resource"
                );
                dropped += 1;
            }
            keep
        });

        dropped
    }
}
