use crate::activity::{ActivityLog, Entry};
use crate::calendar::{CalendarView, MonthGrid, WEEKDAY_LABELS, describe_day, month_name};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CellView {
    pub day: u32,
    pub in_month: bool,
    pub date_key: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<Entry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalendarResponse {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub month_key: String,
    pub weekdays: Vec<String>,
    pub weeks: Vec<Vec<CellView>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayResponse {
    pub date_key: String,
    pub title: String,
    pub entry: Option<Entry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    pub saved: bool,
    pub entries: usize,
}

impl From<EntryRequest> for Entry {
    fn from(request: EntryRequest) -> Self {
        Entry::new(request.label, request.note).normalized()
    }
}

impl CalendarResponse {
    /// Labels come from the displayed month only; overflow cells stay bare.
    pub fn build(view: CalendarView, grid: &MonthGrid, log: &ActivityLog) -> Self {
        let month_key = grid.month_key.to_string();
        let month_data = log.month_data(&month_key);
        let weeks = grid
            .weeks
            .iter()
            .map(|week| {
                week.iter()
                    .map(|cell| {
                        let date_key = cell.date_key.to_string();
                        CellView {
                            day: cell.day,
                            in_month: cell.in_month,
                            title: describe_day(&cell.date_key),
                            entry: month_data.get(&date_key).cloned(),
                            date_key,
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            year: view.year,
            month: view.month,
            month_name: month_name(view.month).to_string(),
            month_key,
            weekdays: WEEKDAY_LABELS.iter().map(|day| day.to_string()).collect(),
            weeks,
        }
    }
}
