use time::{macros::format_description, Date, Duration, OffsetDateTime};

use super::dto::{CreateMealLogRequest, DayTotal};
use super::repo::NewMealLog;
use super::repo_types::MealLogRow;
use crate::error::{AppError, AppResult};
use crate::nutrition::NutritionSnapshot;

pub const WEEK_DAYS: i64 = 7;
const MAX_TITLE_LEN: usize = 200;

pub fn parse_day(raw: &str) -> AppResult<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::validation("date must be formatted as YYYY-MM-DD"))
}

pub fn format_day(d: Date) -> String {
    format!("{:04}-{:02}-{:02}", d.year(), u8::from(d.month()), d.day())
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

pub fn day_or_today(raw: Option<&str>) -> AppResult<Date> {
    raw.map(parse_day).unwrap_or_else(|| Ok(today()))
}

pub fn validate<'a>(req: &'a CreateMealLogRequest) -> AppResult<NewMealLog<'a>> {
    let recipe_id = req.recipe_id.trim();
    if recipe_id.is_empty() {
        return Err(AppError::validation("recipeId is required"));
    }
    let recipe_title = req.recipe_title.trim();
    if recipe_title.is_empty() || recipe_title.len() > MAX_TITLE_LEN {
        return Err(AppError::validation("recipeTitle must be 1 to 200 characters"));
    }
    if !req.nutrition.is_valid() {
        return Err(AppError::validation("nutrition values must be non-negative numbers"));
    }
    Ok(NewMealLog {
        date: day_or_today(req.date.as_deref())?,
        recipe_id,
        recipe_title,
        nutrition: req.nutrition,
        meal_type: req.meal_type,
    })
}

/// First day of the seven-day window that ends on `end`.
pub fn week_start(end: Date) -> AppResult<Date> {
    end.checked_sub(Duration::days(WEEK_DAYS - 1))
        .ok_or_else(|| AppError::validation("end date out of range"))
}

/// One entry per calendar day from `start` through `end`, zero-filled.
/// Totals are recomputed from the rows every time.
pub fn daily_totals(start: Date, end: Date, rows: &[MealLogRow]) -> Vec<DayTotal> {
    let mut out = Vec::new();
    let mut day = Some(start);
    while let Some(d) = day.filter(|d| *d <= end) {
        let logs: Vec<&MealLogRow> = rows.iter().filter(|r| r.log_date == d).collect();
        out.push(DayTotal {
            date: format_day(d),
            meal_count: logs.len(),
            totals: logs.iter().map(|r| r.nutrition()).sum::<NutritionSnapshot>(),
        });
        day = d.next_day();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meal_logs::repo_types::MealLog;
    use time::macros::{date, datetime};
    use uuid::Uuid;

    fn row(day: Date, calories: f64, protein: f64) -> MealLogRow {
        MealLogRow {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            log_date: day,
            recipe_id: "716429".into(),
            recipe_title: "Pasta".into(),
            calories,
            protein,
            carbs: 10.0,
            fat: 5.0,
            meal_type: "lunch".into(),
            logged_at: datetime!(2024-03-01 12:00 UTC),
        }
    }

    #[test]
    fn parses_and_formats_calendar_days() {
        let d = parse_day("2024-03-09").unwrap();
        assert_eq!(d, date!(2024 - 03 - 09));
        assert_eq!(format_day(d), "2024-03-09");
        assert!(parse_day("09/03/2024").is_err());
        assert!(parse_day("2024-02-30").is_err());
    }

    #[test]
    fn week_window_covers_seven_days() {
        let end = date!(2024 - 03 - 03);
        assert_eq!(week_start(end).unwrap(), date!(2024 - 02 - 26));
    }

    #[test]
    fn totals_are_summed_per_day_and_zero_filled() {
        let end = date!(2024 - 03 - 03);
        let start = week_start(end).unwrap();
        let rows = vec![
            row(date!(2024 - 02 - 26), 500.0, 30.0),
            row(date!(2024 - 02 - 26), 250.5, 12.0),
            row(date!(2024 - 03 - 03), 800.0, 40.0),
        ];
        let days = daily_totals(start, end, &rows);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, "2024-02-26");
        assert_eq!(days[0].meal_count, 2);
        assert_eq!(days[0].totals.calories, 750.5);
        assert_eq!(days[0].totals.protein, 42.0);
        assert_eq!(days[0].totals.carbs, 20.0);
        assert_eq!(days[1].meal_count, 0);
        assert_eq!(days[1].totals, NutritionSnapshot::default());
        assert_eq!(days[6].date, "2024-03-03");
        assert_eq!(days[6].totals.calories, 800.0);
    }

    #[test]
    fn row_converts_to_api_type() {
        let log = MealLog::try_from(row(date!(2024 - 03 - 01), 1.0, 1.0)).unwrap();
        assert_eq!(log.date, "2024-03-01");
        let mut bad = row(date!(2024 - 03 - 01), 1.0, 1.0);
        bad.meal_type = "brunch".into();
        assert!(MealLog::try_from(bad).is_err());
    }
}
