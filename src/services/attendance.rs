//! # 출결 계산 서비스
//!
//! DB와 무관한 순수 함수들입니다.
//!
//! - `normalize_date()`: 입력 날짜를 UTC 달력 날짜(자정)로 정규화
//! - `WindowPolicy`: 출석률 집계 기간 정책 (전체 기록 / 최근 N일)
//! - `resolve_window()`: 요청 쿼리와 정책으로 실제 집계 기간 결정
//! - `attendance_percentages()`: 학생별 출석률 집계
//!
//! 기록(쓰기)과 조회(읽기) 양쪽이 같은 `normalize_date()`를 사용하므로,
//! `2024-03-01T15:30:00Z`로 기록한 레코드를 `2024-03-01`로 조회할 수 있습니다.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};

use crate::error::AppError;
use crate::models::{DateWindow, PercentageQuery, StatusSample};

/// 날짜+시각 입력에서 허용하는 형식 (오프셋 없는 경우, UTC로 간주)
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// 날짜 문자열을 달력 날짜로 정규화합니다. 시각 정보는 버립니다.
///
/// 허용 형식:
/// - `2024-03-01`
/// - RFC 3339: `2024-03-01T15:30:00Z`, `2024-03-01T01:00:00+09:00` (UTC로 변환 후 날짜만)
/// - 오프셋 없는 날짜+시각: `2024-03-01T15:30:00`, `2024-03-01 15:30`
pub fn normalize_date(input: &str) -> Result<NaiveDate, AppError> {
    let value = input.trim();
    if value.is_empty() {
        return Err(AppError::Validation("date is required".to_string()));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.with_timezone(&Utc).date_naive());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|datetime| datetime.date())
        .ok_or_else(|| AppError::Validation(format!("invalid date: {value:?}")))
}

/// 출석률 집계 기간 정책
///
/// 요청에 기간이 지정되지 않았을 때 적용됩니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WindowPolicy {
    /// 전체 기록
    #[default]
    AllTime,
    /// 오늘(UTC) 기준 최근 N일: `date >= today - N days`
    TrailingDays(u32),
}

impl WindowPolicy {
    /// `""`, `"0"`, `"all"` → 전체 기록, 숫자 → 최근 N일, 그 외 → None
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "0" | "all" => Some(WindowPolicy::AllTime),
            days => days.parse().ok().map(WindowPolicy::TrailingDays),
        }
    }

    pub fn resolve(self, today: NaiveDate) -> DateWindow {
        match self {
            WindowPolicy::AllTime => DateWindow::default(),
            WindowPolicy::TrailingDays(days) => DateWindow {
                start: today.checked_sub_days(Days::new(days.into())),
                end: None,
            },
        }
    }
}

/// 요청 쿼리에 기간이 하나라도 있으면 그것을, 없으면 정책을 적용합니다.
pub fn resolve_window(
    policy: WindowPolicy,
    query: &PercentageQuery,
    today: NaiveDate,
) -> Result<DateWindow, AppError> {
    let start = parse_bound(query.window_start.as_deref())?;
    let end = parse_bound(query.window_end.as_deref())?;

    if start.is_none() && end.is_none() {
        return Ok(policy.resolve(today));
    }

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(AppError::Validation(
                "windowStart must not be after windowEnd".to_string(),
            ));
        }
    }

    Ok(DateWindow { start, end })
}

fn parse_bound(value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => normalize_date(value).map(Some),
    }
}

/// 학생 한 명의 누적 카운터
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub total: u64,
    pub attended: u64,
}

impl Tally {
    /// 반올림(0.5 올림)한 정수 백분율. 기록이 없으면 0.
    ///
    /// 부동소수점 대신 `(200a + t) / 2t`로 계산합니다.
    pub fn percentage(&self) -> u32 {
        // 기록이 없으면 0으로 나누지 않고 0%
        if self.total == 0 {
            return 0;
        }
        ((200 * self.attended + self.total) / (2 * self.total)) as u32
    }
}

/// 학생별 출석률을 계산합니다.
///
/// - `roster`: 결과에 반드시 포함할 학생 (기록이 없으면 0%)
/// - `samples`: 집계 기간 안의 레코드
///
/// 한 번의 순회로 누적하므로 입력 순서와 무관하게 같은 결과가 나오며,
/// `BTreeMap`이라 학생 ID 오름차순으로 직렬화됩니다.
pub fn attendance_percentages<R, S>(roster: R, samples: S) -> BTreeMap<String, u32>
where
    R: IntoIterator<Item = String>,
    S: IntoIterator<Item = StatusSample>,
{
    let mut tallies: BTreeMap<String, Tally> = roster
        .into_iter()
        .map(|student_id| (student_id, Tally::default()))
        .collect();

    for sample in samples {
        let tally = tallies.entry(sample.student_id).or_default();
        tally.total += 1;
        if sample.status.is_attended() {
            tally.attended += 1;
        }
    }

    tallies
        .into_iter()
        .map(|(student_id, tally)| (student_id, tally.percentage()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceStatus::{self, Absent, Online, Present};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample(student_id: &str, status: AttendanceStatus) -> StatusSample {
        StatusSample {
            student_id: student_id.to_string(),
            status,
        }
    }

    #[test]
    fn normalizes_supported_formats() {
        let expected = ymd(2024, 3, 1);
        for input in [
            "2024-03-01",
            " 2024-03-01 ",
            "2024-03-01T15:30:00Z",
            "2024-03-01T15:30:00.250Z",
            "2024-03-01T15:30:00",
            "2024-03-01T15:30",
            "2024-03-01 08:00:00",
            "2024-03-02T01:00:00+09:00",
        ] {
            assert_eq!(normalize_date(input).unwrap(), expected, "input {input:?}");
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        for input in ["", "   ", "yesterday", "2024-13-01", "2024-02-30", "01/03/2024"] {
            assert!(normalize_date(input).is_err(), "input {input:?}");
        }
    }

    #[test]
    fn mixed_statuses_round_to_75() {
        let samples = vec![
            sample("S1", Present),
            sample("S1", Absent),
            sample("S1", Online),
            sample("S1", Present),
        ];
        let result = attendance_percentages(Vec::new(), samples);
        assert_eq!(result["S1"], 75);
    }

    #[test]
    fn rounds_half_up() {
        // 1/8 = 12.5% → 13, 2/3 = 66.7% → 67, 1/3 = 33.3% → 33
        assert_eq!(Tally { total: 8, attended: 1 }.percentage(), 13);
        assert_eq!(Tally { total: 3, attended: 2 }.percentage(), 67);
        assert_eq!(Tally { total: 3, attended: 1 }.percentage(), 33);
        assert_eq!(Tally { total: 2, attended: 2 }.percentage(), 100);
    }

    #[test]
    fn roster_students_without_records_get_zero() {
        let result = attendance_percentages(
            vec!["S1".to_string(), "S2".to_string()],
            vec![sample("S1", Online)],
        );
        assert_eq!(result["S1"], 100);
        assert_eq!(result["S2"], 0);
        assert_eq!(Tally::default().percentage(), 0);
    }

    #[test]
    fn result_does_not_depend_on_record_order() {
        let forward = vec![
            sample("S1", Present),
            sample("S2", Absent),
            sample("S1", Absent),
            sample("S2", Online),
            sample("S1", Online),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(
            attendance_percentages(Vec::new(), forward),
            attendance_percentages(Vec::new(), reversed)
        );
    }

    #[test]
    fn parses_window_policy() {
        assert_eq!(WindowPolicy::parse(""), Some(WindowPolicy::AllTime));
        assert_eq!(WindowPolicy::parse("ALL"), Some(WindowPolicy::AllTime));
        assert_eq!(WindowPolicy::parse("0"), Some(WindowPolicy::AllTime));
        assert_eq!(WindowPolicy::parse("30"), Some(WindowPolicy::TrailingDays(30)));
        assert_eq!(WindowPolicy::parse("-5"), None);
        assert_eq!(WindowPolicy::parse("month"), None);
    }

    #[test]
    fn trailing_policy_starts_n_days_ago() {
        let window = WindowPolicy::TrailingDays(30).resolve(ymd(2024, 3, 31));
        assert_eq!(window.start, Some(ymd(2024, 3, 1)));
        assert_eq!(window.end, None);
        assert_eq!(WindowPolicy::AllTime.resolve(ymd(2024, 3, 31)), DateWindow::default());
    }

    #[test]
    fn explicit_query_overrides_policy() {
        let query = PercentageQuery {
            window_start: Some("2024-01-01".into()),
            window_end: None,
        };
        let window = resolve_window(WindowPolicy::TrailingDays(7), &query, ymd(2024, 6, 1)).unwrap();
        assert_eq!(window, DateWindow { start: Some(ymd(2024, 1, 1)), end: None });

        let empty = PercentageQuery::default();
        let window = resolve_window(WindowPolicy::TrailingDays(7), &empty, ymd(2024, 6, 1)).unwrap();
        assert_eq!(window.start, Some(ymd(2024, 5, 25)));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let query = PercentageQuery {
            window_start: Some("2024-02-01".into()),
            window_end: Some("2024-01-01".into()),
        };
        assert!(resolve_window(WindowPolicy::AllTime, &query, ymd(2024, 6, 1)).is_err());
    }
}
