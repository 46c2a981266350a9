use crate::calendar::{date_key, month_key, month_label, week_key, week_label};
use crate::models::{
    ActivityKind, Board, Configuration, ControlView, Event, GainRow, GainStatus, LossRow,
};
use chrono::NaiveDate;

pub fn done_today(log: &[Event], activity_id: &str, date: &str) -> bool {
    log.iter()
        .any(|event| event.activity_id == activity_id && event.date == date)
}

pub fn weekly_count(log: &[Event], activity_id: &str, week: &str) -> usize {
    log.iter()
        .filter(|event| event.activity_id == activity_id && event.week == week)
        .count()
}

/// Signed sum of every event dated inside `month` (`YYYY-MM`).
///
/// Malformed point values count as zero; unknown event types are skipped.
pub fn monthly_total(log: &[Event], month: &str) -> f64 {
    log.iter()
        .filter(|event| event.date.starts_with(month))
        .map(|event| match event.activity_kind() {
            Some(ActivityKind::Gain) => event.points.amount(),
            Some(ActivityKind::Loss) => -event.points.amount(),
            None => 0.0,
        })
        .sum()
}

pub fn build_board<F>(config: &Configuration, log: &[Event], date: NaiveDate, control: F) -> Board
where
    F: Fn(&str) -> ControlView,
{
    let day = date_key(date);
    let week = week_key(date);
    let month = month_key(date);

    let gains = config
        .gains
        .iter()
        .map(|item| {
            let weekly = weekly_count(log, &item.id, &week);
            let done = done_today(log, &item.id, &day);
            let status = if done {
                GainStatus::DoneToday
            } else if weekly >= item.max_per_week as usize {
                GainStatus::WeeklyLimit
            } else {
                GainStatus::Available
            };
            let progress = if item.max_per_week == 0 {
                100.0
            } else {
                (weekly as f64 / f64::from(item.max_per_week) * 100.0).min(100.0)
            };
            GainRow {
                id: item.id.clone(),
                name: item.name.clone(),
                points: item.points,
                max_per_week: item.max_per_week,
                weekly_count: weekly,
                done_today: done,
                status,
                progress,
                control: control(&item.id),
            }
        })
        .collect();

    let losses = config
        .losses
        .iter()
        .map(|item| LossRow {
            id: item.id.clone(),
            name: item.name.clone(),
            points: item.points,
            control: control(&item.id),
        })
        .collect();

    Board {
        week_label: week_label(&week).to_string(),
        month_label: month_label(date),
        monthly_total: monthly_total(log, &month),
        date: day,
        week,
        month,
        gains,
        losses,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::calendar::parse_date;
    use crate::models::{GainActivity, LossActivity, Points};
    use chrono::{DateTime, Duration, Utc};
    use serde_json::json;

    pub(crate) fn event(
        id: &str,
        activity_id: &str,
        kind: &str,
        points: f64,
        date: &str,
        seq: i64,
    ) -> Event {
        let base = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Event {
            id: id.into(),
            activity_id: activity_id.into(),
            name: activity_id.into(),
            points: Points::from(points),
            date: date.into(),
            week: week_key(parse_date(date).unwrap()),
            kind: kind.into(),
            timestamp: base + Duration::seconds(seq),
        }
    }

    fn config() -> Configuration {
        Configuration {
            gains: vec![GainActivity {
                id: "a".into(),
                name: "A".into(),
                points: 10.0,
                max_per_week: 2,
            }],
            losses: vec![LossActivity {
                id: "b".into(),
                name: "B".into(),
                points: 4.0,
            }],
        }
    }

    #[test]
    fn monthly_total_nets_gains_and_losses() {
        let log = vec![
            event("1", "a", "gain", 10.0, "2024-03-04", 1),
            event("2", "b", "loss", 4.0, "2024-03-10", 2),
            event("3", "a", "gain", 10.0, "2024-04-01", 3),
        ];
        assert_eq!(monthly_total(&log, "2024-03"), 6.0);
        assert_eq!(monthly_total(&log, "2024-03"), monthly_total(&log, "2024-03"));
        assert_eq!(monthly_total(&log, "2024-05"), 0.0);
    }

    #[test]
    fn malformed_points_count_as_zero() {
        let mut broken = event("3", "a", "gain", 0.0, "2024-03-05", 3);
        broken.points = Points(json!("n/a"));
        let mut unknown = event("4", "a", "bonus", 50.0, "2024-03-05", 4);
        unknown.points = Points(json!(50));
        let log = vec![
            event("1", "a", "gain", 10.0, "2024-03-04", 1),
            event("2", "b", "loss", 4.0, "2024-03-10", 2),
            broken,
            unknown,
        ];
        assert_eq!(monthly_total(&log, "2024-03"), 6.0);
    }

    #[test]
    fn removed_activities_still_count() {
        let log = vec![
            event("1", "gone", "gain", 7.5, "2024-02-10", 1),
            event("2", "a", "gain", 10.0, "2024-02-11", 2),
        ];
        let board = build_board(
            &Configuration::default(),
            &log,
            parse_date("2024-02-20").unwrap(),
            |_| ControlView::Idle,
        );
        assert!(board.gains.is_empty());
        assert_eq!(board.monthly_total, 17.5);
    }

    #[test]
    fn board_reports_status_and_progress() {
        let log = vec![
            event("1", "a", "gain", 10.0, "2024-03-04", 1),
            event("2", "a", "gain", 10.0, "2024-03-05", 2),
            event("3", "b", "loss", 4.0, "2024-03-05", 3),
        ];
        let board = build_board(&config(), &log, parse_date("2024-03-06").unwrap(), |id| {
            if id == "b" {
                ControlView::Pending
            } else {
                ControlView::Idle
            }
        });
        assert_eq!(board.week, "2024-W10");
        assert_eq!(board.week_label, "W10");
        assert_eq!(board.month, "2024-03");
        assert_eq!(board.month_label, "March 2024");
        assert_eq!(board.gains[0].weekly_count, 2);
        assert_eq!(board.gains[0].status, GainStatus::WeeklyLimit);
        assert_eq!(board.gains[0].progress, 100.0);
        assert_eq!(board.losses[0].control, ControlView::Pending);
        assert_eq!(board.monthly_total, 16.0);

        let board = build_board(&config(), &log, parse_date("2024-03-05").unwrap(), |_| {
            ControlView::Idle
        });
        assert!(board.gains[0].done_today);
        assert_eq!(board.gains[0].status, GainStatus::DoneToday);
    }

    #[test]
    fn counts_are_per_activity() {
        let log = vec![
            event("1", "a", "gain", 10.0, "2024-03-04", 1),
            event("2", "x", "gain", 10.0, "2024-03-04", 2),
        ];
        assert!(done_today(&log, "a", "2024-03-04"));
        assert!(!done_today(&log, "a", "2024-03-05"));
        assert_eq!(weekly_count(&log, "a", "2024-W10"), 1);
        assert_eq!(weekly_count(&log, "b", "2024-W10"), 0);
    }
}
