use chrono::Timelike;

use crate::data::types::{AqiData, HourlyAqiData};

/// Collapse history records into one entry per hour of day, averaging AQI.
/// Hours with no readings are omitted; output is ordered by hour.
pub fn hourly_breakdown(records: &[AqiData]) -> Vec<HourlyAqiData> {
    let mut buckets = [(0u64, 0u64); 24]; // (aqi sum, reading count)

    for record in records {
        let hour = record.timestamp.hour() as usize;
        buckets[hour].0 += u64::from(record.aqi);
        buckets[hour].1 += 1;
    }

    buckets
        .iter()
        .enumerate()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(hour, (sum, count))| HourlyAqiData {
            hour: hour as u8,
            aqi: ((*sum as f64 / *count as f64).round()) as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn reading(hour: u32, minute: u32, aqi: u32) -> AqiData {
        AqiData {
            aqi,
            pm25: 0.0,
            pm10: 0.0,
            co: 0.0,
            no2: 0.0,
            o3: 0.0,
            timestamp: Utc.with_ymd_and_hms(2026, 8, 7, hour, minute, 0).unwrap(),
            location: None,
        }
    }

    #[test]
    fn groups_by_hour_of_day_and_averages() {
        let records = vec![
            reading(8, 0, 100),
            reading(8, 30, 110),
            reading(9, 15, 80),
        ];

        let breakdown = hourly_breakdown(&records);

        assert_eq!(
            breakdown,
            vec![
                HourlyAqiData { hour: 8, aqi: 105 },
                HourlyAqiData { hour: 9, aqi: 80 },
            ]
        );
    }

    #[test]
    fn rounds_averages_to_nearest() {
        let records = vec![reading(14, 0, 100), reading(14, 20, 101)];
        assert_eq!(hourly_breakdown(&records)[0].aqi, 101);
    }

    #[test]
    fn empty_history_yields_empty_breakdown() {
        assert!(hourly_breakdown(&[]).is_empty());
    }
}
