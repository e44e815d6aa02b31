mod helpers;

use chrono::TimeDelta;
use helpers::*;
use proptest::prelude::*;
use strata::{DefaultResolution, Resolution, is_non_overlapping};
use strata_mock::total_units;

fn resolution() -> impl Strategy<Value = DefaultResolution> {
    prop::sample::select(DefaultResolution::all().to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn loads_are_ordered_and_agree_with_minutes(
        resolution in resolution(),
        offset_secs in 0i64..(3 * 24 * 60 * 60),
        len_secs in 1i64..(2 * 24 * 60 * 60),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let loader = loader();
            let start = t("2022-09-24T00:00:00Z") + TimeDelta::seconds(offset_secs);
            let end = start + TimeDelta::seconds(len_secs);

            let records = loader.load(resolution, start, end).await.unwrap();
            prop_assert!(is_non_overlapping(&records));
            prop_assert!(records.iter().all(|r| r.resolution == resolution));
            prop_assert!(records.iter().all(|r| r.start >= start && r.end <= end));
            if resolution != DefaultResolution::Minute && !records.is_empty() {
                prop_assert_eq!(records[0].start, start);
                prop_assert_eq!(records[records.len() - 1].end, end);
            }

            settle(&loader).await;
            let calls = source(&loader).calls();
            let minutes = loader.load(DefaultResolution::Minute, start, end).await.unwrap();
            prop_assert_eq!(total_units(&minutes), total_units(&records));
            prop_assert_eq!(source(&loader).calls(), calls);
            Ok(())
        })?;
    }
}

#[test]
fn minute_loads_cover_whole_minutes_only() {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    rt.block_on(async {
        let loader = loader();
        let (start, end) = (t("2022-09-26T10:00:30Z"), t("2022-09-26T10:05:30Z"));
        let minutes = loader.load(DefaultResolution::Minute, start, end).await.unwrap();
        assert_tiles(
            &minutes,
            DefaultResolution::Minute.round_up(start),
            DefaultResolution::Minute.round_down(end),
        );
        assert_eq!(minutes.len(), 4);
    });
}
