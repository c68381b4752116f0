use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use campground_scan::{AvailabilityAggregator, CampsiteCatalog, FilterChain, ScanError};
use chrono::Utc;
use rec_gov::{MonthSource, RecordSource};

use crate::config::TaskConfig;
use crate::report::{SiteReport, TaskReport};

/// Check one campground: catalog, availability, filters, report.
///
/// Both filter lists and the date window are checked before anything is
/// fetched.
pub async fn run_task(
    records: &dyn RecordSource,
    months: Arc<dyn MonthSource>,
    task: &TaskConfig,
    page_size: usize,
) -> Result<TaskReport, ScanError> {
    let started = Instant::now();
    log::info!("🏕️ Checking {} (asset {})", task.name, task.asset_id);

    let campsite_chain = FilterChain::<CampsiteCatalog>::new(&task.campsite_filters)?;
    AvailabilityAggregator::months_for(&task.availability_filters)?;
    let aggregator = AvailabilityAggregator::new(task.asset_id.as_str(), months)
        .dropping_empty_sites(task.drop_empty_sites);
    aggregator.filter_chain(&task.availability_filters)?;

    let catalog = CampsiteCatalog::fetch(records, &task.asset_id, page_size).await?;
    let mut aggregator = aggregator.expecting_sites(catalog.len());
    let availability = aggregator.apply_filters(&task.availability_filters).await?;

    let mut catalog = campsite_chain.apply(&catalog)?;
    catalog.ingest_availability(&availability);
    let open = catalog.with_availability();

    let sites: Vec<SiteReport> = open.sorted().into_iter().map(SiteReport::from).collect();
    if sites.is_empty() {
        log::info!("😞 No open sites at {}", task.name);
    } else {
        log::info!("✅ {} open sites at {}", sites.len(), task.name);
    }

    Ok(TaskReport {
        name: task.name.clone(),
        asset_id: task.asset_id.clone(),
        sites,
        check_completed: Utc::now(),
        duration_secs: started.elapsed().as_secs_f64(),
    })
}

/// Run every task in order. The first failure aborts the run.
pub async fn run_all(
    records: &dyn RecordSource,
    months: Arc<dyn MonthSource>,
    tasks: &[TaskConfig],
    page_size: usize,
) -> Result<Vec<TaskReport>, ScanError> {
    let mut reports = Vec::with_capacity(tasks.len());
    for task in tasks {
        reports.push(run_task(records, months.clone(), task, page_size).await?);
    }
    Ok(reports)
}

/// Distinct campsite types across the assets of every task.
pub async fn survey_site_types(
    records: &dyn RecordSource,
    tasks: &[TaskConfig],
    page_size: usize,
) -> Result<BTreeSet<String>, ScanError> {
    let mut types = BTreeSet::new();
    for task in tasks {
        let catalog = CampsiteCatalog::fetch(records, &task.asset_id, page_size).await?;
        types.extend(catalog.unique_campsite_types());
    }
    Ok(types)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use campground_scan::FilterSpec;
    use chrono::{Datelike, NaiveDateTime};
    use rec_gov::{MonthAvailability, RecGovError, RecordPage, SiteAvailability};
    use serde_json::{Value, json};

    use super::*;

    const SITES: &[(u64, &str, &str, &str)] = &[
        (11, "B", "010", "STANDARD NONELECTRIC"),
        (12, "A", "002", "STANDARD NONELECTRIC"),
        (13, "A", "001", "TENT ONLY NONELECTRIC"),
    ];

    #[derive(Default)]
    struct MockRidb {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl RecordSource for MockRidb {
        async fn get_page(
            &self,
            _endpoint: &str,
            _query: &[(String, String)],
            offset: usize,
            limit: usize,
        ) -> Result<RecordPage, RecGovError> {
            *self.calls.lock().unwrap() += 1;
            let records: Vec<Value> = SITES
                .iter()
                .skip(offset)
                .take(limit)
                .map(|(id, loop_name, name, site_type)| {
                    json!({
                        "CampsiteID": id,
                        "FacilityID": "1",
                        "CampsiteName": name,
                        "CampsiteType": site_type,
                        "Loop": loop_name
                    })
                })
                .collect();
            Ok(RecordPage {
                page_count: records.len(),
                total_count: SITES.len(),
                records,
            })
        }
    }

    /// Site 11 is open June 10-11, site 12 on July 1, site 13 never.
    #[derive(Default)]
    struct MockMonths {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl MonthSource for MockMonths {
        async fn get_month(
            &self,
            _asset_id: &str,
            month: NaiveDateTime,
        ) -> Result<MonthAvailability, RecGovError> {
            *self.calls.lock().unwrap() += 1;
            let open: &[(&str, &str)] = match month.month() {
                6 => &[("11", "2021-06-10"), ("11", "2021-06-11")],
                7 => &[("12", "2021-07-01")],
                _ => &[],
            };

            let mut payload = MonthAvailability::default();
            for (id, _, _, _) in SITES {
                let mut site = SiteAvailability::default();
                site.availabilities.insert(
                    format!("{}T00:00:00Z", month.format("%Y-%m-20")),
                    "Reserved".to_string(),
                );
                for (open_id, day) in open {
                    if *open_id == id.to_string() {
                        site.availabilities
                            .insert(format!("{}T00:00:00Z", day), "Available".to_string());
                    }
                }
                payload.campsites.insert(id.to_string(), site);
            }
            Ok(payload)
        }
    }

    fn task(availability_filters: Vec<FilterSpec>) -> TaskConfig {
        TaskConfig {
            name: "Upper Pines".to_string(),
            asset_id: "1".to_string(),
            campsite_filters: Vec::new(),
            availability_filters,
            drop_empty_sites: false,
        }
    }

    #[tokio::test]
    async fn test_run_task_reports_open_sites_in_location_order() {
        let ridb = MockRidb::default();
        let months = Arc::new(MockMonths::default());

        let report = run_task(
            &ridb,
            months.clone(),
            &task(vec![FilterSpec::new("start_date").arg("2021-06-01")]),
            2,
        )
        .await
        .unwrap();

        let ids: Vec<&str> = report.sites.iter().map(|s| s.site_id.as_str()).collect();
        assert_eq!(ids, vec!["12", "11"]);
        assert_eq!(report.sites[1].availabilities, vec!["2021-06-10 to 2021-06-11"]);
        assert_eq!(report.sites[1].available_nights, 2);
        assert_eq!(*ridb.calls.lock().unwrap(), 2);
        assert_eq!(*months.calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_run_task_applies_campsite_filters() {
        let ridb = MockRidb::default();
        let mut task = task(vec![FilterSpec::new("start_date").arg("2021-06-01")]);
        task.campsite_filters =
            vec![FilterSpec::new("exclude_by_campsite_type").arg("STANDARD NONELECTRIC")];

        let report = run_task(&ridb, Arc::new(MockMonths::default()), &task, 50)
            .await
            .unwrap();

        assert!(report.sites.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_filters_fetch_nothing() {
        let ridb = MockRidb::default();
        let months = Arc::new(MockMonths::default());

        let mut bad_campsite = task(vec![FilterSpec::new("start_date").arg("2021-06-01")]);
        bad_campsite.campsite_filters = vec![FilterSpec::new("filter_by_vibes")];
        let bad_availability = task(vec![
            FilterSpec::new("start_date").arg("2021-06-01"),
            FilterSpec::new("vibes"),
        ]);

        for task in [bad_campsite, bad_availability] {
            let result = run_task(&ridb, months.clone(), &task, 50).await;
            assert!(matches!(result, Err(ScanError::UnknownFilter { .. })));
        }
        assert_eq!(*ridb.calls.lock().unwrap(), 0);
        assert_eq!(*months.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_run_all_aborts_on_first_failure() {
        let ridb = MockRidb::default();
        let months = Arc::new(MockMonths::default());
        let tasks = vec![
            task(vec![FilterSpec::new("start_date").arg("2021-06-01")]),
            task(Vec::new()),
            task(vec![FilterSpec::new("start_date").arg("2021-07-01")]),
        ];

        let result = run_all(&ridb, months.clone(), &tasks, 50).await;

        assert!(matches!(result, Err(ScanError::MissingStartDate)));
        assert_eq!(*ridb.calls.lock().unwrap(), 1);
        assert_eq!(*months.calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_survey_site_types() {
        let ridb = MockRidb::default();
        let tasks = vec![task(Vec::new()), task(Vec::new())];

        let types = survey_site_types(&ridb, &tasks, 50).await.unwrap();

        assert_eq!(
            types.into_iter().collect::<Vec<_>>(),
            vec!["STANDARD NONELECTRIC", "TENT ONLY NONELECTRIC"]
        );
    }
}
