use consensus_decentralization::aggregator::{aggregate, build_chunks, Granularity};
use consensus_decentralization::commands::{execute_analyze, validate_args, AnalyzeArgs};
use consensus_decentralization::identity::{LinkResolver, MappingInfo};
use consensus_decentralization::mapping::Classifier;
use consensus_decentralization::metrics::Metric;
use consensus_decentralization::output::{read_blocks_per_entity, read_mapped_data, read_metrics};
use consensus_decentralization::parser::parse_blocks;
use consensus_decentralization::utils::config::CORE_OPERATOR;
use consensus_decentralization::utils::error::AggregateError;
use consensus_decentralization::utils::timeframe::Timeframe;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// X owns Y and Y owns Z during 2021
fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "mapping_information/legal_links.json",
        r#"{
            "X": [{"name": "Y", "from": "2021", "to": "2022"}],
            "Y": [{"name": "Z", "from": "2021", "to": "2022"}]
        }"#,
    );
    write(
        dir.path(),
        "mapping_information/addresses/bitcoin.json",
        r#"{
            "addr_of_X": {"name": "X"},
            "addr_of_Z": {"name": "Z"}
        }"#,
    );
    write(
        dir.path(),
        "raw_block_data/bitcoin_raw_data.json",
        r#"[
            {"number": 1, "timestamp": "2021-02-01 00:00:00", "reward_addresses": "addr_of_Z"},
            {"number": 2, "timestamp": "2021-05-01 00:00:00", "reward_addresses": "addr_of_Z"},
            {"number": 3, "timestamp": "2021-05-02 00:00:00", "reward_addresses": "addr_of_Z"},
            {"number": 4, "timestamp": "2021-11-30 00:00:00", "reward_addresses": "addr_of_X"},
            {"number": 5, "timestamp": "2022-01-03 00:00:00", "reward_addresses": "addr_of_Z"}
        ]"#,
    );
    dir
}

fn args(dir: &Path, timeframe: &str, granularity: Granularity) -> AnalyzeArgs {
    AnalyzeArgs {
        ledgers: vec!["bitcoin".to_string()],
        timeframe: Timeframe::parse(timeframe).unwrap(),
        granularity,
        metrics: vec![Metric::Gini, Metric::Hhi],
        mapping_info_dir: dir.join("mapping_information"),
        raw_data_dir: dir.join("raw_block_data"),
        output_dir: dir.join("output"),
        print_summary: false,
    }
}

#[test]
fn test_ownership_chain_collapses_to_root_owner() {
    let dir = workspace();
    let args = args(dir.path(), "2021", Granularity::Year);
    validate_args(&args).unwrap();

    let reports = execute_analyze(args).unwrap();
    assert_eq!(reports.len(), 1);
    let report = &reports[0];

    let rows: Vec<(&str, &[u64])> = report.blocks_per_entity.iter().collect();
    assert_eq!(rows, vec![("X", &[4][..])]);
    assert_eq!(report.metrics.values["gini"], vec![Some(0.0)]);
    assert_eq!(report.metrics.values["hhi"], vec![Some(10000.0)]);

    assert!(report.csv_path.ends_with("bitcoin/yearly_from_2021-01-01_to_2021-12-31.csv"));
    let reloaded = read_blocks_per_entity(&report.csv_path).unwrap();
    assert_eq!(reloaded, report.blocks_per_entity);

    let metrics = read_metrics(&report.metrics_path).unwrap();
    assert_eq!(metrics, report.metrics);
}

#[test]
fn test_mapped_data_keeps_input_order() {
    let dir = workspace();
    let reports = execute_analyze(args(dir.path(), "2021", Granularity::Month)).unwrap();

    let mapped = read_mapped_data(&reports[0].mapped_data_path).unwrap();
    let numbers: Vec<u64> = mapped.iter().map(|b| b.number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    assert!(mapped.iter().all(|b| b.entity == "X"));
}

#[test]
fn test_monthly_chunks_and_idle_months() {
    let dir = workspace();
    let reports = execute_analyze(args(dir.path(), "2021", Granularity::Month)).unwrap();
    let report = &reports[0];

    assert_eq!(report.blocks_per_entity.chunks().len(), 12);
    assert_eq!(report.blocks_per_entity.chunks()[1], "Feb-2021");
    assert_eq!(
        report.blocks_per_entity.counts_of("X"),
        Some(&[0, 1, 0, 0, 2, 0, 0, 0, 0, 0, 1, 0][..])
    );
    assert_eq!(report.metrics.values["gini"][0], None);
    assert_eq!(report.metrics.values["gini"][1], Some(0.0));
}

#[test]
fn test_links_do_not_apply_outside_claim_window() {
    let dir = workspace();
    let reports = execute_analyze(args(dir.path(), "2022", Granularity::Year)).unwrap();

    let rows: Vec<(&str, &[u64])> = reports[0].blocks_per_entity.iter().collect();
    assert_eq!(rows, vec![("Z", &[1][..])]);
}

#[test]
fn test_rerun_produces_identical_counts() {
    let dir = workspace();
    let first = execute_analyze(args(dir.path(), "2021", Granularity::Week)).unwrap();
    let second = execute_analyze(args(dir.path(), "2021", Granularity::Week)).unwrap();

    assert_eq!(first[0].blocks_per_entity, second[0].blocks_per_entity);
    assert_eq!(first[0].metrics.values, second[0].metrics.values);
}

#[test]
fn test_missing_raw_data_fails() {
    let dir = workspace();
    let mut args = args(dir.path(), "2021", Granularity::Year);
    args.ledgers = vec!["ethereum".to_string()];

    assert!(execute_analyze(args).is_err());
}

#[test]
fn test_cardano_core_operator_blocks() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "mapping_information/identifiers/cardano.json",
        r#"{"IOG1": {"name": "Input Output"}}"#,
    );
    write(
        dir.path(),
        "raw_block_data/cardano_raw_data.json",
        r#"{"blocks": [
            {"number": 10, "timestamp": "2020-08-01T00:00:00", "identifiers": null, "reward_addresses": null},
            {"number": 11, "timestamp": "2020-08-01T00:00:20", "identifiers": "IOG1", "reward_addresses": null},
            {"number": 12, "timestamp": "2020-08-01T00:00:40", "identifiers": "pool1abc", "reward_addresses": null}
        ]}"#,
    );
    let mut args = args(dir.path(), "2020-08", Granularity::All);
    args.ledgers = vec!["cardano".to_string()];

    let reports = execute_analyze(args).unwrap();

    let rows: Vec<(&str, &[u64])> = reports[0].blocks_per_entity.iter().collect();
    assert_eq!(
        rows,
        vec![
            (CORE_OPERATOR, &[1][..]),
            ("Input Output", &[1][..]),
            ("pool1abc", &[1][..]),
        ]
    );
}

#[test]
fn test_aggregate_rejects_block_outside_chunks() {
    let dir = workspace();
    let info = MappingInfo::new(dir.path().join("mapping_information"));
    let identity = info.identity_data("bitcoin").unwrap();
    let mut resolver = LinkResolver::new(info);
    let blocks = parse_blocks(json!([
        {"number": 9, "timestamp": "2023-01-01 00:00:00", "reward_addresses": "addr_of_X"}
    ]))
    .unwrap();
    let chunks = build_chunks(&Timeframe::parse("2021").unwrap(), Granularity::Month);

    let result = aggregate(
        "bitcoin",
        &blocks,
        &chunks,
        Classifier::Default,
        &identity,
        &mut resolver,
    );

    assert!(matches!(
        result,
        Err(AggregateError::UnassignableBlock { number: 9, .. })
    ));
}

#[test]
fn test_aggregate_accepts_chunks_in_any_order() {
    let dir = workspace();
    let info = MappingInfo::new(dir.path().join("mapping_information"));
    let identity = info.identity_data("bitcoin").unwrap();
    let mut resolver = LinkResolver::new(info);
    let blocks = parse_blocks(json!([
        {"number": 1, "timestamp": "2021-01-15 00:00:00", "reward_addresses": "addr_of_Z"},
        {"number": 2, "timestamp": "2021-02-03 00:00:00", "reward_addresses": "addr_of_X"}
    ]))
    .unwrap();
    let mut chunks = build_chunks(&Timeframe::between("2021-01", "2021-02").unwrap(), Granularity::Month);
    chunks.reverse();

    let aggregation = aggregate(
        "bitcoin",
        &blocks,
        &chunks,
        Classifier::Default,
        &identity,
        &mut resolver,
    )
    .unwrap();

    let table = &aggregation.blocks_per_entity;
    assert_eq!(table.chunks(), &["Feb-2021".to_string(), "Jan-2021".to_string()][..]);
    assert_eq!(table.counts_of("X"), Some(&[1, 1][..]));
}
