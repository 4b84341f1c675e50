use consensus_decentralization::identity::{LinkResolver, MappingInfo};
use consensus_decentralization::mapping::{Classifier, Entity};
use consensus_decentralization::parser::{parse_blocks, Block};
use consensus_decentralization::utils::config::{SPECIAL_ADDRESS, UNDEFINED_MINER};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn mapping_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "identifiers/bitcoin.json",
        r#"{
            "/ViaBTC/": {"name": "ViaBTC", "link": "https://viabtc.com"},
            "BTC.COM": {"name": "BTC.com"}
        }"#,
    );
    write(
        dir.path(),
        "addresses/bitcoin.json",
        r#"{
            "1Kr6": {"name": "F2Pool", "source": "pool website"},
            "1Cfw": {"name": "Binance Pool"}
        }"#,
    );
    write(
        dir.path(),
        "special_addresses.json",
        r#"{"bitcoin": [{"address": "op_return", "source": "protocol"}]}"#,
    );
    write(
        dir.path(),
        "clusters/bitcoin.json",
        r#"{"BTC.com": [{"name": "ViaBTC", "from": "2021", "to": "2022"}]}"#,
    );
    dir
}

fn blocks() -> Vec<Block> {
    parse_blocks(json!([
        {"number": 1, "timestamp": "2021-03-01 10:00:00", "identifiers": "Mined by /ViaBTC/", "reward_addresses": "1Cfw"},
        {"number": 2, "timestamp": "2021-03-01 10:10:00", "identifiers": "", "reward_addresses": "op_return,1Kr6"},
        {"number": 3, "timestamp": "2021-03-01 10:20:00", "reward_addresses": ["op_return"]},
        {"number": 4, "timestamp": "2021-03-01 10:30:00", "identifiers": null, "reward_addresses": null},
        {"number": 5, "timestamp": "2021-03-01 10:40:00", "reward_addresses": "bc1q, 1Cfw"}
    ]))
    .unwrap()
}

#[test]
fn test_classify_with_loaded_identity_data() {
    let dir = mapping_dir();
    let mut resolver = LinkResolver::new(MappingInfo::new(dir.path()));
    let identity = resolver.mapping_info().identity_data("bitcoin").unwrap();
    let links = resolver.resolve_timeframe("bitcoin", "2021-03").unwrap();
    let classifier = Classifier::for_ledger("bitcoin");

    let entities: Vec<Entity> = blocks()
        .iter()
        .map(|block| classifier.classify(block, &identity, &links))
        .collect();

    assert_eq!(
        entities,
        vec![
            Entity::named("BTC.com"),
            Entity::named("F2Pool"),
            Entity::SpecialAddress,
            Entity::UndefinedMiner,
            Entity::named("Binance Pool"),
        ]
    );
}

#[test]
fn test_classify_without_links_keeps_cluster_members() {
    let dir = mapping_dir();
    let mut resolver = LinkResolver::new(MappingInfo::new(dir.path()));
    let identity = resolver.mapping_info().identity_data("bitcoin").unwrap();
    let links = resolver.resolve_timeframe("bitcoin", "2020").unwrap();

    let entity = Classifier::Default.classify(&blocks()[0], &identity, &links);

    assert_eq!(entity.name(), "ViaBTC");
}

#[test]
fn test_sentinel_names() {
    assert_eq!(Entity::UndefinedMiner.name(), UNDEFINED_MINER);
    assert_eq!(Entity::SpecialAddress.to_string(), SPECIAL_ADDRESS);
    assert!(Entity::CoreOperator.is_sentinel());
    assert!(!Entity::named("F2Pool").is_sentinel());
}

#[test]
fn test_special_addresses_are_per_ledger() {
    let dir = mapping_dir();
    let info = MappingInfo::new(dir.path());

    let identity = info.identity_data("litecoin").unwrap();
    let block = &blocks()[2];

    let entity = Classifier::Default.classify(block, &identity, &Default::default());

    assert_eq!(entity, Entity::named("op_return"));
}
