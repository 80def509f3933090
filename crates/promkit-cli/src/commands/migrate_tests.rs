use promkit_lib::Query;

use super::migrate::MigrationReport;

fn report(src: &str) -> String {
    let query = Query::try_from(src).unwrap();
    let migration = query.migrate();
    serde_json::to_string_pretty(&MigrationReport::new(&migration)).unwrap()
}

#[test]
fn clean_migration() {
    insta::assert_snapshot!(report("count(up) by (job)"), @r#"
    {
      "query": "count by (job) (up{})",
      "complete": true,
      "diagnostics": []
    }
    "#);
}

#[test]
fn dropped_modifier_is_reported() {
    insta::assert_snapshot!(report("count(foo[5m])"), @r#"
    {
      "query": "count(foo{})",
      "complete": true,
      "diagnostics": [
        {
          "severity": "warning",
          "kind": "ModifierDropped",
          "start": 9,
          "end": 13,
          "message": "range `[5m]` is dropped from the migrated query"
        }
      ]
    }
    "#);
}

#[test]
fn unsupported_construct_is_incomplete() {
    insta::assert_snapshot!(report("topk(5, foo)"), @r#"
    {
      "query": "",
      "complete": false,
      "diagnostics": [
        {
          "severity": "error",
          "kind": "UnsupportedConstruct",
          "start": 0,
          "end": 4,
          "message": "`topk` aggregation is not supported by migration"
        }
      ]
    }
    "#);
}
