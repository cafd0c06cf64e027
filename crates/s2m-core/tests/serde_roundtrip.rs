use s2m_core::errors::{ErrorInfo, S2mError};
use s2m_core::provenance::{RunProvenance, SchemaVersion};

#[test]
fn provenance_round_trip_json() {
    let provenance = RunProvenance {
        schema: SchemaVersion::new(1, 0, 0),
        data_dir: "/data/Reportfiles".into(),
        stat_dir: "/data/Statfiles".into(),
        created_at: "2015-12-03T00:00:00Z".into(),
        tool_versions: [("s2m-core".into(), "0.1.0".into())].into_iter().collect(),
    };

    let json = serde_json::to_string_pretty(&provenance).expect("serialize");
    let decoded: RunProvenance = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(decoded, provenance);
}

#[test]
fn captured_provenance_records_core_version() {
    let provenance = RunProvenance::capture("in", "out").with_tool("s2m-stats", "9.9.9");
    assert_eq!(provenance.data_dir, "in");
    assert_eq!(provenance.stat_dir, "out");
    assert!(provenance.tool_versions.contains_key("s2m-core"));
    assert_eq!(provenance.tool_versions["s2m-stats"], "9.9.9");
    assert!(!provenance.created_at.is_empty());
}

#[test]
fn errors_are_tagged_by_family() {
    let err = S2mError::Consistency(
        ErrorInfo::new("passage_mismatch", "inconsistent passage count")
            .with_context("file", "fitness1-default_rep2.report"),
    );
    let json = serde_json::to_value(&err).expect("serialize");
    assert_eq!(json["family"], "Consistency");
    assert_eq!(json["detail"]["code"], "passage_mismatch");
    let decoded: S2mError = serde_json::from_value(json).expect("deserialize");
    assert_eq!(decoded, err);
}
