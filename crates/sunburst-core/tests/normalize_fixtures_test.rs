use serde_json::json;
use std::path::{Path, PathBuf};
use sunburst_core::{NormalizedNode, TaxonomyNode, normalize};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

fn load_fixture(name: &str) -> TaxonomyNode {
    let path = workspace_root()
        .join("fixtures")
        .join("taxonomy")
        .join(name);
    let text = std::fs::read_to_string(&path).expect("fixture");
    TaxonomyNode::from_json_str(&text).expect("valid taxonomy")
}

fn names(nodes: &[NormalizedNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.name.as_str()).collect()
}

#[test]
fn spec_example_fixture_normalizes_to_expected_json() {
    let out = normalize(&load_fixture("spec_example.json"));
    let value = serde_json::to_value(&out).unwrap();
    assert_eq!(
        value,
        json!({
            "name": "A",
            "children": [
                {
                    "name": "Cat1",
                    "children": [{
                        "id": "TAMPON-Cat1",
                        "name": "Cat1",
                        "niveau": 2,
                        "prérogative": "Fusion",
                        "description": "Regroupe les compétences de Cat1",
                        "children": [{ "name": "x1" }, { "name": "x2" }]
                    }]
                },
                { "name": "Cat2" }
            ]
        })
    );
}

#[test]
fn competences_fixture_has_one_merge_ring_per_category() {
    let out = normalize(&load_fixture("competences.json"));
    assert_eq!(
        names(out.children()),
        vec!["Communication", "Leadership", "Pilotage", "Sécurité"]
    );

    for cat in out.children() {
        match cat.name.as_str() {
            // Its only child has no competencies below it.
            "Leadership" => assert!(cat.children.is_none()),
            _ => {
                assert_eq!(cat.children().len(), 1);
                let merge = &cat.children()[0];
                assert!(merge.is_synthetic());
                assert_eq!(merge.id.as_deref(), Some(format!("TAMPON-{}", cat.name).as_str()));
            }
        }
    }

    let securite = &out.children()[3].children()[0];
    assert_eq!(
        names(securite.children()),
        vec!["Incendie", "Panne moteur", "Anticipation"]
    );
    assert_eq!(out.leaf_count(), 8);
    assert_eq!(out.max_depth(), 3);
}

#[test]
fn normalized_json_round_trips_through_the_raw_loader() {
    let once = normalize(&load_fixture("competences.json"));
    let text = serde_json::to_string(&once).unwrap();
    let reparsed = TaxonomyNode::from_json_str(&text).unwrap();
    assert_eq!(normalize(&reparsed), once);
}
