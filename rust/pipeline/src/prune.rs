// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! OSM pruning run driver.

use std::time::Instant;

use tracing::info;

use tactile_prep_osm::{apply_relation_closure, decide_pruning, write_pruned_to_path, OsmGraph};

use crate::error::Result;
use crate::options::PruneOptions;
use crate::report::{PruneReport, RectReport};

/// Run one pruning pass: two-pass graph build, rank-bucket decision,
/// relation closure, streamed re-serialization.
pub fn run_prune(options: &PruneOptions) -> Result<PruneReport> {
    options.validate()?;
    let started = Instant::now();

    let graph = OsmGraph::from_file(&options.input)?;
    info!(
        nodes = graph.node_count(),
        ways = graph.way_count(),
        relations = graph.relation_count(),
        "graph built"
    );

    let decision = decide_pruning(&graph, &options.bounds, options.density_km_per_km2);
    let area_m2 = decision.area_m2;
    let target_m = decision.target_m;
    let length_by_rank_m = decision.length_by_rank_m;
    let removed_ranks = decision.removed_ranks;

    let keep = apply_relation_closure(&graph, decision);
    write_pruned_to_path(&graph, &keep, &options.bounds, &options.input, &options.output)?;

    let kept_nodes = (0..graph.node_count())
        .filter(|&ix| keep.keep_node[ix] && graph.node_has_coord[ix])
        .count() as u64;
    let kept_ways = keep.keep_way.iter().filter(|k| **k).count() as u64;
    let kept_relations = (0..graph.relation_count())
        .filter(|&ix| keep.keep_relation.contains(&graph.relation_ids[ix]))
        .count() as u64;

    Ok(PruneReport {
        input_path: options.input.display().to_string(),
        output_path: options.output.display().to_string(),
        bounds: RectReport {
            min_x: options.bounds.lon_min,
            min_y: options.bounds.lat_min,
            max_x: options.bounds.lon_max,
            max_y: options.bounds.lat_max,
        },
        target_density_km_per_km2: options.density_km_per_km2,
        area_m2,
        target_m,
        length_by_rank_m,
        removed_ranks,
        kept_nodes,
        kept_ways,
        kept_relations,
        total_seconds: started.elapsed().as_secs_f64(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DEFAULT_DENSITY_KM_PER_KM2;
    use tactile_prep_osm::GeoBounds;

    #[test]
    fn prune_run_writes_output_and_reports_counts() {
        let dir = std::env::temp_dir().join("tactile-prep-prune-test");
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("in.osm");
        let output = dir.join("out.osm");
        std::fs::write(
            &input,
            concat!(
                "<osm version=\"0.6\">",
                "<node id=\"1\" lat=\"60.001\" lon=\"24.901\"/>",
                "<node id=\"2\" lat=\"60.003\" lon=\"24.901\"/>",
                "<way id=\"10\"><nd ref=\"1\"/><nd ref=\"2\"/>",
                "<tag k=\"highway\" v=\"primary\"/></way>",
                "</osm>"
            ),
        )
        .unwrap();

        let options = PruneOptions {
            input,
            output: output.clone(),
            bounds: GeoBounds::new(24.9, 60.0, 24.91, 60.01),
            density_km_per_km2: DEFAULT_DENSITY_KM_PER_KM2,
        };
        let report = run_prune(&options).unwrap();

        assert_eq!(report.kept_ways, 1);
        assert_eq!(report.kept_nodes, 2);
        assert_eq!(report.kept_relations, 0);
        assert!(report.area_m2 > 0.0);

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.contains("<way id=\"10\">"));
    }

    #[test]
    fn invalid_options_fail_before_io() {
        let options = PruneOptions {
            input: "/definitely/not/present.osm".into(),
            output: "/tmp/out.osm".into(),
            bounds: GeoBounds::new(25.0, 60.0, 24.0, 61.0),
            density_km_per_km2: 1.0,
        };
        // Bad bounds must surface as an options error, not a missing file.
        let err = run_prune(&options).unwrap_err();
        assert!(matches!(err, crate::error::Error::Options(_)));
    }
}
